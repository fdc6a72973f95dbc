//! Note and rest rendering: noteheads, stems and flags, ledger lines, dots,
//! fermatas, trills, measure rests and multi-measure rests.

use super::geometry::{ledger_lines, pitch_position, rest_auto_position, staff_mid};
use super::glyphs::*;
use super::ligature::draw_ligature;
use super::stems::{acciaccatura_slash, layout_stem, resolve_direction, StemInput};
use super::symbols::AccidentalDraw;
use super::{DeferredDraw, DrawnGeometry, ElementCtx, LayerPass, View};
use crate::device::{Color, DeviceContext, Point};
use crate::metrics::StaffMetrics;
use crate::model::*;

/// Rest shape parameters shared by the whole and half rest.
#[derive(Debug, Clone, Copy)]
struct RestShape {
    x: i32,
    y: i32,
    dur: Duration,
    dots: u8,
    cue: bool,
}

impl<'a> View<'a> {
    // ── Notes ───────────────────────────────────────────────────────

    pub(super) fn draw_note(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, note: &Note, pass: &mut LayerPass) {
        let m = cx.m;
        let color = cx.color();
        let staff = cx.staff;
        let mensural = staff.notation == NotationStyle::Mensural;
        let xn = cx.x + cx.element.h_offset;
        let ynn = cx.staff_y + pitch_position(note.pitch, pass.clef, staff.lines, &m);
        let formal = formal_duration(note.dur, note.colored);

        let mut radius = m.radius(note.cue);
        let ledger = if note.dur > Duration::Whole || (note.dur == Duration::Whole && mensural) {
            m.ledger_line[note.cue as usize]
        } else {
            radius += radius / 3;
            m.ledger_line[2]
        };
        let x1 = xn - radius;

        // Ledger lines crossing the notehead go underneath it
        let (under, over): (Vec<i32>, Vec<i32>) = ledger_lines(ynn, cx.staff_y, staff.lines, &m)
            .into_iter()
            .partition(|ly| (ly - ynn).abs() < radius);
        self.draw_ledger_lines(dc, &under, xn, ledger, color);

        let mut geometry = DrawnGeometry {
            x: cx.x,
            y: ynn,
            stem_dir: None,
            stem_start: Point::new(cx.x, ynn),
            stem_end: Point::new(cx.x, ynn),
            flags: 0,
            is_note: true,
            cue: note.cue,
        };

        if note.dur <= Duration::Breve || (note.ligature && note.dur == Duration::Whole) {
            draw_ligature(&mut pass.ligature, &cx.element.id, xn, ynn);
        } else {
            pass.ligature.reset();
            self.glyph(dc, notehead_glyph(note.dur, note.colored), x1, ynn, &m, note.cue, color);

            if note.dur > Duration::Whole && !note.stemless {
                let mid = staff_mid(cx.staff_y, staff.lines, staff.notation, &m);
                let direction = resolve_direction(note.stem_dir, cx.scope.beam_dir, ynn, mid);
                let stem = layout_stem(
                    &StemInput {
                        x: xn,
                        y: ynn,
                        formal,
                        cue: note.cue,
                        direction,
                        mensural,
                    },
                    &m,
                    self.metrics.stem_width,
                );
                geometry.stem_dir = Some(direction);
                geometry.stem_start = stem.start;
                geometry.stem_end = stem.end;
                geometry.flags = formal.steps_below_quarter();

                // The beam draws stems and strokes for its flagged members
                if !(cx.scope.in_beam && formal > Duration::Quarter) {
                    self.vertical_line(dc, stem.start.x, stem.start.y, stem.end.y, self.metrics.stem_width, color);
                    let flag = flag_glyph(direction == StemDirection::Up);
                    for at in &stem.flags {
                        self.glyph(dc, flag, at.x, at.y, &m, note.cue, color);
                    }
                    if note.cue && note.acciaccatura && note.dur >= Duration::Eighth {
                        let (from, to) = acciaccatura_slash(stem.start, direction, &m);
                        self.line(dc, from, to, 2, color);
                    }
                }
            }
        }

        self.draw_ledger_lines(dc, &over, xn, ledger, color);

        if let Some(accid) = note.accid {
            let ax = x1 - m.accid(note.cue) * 3 / 2;
            let id = format!("{}-accid", cx.element.id);
            dc.start_graphic("accid", &id);
            self.draw_accidental(
                dc,
                &AccidentalDraw {
                    accid,
                    x: ax,
                    y: ynn,
                    cue: note.cue,
                    mensural,
                },
                &m,
                color,
            );
            dc.end_graphic("accid", &id);
        }

        if note.dots > 0 {
            let stem_up = geometry.stem_dir == Some(StemDirection::Up);
            let x2 = if note.dur < Duration::Half
                || (note.dur > Duration::Eighth && !cx.scope.in_beam && stem_up)
            {
                xn + self.metrics.step1 * 7 / 2
            } else {
                xn + self.metrics.step1 * 5 / 2
            };
            self.draw_dots(dc, x2, ynn, note.dots, cx.staff_y, &m, color);
        }

        let embellished = note.embellishment.is_some();
        if note.fermata {
            let y = ornament_anchor(ynn, cx.staff_y) + m.interline + if embellished { m.interline * 7 / 4 } else { 0 };
            self.glyph(dc, FERMATA_ABOVE, cx.x, y, &m, false, color);
        }
        if note.embellishment == Some(Embellishment::Trill) {
            self.draw_trill(dc, cx.x, ynn, cx.staff_y, &m, color);
        }

        self.record(&cx.element.id, geometry);
        self.enqueue_curves(cx, note, pass);
    }

    /// Queue the ties and slurs this note is responsible for.
    ///
    /// The terminal note always queues its curve. The initial note only
    /// queues when its partner is in another system, to draw its own half.
    fn enqueue_curves(&self, cx: &ElementCtx, note: &Note, pass: &mut LayerPass) {
        for (ends, kind) in [(&note.tie, CurveKind::Tie), (&note.slur, CurveKind::Slur)] {
            if let Some(id) = &ends.initial {
                match self.doc.relation(id) {
                    Some(relation) => match self.location(&relation.second) {
                        Some(partner) if partner.system != cx.system => {
                            pass.queue.push(DeferredDraw::Curve {
                                relation: id.clone(),
                                kind,
                                color: cx.color(),
                            });
                        }
                        Some(_) => {}
                        None => log::debug!("{:?} {}: second note {} not found", kind, id, relation.second),
                    },
                    None => log::debug!("note {}: unknown {:?} {}", cx.element.id, kind, id),
                }
            }
            if let Some(id) = &ends.terminal {
                pass.queue.push(DeferredDraw::Curve {
                    relation: id.clone(),
                    kind,
                    color: cx.color(),
                });
            }
        }
    }

    fn draw_ledger_lines(&self, dc: &mut dyn DeviceContext, lines: &[i32], x: i32, half_length: i32, color: Color) {
        for &y in lines {
            self.horizontal_line(dc, x - half_length, x + half_length, y, self.metrics.staff_line_width, color);
        }
    }

    /// Dots to the right of a note or rest; a dot on a line moves up into the space.
    fn draw_dots(&self, dc: &mut dyn DeviceContext, x: i32, y: i32, dots: u8, staff_y: i32, m: &StaffMetrics, color: Color) {
        let y = if (y - staff_y) % m.interline == 0 {
            y + m.half_interline
        } else {
            y
        };
        let spacing = (2 * self.metrics.step1).max(6);
        for i in 0..i32::from(dots) {
            self.dot(dc, x + i * spacing, y, m, color);
        }
    }

    fn draw_trill(&self, dc: &mut dyn DeviceContext, x: i32, y: i32, staff_y: i32, m: &StaffMetrics, color: Color) {
        let y = ornament_anchor(y, staff_y) + m.interline * 3 / 2;
        self.glyph(dc, TRILL, x, y, m, false, color);
    }

    // ── Rests ───────────────────────────────────────────────────────

    pub(super) fn draw_rest(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, rest: &Rest, clef: Option<ClefId>) {
        let m = cx.m;
        let color = cx.color();
        let staff = cx.staff;
        let y = match rest.position {
            RestPosition::Auto => {
                let mid = cx.staff_y - m.span(staff.lines) / 2;
                rest_auto_position(rest.dur, mid, &m)
            }
            RestPosition::Pitched(pitch) => cx.staff_y + pitch_position(pitch, clef, staff.lines, &m),
        };
        let stem_x = cx.x - self.metrics.stem_width / 2;
        let mut x = cx.x + cx.element.h_offset;
        if rest.dur > Duration::Half {
            x -= m.radius(rest.cue);
        }

        match rest.dur {
            Duration::Long => self.draw_long_rest(dc, x, y, cx.staff_y, &m, color),
            Duration::Breve => self.draw_breve_rest(dc, x, y, cx.staff_y, &m, color),
            Duration::Whole | Duration::Half => {
                let shape = RestShape {
                    x,
                    y,
                    dur: rest.dur,
                    dots: rest.dots,
                    cue: rest.cue,
                };
                self.draw_whole_rest(dc, &shape, cx, color);
            }
            _ => self.draw_quarter_rest(dc, x, y, rest, cx.staff_y, &m, color),
        }

        if rest.fermata {
            let y = cx.staff_y + m.interline;
            self.glyph(dc, FERMATA_ABOVE, cx.x, y, &m, false, color);
        }
        if rest.embellishment == Some(Embellishment::Trill) {
            self.draw_trill(dc, cx.x, y, cx.staff_y, &m, color);
        }

        let at = Point::new(stem_x, y);
        self.record(
            &cx.element.id,
            DrawnGeometry {
                x: cx.x,
                y,
                stem_dir: None,
                stem_start: at,
                stem_end: at,
                flags: 0,
                is_note: false,
                cue: rest.cue,
            },
        );
    }

    fn draw_long_rest(&self, dc: &mut dyn DeviceContext, x: i32, y: i32, staff_y: i32, m: &StaffMetrics, color: Color) {
        let (y1, y2) = self.long_rest_span(y, staff_y, m);
        self.full_rectangle(dc, x, y1, x + self.metrics.step1 * 2 / 3, y2, color);
    }

    fn draw_breve_rest(&self, dc: &mut dyn DeviceContext, x: i32, y: i32, staff_y: i32, m: &StaffMetrics, color: Color) {
        let (y1, y2) = self.long_rest_span(y, staff_y, m);
        self.full_rectangle(dc, x, y1, x + self.metrics.step1 * 2 / 3, y2, color);
        let step1 = self.metrics.step1;
        self.horizontal_line(dc, x - step1, x + step1, y2, 1, color);
        self.horizontal_line(dc, x - step1, x + step1, y1, 1, color);
    }

    /// Two-interline span of long and breve rests, started on a line.
    fn long_rest_span(&self, y: i32, staff_y: i32, m: &StaffMetrics) -> (i32, i32) {
        let mut y1 = y;
        if (y - staff_y) % m.interline != 0 {
            y1 -= m.half_interline;
        }
        (y1, y1 + m.interline * 2)
    }

    /// Whole rest hangs below a line, half rest sits on it.
    fn draw_whole_rest(&self, dc: &mut dyn DeviceContext, shape: &RestShape, cx: &ElementCtx, color: Color) {
        let m = &cx.m;
        let RestShape { x, y, dur, dots, cue } = *shape;
        let mut off = if cx.staff.notation == NotationStyle::Mensural {
            self.metrics.step1 / 3
        } else {
            m.ledger_line[2] * 2 / 3
        };
        if cue {
            off = self.metrics.grace_ratio.apply(off);
        }
        let mut vertic = m.half_interline;
        if dur == Duration::Whole {
            vertic = -vertic;
        }

        let mut y1 = y;
        if (y - cx.staff_y) % m.interline != 0 {
            if dur == Duration::Half {
                y1 -= vertic;
            } else {
                y1 += vertic;
            }
        }
        let y2 = y1 + vertic;
        let (mut x1, mut x2) = (x - off, x + off);
        self.full_rectangle(dc, x1, y1, x2, y2, color);

        off /= 2;
        x1 -= off;
        x2 += off;
        let span = m.span(cx.staff.lines);
        if y > cx.staff_y || y < cx.staff_y - span {
            self.horizontal_line(dc, x1, x2, y1, self.metrics.staff_line_width, color);
        }

        if dots > 0 {
            self.draw_dots(dc, x2 + self.metrics.step1, y2, dots, cx.staff_y, m, color);
        }
    }

    fn draw_quarter_rest(&self, dc: &mut dyn DeviceContext, x: i32, y: i32, rest: &Rest, staff_y: i32, m: &StaffMetrics, color: Color) {
        if let Some(code) = rest_glyph(rest.dur) {
            self.glyph(dc, code, x, y, m, rest.cue, color);
        }
        if rest.dots > 0 {
            let y = if rest.dur < Duration::Sixteenth { y + m.interline } else { y };
            self.draw_dots(dc, x + self.metrics.step2, y, rest.dots, staff_y, m, color);
        }
    }

    // ── Measure rests ───────────────────────────────────────────────

    /// Whole rest centred between the element and the right barline.
    pub(super) fn draw_mrest(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx) {
        let m = cx.m;
        let x = cx.x + cx.element.h_offset;
        let right = cx.measure.drawing_x + cx.measure.right_barline_x;
        let x_centered = x + (right - x) / 2;
        let y = cx.staff_y - i32::from(cx.staff.lines / 2) * m.interline;
        let shape = RestShape {
            x: x_centered,
            y,
            dur: Duration::Whole,
            dots: 0,
            cue: false,
        };
        self.draw_whole_rest(dc, &shape, cx, cx.color());
    }

    /// Bar with thick end strokes and the measure count above.
    pub(super) fn draw_multi_rest(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, multi: &MultiRest) {
        let m = cx.m;
        let color = cx.color();
        let x = cx.x + cx.element.h_offset;
        let count = multi.count.min(999);

        let length = self.metrics.step1 * 5;
        let y1 = cx.staff_y - (m.interline / 2) * 5;
        let y2 = y1 + m.interline;
        let (x1, x2) = (x - length, x + length);

        self.full_rectangle(dc, x1, y2 - 4, x2, y1 + 4, color);
        self.vertical_line(dc, x1, y1 - 4, y2 + 4, 4, color);
        self.vertical_line(dc, x2, y1 - 4, y2 + 4, 4, color);

        let text = count.to_string();
        self.centered_text(dc, &text, (x1 + x2) / 2, cx.staff_y + m.half_interline / 2, m.interline * 2, color);
    }
}

/// Base height for marks above a note: the note itself, or the top line
/// when the note sits inside the staff.
fn ornament_anchor(y: i32, staff_y: i32) -> i32 {
    if y < staff_y {
        staff_y
    } else {
        y
    }
}
