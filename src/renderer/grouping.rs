//! Beams and tuplets: the primary pass draws the children, the deferred
//! pass draws the beam stroke or the tuplet bracket over them.

use super::geometry::{pitch_position, staff_mid};
use super::glyphs::formal_duration;
use super::{DeferredDraw, DrawnGeometry, ElementCtx, LayerPass, View};
use crate::device::{Color, DeviceContext, Point};
use crate::error::RenderResult;
use crate::metrics::StaffMetrics;
use crate::model::*;

/// Ids of the notes (and rests when asked) under a group, nested groups included.
pub(super) fn collect_members(elements: &[Element], with_rests: bool, out: &mut Vec<String>) {
    for element in elements {
        match &element.kind {
            ElementKind::Note(_) => out.push(element.id.clone()),
            ElementKind::Rest(_) if with_rests => out.push(element.id.clone()),
            ElementKind::Beam(_) | ElementKind::Tuplet(_) => {
                collect_members(element.children(), with_rests, out)
            }
            _ => {}
        }
    }
}

fn collect_notes<'e>(elements: &'e [Element], out: &mut Vec<&'e Note>) {
    for element in elements {
        match &element.kind {
            ElementKind::Note(note) => out.push(note),
            ElementKind::Beam(_) | ElementKind::Tuplet(_) => collect_notes(element.children(), out),
            _ => {}
        }
    }
}

/// A note the beam stroke extends: stemmed, with at least one flag.
fn takes_beam(note: &Note) -> bool {
    !note.stemless && note.dur > Duration::Whole && formal_duration(note.dur, note.colored) > Duration::Quarter
}

/// Stem direction shared by a beam: the first note's explicit direction,
/// else the side of the mid-line the notes lie on average.
fn beam_direction(cx: &ElementCtx, beam: &Beam, clef: Option<ClefId>) -> StemDirection {
    let mut notes = Vec::new();
    collect_notes(&beam.children, &mut notes);
    if let Some(dir) = notes.first().and_then(|n| n.stem_dir) {
        return dir;
    }
    if notes.is_empty() {
        return StemDirection::Up;
    }
    let sum: i32 = notes
        .iter()
        .map(|n| cx.staff_y + pitch_position(n.pitch, clef, cx.staff.lines, &cx.m))
        .sum();
    let avg = sum / notes.len() as i32;
    let mid = staff_mid(cx.staff_y, cx.staff.lines, cx.staff.notation, &cx.m);
    if avg > mid {
        StemDirection::Down
    } else {
        StemDirection::Up
    }
}

/// A beamed member and the stem it gets from the beam.
#[derive(Debug, Clone)]
struct BeamMember {
    id: String,
    geometry: DrawnGeometry,
}

/// Horizontal extents of the beams at one flag level.
///
/// The first level spans every member. Deeper levels join consecutive
/// members that have that many flags; a lone member gets a stub one
/// interline long, pointing at its neighbour.
fn beam_segments(notes: &[BeamMember], level: u32, stub: i32) -> Vec<(i32, i32)> {
    let x = |i: usize| notes[i].geometry.stem_start.x;
    if level <= 1 {
        return match notes.len() {
            0 => Vec::new(),
            n => vec![(x(0), x(n - 1))],
        };
    }
    let mut segments = Vec::new();
    let mut i = 0;
    while i < notes.len() {
        if notes[i].geometry.flags < level {
            i += 1;
            continue;
        }
        let start = i;
        while i + 1 < notes.len() && notes[i + 1].geometry.flags >= level {
            i += 1;
        }
        if i > start {
            segments.push((x(start), x(i)));
        } else if start + 1 < notes.len() {
            segments.push((x(start), x(start) + stub));
        } else {
            segments.push((x(start) - stub, x(start)));
        }
        i += 1;
    }
    segments
}

impl<'a> View<'a> {
    pub(super) fn draw_beam(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, beam: &Beam, pass: &mut LayerPass) -> RenderResult<()> {
        let dir = beam_direction(cx, beam, pass.clef);
        let mut notes = Vec::new();
        collect_notes(&beam.children, &mut notes);
        let strokes = notes.iter().filter(|n| takes_beam(n)).count() >= 2;
        // Without a stroke the notes keep their own stems and flags
        let scope = if strokes {
            cx.scope.in_beam(dir)
        } else {
            cx.scope.with_beam_dir(dir)
        };
        let staff = cx.staff_ctx();
        for child in &beam.children {
            self.draw_element(dc, child, Some(&mut *pass), cx.measure, Some(&staff), scope)?;
        }
        if !strokes {
            log::debug!("beam {}: fewer than two flagged notes, drawn unbeamed", cx.element.id);
            return Ok(());
        }
        let mut members = Vec::new();
        collect_members(&beam.children, false, &mut members);
        pass.queue.push(DeferredDraw::BeamStroke {
            id: cx.element.id.clone(),
            members,
            color: cx.color(),
        });
        Ok(())
    }

    pub(super) fn draw_tuplet(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, tuplet: &Tuplet, pass: &mut LayerPass) -> RenderResult<()> {
        let staff = cx.staff_ctx();
        for child in &tuplet.children {
            self.draw_element(dc, child, Some(&mut *pass), cx.measure, Some(&staff), cx.scope)?;
        }
        let mut members = Vec::new();
        collect_members(&tuplet.children, true, &mut members);
        pass.queue.push(DeferredDraw::TupletBracket {
            id: cx.element.id.clone(),
            num: tuplet.num,
            numbase: tuplet.numbase,
            members,
            color: cx.color(),
        });
        Ok(())
    }

    // ── Deferred strokes ────────────────────────────────────────────

    /// Extend the members' stems to a common beam line and draw one beam
    /// per flag level.
    pub(super) fn draw_beam_stroke(&mut self, dc: &mut dyn DeviceContext, id: &str, members: &[String], m: &StaffMetrics, color: Color) {
        let notes: Vec<BeamMember> = members
            .iter()
            .filter_map(|mid| {
                self.drawn
                    .get(mid)
                    .filter(|g| g.stem_dir.is_some() && g.flags > 0)
                    .map(|g| BeamMember {
                        id: mid.clone(),
                        geometry: g.clone(),
                    })
            })
            .collect();
        let (Some(first), Some(last)) = (notes.first(), notes.last()) else {
            log::debug!("beam {id}: no stemmed members drawn");
            return;
        };
        if notes.len() < 2 {
            log::debug!("beam {id}: fewer than two stemmed members");
            return;
        }
        let up = first.geometry.stem_dir == Some(StemDirection::Up);

        let (fx, fy) = (first.geometry.stem_start.x, first.geometry.stem_end.y);
        let (lx, ly) = (last.geometry.stem_start.x, last.geometry.stem_end.y);
        let slope = if lx != fx {
            (f64::from(ly - fy) / f64::from(lx - fx)).clamp(-0.5, 0.5)
        } else {
            0.0
        };
        let line_y = |x: i32| fy + (slope * f64::from(x - fx)).round() as i32;

        // Shift the whole beam until every stem reaches the minimum length
        let min_stem = m.interline * 9 / 5;
        let mut shift = 0;
        for note in &notes {
            let start = note.geometry.stem_start;
            let by = line_y(start.x) + shift;
            let len = if up { by - start.y } else { start.y - by };
            if len < min_stem {
                if up {
                    shift += min_stem - len;
                } else {
                    shift -= min_stem - len;
                }
            }
        }
        let beam_y = |x: i32| line_y(x) + shift;

        dc.start_graphic("beam-stroke", id);
        for note in &notes {
            let start = note.geometry.stem_start;
            self.vertical_line(dc, start.x, start.y, beam_y(start.x), self.metrics.stem_width, color);
        }

        let toward_heads = if up { -m.beam_spacing } else { m.beam_spacing };
        let levels = notes.iter().map(|n| n.geometry.flags).max().unwrap_or(1);
        for level in 1..=levels {
            let offset = toward_heads * (level as i32 - 1);
            for (x1, x2) in beam_segments(&notes, level, m.interline) {
                let from = Point::new(x1, beam_y(x1) + offset);
                let to = Point::new(x2, beam_y(x2) + offset);
                self.line(dc, from, to, m.beam_width, color);
            }
        }
        dc.end_graphic("beam-stroke", id);

        for note in &notes {
            if let Some(g) = self.drawn.get_mut(&note.id) {
                g.stem_end = Point::new(g.stem_start.x, beam_y(g.stem_start.x));
            }
        }
    }

    /// Bracket beyond the members' stem ends with the tuplet number in a gap.
    pub(super) fn draw_tuplet_bracket(&mut self, dc: &mut dyn DeviceContext, id: &str, num: u32, numbase: u32, members: &[String], m: &StaffMetrics, color: Color) {
        let drawn: Vec<&DrawnGeometry> = members.iter().filter_map(|mid| self.drawn.get(mid)).collect();
        let (Some(first), Some(last)) = (drawn.first(), drawn.last()) else {
            log::debug!("tuplet {id}: no members drawn");
            return;
        };
        log::trace!("tuplet {id}: {num}:{numbase} over {} members", drawn.len());

        let ups = drawn.iter().filter(|g| g.stem_dir == Some(StemDirection::Up)).count();
        let downs = drawn.iter().filter(|g| g.stem_dir == Some(StemDirection::Down)).count();
        let above = ups >= downs;
        let ys = drawn.iter().flat_map(|g| [g.stem_start.y, g.stem_end.y]);
        let y = if above {
            ys.max().unwrap_or(first.y) + m.interline
        } else {
            ys.min().unwrap_or(first.y) - m.interline
        };
        let hook = if above { -m.half_interline } else { m.half_interline };

        let x1 = first.x - m.radius(first.cue);
        let x2 = last.x + m.radius(last.cue);
        let text = num.to_string();
        let size = m.interline * 3 / 2;
        let gap = dc.text_extent(&text, size).width + self.metrics.step1;
        let mid = (x1 + x2) / 2;
        let width = self.metrics.staff_line_width;

        dc.start_graphic("tuplet-bracket", id);
        self.horizontal_line(dc, x1, mid - gap / 2, y, width, color);
        self.horizontal_line(dc, mid + gap / 2, x2, y, width, color);
        self.vertical_line(dc, x1, y, y + hook, width, color);
        self.vertical_line(dc, x2, y, y + hook, width, color);
        self.centered_text(dc, &text, mid, y - size / 3, size, color);
        dc.end_graphic("tuplet-bracket", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str) -> Element {
        Element::new(id, 0, ElementKind::Note(Note::new(Pitch::new(PitchName::C, 5), Duration::Eighth)))
    }

    fn member(x: i32, flags: u32) -> BeamMember {
        let at = Point::new(x, 0);
        BeamMember {
            id: format!("n{x}"),
            geometry: DrawnGeometry {
                x,
                y: 0,
                stem_dir: Some(StemDirection::Up),
                stem_start: at,
                stem_end: at,
                flags,
                is_note: true,
                cue: false,
            },
        }
    }

    #[test]
    fn secondary_beams_join_runs_and_stub_loners() {
        let notes = vec![member(0, 2), member(100, 2), member(200, 1), member(300, 2)];
        assert_eq!(beam_segments(&notes, 1, 20), vec![(0, 300)]);
        assert_eq!(beam_segments(&notes, 2, 20), vec![(0, 100), (280, 300)]);
        assert!(beam_segments(&notes, 3, 20).is_empty());

        let leading = vec![member(0, 2), member(100, 1)];
        assert_eq!(beam_segments(&leading, 2, 20), vec![(0, 20)]);
    }

    #[test]
    fn members_include_nested_groups() {
        let rest = Element::new("r1", 0, ElementKind::Rest(Rest::new(Duration::Eighth)));
        let inner = Element::new(
            "t1",
            0,
            ElementKind::Tuplet(Tuplet {
                num: 3,
                numbase: 2,
                children: vec![note("n2"), rest, note("n3")],
            }),
        );
        let children = vec![note("n1"), inner];

        let mut notes_only = Vec::new();
        collect_members(&children, false, &mut notes_only);
        assert_eq!(notes_only, vec!["n1", "n2", "n3"]);

        let mut with_rests = Vec::new();
        collect_members(&children, true, &mut with_rests);
        assert_eq!(with_rests, vec!["n1", "n2", "r1", "n3"]);
    }
}
