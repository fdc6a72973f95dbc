//! Staff-level signs: barlines, clefs, key signatures, mensuration signs
//! and meter signatures.

use super::geometry::{clef_offset, pitch_position};
use super::glyphs::{clef_glyph, meter_glyph, ACCID_FLAT, ACCID_SHARP};
use super::{ElementCtx, View};
use crate::device::{BrushStyle, Color, DeviceContext, PenStyle};
use crate::metrics::StaffMetrics;
use crate::model::*;

// Key signature positions in half interlines from the top line of a treble staff
const SHARP_POSITIONS: [i32; 7] = [0, -3, 1, -2, -5, -1, -4];
const FLAT_POSITIONS: [i32; 7] = [-4, -1, -5, -2, -6, -3, -7];

/// Octave that places the i-th alteration of a key signature in the
/// standard window for the clef.
pub(super) fn keysig_octave(keysig: &KeySig, i: usize, clef: ClefId) -> i32 {
    let table = if keysig.alteration == Accidental::Flat {
        &FLAT_POSITIONS
    } else {
        &SHARP_POSITIONS
    };
    let offset = clef_offset(clef);
    let mut shift = offset.rem_euclid(7);
    if shift > 3 {
        shift -= 7;
    }
    let target = table[i.min(6)] + shift;
    let step = keysig.alteration_at(i).step();
    (target + 10 - offset - step).div_euclid(7) + 4
}

impl<'a> View<'a> {
    // ── Barline ─────────────────────────────────────────────────────

    pub(super) fn draw_barline(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, barline: &Barline) {
        let m = cx.m;
        let x = cx.x + cx.element.h_offset;
        let (top, bottom) = if barline.partial {
            (cx.staff_y, cx.staff_y - m.span(cx.staff.lines))
        } else {
            self.measure_extent(cx.measure, cx.staff_y, cx.staff_y - m.span(cx.staff.lines))
        };
        let width = self.metrics.staff_line_width;
        let color = cx.color();
        match barline.style {
            BarlineStyle::Single => self.vertical_line(dc, x, top, bottom, width, color),
            BarlineStyle::Double => {
                self.vertical_line(dc, x - m.half_interline, top, bottom, width, color);
                self.vertical_line(dc, x, top, bottom, width, color);
            }
            BarlineStyle::End => {
                let thick = m.half_interline;
                self.vertical_line(dc, x - thick - m.vertical_unit1, top, bottom, width, color);
                self.vertical_line(dc, x, top, bottom, thick, color);
            }
        }
    }

    /// Top of the first staff and bottom of the last staff of a measure.
    fn measure_extent(&self, measure: &Measure, top: i32, bottom: i32) -> (i32, i32) {
        measure.staves.iter().fold((top, bottom), |(top, bottom), staff| {
            let span = self
                .metrics
                .get(staff.size)
                .span(staff.lines);
            (top.max(staff.drawing_y), bottom.min(staff.drawing_y - span))
        })
    }

    // ── Clef ────────────────────────────────────────────────────────

    pub(super) fn draw_clef(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, clef: &Clef) {
        let m = cx.m;
        let glyph = clef_glyph(clef.id);
        let y = cx.staff_y - glyph.shift * m.interline;
        let mut x = cx.x - self.metrics.step1 * 2;
        if clef.cue {
            x += self.metrics.step1;
        }
        self.glyph(dc, glyph.code, x, y, &m, clef.cue, cx.color());
    }

    // ── Key signature ───────────────────────────────────────────────

    pub(super) fn draw_keysig(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, keysig: &KeySig, clef: Option<ClefId>) {
        let Some(clef) = clef else {
            log::debug!("key signature {} skipped: no clef in effect", cx.element.id);
            return;
        };
        let m = cx.m;
        let code = if keysig.alteration == Accidental::Flat {
            ACCID_FLAT
        } else {
            ACCID_SHARP
        };
        for i in 0..keysig.alteration_count() {
            let x = cx.x + (m.accid_width[0] + 5) * i as i32;
            let pitch = Pitch::new(keysig.alteration_at(i), keysig_octave(keysig, i, clef));
            let y = cx.staff_y + pitch_position(pitch, Some(clef), cx.staff.lines, &m);
            self.glyph(dc, code, x, y, &m, false, cx.color());
        }
    }

    // ── Mensuration ─────────────────────────────────────────────────

    pub(super) fn draw_mensur(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, mensur: &Mensur) {
        let m = cx.m;
        let color = cx.color();
        let (x, y) = (cx.x, cx.staff_y);
        match mensur.sign {
            Some(MensurSign::O) => self.mensur_circle(dc, x, y, &m, color),
            Some(MensurSign::C) if mensur.reversed => self.mensur_half_circle(dc, x, y, &m, color, true),
            Some(MensurSign::C) => self.mensur_half_circle(dc, x, y, &m, color, false),
            None => {}
        }
        if mensur.slash {
            self.vertical_line(dc, x, y, y - m.span(cx.staff.lines), 3, color);
        }
        if mensur.dot {
            self.mensur_dot(dc, x, y, &m, color);
        }
        if let Some(num) = mensur.num {
            let mut fx = x;
            if mensur.sign.is_some() {
                fx += self.metrics.step1 * 5;
            }
            self.draw_figures(dc, fx, y, num, mensur.numbase, &m, color);
        }
    }

    fn mensur_pen_width(&self) -> i32 {
        self.viewport.x(4).max(2)
    }

    fn mensur_circle(&self, dc: &mut dyn DeviceContext, x: i32, staff_y: i32, m: &StaffMetrics, color: Color) {
        let vp = self.viewport;
        dc.set_pen(color, self.mensur_pen_width(), PenStyle::Solid);
        dc.set_brush(color, BrushStyle::Transparent);
        dc.draw_circle(vp.x(x), vp.y(staff_y - m.interline * 2), vp.x(m.interline));
        dc.reset_brush();
        dc.reset_pen();
    }

    fn mensur_half_circle(&self, dc: &mut dyn DeviceContext, x: i32, staff_y: i32, m: &StaffMetrics, color: Color, reversed: bool) {
        let vp = self.viewport;
        let r = vp.x(m.interline);
        let y = vp.y(staff_y - m.interline);
        dc.set_pen(color, self.mensur_pen_width(), PenStyle::Solid);
        dc.set_brush(color, BrushStyle::Transparent);
        if reversed {
            dc.draw_elliptic_arc(vp.x(x) - 4 * r / 3, y, 2 * r, 2 * r, 250.0, 110.0);
        } else {
            dc.draw_elliptic_arc(vp.x(x) - r, y, 2 * r, 2 * r, 70.0, 290.0);
        }
        dc.reset_brush();
        dc.reset_pen();
    }

    fn mensur_dot(&self, dc: &mut dyn DeviceContext, x: i32, staff_y: i32, m: &StaffMetrics, color: Color) {
        let vp = self.viewport;
        let r = self.mensur_pen_width();
        dc.set_pen(color, 1, PenStyle::Solid);
        dc.set_brush(color, BrushStyle::Solid);
        dc.draw_circle(vp.x(x) - r / 2, vp.y(staff_y - m.interline * 2), r);
        dc.reset_brush();
        dc.reset_pen();
    }

    /// Numerator over an optional denominator, each centred at x.
    fn draw_figures(&self, dc: &mut dyn DeviceContext, x: i32, staff_y: i32, num: u32, numbase: Option<u32>, m: &StaffMetrics, color: Color) {
        let (ynum, yden) = match numbase {
            Some(_) => {
                let ynum = staff_y - m.half_interline * 4;
                (ynum, ynum - m.interline * 2)
            }
            None => (staff_y - m.half_interline * 6, 0),
        };
        let mut x = x;
        if num > 9 || numbase.is_some_and(|d| d > 9) {
            x += self.metrics.step1 * 2;
        }
        let size = m.interline * 2;
        self.centered_text(dc, &num.to_string(), x, ynum, size, color);
        if let Some(den) = numbase {
            self.centered_text(dc, &den.to_string(), x, yden, size, color);
        }
    }

    // ── Meter signature ─────────────────────────────────────────────

    pub(super) fn draw_meter_sig(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, meter: &MeterSig) {
        let m = cx.m;
        let color = cx.color();
        let y = cx.staff_y - m.half_interline * 6;
        let mut x = cx.x;
        if let Some(sym) = meter.sym {
            self.glyph(dc, meter_glyph(sym), cx.x, y, &m, false, color);
            x += self.metrics.step1 * 5;
        }
        if let Some(count) = meter.count {
            self.draw_figures(dc, x, cx.staff_y, count, meter.unit, &m, color);
        }
    }
}
