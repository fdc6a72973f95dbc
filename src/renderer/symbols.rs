//! Accidental, custos and dot symbols.

use super::geometry::pitch_position;
use super::glyphs::{accidental_glyph, ACCID_FLAT, ACCID_SHARP, CUSTOS};
use super::{ElementCtx, View};
use crate::device::{Color, DeviceContext};
use crate::metrics::StaffMetrics;
use crate::model::{Accidental, ClefId, NotationStyle, Symbol, SymbolKind};

/// An accidental to stamp at a resolved position.
#[derive(Debug, Clone, Copy)]
pub(super) struct AccidentalDraw {
    pub(super) accid: Accidental,
    pub(super) x: i32,
    pub(super) y: i32,
    pub(super) cue: bool,
    /// Historical notation stacks two single glyphs for double accidentals
    pub(super) mensural: bool,
}

impl<'a> View<'a> {
    pub(super) fn draw_symbol(&mut self, dc: &mut dyn DeviceContext, cx: &ElementCtx, symbol: &Symbol, clef: Option<ClefId>) {
        let m = cx.m;
        let color = cx.color();
        let x = cx.x + cx.element.h_offset;
        let y = cx.staff_y + pitch_position(symbol.kind.pitch(), clef, cx.staff.lines, &m);

        match &symbol.kind {
            SymbolKind::Accid { accid, .. } => {
                let draw = AccidentalDraw {
                    accid: *accid,
                    x,
                    y,
                    cue: symbol.cue,
                    mensural: cx.staff.notation == NotationStyle::Mensural,
                };
                self.draw_accidental(dc, &draw, &m, color);
            }
            SymbolKind::Custos { .. } => {
                let y = y - (m.half_interline - m.vertical_unit2);
                self.glyph(dc, CUSTOS, x, y, &m, symbol.cue, color);
            }
            SymbolKind::Dot { count, .. } => {
                let spacing = self.metrics.step1.max(6);
                for i in 0..i32::from((*count).clamp(1, 2)) {
                    self.dot(dc, x + i * spacing, y, &m, color);
                }
            }
        }
    }

    pub(super) fn draw_accidental(&self, dc: &mut dyn DeviceContext, draw: &AccidentalDraw, m: &StaffMetrics, color: Color) {
        let stacked = match draw.accid {
            Accidental::DoubleSharp if draw.mensural => Some(ACCID_SHARP),
            Accidental::DoubleFlat if draw.mensural => Some(ACCID_FLAT),
            _ => None,
        };
        match stacked {
            Some(code) => {
                self.glyph(dc, code, draw.x, draw.y, m, draw.cue, color);
                let upper = draw.y + 7 * m.half_interline;
                self.glyph(dc, code, draw.x, upper, m, draw.cue, color);
            }
            None => self.glyph(dc, accidental_glyph(draw.accid), draw.x, draw.y, m, draw.cue, color),
        }
    }
}
