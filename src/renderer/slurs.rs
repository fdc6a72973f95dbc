//! Tie and slur rendering (double-bezier filled shape).
//!
//! A curve whose notes sit in different systems is drawn in two halves: the
//! first note's system draws up to the end of its measure, the second note's
//! system draws a short lead-in ending on the second note.

use super::{StaffContext, View};
use crate::device::{BrushStyle, Color, DeviceContext, Point};
use crate::metrics::StaffMetrics;
use crate::model::{AlignmentKind, CurveKind, Measure, StemDirection};

const CURVE_HEIGHT_FACTOR: f64 = 0.15;
const CURVE_ENDPOINT_THICKNESS: i32 = 1;

/// End points of one curve, or of the half drawn in this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CurveSpan {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    stem_dir: Option<StemDirection>,
}

/// Curves bend away from the stem. Without a stem, notes above the
/// vertical centre of the staff get the curve above.
fn curve_above(stem_dir: Option<StemDirection>, y: i32, staff_y: i32, lines: u8, m: &StaffMetrics) -> bool {
    match stem_dir {
        Some(StemDirection::Up) => false,
        Some(StemDirection::Down) => true,
        None => y > staff_y - m.span(lines) / 2,
    }
}

/// Outer and inner bezier of a curve in logical units.
fn curve_shape(span: &CurveSpan, above: bool, m: &StaffMetrics) -> ([Point; 4], [Point; 4]) {
    let dir = if above { 1 } else { -1 };
    let dx = (span.x2 - span.x1).abs().max(1);
    let min_height = f64::from(m.interline / 4);
    let max_height = f64::from(m.interline * 5 / 4);
    let height = (f64::from(dx) * CURVE_HEIGHT_FACTOR).clamp(min_height, max_height) as i32;
    let mid_y = (span.y1 + span.y2) / 2;

    let cp1 = Point::new(span.x1 + dx / 4, mid_y + dir * height);
    let cp2 = Point::new(span.x1 + dx * 3 / 4, mid_y + dir * height);
    let outer = [Point::new(span.x1, span.y1), cp1, cp2, Point::new(span.x2, span.y2)];

    let ep = dir * CURVE_ENDPOINT_THICKNESS;
    let cp = dir * (m.interline * 3 / 20);
    let inner = [
        Point::new(span.x1, span.y1 + ep),
        Point::new(cp1.x, cp1.y + cp),
        Point::new(cp2.x, cp2.y + cp),
        Point::new(span.x2, span.y2 + ep),
    ];
    (outer, inner)
}

impl<'a> View<'a> {
    pub(super) fn draw_curve(
        &mut self,
        dc: &mut dyn DeviceContext,
        relation_id: &str,
        kind: CurveKind,
        measure: &Measure,
        staff: &StaffContext<'_>,
        m: &StaffMetrics,
        color: Color,
    ) {
        let Some(mut span) = self.resolve_curve(relation_id, measure, staff.system) else {
            return;
        };
        let above = curve_above(span.stem_dir, span.y1, staff.staff.drawing_y, staff.staff.lines, m);
        let bias = if above { m.interline * 7 / 10 } else { -(m.interline * 7 / 10) };
        span.y1 += bias;
        span.y2 += bias;

        let (outer, inner) = curve_shape(&span, above, m);
        let vp = self.viewport;
        let device = |p: Point| Point::new(vp.x(p.x), vp.y(p.y));
        let name = match kind {
            CurveKind::Tie => "tie",
            CurveKind::Slur => "slur",
        };
        dc.start_graphic(name, relation_id);
        dc.set_brush(color, BrushStyle::Solid);
        dc.draw_bezier_path(outer.map(device), inner.map(device));
        dc.reset_brush();
        dc.end_graphic(name, relation_id);
    }

    /// Find the part of a curve this system draws. None when a note or
    /// alignment marker it needs is missing.
    fn resolve_curve(&self, relation_id: &str, measure: &Measure, system: usize) -> Option<CurveSpan> {
        let Some(relation) = self.doc.relation(relation_id) else {
            log::debug!("curve {relation_id}: unknown relation");
            return None;
        };
        let first = self.location(&relation.first);
        let second = self.location(&relation.second);

        match (first, second) {
            // First half: from the first note to the end of its measure
            (Some(loc1), Some(loc2)) if loc2.system != system => {
                let Some(note1) = self.drawn(&relation.first) else {
                    log::debug!("curve {relation_id}: first note {} not drawn", relation.first);
                    return None;
                };
                let marker = loc1.alignment.and_then(|start| {
                    measure
                        .alignments
                        .iter()
                        .skip(start)
                        .find(|a| a.kind == AlignmentKind::MeasureEnd)
                });
                let Some(marker) = marker else {
                    log::debug!("curve {relation_id}: no measure end after {}", relation.first);
                    return None;
                };
                Some(CurveSpan {
                    x1: note1.x,
                    y1: note1.y,
                    x2: measure.drawing_x + marker.x_rel,
                    y2: note1.y,
                    stem_dir: note1.stem_dir,
                })
            }
            // Second half: a lead-in ending on the second note
            (Some(loc1), Some(loc2)) if loc1.system != system => {
                let Some(note2) = self.drawn(&relation.second) else {
                    log::debug!("curve {relation_id}: second note {} not drawn", relation.second);
                    return None;
                };
                let marker = loc2.alignment.and_then(|end| {
                    measure
                        .alignments
                        .get(..=end)
                        .and_then(|before| before.iter().rev().find(|a| a.kind != AlignmentKind::Default))
                });
                if marker.is_none() {
                    log::debug!("curve {relation_id}: no marker before {}", relation.second);
                    return None;
                }
                Some(CurveSpan {
                    x1: note2.x - self.metrics.step2,
                    y1: note2.y,
                    x2: note2.x,
                    y2: note2.y,
                    stem_dir: note2.stem_dir,
                })
            }
            (Some(_), Some(_)) => {
                let note1 = self.drawn(&relation.first);
                let note2 = self.drawn(&relation.second);
                let (Some(note1), Some(note2)) = (note1, note2) else {
                    log::debug!("curve {relation_id}: notes not drawn");
                    return None;
                };
                Some(CurveSpan {
                    x1: note1.x,
                    y1: note1.y,
                    x2: note2.x,
                    y2: note2.y,
                    stem_dir: note1.stem_dir,
                })
            }
            _ => {
                log::debug!("curve {relation_id}: note outside the document");
                None
            }
        }
    }
}
