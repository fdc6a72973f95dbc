//! Stem direction, stem endpoints and flag stacking.

use crate::device::Point;
use crate::metrics::StaffMetrics;
use crate::model::{Duration, StemDirection};

/// Direction for a stem: explicit annotation, then the enclosing beam's
/// direction, then position against the mid-line. A note on the mid-line
/// gets an up stem.
pub(super) fn resolve_direction(
    explicit: Option<StemDirection>,
    inherited: Option<StemDirection>,
    y: i32,
    mid: i32,
) -> StemDirection {
    explicit.or(inherited).unwrap_or(if y > mid {
        StemDirection::Down
    } else {
        StemDirection::Up
    })
}

#[derive(Debug, Clone, Copy)]
pub(super) struct StemInput {
    /// Notehead centre, horizontal offset included
    pub(super) x: i32,
    pub(super) y: i32,
    pub(super) formal: Duration,
    pub(super) cue: bool,
    pub(super) direction: StemDirection,
    pub(super) mensural: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StemLayout {
    pub(super) direction: StemDirection,
    pub(super) start: Point,
    pub(super) end: Point,
    /// Flag anchors, innermost first
    pub(super) flags: Vec<Point>,
}

/// Compute the stem and flags for a note shorter than a whole.
pub(super) fn layout_stem(input: &StemInput, m: &StaffMetrics, stem_width: i32) -> StemLayout {
    let up = input.direction == StemDirection::Up;
    let head_radius = m.radius(input.cue);
    let mut espac7 = if input.cue { m.half_interline * 5 } else { m.half_interline * 7 };
    let vertical = if input.cue { m.half_interline } else { m.interline };
    let valdec = input.formal.index() - Duration::Eighth.index();
    let mut decval = vertical * valdec;
    let mut radius = head_radius - stem_width / 2;
    if !up {
        espac7 = -espac7;
        decval = -decval;
        radius = -radius;
    }

    let mut y2 = if input.formal > Duration::Eighth {
        input.y + espac7 + decval
    } else {
        input.y + espac7
    };
    if input.formal > Duration::Eighth {
        // sixteenths and shorter pull back toward the head
        if up {
            y2 -= m.half_interline;
        } else {
            y2 += m.half_interline;
        }
    }

    if input.mensural {
        radius = 0;
    }
    let x2 = input.x + radius;
    let head_gap = if input.mensural { m.half_interline } else { m.vertical_unit2 };
    let start_y = if up { input.y + head_gap } else { input.y - head_gap };
    let stem_x = x2 - stem_width / 2;

    let count = input.formal.steps_below_quarter() as i32;
    let flags = if count > 0 {
        let (fx, outer, step) = if up {
            (x2, y2 + stem_width / 2, -vertical)
        } else {
            (x2 - (head_radius + stem_width / 2), y2 - stem_width / 2, vertical)
        };
        (0..count).rev().map(|k| Point::new(fx, outer + step * k)).collect()
    } else {
        Vec::new()
    };

    StemLayout {
        direction: input.direction,
        start: Point::new(stem_x, start_y),
        end: Point::new(stem_x, y2),
        flags,
    }
}

/// End points of the grace slash across a stem, starting from the stem start.
pub(super) fn acciaccatura_slash(stem_start: Point, direction: StemDirection, m: &StaffMetrics) -> (Point, Point) {
    let sign = if direction == StemDirection::Up { 1 } else { -1 };
    (
        Point::new(stem_start.x - m.half_interline, stem_start.y + sign * m.half_interline),
        Point::new(stem_start.x + m.interline, stem_start.y + sign * 2 * m.interline),
    )
}
