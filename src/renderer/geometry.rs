//! Pitch to vertical offset, rest positions, ledger lines and the
//! logical to device conversion.
//!
//! Logical y grows upwards; a staff's drawing y is its top line.

use crate::config::Ratio;
use crate::metrics::StaffMetrics;
use crate::model::{ClefId, Duration, NotationStyle, Pitch};

/// Number of half interlines from the reference position for each clef.
pub(super) fn clef_offset(clef: ClefId) -> i32 {
    match clef {
        ClefId::G1 => -2,
        ClefId::G2 => 0,
        ClefId::G2va => -7,
        ClefId::G2vb => 7,
        ClefId::F3 => 10,
        ClefId::F4 => 12,
        ClefId::F5 => 14,
        ClefId::C1 => 2,
        ClefId::C2 => 4,
        ClefId::C3 => 6,
        ClefId::C4 => 8,
        ClefId::C5 => 10,
        ClefId::Perc => 6,
    }
}

/// Offset of a pitch from the top staff line. Negative values lie below it.
pub(super) fn pitch_position(pitch: Pitch, clef: Option<ClefId>, lines: u8, m: &StaffMetrics) -> i32 {
    let offset = clef.map_or(0, clef_offset);
    let steps = pitch.pname.step() + 7 * (pitch.oct - 4) + offset - 10;
    let mut pos = steps * m.half_interline;
    if lines > 5 {
        pos -= (i32::from(lines) - 5) * 2 * m.half_interline;
    }
    pos
}

/// Y of the staff's middle line, raised half an interline in mensural notation.
pub(super) fn staff_mid(staff_y: i32, lines: u8, notation: NotationStyle, m: &StaffMetrics) -> i32 {
    let mut mid = staff_y - m.span(lines) / 2;
    if notation == NotationStyle::Mensural {
        mid += m.half_interline;
    }
    mid
}

/// Standard rest position for a duration, relative to the staff's middle line.
pub(super) fn rest_auto_position(dur: Duration, mid: i32, m: &StaffMetrics) -> i32 {
    match dur {
        Duration::Long => mid - m.interline,
        Duration::Breve => mid,
        Duration::Whole => mid + m.interline,
        Duration::Half => mid,
        Duration::Quarter | Duration::Eighth | Duration::Sixteenth | Duration::ThirtySecond => mid,
        Duration::SixtyFourth | Duration::HundredTwentyEighth => mid - m.interline,
    }
}

/// Y positions of the ledger lines a note at `y` needs, nearest the staff first.
///
/// Nothing is returned while the note stays within half an interline of the
/// outer staff lines.
pub(super) fn ledger_lines(y: i32, staff_y: i32, lines: u8, m: &StaffMetrics) -> Vec<i32> {
    let top = staff_y;
    let bottom = staff_y - m.span(lines);
    if y <= top + m.half_interline && y >= bottom - m.half_interline {
        return Vec::new();
    }
    let (dist, toward) = if y > top { (y - top, 1) } else { (bottom - y, -1) };
    let count = dist / m.interline;
    let base = if toward > 0 { top } else { bottom };
    (1..=count).map(|k| base + toward * k * m.interline).collect()
}

/// Maps logical coordinates to device space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Viewport {
    pub(super) zoom: Ratio,
    pub(super) page_height: i32,
}

impl Viewport {
    /// Horizontal positions and all lengths.
    pub(super) fn x(&self, x: i32) -> i32 {
        self.zoom.apply(x)
    }

    pub(super) fn y(&self, y: i32) -> i32 {
        self.zoom.apply(self.page_height - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::metrics::DrawingMetrics;
    use crate::model::{PitchName, StaffSize};

    fn metrics() -> StaffMetrics {
        *DrawingMetrics::from_options(&RenderOptions::default())
            .get(StaffSize::Normal)
    }

    #[test]
    fn treble_clef_pitch_positions() {
        let m = metrics();
        let g2 = Some(ClefId::G2);
        assert_eq!(pitch_position(Pitch::new(PitchName::F, 5), g2, 5, &m), 0);
        assert_eq!(pitch_position(Pitch::new(PitchName::B, 4), g2, 5, &m), -40);
        assert_eq!(pitch_position(Pitch::new(PitchName::E, 4), g2, 5, &m), -80);
        assert_eq!(pitch_position(Pitch::new(PitchName::C, 4), g2, 5, &m), -100);
    }

    #[test]
    fn bass_clef_middle_line_is_d3() {
        let m = metrics();
        assert_eq!(pitch_position(Pitch::new(PitchName::D, 3), Some(ClefId::F4), 5, &m), -40);
        assert_eq!(pitch_position(Pitch::new(PitchName::C, 4), Some(ClefId::C3), 5, &m), -40);
    }

    #[test]
    fn extra_staff_lines_shift_positions_down() {
        let m = metrics();
        let five = pitch_position(Pitch::new(PitchName::G, 4), Some(ClefId::G2), 5, &m);
        let six = pitch_position(Pitch::new(PitchName::G, 4), Some(ClefId::G2), 6, &m);
        assert_eq!(five - six, m.interline);
    }

    #[test]
    fn mensural_mid_line_is_raised() {
        let m = metrics();
        assert_eq!(staff_mid(1000, 5, NotationStyle::Modern, &m), 960);
        assert_eq!(staff_mid(1000, 5, NotationStyle::Mensural, &m), 970);
    }

    #[test]
    fn no_ledger_lines_inside_staff() {
        let m = metrics();
        for y in (920..=1010).step_by(10) {
            assert!(ledger_lines(y, 1000, 5, &m).is_empty(), "y = {y}");
        }
    }

    #[test]
    fn ledger_count_is_distance_over_interline() {
        let m = metrics();
        assert_eq!(ledger_lines(1020, 1000, 5, &m), vec![1020]);
        assert_eq!(ledger_lines(1030, 1000, 5, &m), vec![1020]);
        assert_eq!(ledger_lines(1040, 1000, 5, &m), vec![1020, 1040]);
        assert_eq!(ledger_lines(900, 1000, 5, &m), vec![900]);
        assert_eq!(ledger_lines(870, 1000, 5, &m), vec![900, 880]);
    }

    #[test]
    fn viewport_flips_y() {
        let vp = Viewport { zoom: Ratio::new(1, 2), page_height: 2000 };
        assert_eq!(vp.x(100), 50);
        assert_eq!(vp.y(1500), 250);
    }
}
