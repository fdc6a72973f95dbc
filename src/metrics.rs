//! Precomputed drawing metrics, indexed by staff size class.
//!
//! All values are logical units. Per-cue arrays are indexed `[normal, cue]`.

use crate::config::{Ratio, RenderOptions};
use crate::model::{Staff, StaffSize};

/// Metrics for one staff size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffMetrics {
    pub interline: i32,
    pub half_interline: i32,
    /// Distance between the top and bottom line of a five-line staff
    pub staff_height: i32,
    pub note_radius: [i32; 2],
    /// Half-length of a ledger line: normal, cue, whole and longer
    pub ledger_line: [i32; 3],
    pub accid_width: [i32; 2],
    /// A quarter of an interline
    pub vertical_unit1: i32,
    /// Three eighths of an interline
    pub vertical_unit2: i32,
    pub font_size: [i32; 2],
    pub beam_width: i32,
    pub beam_spacing: i32,
}

impl StaffMetrics {
    fn for_interline(interline: i32, grace: Ratio) -> Self {
        let radius = interline * 3 / 5;
        let ledger = interline * 9 / 10;
        let accid = interline * 9 / 10;
        let font = interline * 4;
        Self {
            interline,
            half_interline: interline / 2,
            staff_height: interline * 4,
            note_radius: [radius, grace.apply(radius)],
            ledger_line: [ledger, grace.apply(ledger), ledger * 4 / 3],
            accid_width: [accid, grace.apply(accid)],
            vertical_unit1: interline / 4,
            vertical_unit2: interline * 3 / 8,
            font_size: [font, grace.apply(font)],
            beam_width: interline / 2,
            beam_spacing: interline * 3 / 4,
        }
    }

    /// Distance between the top and bottom line of a staff with `lines` lines.
    pub fn span(&self, lines: u8) -> i32 {
        (i32::from(lines) - 1).max(0) * self.interline
    }

    pub fn radius(&self, cue: bool) -> i32 {
        self.note_radius[cue as usize]
    }

    pub fn accid(&self, cue: bool) -> i32 {
        self.accid_width[cue as usize]
    }

    pub fn font(&self, cue: bool) -> i32 {
        self.font_size[cue as usize]
    }
}

/// The full metrics table plus size-independent values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingMetrics {
    rows: [StaffMetrics; 2],
    /// Horizontal step used for spacing relative to noteheads
    pub step1: i32,
    pub step2: i32,
    pub stem_width: i32,
    pub staff_line_width: i32,
    pub grace_ratio: Ratio,
}

impl DrawingMetrics {
    pub fn from_options(options: &RenderOptions) -> Self {
        let normal = options.interline;
        let small = options.small_staff_ratio.apply(normal);
        let rows = [
            StaffMetrics::for_interline(normal, options.grace_ratio),
            StaffMetrics::for_interline(small, options.grace_ratio),
        ];
        let step1 = normal / 2;
        Self {
            rows,
            step1,
            step2: step1 * 3,
            stem_width: options.stem_width,
            staff_line_width: options.staff_line_width,
            grace_ratio: options.grace_ratio,
        }
    }

    pub fn get(&self, size: StaffSize) -> &StaffMetrics {
        &self.rows[size.index()]
    }

    pub fn for_staff(&self, staff: &Staff) -> &StaffMetrics {
        self.get(staff.size)
    }
}
