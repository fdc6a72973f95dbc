//! SMuFL code points and the duration to glyph resolver.

use crate::model::{Accidental, ClefId, Duration, MeterSym};

// ── Noteheads ───────────────────────────────────────────────────────
pub(super) const NOTEHEAD_WHOLE: u32 = 0xE0A2;
pub(super) const NOTEHEAD_HALF: u32 = 0xE0A3;
pub(super) const NOTEHEAD_BLACK: u32 = 0xE0A4;
pub(super) const NOTEHEAD_WHOLE_FILLED: u32 = 0xE0FA;

// ── Flags ───────────────────────────────────────────────────────────
pub(super) const FLAG_8TH_UP: u32 = 0xE240;
pub(super) const FLAG_8TH_DOWN: u32 = 0xE241;

// ── Rests ───────────────────────────────────────────────────────────
pub(super) const REST_QUARTER: u32 = 0xE4E5;

// ── Clefs ───────────────────────────────────────────────────────────
pub(super) const G_CLEF: u32 = 0xE050;
pub(super) const G_CLEF_8VB: u32 = 0xE052;
pub(super) const G_CLEF_8VA: u32 = 0xE053;
pub(super) const C_CLEF: u32 = 0xE05C;
pub(super) const F_CLEF: u32 = 0xE062;
pub(super) const PERC_CLEF: u32 = 0xE069;

// ── Accidentals ─────────────────────────────────────────────────────
pub(super) const ACCID_FLAT: u32 = 0xE260;
pub(super) const ACCID_NATURAL: u32 = 0xE261;
pub(super) const ACCID_SHARP: u32 = 0xE262;
pub(super) const ACCID_DOUBLE_SHARP: u32 = 0xE263;
pub(super) const ACCID_DOUBLE_FLAT: u32 = 0xE264;
pub(super) const ACCID_QUARTER_SHARP: u32 = 0xE282;
pub(super) const ACCID_QUARTER_FLAT: u32 = 0xE284;

// ── Ornaments, signatures, misc ─────────────────────────────────────
pub(super) const FERMATA_ABOVE: u32 = 0xE4C0;
pub(super) const TRILL: u32 = 0xE566;
pub(super) const CUSTOS: u32 = 0xE930;
pub(super) const TIME_SIG_COMMON: u32 = 0xE08A;
pub(super) const TIME_SIG_CUT: u32 = 0xE08B;

/// Drawing duration: coloration turns a half-or-shorter value one class shorter.
pub(super) fn formal_duration(dur: Duration, colored: bool) -> Duration {
    if colored && dur > Duration::Whole {
        dur.shorter()
    } else {
        dur
    }
}

/// Notehead for a duration drawn by the standard note path.
pub(super) fn notehead_glyph(dur: Duration, colored: bool) -> u32 {
    if dur == Duration::Whole {
        if colored {
            NOTEHEAD_WHOLE_FILLED
        } else {
            NOTEHEAD_WHOLE
        }
    } else if colored || formal_duration(dur, colored) == Duration::Half {
        NOTEHEAD_HALF
    } else {
        NOTEHEAD_BLACK
    }
}

/// Stamped rest glyph for quarter and shorter rests.
pub(super) fn rest_glyph(dur: Duration) -> Option<u32> {
    if dur < Duration::Quarter {
        return None;
    }
    Some(REST_QUARTER + (dur.index() - Duration::Quarter.index()) as u32)
}

pub(super) fn flag_glyph(up: bool) -> u32 {
    if up {
        FLAG_8TH_UP
    } else {
        FLAG_8TH_DOWN
    }
}

/// Glyph code and vertical shift, in interlines below the top line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ClefGlyph {
    pub(super) code: u32,
    pub(super) shift: i32,
}

pub(super) fn clef_glyph(clef: ClefId) -> ClefGlyph {
    let (code, shift) = match clef {
        ClefId::G1 => (G_CLEF, 4),
        ClefId::G2 => (G_CLEF, 3),
        ClefId::G2va => (G_CLEF_8VA, 3),
        ClefId::G2vb => (G_CLEF_8VB, 3),
        ClefId::C1 => (C_CLEF, 4),
        ClefId::C2 => (C_CLEF, 3),
        ClefId::C3 => (C_CLEF, 2),
        ClefId::C4 => (C_CLEF, 1),
        ClefId::C5 => (C_CLEF, 0),
        ClefId::F3 => (F_CLEF, 2),
        ClefId::F4 => (F_CLEF, 1),
        ClefId::F5 => (F_CLEF, 0),
        ClefId::Perc => (PERC_CLEF, 2),
    };
    ClefGlyph { code, shift }
}

pub(super) fn accidental_glyph(accid: Accidental) -> u32 {
    match accid {
        Accidental::Natural => ACCID_NATURAL,
        Accidental::Sharp => ACCID_SHARP,
        Accidental::Flat => ACCID_FLAT,
        Accidental::DoubleSharp => ACCID_DOUBLE_SHARP,
        Accidental::DoubleFlat => ACCID_DOUBLE_FLAT,
        Accidental::QuarterSharp => ACCID_QUARTER_SHARP,
        Accidental::QuarterFlat => ACCID_QUARTER_FLAT,
    }
}

pub(super) fn meter_glyph(sym: MeterSym) -> u32 {
    match sym {
        MeterSym::Common => TIME_SIG_COMMON,
        MeterSym::Cut => TIME_SIG_CUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Duration::*;

    #[test]
    fn rest_glyphs_follow_duration_order() {
        let shorts = [Quarter, Eighth, Sixteenth, ThirtySecond, SixtyFourth, HundredTwentyEighth];
        let codes: Vec<u32> = shorts.iter().map(|d| rest_glyph(*d).unwrap()).collect();
        assert_eq!(codes, vec![0xE4E5, 0xE4E6, 0xE4E7, 0xE4E8, 0xE4E9, 0xE4EA]);
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(rest_glyph(Half), None);
        assert_eq!(rest_glyph(Long), None);
    }

    #[test]
    fn noteheads_by_duration_and_coloration() {
        assert_eq!(notehead_glyph(Whole, false), NOTEHEAD_WHOLE);
        assert_eq!(notehead_glyph(Whole, true), NOTEHEAD_WHOLE_FILLED);
        assert_eq!(notehead_glyph(Half, false), NOTEHEAD_HALF);
        assert_eq!(notehead_glyph(Quarter, false), NOTEHEAD_BLACK);
        // colored quarters read as eighths but keep an open head
        assert_eq!(notehead_glyph(Quarter, true), NOTEHEAD_HALF);
        assert_eq!(formal_duration(Quarter, true), Eighth);
        assert_eq!(formal_duration(Whole, true), Whole);
    }

    #[test]
    fn clefs_sharing_a_glyph_differ_by_shift() {
        assert_eq!(clef_glyph(ClefId::G1).code, clef_glyph(ClefId::G2).code);
        assert_eq!(clef_glyph(ClefId::G1).shift, 4);
        assert_eq!(clef_glyph(ClefId::G2).shift, 3);
        assert_eq!(clef_glyph(ClefId::C3), ClefGlyph { code: C_CLEF, shift: 2 });
        assert_eq!(clef_glyph(ClefId::F4), ClefGlyph { code: F_CLEF, shift: 1 });
    }
}
