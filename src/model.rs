//! Data model for a laid-out notation document.
//!
//! These structures arrive fully formed from the import and layout passes:
//! every measure already carries its drawing x, every staff its drawing y,
//! and every element its relative (or absolute) horizontal position. The
//! renderer reads them and never mutates them.

use serde::{Deserialize, Serialize};

/// How element x positions are expressed in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Positions come from the layout pass, relative to the measure.
    #[default]
    Raw,
    /// Positions are fixed page coordinates (facsimile-aligned transcription).
    Transcription,
}

/// A complete document ready for drawing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Document {
    pub kind: DocumentKind,
    pub pages: Vec<Page>,
    /// Ties and slurs, referenced from notes by id
    #[serde(default)]
    pub relations: Vec<CurveRelation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Page {
    pub id: String,
    pub systems: Vec<System>,
}

/// One line of music on a page.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct System {
    pub id: String,
    pub measures: Vec<Measure>,
}

/// A measure with its horizontal placement and alignment markers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Measure {
    pub id: String,
    /// Left edge of the measure in logical units
    pub drawing_x: i32,
    /// Position of the right barline, relative to `drawing_x`
    pub right_barline_x: i32,
    /// Horizontal alignment markers computed by the layout pass, in order
    #[serde(default)]
    pub alignments: Vec<Alignment>,
    pub staves: Vec<Staff>,
}

/// A horizontal alignment marker inside a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub kind: AlignmentKind,
    /// Offset from the measure's drawing x
    pub x_rel: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    MeasureStart,
    /// An ordinary event column (notes, rests)
    Default,
    Clef,
    KeySig,
    MeterSig,
    MeasureEnd,
}

/// Staff size class, indexing the metrics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffSize {
    #[default]
    Normal,
    Small,
}

impl StaffSize {
    pub fn index(self) -> usize {
        match self {
            StaffSize::Normal => 0,
            StaffSize::Small => 1,
        }
    }
}

/// Spacing rules applied on a staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotationStyle {
    #[default]
    Modern,
    /// Historical (mensural) spacing: centred stems, raised mid-line
    Mensural,
}

/// A staff within one measure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Staff {
    pub id: String,
    pub n: u32,
    #[serde(default)]
    pub size: StaffSize,
    /// Number of staff lines (5 for common notation)
    pub lines: u8,
    /// Y of the top staff line, y axis pointing up
    pub drawing_y: i32,
    #[serde(default)]
    pub notation: NotationStyle,
    pub layers: Vec<Layer>,
}

/// One voice on a staff.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Layer {
    pub id: String,
    pub n: u32,
    /// Clef in effect when the layer starts
    pub clef: Option<ClefId>,
    pub elements: Vec<Element>,
}

/// A positioned element of a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    /// Offset from the measure's drawing x (raw documents)
    #[serde(default)]
    pub x_rel: i32,
    /// Fixed page x (transcription documents)
    #[serde(default)]
    pub x_abs: Option<i32>,
    /// Manual horizontal nudge applied when drawing
    #[serde(default)]
    pub h_offset: i32,
    /// Index into the measure's alignment markers
    #[serde(default)]
    pub alignment: Option<usize>,
    pub kind: ElementKind,
}

/// Closed set of element variants the renderer knows how to draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Barline(Barline),
    Beam(Beam),
    Clef(Clef),
    KeySig(KeySig),
    Mensur(Mensur),
    MeterSig(MeterSig),
    MRest(MRest),
    MultiRest(MultiRest),
    Note(Note),
    Rest(Rest),
    Symbol(Symbol),
    Tuplet(Tuplet),
    App(LayerApp),
}

impl ElementKind {
    /// Name used for the element's graphic group.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Barline(_) => "barline",
            ElementKind::Beam(_) => "beam",
            ElementKind::Clef(_) => "clef",
            ElementKind::KeySig(_) => "keysig",
            ElementKind::Mensur(_) => "mensur",
            ElementKind::MeterSig(_) => "meterSig",
            ElementKind::MRest(_) => "mrest",
            ElementKind::MultiRest(_) => "multirest",
            ElementKind::Note(_) => "note",
            ElementKind::Rest(_) => "rest",
            ElementKind::Symbol(s) => s.kind.name(),
            ElementKind::Tuplet(_) => "tuplet",
            ElementKind::App(_) => "app",
        }
    }
}

/// Duration class, longest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Duration {
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "breve")]
    Breve,
    #[serde(rename = "1")]
    Whole,
    #[serde(rename = "2")]
    Half,
    #[serde(rename = "4")]
    Quarter,
    #[serde(rename = "8")]
    Eighth,
    #[serde(rename = "16")]
    Sixteenth,
    #[serde(rename = "32")]
    ThirtySecond,
    #[serde(rename = "64")]
    SixtyFourth,
    #[serde(rename = "128")]
    HundredTwentyEighth,
}

impl Duration {
    pub const ALL: [Duration; 10] = [
        Duration::Long,
        Duration::Breve,
        Duration::Whole,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
        Duration::Sixteenth,
        Duration::ThirtySecond,
        Duration::SixtyFourth,
        Duration::HundredTwentyEighth,
    ];

    /// Position in the ordering, 0 for the longest class.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// The next shorter class, saturating at the shortest.
    pub fn shorter(self) -> Duration {
        let next = (self.index() + 1) as usize;
        Duration::ALL[next.min(Duration::ALL.len() - 1)]
    }

    /// Number of classes between this one and the quarter (0 for quarter and longer).
    pub fn steps_below_quarter(self) -> u32 {
        (self.index() - Duration::Quarter.index()).max(0) as u32
    }
}

/// Diatonic pitch name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchName {
    /// Diatonic step within the octave, C = 0.
    pub fn step(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub pname: PitchName,
    /// Octave number (middle C = C4)
    pub oct: i32,
}

impl Pitch {
    pub fn new(pname: PitchName, oct: i32) -> Self {
        Self { pname, oct }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
    QuarterSharp,
    QuarterFlat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Embellishment {
    Trill,
    Mordent,
}

/// Tie or slur ids anchored at a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveEnds {
    /// Relation starting at this note
    pub initial: Option<String>,
    /// Relation ending at this note
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub dur: Duration,
    #[serde(default)]
    pub dots: u8,
    /// Rhythmic coloration
    #[serde(default)]
    pub colored: bool,
    #[serde(default)]
    pub cue: bool,
    #[serde(default)]
    pub acciaccatura: bool,
    /// Part of a ligature (historical notation)
    #[serde(default)]
    pub ligature: bool,
    /// Explicit stem direction
    #[serde(default)]
    pub stem_dir: Option<StemDirection>,
    /// Note drawn without a stem
    #[serde(default)]
    pub stemless: bool,
    #[serde(default)]
    pub accid: Option<Accidental>,
    #[serde(default)]
    pub fermata: bool,
    #[serde(default)]
    pub embellishment: Option<Embellishment>,
    #[serde(default)]
    pub tie: CurveEnds,
    #[serde(default)]
    pub slur: CurveEnds,
}

impl Note {
    pub fn new(pitch: Pitch, dur: Duration) -> Self {
        Self {
            pitch,
            dur,
            dots: 0,
            colored: false,
            cue: false,
            acciaccatura: false,
            ligature: false,
            stem_dir: None,
            stemless: false,
            accid: None,
            fermata: false,
            embellishment: None,
            tie: CurveEnds::default(),
            slur: CurveEnds::default(),
        }
    }
}

/// Vertical placement of a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestPosition {
    /// Standard position for the duration
    #[default]
    Auto,
    /// Placed at the height of a pitch
    Pitched(Pitch),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rest {
    pub dur: Duration,
    #[serde(default)]
    pub dots: u8,
    #[serde(default)]
    pub cue: bool,
    #[serde(default)]
    pub position: RestPosition,
    #[serde(default)]
    pub fermata: bool,
    #[serde(default)]
    pub embellishment: Option<Embellishment>,
}

impl Rest {
    pub fn new(dur: Duration) -> Self {
        Self {
            dur,
            dots: 0,
            cue: false,
            position: RestPosition::Auto,
            fermata: false,
            embellishment: None,
        }
    }
}

/// Clef identifiers: sign and staff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClefId {
    G1,
    G2,
    /// Treble clef, octave up
    G2va,
    /// Treble clef, octave down
    G2vb,
    F3,
    F4,
    F5,
    C1,
    C2,
    C3,
    C4,
    C5,
    #[serde(rename = "perc")]
    Perc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clef {
    pub id: ClefId,
    #[serde(default)]
    pub cue: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySig {
    /// Sharp or flat
    pub alteration: Accidental,
    /// Number of alterations, up to 7
    pub count: u8,
}

impl KeySig {
    const SHARPS: [PitchName; 7] = [
        PitchName::F,
        PitchName::C,
        PitchName::G,
        PitchName::D,
        PitchName::A,
        PitchName::E,
        PitchName::B,
    ];

    /// Pitch name of the i-th alteration, in signature order.
    pub fn alteration_at(&self, i: usize) -> PitchName {
        let i = i.min(6);
        if self.alteration == Accidental::Flat {
            Self::SHARPS[6 - i]
        } else {
            Self::SHARPS[i]
        }
    }

    pub fn alteration_count(&self) -> usize {
        self.count.min(7) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MensurSign {
    /// Full circle
    O,
    /// Half circle
    C,
}

/// Mensuration sign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mensur {
    pub sign: Option<MensurSign>,
    /// Mirror the half circle
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub dot: bool,
    #[serde(default)]
    pub slash: bool,
    pub num: Option<u32>,
    pub numbase: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterSym {
    Common,
    Cut,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeterSig {
    pub sym: Option<MeterSym>,
    pub count: Option<u32>,
    pub unit: Option<u32>,
}

/// Whole-measure rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MRest {}

/// Rest spanning several measures, shown with its count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiRest {
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "symbol", rename_all = "snake_case")]
pub enum SymbolKind {
    Accid { accid: Accidental, pitch: Pitch },
    Custos { pitch: Pitch },
    /// One or two dots
    Dot { count: u8, pitch: Pitch },
}

impl SymbolKind {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Accid { .. } => "accid",
            SymbolKind::Custos { .. } => "custos",
            SymbolKind::Dot { .. } => "dot",
        }
    }

    pub fn pitch(&self) -> Pitch {
        match self {
            SymbolKind::Accid { pitch, .. }
            | SymbolKind::Custos { pitch }
            | SymbolKind::Dot { pitch, .. } => *pitch,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(flatten)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub cue: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BarlineStyle {
    #[default]
    Single,
    Double,
    End,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Barline {
    /// Drawn across the current staff only
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub style: BarlineStyle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Beam {
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuplet {
    pub num: u32,
    pub numbase: u32,
    pub children: Vec<Element>,
}

/// Editorial apparatus: parallel readings of the same passage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerApp {
    /// The first reading is the primary one
    pub readings: Vec<Reading>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Tie,
    Slur,
}

/// Tie or slur between two notes, possibly in different systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveRelation {
    pub id: String,
    pub kind: CurveKind,
    /// Id of the first note
    pub first: String,
    /// Id of the second note
    pub second: String,
}

impl Element {
    /// Element positioned relative to its measure.
    pub fn new(id: impl Into<String>, x_rel: i32, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            x_rel,
            x_abs: None,
            h_offset: 0,
            alignment: None,
            kind,
        }
    }

    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Direct children for grouping containers, empty otherwise.
    pub fn children(&self) -> &[Element] {
        match &self.kind {
            ElementKind::Beam(b) => &b.children,
            ElementKind::Tuplet(t) => &t.children,
            _ => &[],
        }
    }
}

impl Document {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            pages: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Look up a tie or slur by id.
    pub fn relation(&self, id: &str) -> Option<&CurveRelation> {
        self.relations.iter().find(|r| r.id == id)
    }

    /// Number of systems across all pages.
    pub fn system_count(&self) -> usize {
        self.pages.iter().map(|p| p.systems.len()).sum()
    }
}
