//! Document builders shared by the integration tests.
#![allow(dead_code)]

use scoreview::*;

/// Top line of the test staff.
pub const STAFF_Y: i32 = 1000;
/// Page height of the default options; device y = PAGE_HEIGHT - logical y.
pub const PAGE_HEIGHT: i32 = 2970;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn note(id: &str, x: i32, pname: PitchName, oct: i32, dur: Duration) -> Element {
    Element::new(id, x, ElementKind::Note(Note::new(Pitch::new(pname, oct), dur)))
}

pub fn note_with(id: &str, x: i32, pitch: Pitch, dur: Duration, edit: impl FnOnce(&mut Note)) -> Element {
    let mut n = Note::new(pitch, dur);
    edit(&mut n);
    Element::new(id, x, ElementKind::Note(n))
}

pub fn layer(id: &str, clef: Option<ClefId>, elements: Vec<Element>) -> Layer {
    Layer {
        id: id.to_string(),
        n: 1,
        clef,
        elements,
    }
}

pub fn staff(id: &str, drawing_y: i32, layers: Vec<Layer>) -> Staff {
    Staff {
        id: id.to_string(),
        n: 1,
        size: StaffSize::Normal,
        lines: 5,
        drawing_y,
        notation: NotationStyle::Modern,
        layers,
    }
}

pub fn measure(id: &str, staves: Vec<Staff>, alignments: Vec<Alignment>) -> Measure {
    Measure {
        id: id.to_string(),
        drawing_x: 0,
        right_barline_x: 400,
        alignments,
        staves,
    }
}

pub fn system(id: &str, measures: Vec<Measure>) -> System {
    System {
        id: id.to_string(),
        measures,
    }
}

pub fn document(systems: Vec<System>, relations: Vec<CurveRelation>) -> Document {
    Document {
        kind: DocumentKind::Raw,
        pages: vec![Page {
            id: "p1".to_string(),
            systems,
        }],
        relations,
    }
}

/// One page, one system, one measure, one treble staff with one layer.
pub fn single_layer(elements: Vec<Element>) -> Document {
    single_layer_with_clef(Some(ClefId::G2), elements)
}

pub fn single_layer_with_clef(clef: Option<ClefId>, elements: Vec<Element>) -> Document {
    let staff = staff("s1", STAFF_Y, vec![layer("l1", clef, elements)]);
    document(vec![system("sys1", vec![measure("m1", vec![staff], Vec::new())])], Vec::new())
}

pub fn render(doc: &Document) -> RecordingDevice {
    let mut view = View::new(doc, RenderOptions::default()).expect("valid document");
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).expect("render succeeds");
    dc
}

pub fn lines(prims: &[&Primitive]) -> usize {
    prims.iter().filter(|p| matches!(p, Primitive::Line { .. })).count()
}

pub fn glyphs(prims: &[&Primitive]) -> usize {
    prims.iter().filter(|p| matches!(p, Primitive::Glyph { .. })).count()
}

pub fn rectangles(prims: &[&Primitive]) -> usize {
    prims.iter().filter(|p| matches!(p, Primitive::Rectangle { .. })).count()
}
