//! Element rendering through the public view, inspected with the recording device.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use scoreview::*;

#[test]
fn quarter_on_middle_line_gets_up_stem_and_no_flag() {
    init_logging();
    let doc = single_layer(vec![note("n1", 100, PitchName::B, 4, Duration::Quarter)]);
    let mut view = View::new(&doc, RenderOptions::default()).unwrap();
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).unwrap();

    let drawn = view.drawn("n1").unwrap();
    assert_eq!(drawn.y, STAFF_Y - 40);
    assert_eq!(drawn.stem_dir, Some(StemDirection::Up));
    assert_eq!(drawn.flags, 0);

    let group = dc.group("note", "n1");
    assert_eq!(glyphs(&group), 1, "notehead only");
    assert_eq!(lines(&group), 1, "one stem");
}

#[test]
fn beamed_eighths_hand_their_stems_to_the_beam() {
    init_logging();
    let beam = Element::new(
        "b1",
        0,
        ElementKind::Beam(Beam {
            children: vec![
                note("n1", 100, PitchName::E, 4, Duration::Eighth),
                note("n2", 200, PitchName::G, 4, Duration::Eighth),
            ],
        }),
    );
    let doc = single_layer(vec![beam]);
    let mut view = View::new(&doc, RenderOptions::default()).unwrap();
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).unwrap();

    for id in ["n1", "n2"] {
        let group = dc.group("note", id);
        assert_eq!(glyphs(&group), 1, "{id}: flag suppressed inside the beam");
        assert_eq!(lines(&group), 0, "{id}: stem drawn by the beam");
        assert_eq!(view.drawn(id).unwrap().stem_dir, Some(StemDirection::Up));
    }

    let stroke = dc.group("beam-stroke", "b1");
    assert_eq!(lines(&stroke), 3, "two stems and one beam");
    assert_eq!(view.drawn("n1").unwrap().stem_end, Point::new(110, 990));
    assert_eq!(view.drawn("n2").unwrap().stem_end, Point::new(210, 1010));
}

#[test]
fn sixteenths_get_a_second_beam() {
    let beam = Element::new(
        "b1",
        0,
        ElementKind::Beam(Beam {
            children: vec![
                note("n1", 100, PitchName::E, 4, Duration::Sixteenth),
                note("n2", 200, PitchName::E, 4, Duration::Sixteenth),
                note("n3", 300, PitchName::E, 4, Duration::Eighth),
            ],
        }),
    );
    let dc = render(&single_layer(vec![beam]));
    let stroke = dc.group("beam-stroke", "b1");
    let widths: Vec<i32> = stroke
        .iter()
        .filter_map(|p| match p {
            Primitive::Line { width, .. } => Some(*width),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![2, 2, 2, 10, 10]);
}

#[test]
fn lone_eighth_in_a_beam_keeps_its_stem_and_flag() {
    init_logging();
    let beam = Element::new(
        "b1",
        0,
        ElementKind::Beam(Beam {
            children: vec![
                note("n1", 100, PitchName::E, 4, Duration::Eighth),
                Element::new("r1", 200, ElementKind::Rest(Rest::new(Duration::Eighth))),
            ],
        }),
    );
    let dc = render(&single_layer(vec![beam]));
    assert!(dc.group("beam-stroke", "b1").is_empty());

    let n1 = dc.group("note", "n1");
    assert_eq!(lines(&n1), 1, "own stem");
    assert_eq!(glyphs(&n1), 2, "notehead and flag");
}

#[test]
fn eighth_beamed_with_a_quarter_keeps_its_flag() {
    let beam = Element::new(
        "b1",
        0,
        ElementKind::Beam(Beam {
            children: vec![
                note("n1", 100, PitchName::E, 4, Duration::Eighth),
                note("n2", 200, PitchName::E, 4, Duration::Quarter),
            ],
        }),
    );
    let dc = render(&single_layer(vec![beam]));
    assert!(dc.group("beam-stroke", "b1").is_empty());
    assert_eq!((lines(&dc.group("note", "n1")), glyphs(&dc.group("note", "n1"))), (1, 2));
    assert_eq!((lines(&dc.group("note", "n2")), glyphs(&dc.group("note", "n2"))), (1, 1));
}

#[test]
fn whole_rest_above_the_staff_draws_its_ledger_line() {
    let above = Rest {
        position: RestPosition::Pitched(Pitch::new(PitchName::C, 6)),
        ..Rest::new(Duration::Whole)
    };
    let inside = Rest {
        position: RestPosition::Pitched(Pitch::new(PitchName::D, 5)),
        ..Rest::new(Duration::Whole)
    };
    let doc = single_layer(vec![
        Element::new("r1", 100, ElementKind::Rest(above)),
        Element::new("r2", 200, ElementKind::Rest(inside)),
    ]);
    let dc = render(&doc);

    let r1 = dc.group("rest", "r1");
    assert_eq!(rectangles(&r1), 1);
    assert_eq!(lines(&r1), 1);

    let r2 = dc.group("rest", "r2");
    assert_eq!(rectangles(&r2), 1);
    assert_eq!(lines(&r2), 0);
}

#[test]
fn ledger_line_count_follows_distance_from_the_staff() {
    let doc = single_layer(vec![
        note("inside", 50, PitchName::G, 4, Duration::Whole),
        note("c4", 100, PitchName::C, 4, Duration::Whole),
        note("a3", 150, PitchName::A, 3, Duration::Whole),
        note("c6", 200, PitchName::C, 6, Duration::Whole),
    ]);
    let dc = render(&doc);
    assert_eq!(lines(&dc.group("note", "inside")), 0);
    assert_eq!(lines(&dc.group("note", "c4")), 1);
    assert_eq!(lines(&dc.group("note", "a3")), 2);
    assert_eq!(lines(&dc.group("note", "c6")), 2);
}

#[test]
fn note_accidental_is_a_nested_group() {
    let doc = single_layer(vec![note_with(
        "n1",
        100,
        Pitch::new(PitchName::F, 5),
        Duration::Half,
        |n| n.accid = Some(Accidental::Sharp),
    )]);
    let dc = render(&doc);
    assert_eq!(glyphs(&dc.group("accid", "n1-accid")), 1);
    assert_eq!(glyphs(&dc.group("note", "n1")), 2);
}

#[test]
fn clef_change_applies_to_following_notes() {
    let doc = single_layer(vec![
        Element::new("c1", 20, ElementKind::Clef(Clef { id: ClefId::F4, cue: false })),
        note("n1", 100, PitchName::D, 3, Duration::Quarter),
    ]);
    let mut view = View::new(&doc, RenderOptions::default()).unwrap();
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).unwrap();
    assert_eq!(glyphs(&dc.group("clef", "c1")), 1);
    assert_eq!(view.drawn("n1").unwrap().y, STAFF_Y - 40);
}

#[test]
fn key_signature_places_sharps_by_clef() {
    let keysig = KeySig {
        alteration: Accidental::Sharp,
        count: 2,
    };
    let doc = single_layer(vec![Element::new("k1", 50, ElementKind::KeySig(keysig))]);
    let dc = render(&doc);
    let positions: Vec<(i32, i32)> = dc
        .group("keysig", "k1")
        .iter()
        .filter_map(|p| match p {
            Primitive::Glyph { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![(50, PAGE_HEIGHT - 1000), (73, PAGE_HEIGHT - 970)]);
}

#[test]
fn key_signature_without_clef_is_skipped() {
    init_logging();
    let keysig = KeySig {
        alteration: Accidental::Flat,
        count: 3,
    };
    let doc = single_layer_with_clef(None, vec![Element::new("k1", 50, ElementKind::KeySig(keysig))]);
    let dc = render(&doc);
    assert!(dc.group("keysig", "k1").is_empty());
}

#[test]
fn mensuration_circle_with_dot_and_figure() {
    let mensur = Mensur {
        sign: Some(MensurSign::O),
        dot: true,
        num: Some(3),
        ..Mensur::default()
    };
    let doc = single_layer(vec![Element::new("ms1", 100, ElementKind::Mensur(mensur))]);
    let dc = render(&doc);
    let group = dc.group("mensur", "ms1");

    let circles: Vec<(i32, bool)> = group
        .iter()
        .filter_map(|p| match p {
            Primitive::Circle { radius, filled, .. } => Some((*radius, *filled)),
            _ => None,
        })
        .collect();
    assert_eq!(circles, vec![(20, false), (4, true)]);
    assert!(group.iter().any(|p| matches!(p, Primitive::Text { text, .. } if text == "3")));
}

#[test]
fn reversed_half_circle_is_an_arc() {
    let mensur = Mensur {
        sign: Some(MensurSign::C),
        reversed: true,
        slash: true,
        ..Mensur::default()
    };
    let doc = single_layer(vec![Element::new("ms1", 100, ElementKind::Mensur(mensur))]);
    let dc = render(&doc);
    let group = dc.group("mensur", "ms1");
    let arc = group.iter().find_map(|p| match p {
        Primitive::Arc { start, end, .. } => Some((*start, *end)),
        _ => None,
    });
    assert_eq!(arc, Some((250.0, 110.0)));
    assert_eq!(lines(&group), 1);
}

#[test]
fn meter_signature_stacks_count_over_unit() {
    let meter = MeterSig {
        sym: None,
        count: Some(3),
        unit: Some(4),
    };
    let doc = single_layer(vec![Element::new("t1", 100, ElementKind::MeterSig(meter))]);
    let dc = render(&doc);
    let texts: Vec<(String, i32)> = dc
        .group("meterSig", "t1")
        .iter()
        .filter_map(|p| match p {
            Primitive::Text { text, y, .. } => Some((text.clone(), *y)),
            _ => None,
        })
        .collect();
    assert_eq!(
        texts,
        vec![("3".to_string(), PAGE_HEIGHT - 960), ("4".to_string(), PAGE_HEIGHT - 920)]
    );
}

#[test]
fn common_time_is_a_single_glyph() {
    let meter = MeterSig {
        sym: Some(MeterSym::Common),
        count: None,
        unit: None,
    };
    let doc = single_layer(vec![Element::new("t1", 100, ElementKind::MeterSig(meter))]);
    let dc = render(&doc);
    let group = dc.group("meterSig", "t1");
    assert_eq!(glyphs(&group), 1);
    assert!(!group.iter().any(|p| matches!(p, Primitive::Text { .. })));
}

#[test]
fn barline_spans_every_staff_unless_partial() {
    let full = Element::new("bl1", 400, ElementKind::Barline(Barline::default()));
    let partial = Element::new(
        "bl2",
        400,
        ElementKind::Barline(Barline {
            partial: true,
            style: BarlineStyle::Single,
        }),
    );
    let upper = staff("s1", 1000, vec![layer("l1", Some(ClefId::G2), vec![full])]);
    let lower = staff("s2", 800, vec![layer("l2", Some(ClefId::F4), vec![partial])]);
    let doc = document(vec![system("sys1", vec![measure("m1", vec![upper, lower], Vec::new())])], Vec::new());
    let dc = render(&doc);

    let span = |kind: &str, id: &str| -> Vec<(i32, i32)> {
        dc.group(kind, id)
            .iter()
            .filter_map(|p| match p {
                Primitive::Line { y1, y2, .. } => Some((*y1, *y2)),
                _ => None,
            })
            .collect()
    };
    assert_eq!(span("barline", "bl1"), vec![(PAGE_HEIGHT - 1000, PAGE_HEIGHT - 720)]);
    assert_eq!(span("barline", "bl2"), vec![(PAGE_HEIGHT - 800, PAGE_HEIGHT - 720)]);
}

#[test]
fn final_barline_has_thin_and_thick_strokes() {
    let end = Element::new(
        "bl1",
        400,
        ElementKind::Barline(Barline {
            partial: false,
            style: BarlineStyle::End,
        }),
    );
    let dc = render(&single_layer(vec![end]));
    let widths: Vec<i32> = dc
        .group("barline", "bl1")
        .iter()
        .filter_map(|p| match p {
            Primitive::Line { width, .. } => Some(*width),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![2, 10]);
}

#[test]
fn multi_rest_count_is_clamped() {
    let doc = single_layer(vec![Element::new(
        "mr1",
        100,
        ElementKind::MultiRest(MultiRest { count: 1500 }),
    )]);
    let dc = render(&doc);
    let texts: Vec<&str> = dc
        .group("multirest", "mr1")
        .iter()
        .filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["999"]);
}

#[test]
fn measure_rest_is_centred_in_the_measure() {
    let doc = single_layer(vec![Element::new("mr1", 0, ElementKind::MRest(MRest {}))]);
    let dc = render(&doc);
    let group = dc.group("mrest", "mr1");
    let rect = group.iter().find_map(|p| match p {
        Primitive::Rectangle { x, width, .. } => Some((*x, *width)),
        _ => None,
    });
    let (x, width) = rect.unwrap();
    assert_eq!(x + width / 2, 200);
}

#[test]
fn tuplet_bracket_carries_its_number() {
    let tuplet = Element::new(
        "tu1",
        0,
        ElementKind::Tuplet(Tuplet {
            num: 3,
            numbase: 2,
            children: vec![
                note("n1", 100, PitchName::E, 4, Duration::Quarter),
                note("n2", 150, PitchName::F, 4, Duration::Quarter),
                note("n3", 200, PitchName::G, 4, Duration::Quarter),
            ],
        }),
    );
    let dc = render(&single_layer(vec![tuplet]));
    let bracket = dc.group("tuplet-bracket", "tu1");
    assert_eq!(lines(&bracket), 4);
    assert!(bracket.iter().any(|p| matches!(p, Primitive::Text { text, .. } if text == "3")));
}

#[test]
fn custos_and_dot_symbols() {
    let custos = Symbol {
        kind: SymbolKind::Custos {
            pitch: Pitch::new(PitchName::A, 4),
        },
        cue: false,
    };
    let dots = Symbol {
        kind: SymbolKind::Dot {
            count: 5,
            pitch: Pitch::new(PitchName::A, 4),
        },
        cue: false,
    };
    let doc = single_layer(vec![
        Element::new("cu1", 100, ElementKind::Symbol(custos)),
        Element::new("d1", 150, ElementKind::Symbol(dots)),
    ]);
    let dc = render(&doc);
    assert_eq!(glyphs(&dc.group("custos", "cu1")), 1);
    let dots = dc
        .group("dot", "d1")
        .iter()
        .filter(|p| matches!(p, Primitive::Circle { .. }))
        .count();
    assert_eq!(dots, 2);
}

#[test]
fn apparatus_readings_are_coloured_by_rank() {
    let app = LayerApp {
        readings: vec![
            Reading {
                id: "rdg1".to_string(),
                children: vec![note("a1", 100, PitchName::G, 4, Duration::Whole)],
            },
            Reading {
                id: "rdg2".to_string(),
                children: vec![note("a2", 100, PitchName::A, 4, Duration::Whole)],
            },
        ],
    };
    let doc = single_layer(vec![
        Element::new("app1", 0, ElementKind::App(app)),
        note("n1", 200, PitchName::G, 4, Duration::Whole),
    ]);
    let dc = render(&doc);

    let colors = |id: &str| -> Vec<Color> { dc.group("note", id).iter().filter_map(|p| p.color()).collect() };
    assert_eq!(colors("a1"), vec![Color::GREEN]);
    assert_eq!(colors("a2"), vec![Color::BLUE]);
    assert_eq!(colors("n1"), vec![Color::BLACK]);
}

#[test]
fn selected_element_is_drawn_in_the_selection_colour() {
    let doc = single_layer(vec![
        note("n1", 100, PitchName::G, 4, Duration::Whole),
        note("n2", 200, PitchName::G, 4, Duration::Whole),
    ]);
    let mut view = View::new(&doc, RenderOptions::default()).unwrap();
    view.set_current_element(Some("n2"));
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).unwrap();

    let color_of = |id: &str| dc.group("note", id).iter().find_map(|p| p.color());
    assert_eq!(color_of("n1"), Some(Color::BLACK));
    assert_eq!(color_of("n2"), Some(Color::RED));
}

#[test]
fn staff_lines_cross_the_measure() {
    let dc = render(&single_layer(Vec::new()));
    let ys: Vec<i32> = dc
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::Line { x1: 0, x2: 400, y1, .. } => Some(*y1),
            _ => None,
        })
        .collect();
    assert_eq!(ys, vec![1970, 1990, 2010, 2030, 2050]);
}

fn glyph_positions(prims: &[&Primitive]) -> Vec<(u32, i32, i32)> {
    prims
        .iter()
        .filter_map(|p| match p {
            Primitive::Glyph { code, x, y, .. } => Some((*code, *x, *y)),
            _ => None,
        })
        .collect()
}

fn line_ends(prims: &[&Primitive]) -> Vec<(i32, i32, i32, i32)> {
    prims
        .iter()
        .filter_map(|p| match p {
            Primitive::Line { x1, y1, x2, y2, .. } => Some((*x1, *y1, *x2, *y2)),
            _ => None,
        })
        .collect()
}

#[test]
fn ligature_notes_draw_nothing() {
    init_logging();
    let doc = single_layer(vec![
        note("long", 100, PitchName::G, 4, Duration::Long),
        note("breve", 150, PitchName::G, 4, Duration::Breve),
        note_with("lig", 200, Pitch::new(PitchName::G, 4), Duration::Whole, |n| n.ligature = true),
        note("plain", 250, PitchName::G, 4, Duration::Whole),
    ]);
    let mut view = View::new(&doc, RenderOptions::default()).unwrap();
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).unwrap();

    for id in ["long", "breve", "lig"] {
        assert!(dc.group("note", id).is_empty(), "{id}");
        assert_eq!(view.drawn(id).unwrap().y, STAFF_Y - 60);
    }
    assert_eq!(glyphs(&dc.group("note", "plain")), 1);
}

#[test]
fn breve_rest_has_bar_ends_and_long_rest_does_not() {
    let doc = single_layer(vec![
        Element::new("breve", 100, ElementKind::Rest(Rest::new(Duration::Breve))),
        Element::new("long", 200, ElementKind::Rest(Rest::new(Duration::Long))),
    ]);
    let dc = render(&doc);

    let breve = dc.group("rest", "breve");
    assert_eq!(rectangles(&breve), 1);
    assert!(breve.iter().any(|p| matches!(
        p,
        Primitive::Rectangle { x: 88, y: 1970, width: 6, height: 40, .. }
    )));
    assert_eq!(line_ends(&breve), vec![(78, 1970, 98, 1970), (78, 2010, 98, 2010)]);

    let long = dc.group("rest", "long");
    assert_eq!(lines(&long), 0);
    assert!(long.iter().any(|p| matches!(
        p,
        Primitive::Rectangle { x: 188, y: 1990, width: 6, height: 40, .. }
    )));
}

#[test]
fn fermata_rises_over_an_embellishment() {
    let doc = single_layer(vec![
        note_with("n1", 100, Pitch::new(PitchName::G, 4), Duration::Quarter, |n| n.fermata = true),
        note_with("n2", 200, Pitch::new(PitchName::G, 4), Duration::Quarter, |n| {
            n.fermata = true;
            n.embellishment = Some(Embellishment::Trill);
        }),
    ]);
    let dc = render(&doc);

    assert_eq!(
        glyph_positions(&dc.group("note", "n1")),
        vec![(0xE0A4, 88, PAGE_HEIGHT - 940), (0xE4C0, 100, PAGE_HEIGHT - 1020)]
    );
    assert_eq!(
        glyph_positions(&dc.group("note", "n2")),
        vec![
            (0xE0A4, 188, PAGE_HEIGHT - 940),
            (0xE4C0, 200, PAGE_HEIGHT - 1055),
            (0xE566, 200, PAGE_HEIGHT - 1030),
        ]
    );
}

#[test]
fn cue_acciaccatura_gets_a_slash_across_the_stem() {
    let grace = |id: &str, x: i32, cue: bool| {
        note_with(id, x, Pitch::new(PitchName::G, 4), Duration::Eighth, |n| {
            n.cue = cue;
            n.acciaccatura = true;
        })
    };
    let doc = single_layer(vec![grace("n1", 100, true), grace("n2", 200, false)]);
    let dc = render(&doc);

    let ends = line_ends(&dc.group("note", "n1"));
    assert_eq!(
        ends,
        vec![
            (107, PAGE_HEIGHT - 947, 107, PAGE_HEIGHT - 990),
            (97, PAGE_HEIGHT - 957, 127, PAGE_HEIGHT - 987),
        ]
    );
    assert_eq!(lines(&dc.group("note", "n2")), 1, "full-size notes get no slash");
}

#[test]
fn note_dots_sit_in_the_space_right_of_the_head() {
    let doc = single_layer(vec![
        note_with("on_line", 100, Pitch::new(PitchName::G, 4), Duration::Quarter, |n| n.dots = 1),
        note_with("in_space", 200, Pitch::new(PitchName::A, 4), Duration::Quarter, |n| n.dots = 2),
        note_with("whole", 300, Pitch::new(PitchName::G, 4), Duration::Whole, |n| n.dots = 1),
    ]);
    let dc = render(&doc);
    let dots = |id: &str| -> Vec<(i32, i32)> {
        dc.group("note", id)
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle { x, y, radius: 4, filled: true, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    };
    assert_eq!(dots("on_line"), vec![(125, PAGE_HEIGHT - 950)]);
    assert_eq!(dots("in_space"), vec![(225, PAGE_HEIGHT - 950), (245, PAGE_HEIGHT - 950)]);
    assert_eq!(dots("whole"), vec![(335, PAGE_HEIGHT - 950)]);
}

#[test]
fn mensural_staff_raises_the_mid_line_and_centres_stems() {
    let c5 = || note("n1", 100, PitchName::C, 5, Duration::Quarter);

    let modern = single_layer(vec![c5()]);
    let mut view = View::new(&modern, RenderOptions::default()).unwrap();
    view.render_document(&mut RecordingDevice::new()).unwrap();
    let drawn = view.drawn("n1").unwrap();
    assert_eq!(drawn.stem_dir, Some(StemDirection::Down));
    assert_eq!(drawn.stem_start, Point::new(88, 963));

    let mut mensural = single_layer(vec![c5()]);
    mensural.pages[0].systems[0].measures[0].staves[0].notation = NotationStyle::Mensural;
    let mut view = View::new(&mensural, RenderOptions::default()).unwrap();
    let mut dc = RecordingDevice::new();
    view.render_document(&mut dc).unwrap();
    let drawn = view.drawn("n1").unwrap();
    assert_eq!(drawn.stem_dir, Some(StemDirection::Up));
    assert_eq!(line_ends(&dc.group("note", "n1")), vec![(99, PAGE_HEIGHT - 980, 99, PAGE_HEIGHT - 1040)]);
}
