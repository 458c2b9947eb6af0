//! Integration tests for the Chord-o-matic pipeline.
//!
//! These tests run catalog lookup, shape validation, primitive rendering and
//! every output backend end to end.

use cm_core::{
    Arrangement, ChordCatalog, ChordErrorCode, ChordShape, FretPosition, SongBuilder,
    SongChordAddResult, builtin_catalog,
};
use cm_render::{
    DiagramMode, DrawPrimitive, RecordingSurface, RenderGeometry, Style, paint, render_chord,
};
use cm_render_svg::{SvgRenderConfig, render_svg};
use cm_render_term::{RenderMode, TermRenderConfig, render_term};
use proptest::prelude::*;

fn geometry() -> RenderGeometry {
    RenderGeometry::default_for(350.0, 500.0).expect("valid bounds")
}

fn barre_lines(primitives: &[DrawPrimitive]) -> Vec<&DrawPrimitive> {
    primitives
        .iter()
        .filter(|primitive| primitive.style() == Style::Barre)
        .collect()
}

/// Open C-shape from the nut: no barre, nut drawn last.
#[test]
fn open_shape_classifies_and_renders_from_the_nut() {
    let shape = ChordShape::new("m", "x32010", Some(0)).expect("valid shape");
    let positions: Vec<FretPosition> = (0..6)
        .map(|string| shape.classify_string(string).expect("string in range"))
        .collect();
    assert_eq!(
        positions,
        vec![
            FretPosition::Muted,
            FretPosition::Fretted(3),
            FretPosition::Fretted(2),
            FretPosition::Open,
            FretPosition::Fretted(1),
            FretPosition::Open,
        ]
    );
    assert_eq!(shape.fret_range(), (0, 3));

    let drawing = render_chord(&shape, &geometry()).expect("renders");
    assert_eq!(drawing.mode, DiagramMode::Absolute);
    assert!(barre_lines(&drawing.primitives).is_empty());
    assert!(matches!(
        drawing.primitives.last(),
        Some(DrawPrimitive::Line {
            style: Style::Thick,
            ..
        })
    ));
}

/// Barred shape up the neck: rows count from the lowest fret.
#[test]
fn barred_shape_renders_offset_with_label() {
    let catalog = builtin_catalog().expect("builtin catalog loads");
    let shape = catalog.shape("major").expect("shape exists");
    assert_eq!(shape.encoding(), "57756x");
    assert_eq!(shape.fret_range(), (5, 7));

    let drawing = render_chord(shape, &geometry()).expect("renders");
    assert_eq!(drawing.mode, DiagramMode::Offset { start_fret: 5 });

    let rows: Vec<f64> = drawing
        .primitives
        .iter()
        .filter_map(|primitive| match primitive {
            DrawPrimitive::Circle {
                center,
                style: Style::Normal,
                ..
            } => Some(center.y),
            _ => None,
        })
        .collect();
    assert_eq!(rows, vec![1.5, 3.5, 3.5, 1.5, 2.5]);

    let barres = barre_lines(&drawing.primitives);
    assert_eq!(barres.len(), 1);
    match barres[0] {
        DrawPrimitive::Line { from, to, .. } => {
            assert_eq!((from.x, to.x), (1.0, 4.0));
            assert_eq!((from.y, to.y), (1.5, 1.5));
        }
        other => panic!("barre should be a line, got {other:?}"),
    }
    assert!(matches!(
        drawing.primitives.last(),
        Some(DrawPrimitive::Text { text, .. }) if text == "5"
    ));
}

#[test]
fn offset_threshold_sits_between_four_and_five() {
    let four = ChordShape::new("", "x4xxxx", None).expect("valid shape");
    let five = ChordShape::new("", "x5xx5x", Some(5)).expect("valid shape");

    assert_eq!(
        render_chord(&four, &geometry()).expect("renders").mode,
        DiagramMode::Absolute
    );
    assert_eq!(
        render_chord(&five, &geometry()).expect("renders").mode,
        DiagramMode::Offset { start_fret: 5 }
    );
}

#[test]
fn barre_needs_two_strings_on_its_fret() {
    let single = ChordShape::new("", "x5xxxx", Some(5)).expect("valid shape");
    let double = ChordShape::new("", "x5xx5x", Some(5)).expect("valid shape");

    let single = render_chord(&single, &geometry()).expect("renders");
    let double = render_chord(&double, &geometry()).expect("renders");
    assert!(barre_lines(&single.primitives).is_empty());
    assert_eq!(barre_lines(&double.primitives).len(), 1);
}

#[test]
fn every_catalog_shape_renders_on_every_backend() {
    let catalog = builtin_catalog().expect("builtin catalog loads");
    let svg_config = SvgRenderConfig::rich();

    for shape in catalog.shapes() {
        let svg = render_svg(shape, &geometry(), &svg_config).expect("svg renders");
        assert!(svg.starts_with("<svg"), "{} did not render svg", shape.suffix());
        assert!(svg.contains(&format!("data-encoding=\"{}\"", shape.encoding())));

        for mode in [RenderMode::Braille, RenderMode::Ascii] {
            let config = TermRenderConfig::default().with_mode(mode);
            let output = render_term(shape, &config).expect("terminal renders");
            assert!(output.starts_with(shape.suffix()));
        }
    }
}

#[test]
fn painting_replays_every_primitive_in_order() {
    let shape = ChordShape::new("aug9", "8a89a8", Some(8)).expect("valid shape");
    let drawing = render_chord(&shape, &geometry()).expect("renders");

    let mut surface = RecordingSurface::new();
    let calls = paint(&drawing, &mut surface);
    assert_eq!(calls, drawing.len());
    assert_eq!(surface.call_count(), drawing.len());
}

#[test]
fn song_session_over_builtin_catalog() {
    let catalog = builtin_catalog().expect("builtin catalog loads");
    let mut builder = SongBuilder::new(catalog).expect("catalog has keys");

    builder.select_key("A").expect("key exists");
    assert_eq!(
        builder.select_chord_suffix("major"),
        Ok(SongChordAddResult::Added)
    );
    assert_eq!(
        builder.select_chord_suffix("major"),
        Ok(SongChordAddResult::AlreadyPresent)
    );
    assert_eq!(builder.song().len(), 1);

    let err = builder.remove_song_chord_at(3).expect_err("out of range");
    assert_eq!(err.code(), ChordErrorCode::IndexRange);
    assert_eq!(builder.song().names(), vec!["Amajor".to_string()]);
}

/// Enharmonic selection, a fingered catalog shape and its timeline.
#[test]
fn fingered_song_chords_render_and_play() {
    let catalog = builtin_catalog().expect("builtin catalog loads");
    let mut builder = SongBuilder::new(catalog).expect("catalog has keys");
    assert_eq!(builder.select_key("Db").map(|key| key.name()), Ok("C#"));
    let found: Vec<&str> = builder
        .search_chords("c# maj")
        .into_iter()
        .map(ChordShape::suffix)
        .collect();
    assert_eq!(found, vec!["major", "majbis", "majter"]);
    builder.select_chord_suffix("major").expect("shape exists");
    builder.select_chord_suffix("m7").expect("shape exists");

    let shape = catalog.shape("major").expect("shape exists");
    let drawing = render_chord(shape, &geometry()).expect("renders");
    let fingers: Vec<&str> = drawing
        .primitives
        .iter()
        .filter_map(|primitive| match primitive {
            DrawPrimitive::Text {
                text,
                style: Style::Finger,
                ..
            } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(fingers, vec!["1", "3", "4", "1", "2"]);
    let svg = render_svg(shape, &geometry(), &SvgRenderConfig::compact()).expect("svg renders");
    assert_eq!(svg.matches("class=\"cm-finger\"").count(), 5);

    let mut arrangement = Arrangement::from_song("Demo", "Verse", builder.song(), 4);
    arrangement.set_section_repeat(0, 2).expect("section exists");
    let timeline = arrangement.timeline();
    let names: Vec<String> = timeline
        .events()
        .iter()
        .filter_map(|event| event.chord.as_ref().map(ToString::to_string))
        .collect();
    assert_eq!(names, vec!["C#major", "C#m7", "C#major", "C#m7"]);
    assert_eq!(timeline.total_beats(), 16);
    assert_eq!(arrangement.total_seconds(), 8);
}

#[test]
fn custom_catalog_feeds_the_same_pipeline() {
    let catalog = ChordCatalog::from_toml_str(
        r#"
keys = ["E"]

[[shapes]]
suffix = "5"
frets = "022xxx"
"#,
    )
    .expect("valid catalog");

    let shape = catalog.shape("5").expect("shape exists");
    let output = render_term(shape, &TermRenderConfig::compact()).expect("renders");
    assert!(output.starts_with("5 [022xxx]"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rendering_is_deterministic(encoding in "[x0-9a-c]{6}") {
        let shape = ChordShape::new("", &encoding, None).expect("valid shape");
        let first = render_chord(&shape, &geometry()).expect("renders");
        let second = render_chord(&shape, &geometry()).expect("renders");
        prop_assert_eq!(&first, &second);

        let svg_config = SvgRenderConfig::compact();
        prop_assert_eq!(
            render_svg(&shape, &geometry(), &svg_config).expect("renders"),
            render_svg(&shape, &geometry(), &svg_config).expect("renders")
        );
    }
}
