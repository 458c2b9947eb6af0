//! Chord diagram renderer.
//!
//! Turns a validated [`ChordShape`] and a [`RenderGeometry`] into an ordered
//! list of primitives: background, grid strings, grid frets, one symbol per
//! string in ascending order, the barre when present, and finally the nut or
//! the starting-fret label. A fretted dot with a finger number is followed
//! directly by that number as [`Style::Finger`] text at the dot's centre.

use cm_core::{ABSOLUTE_FRET_WINDOW, ChordError, ChordShape, FretPosition, STRING_COUNT};
use tracing::debug;

use crate::geometry::{Point, RenderGeometry};
use crate::primitive::{ChordDrawing, DiagramMode, DrawPrimitive, Style};

/// Vertical centre of the row above the nut where open/muted symbols sit.
const SYMBOL_ROW: f64 = 0.5;
const MUTED_HALF_WIDTH: f64 = 0.25;
const MUTED_TOP: f64 = 0.30;
const MUTED_BOTTOM: f64 = 0.70;
const OPEN_RADIUS: f64 = 1.0 / 6.0;
const FRETTED_RADIUS: f64 = 0.25;
const BARRE_WIDTH: f64 = 0.5;
const LABEL_POSITION: Point = Point::new(0.2, 1.57);

/// Render `shape` onto `geometry`.
///
/// Fails only when the geometry's string count disagrees with the shape.
pub fn render_chord(
    shape: &ChordShape,
    geometry: &RenderGeometry,
) -> Result<ChordDrawing, ChordError> {
    if geometry.string_count() != STRING_COUNT {
        return Err(ChordError::InvalidGeometry(format!(
            "geometry has {} strings but chord shapes have {STRING_COUNT}",
            geometry.string_count()
        )));
    }

    let (min_fret, max_fret) = shape.fret_range();
    let mode = if max_fret > ABSOLUTE_FRET_WINDOW {
        DiagramMode::Offset {
            start_fret: min_fret,
        }
    } else {
        DiagramMode::Absolute
    };
    let row_of = |fret: u8| -> f64 {
        match mode {
            DiagramMode::Offset { start_fret } => f64::from(fret - start_fret + 1),
            DiagramMode::Absolute => f64::from(fret),
        }
    };

    let mut primitives = Vec::with_capacity(2 * STRING_COUNT + geometry.fret_rows() + 4);
    push_grid(&mut primitives, geometry);

    for (index, position) in shape.positions().iter().enumerate() {
        let column = column_of(index);
        match *position {
            FretPosition::Muted => push_muted(&mut primitives, column),
            FretPosition::Open => primitives.push(DrawPrimitive::Circle {
                center: Point::new(column, SYMBOL_ROW),
                radius: OPEN_RADIUS,
                style: Style::Outline,
            }),
            FretPosition::Fretted(fret) => {
                let center = Point::new(column, row_of(fret) + 0.5);
                primitives.push(DrawPrimitive::Circle {
                    center,
                    radius: FRETTED_RADIUS,
                    style: Style::Normal,
                });
                if let Some(finger) = shape.finger(index) {
                    primitives.push(DrawPrimitive::Text {
                        at: center,
                        text: finger.to_string(),
                        style: Style::Finger,
                    });
                }
            }
        }
    }

    if let Some((from, to)) = shape.barre_span() {
        let y = row_of(shape.barre_fret()) + 0.5;
        primitives.push(DrawPrimitive::Line {
            from: Point::new(column_of(from), y),
            to: Point::new(column_of(to), y),
            style: Style::Barre,
            width: Some(BARRE_WIDTH),
        });
    }

    match mode {
        DiagramMode::Offset { start_fret } => primitives.push(DrawPrimitive::Text {
            at: LABEL_POSITION,
            text: start_fret.to_string(),
            style: Style::Normal,
        }),
        DiagramMode::Absolute => primitives.push(DrawPrimitive::Line {
            from: Point::new(1.0, 1.0),
            to: Point::new(last_column(geometry), 1.0),
            style: Style::Thick,
            width: None,
        }),
    }

    debug!(
        encoding = %shape.encoding(),
        mode = mode.as_str(),
        min_fret,
        max_fret,
        primitives = primitives.len(),
        "chord rendered"
    );

    Ok(ChordDrawing {
        geometry: *geometry,
        mode,
        primitives,
    })
}

#[allow(clippy::cast_precision_loss)]
fn column_of(string: usize) -> f64 {
    (string + 1) as f64
}

#[allow(clippy::cast_precision_loss)]
fn last_column(geometry: &RenderGeometry) -> f64 {
    geometry.string_count() as f64
}

#[allow(clippy::cast_precision_loss)]
fn push_grid(primitives: &mut Vec<DrawPrimitive>, geometry: &RenderGeometry) {
    let rows = geometry.fret_rows() as f64;
    let right = last_column(geometry);

    primitives.push(DrawPrimitive::Rect {
        from: Point::new(0.0, 0.0),
        to: Point::new(right + 1.0, rows),
        style: Style::Background,
    });

    for string in 0..geometry.string_count() {
        let column = column_of(string);
        primitives.push(DrawPrimitive::Line {
            from: Point::new(column, 1.0),
            to: Point::new(column, rows),
            style: Style::Normal,
            width: None,
        });
    }

    for fret in 1..=geometry.fret_rows() {
        let y = fret as f64;
        primitives.push(DrawPrimitive::Line {
            from: Point::new(1.0, y),
            to: Point::new(right, y),
            style: Style::Normal,
            width: None,
        });
    }
}

fn push_muted(primitives: &mut Vec<DrawPrimitive>, column: f64) {
    let left = column - MUTED_HALF_WIDTH;
    let right = column + MUTED_HALF_WIDTH;
    primitives.push(DrawPrimitive::Line {
        from: Point::new(left, MUTED_BOTTOM),
        to: Point::new(right, MUTED_TOP),
        style: Style::Normal,
        width: None,
    });
    primitives.push(DrawPrimitive::Line {
        from: Point::new(left, MUTED_TOP),
        to: Point::new(right, MUTED_BOTTOM),
        style: Style::Normal,
        width: None,
    });
}

#[cfg(test)]
mod tests {
    use cm_core::{ChordErrorCode, ChordShape};
    use proptest::prelude::*;

    use super::render_chord;
    use crate::geometry::{Point, RenderGeometry};
    use crate::primitive::{DiagramMode, DrawPrimitive, Style};

    fn geometry() -> RenderGeometry {
        RenderGeometry::default_for(350.0, 500.0).expect("valid bounds")
    }

    fn circles(primitives: &[DrawPrimitive]) -> Vec<(Point, Style)> {
        primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::Circle { center, style, .. } => Some((*center, *style)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_c_renders_in_absolute_mode() {
        let shape = ChordShape::new("maj", "x32010", Some(0)).expect("valid shape");
        let drawing = render_chord(&shape, &geometry()).expect("renders");

        assert_eq!(drawing.mode, DiagramMode::Absolute);
        assert_eq!(drawing.with_style(Style::Barre).count(), 0);
        assert_eq!(
            drawing.primitives.last(),
            Some(&DrawPrimitive::Line {
                from: Point::new(1.0, 1.0),
                to: Point::new(6.0, 1.0),
                style: Style::Thick,
                width: None,
            })
        );
        assert!(
            !drawing
                .primitives
                .iter()
                .any(|primitive| matches!(primitive, DrawPrimitive::Text { .. }))
        );

        assert_eq!(
            circles(&drawing.primitives),
            vec![
                (Point::new(2.0, 3.5), Style::Normal),
                (Point::new(3.0, 2.5), Style::Normal),
                (Point::new(4.0, 0.5), Style::Outline),
                (Point::new(5.0, 1.5), Style::Normal),
                (Point::new(6.0, 0.5), Style::Outline),
            ]
        );
    }

    #[test]
    fn primitives_follow_the_documented_order() {
        let shape = ChordShape::new("maj", "x32010", None).expect("valid shape");
        let drawing = render_chord(&shape, &geometry()).expect("renders");
        let kinds: Vec<_> = drawing
            .primitives
            .iter()
            .map(|primitive| (primitive.kind(), primitive.style()))
            .collect();

        assert_eq!(kinds[0], ("rect", Style::Background));
        assert!(kinds[1..7].iter().all(|kind| *kind == ("line", Style::Normal)));
        assert!(kinds[7..12].iter().all(|kind| *kind == ("line", Style::Normal)));
        // muted string: two crossed lines
        assert_eq!(kinds[12], ("line", Style::Normal));
        assert_eq!(kinds[13], ("line", Style::Normal));
        assert_eq!(kinds[14], ("circle", Style::Normal));
        assert_eq!(kinds.last(), Some(&("line", Style::Thick)));
        assert_eq!(drawing.len(), 1 + 6 + 5 + 2 + 5 + 1);
    }

    #[test]
    fn grid_spans_strings_and_fret_rows() {
        let shape: ChordShape = "000000".parse().expect("valid encoding");
        let drawing = render_chord(&shape, &geometry()).expect("renders");
        assert_eq!(
            drawing.primitives[0],
            DrawPrimitive::Rect {
                from: Point::new(0.0, 0.0),
                to: Point::new(7.0, 5.0),
                style: Style::Background,
            }
        );
        assert_eq!(
            drawing.primitives[1],
            DrawPrimitive::Line {
                from: Point::new(1.0, 1.0),
                to: Point::new(1.0, 5.0),
                style: Style::Normal,
                width: None,
            }
        );
        assert_eq!(
            drawing.primitives[11],
            DrawPrimitive::Line {
                from: Point::new(1.0, 5.0),
                to: Point::new(6.0, 5.0),
                style: Style::Normal,
                width: None,
            }
        );
    }

    #[test]
    fn muted_string_draws_a_cross_above_the_nut() {
        let shape: ChordShape = "x00000".parse().expect("valid encoding");
        let drawing = render_chord(&shape, &geometry()).expect("renders");
        assert_eq!(
            drawing.primitives[12],
            DrawPrimitive::Line {
                from: Point::new(0.75, 0.70),
                to: Point::new(1.25, 0.30),
                style: Style::Normal,
                width: None,
            }
        );
        assert_eq!(
            drawing.primitives[13],
            DrawPrimitive::Line {
                from: Point::new(0.75, 0.30),
                to: Point::new(1.25, 0.70),
                style: Style::Normal,
                width: None,
            }
        );
    }

    #[test]
    fn high_barre_renders_offset_with_label() {
        let shape = ChordShape::new("major", "57756x", Some(5)).expect("valid shape");
        let drawing = render_chord(&shape, &geometry()).expect("renders");

        assert_eq!(drawing.mode, DiagramMode::Offset { start_fret: 5 });
        assert_eq!(drawing.with_style(Style::Thick).count(), 0);
        assert_eq!(
            drawing.primitives.last(),
            Some(&DrawPrimitive::Text {
                at: Point::new(0.2, 1.57),
                text: "5".to_string(),
                style: Style::Normal,
            })
        );

        let rows: Vec<f64> = circles(&drawing.primitives)
            .into_iter()
            .map(|(center, _)| center.y - 0.5)
            .collect();
        assert_eq!(rows, vec![1.0, 3.0, 3.0, 1.0, 2.0]);

        let barre: Vec<_> = drawing.with_style(Style::Barre).collect();
        assert_eq!(
            barre,
            vec![&DrawPrimitive::Line {
                from: Point::new(1.0, 1.5),
                to: Point::new(4.0, 1.5),
                style: Style::Barre,
                width: Some(0.5),
            }]
        );
    }

    #[test]
    fn fret_four_stays_absolute_and_fret_five_offsets() {
        let four: ChordShape = "x4xxxx".parse().expect("valid encoding");
        let five = ChordShape::new("five", "x5xxxx", Some(5)).expect("valid shape");

        let four = render_chord(&four, &geometry()).expect("renders");
        assert_eq!(four.mode, DiagramMode::Absolute);
        assert_eq!(four.with_style(Style::Thick).count(), 1);

        let five = render_chord(&five, &geometry()).expect("renders");
        assert!(five.mode.is_offset());
        assert_eq!(five.with_style(Style::Thick).count(), 0);
        assert_eq!(circles(&five.primitives), vec![(Point::new(2.0, 1.5), Style::Normal)]);
    }

    #[test]
    fn barre_line_needs_two_strings_on_the_barre_fret() {
        let lonely = ChordShape::new("lonely", "x3xxxx", Some(3)).expect("valid shape");
        let drawing = render_chord(&lonely, &geometry()).expect("renders");
        assert_eq!(drawing.with_style(Style::Barre).count(), 0);

        let pair = ChordShape::new("pair", "x3x3xx", Some(3)).expect("valid shape");
        let drawing = render_chord(&pair, &geometry()).expect("renders");
        assert_eq!(drawing.with_style(Style::Barre).count(), 1);
        // dots on the barre fret are still drawn
        assert_eq!(circles(&drawing.primitives).len(), 2);
    }

    #[test]
    fn no_fretted_strings_renders_absolute() {
        let shape = ChordShape::new("open", "x0000x", None).expect("valid shape");
        let drawing = render_chord(&shape, &geometry()).expect("renders");
        assert_eq!(drawing.mode, DiagramMode::Absolute);
        assert_eq!(drawing.with_style(Style::Outline).count(), 4);
    }

    #[test]
    fn barre_above_fretted_notes_forces_offset() {
        let shape = ChordShape::new("odd", "x32010", Some(7)).expect("valid shape");
        let drawing = render_chord(&shape, &geometry()).expect("renders");
        assert_eq!(drawing.mode, DiagramMode::Offset { start_fret: 1 });
        let rows: Vec<f64> = circles(&drawing.primitives)
            .into_iter()
            .filter(|(_, style)| *style == Style::Normal)
            .map(|(center, _)| center.y - 0.5)
            .collect();
        assert_eq!(rows, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn mismatched_string_count_is_rejected() {
        let shape: ChordShape = "x32010".parse().expect("valid encoding");
        let geometry = RenderGeometry::new(100.0, 100.0, 4, 5).expect("valid bounds");
        let err = render_chord(&shape, &geometry).expect_err("four strings");
        assert_eq!(err.code(), ChordErrorCode::Geometry);
    }

    #[test]
    fn finger_numbers_follow_their_dots() {
        let shape = ChordShape::new("m", "x32010", None)
            .and_then(|shape| shape.with_fingers(&[1, 3, 2, 0, 1, 0]))
            .expect("valid fingering");
        let drawing = render_chord(&shape, &geometry()).expect("renders");

        let fingers: Vec<(Point, &str)> = drawing
            .primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::Text {
                    at,
                    text,
                    style: Style::Finger,
                } => Some((*at, text.as_str())),
                _ => None,
            })
            .collect();
        // the muted string's finger is not drawn
        assert_eq!(
            fingers,
            vec![
                (Point::new(2.0, 3.5), "3"),
                (Point::new(3.0, 2.5), "2"),
                (Point::new(5.0, 1.5), "1"),
            ]
        );

        let dot = drawing
            .primitives
            .iter()
            .position(|primitive| {
                matches!(primitive, DrawPrimitive::Circle { center, .. } if *center == Point::new(2.0, 3.5))
            })
            .expect("dot on the A string");
        assert!(matches!(
            &drawing.primitives[dot + 1],
            DrawPrimitive::Text { style: Style::Finger, text, .. } if text == "3"
        ));
        assert_eq!(drawing.primitives.last().map(DrawPrimitive::style), Some(Style::Thick));

        let bare = ChordShape::new("m", "x32010", None).expect("valid shape");
        let drawing = render_chord(&bare, &geometry()).expect("renders");
        assert_eq!(drawing.with_style(Style::Finger).count(), 0);
    }

    fn symbol() -> impl Strategy<Value = char> {
        prop::sample::select("x0123456789abcdefghijklmno".chars().collect::<Vec<_>>())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_render_is_deterministic(
            symbols in prop::collection::vec(symbol(), 6),
            barre in 0_u8..=24,
            width in 10.0_f64..2000.0,
            height in 10.0_f64..2000.0,
        ) {
            let encoding: String = symbols.iter().collect();
            let shape = ChordShape::new("p", &encoding, Some(barre)).expect("alphabet only");
            let geometry = RenderGeometry::default_for(width, height).expect("positive bounds");
            let first = render_chord(&shape, &geometry).expect("renders");
            let second = render_chord(&shape, &geometry).expect("renders");
            prop_assert_eq!(&first, &second);

            let (_, max) = shape.fret_range();
            prop_assert_eq!(first.mode.is_offset(), max > 4);
            prop_assert_eq!(
                first.with_style(Style::Barre).count(),
                usize::from(shape.barre_span().is_some())
            );
            prop_assert_eq!(first.primitives[0].style(), Style::Background);
        }
    }
}
