//! Painting a drawing onto any backend.

use crate::geometry::Point;
use crate::primitive::{ChordDrawing, DrawPrimitive, Style};

/// A target that can draw primitives already projected to surface units.
pub trait Surface {
    /// Fill the axis-aligned rectangle between two corners.
    fn rect(&mut self, from: Point, to: Point, style: Style);

    /// Stroke a line. `width` overrides the style's stroke width when set.
    fn line(&mut self, from: Point, to: Point, style: Style, width: Option<f64>);

    /// Outline or fill a circle depending on the style.
    fn circle(&mut self, center: Point, radius: f64, style: Style);

    fn text(&mut self, at: Point, text: &str, style: Style);
}

/// Project every primitive of `drawing` and hand it to `surface`, in order.
/// Returns the number of calls made.
pub fn paint<S: Surface + ?Sized>(drawing: &ChordDrawing, surface: &mut S) -> usize {
    let geometry = &drawing.geometry;
    for primitive in &drawing.primitives {
        match primitive {
            DrawPrimitive::Rect { from, to, style } => {
                surface.rect(geometry.project(*from), geometry.project(*to), *style);
            }
            DrawPrimitive::Line {
                from,
                to,
                style,
                width,
            } => surface.line(
                geometry.project(*from),
                geometry.project(*to),
                *style,
                width.map(|width| geometry.project_length(width)),
            ),
            DrawPrimitive::Circle {
                center,
                radius,
                style,
            } => surface.circle(
                geometry.project(*center),
                geometry.project_length(*radius),
                *style,
            ),
            DrawPrimitive::Text { at, text, style } => {
                surface.text(geometry.project(*at), text, *style);
            }
        }
    }
    drawing.primitives.len()
}

/// A recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Rect(Point, Point, Style),
    Line(Point, Point, Style, Option<f64>),
    Circle(Point, f64, Style),
    Text(Point, String, Style),
}

/// A surface that only records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn rect(&mut self, from: Point, to: Point, style: Style) {
        self.calls.push(SurfaceCall::Rect(from, to, style));
    }

    fn line(&mut self, from: Point, to: Point, style: Style, width: Option<f64>) {
        self.calls.push(SurfaceCall::Line(from, to, style, width));
    }

    fn circle(&mut self, center: Point, radius: f64, style: Style) {
        self.calls.push(SurfaceCall::Circle(center, radius, style));
    }

    fn text(&mut self, at: Point, text: &str, style: Style) {
        self.calls
            .push(SurfaceCall::Text(at, text.to_string(), style));
    }
}
