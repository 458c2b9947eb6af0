//! Terminal chord renderer.

use cm_core::{ChordError, ChordShape};
use cm_render::{
    ChordDrawing, DiagramMode, Point, RenderGeometry, Style, Surface, paint, render_chord,
};
use tracing::debug;

use crate::ascii::{GlyphGrid, Stroke};
use crate::canvas::Canvas;
use crate::config::{RenderMode, TermRenderConfig};

const OPEN_GLYPH: char = 'o';
const FRETTED_GLYPH: char = '@';

/// Result of terminal rendering.
#[derive(Debug, Clone)]
pub struct TermRenderResult {
    /// Rendered string output, header included.
    pub output: String,
    /// Number of cells wide.
    pub width: usize,
    /// Number of cells tall, header excluded.
    pub height: usize,
    pub render_mode: RenderMode,
    pub diagram_mode: DiagramMode,
}

enum Target {
    Pixels(Canvas),
    Glyphs(GlyphGrid),
}

/// A [`Surface`] that rasterizes onto terminal cells.
///
/// Surface units are pixels of the sub-cell canvas, or whole cells in ASCII
/// mode. The background is left blank.
pub struct TermSurface {
    target: Target,
    thick_pixels: usize,
}

impl TermSurface {
    #[must_use]
    pub fn new(config: &TermRenderConfig) -> Self {
        let target = match config.render_mode {
            RenderMode::Ascii => Target::Glyphs(GlyphGrid::new(config.cols, config.rows)),
            mode => Target::Pixels(Canvas::new(config.cols, config.rows, mode)),
        };
        Self {
            target,
            thick_pixels: config.thick_pixels.max(1),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        match &self.target {
            Target::Pixels(canvas) => canvas.render(),
            Target::Glyphs(grid) => grid.render(),
        }
    }

    fn stroke_thickness(&self, style: Style, width: Option<f64>) -> usize {
        match (style, width) {
            (_, Some(width)) => to_cells(width).max(1).unsigned_abs(),
            (Style::Thick | Style::Barre, None) => self.thick_pixels,
            _ => 1,
        }
    }
}

impl Surface for TermSurface {
    fn rect(&mut self, _from: Point, _to: Point, _style: Style) {}

    fn line(&mut self, from: Point, to: Point, style: Style, width: Option<f64>) {
        let thickness = self.stroke_thickness(style, width);
        let (x0, y0) = (to_cells(from.x), to_cells(from.y));
        let (x1, y1) = (to_cells(to.x), to_cells(to.y));
        match &mut self.target {
            Target::Glyphs(grid) => {
                let stroke = if matches!(style, Style::Thick | Style::Barre) {
                    Stroke::Heavy
                } else {
                    Stroke::from_delta(to.x - from.x, to.y - from.y)
                };
                // A diagonal squashed onto one row reads as a single mark.
                if stroke.is_diagonal() && y0 == y1 {
                    grid.stamp((x0 + x1) / 2, y0, stroke.glyph());
                } else {
                    grid.draw_line(x0, y0, x1, y1, stroke);
                }
            }
            Target::Pixels(canvas) => {
                let horizontal = (x1 - x0).abs() >= (y1 - y0).abs();
                for offset in parallel_offsets(thickness) {
                    if horizontal {
                        canvas.draw_line(x0, y0 + offset, x1, y1 + offset);
                    } else {
                        canvas.draw_line(x0 + offset, y0, x1 + offset, y1);
                    }
                }
            }
        }
    }

    fn circle(&mut self, center: Point, radius: f64, style: Style) {
        let (cx, cy) = (to_cells(center.x), to_cells(center.y));
        match &mut self.target {
            Target::Glyphs(grid) => {
                let glyph = if style == Style::Outline {
                    OPEN_GLYPH
                } else {
                    FRETTED_GLYPH
                };
                grid.put(cx, cy, glyph);
            }
            Target::Pixels(canvas) if style == Style::Outline => {
                canvas.draw_circle(cx, cy, to_cells(radius));
            }
            Target::Pixels(canvas) => canvas.fill_circle(cx, cy, to_cells(radius)),
        }
    }

    fn text(&mut self, at: Point, text: &str, _style: Style) {
        let (x, y) = (to_cells(at.x).max(0), to_cells(at.y).max(0));
        match &mut self.target {
            Target::Glyphs(grid) => grid.put_text(x, y, text),
            Target::Pixels(canvas) => {
                let (mult_x, mult_y) = canvas.mode().subcell_multiplier();
                canvas.put_text(x.unsigned_abs() / mult_x, y.unsigned_abs() / mult_y, text);
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_cells(value: f64) -> isize {
    value.round() as isize
}

/// Offsets for `thickness` parallel strokes, centred on zero.
#[allow(clippy::cast_possible_wrap)]
fn parallel_offsets(thickness: usize) -> impl Iterator<Item = isize> {
    let thickness = thickness as isize;
    let start = -(thickness - 1) / 2;
    start..start + thickness
}

/// Geometry spanning the canvas so the last string and fret land on it.
#[allow(clippy::cast_precision_loss)]
fn term_geometry(config: &TermRenderConfig) -> Result<RenderGeometry, ChordError> {
    let (pixel_width, pixel_height) = config.pixel_dimensions();
    RenderGeometry::default_for(
        pixel_width.saturating_sub(1) as f64,
        pixel_height.saturating_sub(1) as f64,
    )
}

/// Paint an already-rendered drawing onto a terminal surface.
#[must_use]
pub fn render_drawing_term(drawing: &ChordDrawing, config: &TermRenderConfig) -> String {
    let mut surface = TermSurface::new(config);
    paint(drawing, &mut surface);
    surface.render()
}

fn header(shape: &ChordShape) -> String {
    if shape.suffix().is_empty() {
        format!("[{}]", shape.encoding())
    } else {
        format!("{} [{}]", shape.suffix(), shape.encoding())
    }
}

/// Render `shape` to terminal text.
pub fn render_term_result(
    shape: &ChordShape,
    config: &TermRenderConfig,
) -> Result<TermRenderResult, ChordError> {
    let geometry = term_geometry(config)?;
    let drawing = render_chord(shape, &geometry)?;
    let body = render_drawing_term(&drawing, config);
    let output = if config.show_header {
        format!("{}\n{body}", header(shape))
    } else {
        body
    };

    debug!(
        encoding = %shape.encoding(),
        render_mode = config.render_mode.as_str(),
        cols = config.cols,
        rows = config.rows,
        "chord rendered to terminal"
    );

    Ok(TermRenderResult {
        output,
        width: config.cols,
        height: config.rows,
        render_mode: config.render_mode,
        diagram_mode: drawing.mode,
    })
}

/// Render `shape` to terminal text and return only the output string.
pub fn render_term(shape: &ChordShape, config: &TermRenderConfig) -> Result<String, ChordError> {
    render_term_result(shape, config).map(|result| result.output)
}
