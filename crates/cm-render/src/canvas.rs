//! Canvas2D context abstraction.
//!
//! A trait over the handful of Canvas2D calls a chord diagram needs, so the
//! same [`CanvasSurface`] drives a real browser context and a recording mock.

use std::f64::consts::TAU;

use crate::geometry::Point;
use crate::primitive::Style;
use crate::surface::Surface;

/// Canvas2D-like drawing context.
pub trait Canvas2dContext {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn save(&mut self);
    fn restore(&mut self);
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// Colors and stroke widths used when painting onto a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasRenderConfig {
    pub background: String,
    pub foreground: String,
    /// Fill for finger numbers drawn over the dots.
    pub finger: String,
    /// Stroke width for grid lines and the muted cross.
    pub stroke_width: f64,
    /// Stroke width for open-string circles.
    pub outline_width: f64,
    /// Stroke width for the nut.
    pub thick_width: f64,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for CanvasRenderConfig {
    fn default() -> Self {
        Self {
            background: String::from("#cccccc"),
            foreground: String::from("#000000"),
            finger: String::from("#ffffff"),
            stroke_width: 2.0,
            outline_width: 1.0,
            thick_width: 10.0,
            font_family: String::from("sans-serif"),
            font_size: 16.0,
        }
    }
}

impl CanvasRenderConfig {
    #[must_use]
    pub fn stroke_for(&self, style: Style) -> f64 {
        match style {
            Style::Outline => self.outline_width,
            Style::Thick | Style::Barre => self.thick_width,
            Style::Background | Style::Normal | Style::Finger => self.stroke_width,
        }
    }

    #[must_use]
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }
}

/// Paints surface calls onto a [`Canvas2dContext`].
#[derive(Debug)]
pub struct CanvasSurface<'a, C: Canvas2dContext> {
    ctx: &'a mut C,
    config: CanvasRenderConfig,
}

impl<'a, C: Canvas2dContext> CanvasSurface<'a, C> {
    /// Wrap `ctx`, clearing it first.
    pub fn new(ctx: &'a mut C, config: CanvasRenderConfig) -> Self {
        let (width, height) = (ctx.width(), ctx.height());
        ctx.clear_rect(0.0, 0.0, width, height);
        Self { ctx, config }
    }

    fn stroke_path(&mut self, style: Style, width: Option<f64>) {
        self.ctx.set_stroke_style(&self.config.foreground);
        self.ctx
            .set_line_width(width.unwrap_or_else(|| self.config.stroke_for(style)));
        self.ctx.stroke();
    }
}

impl<C: Canvas2dContext> Surface for CanvasSurface<'_, C> {
    fn rect(&mut self, from: Point, to: Point, style: Style) {
        let color = if style == Style::Background {
            &self.config.background
        } else {
            &self.config.foreground
        };
        self.ctx.set_fill_style(color);
        self.ctx
            .fill_rect(from.x, from.y, to.x - from.x, to.y - from.y);
    }

    fn line(&mut self, from: Point, to: Point, style: Style, width: Option<f64>) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.stroke_path(style, width);
    }

    fn circle(&mut self, center: Point, radius: f64, style: Style) {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        if style == Style::Outline {
            self.stroke_path(style, None);
        } else {
            self.ctx.set_fill_style(&self.config.foreground);
            self.ctx.fill();
        }
    }

    fn text(&mut self, at: Point, text: &str, style: Style) {
        let font = self.config.font();
        self.ctx.save();
        self.ctx.set_font(&font);
        if style == Style::Finger {
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            self.ctx.set_fill_style(&self.config.finger);
        } else {
            self.ctx.set_fill_style(&self.config.foreground);
        }
        self.ctx.fill_text(text, at.x, at.y);
        self.ctx.restore();
    }
}

/// A mock context that records every call.
#[derive(Debug, Clone)]
pub struct MockCanvas2dContext {
    width: f64,
    height: f64,
    operations: Vec<DrawOperation>,
}

/// A recorded Canvas2D call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOperation {
    Save,
    Restore,
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineWidth(f64),
    SetFont(String),
    SetTextAlign(String),
    SetTextBaseline(String),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc(f64, f64, f64, f64, f64),
    Fill,
    Stroke,
    FillRect(f64, f64, f64, f64),
    ClearRect(f64, f64, f64, f64),
    FillText(String, f64, f64),
}

impl MockCanvas2dContext {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn operations(&self) -> &[DrawOperation] {
        &self.operations
    }

    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

impl Canvas2dContext for MockCanvas2dContext {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.operations.push(DrawOperation::Save);
    }

    fn restore(&mut self) {
        self.operations.push(DrawOperation::Restore);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.operations
            .push(DrawOperation::SetFillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.operations
            .push(DrawOperation::SetStrokeStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.operations.push(DrawOperation::SetLineWidth(width));
    }

    fn set_font(&mut self, font: &str) {
        self.operations.push(DrawOperation::SetFont(font.to_string()));
    }

    fn set_text_align(&mut self, align: &str) {
        self.operations
            .push(DrawOperation::SetTextAlign(align.to_string()));
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.operations
            .push(DrawOperation::SetTextBaseline(baseline.to_string()));
    }

    fn begin_path(&mut self) {
        self.operations.push(DrawOperation::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.operations.push(DrawOperation::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.operations.push(DrawOperation::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.operations
            .push(DrawOperation::Arc(x, y, radius, start_angle, end_angle));
    }

    fn fill(&mut self) {
        self.operations.push(DrawOperation::Fill);
    }

    fn stroke(&mut self) {
        self.operations.push(DrawOperation::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.operations
            .push(DrawOperation::FillRect(x, y, width, height));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.operations
            .push(DrawOperation::ClearRect(x, y, width, height));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.operations
            .push(DrawOperation::FillText(text.to_string(), x, y));
    }
}
