#![forbid(unsafe_code)]

//! SVG painter for chord diagrams.
//!
//! [`SvgSurface`] implements [`cm_render::Surface`] by collecting SVG
//! elements; [`render_svg`] runs the whole pipeline from a chord shape to a
//! standalone SVG document.

mod attributes;
mod document;
mod element;
mod theme;

pub use attributes::{Attribute, AttributeValue, Attributes, escape_xml_text, format_number};
pub use document::SvgDocument;
pub use element::{Element, ElementKind};
pub use theme::{ParseThemePresetError, Theme, ThemeColors, ThemePreset};

use cm_core::{ChordError, ChordShape};
use cm_render::{ChordDrawing, DiagramMode, Point, RenderGeometry, Style, Surface, paint, render_chord};
use tracing::debug;

/// Configuration for SVG rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderConfig {
    /// Emit `width="100%" height="100%"` instead of fixed dimensions.
    pub responsive: bool,
    /// Emit title, description and `role="img"`.
    pub accessible: bool,
    pub theme: ThemePreset,
    /// Embed the theme's style block.
    pub embed_theme_css: bool,
    /// Label font size as a fraction of the fret spacing.
    pub label_scale: f64,
    /// Finger-number font size as a fraction of the fret spacing.
    pub finger_scale: f64,
    /// Grid and muted-cross stroke width in pixels.
    pub stroke_width: f64,
    /// Open-string circle stroke width in pixels.
    pub outline_width: f64,
    /// Nut stroke width in pixels.
    pub thick_width: f64,
    pub root_classes: Vec<String>,
}

impl Default for SvgRenderConfig {
    fn default() -> Self {
        Self {
            responsive: false,
            accessible: true,
            theme: ThemePreset::Classic,
            embed_theme_css: true,
            label_scale: 0.4,
            finger_scale: 0.3,
            stroke_width: 2.0,
            outline_width: 1.0,
            thick_width: 10.0,
            root_classes: Vec::new(),
        }
    }
}

impl SvgRenderConfig {
    /// Bare markup: no accessibility block, no embedded CSS.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            accessible: false,
            embed_theme_css: false,
            ..Self::default()
        }
    }

    /// Responsive, accessible and styled.
    #[must_use]
    pub fn rich() -> Self {
        Self {
            responsive: true,
            root_classes: vec![String::from("cm-chord")],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stroke_for(&self, style: Style) -> f64 {
        match style {
            Style::Outline => self.outline_width,
            Style::Thick => self.thick_width,
            Style::Background | Style::Normal | Style::Barre | Style::Finger => {
                self.stroke_width
            }
        }
    }
}

/// Collects SVG elements for each surface call.
#[derive(Debug, Clone)]
pub struct SvgSurface<'a> {
    config: &'a SvgRenderConfig,
    colors: ThemeColors,
    font_size: f64,
    finger_size: f64,
    elements: Vec<Element>,
}

impl<'a> SvgSurface<'a> {
    #[must_use]
    pub fn new(config: &'a SvgRenderConfig, geometry: &RenderGeometry) -> Self {
        Self {
            config,
            colors: ThemeColors::from_preset(config.theme),
            font_size: geometry.fret_spacing() * config.label_scale,
            finger_size: geometry.fret_spacing() * config.finger_scale,
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    fn ink_for(&self, style: Style) -> &str {
        match style {
            Style::Background => &self.colors.background,
            Style::Barre => &self.colors.barre,
            Style::Finger => &self.colors.finger,
            Style::Normal | Style::Outline | Style::Thick => &self.colors.ink,
        }
    }
}

fn style_class(style: Style) -> String {
    format!("cm-{}", style.as_str())
}

impl Surface for SvgSurface<'_> {
    fn rect(&mut self, from: Point, to: Point, style: Style) {
        let rect = Element::rect()
            .x(from.x)
            .y(from.y)
            .width(to.x - from.x)
            .height(to.y - from.y)
            .fill(self.ink_for(style))
            .class(&style_class(style));
        self.elements.push(rect);
    }

    fn line(&mut self, from: Point, to: Point, style: Style, width: Option<f64>) {
        let line = Element::line()
            .x1(from.x)
            .y1(from.y)
            .x2(to.x)
            .y2(to.y)
            .stroke(self.ink_for(style))
            .stroke_width(width.unwrap_or_else(|| self.config.stroke_for(style)))
            .class(&style_class(style));
        self.elements.push(line);
    }

    fn circle(&mut self, center: Point, radius: f64, style: Style) {
        let ink = self.ink_for(style).to_string();
        let mut circle = Element::circle().cx(center.x).cy(center.y).r(radius);
        circle = if style == Style::Outline {
            circle
                .fill("none")
                .stroke(&ink)
                .stroke_width(self.config.outline_width)
        } else {
            circle.fill(&ink)
        };
        self.elements.push(circle.class(&style_class(style)));
    }

    fn text(&mut self, at: Point, text: &str, style: Style) {
        if style == Style::Finger {
            let finger = Element::text()
                .x(at.x)
                .y(at.y)
                .font_size(self.finger_size)
                .fill(self.ink_for(style))
                .attr("text-anchor", "middle")
                .attr("dominant-baseline", "central")
                .class(&style_class(style))
                .content(text);
            self.elements.push(finger);
            return;
        }
        let label = Element::text()
            .x(at.x)
            .y(at.y)
            .font_size(self.font_size)
            .fill(&self.colors.label)
            .class(&style_class(style))
            .class("cm-label")
            .content(text);
        self.elements.push(label);
    }
}

/// Paint an already rendered drawing into an SVG document.
#[must_use]
pub fn render_drawing_svg(drawing: &ChordDrawing, config: &SvgRenderConfig) -> SvgDocument {
    let geometry = &drawing.geometry;
    let mut surface = SvgSurface::new(config, geometry);
    paint(drawing, &mut surface);

    let width = geometry.width();
    let height = geometry.height();
    let mut doc = SvgDocument::new().viewbox(0.0, 0.0, width, height);
    doc = if config.responsive {
        doc.responsive()
    } else {
        doc.width(&format_number(width))
            .height(&format_number(height))
    };

    for class in &config.root_classes {
        doc = doc.class(class);
    }
    doc = doc.data("mode", drawing.mode.as_str());
    if let DiagramMode::Offset { start_fret } = drawing.mode {
        doc = doc.data("start-fret", &start_fret.to_string());
    }
    if config.embed_theme_css {
        doc = doc.style(Theme::from_preset(config.theme).to_svg_style());
    }

    doc.children(surface.into_elements())
}

/// Render a chord shape to a standalone SVG string.
pub fn render_svg(
    shape: &ChordShape,
    geometry: &RenderGeometry,
    config: &SvgRenderConfig,
) -> Result<String, ChordError> {
    let drawing = render_chord(shape, geometry)?;
    let mut doc = render_drawing_svg(&drawing, config).data("encoding", &shape.encoding());

    if config.accessible {
        let title = if shape.suffix().is_empty() {
            String::from("Chord diagram")
        } else {
            format!("{} chord diagram", shape.suffix())
        };
        let desc = match drawing.mode {
            DiagramMode::Absolute => format!("Fret encoding {} from the nut", shape.encoding()),
            DiagramMode::Offset { start_fret } => format!(
                "Fret encoding {} starting at fret {start_fret}",
                shape.encoding()
            ),
        };
        doc = doc.accessible(title, desc);
    }

    let svg = doc.to_string();
    debug!(
        encoding = %shape.encoding(),
        theme = config.theme.as_str(),
        bytes = svg.len(),
        "svg rendered"
    );
    Ok(svg)
}
