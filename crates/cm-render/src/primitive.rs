//! Device-independent draw primitives.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, RenderGeometry};

/// Paint style a surface should apply to a primitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Style {
    Background,
    #[default]
    Normal,
    Outline,
    Thick,
    Barre,
    /// Finger number written inside a fretted dot.
    Finger,
}

impl Style {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Normal => "normal",
            Self::Outline => "outline",
            Self::Thick => "thick",
            Self::Barre => "barre",
            Self::Finger => "finger",
        }
    }
}

/// One draw instruction in grid units.
///
/// `x` counts string spacings and `y` counts fret spacings. Radii and line
/// widths are measured in fret spacings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawPrimitive {
    Rect {
        from: Point,
        to: Point,
        style: Style,
    },
    Line {
        from: Point,
        to: Point,
        style: Style,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
    },
    Circle {
        center: Point,
        radius: f64,
        style: Style,
    },
    Text {
        at: Point,
        text: String,
        style: Style,
    },
}

impl DrawPrimitive {
    #[must_use]
    pub const fn style(&self) -> Style {
        match self {
            Self::Rect { style, .. }
            | Self::Line { style, .. }
            | Self::Circle { style, .. }
            | Self::Text { style, .. } => *style,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Line { .. } => "line",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
        }
    }
}

/// Whether the diagram hangs from the nut or from a labelled starting fret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagramMode {
    Absolute,
    #[serde(rename_all = "camelCase")]
    Offset { start_fret: u8 },
}

impl DiagramMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Offset { .. } => "offset",
        }
    }

    #[must_use]
    pub const fn is_offset(self) -> bool {
        matches!(self, Self::Offset { .. })
    }
}

/// Output of one render pass: primitives plus the geometry that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordDrawing {
    pub geometry: RenderGeometry,
    pub mode: DiagramMode,
    pub primitives: Vec<DrawPrimitive>,
}

impl ChordDrawing {
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn with_style(&self, style: Style) -> impl Iterator<Item = &DrawPrimitive> {
        self.primitives
            .iter()
            .filter(move |primitive| primitive.style() == style)
    }
}
