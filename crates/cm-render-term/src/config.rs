//! Terminal renderer configuration types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How pixels map onto terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// 2x4 dots per cell (U+2800-U+28FF).
    #[default]
    Braille,
    /// 2x2 quarter blocks per cell.
    Block,
    /// 1x2 half blocks per cell.
    HalfBlock,
    /// One plain ASCII glyph per cell.
    Ascii,
}

impl RenderMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Braille => "braille",
            Self::Block => "block",
            Self::HalfBlock => "half-block",
            Self::Ascii => "ascii",
        }
    }

    /// Pixels per cell along x and y.
    #[must_use]
    pub const fn subcell_multiplier(self) -> (usize, usize) {
        match self {
            Self::Braille => (2, 4),
            Self::Block => (2, 2),
            Self::HalfBlock => (1, 2),
            Self::Ascii => (1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRenderModeError(String);

impl std::fmt::Display for ParseRenderModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown terminal render mode: {}", self.0)
    }
}

impl std::error::Error for ParseRenderModeError {}

impl FromStr for RenderMode {
    type Err = ParseRenderModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "braille" => Ok(Self::Braille),
            "block" => Ok(Self::Block),
            "half-block" | "halfblock" => Ok(Self::HalfBlock),
            "ascii" => Ok(Self::Ascii),
            _ => Err(ParseRenderModeError(s.to_string())),
        }
    }
}

/// Configuration for terminal chord rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TermRenderConfig {
    pub render_mode: RenderMode,
    /// Diagram width in terminal columns.
    pub cols: usize,
    /// Diagram height in terminal rows.
    pub rows: usize,
    /// Pixel rows used for the nut and the barre.
    pub thick_pixels: usize,
    /// Print `suffix [encoding]` above the diagram.
    pub show_header: bool,
}

impl Default for TermRenderConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Braille,
            cols: 32,
            rows: 9,
            thick_pixels: 2,
            show_header: true,
        }
    }
}

impl TermRenderConfig {
    /// Plain ASCII, fits any terminal.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            render_mode: RenderMode::Ascii,
            cols: 29,
            rows: 11,
            thick_pixels: 1,
            ..Self::default()
        }
    }

    /// Large Braille diagram.
    #[must_use]
    pub fn rich() -> Self {
        Self {
            render_mode: RenderMode::Braille,
            cols: 46,
            rows: 14,
            thick_pixels: 3,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Pixel dimensions of the drawing area.
    #[must_use]
    pub const fn pixel_dimensions(&self) -> (usize, usize) {
        let (mult_x, mult_y) = self.render_mode.subcell_multiplier();
        (
            self.cols.saturating_mul(mult_x),
            self.rows.saturating_mul(mult_y),
        )
    }
}
