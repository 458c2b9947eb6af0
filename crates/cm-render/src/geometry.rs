//! Surface geometry and the grid-to-surface projection.

use cm_core::{ChordError, STRING_COUNT};
use serde::{Deserialize, Serialize};

/// Number of fret rows a standard diagram shows.
pub const DEFAULT_FRET_ROWS: usize = 5;

/// A point either in grid units or, after projection, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the target surface and the grid drawn on it.
///
/// Spacings are derived from the bounds on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderGeometry {
    width: f64,
    height: f64,
    string_count: usize,
    fret_rows: usize,
}

impl RenderGeometry {
    pub fn new(
        width: f64,
        height: f64,
        string_count: usize,
        fret_rows: usize,
    ) -> Result<Self, ChordError> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChordError::InvalidGeometry(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if string_count == 0 {
            return Err(ChordError::InvalidGeometry(
                "string count must be at least 1".to_string(),
            ));
        }
        if fret_rows == 0 {
            return Err(ChordError::InvalidGeometry(
                "fret row count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            width,
            height,
            string_count,
            fret_rows,
        })
    }

    /// Six strings and five fret rows over the given bounds.
    pub fn default_for(width: f64, height: f64) -> Result<Self, ChordError> {
        Self::new(width, height, STRING_COUNT, DEFAULT_FRET_ROWS)
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub const fn string_count(&self) -> usize {
        self.string_count
    }

    #[must_use]
    pub const fn fret_rows(&self) -> usize {
        self.fret_rows
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn string_spacing(&self) -> f64 {
        self.width / (self.string_count + 1) as f64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fret_spacing(&self) -> f64 {
        self.height / self.fret_rows as f64
    }

    /// Map a grid point to surface units.
    #[must_use]
    pub fn project(&self, point: Point) -> Point {
        Point::new(
            point.x * self.string_spacing(),
            point.y * self.fret_spacing(),
        )
    }

    /// Map a length measured in fret rows to surface units.
    #[must_use]
    pub fn project_length(&self, length: f64) -> f64 {
        length * self.fret_spacing()
    }
}
