//! Color themes for chord diagrams.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreset {
    /// Light gray board with black ink.
    #[default]
    Classic,
    /// White board, soft gray grid.
    Light,
    Dark,
    HighContrast,
    /// White ink on blue.
    Blueprint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemePresetError(String);

impl std::fmt::Display for ParseThemePresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown theme preset: {}", self.0)
    }
}

impl std::error::Error for ParseThemePresetError {}

impl FromStr for ThemePreset {
    type Err = ParseThemePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Ok(Self::Classic),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "high-contrast" | "highcontrast" => Ok(Self::HighContrast),
            "blueprint" => Ok(Self::Blueprint),
            _ => Err(ParseThemePresetError(s.to_string())),
        }
    }
}

impl ThemePreset {
    pub const ALL: [Self; 5] = [
        Self::Classic,
        Self::Light,
        Self::Dark,
        Self::HighContrast,
        Self::Blueprint,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::HighContrast => "high-contrast",
            Self::Blueprint => "blueprint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: String,
    /// Grid, dots, cross and nut.
    pub ink: String,
    /// Barre line.
    pub barre: String,
    /// Starting-fret label.
    pub label: String,
    /// Finger numbers inside the dots.
    pub finger: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::from_preset(ThemePreset::Classic)
    }
}

impl ThemeColors {
    #[must_use]
    pub fn from_preset(preset: ThemePreset) -> Self {
        let (background, ink, barre, label, finger) = match preset {
            ThemePreset::Classic => ("#cccccc", "#000000", "#000000", "#000000", "#ffffff"),
            ThemePreset::Light => ("#ffffff", "#4b5563", "#111827", "#111827", "#ffffff"),
            ThemePreset::Dark => ("#1f2937", "#e5e7eb", "#f9fafb", "#f9fafb", "#111827"),
            ThemePreset::HighContrast => ("#ffffff", "#000000", "#000000", "#000000", "#ffffff"),
            ThemePreset::Blueprint => ("#1e3a5f", "#ffffff", "#93c5fd", "#ffffff", "#1e3a5f"),
        };
        Self {
            background: background.into(),
            ink: ink.into(),
            barre: barre.into(),
            label: label.into(),
            finger: finger.into(),
        }
    }
}

/// Colors plus label typography.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub colors: ThemeColors,
    pub font_family: String,
    pub font_weight: u16,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_preset(ThemePreset::Classic)
    }
}

impl Theme {
    #[must_use]
    pub fn from_preset(preset: ThemePreset) -> Self {
        Self {
            colors: ThemeColors::from_preset(preset),
            font_family: String::from("system-ui, -apple-system, sans-serif"),
            font_weight: if preset == ThemePreset::HighContrast {
                700
            } else {
                500
            },
        }
    }

    /// Style block embedded in the root element. Colors are painted inline,
    /// so only text typography lives here.
    #[must_use]
    pub fn to_svg_style(&self) -> String {
        format!(
            ".cm-label, .cm-finger {{\n  font-family: {};\n  font-weight: {};\n}}\n",
            self.font_family, self.font_weight
        )
    }
}
