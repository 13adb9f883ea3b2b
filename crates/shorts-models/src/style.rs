//! Caption style variants and per-render color jitter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fonts available for caption rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaptionFont {
    Arial,
    Verdana,
    Impact,
}

impl CaptionFont {
    /// All fonts the randomization engine may pick from.
    pub const ALL: &'static [CaptionFont] =
        &[CaptionFont::Arial, CaptionFont::Verdana, CaptionFont::Impact];

    /// Font family name as understood by the subtitle renderer.
    pub fn family_name(&self) -> &'static str {
        match self {
            CaptionFont::Arial => "Arial",
            CaptionFont::Verdana => "Verdana",
            CaptionFont::Impact => "Impact",
        }
    }
}

impl fmt::Display for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family_name())
    }
}

impl FromStr for CaptionFont {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arial" => Ok(CaptionFont::Arial),
            "verdana" => Ok(CaptionFont::Verdana),
            "impact" => Ok(CaptionFont::Impact),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

/// Caption colors, stored as RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaptionColor {
    Yellow,
    White,
    Cyan,
    Magenta,
    Black,
}

impl CaptionColor {
    /// Primary colors the randomization engine may pick from.
    pub const PRIMARY: &'static [CaptionColor] = &[
        CaptionColor::Yellow,
        CaptionColor::White,
        CaptionColor::Cyan,
        CaptionColor::Magenta,
    ];

    /// RGB components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            CaptionColor::Yellow => (255, 255, 0),
            CaptionColor::White => (255, 255, 255),
            CaptionColor::Cyan => (0, 255, 255),
            CaptionColor::Magenta => (255, 0, 255),
            CaptionColor::Black => (0, 0, 0),
        }
    }
}

/// Vertical caption placement on the 9:16 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPosition {
    /// Vertically centered
    #[default]
    Center,
    /// Lower third of the frame
    LowerThird,
}

impl CaptionPosition {
    pub const ALL: &'static [CaptionPosition] =
        &[CaptionPosition::Center, CaptionPosition::LowerThird];
}

#[derive(Debug, Error)]
#[error("Unknown style value: {0}")]
pub struct StyleParseError(String);

/// One caption styling choice for a whole render, drawn once from the
/// randomization engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleVariant {
    pub font: CaptionFont,
    pub primary_color: CaptionColor,
    pub outline_color: CaptionColor,
    pub position: CaptionPosition,
    /// Multiplier applied to the base font size
    pub size_scale: f64,
}

impl Default for StyleVariant {
    fn default() -> Self {
        Self {
            font: CaptionFont::Arial,
            primary_color: CaptionColor::Yellow,
            outline_color: CaptionColor::Black,
            position: CaptionPosition::Center,
            size_scale: 1.0,
        }
    }
}

/// Per-render brightness/contrast adjustment, applied uniformly across
/// all frames of one output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ColorJitter {
    /// Brightness offset, within [-0.05, 0.05]
    pub brightness: f64,
    /// Contrast offset, within [-0.05, 0.05]
    pub contrast: f64,
}

impl ColorJitter {
    /// Maximum magnitude of either adjustment.
    pub const MAX_MAGNITUDE: f64 = 0.05;

    pub fn new(brightness: f64, contrast: f64) -> Self {
        Self {
            brightness: brightness.clamp(-Self::MAX_MAGNITUDE, Self::MAX_MAGNITUDE),
            contrast: contrast.clamp(-Self::MAX_MAGNITUDE, Self::MAX_MAGNITUDE),
        }
    }

    /// Whether the jitter changes anything at all.
    pub fn is_identity(&self) -> bool {
        self.brightness == 0.0 && self.contrast == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_parse() {
        assert_eq!("impact".parse::<CaptionFont>().unwrap(), CaptionFont::Impact);
        assert_eq!("ARIAL".parse::<CaptionFont>().unwrap(), CaptionFont::Arial);
        assert!("comic sans".parse::<CaptionFont>().is_err());
    }

    #[test]
    fn test_color_rgb() {
        assert_eq!(CaptionColor::Yellow.rgb(), (255, 255, 0));
        assert_eq!(CaptionColor::Cyan.rgb(), (0, 255, 255));
    }

    #[test]
    fn test_jitter_clamped() {
        let jitter = ColorJitter::new(0.3, -0.2);
        assert!((jitter.brightness - 0.05).abs() < 1e-9);
        assert!((jitter.contrast + 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_default_variant() {
        let variant = StyleVariant::default();
        assert_eq!(variant.font, CaptionFont::Arial);
        assert_eq!(variant.primary_color, CaptionColor::Yellow);
        assert!((variant.size_scale - 1.0).abs() < 1e-9);
    }
}
