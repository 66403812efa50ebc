//! Styling of QR code fields.
//!
//! The groups mirror what the issuance side uses to draw the final code:
//! data dots, the three finder-pattern frames ("corner squares") and their
//! centres ("corner dots"), the background, and the error-correction level.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DotShape {
    Square,
    Dots,
    #[default]
    Rounded,
    ExtraRounded,
    Classy,
    ClassyRounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareShape {
    Square,
    Dot,
    #[default]
    ExtraRounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotShape {
    Square,
    #[default]
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    #[default]
    H,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient in `0.0..=1.0`.
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Rotation in radians; linear gradients only.
    #[serde(default)]
    pub rotation: f64,
    pub color_stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotsOptions {
    #[serde(rename = "type")]
    pub shape: DotShape,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerSquareOptions {
    #[serde(rename = "type")]
    pub shape: CornerSquareShape,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerDotOptions {
    #[serde(rename = "type")]
    pub shape: CornerDotShape,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

/// Complete QR styling as stored with the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrStyle {
    pub dots_options: DotsOptions,
    pub corners_square_options: CornerSquareOptions,
    pub corners_dot_options: CornerDotOptions,
    pub background_options: BackgroundOptions,
    pub error_correction_level: ErrorCorrection,
}

impl QrStyle {
    /// Defaults for a new QR field: rounded dots, extra-rounded corners, a
    /// single-colour fill in `accent` on a `background` backdrop, level H.
    pub fn branded(accent: &str, background: &str) -> Self {
        Self {
            dots_options: DotsOptions {
                shape: DotShape::Rounded,
                color: accent.to_string(),
                gradient: None,
            },
            corners_square_options: CornerSquareOptions {
                shape: CornerSquareShape::ExtraRounded,
                color: accent.to_string(),
            },
            corners_dot_options: CornerDotOptions {
                shape: CornerDotShape::Dot,
                color: accent.to_string(),
            },
            background_options: BackgroundOptions {
                color: background.to_string(),
                gradient: None,
            },
            error_correction_level: ErrorCorrection::H,
        }
    }
}

impl Default for QrStyle {
    fn default() -> Self {
        Self::branded(certkit_core::constants::BRAND_ACCENT_COLOR, "#FFFFFF")
    }
}
