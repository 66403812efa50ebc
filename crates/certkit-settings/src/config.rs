//! Designer configuration
//!
//! Provides configuration file handling and validation for the template
//! designer. Supports JSON and TOML file formats stored in the platform
//! configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Surface settings (editing area size and background)
//! - Field geometry defaults (minimum sizes, QR size, handle size)
//! - Text defaults (font family, size, colour, fit range)
//! - QR preview styling defaults
//! - Timing (image decode timeout, redraw cadence)

use certkit_core::constants;
use certkit_core::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SettingsError, SettingsResult};

/// Editing surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    /// Surface width in pixels
    pub width: f64,
    /// Surface height in pixels
    pub height: f64,
    /// Fill drawn behind the template image
    pub background: String,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            width: constants::DEFAULT_SURFACE_WIDTH,
            height: constants::DEFAULT_SURFACE_HEIGHT,
            background: "#F3F4F6".to_string(),
        }
    }
}

/// Field geometry defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub min_width: f64,
    pub min_height: f64,
    pub min_qr_size: f64,
    pub qr_default_size: f64,
    /// Width given to fields loaded without coordinates
    pub not_displayed_width: f64,
    /// Height given to fields loaded without coordinates
    pub not_displayed_height: f64,
    pub handle_size: f64,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            min_width: constants::MIN_FIELD_WIDTH,
            min_height: constants::MIN_FIELD_HEIGHT,
            min_qr_size: constants::MIN_QR_SIZE,
            qr_default_size: constants::DEFAULT_QR_SIZE,
            not_displayed_width: constants::NOT_DISPLAYED_WIDTH,
            not_displayed_height: constants::NOT_DISPLAYED_HEIGHT,
            handle_size: constants::HANDLE_SIZE,
        }
    }
}

/// Text defaults and font-fit range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub default_font_family: String,
    pub default_font_size: f64,
    pub default_font_color: String,
    pub min_font_size: u32,
    pub max_font_size: u32,
    /// Padding kept free on each side of the box when fitting text
    pub fit_padding: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            default_font_family: constants::DEFAULT_FONT_FAMILY.to_string(),
            default_font_size: constants::DEFAULT_FONT_SIZE,
            default_font_color: constants::DEFAULT_FONT_COLOR.to_string(),
            min_font_size: constants::MIN_FONT_SIZE,
            max_font_size: constants::MAX_FONT_SIZE,
            fit_padding: constants::FIT_PADDING,
        }
    }
}

/// QR preview defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    /// Fill colour for dots and corners of new QR fields
    pub accent_color: String,
    pub background_color: String,
    /// Payload encoded in the placeholder preview
    pub preview_data: String,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            accent_color: constants::BRAND_ACCENT_COLOR.to_string(),
            background_color: "#FFFFFF".to_string(),
            preview_data: "https://verify.example.com/credential/preview".to_string(),
        }
    }
}

/// Timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// How long to wait for an image decode before degrading to "no image"
    pub image_decode_timeout_ms: u64,
    /// Redraw cadence in milliseconds
    pub frame_interval_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            image_decode_timeout_ms: constants::IMAGE_DECODE_TIMEOUT_MS,
            frame_interval_ms: constants::FRAME_INTERVAL_MS,
        }
    }
}

impl TimingSettings {
    pub fn image_decode_timeout(&self) -> Duration {
        Duration::from_millis(self.image_decode_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Complete designer configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DesignerConfig {
    pub surface: SurfaceSettings,
    pub fields: FieldSettings,
    pub text: TextSettings,
    pub qr: QrSettings,
    pub timing: TimingSettings,
}

impl DesignerConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<config_dir>/certkit/designer.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(base.join("certkit").join("designer.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, or defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No designer config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded designer config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring designer config at {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path).as_deref() {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.surface.width <= 0.0 || self.surface.height <= 0.0 {
            return Err(SettingsError::invalid(
                "surface",
                "surface dimensions must be > 0",
            ));
        }

        if self.fields.min_width <= 0.0 || self.fields.min_height <= 0.0 {
            return Err(SettingsError::invalid(
                "fields.min_width",
                "minimum field size must be > 0",
            ));
        }

        if self.fields.qr_default_size < self.fields.min_qr_size {
            return Err(SettingsError::invalid(
                "fields.qr_default_size",
                "default QR size is below the QR floor",
            ));
        }

        if self.fields.handle_size <= 0.0 {
            return Err(SettingsError::invalid(
                "fields.handle_size",
                "handle size must be > 0",
            ));
        }

        if self.text.min_font_size == 0 || self.text.min_font_size > self.text.max_font_size {
            return Err(SettingsError::invalid(
                "text.min_font_size",
                format!(
                    "font range {}..={} is empty",
                    self.text.min_font_size, self.text.max_font_size
                ),
            ));
        }

        if self.text.fit_padding < 0.0 {
            return Err(SettingsError::invalid(
                "text.fit_padding",
                "padding must not be negative",
            ));
        }

        for (key, value) in [
            ("surface.background", &self.surface.background),
            ("text.default_font_color", &self.text.default_font_color),
            ("qr.accent_color", &self.qr.accent_color),
            ("qr.background_color", &self.qr.background_color),
        ] {
            Rgba::parse_hex(value).map_err(|e| SettingsError::invalid(key, e.to_string()))?;
        }

        if self.timing.image_decode_timeout_ms == 0 || self.timing.frame_interval_ms == 0 {
            return Err(SettingsError::invalid(
                "timing",
                "timeouts and frame interval must be > 0",
            ));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
