//! # CertKit
//!
//! Visual template designer for certificate and badge credentials.
//!
//! Issuers draw data fields (name, email, dates, ids, a verification QR code)
//! on top of uploaded artwork. Field positions are saved in the artwork's own
//! pixel space so issuance can render them at full resolution.
//!
//! ## Architecture
//!
//! CertKit is organized as a workspace with multiple crates:
//!
//! 1. **certkit-core** - Geometry, colours, constants, error taxonomy
//! 2. **certkit-settings** - Designer configuration (JSON/TOML)
//! 3. **certkit-designer** - Editor session, field store, pointer state
//!    machine, renderer, persistence adapter
//! 4. **certkit** - This facade crate
//!
//! The designer has no binary of its own; a host UI drives an
//! [`EditorSession`] and paints the pixmaps it renders.

pub use certkit_core::{
    constants, ColorParseError, DesignerError, DuplicateKind, Error, ImageError, Point, Rect,
    RequiredField, Result, Rgba, Size,
};

pub use certkit_designer as designer;
pub use certkit_designer::{
    ApproxMeasurer, CredentialKind, Cursor, DecodedImage, EditorSession, Field, FieldId,
    FieldKind, FieldPatch, FontMeasurer, HttpImageFetcher, ImageFetcher, ImageRef,
    MemoryTemplateStore, Placeholder, Placement, PointerOutcome, QrStyle, TemplateDocument,
    TemplateStore, TextMeasurer, TextStyle, View,
};

pub use certkit_settings::{DesignerConfig, SettingsError, SettingsResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Environment variable selecting the log output format (`pretty` or `json`).
pub const LOG_FORMAT_ENV: &str = "CERTKIT_LOG_FORMAT";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting, or JSON lines when
///   `CERTKIT_LOG_FORMAT=json`
/// - RUST_LOG environment variable support
/// - INFO as the default level
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    tracing::info!("CertKit {} (built {})", VERSION, BUILD_DATE);
    Ok(())
}

/// Loads the designer configuration from the platform config directory,
/// falling back to defaults.
pub fn load_config() -> DesignerConfig {
    match DesignerConfig::default_path() {
        Ok(path) => DesignerConfig::load_or_default(&path),
        Err(e) => {
            tracing::warn!("{}, using default designer settings", e);
            DesignerConfig::default()
        }
    }
}
