//! CertKit Settings Crate
//!
//! Handles designer configuration: defaults, validation, and JSON/TOML
//! persistence in the platform configuration directory.

pub mod config;
pub mod error;

pub use config::{
    DesignerConfig, FieldSettings, QrSettings, SurfaceSettings, TextSettings, TimingSettings,
};
pub use error::{SettingsError, SettingsResult};
