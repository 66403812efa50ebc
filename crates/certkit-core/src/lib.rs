//! # CertKit Core
//!
//! Core types, constants, and error taxonomy for CertKit.
//! Provides the geometric value types and colour handling shared by the
//! template designer and the settings layer.

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;

pub use color::{ColorParseError, Rgba};
pub use error::{DesignerError, DuplicateKind, Error, ImageError, RequiredField, Result};
pub use geometry::{Point, Rect, Size};
