//! Data model of the designer: fields, QR styling, and template metadata.

pub mod field;
pub mod qr_style;
pub mod template;

pub use field::{Field, FieldId, FieldKind, FieldPatch, Placement, TextStyle};
pub use qr_style::{
    BackgroundOptions, ColorStop, CornerDotOptions, CornerDotShape, CornerSquareOptions,
    CornerSquareShape, DotShape, DotsOptions, ErrorCorrection, Gradient, GradientKind, QrStyle,
};
pub use template::{CredentialKind, ImageRef, TemplateMeta, View};
