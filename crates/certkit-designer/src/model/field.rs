//! Field definitions: one data placeholder on the template artwork.

use std::fmt;

use certkit_core::{Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::qr_style::QrStyle;
use crate::font_manager::FontSpec;

/// Stable identifier assigned to a field at creation.
pub type FieldId = Uuid;

/// Data type carried by a field. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Id,
    QrCode,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Id,
        FieldKind::QrCode,
    ];

    /// Wire name used in stored templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Id => "id",
            FieldKind::QrCode => "qr-code",
        }
    }

    /// Parses a wire name, accepting the legacy `qrcode`/`qr_code` spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Some(FieldKind::Text),
            "email" => Some(FieldKind::Email),
            "number" => Some(FieldKind::Number),
            "date" => Some(FieldKind::Date),
            "id" => Some(FieldKind::Id),
            "qr-code" | "qrcode" | "qr_code" => Some(FieldKind::QrCode),
            _ => None,
        }
    }

    /// Only email and date fields may exist without a position on the image.
    pub fn may_be_hidden(&self) -> bool {
        matches!(self, FieldKind::Email | FieldKind::Date)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a field sits on the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Rendered on the image; the rect is in surface pixels.
    Displayed(Rect),
    /// Not rendered on the image. The size is kept for when it gets placed.
    NotDisplayed(Size),
}

impl Placement {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Placement::Displayed(rect) => Some(*rect),
            Placement::NotDisplayed(_) => None,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Placement::Displayed(rect) => rect.size(),
            Placement::NotDisplayed(size) => *size,
        }
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self, Placement::Displayed(_))
    }
}

/// Text styling of a field. Ignored when rendering QR code fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_color: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    /// Font description at the stored size.
    pub fn font(&self) -> FontSpec {
        FontSpec::new(&self.font_family, self.font_size, self.bold, self.italic)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: certkit_core::constants::DEFAULT_FONT_FAMILY.to_string(),
            font_size: certkit_core::constants::DEFAULT_FONT_SIZE,
            font_color: certkit_core::constants::DEFAULT_FONT_COLOR.to_string(),
            bold: false,
            italic: false,
        }
    }
}

/// One placeholder on the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: FieldId,
    /// Display label; the names "name", "issue date" and "expiry date" carry
    /// special meaning (compared trimmed and case-insensitively).
    pub name: String,
    kind: FieldKind,
    pub placement: Placement,
    pub style: TextStyle,
    /// Present only for QR code fields.
    pub qr_style: Option<QrStyle>,
}

impl Field {
    /// Creates a field with a fresh id.
    pub fn new(name: impl Into<String>, kind: FieldKind, placement: Placement) -> Self {
        Self::with_id(Uuid::new_v4(), name, kind, placement)
    }

    /// Creates a field with a known id (used when loading stored templates).
    pub fn with_id(
        id: FieldId,
        name: impl Into<String>,
        kind: FieldKind,
        placement: Placement,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            placement,
            style: TextStyle::default(),
            qr_style: None,
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_qr_style(mut self, qr_style: QrStyle) -> Self {
        self.qr_style = Some(qr_style);
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn rect(&self) -> Option<Rect> {
        self.placement.rect()
    }

    pub fn size(&self) -> Size {
        self.placement.size()
    }

    pub fn is_displayed(&self) -> bool {
        self.placement.is_displayed()
    }

    /// Trimmed, case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    /// The field whose style is propagated to the optional fields.
    pub fn is_name_field(&self) -> bool {
        self.is_named("name")
    }

    pub fn is_email(&self) -> bool {
        self.kind == FieldKind::Email
    }

    pub fn is_qr_code(&self) -> bool {
        self.kind == FieldKind::QrCode
    }

    pub fn is_issue_date(&self) -> bool {
        self.kind == FieldKind::Date && self.is_named("issue date")
    }

    pub fn is_expiry_date(&self) -> bool {
        self.kind == FieldKind::Date && self.is_named("expiry date")
    }

    /// Fields that receive the Name field's style.
    pub fn receives_name_style(&self) -> bool {
        self.is_email() || self.is_issue_date() || self.is_expiry_date()
    }

    /// Text drawn inside the field box and used for font fitting.
    pub fn label(&self) -> &str {
        &self.name
    }
}

/// Partial update of a field. The kind cannot be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub placement: Option<Placement>,
    pub style: Option<TextStyle>,
    pub qr_style: Option<QrStyle>,
}

impl FieldPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn placement(placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            ..Default::default()
        }
    }

    pub fn style(style: TextStyle) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    pub fn qr_style(qr_style: QrStyle) -> Self {
        Self {
            qr_style: Some(qr_style),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.placement.is_none()
            && self.style.is_none()
            && self.qr_style.is_none()
    }

    /// Applies the patch to a copy of `field`.
    pub fn applied_to(&self, field: &Field) -> Field {
        let mut next = field.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(placement) = self.placement {
            next.placement = placement;
        }
        if let Some(style) = &self.style {
            next.style = style.clone();
        }
        if let Some(qr_style) = &self.qr_style {
            next.qr_style = Some(qr_style.clone());
        }
        next
    }
}
