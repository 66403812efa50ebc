//! Stored template shape and the field <-> placeholder conversion.
//!
//! Placeholders are in image pixels:
//! - QR fields store their top-left corner and a square side scaled by the
//!   larger axis factor.
//! - Other displayed fields store their **centre** plus width/height, and a
//!   font size scaled by the mean axis factor.
//! - Fields that are not displayed store no coordinates.
//!
//! Loading inverts each conversion with the same [`FieldScale`].

use certkit_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    CredentialKind, Field, FieldKind, ImageRef, Placement, QrStyle, TemplateMeta, TextStyle,
};
use crate::transform::FieldScale;

/// Image-space geometry of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Persisted form of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub font_family: String,
    pub font_size: f64,
    pub font_color: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_style: Option<QrStyle>,
}

/// The unit handed to the template persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub credential_kind: CredentialKind,
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_image: Option<ImageRef>,
}

impl TemplateDocument {
    pub fn meta(&self) -> TemplateMeta {
        TemplateMeta {
            name: self.name.clone(),
            category: self.category.clone(),
            credential_kind: self.credential_kind,
            certificate_image: self.certificate_image.clone(),
            badge_image: self.badge_image.clone(),
        }
    }
}

/// Converts between fields and placeholders for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderCodec {
    pub surface: Size,
    /// Size given to fields loaded without coordinates.
    pub not_displayed: Size,
}

impl PlaceholderCodec {
    pub fn new(surface: Size, not_displayed: Size) -> Self {
        Self {
            surface,
            not_displayed,
        }
    }

    pub fn from_config(config: &certkit_settings::DesignerConfig) -> Self {
        Self::new(
            Size::new(config.surface.width, config.surface.height),
            Size::new(
                config.fields.not_displayed_width,
                config.fields.not_displayed_height,
            ),
        )
    }

    /// Field in surface space to placeholder in image space.
    pub fn serialize(&self, field: &Field, image: Size) -> Placeholder {
        let scale = FieldScale::between(self.surface, image);
        let coordinates = field.rect().map(|rect| {
            if field.is_qr_code() {
                let origin = scale.point_to_image(rect.origin());
                let side = scale.square_to_image(rect.width.max(rect.height));
                Coordinates {
                    x: origin.x,
                    y: origin.y,
                    width: side,
                    height: side,
                }
            } else {
                let center = scale.point_to_image(rect.center());
                let size = scale.size_to_image(rect.size());
                Coordinates {
                    x: center.x,
                    y: center.y,
                    width: size.width,
                    height: size.height,
                }
            }
        });

        let font_size = if field.is_displayed() {
            scale.font_to_image(field.style.font_size).round()
        } else {
            field.style.font_size
        };

        Placeholder {
            id: field.id.to_string(),
            name: field.name.clone(),
            kind: field.kind().as_str().to_string(),
            coordinates,
            font_family: field.style.font_family.clone(),
            font_size,
            font_color: field.style.font_color.clone(),
            bold: field.style.bold,
            italic: field.style.italic,
            qr_style: field.qr_style.clone(),
        }
    }

    pub fn serialize_all(&self, fields: &[Field], image: Size) -> Vec<Placeholder> {
        fields.iter().map(|f| self.serialize(f, image)).collect()
    }

    /// Placeholder in image space to field in surface space.
    ///
    /// With no decoded image (`None`) positioned placeholders load as not
    /// displayed: their geometry cannot be converted without dimensions.
    pub fn deserialize(&self, placeholder: &Placeholder, image: Option<Size>) -> Field {
        let id = Uuid::parse_str(&placeholder.id).unwrap_or_else(|_| {
            tracing::debug!(
                "Placeholder id '{}' is not a uuid, assigning a new one",
                placeholder.id
            );
            Uuid::new_v4()
        });
        let kind = FieldKind::parse(&placeholder.kind).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown placeholder type '{}' on '{}', loading as text",
                placeholder.kind,
                placeholder.name
            );
            FieldKind::Text
        });

        let scale = image.map(|image| FieldScale::between(self.surface, image));
        let mut font_size = placeholder.font_size;

        let placement = match (placeholder.coordinates, scale) {
            (Some(c), Some(scale)) => {
                font_size = scale.font_to_surface(placeholder.font_size);
                if kind == FieldKind::QrCode {
                    let origin = scale.point_to_surface(Point::new(c.x, c.y));
                    let side = scale.square_to_surface(c.width.max(c.height));
                    Placement::Displayed(Rect::new(origin.x, origin.y, side, side))
                } else {
                    let center = scale.point_to_surface(Point::new(c.x, c.y));
                    let size = scale.size_to_surface(Size::new(c.width, c.height));
                    Placement::Displayed(Rect::from_center(center, size))
                }
            }
            (Some(_), None) => {
                tracing::warn!(
                    "No image dimensions for '{}', loading it as not displayed",
                    placeholder.name
                );
                Placement::NotDisplayed(self.not_displayed)
            }
            (None, _) => Placement::NotDisplayed(self.not_displayed),
        };

        let mut field = Field::with_id(id, placeholder.name.clone(), kind, placement).with_style(
            TextStyle {
                font_family: placeholder.font_family.clone(),
                font_size,
                font_color: placeholder.font_color.clone(),
                bold: placeholder.bold,
                italic: placeholder.italic,
            },
        );
        if kind == FieldKind::QrCode {
            field.qr_style = Some(placeholder.qr_style.clone().unwrap_or_default());
        }
        field
    }

    pub fn deserialize_all(&self, placeholders: &[Placeholder], image: Option<Size>) -> Vec<Field> {
        placeholders
            .iter()
            .map(|p| self.deserialize(p, image))
            .collect()
    }

    /// Builds the stored document for `meta` and `fields`.
    pub fn to_document(&self, meta: &TemplateMeta, fields: &[Field], image: Size) -> TemplateDocument {
        TemplateDocument {
            name: meta.name.clone(),
            category: meta.category.clone(),
            credential_kind: meta.credential_kind,
            placeholders: self.serialize_all(fields, image),
            certificate_image: meta.certificate_image.clone(),
            badge_image: meta.badge_image.clone(),
        }
    }
}

impl Default for PlaceholderCodec {
    fn default() -> Self {
        use certkit_core::constants::*;
        Self::new(
            Size::new(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT),
            Size::new(NOT_DISPLAYED_WIDTH, NOT_DISPLAYED_HEIGHT),
        )
    }
}
