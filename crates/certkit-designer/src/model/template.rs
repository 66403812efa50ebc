//! Template-level metadata: credential kind, artwork references, active view.

use std::fmt;

use certkit_core::ImageError;
use serde::{Deserialize, Serialize};

/// What a template issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    #[default]
    Certificate,
    Badge,
    Both,
}

impl CredentialKind {
    /// Badge-only templates do not require a Name field.
    pub fn requires_name(&self) -> bool {
        !matches!(self, CredentialKind::Badge)
    }
}

/// Which artwork the surface shows when a template has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Certificate,
    Badge,
}

/// Reference to template artwork: a remote URL or an inline data URI.
///
/// Stored as a plain string; anything starting with `data:` is inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageRef {
    Url(String),
    Inline(String),
}

impl ImageRef {
    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Url(s) | ImageRef::Inline(s) => s,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageRef::Inline(_))
    }

    /// Builds an inline reference from raw bytes.
    pub fn inline_from_bytes(mime: &str, bytes: &[u8]) -> Self {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        ImageRef::Inline(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// Decodes the payload of an inline reference.
    pub fn inline_bytes(&self) -> Result<Vec<u8>, ImageError> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let ImageRef::Inline(uri) = self else {
            return Err(ImageError::InvalidReference {
                reason: "not an inline image".to_string(),
            });
        };
        let (header, payload) = uri.split_once(',').ok_or_else(|| ImageError::InvalidReference {
            reason: "data URI has no payload".to_string(),
        })?;
        if !header.ends_with(";base64") {
            return Err(ImageError::InvalidReference {
                reason: "only base64 data URIs are supported".to_string(),
            });
        }
        STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::InvalidReference {
                reason: format!("bad base64 payload: {}", e),
            })
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ImageError::InvalidReference {
                reason: "empty reference".to_string(),
            });
        }
        if trimmed.starts_with("data:") {
            Ok(ImageRef::Inline(trimmed.to_string()))
        } else {
            Ok(ImageRef::Url(trimmed.to_string()))
        }
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        match value {
            ImageRef::Url(s) | ImageRef::Inline(s) => s,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Url(url) => f.write_str(url),
            ImageRef::Inline(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                write!(f, "{},<{} bytes>", header, uri.len())
            }
        }
    }
}

/// Draft template metadata held by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateMeta {
    pub name: String,
    pub category: String,
    pub credential_kind: CredentialKind,
    pub certificate_image: Option<ImageRef>,
    pub badge_image: Option<ImageRef>,
}
