//! Error handling for CertKit
//!
//! Provides the error taxonomy shared by the designer layers:
//! - Designer errors (field lifecycle, geometry, save validation)
//! - Image errors (fetching and decoding template artwork)
//!
//! All error types use `thiserror` for ergonomic error handling. Every designer
//! error is recoverable and meant to be shown to the user as a modal message.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Message shown when the persistence collaborator fails without a reason.
pub const GENERIC_SAVE_FAILURE: &str = "Failed to save template";

/// Field kinds that may appear at most once in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicateKind {
    /// The email field.
    Email,
    /// The QR code field.
    QrCode,
    /// The date field named "issue date".
    IssueDate,
    /// The date field named "expiry date".
    ExpiryDate,
}

impl fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::QrCode => write!(f, "QR code"),
            Self::IssueDate => write!(f, "issue date"),
            Self::ExpiryDate => write!(f, "expiry date"),
        }
    }
}

/// Fields a template must carry before it can be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// An email field.
    Email,
    /// A field literally named "name".
    Name,
    /// A date field named "issue date".
    IssueDate,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "Email"),
            Self::Name => write!(f, "Name"),
            Self::IssueDate => write!(f, "Issue Date"),
        }
    }
}

fn join_missing(missing: &[RequiredField]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Designer error type
///
/// Represents failures of editor operations. None of these are fatal: the
/// field store is left untouched and the user can correct and retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    /// A second field of a unique kind was added.
    #[error("Only one {kind} field is allowed per template")]
    DuplicateField {
        /// The kind that would have been duplicated.
        kind: DuplicateKind,
    },

    /// Save was attempted without the required fields.
    #[error("Template is missing required fields: {}", join_missing(.missing))]
    MissingRequiredField {
        /// Every requirement that is not met, in display order.
        missing: Vec<RequiredField>,
    },

    /// An operation needs image dimensions before the image finished decoding.
    #[error("Cannot {operation} before the template image has loaded")]
    ImageNotLoaded {
        /// Short description of the attempted operation.
        operation: String,
    },

    /// Geometry that cannot be represented on the editing surface.
    #[error("Invalid field geometry: {reason}")]
    InvalidGeometry {
        /// What was wrong with the geometry.
        reason: String,
    },

    /// The template persistence collaborator rejected the request.
    #[error("{message}")]
    Persistence {
        /// Collaborator message, or the generic fallback.
        message: String,
    },

    /// No field with the given id exists.
    #[error("Field {id} not found")]
    FieldNotFound {
        /// The missing field id.
        id: Uuid,
    },

    /// A pending field was confirmed while no drawing was awaiting a name.
    #[error("No drawn field is waiting to be named")]
    NoPendingField,
}

impl DesignerError {
    /// Creates a persistence error, substituting the generic message when the
    /// collaborator supplied none.
    pub fn persistence(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_SAVE_FAILURE.to_string()
        } else {
            message
        };
        DesignerError::Persistence { message }
    }

    /// Creates an image-not-loaded error for the named operation.
    pub fn image_not_loaded(operation: impl Into<String>) -> Self {
        DesignerError::ImageNotLoaded {
            operation: operation.into(),
        }
    }

    /// Text for the modal dialog shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Image error type
///
/// Represents failures while resolving an image reference to pixels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// The reference is neither a URL nor a base64 data URI.
    #[error("Invalid image reference: {reason}")]
    InvalidReference {
        /// Why the reference was rejected.
        reason: String,
    },

    /// The remote image could not be fetched.
    #[error("Failed to fetch image from {url}: {reason}")]
    Fetch {
        /// The URL that was requested.
        url: String,
        /// The transport or status failure.
        reason: String,
    },

    /// The bytes could not be decoded as an image.
    #[error("Failed to decode image: {reason}")]
    Decode {
        /// The decoder failure.
        reason: String,
    },

    /// The decode did not complete within the allotted time.
    #[error("Image decode timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },
}

/// Main error type for CertKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Designer error
    #[error(transparent)]
    Designer(#[from] DesignerError),

    /// Image error
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error is meant to be shown in a modal dialog
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Designer(_))
    }

    /// Check if this is an image error
    pub fn is_image_error(&self) -> bool {
        matches!(self, Error::Image(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
