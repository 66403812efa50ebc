//! # CertKit Designer
//!
//! Visual editor for certificate and badge templates. An issuer draws,
//! moves, resizes and styles data fields on top of uploaded artwork; the
//! designer keeps field positions correct in the artwork's own pixel space no
//! matter how the artwork is scaled for editing.
//!
//! ## Core Components
//!
//! - **Transform**: fit-to-surface placement and the surface <-> image
//!   mappings used when saving and loading.
//! - **Font fit**: largest font size whose text fits a field box.
//! - **Field store**: the field list, with uniqueness, required-field and
//!   style propagation rules.
//! - **Interaction**: the draw/move/resize pointer state machine.
//! - **Renderer**: paints artwork, fields, QR previews and handles.
//! - **Persistence**: the placeholder convention shared with issuance.
//!
//! ## Architecture
//!
//! ```text
//! EditorSession
//!   ├── FieldStore (fields + lifecycle rules + font fit)
//!   ├── Interaction (pointer state machine)
//!   ├── ImageLoader -> DecodedImage (certificate, badge)
//!   ├── QrPreviewCache (background generation)
//!   ├── RedrawScheduler (frame coalescing)
//!   ├── Renderer -> tiny-skia Pixmap
//!   └── PlaceholderCodec <-> TemplateStore
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use certkit_designer::{ApproxMeasurer, EditorSession, FieldKind, MemoryTemplateStore};
//!
//! let mut session = EditorSession::new(Default::default(), Arc::new(ApproxMeasurer::default()));
//! session.set_certificate_image(reference).await?;
//! session.pointer_down(Point::new(100.0, 100.0))?;
//! session.pointer_move(Point::new(300.0, 140.0))?;
//! session.pointer_up(Point::new(300.0, 140.0))?;
//! session.confirm_pending("Name", FieldKind::Text)?;
//! let id = session.save(&store).await?;
//! ```

pub mod field_store;
pub mod font_fit;
pub mod font_manager;
pub mod images;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod qr_preview;
pub mod renderer;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod template_store;
pub mod transform;

pub use field_store::{FieldRules, FieldStore};
pub use font_fit::FitRange;
pub use font_manager::{list_font_families, ApproxMeasurer, FontMeasurer, FontSpec, TextMeasurer};
pub use images::{DecodedImage, HttpImageFetcher, ImageFetcher, ImageLoad, ImageLoader, LoadOutcome};
pub use interaction::{
    Cursor, DragState, Interaction, InteractionSettings, PendingField, PointerOutcome,
    ResizeHandle,
};
pub use model::{
    CredentialKind, Field, FieldId, FieldKind, FieldPatch, ImageRef, Placement, QrStyle,
    TemplateMeta, TextStyle, View,
};
pub use persistence::{Coordinates, Placeholder, PlaceholderCodec, TemplateDocument};
pub use qr_preview::{render_qr_preview, QrPreviewCache, QrPreviewError};
pub use renderer::{Renderer, Scene};
pub use scheduler::{RedrawHandle, RedrawScheduler, RedrawStats};
pub use session::EditorSession;
pub use template_store::{MemoryTemplateStore, TemplateStore};
pub use transform::{FieldScale, ImagePlacement};

pub use certkit_core::{DesignerError, ImageError, Point, Rect, Size};
