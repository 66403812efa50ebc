//! Editor session: the context object owning one template being edited.
//!
//! Holds the draft metadata, the field store, the pointer state machine, the
//! decoded artwork, the QR preview cache and the redraw scheduler, and passes
//! them explicitly to the renderer and the persistence codec.

mod file_io;
mod pointer;
mod special_fields;

pub use special_fields::{
    EMAIL_FIELD_NAME, EXPIRY_DATE_FIELD_NAME, ISSUE_DATE_FIELD_NAME, QR_FIELD_NAME,
};

use std::sync::Arc;

use certkit_core::{ImageError, Size};
use certkit_settings::DesignerConfig;
use tiny_skia::Pixmap;

use crate::field_store::{FieldRules, FieldStore};
use crate::font_manager::TextMeasurer;
use crate::images::{DecodedImage, HttpImageFetcher, ImageLoader, LoadOutcome};
use crate::interaction::{Interaction, InteractionSettings, PendingField};
use crate::model::{CredentialKind, Field, FieldId, ImageRef, TemplateMeta, TextStyle, View};
use crate::persistence::PlaceholderCodec;
use crate::qr_preview::QrPreviewCache;
use crate::renderer::{Renderer, Scene};
use crate::scheduler::{RedrawHandle, RedrawScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Artwork {
    Certificate,
    Badge,
}

pub struct EditorSession {
    config: DesignerConfig,
    meta: TemplateMeta,
    template_id: Option<String>,
    store: FieldStore,
    interaction: Interaction,
    pending: Option<PendingField>,
    certificate: Option<DecodedImage>,
    badge: Option<DecodedImage>,
    view: View,
    qr_previews: QrPreviewCache,
    scheduler: RedrawScheduler,
    renderer: Renderer,
    codec: PlaceholderCodec,
    loader: ImageLoader,
}

impl EditorSession {
    /// Session for a new template. URL images are fetched over HTTP.
    pub fn new(config: DesignerConfig, measurer: Arc<dyn TextMeasurer>) -> Self {
        let loader = ImageLoader::new(Arc::new(HttpImageFetcher::default()));
        Self::with_loader(config, measurer, loader)
    }

    pub fn with_loader(
        config: DesignerConfig,
        measurer: Arc<dyn TextMeasurer>,
        loader: ImageLoader,
    ) -> Self {
        let scheduler = RedrawScheduler::new(config.timing.frame_interval());
        let qr_previews = QrPreviewCache::new(config.qr.preview_data.clone(), scheduler.handle());
        Self {
            store: FieldStore::new(FieldRules::from_config(&config, measurer)),
            interaction: Interaction::new(InteractionSettings::from(&config)),
            renderer: Renderer::from_config(&config),
            codec: PlaceholderCodec::from_config(&config),
            meta: TemplateMeta::default(),
            template_id: None,
            pending: None,
            certificate: None,
            badge: None,
            view: View::default(),
            qr_previews,
            scheduler,
            loader,
            config,
        }
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    /// Id assigned by the backend after the first save, or when opened.
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.meta.category = category.into();
    }

    /// Switching kind can change which artwork is the coordinate base.
    pub fn set_credential_kind(&mut self, kind: CredentialKind) {
        if self.meta.credential_kind != kind {
            tracing::info!("Credential kind set to {:?}", kind);
            self.meta.credential_kind = kind;
            self.interaction.cancel();
            self.scheduler.request();
        }
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn fields(&self) -> &[Field] {
        self.store.fields()
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.store.get(id)
    }

    pub fn selected_id(&self) -> Option<FieldId> {
        self.store.selected_id()
    }

    pub fn select(&mut self, id: Option<FieldId>) -> Result<(), certkit_core::DesignerError> {
        self.store.select(id)?;
        self.scheduler.request();
        Ok(())
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn pending_field(&self) -> Option<&PendingField> {
        self.pending.as_ref()
    }

    pub fn surface_size(&self) -> Size {
        self.store.rules().surface
    }

    /// Text style for new fields, from the configured defaults.
    pub fn default_text_style(&self) -> TextStyle {
        TextStyle {
            font_family: self.config.text.default_font_family.clone(),
            font_size: self.config.text.default_font_size,
            font_color: self.config.text.default_font_color.clone(),
            bold: false,
            italic: false,
        }
    }

    // Artwork

    fn base_artwork(&self) -> Artwork {
        match self.meta.credential_kind {
            CredentialKind::Badge => Artwork::Badge,
            CredentialKind::Certificate | CredentialKind::Both => Artwork::Certificate,
        }
    }

    /// The image field coordinates are relative to: the badge for badge-only
    /// templates, the certificate otherwise.
    pub fn base_image(&self) -> Option<&DecodedImage> {
        match self.base_artwork() {
            Artwork::Certificate => self.certificate.as_ref(),
            Artwork::Badge => self.badge.as_ref(),
        }
    }

    pub fn image_loaded(&self) -> bool {
        self.base_image().is_some()
    }

    pub fn active_view(&self) -> View {
        self.view
    }

    pub fn set_active_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.scheduler.request();
        }
    }

    /// Image shown on the surface. Falls back to the other artwork when only
    /// one exists.
    pub fn active_image(&self) -> Option<&DecodedImage> {
        match self.view {
            View::Certificate => self.certificate.as_ref().or(self.badge.as_ref()),
            View::Badge => self.badge.as_ref().or(self.certificate.as_ref()),
        }
    }

    pub fn certificate_image(&self) -> Option<&DecodedImage> {
        self.certificate.as_ref()
    }

    pub fn badge_image(&self) -> Option<&DecodedImage> {
        self.badge.as_ref()
    }

    /// Sets the certificate artwork and waits (bounded) for it to decode.
    ///
    /// On failure or timeout the reference is kept and the editor continues
    /// without the image.
    pub async fn set_certificate_image(&mut self, reference: ImageRef) -> Result<Size, ImageError> {
        self.meta.certificate_image = Some(reference.clone());
        let decoded = self.decode(reference).await;
        self.certificate = decoded.as_ref().ok().cloned();
        self.after_image_change();
        decoded.map(|image| image.size())
    }

    /// Badge counterpart of [`set_certificate_image`](Self::set_certificate_image).
    pub async fn set_badge_image(&mut self, reference: ImageRef) -> Result<Size, ImageError> {
        self.meta.badge_image = Some(reference.clone());
        let decoded = self.decode(reference).await;
        self.badge = decoded.as_ref().ok().cloned();
        self.after_image_change();
        decoded.map(|image| image.size())
    }

    /// Installs already-decoded certificate artwork.
    pub fn set_decoded_certificate(&mut self, reference: Option<ImageRef>, image: DecodedImage) {
        if reference.is_some() {
            self.meta.certificate_image = reference;
        }
        self.certificate = Some(image);
        self.after_image_change();
    }

    /// Installs already-decoded badge artwork.
    pub fn set_decoded_badge(&mut self, reference: Option<ImageRef>, image: DecodedImage) {
        if reference.is_some() {
            self.meta.badge_image = reference;
        }
        self.badge = Some(image);
        self.after_image_change();
    }

    async fn decode(&self, reference: ImageRef) -> Result<DecodedImage, ImageError> {
        let timeout = self.config.timing.image_decode_timeout();
        match self.loader.load_with_timeout(reference, timeout).await {
            LoadOutcome::Ready(image) => Ok(image),
            LoadOutcome::Failed(e) => Err(e),
            LoadOutcome::TimedOut => Err(ImageError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    fn after_image_change(&mut self) {
        if !self.image_loaded() {
            self.interaction.cancel();
        }
        self.scheduler.request();
    }

    // Rendering

    pub fn redraw_handle(&self) -> RedrawHandle {
        self.scheduler.handle()
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn qr_previews(&self) -> &QrPreviewCache {
        &self.qr_previews
    }

    /// Requests previews for displayed QR fields that have none.
    fn ensure_qr_previews(&self) {
        for field in self.store.iter().filter(|f| f.is_qr_code() && f.is_displayed()) {
            if !self.qr_previews.contains(field.id) {
                let style = field.qr_style.clone().unwrap_or_default();
                self.qr_previews.request(field.id, &style);
            }
        }
    }

    /// Renders when a coalesced redraw is due; `None` otherwise.
    pub fn render_frame(&self) -> Option<Pixmap> {
        if !self.scheduler.take_frame() {
            return None;
        }
        self.render_now()
    }

    /// Renders unconditionally.
    pub fn render_now(&self) -> Option<Pixmap> {
        self.ensure_qr_previews();
        self.renderer.render(&Scene {
            store: &self.store,
            image: self.active_image(),
            qr_previews: &self.qr_previews,
            draft: self
                .interaction
                .draft_rect(self.surface_size())
                .or(self.pending.map(|p| p.rect)),
        })
    }

    /// Tears the session down: pending redraws are dropped.
    pub fn close(&mut self) {
        self.interaction.cancel();
        self.pending = None;
        self.scheduler.cancel();
        tracing::info!("Editor session closed");
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("meta", &self.meta)
            .field("template_id", &self.template_id)
            .field("fields", &self.store.len())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
