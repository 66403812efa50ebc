//! Opening stored templates and saving the current one.

use std::sync::Arc;

use certkit_core::DesignerError;
use certkit_settings::DesignerConfig;

use super::EditorSession;
use crate::font_manager::TextMeasurer;
use crate::images::{ImageFetcher, ImageLoader};
use crate::persistence::TemplateDocument;
use crate::template_store::TemplateStore;

impl EditorSession {
    /// Loads template `id` for editing.
    ///
    /// Artwork is decoded first (bounded by the configured timeout) because
    /// placeholder coordinates are relative to the base image. A missing or
    /// undecodable image does not fail the open: positioned fields then load
    /// as not displayed.
    pub async fn open(
        store: &dyn TemplateStore,
        id: &str,
        fetcher: Arc<dyn ImageFetcher>,
        config: DesignerConfig,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Result<Self, DesignerError> {
        let document = store.get(id).await?;
        let mut session = Self::with_loader(config, measurer, ImageLoader::new(fetcher));
        session.load_document(document).await;
        session.template_id = Some(id.to_string());
        tracing::info!(
            "Opened template '{}' ({}) with {} fields",
            session.meta.name,
            id,
            session.store.len()
        );
        Ok(session)
    }

    async fn load_document(&mut self, document: TemplateDocument) {
        let meta = document.meta();
        if let Some(reference) = meta.certificate_image.clone() {
            if let Err(e) = self.set_certificate_image(reference).await {
                tracing::warn!("Certificate image unavailable: {}", e);
            }
        }
        if let Some(reference) = meta.badge_image.clone() {
            if let Err(e) = self.set_badge_image(reference).await {
                tracing::warn!("Badge image unavailable: {}", e);
            }
        }
        self.meta = meta;

        let image = self.base_image().map(|image| image.size());
        let fields = self.codec.deserialize_all(&document.placeholders, image);
        self.store.load_fields(fields);
        self.qr_previews.clear();
        self.scheduler.request();
    }

    /// Whether the required-field checks pass.
    pub fn can_save(&self) -> bool {
        self.store
            .missing_required(self.meta.credential_kind)
            .is_empty()
    }

    pub fn validate_for_save(&self) -> Result<(), DesignerError> {
        self.store.validate_for_save(self.meta.credential_kind)
    }

    /// The document a save would send.
    pub fn to_document(&self) -> Result<TemplateDocument, DesignerError> {
        let image = self
            .base_image()
            .ok_or_else(|| DesignerError::image_not_loaded("save the template"))?;
        Ok(self
            .codec
            .to_document(&self.meta, self.store.fields(), image.size()))
    }

    /// Validates, serializes and sends the template. The first save creates
    /// it; later saves update the same id.
    pub async fn save(&mut self, store: &dyn TemplateStore) -> Result<String, DesignerError> {
        let document = self.to_document()?;
        self.validate_for_save()?;

        let result = match self.template_id.clone() {
            Some(id) => store.update(&id, &document).await.map(|()| id),
            None => store.create(&document).await,
        };
        match result {
            Ok(id) => {
                tracing::info!(
                    "Saved template '{}' ({}) with {} placeholders",
                    document.name,
                    id,
                    document.placeholders.len()
                );
                self.template_id = Some(id.clone());
                Ok(id)
            }
            Err(e) => {
                tracing::error!("Failed to save template '{}': {}", document.name, e);
                Err(e)
            }
        }
    }
}
