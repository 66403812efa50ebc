//! One-click fields and field edits made from the side panels.

use certkit_core::{DesignerError, Point, Rect, Size};

use super::EditorSession;
use crate::model::{Field, FieldId, FieldKind, FieldPatch, Placement, QrStyle, TextStyle};

pub const EMAIL_FIELD_NAME: &str = "Email";
pub const ISSUE_DATE_FIELD_NAME: &str = "Issue Date";
pub const EXPIRY_DATE_FIELD_NAME: &str = "Expiry Date";
pub const QR_FIELD_NAME: &str = "QR Code";

impl EditorSession {
    pub(super) fn branded_qr_style(&self) -> QrStyle {
        QrStyle::branded(&self.config.qr.accent_color, &self.config.qr.background_color)
    }

    /// Style for a field that follows the Name field.
    fn name_style(&self) -> TextStyle {
        self.store
            .name_field()
            .map(|f| f.style.clone())
            .unwrap_or_else(|| self.default_text_style())
    }

    fn not_displayed_size(&self) -> Size {
        Size::new(
            self.config.fields.not_displayed_width,
            self.config.fields.not_displayed_height,
        )
    }

    fn add_hidden(&mut self, name: &str, kind: FieldKind) -> Result<FieldId, DesignerError> {
        let field = Field::new(name, kind, Placement::NotDisplayed(self.not_displayed_size()))
            .with_style(self.name_style());
        let id = self.store.add_field(field)?;
        self.scheduler.request();
        Ok(id)
    }

    /// Adds the email field. It is never drawn on the artwork.
    pub fn add_email_field(&mut self) -> Result<FieldId, DesignerError> {
        self.add_hidden(EMAIL_FIELD_NAME, FieldKind::Email)
    }

    pub fn add_issue_date_field(&mut self) -> Result<FieldId, DesignerError> {
        self.add_hidden(ISSUE_DATE_FIELD_NAME, FieldKind::Date)
    }

    pub fn add_expiry_date_field(&mut self) -> Result<FieldId, DesignerError> {
        self.add_hidden(EXPIRY_DATE_FIELD_NAME, FieldKind::Date)
    }

    /// Adds a square QR field centred on the surface with the brand style.
    pub fn add_qr_field(&mut self) -> Result<FieldId, DesignerError> {
        if !self.image_loaded() {
            return Err(DesignerError::image_not_loaded("add a QR code"));
        }
        let side = self.config.fields.qr_default_size;
        let surface = self.surface_size();
        let rect = Rect::from_center(
            Point::new(surface.width / 2.0, surface.height / 2.0),
            Size::new(side, side),
        );
        let style = self.branded_qr_style();
        let field = Field::new(QR_FIELD_NAME, FieldKind::QrCode, Placement::Displayed(rect))
            .with_qr_style(style.clone());
        let id = self.store.add_field(field)?;
        self.store.select(Some(id))?;
        self.qr_previews.request(id, &style);
        self.scheduler.request();
        Ok(id)
    }

    /// Applies any edit from the properties panel.
    pub fn update_field(&mut self, id: FieldId, patch: FieldPatch) -> Result<(), DesignerError> {
        let restyled_qr = patch.qr_style.clone();
        self.store.update_field(id, patch)?;
        if let Some(style) = restyled_qr {
            self.qr_previews.invalidate(id);
            self.qr_previews.request(id, &style);
        }
        self.scheduler.request();
        Ok(())
    }

    pub fn rename_field(&mut self, id: FieldId, name: &str) -> Result<(), DesignerError> {
        self.update_field(id, FieldPatch::name(name.trim()))
    }

    /// Restyles a field. Editing the Name field restyles its followers too.
    pub fn set_field_style(&mut self, id: FieldId, style: TextStyle) -> Result<(), DesignerError> {
        self.update_field(id, FieldPatch::style(style))
    }

    /// Restyles a QR field and regenerates its preview.
    pub fn set_qr_style(&mut self, id: FieldId, style: QrStyle) -> Result<(), DesignerError> {
        self.update_field(id, FieldPatch::qr_style(style))
    }

    pub fn remove_field(&mut self, id: FieldId) -> Result<Field, DesignerError> {
        let removed = self.store.remove_field(id)?;
        if self.interaction.dragged_id() == Some(id) {
            self.interaction.cancel();
        }
        self.qr_previews.remove(id);
        self.scheduler.request();
        Ok(removed)
    }
}
