//! Pointer routing and the name-and-kind prompt for drawn fields.

use certkit_core::{DesignerError, Point};

use super::EditorSession;
use crate::interaction::{Cursor, PointerOutcome};
use crate::model::{Field, FieldId, FieldKind, Placement};

impl EditorSession {
    /// Pointer pressed on the surface. Ignored until the base image is loaded.
    ///
    /// A press while a drawing awaits its name discards that drawing.
    pub fn pointer_down(&mut self, point: Point) -> Result<PointerOutcome, DesignerError> {
        let loaded = self.image_loaded();
        if loaded {
            if let Some(stale) = self.pending.take() {
                tracing::debug!("Pending field at {} discarded by a new press", stale.rect);
                self.scheduler.request();
            }
        }
        let outcome = self.interaction.pointer_down(&mut self.store, point, loaded);
        self.route(outcome)
    }

    pub fn pointer_move(&mut self, point: Point) -> Result<PointerOutcome, DesignerError> {
        let loaded = self.image_loaded();
        let outcome = self.interaction.pointer_move(&mut self.store, point, loaded);
        self.route(outcome)
    }

    /// Pointer released. A finished drawing becomes the pending field.
    pub fn pointer_up(&mut self, point: Point) -> Result<PointerOutcome, DesignerError> {
        let loaded = self.image_loaded();
        let outcome = self.interaction.pointer_up(&mut self.store, point, loaded);
        self.route(outcome)
    }

    fn route(
        &mut self,
        outcome: Result<PointerOutcome, DesignerError>,
    ) -> Result<PointerOutcome, DesignerError> {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                // Geometry may have changed before the failure.
                self.scheduler.request();
                return Err(e);
            }
        };
        if let PointerOutcome::FieldDrawn(pending) = outcome {
            self.pending = Some(pending);
        }
        if outcome.needs_redraw() {
            self.scheduler.request();
        }
        Ok(outcome)
    }

    pub fn cursor_at(&self, point: Point) -> Cursor {
        self.interaction
            .cursor_at(&self.store, point, self.image_loaded())
    }

    /// Turns the pending drawing into a field.
    ///
    /// On a rule violation the drawing stays pending so the prompt can be
    /// corrected and resubmitted.
    pub fn confirm_pending(
        &mut self,
        name: &str,
        kind: FieldKind,
    ) -> Result<FieldId, DesignerError> {
        let pending = self.pending.ok_or(DesignerError::NoPendingField)?;
        let mut field = Field::new(name.trim(), kind, Placement::Displayed(pending.rect));
        field.style = if field.receives_name_style() {
            self.store
                .name_field()
                .map(|f| f.style.clone())
                .unwrap_or_else(|| self.default_text_style())
        } else {
            self.default_text_style()
        };
        if kind == FieldKind::QrCode {
            field.qr_style = Some(self.branded_qr_style());
        }

        let id = self.store.add_field(field)?;
        self.pending = None;
        self.store.select(Some(id))?;
        self.scheduler.request();
        Ok(id)
    }

    /// Dismisses the prompt; the drawing is discarded.
    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Pending field discarded");
            self.scheduler.request();
        }
    }
}
