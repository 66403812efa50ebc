//! Ordered field collection plus selection.
//!
//! Every mutation runs the lifecycle rules first and leaves the store
//! untouched when they fail. Draw order is insertion order; the last field
//! is topmost for hit-testing.

use std::fmt;
use std::sync::Arc;

use certkit_core::{DesignerError, Point, Rect, RequiredField, Size};
use certkit_settings::DesignerConfig;

use crate::font_fit::FitRange;
use crate::font_manager::{ApproxMeasurer, TextMeasurer};
use crate::model::{CredentialKind, Field, FieldId, FieldPatch, Placement, TextStyle};
use crate::rules;

/// Surface bounds, fit range and measurement primitive the store enforces.
#[derive(Clone)]
pub struct FieldRules {
    pub surface: Size,
    pub fit: FitRange,
    measurer: Arc<dyn TextMeasurer>,
}

impl FieldRules {
    pub fn new(surface: Size, fit: FitRange, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self {
            surface,
            fit,
            measurer,
        }
    }

    pub fn from_config(config: &DesignerConfig, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self::new(
            Size::new(config.surface.width, config.surface.height),
            FitRange::from(&config.text),
            measurer,
        )
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Largest font size for `style` and `text` in a box of `bounds`.
    pub fn max_font_size(&self, bounds: Size, text: &str, style: &TextStyle) -> u32 {
        self.fit
            .max_font_size(self.measurer(), bounds, text, &style.font())
    }

    /// Caps the field's font size to what fits its box. Hidden and QR fields
    /// are left alone.
    pub fn cap_font(&self, field: &mut Field) {
        if field.is_qr_code() {
            return;
        }
        if let Some(rect) = field.rect() {
            field.style.font_size = self.fit.cap(
                self.measurer(),
                rect.size(),
                field.label(),
                &field.style.font(),
                field.style.font_size,
            );
        }
    }

    /// Clamps a displayed rect to the surface; QR rects are squared.
    pub fn normalize_rect(&self, field: &Field, rect: Rect) -> Result<Rect, DesignerError> {
        if !rect.is_finite() {
            return Err(DesignerError::InvalidGeometry {
                reason: format!("non-finite rect {}", rect),
            });
        }
        let mut width = rect.width.max(1.0).min(self.surface.width);
        let mut height = rect.height.max(1.0).min(self.surface.height);
        if field.is_qr_code() {
            let side = width
                .max(height)
                .min(self.surface.width.min(self.surface.height));
            width = side;
            height = side;
        }
        Ok(Rect::new(rect.x, rect.y, width, height).kept_within(self.surface))
    }

    fn normalize(&self, mut field: Field) -> Result<Field, DesignerError> {
        field.placement = match field.placement {
            Placement::Displayed(rect) => Placement::Displayed(self.normalize_rect(&field, rect)?),
            Placement::NotDisplayed(size) => {
                if !field.kind().may_be_hidden() {
                    return Err(DesignerError::InvalidGeometry {
                        reason: format!("{} fields must be placed on the image", field.kind()),
                    });
                }
                Placement::NotDisplayed(size)
            }
        };
        Ok(field)
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::new(
            Size::new(
                certkit_core::constants::DEFAULT_SURFACE_WIDTH,
                certkit_core::constants::DEFAULT_SURFACE_HEIGHT,
            ),
            FitRange::default(),
            Arc::new(ApproxMeasurer::default()),
        )
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("surface", &self.surface)
            .field("fit", &self.fit)
            .finish_non_exhaustive()
    }
}

/// The template's fields in draw order plus the selected field.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    fields: Vec<Field>,
    selected: Option<FieldId>,
    rules: FieldRules,
}

impl FieldStore {
    pub fn new(rules: FieldRules) -> Self {
        Self {
            fields: Vec::new(),
            selected: None,
            rules,
        }
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    fn index_of(&self, id: FieldId) -> Result<usize, DesignerError> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or(DesignerError::FieldNotFound { id })
    }

    pub fn selected_id(&self) -> Option<FieldId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Field> {
        self.selected.and_then(|id| self.get(id))
    }

    /// The field named "name", if any.
    pub fn name_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_name_field())
    }

    /// Adds a field after running the lifecycle rules.
    pub fn add_field(&mut self, field: Field) -> Result<FieldId, DesignerError> {
        let mut field = self.rules.normalize(field)?;
        rules::check_unique(&self.fields, &field)?;
        self.rules.cap_font(&mut field);

        let id = field.id;
        tracing::info!(
            "Added {} field '{}' ({})",
            field.kind(),
            field.name,
            if field.is_displayed() { "displayed" } else { "not displayed" }
        );
        let is_name = field.is_name_field();
        self.fields.push(field);
        if is_name {
            self.propagate_name_style(id);
        }
        Ok(id)
    }

    /// Applies a patch after running the lifecycle rules on the result.
    pub fn update_field(&mut self, id: FieldId, patch: FieldPatch) -> Result<(), DesignerError> {
        let idx = self.index_of(id)?;
        let current = &self.fields[idx];
        let mut next = patch.applied_to(current);

        if patch.placement.is_some() {
            next = self.rules.normalize(next)?;
        }
        rules::check_unique(&self.fields, &next)?;
        self.rules.cap_font(&mut next);

        let is_name = next.is_name_field();
        self.fields[idx] = next;
        tracing::debug!("Updated field {}", id);
        if is_name {
            self.propagate_name_style(id);
        }
        Ok(())
    }

    /// Removes a field and clears the selection if it pointed at it.
    pub fn remove_field(&mut self, id: FieldId) -> Result<Field, DesignerError> {
        let idx = self.index_of(id)?;
        let removed = self.fields.remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::info!("Removed {} field '{}'", removed.kind(), removed.name);
        Ok(removed)
    }

    /// Selects a field, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<FieldId>) -> Result<(), DesignerError> {
        if let Some(id) = id {
            self.index_of(id)?;
        }
        self.selected = id;
        Ok(())
    }

    /// Topmost displayed field whose box contains `point`.
    pub fn hit_test(&self, point: Point) -> Option<FieldId> {
        self.fields
            .iter()
            .rev()
            .find(|f| f.rect().is_some_and(|r| r.contains(point)))
            .map(|f| f.id)
    }

    /// Moves a displayed field so its top-left is at `origin`, kept inside
    /// the surface. Returns `false` for fields without a position.
    pub fn move_field_to(&mut self, id: FieldId, origin: Point) -> Result<bool, DesignerError> {
        let idx = self.index_of(id)?;
        let surface = self.rules.surface;
        let field = &mut self.fields[idx];
        let Some(rect) = field.rect() else {
            return Ok(false);
        };
        let moved = Rect::from_origin_size(origin, rect.size()).kept_within(surface);
        if !moved.is_finite() {
            return Err(DesignerError::InvalidGeometry {
                reason: format!("non-finite move target {}", origin),
            });
        }
        field.placement = Placement::Displayed(moved);
        Ok(true)
    }

    /// Replaces the rect of a displayed field and re-caps its font size.
    pub fn resize_field(&mut self, id: FieldId, rect: Rect) -> Result<(), DesignerError> {
        let idx = self.index_of(id)?;
        let normalized = self.rules.normalize_rect(&self.fields[idx], rect)?;
        let field = &mut self.fields[idx];
        if !field.is_displayed() {
            return Err(DesignerError::InvalidGeometry {
                reason: "fields without a position cannot be resized".to_string(),
            });
        }
        field.placement = Placement::Displayed(normalized);
        self.rules.cap_font(field);
        Ok(())
    }

    /// Copies the Name field's style onto email, issue-date and expiry-date
    /// fields, re-capping those that are displayed.
    fn propagate_name_style(&mut self, source: FieldId) {
        let Some(style) = self.get(source).map(|f| f.style.clone()) else {
            return;
        };
        let rules = &self.rules;
        for target in self
            .fields
            .iter_mut()
            .filter(|f| f.id != source && f.receives_name_style())
        {
            target.style = style.clone();
            rules.cap_font(target);
            tracing::debug!(
                "Propagated name style to '{}' (font size {})",
                target.name,
                target.style.font_size
            );
        }
    }

    /// Requirements a save would fail on.
    pub fn missing_required(&self, credential_kind: CredentialKind) -> Vec<RequiredField> {
        rules::missing_required(&self.fields, credential_kind)
    }

    pub fn validate_for_save(&self, credential_kind: CredentialKind) -> Result<(), DesignerError> {
        rules::validate_for_save(&self.fields, credential_kind)
    }

    /// Replaces every field without running the rules. Used when loading a
    /// stored template, which may predate them.
    pub fn load_fields(&mut self, fields: Vec<Field>) {
        tracing::info!("Loaded {} fields", fields.len());
        self.fields = fields;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.selected = None;
    }
}
