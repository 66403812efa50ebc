//! Pointer interaction state machine.
//!
//! Four mutually exclusive modes: idle (hover only), drawing a new field,
//! moving a field, resizing a field. Field geometry changes are applied to
//! the [`FieldStore`] live on every pointer move; there is no commit step.
//!
//! Nothing here reacts while the base image is missing.

pub mod handles;
pub mod resize;

pub use handles::{handle_at, ResizeHandle};
pub use resize::{resize_rect, resize_square, square_growth};

use certkit_core::{constants, DesignerError, Point, Rect, Size};
use certkit_settings::DesignerConfig;

use crate::field_store::FieldStore;
use crate::model::FieldId;

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Drawing {
        anchor: Point,
        current: Point,
    },
    Moving {
        id: FieldId,
        /// Pointer position relative to the field's top-left at grab time.
        grab_offset: Point,
    },
    Resizing {
        id: FieldId,
        handle: ResizeHandle,
        /// Field rect when the drag began.
        anchor: Rect,
        start: Point,
    },
}

/// Geometry of a drawn rectangle waiting for a name and a kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingField {
    pub rect: Rect,
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    Unchanged,
    /// Selection, field geometry or the draft rect changed; redraw.
    Changed,
    /// A drawing finished; the host should prompt for name and kind.
    FieldDrawn(PendingField),
}

impl PointerOutcome {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, PointerOutcome::Unchanged)
    }
}

/// Visual pointer affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
    Grab,
    Grabbing,
    Resize(ResizeHandle),
}

impl Cursor {
    pub fn css_name(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Crosshair => "crosshair",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Resize(handle) => handle.cursor_name(),
        }
    }
}

/// Tunables for the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub min_field: Size,
    pub min_qr_side: f64,
    pub handle_size: f64,
    /// Pointer travel below which press/release counts as a click.
    pub click_slop: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            min_field: Size::new(constants::MIN_FIELD_WIDTH, constants::MIN_FIELD_HEIGHT),
            min_qr_side: constants::MIN_QR_SIZE,
            handle_size: constants::HANDLE_SIZE,
            click_slop: constants::CLICK_SLOP,
        }
    }
}

impl From<&DesignerConfig> for InteractionSettings {
    fn from(config: &DesignerConfig) -> Self {
        Self {
            min_field: Size::new(config.fields.min_width, config.fields.min_height),
            min_qr_side: config.fields.min_qr_size,
            handle_size: config.fields.handle_size,
            click_slop: constants::CLICK_SLOP,
        }
    }
}

/// Draft rectangle for a drawing: at least `min` in each dimension, growing
/// in the drag direction, kept on the surface.
pub fn draft_rect(anchor: Point, current: Point, min: Size, surface: Size) -> Rect {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let width = dx.abs().max(min.width).min(surface.width);
    let height = dy.abs().max(min.height).min(surface.height);
    let x = if dx < 0.0 { anchor.x - width } else { anchor.x };
    let y = if dy < 0.0 { anchor.y - height } else { anchor.y };
    Rect::new(x, y, width, height).kept_within(surface)
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    state: DragState,
    press_at: Option<Point>,
    did_drag: bool,
    settings: InteractionSettings,
}

impl Interaction {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Field being moved or resized, if any.
    pub fn dragged_id(&self) -> Option<FieldId> {
        match self.state {
            DragState::Moving { id, .. } | DragState::Resizing { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The in-progress drawing rectangle, if drawing.
    pub fn draft_rect(&self, surface: Size) -> Option<Rect> {
        match self.state {
            DragState::Drawing { anchor, current } => Some(draft_rect(
                anchor,
                current,
                self.settings.min_field,
                surface,
            )),
            _ => None,
        }
    }

    /// Abandons whatever drag is in progress.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            tracing::debug!("Interaction cancelled from {:?}", self.state);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.press_at = None;
        self.did_drag = false;
    }

    pub fn pointer_down(
        &mut self,
        store: &mut FieldStore,
        point: Point,
        image_loaded: bool,
    ) -> Result<PointerOutcome, DesignerError> {
        if !image_loaded || !point.is_finite() {
            return Ok(PointerOutcome::Unchanged);
        }
        self.press_at = Some(point);
        self.did_drag = false;

        // Handles of the selected field win over everything else.
        if let Some((id, rect)) = store.selected().and_then(|f| f.rect().map(|r| (f.id, r))) {
            if let Some(handle) = handle_at(&rect, point, self.settings.handle_size) {
                tracing::debug!("Resize {} of field {} started", handle, id);
                self.state = DragState::Resizing {
                    id,
                    handle,
                    anchor: rect,
                    start: point,
                };
                return Ok(PointerOutcome::Unchanged);
            }
        }

        if let Some(id) = store.hit_test(point) {
            let Some(rect) = store.get(id).and_then(|f| f.rect()) else {
                return Ok(PointerOutcome::Unchanged);
            };
            let changed = store.selected_id() != Some(id);
            store.select(Some(id))?;
            self.state = DragState::Moving {
                id,
                grab_offset: Point::new(point.x - rect.x, point.y - rect.y),
            };
            tracing::debug!("Move of field {} started", id);
            return Ok(if changed {
                PointerOutcome::Changed
            } else {
                PointerOutcome::Unchanged
            });
        }

        let had_selection = store.selected_id().is_some();
        store.select(None)?;
        self.state = DragState::Drawing {
            anchor: point,
            current: point,
        };
        tracing::debug!("Drawing started at {}", point);
        Ok(if had_selection {
            PointerOutcome::Changed
        } else {
            PointerOutcome::Unchanged
        })
    }

    pub fn pointer_move(
        &mut self,
        store: &mut FieldStore,
        point: Point,
        image_loaded: bool,
    ) -> Result<PointerOutcome, DesignerError> {
        if !image_loaded || !point.is_finite() {
            return Ok(PointerOutcome::Unchanged);
        }
        if let Some(press) = self.press_at {
            if press.distance_to(&point) > self.settings.click_slop {
                self.did_drag = true;
            }
        }

        match self.state {
            DragState::Idle => Ok(PointerOutcome::Unchanged),
            DragState::Drawing { anchor, .. } => {
                self.state = DragState::Drawing {
                    anchor,
                    current: point,
                };
                Ok(PointerOutcome::Changed)
            }
            DragState::Moving { id, grab_offset } => {
                let origin = Point::new(point.x - grab_offset.x, point.y - grab_offset.y);
                match store.move_field_to(id, origin) {
                    Ok(true) => Ok(PointerOutcome::Changed),
                    Ok(false) => Ok(PointerOutcome::Unchanged),
                    Err(e) => {
                        self.reset();
                        Err(e)
                    }
                }
            }
            DragState::Resizing {
                id,
                handle,
                anchor,
                start,
            } => {
                let Some(field) = store.get(id) else {
                    self.reset();
                    return Err(DesignerError::FieldNotFound { id });
                };
                let dx = point.x - start.x;
                let dy = point.y - start.y;
                let surface = store.rules().surface;
                let rect = if field.is_qr_code() {
                    resize_square(anchor, handle, dx, dy, self.settings.min_qr_side, surface)
                } else {
                    resize_rect(anchor, handle, dx, dy, self.settings.min_field, surface)
                };
                if let Err(e) = store.resize_field(id, rect) {
                    self.reset();
                    return Err(e);
                }
                Ok(PointerOutcome::Changed)
            }
        }
    }

    pub fn pointer_up(
        &mut self,
        store: &mut FieldStore,
        point: Point,
        image_loaded: bool,
    ) -> Result<PointerOutcome, DesignerError> {
        if !image_loaded {
            self.reset();
            return Ok(PointerOutcome::Unchanged);
        }
        if point.is_finite() && !self.is_idle() {
            if let Err(e) = self.pointer_move(store, point, image_loaded) {
                self.reset();
                return Err(e);
            }
        }

        let outcome = match self.state {
            DragState::Drawing { anchor, current } if self.did_drag => {
                let rect = draft_rect(anchor, current, self.settings.min_field, store.rules().surface);
                tracing::debug!("Drawing finished with {}", rect);
                PointerOutcome::FieldDrawn(PendingField { rect })
            }
            DragState::Drawing { .. } => PointerOutcome::Changed,
            DragState::Moving { .. } | DragState::Resizing { .. } => PointerOutcome::Changed,
            DragState::Idle => PointerOutcome::Unchanged,
        };
        self.reset();
        Ok(outcome)
    }

    /// Pointer affordance at `point`. Pure: no state changes.
    pub fn cursor_at(&self, store: &FieldStore, point: Point, image_loaded: bool) -> Cursor {
        if !image_loaded {
            return Cursor::Default;
        }
        match self.state {
            DragState::Moving { .. } => return Cursor::Grabbing,
            DragState::Resizing { handle, .. } => return Cursor::Resize(handle),
            DragState::Drawing { .. } => return Cursor::Crosshair,
            DragState::Idle => {}
        }
        if let Some(rect) = store.selected().and_then(|f| f.rect()) {
            if let Some(handle) = handle_at(&rect, point, self.settings.handle_size) {
                return Cursor::Resize(handle);
            }
        }
        if store.hit_test(point).is_some() {
            Cursor::Grab
        } else {
            Cursor::Crosshair
        }
    }
}
