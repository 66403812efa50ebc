//! Resize geometry for a drag that started on a handle.
//!
//! Both functions work from the rect captured when the drag began (the
//! anchor) and the total pointer delta, so repeated updates never compound.

use certkit_core::{Rect, Size};

use super::handles::ResizeHandle;

/// Moves only the edges `handle` controls, keeping at least `min` and staying
/// inside `surface`.
pub fn resize_rect(
    anchor: Rect,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    min: Size,
    surface: Size,
) -> Rect {
    let mut left = anchor.x;
    let mut right = anchor.right();
    let mut top = anchor.y;
    let mut bottom = anchor.bottom();

    if handle.controls_left() {
        let hi = (right - min.width).max(0.0);
        left = (anchor.x + dx).max(0.0).min(hi);
    }
    if handle.controls_right() {
        let lo = (left + min.width).min(surface.width);
        right = (anchor.right() + dx).min(surface.width).max(lo);
    }
    if handle.controls_top() {
        let hi = (bottom - min.height).max(0.0);
        top = (anchor.y + dy).max(0.0).min(hi);
    }
    if handle.controls_bottom() {
        let lo = (top + min.height).min(surface.height);
        bottom = (anchor.bottom() + dy).min(surface.height).max(lo);
    }

    Rect::new(left, top, right - left, bottom - top)
}

/// Growth of a square's side for a handle drag.
///
/// Edge handles follow their own axis; corner handles average both deltas,
/// signed so that dragging away from the box grows it.
pub fn square_growth(handle: ResizeHandle, dx: f64, dy: f64) -> f64 {
    match handle {
        ResizeHandle::E => dx,
        ResizeHandle::W => -dx,
        ResizeHandle::S => dy,
        ResizeHandle::N => -dy,
        ResizeHandle::SE => (dx + dy) / 2.0,
        ResizeHandle::NW => (-dx - dy) / 2.0,
        ResizeHandle::NE => (dx - dy) / 2.0,
        ResizeHandle::SW => (-dx + dy) / 2.0,
    }
}

/// Square resize for QR fields: width and height always match.
///
/// The edges the handle does not control stay fixed; the side is floored at
/// `min_side` and limited by the room left on the surface.
pub fn resize_square(
    anchor: Rect,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    min_side: f64,
    surface: Size,
) -> Rect {
    let start = anchor.width.max(anchor.height);
    let room_x = if handle.controls_left() {
        anchor.right()
    } else {
        surface.width - anchor.x
    };
    let room_y = if handle.controls_top() {
        anchor.bottom()
    } else {
        surface.height - anchor.y
    };

    let side = (start + square_growth(handle, dx, dy))
        .max(min_side)
        .min(room_x.min(room_y))
        .max(1.0);

    let x = if handle.controls_left() {
        anchor.right() - side
    } else {
        anchor.x
    };
    let y = if handle.controls_top() {
        anchor.bottom() - side
    } else {
        anchor.y
    };
    Rect::new(x, y, side, side)
}
