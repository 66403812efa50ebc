//! Resize handles on the eight compass points of a field box.

use std::fmt;

use certkit_core::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    /// Hit-test order: corners before edges so overlapping handles on small
    /// boxes resolve to the corner.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::NE,
        ResizeHandle::SE,
        ResizeHandle::SW,
        ResizeHandle::N,
        ResizeHandle::E,
        ResizeHandle::S,
        ResizeHandle::W,
    ];

    pub fn controls_left(&self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    pub fn controls_right(&self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn controls_top(&self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn controls_bottom(&self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::NE | ResizeHandle::SE | ResizeHandle::SW | ResizeHandle::NW
        )
    }

    /// Centre of the handle on `rect`.
    pub fn position(&self, rect: &Rect) -> Point {
        let x = if self.controls_left() {
            rect.x
        } else if self.controls_right() {
            rect.right()
        } else {
            rect.x + rect.width / 2.0
        };
        let y = if self.controls_top() {
            rect.y
        } else if self.controls_bottom() {
            rect.bottom()
        } else {
            rect.y + rect.height / 2.0
        };
        Point::new(x, y)
    }

    /// Square drawn for this handle.
    pub fn handle_rect(&self, rect: &Rect, handle_size: f64) -> Rect {
        let c = self.position(rect);
        Rect::new(
            c.x - handle_size / 2.0,
            c.y - handle_size / 2.0,
            handle_size,
            handle_size,
        )
    }

    /// Lowercase compass code: `n`, `ne`, ...
    pub fn code(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::NE => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::SE => "se",
            ResizeHandle::S => "s",
            ResizeHandle::SW => "sw",
            ResizeHandle::W => "w",
            ResizeHandle::NW => "nw",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.code().eq_ignore_ascii_case(code.trim()))
    }

    /// CSS cursor name, e.g. `ne-resize`.
    pub fn cursor_name(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n-resize",
            ResizeHandle::NE => "ne-resize",
            ResizeHandle::E => "e-resize",
            ResizeHandle::SE => "se-resize",
            ResizeHandle::S => "s-resize",
            ResizeHandle::SW => "sw-resize",
            ResizeHandle::W => "w-resize",
            ResizeHandle::NW => "nw-resize",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Handle of `rect` under `point`, if any.
pub fn handle_at(rect: &Rect, point: Point, handle_size: f64) -> Option<ResizeHandle> {
    let tolerance = handle_size / 2.0;
    ResizeHandle::ALL.into_iter().find(|h| {
        let c = h.position(rect);
        (point.x - c.x).abs() <= tolerance && (point.y - c.y).abs() <= tolerance
    })
}
