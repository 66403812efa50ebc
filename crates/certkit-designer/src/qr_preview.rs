//! Styled QR placeholder images.
//!
//! Previews are generated off the UI path and cached per field id. Each cache
//! entry carries a generation token: invalidating an entry deletes it and
//! bumps the counter, so a generation that completes afterwards is dropped
//! instead of being drawn against a field whose style has moved on.

use std::collections::HashMap;
use std::sync::Arc;

use certkit_core::Rgba;
use parking_lot::Mutex;
use qrcode::{EcLevel, QrCode};
use thiserror::Error;
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point,
    RadialGradient, Rect, Shader, SpreadMode, Transform,
};

use crate::model::{
    CornerDotShape, CornerSquareShape, DotShape, ErrorCorrection, FieldId, Gradient, GradientKind,
    QrStyle,
};
use crate::scheduler::RedrawHandle;

/// Side of generated previews in pixels; the renderer scales to the field box.
pub const PREVIEW_RESOLUTION: u32 = 256;

/// Quiet zone around the code, in modules.
const QUIET_ZONE: usize = 2;

/// Bezier handle factor approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QrPreviewError {
    #[error("QR code generation failed: {0}")]
    Encode(String),

    #[error("Cannot allocate a {0}px preview")]
    Canvas(u32),
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

fn skia_color(hex: &str) -> Color {
    let c = Rgba::parse_or(hex, Rgba::BLACK);
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Solid or gradient paint over `bounds`.
fn paint_for(color: &str, gradient: Option<&Gradient>, bounds: Rect) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color(skia_color(color));

    let Some(gradient) = gradient else {
        return paint;
    };
    let stops: Vec<GradientStop> = gradient
        .color_stops
        .iter()
        .map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0) as f32, skia_color(&s.color)))
        .collect();
    if stops.len() < 2 {
        return paint;
    }

    let cx = bounds.x() + bounds.width() / 2.0;
    let cy = bounds.y() + bounds.height() / 2.0;
    let half = bounds.width().max(bounds.height()) / 2.0;
    let shader = match gradient.kind {
        GradientKind::Linear => {
            let (sin, cos) = (gradient.rotation as f32).sin_cos();
            LinearGradient::new(
                Point::from_xy(cx - cos * half, cy - sin * half),
                Point::from_xy(cx + cos * half, cy + sin * half),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
        }
        GradientKind::Radial => RadialGradient::new(
            Point::from_xy(cx, cy),
            Point::from_xy(cx, cy),
            half,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ),
    };
    if let Some(shader) = shader {
        paint.shader = shader;
    } else {
        tracing::warn!("Degenerate QR gradient, using solid {}", color);
    }
    paint
}

/// Per-corner radii, clockwise from top-left.
#[derive(Debug, Clone, Copy, Default)]
struct Radii {
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
}

impl Radii {
    fn uniform(r: f32) -> Self {
        Self {
            tl: r,
            tr: r,
            br: r,
            bl: r,
        }
    }
}

fn push_rounded_rect(pb: &mut PathBuilder, x: f32, y: f32, w: f32, h: f32, radii: Radii) {
    let limit = w.min(h) / 2.0;
    let Radii { tl, tr, br, bl } = Radii {
        tl: radii.tl.min(limit),
        tr: radii.tr.min(limit),
        br: radii.br.min(limit),
        bl: radii.bl.min(limit),
    };
    let (r, b) = (x + w, y + h);

    pb.move_to(x + tl, y);
    pb.line_to(r - tr, y);
    if tr > 0.0 {
        pb.cubic_to(r - tr + tr * KAPPA, y, r, y + tr - tr * KAPPA, r, y + tr);
    }
    pb.line_to(r, b - br);
    if br > 0.0 {
        pb.cubic_to(r, b - br + br * KAPPA, r - br + br * KAPPA, b, r - br, b);
    }
    pb.line_to(x + bl, b);
    if bl > 0.0 {
        pb.cubic_to(x + bl - bl * KAPPA, b, x, b - bl + bl * KAPPA, x, b - bl);
    }
    pb.line_to(x, y + tl);
    if tl > 0.0 {
        pb.cubic_to(x, y + tl - tl * KAPPA, x + tl - tl * KAPPA, y, x + tl, y);
    }
    pb.close();
}

fn push_circle(pb: &mut PathBuilder, cx: f32, cy: f32, radius: f32) {
    push_rounded_rect(
        pb,
        cx - radius,
        cy - radius,
        radius * 2.0,
        radius * 2.0,
        Radii::uniform(radius),
    );
}

/// Dark-module lookup with out-of-range treated as light.
struct Modules {
    width: usize,
    dark: Vec<bool>,
}

impl Modules {
    fn from_code(code: &QrCode) -> Self {
        let width = code.width();
        let mut dark = Vec::with_capacity(width * width);
        for y in 0..width {
            for x in 0..width {
                dark.push(code[(x, y)] == qrcode::Color::Dark);
            }
        }
        Self { width, dark }
    }

    fn is_dark(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.width {
            return false;
        }
        self.dark[y as usize * self.width + x as usize]
    }

    /// Inside one of the three 7x7 finder patterns.
    fn in_finder(&self, x: usize, y: usize) -> bool {
        let far = self.width.saturating_sub(7);
        (x < 7 && y < 7) || (x >= far && y < 7) || (x < 7 && y >= far)
    }

    fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width.saturating_sub(7);
        [(0, 0), (far, 0), (0, far)]
    }
}

fn dot_radii(shape: DotShape, modules: &Modules, x: usize, y: usize, cell: f32) -> Radii {
    let (xi, yi) = (x as isize, y as isize);
    let top = modules.is_dark(xi, yi - 1);
    let right = modules.is_dark(xi + 1, yi);
    let bottom = modules.is_dark(xi, yi + 1);
    let left = modules.is_dark(xi - 1, yi);
    let half = cell / 2.0;
    let round_if = |free: bool| if free { half } else { 0.0 };

    match shape {
        DotShape::Square | DotShape::Dots => Radii::default(),
        DotShape::Rounded => Radii {
            tl: round_if(!top && !left),
            tr: round_if(!top && !right),
            br: round_if(!bottom && !right),
            bl: round_if(!bottom && !left),
        },
        DotShape::ExtraRounded => Radii {
            tl: round_if(!top || !left),
            tr: round_if(!top || !right),
            br: round_if(!bottom || !right),
            bl: round_if(!bottom || !left),
        },
        DotShape::Classy => Radii {
            tl: round_if(!top && !left),
            br: round_if(!bottom && !right),
            ..Radii::default()
        },
        DotShape::ClassyRounded => Radii {
            tl: half,
            tr: round_if(!top && !right),
            br: half,
            bl: round_if(!bottom && !left),
        },
    }
}

/// Renders a styled QR code encoding `data` into a `size_px` square.
pub fn render_qr_preview(data: &str, style: &QrStyle, size_px: u32) -> Result<Pixmap, QrPreviewError> {
    let code = QrCode::with_error_correction_level(data, ec_level(style.error_correction_level))
        .map_err(|e| QrPreviewError::Encode(e.to_string()))?;
    let modules = Modules::from_code(&code);

    let mut pixmap = Pixmap::new(size_px, size_px).ok_or(QrPreviewError::Canvas(size_px))?;
    let full = Rect::from_xywh(0.0, 0.0, size_px as f32, size_px as f32)
        .ok_or(QrPreviewError::Canvas(size_px))?;
    let cell = size_px as f32 / (modules.width + 2 * QUIET_ZONE) as f32;
    let offset = QUIET_ZONE as f32 * cell;
    let code_px = modules.width as f32 * cell;
    let code_bounds = Rect::from_xywh(offset, offset, code_px, code_px).unwrap_or(full);

    let bg = &style.background_options;
    pixmap.fill_rect(
        full,
        &paint_for(&bg.color, bg.gradient.as_ref(), full),
        Transform::identity(),
        None,
    );

    // Data modules
    let dots = &style.dots_options;
    let mut pb = PathBuilder::new();
    for y in 0..modules.width {
        for x in 0..modules.width {
            if !modules.is_dark(x as isize, y as isize) || modules.in_finder(x, y) {
                continue;
            }
            let px = offset + x as f32 * cell;
            let py = offset + y as f32 * cell;
            if dots.shape == DotShape::Dots {
                push_circle(&mut pb, px + cell / 2.0, py + cell / 2.0, cell / 2.0);
            } else {
                let radii = dot_radii(dots.shape, &modules, x, y, cell);
                push_rounded_rect(&mut pb, px, py, cell, cell, radii);
            }
        }
    }
    fill(&mut pixmap, pb.finish(), &paint_for(&dots.color, dots.gradient.as_ref(), code_bounds), FillRule::Winding);

    // Finder frames and their centres
    let square_paint = paint_for(&style.corners_square_options.color, None, code_bounds);
    let dot_paint = paint_for(&style.corners_dot_options.color, None, code_bounds);
    for (fx, fy) in modules.finder_origins() {
        let x = offset + fx as f32 * cell;
        let y = offset + fy as f32 * cell;

        let mut frame = PathBuilder::new();
        match style.corners_square_options.shape {
            CornerSquareShape::Square => {
                push_rounded_rect(&mut frame, x, y, 7.0 * cell, 7.0 * cell, Radii::default());
                push_rounded_rect(&mut frame, x + cell, y + cell, 5.0 * cell, 5.0 * cell, Radii::default());
            }
            CornerSquareShape::Dot => {
                push_circle(&mut frame, x + 3.5 * cell, y + 3.5 * cell, 3.5 * cell);
                push_circle(&mut frame, x + 3.5 * cell, y + 3.5 * cell, 2.5 * cell);
            }
            CornerSquareShape::ExtraRounded => {
                push_rounded_rect(&mut frame, x, y, 7.0 * cell, 7.0 * cell, Radii::uniform(2.5 * cell));
                push_rounded_rect(
                    &mut frame,
                    x + cell,
                    y + cell,
                    5.0 * cell,
                    5.0 * cell,
                    Radii::uniform(1.5 * cell),
                );
            }
        }
        fill(&mut pixmap, frame.finish(), &square_paint, FillRule::EvenOdd);

        let mut centre = PathBuilder::new();
        match style.corners_dot_options.shape {
            CornerDotShape::Square => {
                push_rounded_rect(&mut centre, x + 2.0 * cell, y + 2.0 * cell, 3.0 * cell, 3.0 * cell, Radii::default());
            }
            CornerDotShape::Dot => push_circle(&mut centre, x + 3.5 * cell, y + 3.5 * cell, 1.5 * cell),
        }
        fill(&mut pixmap, centre.finish(), &dot_paint, FillRule::Winding);
    }

    Ok(pixmap)
}

fn fill(pixmap: &mut Pixmap, path: Option<Path>, paint: &Paint<'_>, rule: FillRule) {
    if let Some(path) = path {
        pixmap.fill_path(&path, paint, rule, Transform::identity(), None);
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Pending { generation: u64 },
    Ready { generation: u64, pixmap: Arc<Pixmap> },
    Failed { generation: u64 },
}

impl Entry {
    fn generation(&self) -> u64 {
        match self {
            Entry::Pending { generation }
            | Entry::Ready { generation, .. }
            | Entry::Failed { generation } => *generation,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<FieldId, Entry>,
    next_generation: u64,
}

impl CacheState {
    fn bump(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

/// Per-field cache of generated QR previews.
#[derive(Debug, Clone)]
pub struct QrPreviewCache {
    state: Arc<Mutex<CacheState>>,
    data: Arc<str>,
    resolution: u32,
    redraw: RedrawHandle,
}

impl QrPreviewCache {
    /// `data` is the payload encoded in every preview.
    pub fn new(data: impl Into<String>, redraw: RedrawHandle) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            data: Arc::from(data.into()),
            resolution: PREVIEW_RESOLUTION,
            redraw,
        }
    }

    /// The finished preview for `id`, if generation has completed.
    pub fn get(&self, id: FieldId) -> Option<Arc<Pixmap>> {
        match self.state.lock().entries.get(&id) {
            Some(Entry::Ready { pixmap, .. }) => Some(Arc::clone(pixmap)),
            _ => None,
        }
    }

    pub fn is_pending(&self, id: FieldId) -> bool {
        matches!(self.state.lock().entries.get(&id), Some(Entry::Pending { .. }))
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.state.lock().entries.contains_key(&id)
    }

    /// Starts generating a preview for `id` unless an entry already exists.
    ///
    /// Runs on the tokio blocking pool when a runtime is available, inline
    /// otherwise. A redraw is requested when the preview lands.
    pub fn request(&self, id: FieldId, style: &QrStyle) -> bool {
        let generation = {
            let mut state = self.state.lock();
            if state.entries.contains_key(&id) {
                return false;
            }
            let generation = state.bump();
            state.entries.insert(id, Entry::Pending { generation });
            generation
        };

        let job = {
            let cache = self.clone();
            let style = style.clone();
            move || cache.complete(id, generation, render_qr_preview(&cache.data, &style, cache.resolution))
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => job(),
        }
        true
    }

    fn complete(&self, id: FieldId, generation: u64, result: Result<Pixmap, QrPreviewError>) {
        {
            let mut state = self.state.lock();
            let current = state.entries.get(&id).map(Entry::generation);
            if current != Some(generation) {
                tracing::debug!("Discarded stale QR preview for field {}", id);
                return;
            }
            let entry = match result {
                Ok(pixmap) => Entry::Ready {
                    generation,
                    pixmap: Arc::new(pixmap),
                },
                Err(e) => {
                    tracing::warn!("QR preview for field {} failed: {}", id, e);
                    Entry::Failed { generation }
                }
            };
            state.entries.insert(id, entry);
        }
        self.redraw.request();
    }

    /// Deletes the entry for `id` so the next request regenerates it.
    pub fn invalidate(&self, id: FieldId) {
        let mut state = self.state.lock();
        state.entries.remove(&id);
        state.bump();
        tracing::debug!("Invalidated QR preview for field {}", id);
    }

    /// Forgets `id` entirely (field deleted).
    pub fn remove(&self, id: FieldId) {
        let mut state = self.state.lock();
        if state.entries.remove(&id).is_some() {
            state.bump();
        }
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.bump();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
