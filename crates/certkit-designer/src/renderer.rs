//! Surface renderer
//! Draws the editing surface into a tiny-skia pixmap.
//!
//! Layers, bottom to top:
//! - background fill
//! - the active image, shrunk to fit and centred
//! - every displayed field (QR fields show their cached preview)
//! - resize handles of the selected field
//! - the in-progress drawing rectangle

use certkit_core::{Rect, Rgba, Size};
use image::RgbaImage;
use rusttype::{point as rt_point, Scale};
use tiny_skia::{
    Color, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};

use crate::field_store::FieldStore;
use crate::font_manager::{self, layout_width};
use crate::images::DecodedImage;
use crate::interaction::ResizeHandle;
use crate::model::Field;
use crate::qr_preview::QrPreviewCache;
use crate::transform::ImagePlacement;

fn field_fill() -> Color {
    Color::from_rgba8(59, 130, 246, 28)
}
fn field_border() -> Color {
    Color::from_rgba8(107, 114, 128, 255)
}
fn selection_color() -> Color {
    Color::from_rgba8(30, 58, 138, 255)
}
fn handle_fill() -> Color {
    Color::WHITE
}
fn draft_color() -> Color {
    Color::from_rgba8(37, 99, 235, 255)
}

/// Everything one frame depends on.
pub struct Scene<'a> {
    pub store: &'a FieldStore,
    pub image: Option<&'a DecodedImage>,
    pub qr_previews: &'a QrPreviewCache,
    pub draft: Option<Rect>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    surface: Size,
    background: Color,
    handle_size: f32,
}

impl Renderer {
    pub fn new(surface: Size, background: &str, handle_size: f64) -> Self {
        let bg = Rgba::parse_or(background, Rgba::WHITE);
        Self {
            surface,
            background: Color::from_rgba8(bg.r, bg.g, bg.b, bg.a),
            handle_size: handle_size as f32,
        }
    }

    pub fn from_config(config: &certkit_settings::DesignerConfig) -> Self {
        Self::new(
            Size::new(config.surface.width, config.surface.height),
            &config.surface.background,
            config.fields.handle_size,
        )
    }

    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Renders one frame. `None` only if the surface size cannot be allocated.
    pub fn render(&self, scene: &Scene<'_>) -> Option<Pixmap> {
        let width = self.surface.width.round().max(1.0) as u32;
        let height = self.surface.height.round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(self.background);

        if let Some(image) = scene.image {
            self.draw_image(&mut pixmap, image);
        }

        for field in scene.store.iter() {
            let Some(rect) = field.rect() else {
                continue;
            };
            let selected = scene.store.selected_id() == Some(field.id);
            self.draw_field(&mut pixmap, field, rect, selected, scene.qr_previews);
        }

        if let Some(rect) = scene.store.selected().and_then(Field::rect) {
            self.draw_handles(&mut pixmap, rect);
        }

        if let Some(draft) = scene.draft {
            self.draw_draft(&mut pixmap, draft);
        }

        Some(pixmap)
    }

    fn draw_image(&self, pixmap: &mut Pixmap, image: &DecodedImage) {
        let placement = ImagePlacement::fit(image.size(), self.surface);
        let scale = placement.scale() as f32;
        let offset = placement.offset();
        // Surface = image * scale + offset
        let transform =
            Transform::from_scale(scale, scale).post_translate(offset.x as f32, offset.y as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
    }

    fn draw_field(
        &self,
        pixmap: &mut Pixmap,
        field: &Field,
        rect: Rect,
        selected: bool,
        previews: &QrPreviewCache,
    ) {
        let Some(box_rect) = to_skia(rect) else {
            return;
        };

        let preview = if field.is_qr_code() {
            previews.get(field.id)
        } else {
            None
        };

        match &preview {
            Some(qr) => {
                let qr: &Pixmap = qr;
                let sx = box_rect.width() / qr.width() as f32;
                let sy = box_rect.height() / qr.height() as f32;
                let transform =
                    Transform::from_scale(sx, sy).post_translate(box_rect.x(), box_rect.y());
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..Default::default()
                };
                pixmap.draw_pixmap(0, 0, qr.as_ref(), &paint, transform, None);
            }
            None => {
                let mut fill = Paint::default();
                fill.set_color(field_fill());
                pixmap.fill_rect(box_rect, &fill, Transform::identity(), None);
                let color = if field.is_qr_code() {
                    Rgba::BLACK
                } else {
                    Rgba::parse_or(&field.style.font_color, Rgba::BLACK)
                };
                draw_label(pixmap, field, rect, color);
            }
        }

        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(if selected {
            selection_color()
        } else {
            field_border()
        });
        let stroke = Stroke {
            width: if selected { 2.0 } else { 1.0 },
            ..Default::default()
        };
        let path = PathBuilder::from_rect(box_rect);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_handles(&self, pixmap: &mut Pixmap, rect: Rect) {
        let mut fill = Paint::default();
        fill.set_color(handle_fill());
        let mut border = Paint::default();
        border.set_color(selection_color());
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };

        for handle in ResizeHandle::ALL {
            let Some(r) = to_skia(handle.handle_rect(&rect, f64::from(self.handle_size))) else {
                continue;
            };
            pixmap.fill_rect(r, &fill, Transform::identity(), None);
            let path = PathBuilder::from_rect(r);
            pixmap.stroke_path(&path, &border, &stroke, Transform::identity(), None);
        }
    }

    fn draw_draft(&self, pixmap: &mut Pixmap, draft: Rect) {
        let Some(r) = to_skia(draft) else {
            return;
        };
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(draft_color());
        let stroke = Stroke {
            width: 1.5,
            dash: StrokeDash::new(vec![6.0, 4.0], 0.0),
            ..Default::default()
        };
        let path = PathBuilder::from_rect(r);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn to_skia(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

/// Draws the field label centred in `rect`, clipped to it.
fn draw_label(pixmap: &mut Pixmap, field: &Field, rect: Rect, color: Rgba) {
    let style = &field.style;
    let Some(font) = font_manager::get_font_for(&style.font_family, style.bold, style.italic)
    else {
        return;
    };
    let size = style.font_size as f32;
    if size <= 0.0 || field.label().is_empty() {
        return;
    }

    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let text_width = layout_width(font, size, field.label());
    let center = rect.center();
    // Centre horizontally; place the baseline so ascent/descent straddle the middle.
    let start = rt_point(
        center.x as f32 - text_width / 2.0,
        center.y as f32 + (v_metrics.ascent + v_metrics.descent) / 2.0,
    );

    let clip_x0 = rect.x.max(0.0) as i32;
    let clip_y0 = rect.y.max(0.0) as i32;
    let clip_x1 = (rect.right().min(f64::from(pixmap.width()))) as i32;
    let clip_y1 = (rect.bottom().min(f64::from(pixmap.height()))) as i32;
    let width = pixmap.width() as i32;

    for glyph in font.layout(field.label(), scale, start) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        let data = pixmap.data_mut();
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < clip_x0 || px >= clip_x1 || py < clip_y0 || py >= clip_y1 {
                return;
            }
            let alpha = coverage * f32::from(color.a) / 255.0;
            if alpha <= 0.0 {
                return;
            }
            let idx = ((py * width + px) * 4) as usize;
            let pixel = &mut data[idx..idx + 4];
            // Source-over on premultiplied data.
            let src = [color.r, color.g, color.b];
            for c in 0..3 {
                let s = f32::from(src[c]) * alpha;
                let d = f32::from(pixel[c]) * (1.0 - alpha);
                pixel[c] = (s + d).round().min(255.0) as u8;
            }
            let a = 255.0 * alpha + f32::from(pixel[3]) * (1.0 - alpha);
            pixel[3] = a.round().min(255.0) as u8;
        });
    }
}

/// Converts a rendered frame to a straight-alpha RGBA image.
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        image::Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}
