//! Coordinate transformation between the editing surface and source images.
//!
//! Two conventions coexist and both are load-bearing for stored templates:
//!
//! - **Image placement** ([`ImagePlacement`]): the artwork is drawn centred on
//!   the surface and uniformly shrunk to fit, never enlarged.
//!   ```text
//!   scale  = min(1, surface_w / image_w, surface_h / image_h)
//!   offset = (surface - image * scale) / 2
//!   surface_point = image_point * scale + offset
//!   ```
//! - **Field geometry** ([`FieldScale`]): stored field positions assume the
//!   image spans the whole surface, with independent axis factors.
//!   ```text
//!   sx = image_w / surface_w
//!   sy = image_h / surface_h
//!   font_scale = (sx + sy) / 2
//!   ```

use std::fmt;

use certkit_core::{Point, Rect, Size};

/// How an image of a given size is laid out on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    scale: f64,
    offset: Point,
    image: Size,
    surface: Size,
}

impl ImagePlacement {
    /// Shrink-to-fit, else 1:1, then centre.
    pub fn fit(image: Size, surface: Size) -> Self {
        let scale = if image.is_empty() {
            1.0
        } else {
            1.0_f64
                .min(surface.width / image.width)
                .min(surface.height / image.height)
        };
        let offset = Point::new(
            (surface.width - image.width * scale) / 2.0,
            (surface.height - image.height * scale) / 2.0,
        );
        Self {
            scale,
            offset,
            image,
            surface,
        }
    }

    /// Uniform scale factor applied to the image (always `<= 1`).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Top-left corner of the drawn image on the surface.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn image_size(&self) -> Size {
        self.image
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    /// Area of the surface covered by the image.
    pub fn displayed_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.image.width * self.scale,
            self.image.height * self.scale,
        )
    }

    /// Surface point to image pixel, clamped to the drawn image first.
    pub fn to_image_space(&self, surface_point: Point) -> Point {
        let p = self.displayed_rect().clamp_point(surface_point);
        Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    /// Image pixel to surface point, clamped to the image bounds first.
    pub fn to_surface_space(&self, image_point: Point) -> Point {
        let p = Rect::from_origin_size(Point::default(), self.image).clamp_point(image_point);
        Point::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }
}

impl fmt::Display for ImagePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image {} on {} | Scale: {:.3} | Offset: {}",
            self.image, self.surface, self.scale, self.offset
        )
    }
}

/// Converts a surface point into image pixels (see [`ImagePlacement`]).
pub fn to_image_space(surface_point: Point, surface: Size, image: Size) -> Point {
    ImagePlacement::fit(image, surface).to_image_space(surface_point)
}

/// Converts an image pixel into a surface point (see [`ImagePlacement`]).
pub fn to_surface_space(image_point: Point, surface: Size, image: Size) -> Point {
    ImagePlacement::fit(image, surface).to_surface_space(image_point)
}

/// Independent-axis scale between surface geometry and stored field geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScale {
    pub x: f64,
    pub y: f64,
    surface: Size,
    image: Size,
}

impl FieldScale {
    /// Scale from a surface of `surface` to an image of `image` pixels.
    pub fn between(surface: Size, image: Size) -> Self {
        if surface.is_empty() || image.is_empty() {
            tracing::warn!(
                "Degenerate field scale between surface {} and image {}, using 1:1",
                surface,
                image
            );
            return Self {
                x: 1.0,
                y: 1.0,
                surface,
                image,
            };
        }
        Self {
            x: image.width / surface.width,
            y: image.height / surface.height,
            surface,
            image,
        }
    }

    /// Font sizes use the mean of the axis factors to keep glyph proportions.
    pub fn font(&self) -> f64 {
        (self.x + self.y) / 2.0
    }

    /// Surface point to image point, clamped to the surface first.
    pub fn point_to_image(&self, p: Point) -> Point {
        let p = Rect::from_origin_size(Point::default(), self.surface).clamp_point(p);
        Point::new(p.x * self.x, p.y * self.y)
    }

    /// Image point to surface point, clamped to the image first.
    pub fn point_to_surface(&self, p: Point) -> Point {
        let p = Rect::from_origin_size(Point::default(), self.image).clamp_point(p);
        Point::new(p.x / self.x, p.y / self.y)
    }

    pub fn size_to_image(&self, s: Size) -> Size {
        Size::new(s.width * self.x, s.height * self.y)
    }

    pub fn size_to_surface(&self, s: Size) -> Size {
        Size::new(s.width / self.x, s.height / self.y)
    }

    pub fn font_to_image(&self, size: f64) -> f64 {
        size * self.font()
    }

    pub fn font_to_surface(&self, size: f64) -> f64 {
        size / self.font()
    }

    /// QR codes are stored square using the larger axis factor.
    pub fn square_to_image(&self, side: f64) -> f64 {
        side * self.x.max(self.y)
    }

    pub fn square_to_surface(&self, side: f64) -> f64 {
        side / self.x.max(self.y)
    }
}
