//! Software rasterizer implementing [`Surface`].
//!
//! The native host draws each frame into a [`Canvas`] and uploads the
//! pixels as a texture. Pixels are stored premultiplied in `f32` so that
//! many faint, overlapping glows accumulate without banding; they are
//! converted to straight-alpha RGBA8 on the way out.
//!
//! Shapes are anti-aliased with a one pixel coverage ramp at their edge.

use crate::color::Color;
use crate::surface::{Gradient, Surface};
use glam::{Vec2, Vec4};
use std::path::Path;

/// A CPU pixel buffer that can be drawn on like a browser canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Premultiplied RGBA, row-major.
    pixels: Vec<Vec4>,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
        }
    }

    /// Resize, discarding the current contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, Vec4::ZERO);
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Straight-alpha color of a pixel, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(unpremultiply(self.pixels[(y * self.width + x) as usize]))
    }

    /// Convert to straight-alpha RGBA8, reusing `out`'s allocation.
    pub fn write_rgba8(&self, out: &mut Vec<[u8; 4]>) {
        out.clear();
        out.extend(self.pixels.iter().map(|p| to_rgba8(unpremultiply(*p))));
    }

    /// Copy into an [`image::RgbaImage`].
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(to_rgba8(unpremultiply(
                self.pixels[(y * self.width + x) as usize],
            )))
        })
    }

    /// Save a PNG snapshot of the current frame.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
    }

    /// Source-over blend a straight-alpha color scaled by `coverage`.
    #[inline]
    fn blend(&mut self, x: u32, y: u32, color: Vec4, coverage: f32) {
        let alpha = color.w * coverage;
        if alpha <= 0.0 {
            return;
        }
        let src = (color.truncate() * alpha).extend(alpha);
        let dst = &mut self.pixels[(y * self.width + x) as usize];
        *dst = src + *dst * (1.0 - alpha);
    }

    /// Pixel rows and columns overlapping a box around `center`.
    fn span(&self, center: Vec2, extent: f32) -> Option<(u32, u32, u32, u32)> {
        if self.width == 0 || self.height == 0 || !extent.is_finite() || !center.is_finite() {
            return None;
        }
        let min = (center - Vec2::splat(extent + 1.0)).floor().max(Vec2::ZERO);
        let max = (center + Vec2::splat(extent + 1.0))
            .ceil()
            .min(Vec2::new(self.width as f32, self.height as f32));
        if min.x >= max.x || min.y >= max.y {
            return None;
        }
        Some((min.x as u32, min.y as u32, max.x as u32, max.y as u32))
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn clear(&mut self) {
        self.pixels.fill(Vec4::ZERO);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.span(center, radius) else {
            return;
        };
        let rgba = color.to_rgba();
        // Sub-pixel circles get proportionally less coverage
        let area = (radius * 2.0).min(1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let d = pixel_center(x, y).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0) * area;
                self.blend(x, y, rgba, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let mid = (from + to) * 0.5;
        let extent = from.distance(to) * 0.5 + half;
        let Some((x0, y0, x1, y1)) = self.span(mid, extent) else {
            return;
        };
        let rgba = color.to_rgba();
        let thickness = width.min(1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let d = distance_to_segment(pixel_center(x, y), from, to);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0) * thickness;
                self.blend(x, y, rgba, coverage);
            }
        }
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, gradient: &Gradient) {
        if radius <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.span(center, radius) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let d = pixel_center(x, y).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let rgba = gradient.sample(d / radius);
                self.blend(x, y, rgba, coverage);
            }
        }
    }
}

#[inline]
fn pixel_center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[inline]
fn unpremultiply(p: Vec4) -> Vec4 {
    if p.w <= 0.0 {
        Vec4::ZERO
    } else {
        (p.truncate() / p.w).extend(p.w)
    }
}

#[inline]
fn to_rgba8(c: Vec4) -> [u8; 4] {
    let c = (c.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_covers_center() {
        let mut canvas = Canvas::new(16, 16);
        canvas.fill_circle(Vec2::new(8.5, 8.5), 3.0, Color::rgba(1.0, 0.0, 0.0, 0.5));

        let center = canvas.pixel(8, 8).unwrap();
        assert!((center.w - 0.5).abs() < 1e-5);
        assert!((center.x - 1.0).abs() < 1e-5);

        // Far corner untouched
        assert_eq!(canvas.pixel(0, 0).unwrap(), Vec4::ZERO);
    }

    #[test]
    fn test_clear_resets_to_transparent() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_circle(Vec2::splat(4.0), 4.0, Color::rgba(1.0, 1.0, 1.0, 1.0));
        canvas.clear();
        let mut out = Vec::new();
        canvas.write_rgba8(&mut out);
        assert!(out.iter().all(|p| *p == [0, 0, 0, 0]));
    }

    #[test]
    fn test_source_over_accumulates() {
        let mut canvas = Canvas::new(4, 4);
        let c = Color::rgba(1.0, 1.0, 1.0, 0.5);
        canvas.fill_circle(Vec2::splat(2.0), 2.0, c);
        canvas.fill_circle(Vec2::splat(2.0), 2.0, c);
        let p = canvas.pixel(1, 1).unwrap();
        assert!((p.w - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_line_covers_its_path() {
        let mut canvas = Canvas::new(20, 5);
        canvas.stroke_line(
            Vec2::new(0.0, 2.5),
            Vec2::new(20.0, 2.5),
            1.0,
            Color::rgba(0.0, 1.0, 0.0, 1.0),
        );
        assert!(canvas.pixel(10, 2).unwrap().w > 0.9);
        assert_eq!(canvas.pixel(10, 0).unwrap().w, 0.0);
    }

    #[test]
    fn test_gradient_fades_outward() {
        let mut canvas = Canvas::new(32, 32);
        let gradient = Gradient::new()
            .with_stop(0.0, Color::hsla(30.0, 0.9, 0.6, 1.0))
            .with_stop(1.0, Color::hsla(30.0, 0.9, 0.5, 0.0));
        canvas.fill_radial_gradient(Vec2::splat(16.0), 12.0, &gradient);

        let inner = canvas.pixel(16, 16).unwrap().w;
        let outer = canvas.pixel(16, 25).unwrap().w;
        assert!(inner > outer);
        assert_eq!(canvas.pixel(0, 0).unwrap().w, 0.0);
    }

    #[test]
    fn test_zero_size_canvas_is_noop() {
        let mut canvas = Canvas::new(0, 0);
        canvas.clear();
        canvas.fill_circle(Vec2::ZERO, 10.0, Color::rgba(1.0, 1.0, 1.0, 1.0));
        canvas.stroke_line(Vec2::ZERO, Vec2::ONE, 1.0, Color::rgba(1.0, 1.0, 1.0, 1.0));
        canvas.fill_radial_gradient(Vec2::ZERO, 5.0, &Gradient::new());
        assert_eq!(canvas.pixel(0, 0), None);
    }

    #[test]
    fn test_offscreen_shapes_are_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(Vec2::new(-50.0, 2000.0), 3.0, Color::rgba(1.0, 1.0, 1.0, 1.0));
        canvas.fill_circle(Vec2::new(5.0, 12.0), 3.0, Color::rgba(1.0, 1.0, 1.0, 1.0));
        assert!(canvas.pixel(5, 9).unwrap().w > 0.0);
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_circle(Vec2::splat(2.0), 2.0, Color::rgba(1.0, 1.0, 1.0, 1.0));
        canvas.resize(6, 3);
        assert_eq!(canvas.size(), (6, 3));
        assert_eq!(canvas.pixel(1, 1).unwrap(), Vec4::ZERO);
        assert_eq!(canvas.to_image().dimensions(), (6, 3));
    }
}
