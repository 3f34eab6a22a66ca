use std::path::Path;

use ab_glyph::{Font, OutlinedGlyph};
use anyhow::{anyhow, Result as AnyResult};
use glam::{Affine2, Vec2 as GlamVec2};
use image::{GrayImage, Luma, Rgba, RgbaImage};

use super::{fonts::layout_line, FontBook, Surface, TextStyle};
use crate::{
    color::Color,
    error::{Error, Result},
    text::Align,
};

/// Software surface painting into an RGBA buffer.
///
/// A pixel is covered when its centre, mapped back through the current
/// transform, lies inside the shape. Blending is source-over.
pub struct RasterSurface {
    image: RgbaImage,
    transform: Affine2,
    stack: Vec<Affine2>,
    fonts: FontBook,
}

impl RasterSurface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            transform: Affine2::IDENTITY,
            stack: Vec::new(),
            fonts: FontBook::new(),
        }
    }

    #[must_use]
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Current device transform.
    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color of the pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Some(Color::rgba(r, g, b, a))
    }

    /// Write the surface to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> AnyResult<()> {
        self.image
            .save_with_format(path.as_ref(), image::ImageFormat::Png)
            .map_err(|e| anyhow!("Failed to write {:?}: {}", path.as_ref(), e))
    }

    /// Fill every pixel whose centre maps into `inside`.
    ///
    /// `min`/`max` bound the shape in local (pre-transform) coordinates.
    fn fill_region(
        &mut self,
        min: GlamVec2,
        max: GlamVec2,
        mut shade: impl FnMut(GlamVec2) -> Option<Rgba<u8>>,
    ) {
        let Some((x0, y0, x1, y1)) = self.device_bounds(min, max) else {
            return;
        };
        let inverse = self.transform.inverse();

        for py in y0..y1 {
            for px in x0..x1 {
                let centre = GlamVec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let local = inverse.transform_point2(centre);
                if let Some(src) = shade(local) {
                    blend(self.image.get_pixel_mut(px, py), src);
                }
            }
        }
    }

    /// Pixel range covered by the transformed local box, clamped to the surface.
    fn device_bounds(&self, min: GlamVec2, max: GlamVec2) -> Option<(u32, u32, u32, u32)> {
        if !(min.x < max.x && min.y < max.y) {
            return None;
        }
        let corners = [
            GlamVec2::new(min.x, min.y),
            GlamVec2::new(max.x, min.y),
            GlamVec2::new(min.x, max.y),
            GlamVec2::new(max.x, max.y),
        ]
        .map(|c| self.transform.transform_point2(c));

        let lo = corners.iter().fold(GlamVec2::splat(f32::INFINITY), |a, c| a.min(*c));
        let hi = corners.iter().fold(GlamVec2::splat(f32::NEG_INFINITY), |a, c| a.max(*c));
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }

        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        let x0 = lo.x.floor().clamp(0.0, w) as u32;
        let y0 = lo.y.floor().clamp(0.0, h) as u32;
        let x1 = hi.x.ceil().clamp(0.0, w) as u32;
        let y1 = hi.y.ceil().clamp(0.0, h) as u32;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

/// Rasterise a glyph outline into a coverage mask the size of its pixel bounds.
fn coverage_mask(outlined: &OutlinedGlyph) -> GrayImage {
    let bounds = outlined.px_bounds();
    let mut mask = GrayImage::new(bounds.width().ceil() as u32, bounds.height().ceil() as u32);
    outlined.draw(|gx, gy, coverage| {
        if gx < mask.width() && gy < mask.height() {
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            mask.put_pixel(gx, gy, Luma([value]));
        }
    });
    mask
}

/// Source-over compositing with straight alpha.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    if sa >= 1.0 {
        *dst = src;
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
        self.transform = Affine2::IDENTITY;
        self.stack.clear();
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform * Affine2::from_translation(GlamVec2::new(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.transform = self.transform * Affine2::from_angle(radians);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        // negative sizes extend left/up
        let a = GlamVec2::new(x, y);
        let b = GlamVec2::new(x + w, y + h);
        let (min, max) = (a.min(b), a.max(b));
        let src = color.to_rgba8();
        self.fill_region(min, max, |p| {
            (p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y).then_some(src)
        });
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Color) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let center = GlamVec2::new(cx, cy);
        let radii = GlamVec2::new(rx, ry);
        let src = color.to_rgba8();
        self.fill_region(center - radii, center + radii, |p| {
            let d = (p - center) / radii;
            (d.length_squared() <= 1.0).then_some(src)
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || w == 0.0 || h == 0.0 {
            return;
        }
        let a = GlamVec2::new(x, y);
        let b = GlamVec2::new(x + w, y + h);
        let (min, max) = (a.min(b), a.max(b));
        self.fill_region(min, max, |p| {
            if p.x < min.x || p.x >= max.x || p.y < min.y || p.y >= max.y {
                return None;
            }
            // signed w/h mirror the source
            let u = ((p.x - x) / w * iw as f32).floor() as i64;
            let v = ((p.y - y) / h * ih as f32).floor() as i64;
            let u = u.clamp(0, iw as i64 - 1) as u32;
            let v = v.clamp(0, ih as i64 - 1) as u32;
            Some(*image.get_pixel(u, v))
        });
    }

    fn fill_text(&mut self, style: &TextStyle, text: &str, x: f32, y: f32) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let font = self
            .fonts
            .resolve(&style.family)
            .cloned()
            .ok_or_else(|| Error::Render(format!("no font available for {:?}", style.family)))?;

        let (glyphs, width) = layout_line(&font, style.size, text);
        let offset = match style.align {
            Align::Left | Align::Start => 0.0,
            Align::Center => -width / 2.0,
            Align::Right | Align::End => -width,
        };

        for mut glyph in glyphs {
            glyph.position.x += x + offset;
            glyph.position.y += y;
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let mask = coverage_mask(&outlined);
            let min = GlamVec2::new(bounds.min.x, bounds.min.y);
            let max = min + GlamVec2::new(mask.width() as f32, mask.height() as f32);
            let color = style.color;

            // sample the mask at each pixel centre mapped back into glyph space
            self.fill_region(min, max, |p| {
                let u = (p.x - min.x).floor();
                let v = (p.y - min.y).floor();
                if u < 0.0 || v < 0.0 || u >= mask.width() as f32 || v >= mask.height() as f32 {
                    return None;
                }
                let Luma([coverage]) = *mask.get_pixel(u as u32, v as u32);
                let alpha = (color.a as u32 * coverage as u32 + 127) / 255;
                (alpha > 0).then_some(Rgba([color.r, color.g, color.b, alpha as u8]))
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("size", &self.image.dimensions())
            .field("depth", &self.stack.len())
            .field("fonts", &self.fonts)
            .finish()
    }
}
