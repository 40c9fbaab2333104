// src/renderer.rs
use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};
use image::imageops;
use image::{Pixel, Rgba, RgbaImage};
use log::trace;

use crate::document::Document;
use crate::element::Stroke;
use crate::error::{EditorError, Result, validate_dimensions};
use crate::geometry::distance_to_line_segment;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Largest surface edge in pixels
pub const MAX_SURFACE_EDGE: u32 = 16384;

/// Rejects surfaces that are empty, wider or taller than
/// [`MAX_SURFACE_EDGE`], or whose RGBA buffer would not fit in memory.
fn validate_surface_size(width: u32, height: u32) -> Result<()> {
    validate_dimensions(width as f32, height as f32)?;

    let bytes = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .and_then(|bytes| usize::try_from(bytes).ok());

    if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE || bytes.is_none() {
        return Err(EditorError::InvalidDimension {
            width: width as f32,
            height: height as f32,
        });
    }
    Ok(())
}

/// Owns the raster surface and paints a [`Document`] onto it.
///
/// Every repaint starts from a cleared surface, so the pixels are always a
/// pure function of the document.
pub struct Renderer {
    surface: RgbaImage,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("surface_size", &self.surface.dimensions())
            .finish()
    }
}

impl Renderer {
    /// Creates a renderer with a transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Result<Self> {
        validate_surface_size(width, height)?;
        Ok(Self {
            surface: RgbaImage::new(width, height),
        })
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.surface.width() as f32, self.surface.height() as f32)
    }

    /// Replaces the surface with a blank one of the new size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        validate_surface_size(width, height)?;
        self.surface = RgbaImage::new(width, height);
        Ok(())
    }

    /// Clears the surface and paints background, strokes, then stickers
    pub fn repaint(&mut self, document: &Document) {
        for pixel in self.surface.pixels_mut() {
            *pixel = TRANSPARENT;
        }

        if let Some(background) = document.background() {
            blit(&mut self.surface, background.scaled_image(), background.position());
        }

        for stroke in document.strokes() {
            draw_segment(&mut self.surface, stroke);
        }

        for sticker in document.stickers() {
            blit_scaled(&mut self.surface, sticker.image(), sticker.rect());
        }

        trace!(
            "Repainted {} strokes, {} stickers",
            document.strokes().len(),
            document.stickers().len()
        );
    }
}

fn blit(surface: &mut RgbaImage, image: &RgbaImage, position: Pos2) {
    imageops::overlay(
        surface,
        image,
        position.x.round() as i64,
        position.y.round() as i64,
    );
}

/// Stretches `image` over `rect` with nearest-neighbour sampling.
///
/// Only surface pixels whose centers fall inside `rect` are visited, so the
/// cost is bounded by the surface no matter how large `rect` is.
fn blit_scaled(surface: &mut RgbaImage, image: &RgbaImage, rect: Rect) {
    let (image_width, image_height) = image.dimensions();
    if image_width == 0 || image_height == 0 || !(rect.width() > 0.0 && rect.height() > 0.0) {
        return;
    }

    let x0 = rect.min.x.max(0.0).floor() as u32;
    let y0 = rect.min.y.max(0.0).floor() as u32;
    let x1 = rect.max.x.min(surface.width() as f32).ceil() as u32;
    let y1 = rect.max.y.min(surface.height() as f32).ceil() as u32;

    for y in y0..y1 {
        let center_y = y as f32 + 0.5;
        if center_y < rect.min.y || center_y >= rect.max.y {
            continue;
        }
        let sy = ((center_y - rect.min.y) / rect.height() * image_height as f32) as u32;
        let sy = sy.min(image_height - 1);

        for x in x0..x1 {
            let center_x = x as f32 + 0.5;
            if center_x < rect.min.x || center_x >= rect.max.x {
                continue;
            }
            let sx = ((center_x - rect.min.x) / rect.width() * image_width as f32) as u32;
            let sx = sx.min(image_width - 1);

            surface.get_pixel_mut(x, y).blend(image.get_pixel(sx, sy));
        }
    }
}

/// Rasterizes one segment with round caps, anti-aliased by distance from
/// each pixel center to the segment.
fn draw_segment(surface: &mut RgbaImage, stroke: &Stroke) {
    let radius = stroke.width / 2.0;
    let bounds = stroke.bounds();

    let (width, height) = (surface.width() as i64, surface.height() as i64);
    let x0 = ((bounds.min.x - 1.0).floor() as i64).max(0);
    let y0 = ((bounds.min.y - 1.0).floor() as i64).max(0);
    let x1 = ((bounds.max.x + 1.0).ceil() as i64).min(width - 1);
    let y1 = ((bounds.max.y + 1.0).ceil() as i64).min(height - 1);

    if x0 > x1 || y0 > y1 {
        return;
    }

    let color = stroke.color.to_srgba_unmultiplied();

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
            let distance = distance_to_line_segment(center, stroke.p1, stroke.p2);
            let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_pixel(surface.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        }
    }
}

/// Source-over compositing of a straight-alpha colour onto a pixel
fn blend_pixel(dst: &mut Rgba<u8>, color: [u8; 4], coverage: f32) {
    let src_a = color[3] as f32 / 255.0 * coverage;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a <= 0.0 {
        *dst = TRANSPARENT;
        return;
    }

    for channel in 0..3 {
        let src = color[channel] as f32;
        let existing = dst[channel] as f32;
        let value = (src * src_a + existing * dst_a * (1.0 - src_a)) / out_a;
        dst[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Converts an egui colour to the pixel type used on the surface
pub fn to_pixel(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}
