use std::fmt;
use std::sync::Arc;

use egui::{Pos2, Rect, Vec2, vec2};
use image::RgbaImage;

use super::scale_to;
use crate::geometry::{ContainFit, rect_contains};

/// The background photo and its placement in canvas space.
///
/// `position` is the top-left of the scaled image; `scale` is uniform.
#[derive(Clone)]
pub struct Background {
    image: Arc<RgbaImage>,
    scaled: Arc<RgbaImage>,
    position: Pos2,
    scale: f32,
}

impl fmt::Debug for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Background")
            .field("image_size", &self.image.dimensions())
            .field("position", &self.position)
            .field("scale", &self.scale)
            .finish()
    }
}

impl Background {
    pub(crate) fn new(image: Arc<RgbaImage>, fit: ContainFit) -> Self {
        let natural = vec2(image.width() as f32, image.height() as f32);
        let scaled = Arc::new(scale_to(&image, natural * fit.scale));
        Self {
            image,
            scaled,
            position: fit.origin(),
            scale: fit.scale,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn scaled_image(&self) -> &RgbaImage {
        &self.scaled
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Size of the image after scaling
    pub fn size(&self) -> Vec2 {
        vec2(self.image.width() as f32, self.image.height() as f32) * self.scale
    }

    /// The fitted rectangle in canvas space
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        rect_contains(self.rect(), pos)
    }

    pub(crate) fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }
}
