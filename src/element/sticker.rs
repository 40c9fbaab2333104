use std::fmt;
use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use uuid::Uuid;

use crate::geometry::rect_contains;

/// Identifier assigned once when a sticker joins a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StickerId(Uuid);

impl StickerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StickerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positioned bitmap overlay.
///
/// The bitmap keeps its natural size; it is stretched to `size` only while
/// compositing. Only the position and the `selected` flag change after
/// creation.
#[derive(Clone)]
pub struct Sticker {
    id: StickerId,
    image: Arc<RgbaImage>,
    position: Pos2,
    size: Vec2,
    selected: bool,
}

// Pixel data is left out of Debug output
impl fmt::Debug for Sticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sticker")
            .field("id", &self.id)
            .field("image_size", &self.image.dimensions())
            .field("position", &self.position)
            .field("size", &self.size)
            .field("selected", &self.selected)
            .finish()
    }
}

impl Sticker {
    pub(crate) fn new(image: Arc<RgbaImage>, position: Pos2, size: Vec2) -> Self {
        Self {
            id: StickerId::new(),
            image,
            position,
            size,
            selected: false,
        }
    }

    pub fn id(&self) -> StickerId {
        self.id
    }

    /// The bitmap as supplied, at its natural size
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        rect_contains(self.rect(), pos)
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
