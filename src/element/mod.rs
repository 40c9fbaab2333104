//! The things a document is made of: ink segments, stickers and the
//! background photo.

mod background;
mod sticker;
mod stroke;

pub use background::Background;
pub use sticker::{Sticker, StickerId};
pub use stroke::Stroke;

use egui::Vec2;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Resamples `image` to the given display size, never below one pixel.
pub(crate) fn scale_to(image: &RgbaImage, size: Vec2) -> RgbaImage {
    let width = (size.x.round() as u32).max(1);
    let height = (size.y.round() as u32).max(1);

    if image.width() == width && image.height() == height {
        return image.clone();
    }

    imageops::resize(image, width, height, FilterType::Triangle)
}
