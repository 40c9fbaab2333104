use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use egui::{Pos2, Vec2};
use futures::FutureExt;
use futures::future::BoxFuture;
use image::RgbaImage;
use log::debug;

use crate::error::Result;

/// Where an image comes from before it has been decoded
pub enum ImageSource {
    /// Encoded file contents (PNG, JPEG, ...), e.g. an upload or a webcam frame
    Encoded(Vec<u8>),
    /// A file on disk
    Path(PathBuf),
    /// Pixels that are already decoded
    Raster(RgbaImage),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoded(bytes) => f.debug_tuple("Encoded").field(&format!("<{} bytes>", bytes.len())).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Raster(image) => f.debug_tuple("Raster").field(&image.dimensions()).finish(),
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Encoded(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<RgbaImage> for ImageSource {
    fn from(image: RgbaImage) -> Self {
        Self::Raster(image)
    }
}

impl ImageSource {
    /// Decodes the source into RGBA pixels
    pub fn decode(self) -> Result<RgbaImage> {
        let image = match self {
            Self::Encoded(bytes) => image::load_from_memory(&bytes)?.to_rgba8(),
            Self::Path(path) => image::open(&path)?.to_rgba8(),
            Self::Raster(image) => image,
        };
        debug!("Decoded image: {}x{}", image.width(), image.height());
        Ok(image)
    }
}

/// What a finished load will be applied to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadTarget {
    Background,
    Sticker { position: Pos2, size: Vec2 },
}

/// An image load that has been started but not applied.
///
/// Tagged with the document generation at the time it was started; a
/// `clear_all` in between makes the result stale.
#[must_use = "a pending load does nothing until it is decoded and completed"]
#[derive(Debug)]
pub struct PendingLoad {
    generation: u64,
    target: LoadTarget,
    source: ImageSource,
}

impl PendingLoad {
    pub(crate) fn new(generation: u64, target: LoadTarget, source: ImageSource) -> Self {
        Self {
            generation,
            target,
            source,
        }
    }

    pub fn target(&self) -> LoadTarget {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Decodes the image. The result is handed back to
    /// `EditorContext::complete_load` to take effect.
    pub fn decode(self) -> BoxFuture<'static, Result<DecodedImage>> {
        let Self {
            generation,
            target,
            source,
        } = self;

        async move {
            let image = source.decode()?;
            Ok(DecodedImage {
                generation,
                target,
                image: Arc::new(image),
            })
        }
        .boxed()
    }
}

/// A decoded image waiting to be applied to the document
#[derive(Clone)]
pub struct DecodedImage {
    generation: u64,
    target: LoadTarget,
    image: Arc<RgbaImage>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("generation", &self.generation)
            .field("target", &self.target)
            .field("image_size", &self.image.dimensions())
            .finish()
    }
}

impl DecodedImage {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target(&self) -> LoadTarget {
        self.target
    }

    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }
}
