use thiserror::Error;

/// Errors surfaced by the editor core
#[derive(Error, Debug)]
pub enum EditorError {
    /// A viewport, image or sticker size was zero, negative or not finite
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimension { width: f32, height: f32 },

    /// An image source could not be decoded
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON was malformed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// Checks that both dimensions are finite and strictly positive
pub(crate) fn validate_dimensions(width: f32, height: f32) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EditorError::InvalidDimension { width, height })
    }
}
