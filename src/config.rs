use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{Result, validate_dimensions};

/// Startup settings for the editor.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Straight-alpha RGBA
    pub brush_color: [u8; 4],
    pub brush_width: f32,
    /// Edge length used when placing a sticker
    pub sticker_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            viewport_height: 600,
            brush_color: [0, 0, 0, 255],
            brush_width: 5.0,
            sticker_size: 96.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.viewport_width as f32, self.viewport_height as f32)?;
        validate_dimensions(self.brush_width, self.sticker_size)
    }

    pub fn brush_color(&self) -> Color32 {
        let [r, g, b, a] = self.brush_color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}
