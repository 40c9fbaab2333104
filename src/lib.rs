#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod image_loader;
pub mod input;
pub mod renderer;
pub mod state;

pub use app::PurikuraApp;
pub use config::EditorConfig;
pub use document::{Document, Mode};
pub use element::{Background, Sticker, StickerId, Stroke};
pub use error::{EditorError, Result};
pub use event::{ChangeBus, SubscriptionId};
pub use geometry::{ContainFit, compute_contain_fit, rect_contains};
pub use image_loader::{DecodedImage, ImageSource, LoadTarget, PendingLoad};
pub use input::{Brush, InputEvent, InteractionController, InteractionState};
pub use renderer::Renderer;
pub use state::{DragSession, EditorContext};
