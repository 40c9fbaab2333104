mod drag;
pub mod context;

pub use context::EditorContext;
pub use drag::DragSession;
