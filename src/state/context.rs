//! The editor context ties the document, the compositor and the change bus
//! together.
//!
//! Every mutating call follows the same sequence: update the [`Document`],
//! repaint the surface, then notify subscribers. Calls whose precondition
//! does not hold (wrong mode, nothing selected, no background) are skipped
//! silently and neither repaint nor notify.
//!
//! Image-accepting calls are two-phase: [`EditorContext::set_background`]
//! and [`EditorContext::add_sticker`] return a [`PendingLoad`]; the caller
//! decodes it and hands the result to [`EditorContext::complete_load`].
//!
//! ```rust,no_run
//! use futures::executor::block_on;
//! use purikura::{EditorContext, ImageSource};
//!
//! let mut editor = EditorContext::new(800, 600)?;
//! let pending = editor.set_background(ImageSource::Path("photo.jpg".into()));
//! let decoded = block_on(pending.decode())?;
//! editor.complete_load(decoded)?;
//! # Ok::<(), purikura::EditorError>(())
//! ```
use egui::{Color32, Pos2, Vec2, pos2, vec2};
use image::RgbaImage;
use log::{debug, info, warn};

use super::DragSession;
use crate::config::EditorConfig;
use crate::document::{Document, Mode};
use crate::element::{Background, Sticker, StickerId, Stroke};
use crate::error::{Result, validate_dimensions};
use crate::event::{ChangeBus, SubscriptionId};
use crate::geometry::compute_contain_fit;
use crate::image_loader::{DecodedImage, ImageSource, LoadTarget, PendingLoad};
use crate::renderer::Renderer;

#[derive(Debug)]
pub struct EditorContext {
    document: Document,
    renderer: Renderer,
    change_bus: ChangeBus,
    drag: DragSession,
    /// Bumped by `clear_all`; loads started under an older value are dropped
    generation: u64,
}

impl EditorContext {
    /// Binds a new, empty document to a surface of the given pixel size
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut context = Self {
            document: Document::new(),
            renderer: Renderer::new(width, height)?,
            change_bus: ChangeBus::new(),
            drag: DragSession::None,
            generation: 0,
        };
        context.renderer.repaint(&context.document);
        Ok(context)
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.viewport_width, config.viewport_height)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The painted surface, consistent with the document after every change
    pub fn surface(&self) -> &RgbaImage {
        self.renderer.surface()
    }

    pub fn mode(&self) -> Mode {
        self.document.mode()
    }

    pub fn viewport(&self) -> Vec2 {
        self.renderer.size()
    }

    pub fn drag_session(&self) -> DragSession {
        self.drag
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn on_change(&self, listener: impl FnMut() + 'static) -> SubscriptionId {
        self.change_bus.on_change(listener)
    }

    pub fn off_change(&self, id: SubscriptionId) -> bool {
        self.change_bus.off_change(id)
    }

    fn commit(&mut self) {
        self.renderer.repaint(&self.document);
        self.change_bus.emit();
    }

    /// Swaps in a surface of the new size. The background keeps its old
    /// placement; callers re-issue `set_background` to refit it.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.renderer.resize(width, height)?;
        info!("Viewport resized to {}x{}", width, height);
        self.commit();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.document.set_mode(mode);
        debug!("Mode set to {:?}", mode);
        self.commit();
    }

    /// Appends one ink segment. Skipped outside draw mode or for a
    /// non-positive width.
    pub fn append_stroke(&mut self, p1: Pos2, p2: Pos2, color: Color32, width: f32) -> bool {
        if !(width.is_finite() && width > 0.0) {
            debug!("Ignoring stroke segment with width {}", width);
            return false;
        }
        if self.document.append_stroke(Stroke::new(p1, p2, color, width)) {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Appends a segment of a path begun in draw mode, even if the mode has
    /// changed since.
    pub(crate) fn continue_stroke(&mut self, stroke: Stroke) {
        self.document.push_stroke(stroke);
        self.commit();
    }

    /// Starts replacing the background. Nothing changes until the returned
    /// load is decoded and completed.
    pub fn set_background(&mut self, source: impl Into<ImageSource>) -> PendingLoad {
        PendingLoad::new(self.generation, LoadTarget::Background, source.into())
    }

    /// Starts adding a sticker at `(x, y)` with the given display size.
    pub fn add_sticker(
        &mut self,
        source: impl Into<ImageSource>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<PendingLoad> {
        validate_dimensions(width, height)?;
        let target = LoadTarget::Sticker {
            position: pos2(x, y),
            size: vec2(width, height),
        };
        Ok(PendingLoad::new(self.generation, target, source.into()))
    }

    /// Applies a finished load.
    ///
    /// Returns `Ok(false)` when the load was started before the last
    /// `clear_all` and has been discarded. Fails with `InvalidDimension`
    /// for an empty background image.
    pub fn complete_load(&mut self, decoded: DecodedImage) -> Result<bool> {
        if decoded.generation() != self.generation {
            warn!(
                "Discarding stale image load (generation {} < {})",
                decoded.generation(),
                self.generation
            );
            return Ok(false);
        }

        match decoded.target() {
            LoadTarget::Background => {
                let image = decoded.image().clone();
                let viewport = self.viewport();
                let fit = compute_contain_fit(
                    viewport.x,
                    viewport.y,
                    image.width() as f32,
                    image.height() as f32,
                )?;
                info!(
                    "🖼️ Background set: {}x{} at scale {:.3}",
                    image.width(),
                    image.height(),
                    fit.scale
                );
                self.document.set_background(Background::new(image, fit));
            }
            LoadTarget::Sticker { position, size } => {
                let sticker = Sticker::new(decoded.image().clone(), position, size);
                let id = self.document.add_sticker(sticker);
                info!("Sticker {} added at {:?}", id, position);
            }
        }

        self.commit();
        Ok(true)
    }

    /// Empties the whole document and invalidates any load still in flight
    pub fn clear_all(&mut self) {
        self.document.clear_all();
        self.drag = DragSession::None;
        self.generation += 1;
        info!("Document cleared");
        self.commit();
    }

    /// Removes the ink, keeping background, stickers and selection
    pub fn clear_strokes_only(&mut self) {
        self.document.clear_strokes();
        self.commit();
    }

    /// Selects the topmost sticker under the point, or clears the selection
    /// when there is none. The only way selection changes.
    pub fn select_sticker_at(&mut self, x: f32, y: f32) -> Option<&Sticker> {
        let hit = self.document.select_sticker_at(pos2(x, y));
        self.commit();
        hit.and_then(|id| self.document.sticker(id))
    }

    pub fn move_selected_sticker(&mut self, dx: f32, dy: f32) {
        if self.document.move_selected_sticker(vec2(dx, dy)) {
            self.commit();
        }
    }

    /// Deletes the selected sticker, if any
    pub fn remove_selected_sticker(&mut self) -> bool {
        match self.document.remove_selected_sticker() {
            Some(sticker) => {
                info!("Sticker {} removed", sticker.id());
                if matches!(self.drag, DragSession::DraggingSticker { id, .. } if id == sticker.id()) {
                    self.drag = DragSession::None;
                }
                self.commit();
                true
            }
            None => false,
        }
    }

    pub fn is_background_hit(&self, point: Pos2) -> bool {
        self.document.is_background_hit(point)
    }

    /// Grabs the background at `point`. Skipped without a background.
    pub fn begin_background_drag(&mut self, point: Pos2) -> bool {
        let Some(background) = self.document.background() else {
            debug!("No background to drag");
            return false;
        };
        self.drag = DragSession::DraggingBackground {
            offset: point - background.position(),
        };
        true
    }

    /// Moves the background so the grabbed spot stays under the pointer
    pub fn drag_background_to(&mut self, point: Pos2) {
        let DragSession::DraggingBackground { offset } = self.drag else {
            return;
        };
        if self.document.set_background_position(point - offset) {
            self.commit();
        }
    }

    pub fn end_background_drag(&mut self) {
        if matches!(self.drag, DragSession::DraggingBackground { .. }) {
            self.drag = DragSession::None;
        }
    }

    /// Starts dragging the selected sticker from `point`
    pub fn begin_sticker_drag(&mut self, point: Pos2) -> bool {
        let Some(id) = self.document.selected_sticker_id() else {
            debug!("No sticker selected to drag");
            return false;
        };
        self.drag = DragSession::DraggingSticker {
            id,
            last_pointer: point,
        };
        true
    }

    /// Moves the dragged sticker by the pointer delta since the last call
    pub fn drag_sticker_to(&mut self, point: Pos2) {
        let DragSession::DraggingSticker { id, last_pointer } = self.drag else {
            return;
        };
        if self.document.selected_sticker_id() != Some(id) {
            return;
        }
        let delta = point - last_pointer;
        self.drag = DragSession::DraggingSticker {
            id,
            last_pointer: point,
        };
        self.move_selected_sticker(delta.x, delta.y);
    }

    pub fn end_sticker_drag(&mut self) {
        if matches!(self.drag, DragSession::DraggingSticker { .. }) {
            self.drag = DragSession::None;
        }
    }

    pub fn selected_sticker_id(&self) -> Option<StickerId> {
        self.document.selected_sticker_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    fn load(editor: &mut EditorContext, pending: PendingLoad) -> bool {
        let decoded = block_on(pending.decode()).unwrap();
        editor.complete_load(decoded).unwrap()
    }

    fn counter(editor: &EditorContext) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        editor.on_change(move || handle.set(handle.get() + 1));
        count
    }

    #[test]
    fn test_initiating_a_load_changes_nothing() {
        let mut editor = EditorContext::new(100, 100).unwrap();
        let count = counter(&editor);

        let _pending = editor.set_background(RgbaImage::new(10, 10));
        assert!(editor.document().background().is_none());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_skipped_operations_do_not_notify() {
        let mut editor = EditorContext::new(100, 100).unwrap();
        let count = counter(&editor);

        editor.move_selected_sticker(5.0, 5.0);
        editor.drag_background_to(pos2(1.0, 1.0));
        assert!(!editor.begin_background_drag(pos2(1.0, 1.0)));
        assert!(!editor.append_stroke(pos2(0.0, 0.0), pos2(1.0, 1.0), Color32::BLACK, 0.0));

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_background_drag_keeps_grab_offset() {
        let mut editor = EditorContext::new(800, 600).unwrap();
        let pending = editor.set_background(RgbaImage::new(400, 400));
        assert!(load(&mut editor, pending));
        assert_eq!(editor.document().background().unwrap().position(), pos2(100.0, 0.0));

        assert!(editor.begin_background_drag(pos2(150.0, 40.0)));
        editor.drag_background_to(pos2(170.0, 30.0));
        assert_eq!(editor.document().background().unwrap().position(), pos2(120.0, -10.0));

        editor.end_background_drag();
        editor.drag_background_to(pos2(500.0, 500.0));
        assert_eq!(editor.document().background().unwrap().position(), pos2(120.0, -10.0));
    }

    #[test]
    fn test_empty_background_image_is_rejected() {
        let mut editor = EditorContext::new(100, 100).unwrap();
        let pending = editor.set_background(RgbaImage::new(0, 0));
        let decoded = block_on(pending.decode()).unwrap();
        assert!(editor.complete_load(decoded).is_err());
        assert!(editor.document().background().is_none());
    }

    #[test]
    fn test_invalid_sticker_size_is_rejected() {
        let mut editor = EditorContext::new(100, 100).unwrap();
        assert!(editor.add_sticker(RgbaImage::new(4, 4), 0.0, 0.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_resize_viewport() {
        let mut editor = EditorContext::new(100, 100).unwrap();
        editor.resize_viewport(320, 240).unwrap();
        assert_eq!(editor.surface().dimensions(), (320, 240));
        assert_eq!(editor.viewport(), vec2(320.0, 240.0));
        assert!(editor.resize_viewport(0, 240).is_err());
    }

    #[test]
    fn test_oversized_viewport_is_rejected() {
        assert!(matches!(
            EditorContext::new(u32::MAX, u32::MAX),
            Err(EditorError::InvalidDimension { .. })
        ));

        let mut editor = EditorContext::new(100, 100).unwrap();
        let count = counter(&editor);
        assert!(matches!(
            editor.resize_viewport(u32::MAX, 1),
            Err(EditorError::InvalidDimension { .. })
        ));
        assert_eq!(editor.surface().dimensions(), (100, 100));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_clear_all_bumps_generation_and_ends_drag() {
        let mut editor = EditorContext::new(800, 600).unwrap();
        let pending = editor.set_background(RgbaImage::new(400, 400));
        load(&mut editor, pending);
        editor.begin_background_drag(pos2(200.0, 200.0));

        editor.clear_all();

        assert_eq!(editor.generation(), 1);
        assert_eq!(editor.drag_session(), DragSession::None);
    }
}
