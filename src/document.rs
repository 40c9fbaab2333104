use egui::{Pos2, Vec2};
use log::debug;

use crate::element::{Background, Sticker, StickerId, Stroke};

/// Which kind of pointer interaction the editor performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Draw,
    Select,
}

/// The editable state: background photo, ink, stickers, selection and mode.
///
/// Stickers are kept in paint order (bottom to top); hit testing walks
/// them in reverse. At most one sticker is selected, and its id is the
/// one stored in `selected`.
#[derive(Debug, Default)]
pub struct Document {
    background: Option<Background>,
    strokes: Vec<Stroke>,
    stickers: Vec<Sticker>,
    selected: Option<StickerId>,
    mode: Mode,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn sticker(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id() == id)
    }

    pub fn selected_sticker_id(&self) -> Option<StickerId> {
        self.selected
    }

    pub fn selected_sticker(&self) -> Option<&Sticker> {
        self.selected.and_then(|id| self.sticker(id))
    }

    /// Appends a segment if the document is in draw mode.
    ///
    /// Returns false (and leaves the strokes untouched) in select mode.
    pub fn append_stroke(&mut self, stroke: Stroke) -> bool {
        if self.mode != Mode::Draw {
            debug!("Ignoring stroke segment while in {:?} mode", self.mode);
            return false;
        }
        self.push_stroke(stroke);
        true
    }

    /// Appends a segment regardless of mode, for a path that was started
    /// while drawing was allowed.
    pub(crate) fn push_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Replaces the background wholesale
    pub fn set_background(&mut self, background: Background) {
        self.background = Some(background);
    }

    /// Moves the background's top-left corner. No-op without a background.
    pub fn set_background_position(&mut self, position: Pos2) -> bool {
        match &mut self.background {
            Some(background) => {
                background.set_position(position);
                true
            }
            None => false,
        }
    }

    pub fn is_background_hit(&self, pos: Pos2) -> bool {
        self.background.as_ref().is_some_and(|bg| bg.hit_test(pos))
    }

    /// Appends a sticker on top of the paint order
    pub fn add_sticker(&mut self, mut sticker: Sticker) -> StickerId {
        sticker.set_selected(false);
        let id = sticker.id();
        self.stickers.push(sticker);
        id
    }

    /// Selects the topmost sticker containing `pos`, or clears the
    /// selection when nothing is hit.
    pub fn select_sticker_at(&mut self, pos: Pos2) -> Option<StickerId> {
        let hit = self
            .stickers
            .iter()
            .rev()
            .find(|sticker| sticker.hit_test(pos))
            .map(Sticker::id);

        for sticker in &mut self.stickers {
            sticker.set_selected(Some(sticker.id()) == hit);
        }
        self.selected = hit;
        hit
    }

    /// Offsets the selected sticker. Positions are not clamped to the canvas.
    pub fn move_selected_sticker(&mut self, delta: Vec2) -> bool {
        let Some(id) = self.selected else {
            debug!("No sticker selected, ignoring move");
            return false;
        };

        match self.stickers.iter_mut().find(|s| s.id() == id) {
            Some(sticker) => {
                sticker.translate(delta);
                true
            }
            None => false,
        }
    }

    /// Removes the selected sticker and clears the selection
    pub fn remove_selected_sticker(&mut self) -> Option<Sticker> {
        let id = self.selected.take()?;
        let index = self.stickers.iter().position(|s| s.id() == id)?;
        Some(self.stickers.remove(index))
    }

    /// Empties strokes, stickers, selection and background in one step
    pub fn clear_all(&mut self) {
        self.background = None;
        self.strokes.clear();
        self.stickers.clear();
        self.selected = None;
    }

    /// Empties the strokes only
    pub fn clear_strokes(&mut self) {
        self.strokes.clear();
    }
}
