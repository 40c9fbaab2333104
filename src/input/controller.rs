use egui::{Color32, Pos2, Rect};
use log::{debug, trace};

use super::InputEvent;
use crate::config::EditorConfig;
use crate::document::Mode;
use crate::element::Stroke;
use crate::state::EditorContext;

/// Colour and width applied to new ink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color32,
    pub width: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 5.0,
        }
    }
}

/// The controller's state machine.
///
/// ```text
///            down, Draw                 move: append segment
///   Idle ─────────────────► Drawing ◄──────┐
///    │ ▲                       │  └────────┘
///    │ └───── up / leave ──────┘
///    │
///    │ down, Select, sticker hit          move: move by delta
///    ├────────────────────────► DraggingSticker ◄──┐
///    │                               │  └──────────┘
///    │ down, Select, background hit  │ up / leave ──► Idle
///    └────────────────────────► DraggingBackground
///                                    │ up / leave ──► Idle
/// ```
///
/// The mode is only consulted on the way out of `Idle`; a gesture in
/// progress finishes under the mode it started with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Drawing {
        last_point: Pos2,
        brush: Brush,
    },
    DraggingBackground,
    DraggingSticker,
}

/// Translates pointer events into editor operations
#[derive(Debug)]
pub struct InteractionController {
    state: InteractionState,
    brush: Brush,
    /// Where the surface sits on screen; positions are made relative to it
    surface_rect: Rect,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(Brush::default())
    }
}

impl InteractionController {
    pub fn new(brush: Brush) -> Self {
        Self {
            state: InteractionState::Idle,
            brush,
            surface_rect: Rect::from_min_size(Pos2::ZERO, egui::Vec2::INFINITY),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(Brush {
            color: config.brush_color(),
            width: config.brush_width,
        })
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Changes the brush for the next stroke. Non-positive widths are ignored.
    pub fn set_brush(&mut self, color: Color32, width: f32) -> bool {
        if !(width.is_finite() && width > 0.0) {
            debug!("Ignoring brush width {}", width);
            return false;
        }
        self.brush = Brush { color, width };
        true
    }

    /// Update the surface rectangle (e.g. if the window is resized)
    pub fn set_surface_rect(&mut self, rect: Rect) {
        self.surface_rect = rect;
    }

    pub fn surface_rect(&self) -> Rect {
        self.surface_rect
    }

    /// Converts a screen position to surface coordinates
    pub fn to_surface(&self, screen_pos: Pos2) -> Pos2 {
        (screen_pos - self.surface_rect.min).to_pos2()
    }

    pub fn handle_event(&mut self, event: InputEvent, editor: &mut EditorContext) {
        trace!("{:?} in {:?}", event, self.state);
        match event {
            InputEvent::PointerDown { position } => self.pointer_down(self.to_surface(position), editor),
            InputEvent::PointerMove { position } => self.pointer_move(self.to_surface(position), editor),
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => self.pointer_release(editor),
        }
    }

    fn pointer_down(&mut self, point: Pos2, editor: &mut EditorContext) {
        if self.state != InteractionState::Idle {
            debug!("Pointer down while {:?}, ignoring", self.state);
            return;
        }

        self.state = match editor.mode() {
            Mode::Draw => InteractionState::Drawing {
                last_point: point,
                brush: self.brush,
            },
            Mode::Select => {
                if editor.select_sticker_at(point.x, point.y).is_some() {
                    editor.begin_sticker_drag(point);
                    InteractionState::DraggingSticker
                } else if editor.is_background_hit(point) && editor.begin_background_drag(point) {
                    InteractionState::DraggingBackground
                } else {
                    InteractionState::Idle
                }
            }
        };
    }

    fn pointer_move(&mut self, point: Pos2, editor: &mut EditorContext) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Drawing { last_point, brush } => {
                editor.continue_stroke(Stroke::new(*last_point, point, brush.color, brush.width));
                *last_point = point;
            }
            InteractionState::DraggingBackground => editor.drag_background_to(point),
            InteractionState::DraggingSticker => editor.drag_sticker_to(point),
        }
    }

    fn pointer_release(&mut self, editor: &mut EditorContext) {
        match self.state {
            InteractionState::Idle | InteractionState::Drawing { .. } => {}
            InteractionState::DraggingBackground => editor.end_background_drag(),
            InteractionState::DraggingSticker => editor.end_sticker_drag(),
        }
        self.state = InteractionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { position: pos2(x, y) }
    }

    fn mv(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove { position: pos2(x, y) }
    }

    #[test]
    fn test_positions_are_relative_to_surface() {
        let mut controller = InteractionController::default();
        controller.set_surface_rect(Rect::from_min_size(pos2(20.0, 80.0), vec2(800.0, 600.0)));
        assert_eq!(controller.to_surface(pos2(30.0, 100.0)), pos2(10.0, 20.0));

        let mut editor = EditorContext::new(100, 100).unwrap();
        controller.handle_event(down(20.0, 80.0), &mut editor);
        controller.handle_event(mv(30.0, 80.0), &mut editor);

        let stroke = editor.document().strokes()[0];
        assert_eq!((stroke.p1, stroke.p2), (pos2(0.0, 0.0), pos2(10.0, 0.0)));
    }

    #[test]
    fn test_hover_without_press_draws_nothing() {
        let mut controller = InteractionController::default();
        let mut editor = EditorContext::new(100, 100).unwrap();

        controller.handle_event(mv(5.0, 5.0), &mut editor);
        controller.handle_event(mv(9.0, 9.0), &mut editor);

        assert!(editor.document().strokes().is_empty());
        assert_eq!(controller.state(), InteractionState::Idle);
    }

    #[test]
    fn test_brush_is_captured_at_pointer_down() {
        let mut controller = InteractionController::default();
        let mut editor = EditorContext::new(100, 100).unwrap();
        controller.set_brush(Color32::RED, 3.0);

        controller.handle_event(down(0.0, 0.0), &mut editor);
        controller.set_brush(Color32::BLUE, 9.0);
        controller.handle_event(mv(5.0, 0.0), &mut editor);

        let stroke = editor.document().strokes()[0];
        assert_eq!(stroke.color, Color32::RED);
        assert_eq!(stroke.width, 3.0);
    }

    #[test]
    fn test_invalid_brush_width_is_ignored() {
        let mut controller = InteractionController::default();
        assert!(!controller.set_brush(Color32::RED, 0.0));
        assert!(!controller.set_brush(Color32::RED, f32::NAN));
        assert_eq!(controller.brush(), Brush::default());
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut controller = InteractionController::default();
        let mut editor = EditorContext::new(100, 100).unwrap();

        controller.handle_event(down(0.0, 0.0), &mut editor);
        controller.handle_event(down(50.0, 50.0), &mut editor);
        controller.handle_event(mv(10.0, 0.0), &mut editor);

        let stroke = editor.document().strokes()[0];
        assert_eq!(stroke.p1, pos2(0.0, 0.0));
    }
}
