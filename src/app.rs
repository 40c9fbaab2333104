use std::cell::Cell;
use std::rc::Rc;

use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions, pos2, vec2};
use futures::executor::block_on;

use crate::config::EditorConfig;
use crate::document::Mode;
use crate::error::Result;
use crate::image_loader::{ImageSource, PendingLoad};
use crate::input::{InputEvent, InteractionController, InteractionState};
use crate::state::EditorContext;

const BRUSH_KEY: &str = "purikura_brush";

/// Brush settings restored across restarts. Document content is never saved.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy)]
#[serde(default)]
struct BrushSettings {
    color: [u8; 4],
    width: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            color: config.brush_color,
            width: config.brush_width,
        }
    }
}

/// Native window around one editor: toolbar, canvas and file drops
pub struct PurikuraApp {
    editor: EditorContext,
    controller: InteractionController,
    config: EditorConfig,
    texture: Option<TextureHandle>,
    /// Set by the change bus; the texture is re-uploaded when true
    surface_dirty: Rc<Cell<bool>>,
    brush_color: Color32,
    brush_width: f32,
    last_pointer_pos: Option<Pos2>,
}

impl PurikuraApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Result<Self> {
        let editor = EditorContext::from_config(&config)?;
        let mut controller = InteractionController::from_config(&config);

        let brush = cc
            .storage
            .and_then(|storage| eframe::get_value::<BrushSettings>(storage, BRUSH_KEY))
            .unwrap_or(BrushSettings {
                color: config.brush_color,
                width: config.brush_width,
            });
        let [r, g, b, a] = brush.color;
        let brush_color = Color32::from_rgba_unmultiplied(r, g, b, a);
        if !controller.set_brush(brush_color, brush.width) {
            log::warn!("Stored brush width {} is invalid, keeping default", brush.width);
        }

        let surface_dirty = Rc::new(Cell::new(true));
        {
            let dirty = surface_dirty.clone();
            let ctx = cc.egui_ctx.clone();
            editor.on_change(move || {
                dirty.set(true);
                ctx.request_repaint();
            });
        }

        let current = controller.brush();
        Ok(Self {
            editor,
            controller,
            config,
            texture: None,
            surface_dirty,
            brush_color: current.color,
            brush_width: current.width,
            last_pointer_pos: None,
        })
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mode = self.editor.mode();
            if ui.selectable_label(mode == Mode::Draw, "🖌 Draw").clicked() {
                self.editor.set_mode(Mode::Draw);
            }
            if ui.selectable_label(mode == Mode::Select, "◻ Select").clicked() {
                self.editor.set_mode(Mode::Select);
            }

            ui.separator();

            ui.label("Color:");
            let color_changed = egui::color_picker::color_edit_button_srgba(
                ui,
                &mut self.brush_color,
                egui::color_picker::Alpha::Opaque,
            )
            .changed();
            ui.label("Size:");
            let width_changed = ui
                .add(egui::Slider::new(&mut self.brush_width, 1.0..=50.0))
                .changed();
            if color_changed || width_changed {
                self.controller.set_brush(self.brush_color, self.brush_width);
            }

            ui.separator();

            if ui.button("Clear drawings").clicked() {
                self.editor.clear_strokes_only();
            }
            if ui.button("Clear all").clicked() {
                self.editor.clear_all();
            }
            let has_selection = self.editor.selected_sticker_id().is_some();
            if ui.add_enabled(has_selection, egui::Button::new("Delete sticker")).clicked() {
                self.editor.remove_selected_sticker();
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let size = self.editor.viewport();
        let (response, painter) = ui.allocate_painter(size, Sense::drag());
        let rect = response.rect;
        self.controller.set_surface_rect(rect);

        for event in self.collect_pointer_events(ui, &response) {
            self.controller.handle_event(event, &mut self.editor);
        }

        if ui.input(|i| i.key_pressed(egui::Key::Delete)) {
            self.editor.remove_selected_sticker();
        }

        self.upload_surface(ui.ctx());

        painter.rect_filled(rect, 0.0, Color32::WHITE);
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    fn collect_pointer_events(&mut self, ui: &egui::Ui, response: &egui::Response) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let (pos, pressed, released) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });

        if let Some(position) = pos {
            if pressed && response.hovered() {
                events.push(InputEvent::PointerDown { position });
            } else if Some(position) != self.last_pointer_pos {
                events.push(InputEvent::PointerMove { position });
            }
            if released {
                events.push(InputEvent::PointerUp { position });
            } else if !response.rect.contains(position) && self.controller.state() != InteractionState::Idle {
                events.push(InputEvent::PointerLeave);
            }
        } else if self.last_pointer_pos.is_some() {
            events.push(InputEvent::PointerLeave);
        }

        self.last_pointer_pos = pos;
        events
    }

    fn upload_surface(&mut self, ctx: &egui::Context) {
        if !self.surface_dirty.replace(false) && self.texture.is_some() {
            return;
        }

        let surface = self.editor.surface();
        let image = ColorImage::from_rgba_unmultiplied(
            [surface.width() as usize, surface.height() as usize],
            surface.as_raw(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => self.texture = Some(ctx.load_texture("surface", image, TextureOptions::LINEAR)),
        }
    }

    /// Dropped image files become the background, or a sticker at the drop
    /// point when Shift is held.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (files, as_sticker, pointer) = ctx.input(|i| {
            (
                i.raw.dropped_files.clone(),
                i.modifiers.shift,
                i.pointer.latest_pos(),
            )
        });

        for file in files {
            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", file.name);
                continue;
            }

            let source = if let Some(bytes) = &file.bytes {
                ImageSource::Encoded(bytes.to_vec())
            } else if let Some(path) = &file.path {
                ImageSource::Path(path.clone())
            } else {
                log::warn!("Dropped file has no accessible data: {}", file.name);
                continue;
            };

            let pending = if as_sticker {
                let edge = self.config.sticker_size;
                let center = pointer
                    .map(|p| self.controller.to_surface(p))
                    .unwrap_or_else(|| (self.editor.viewport() / 2.0).to_pos2());
                let corner = center - vec2(edge, edge) / 2.0;
                match self.editor.add_sticker(source, corner.x, corner.y, edge, edge) {
                    Ok(pending) => pending,
                    Err(err) => {
                        log::error!("Cannot place sticker: {}", err);
                        continue;
                    }
                }
            } else {
                self.editor.set_background(source)
            };

            self.finish_load(pending);
        }
    }

    fn finish_load(&mut self, pending: PendingLoad) {
        let result = block_on(pending.decode()).and_then(|decoded| self.editor.complete_load(decoded));
        if let Err(err) = result {
            log::error!("Failed to load image: {}", err);
        }
    }
}

fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else if let Some(ext) = file.path.as_ref().and_then(|p| p.extension()) {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    } else {
        // Let the decoder decide
        file.bytes.is_some()
    }
}

impl eframe::App for PurikuraApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let brush = self.controller.brush();
        let settings = BrushSettings {
            color: brush.color.to_srgba_unmultiplied(),
            width: brush.width,
        };
        eframe::set_value(storage, BRUSH_KEY, &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui);
            });
        });
    }
}
