use futures::executor::block_on;
use image::RgbaImage;
use purikura::{EditorContext, ImageSource, InputEvent, InteractionController, Mode, compute_contain_fit};
use egui::{Color32, pos2};

fn load(editor: &mut EditorContext, pending: purikura::PendingLoad) {
    let decoded = block_on(pending.decode()).unwrap();
    assert!(editor.complete_load(decoded).unwrap());
}

#[test]
fn test_fit_landscape_viewport_square_image() {
    let fit = compute_contain_fit(800.0, 600.0, 400.0, 400.0).unwrap();
    assert_eq!(fit.scale, 1.5);
    assert_eq!((fit.x, fit.y), (100.0, 0.0));

    let mut editor = EditorContext::new(800, 600).unwrap();
    let pending = editor.set_background(ImageSource::Raster(RgbaImage::new(400, 400)));
    load(&mut editor, pending);

    let background = editor.document().background().unwrap();
    assert_eq!(background.position(), pos2(100.0, 0.0));
    assert_eq!(background.scale(), 1.5);
}

#[test]
fn test_select_and_drag_sticker() {
    let mut editor = EditorContext::new(800, 600).unwrap();
    let pending = editor.add_sticker(RgbaImage::new(32, 32), 100.0, 100.0, 64.0, 64.0).unwrap();
    load(&mut editor, pending);
    editor.set_mode(Mode::Select);

    let mut controller = InteractionController::default();
    controller.handle_event(InputEvent::PointerDown { position: pos2(120.0, 120.0) }, &mut editor);

    let sticker = editor.document().selected_sticker().unwrap();
    assert!(sticker.is_selected());

    controller.handle_event(InputEvent::PointerMove { position: pos2(130.0, 115.0) }, &mut editor);
    controller.handle_event(InputEvent::PointerUp { position: pos2(130.0, 115.0) }, &mut editor);

    let sticker = &editor.document().stickers()[0];
    assert_eq!((sticker.x(), sticker.y()), (110.0, 95.0));
    assert_eq!((sticker.width(), sticker.height()), (64.0, 64.0));
}

#[test]
fn test_select_sticker_at_returns_the_sticker() {
    let mut editor = EditorContext::new(800, 600).unwrap();
    let pending = editor.add_sticker(RgbaImage::new(32, 32), 100.0, 100.0, 64.0, 64.0).unwrap();
    load(&mut editor, pending);

    let id = editor.document().stickers()[0].id();
    let sticker = editor.select_sticker_at(120.0, 120.0).unwrap();
    assert_eq!(sticker.id(), id);
    assert!(sticker.is_selected());

    editor.move_selected_sticker(10.0, -5.0);
    let sticker = &editor.document().stickers()[0];
    assert_eq!(sticker.position(), pos2(110.0, 95.0));
}

#[test]
fn test_freehand_path_is_a_chain_of_segments() {
    let mut editor = EditorContext::new(100, 100).unwrap();
    let mut controller = InteractionController::default();

    controller.handle_event(InputEvent::PointerDown { position: pos2(0.0, 0.0) }, &mut editor);
    controller.handle_event(InputEvent::PointerMove { position: pos2(10.0, 0.0) }, &mut editor);
    controller.handle_event(InputEvent::PointerMove { position: pos2(10.0, 10.0) }, &mut editor);
    controller.handle_event(InputEvent::PointerUp { position: pos2(10.0, 10.0) }, &mut editor);

    let strokes = editor.document().strokes();
    assert_eq!(strokes.len(), 2);
    assert_eq!((strokes[0].p1, strokes[0].p2), (pos2(0.0, 0.0), pos2(10.0, 0.0)));
    assert_eq!((strokes[1].p1, strokes[1].p2), (pos2(10.0, 0.0), pos2(10.0, 10.0)));
}

#[test]
fn test_topmost_overlapping_sticker_wins() {
    let mut editor = EditorContext::new(200, 200).unwrap();
    let a = editor.add_sticker(RgbaImage::new(8, 8), 0.0, 0.0, 100.0, 100.0).unwrap();
    load(&mut editor, a);
    let b = editor.add_sticker(RgbaImage::new(8, 8), 25.0, 25.0, 100.0, 100.0).unwrap();
    load(&mut editor, b);

    let bottom = editor.document().stickers()[0].id();
    let top = editor.document().stickers()[1].id();

    let hit = editor.select_sticker_at(50.0, 50.0).unwrap().id();
    assert_eq!(hit, top);

    let selected: Vec<_> = editor.document().stickers().iter().filter(|s| s.is_selected()).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id(), top);

    // Only the bottom sticker covers (10, 10)
    assert_eq!(editor.select_sticker_at(10.0, 10.0).unwrap().id(), bottom);
}

#[test]
fn test_append_stroke_ignored_in_select_mode() {
    let mut editor = EditorContext::new(100, 100).unwrap();
    assert!(editor.append_stroke(pos2(0.0, 0.0), pos2(5.0, 5.0), Color32::BLACK, 2.0));

    editor.set_mode(Mode::Select);
    for _ in 0..5 {
        assert!(!editor.append_stroke(pos2(0.0, 0.0), pos2(5.0, 5.0), Color32::BLACK, 2.0));
    }
    assert_eq!(editor.document().strokes().len(), 1);
}

#[test]
fn test_clear_strokes_only_keeps_everything_else() {
    let mut editor = EditorContext::new(200, 200).unwrap();
    let pending = editor.set_background(RgbaImage::new(100, 50));
    load(&mut editor, pending);
    let pending = editor.add_sticker(RgbaImage::new(8, 8), 10.0, 10.0, 20.0, 20.0).unwrap();
    load(&mut editor, pending);
    editor.select_sticker_at(15.0, 15.0);
    editor.append_stroke(pos2(0.0, 0.0), pos2(50.0, 50.0), Color32::RED, 4.0);

    let background_before = editor.document().background().map(|b| (b.position(), b.scale()));
    let stickers_before: Vec<_> = editor
        .document()
        .stickers()
        .iter()
        .map(|s| (s.id(), s.rect(), s.is_selected()))
        .collect();
    let selected_before = editor.selected_sticker_id();

    editor.clear_strokes_only();

    assert!(editor.document().strokes().is_empty());
    assert_eq!(editor.document().background().map(|b| (b.position(), b.scale())), background_before);
    let stickers_after: Vec<_> = editor
        .document()
        .stickers()
        .iter()
        .map(|s| (s.id(), s.rect(), s.is_selected()))
        .collect();
    assert_eq!(stickers_after, stickers_before);
    assert_eq!(editor.selected_sticker_id(), selected_before);
}

#[test]
fn test_clear_all_empties_everything() {
    let mut editor = EditorContext::new(200, 200).unwrap();
    let pending = editor.set_background(RgbaImage::new(100, 50));
    load(&mut editor, pending);
    let pending = editor.add_sticker(RgbaImage::new(8, 8), 10.0, 10.0, 20.0, 20.0).unwrap();
    load(&mut editor, pending);
    editor.select_sticker_at(15.0, 15.0);
    editor.append_stroke(pos2(0.0, 0.0), pos2(50.0, 50.0), Color32::RED, 4.0);

    editor.clear_all();

    let doc = editor.document();
    assert!(doc.background().is_none());
    assert!(doc.strokes().is_empty());
    assert!(doc.stickers().is_empty());
    assert!(doc.selected_sticker_id().is_none());
    assert!(editor.surface().pixels().all(|p| p[3] == 0));
}
