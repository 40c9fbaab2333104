#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use purikura::{EditorConfig, PurikuraApp};

fn load_config() -> EditorConfig {
    match std::env::var_os("PURIKURA_CONFIG") {
        Some(path) => EditorConfig::load(&path).unwrap_or_else(|err| {
            log::warn!("Could not load config from {:?}: {}, using defaults", path, err);
            EditorConfig::default()
        }),
        None => EditorConfig::default(),
    }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Purikura")
            .with_inner_size([
                config.viewport_width as f32 + 40.0,
                config.viewport_height as f32 + 80.0,
            ])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "purikura",
        native_options,
        Box::new(move |cc| Ok(Box::new(PurikuraApp::new(cc, config)?))),
    )
}
