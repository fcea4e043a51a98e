#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod data;
mod monitor;
mod overlay;
mod tray;

use app::OverlayApp;
use egui::ViewportBuilder;

fn main() {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size(overlay::BAR_SIZE)
            .with_position(overlay::DEFAULT_POSITION)
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_always_on_top()
            .with_taskbar(false),
        ..Default::default()
    };

    eframe::run_native(
        "System Monitor",
        native_options,
        Box::new(|cc| Ok(Box::new(OverlayApp::new(cc)))),
    )
    .expect("Failed to start application");
}
