mod app;
mod color;
mod data;
mod state;
mod ui;

use app::WageDashApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "日本の賃金データのダッシュボード",
        options,
        Box::new(|cc| {
            app::install_japanese_font(&cc.egui_ctx);
            Ok(Box::new(WageDashApp::startup()))
        }),
    )
}
