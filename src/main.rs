use eframe::egui;

mod app;

use app::PreviewApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Optional page to open at startup: a path, file:// URL or http(s) URL.
    let initial = std::env::args().nth(1);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Page Reveal",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(PreviewApp::new(&cc.egui_ctx, initial)))
        }),
    )
}
