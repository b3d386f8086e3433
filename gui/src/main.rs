mod app;

use app::GlyphmatchApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    // Configure logging
    env_logger::init();

    // Configure viewport/window
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Glyphmatch"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Glyphmatch",
        options,
        Box::new(|cc| Ok(Box::new(GlyphmatchApp::new(cc)))),
    )
}
