mod app;
mod input;

use app::HapticsDemoApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 520.0])
            .with_min_inner_size([300.0, 200.0])
            .with_title("padhaptics demo"),
        ..Default::default()
    };

    eframe::run_native(
        "padhaptics demo",
        native_options,
        Box::new(|cc| Ok(Box::new(HapticsDemoApp::new(cc)))),
    )
}
