mod app;
mod color;
mod state;
mod ui;

use app::SahieDashApp;
use eframe::egui;
use sahie_dash::config::Config;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load();
    log::info!("using database {}", config.database.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Small Area Health Insurance Estimates",
        options,
        Box::new(|_cc| Ok(Box::new(SahieDashApp::new(config)))),
    )
}
