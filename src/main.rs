use clap::Parser;
use eframe::egui;

use route_safety_map::app::RouteSafetyApp;
use route_safety_map::cli::Args;
use route_safety_map::config::MapConfig;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = MapConfig::from_args(&args);
    log::info!(
        "Starting at {:.4},{:.4} zoom {} with data {}",
        config.center.lat,
        config.center.lng,
        config.zoom,
        config.data_path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Route Safety Map",
        options,
        Box::new(move |cc| {
            // Install image loaders so local report photos can be previewed.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RouteSafetyApp::new(cc, &config)))
        }),
    )
}
