use eframe::egui;

mod app;
mod config;
mod events;
mod service;
mod state;
mod view;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("❌ Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };
    let _guard = rt.enter();

    let config = config::Config::load().unwrap_or_else(|e| {
        log::warn!("⚠️ Config unusable ({}), falling back to defaults", e);
        config::Config::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 360.0])
            .with_min_inner_size([360.0, 280.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Donation Dapp",
        options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, config)))),
    );

    drop(_guard);
    rt.shutdown_timeout(std::time::Duration::from_secs(2));

    result
}
