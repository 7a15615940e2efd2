use std::path::PathBuf;

use city_affordability::app::CityAffordabilityApp;
use city_affordability::config::AppConfig;
use clap::Parser;
use eframe::egui;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration (defaults to ./city-affordability.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// City table to open instead of `data.path` from the configuration
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    log::info!("Using dataset {}", config.data.path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "U.S. City Affordability Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(CityAffordabilityApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the dashboard: {e}"))
}
