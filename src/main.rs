use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use rusty_climate::analysis::summary::render_report;
use rusty_climate::analysis::ClimateAnalysis;
use rusty_climate::app::RustyClimateApp;
use rusty_climate::cli::{Args, Command};
use rusty_climate::config::Config;
use rusty_climate::data::loader::load_file;
use rusty_climate::export::export_all;
use rusty_climate::state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    match args.command() {
        Command::Gui => run_gui(config),
        Command::Export { .. } => {
            let analysis = analyse(&config)?;
            let written = export_all(&analysis, &config.output)?;
            println!("Wrote {} files to {}", written.len(), config.output.dir.display());
            Ok(())
        }
        Command::Stats => {
            let analysis = analyse(&config)?;
            print!("{}", render_report(&analysis, config.output.unit));
            Ok(())
        }
        Command::Datasets => {
            let file = load_file(&config.data_path)?;
            let default = file.default_index();
            for (i, ds) in file.datasets.iter().enumerate() {
                let (first, last) = ds.year_range().unwrap_or_default();
                let marker = if i == default { "*" } else { " " };
                println!("{marker} {:<16} {first}-{last} ({} years)", ds.name, ds.len());
            }
            Ok(())
        }
    }
}

/// Load the configured section and aggregate it. Data errors end the run
/// before anything is computed.
fn analyse(config: &Config) -> Result<ClimateAnalysis> {
    let file = load_file(&config.data_path)?;
    let dataset = file.select(config.dataset.as_deref())?;
    Ok(ClimateAnalysis::compute(dataset, &config.analysis))
}

fn run_gui(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let mut state = AppState::new(config);
    let path = state.config.data_path.clone();
    state.load_path(&path);

    eframe::run_native(
        "Rusty Climate – GISS Temperature Anomalies",
        options,
        Box::new(|_cc| Ok(Box::new(RustyClimateApp::new(state)))),
    )
    .map_err(|e| anyhow!("GUI failed: {e}"))
}
