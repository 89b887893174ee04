//! Command-line interface, parsed with `clap`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{Config, ExportFormat};
use crate::units::Unit;

/// Analyse and chart NASA GISS surface temperature anomalies
#[derive(Parser, Debug)]
#[command(name = "rusty-climate", version, about)]
pub struct Args {
    /// TOML configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the GISS CSV (default: data/GLB.Ts+dSST.csv)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Section of the file to analyse, e.g. "GHCNv4/ERSSTv5"
    #[arg(long)]
    pub dataset: Option<String>,

    /// Unit for charts and reports
    #[arg(short, long, value_enum)]
    pub unit: Option<Unit>,

    /// Moving-average window in years
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Standard deviations from the mean that make a year extreme
    #[arg(long)]
    pub sigma: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the interactive viewer (default)
    Gui,
    /// Write every chart, statistics.txt and report.html
    Export {
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
        /// Output directory (default: outputs)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Print the statistics report to stdout
    Stats,
    /// List the sections found in the data file
    Datasets,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Gui)
    }

    /// Configuration file (or defaults) with every flag applied, validated.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.dataset = Some(dataset.clone());
        }
        if let Some(unit) = self.unit {
            config.output.unit = unit;
        }
        if let Some(window) = self.window {
            config.analysis.moving_average_window = window;
        }
        if let Some(sigma) = self.sigma {
            config.analysis.extreme_sigma = sigma;
        }
        if let Some(Command::Export {
            format,
            out,
            width,
            height,
        }) = &self.command
        {
            if let Some(format) = format {
                config.output.format = *format;
            }
            if let Some(out) = out {
                config.output.dir = out.clone();
            }
            if let Some(width) = width {
                config.output.width = *width;
            }
            if let Some(height) = height {
                config.output.height = *height;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_to_gui() {
        let args = Args::try_parse_from(["rusty-climate"]).unwrap();
        assert_eq!(args.command(), Command::Gui);
        assert_eq!(args.resolve_config().unwrap(), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "rusty-climate",
            "--data",
            "other.csv",
            "--unit",
            "fahrenheit",
            "--window",
            "5",
            "export",
            "--format",
            "pdf",
            "--out",
            "charts",
        ])
        .unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.output.unit, Unit::Fahrenheit);
        assert_eq!(config.analysis.moving_average_window, 5);
        assert_eq!(config.output.format, ExportFormat::Pdf);
        assert_eq!(config.output.dir, PathBuf::from("charts"));
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nmoving_average_window = 20\nextreme_sigma = 1.5").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::try_parse_from(["rusty-climate", "--config", &path, "--sigma", "3", "stats"]).unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.analysis.moving_average_window, 20);
        assert_eq!(config.analysis.extreme_sigma, 3.0);
        assert_eq!(args.command(), Command::Stats);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = Args::try_parse_from(["rusty-climate", "--window", "0"]).unwrap();
        assert!(args.resolve_config().is_err());
    }
}
