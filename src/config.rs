//! Runtime configuration: TOML file, then command-line overrides.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Relative path of the GISS download used when nothing else is given.
pub const DEFAULT_DATA_PATH: &str = "data/GLB.Ts+dSST.csv";

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

/// File format for exported charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
    #[default]
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Pdf,
        ExportFormat::Html,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => write!(f, "PNG"),
            ExportFormat::Jpeg => write!(f, "JPEG"),
            ExportFormat::Pdf => write!(f, "PDF"),
            ExportFormat::Html => write!(f, "HTML"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Knobs of the aggregation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Trailing moving-average window in years.
    pub moving_average_window: usize,
    /// A year is extreme when its anomaly is more than this many standard
    /// deviations from the mean.
    pub extreme_sigma: f64,
    /// Valid months a year needs before it gets an annual mean.
    pub min_annual_months: usize,
    /// Valid months a season needs before it gets a mean.
    pub min_season_months: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            moving_average_window: 10,
            extreme_sigma: 2.0,
            min_annual_months: 1,
            min_season_months: 3,
        }
    }
}

/// Where and how charts are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub dir: PathBuf,
    pub unit: Unit,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("outputs"),
            unit: Unit::Celsius,
            format: ExportFormat::Html,
            width: 1200,
            height: 800,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Complete application configuration.
///
/// ```toml
/// data_path = "data/GLB.Ts+dSST.csv"
/// dataset = "GHCNv4/ERSSTv5"
///
/// [analysis]
/// moving_average_window = 10
/// extreme_sigma = 2.0
///
/// [output]
/// dir = "outputs"
/// unit = "fahrenheit"
/// format = "png"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,
    /// Section to analyse; the file's default section when unset.
    pub dataset: Option<String>,
    pub analysis: AnalysisOptions,
    pub output: OutputOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            dataset: None,
            analysis: AnalysisOptions::default(),
            output: OutputOptions::default(),
        }
    }
}

impl Config {
    /// Read a TOML configuration file. Absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the aggregation or renderers cannot work with.
    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        if a.moving_average_window == 0 {
            bail!("analysis.moving_average_window must be at least 1");
        }
        if !(a.extreme_sigma.is_finite() && a.extreme_sigma > 0.0) {
            bail!("analysis.extreme_sigma must be a positive number, got {}", a.extreme_sigma);
        }
        if !(1..=12).contains(&a.min_annual_months) {
            bail!("analysis.min_annual_months must be within 1..=12");
        }
        if !(1..=3).contains(&a.min_season_months) {
            bail!("analysis.min_season_months must be within 1..=3");
        }
        if self.output.width == 0 || self.output.height == 0 {
            bail!(
                "output size must be non-zero, got {}x{}",
                self.output.width,
                self.output.height
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.analysis.moving_average_window, 10);
        assert_eq!(config.output.format, ExportFormat::Html);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            dataset = "AIRS v7"

            [output]
            unit = "fahrenheit"
            format = "jpeg"
            "#,
        )
        .unwrap();
        assert_eq!(config.dataset.as_deref(), Some("AIRS v7"));
        assert_eq!(config.output.unit, Unit::Fahrenheit);
        assert_eq!(config.output.format, ExportFormat::Jpeg);
        assert_eq!(config.output.width, 1200);
        assert_eq!(config.analysis, AnalysisOptions::default());
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        config.analysis.moving_average_window = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.extreme_sigma = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.min_season_months = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn jpeg_uses_short_extension() {
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
        assert_eq!(ExportFormat::Html.extension(), "html");
    }
}
