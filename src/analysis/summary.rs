use std::fmt;

use super::extremes::ExtremeYear;
use super::stats::{mean, sample_std, Describe};
use super::trend::LinearFit;
use super::{AnnualPoint, ClimateAnalysis};
use crate::data::model::{ClimateDataset, Month};
use crate::units::Unit;

/// Headline numbers of a dataset, in °C.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub first_year: i32,
    pub last_year: i32,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub trend: Option<LinearFit>,
    /// (year, anomaly) of the warmest annual mean.
    pub warmest: (i32, f64),
    pub coldest: (i32, f64),
}

impl Statistics {
    /// `None` when no year has an annual mean.
    pub fn compute(annual: &[AnnualPoint], trend: Option<LinearFit>) -> Option<Self> {
        let valid: Vec<(i32, f64)> = annual
            .iter()
            .filter_map(|p| p.mean.map(|m| (p.year, m)))
            .collect();
        let values: Vec<f64> = valid.iter().map(|v| v.1).collect();

        let warmest = *valid.iter().max_by(|a, b| a.1.total_cmp(&b.1))?;
        let coldest = *valid.iter().min_by(|a, b| a.1.total_cmp(&b.1))?;

        Some(Self {
            first_year: annual.first()?.year,
            last_year: annual.last()?.year,
            mean: mean(&values)?,
            std_dev: sample_std(&values),
            trend,
            warmest,
            coldest,
        })
    }
}

/// Distribution of one calendar month across all years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    pub month: Month,
    pub stats: Describe,
}

/// Describe every month column; months without a single value are skipped.
pub fn monthly_summary(dataset: &ClimateDataset) -> Vec<MonthlySummary> {
    Month::ALL
        .iter()
        .filter_map(|&month| {
            let values: Vec<f64> = dataset.rows.values().filter_map(|r| r.get(month)).collect();
            Describe::compute(&values).map(|stats| MonthlySummary { month, stats })
        })
        .collect()
}

/// Plain-text report written as `statistics.txt`.
pub fn render_report(analysis: &ClimateAnalysis, unit: Unit) -> String {
    Report { analysis, unit }.to_string()
}

struct Report<'a> {
    analysis: &'a ClimateAnalysis,
    unit: Unit,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report { analysis, unit } = *self;
        let u = unit.symbol();
        writeln!(f, "Climate Analysis Statistics")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;
        writeln!(f, "Dataset: {}", analysis.dataset)?;

        let Some(stats) = &analysis.statistics else {
            return writeln!(f, "No annual means available.");
        };

        writeln!(f, "Date Range: {} - {}", stats.first_year, stats.last_year)?;
        writeln!(f)?;
        writeln!(f, "Overall Statistics:")?;
        writeln!(f, "Mean Temperature Anomaly: {:.3}{u}", unit.anomaly(stats.mean))?;
        if let Some(sd) = stats.std_dev {
            writeln!(f, "Standard Deviation: {:.3}{u}", unit.anomaly(sd))?;
        }
        match &stats.trend {
            Some(fit) => writeln!(
                f,
                "Temperature Trend: {:.4}{u}/year ({:.3}{u}/decade, R² = {:.3}, n = {})",
                unit.anomaly(fit.slope),
                unit.anomaly(fit.slope_per_decade()),
                fit.r_squared,
                fit.n
            )?,
            None => writeln!(f, "Temperature Trend: not enough years")?,
        }
        writeln!(f)?;

        writeln!(f, "Extreme Values:")?;
        writeln!(
            f,
            "Warmest Year: {} ({:.3}{u})",
            stats.warmest.0,
            unit.anomaly(stats.warmest.1)
        )?;
        writeln!(
            f,
            "Coldest Year: {} ({:.3}{u})",
            stats.coldest.0,
            unit.anomaly(stats.coldest.1)
        )?;
        writeln!(f)?;

        writeln!(f, "Seasonal Trends ({u}/decade):")?;
        for (season, fit) in &analysis.seasonal_trends {
            match fit {
                Some(fit) => writeln!(f, "{}: {:.4}", season.code(), unit.anomaly(fit.slope_per_decade()))?,
                None => writeln!(f, "{}: n/a", season.code())?,
            }
        }
        writeln!(f)?;

        writeln!(f, "Extreme Years (|z| > {:.1}σ):", analysis.options.extreme_sigma)?;
        if analysis.extremes.is_empty() {
            writeln!(f, "none")?;
        }
        for e in &analysis.extremes {
            writeln!(f, "{}", describe_extreme(e, unit))?;
        }
        Ok(())
    }
}

fn describe_extreme(e: &ExtremeYear, unit: Unit) -> String {
    format!(
        "{} {:>4}: {:+.3}{} (z = {:+.2})",
        e.year,
        e.kind,
        unit.anomaly(e.anomaly),
        unit.symbol(),
        e.z_score
    )
}
