/// Aggregation layer: everything derived from a loaded [`ClimateDataset`].
///
/// All values are kept in °C; unit conversion happens when charts or
/// reports are produced.

pub mod decadal;
pub mod extremes;
pub mod seasonal;
pub mod stats;
pub mod summary;
pub mod trend;

use crate::config::AnalysisOptions;
use crate::data::model::{ClimateDataset, Observation};
use crate::data::reshape::to_long;

use decadal::DecadeStats;
use extremes::ExtremeYear;
use seasonal::{Season, SeasonalPoint};
use summary::{MonthlySummary, Statistics};
use trend::LinearFit;

/// Annual mean of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualPoint {
    pub year: i32,
    /// `None` when the year has fewer valid months than required.
    pub mean: Option<f64>,
    /// Valid months in the source row.
    pub months: usize,
}

/// Annual series of a dataset, one point per row.
pub fn annual_series(dataset: &ClimateDataset, min_months: usize) -> Vec<AnnualPoint> {
    dataset
        .rows
        .iter()
        .map(|(&year, row)| AnnualPoint {
            year,
            mean: row.mean(min_months),
            months: row.valid_count(),
        })
        .collect()
}

/// Every aggregate the charts and reports need.
#[derive(Debug, Clone)]
pub struct ClimateAnalysis {
    /// Name of the analysed section.
    pub dataset: String,
    pub options: AnalysisOptions,
    /// Long form of the source table.
    pub observations: Vec<Observation>,
    pub annual: Vec<AnnualPoint>,
    pub trend: Option<LinearFit>,
    pub moving_average: Vec<(i32, f64)>,
    pub year_over_year: Vec<(i32, f64)>,
    pub seasonal: Vec<SeasonalPoint>,
    pub seasonal_trends: Vec<(Season, Option<LinearFit>)>,
    pub decadal: Vec<DecadeStats>,
    pub extremes: Vec<ExtremeYear>,
    pub monthly: Vec<MonthlySummary>,
    pub statistics: Option<Statistics>,
}

impl ClimateAnalysis {
    pub fn compute(dataset: &ClimateDataset, options: &AnalysisOptions) -> Self {
        let observations = to_long(dataset);
        let annual = annual_series(dataset, options.min_annual_months);
        let trend = trend::annual_trend(&annual);
        let seasonal = seasonal::seasonal_means(&observations, options.min_season_months);

        let analysis = Self {
            dataset: dataset.name.clone(),
            options: options.clone(),
            moving_average: trend::moving_average(&annual, options.moving_average_window),
            year_over_year: trend::year_over_year(&annual),
            seasonal_trends: seasonal::seasonal_trends(&seasonal),
            decadal: decadal::decadal_stats(&annual),
            extremes: extremes::detect_extremes(&annual, options.extreme_sigma),
            monthly: summary::monthly_summary(dataset),
            statistics: Statistics::compute(&annual, trend),
            observations,
            annual,
            trend,
            seasonal,
        };

        log::debug!(
            "Analysed '{}': {} annual points, {} seasonal points, {} decades, {} extreme years",
            analysis.dataset,
            analysis.annual.len(),
            analysis.seasonal.len(),
            analysis.decadal.len(),
            analysis.extremes.len()
        );
        analysis
    }
}
