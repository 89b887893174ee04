use std::path::Path;

use chrono::{DateTime, Local};

use crate::analysis::ClimateAnalysis;
use crate::chart::build::ChartKind;
use crate::chart::Figure;
use crate::config::{Config, ExportFormat};
use crate::data::loader::load_file;
use crate::data::model::{ClimateDataset, DataFile};
use crate::export::export_all;
use crate::units::Unit;

// ---------------------------------------------------------------------------
// View selection
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chart(ChartKind),
    StatisticalSummary,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Chart(ChartKind::TemperatureTrends),
        View::Chart(ChartKind::MonthlyPatterns),
        View::Chart(ChartKind::SeasonalAnalysis),
        View::Chart(ChartKind::DecadalChanges),
        View::StatisticalSummary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Chart(kind) => kind.label(),
            View::StatisticalSummary => "Statistical Summary",
        }
    }
}

/// Message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub at: DateTime<Local>,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded file (None until a file loads successfully).
    pub file: Option<DataFile>,

    /// Index into `file.datasets` of the analysed section.
    pub selected: usize,

    /// Aggregates of the selected section.
    pub analysis: Option<ClimateAnalysis>,

    pub view: View,

    /// Figure for the current chart view, rebuilt on view or unit change.
    pub figure: Option<Figure>,

    pub status: Option<Status>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            file: None,
            selected: 0,
            analysis: None,
            view: View::Chart(ChartKind::TemperatureTrends),
            figure: None,
            status: None,
        }
    }

    pub fn dataset(&self) -> Option<&ClimateDataset> {
        self.file.as_ref()?.datasets.get(self.selected)
    }

    /// Load a data file; failures go to the status bar and keep the
    /// previous file.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(file) => {
                self.config.data_path = path.to_path_buf();
                self.set_file(file);
            }
            Err(e) => self.set_error(format!("Error: {e}")),
        }
    }

    /// Ingest a loaded file and analyse the configured (or default) section.
    pub fn set_file(&mut self, file: DataFile) {
        self.selected = match self.config.dataset.as_deref() {
            Some(name) => match file.index_of(name) {
                Ok(i) => i,
                Err(e) => {
                    log::warn!("{e}");
                    file.default_index()
                }
            },
            None => file.default_index(),
        };
        let message = format!(
            "Loaded {} ({} dataset{})",
            file.path.display(),
            file.datasets.len(),
            if file.datasets.len() == 1 { "" } else { "s" }
        );
        self.file = Some(file);
        self.recompute();
        self.set_info(message);
    }

    pub fn select_dataset(&mut self, index: usize) {
        let Some(file) = &self.file else {
            return;
        };
        let Some(ds) = file.datasets.get(index) else {
            return;
        };
        let name = ds.name.clone();
        self.selected = index;
        self.config.dataset = Some(name.clone());
        self.recompute();
        self.set_info(format!("Switched to {name}"));
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.rebuild_figure();
        }
    }

    pub fn set_unit(&mut self, unit: Unit) {
        if self.config.output.unit != unit {
            self.config.output.unit = unit;
            self.rebuild_figure();
        }
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.config.output.format = format;
    }

    pub fn set_window(&mut self, window: usize) {
        let previous = self.config.analysis.moving_average_window;
        self.config.analysis.moving_average_window = window;
        self.apply_analysis_change(|c| c.analysis.moving_average_window = previous);
    }

    pub fn set_sigma(&mut self, sigma: f64) {
        let previous = self.config.analysis.extreme_sigma;
        self.config.analysis.extreme_sigma = sigma;
        self.apply_analysis_change(|c| c.analysis.extreme_sigma = previous);
    }

    fn apply_analysis_change(&mut self, revert: impl FnOnce(&mut Config)) {
        match self.config.validate() {
            Ok(()) => self.recompute(),
            Err(e) => {
                revert(&mut self.config);
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Recompute every aggregate of the selected section.
    pub fn recompute(&mut self) {
        self.analysis = self
            .dataset()
            .map(|ds| ClimateAnalysis::compute(ds, &self.config.analysis));
        self.rebuild_figure();
    }

    fn rebuild_figure(&mut self) {
        self.figure = match (self.view, &self.analysis) {
            (View::Chart(kind), Some(a)) => Some(kind.build(a, self.config.output.unit)),
            _ => None,
        };
    }

    /// Write the full report into the configured output directory.
    pub fn export_report(&mut self) {
        let Some(analysis) = &self.analysis else {
            self.set_error("Error: no dataset loaded".to_string());
            return;
        };
        log::info!("Generating report in {}", self.config.output.dir.display());
        let result = export_all(analysis, &self.config.output);
        match result {
            Ok(written) => self.set_info(format!(
                "Report generated: {} files in {}",
                written.len(),
                self.config.output.dir.display()
            )),
            Err(e) => self.set_error(format!("Export failed: {e:#}")),
        }
    }

    pub fn set_info(&mut self, message: String) {
        log::info!("{message}");
        self.status = Some(Status {
            message,
            at: Local::now(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, message: String) {
        log::error!("{message}");
        self.status = Some(Status {
            message,
            at: Local::now(),
            is_error: true,
        });
    }
}
