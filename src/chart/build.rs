use std::collections::BTreeMap;

use super::{Bar, BoxStats, Dash, Figure, Heatmap, Panel, Series};
use crate::analysis::seasonal::{series_for, Season};
use crate::analysis::trend::LinearFit;
use crate::analysis::ClimateAnalysis;
use crate::color::{self, generate_palette, DivergingMap};
use crate::data::model::Month;
use crate::units::Unit;

/// The charts offered by the exporter and the app, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    TemperatureTrends,
    MonthlyPatterns,
    SeasonalAnalysis,
    DecadalChanges,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::TemperatureTrends,
        ChartKind::MonthlyPatterns,
        ChartKind::SeasonalAnalysis,
        ChartKind::DecadalChanges,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::TemperatureTrends => "Temperature Trends",
            ChartKind::MonthlyPatterns => "Monthly Patterns",
            ChartKind::SeasonalAnalysis => "Seasonal Analysis",
            ChartKind::DecadalChanges => "Decadal Changes",
        }
    }

    pub fn build(self, analysis: &ClimateAnalysis, unit: Unit) -> Figure {
        match self {
            ChartKind::TemperatureTrends => temperature_trends(analysis, unit),
            ChartKind::MonthlyPatterns => monthly_patterns(analysis, unit),
            ChartKind::SeasonalAnalysis => seasonal_analysis(analysis, unit),
            ChartKind::DecadalChanges => decadal_changes(analysis, unit),
        }
    }
}

/// Every figure, in [`ChartKind::ALL`] order.
pub fn all_figures(analysis: &ClimateAnalysis, unit: Unit) -> Vec<Figure> {
    ChartKind::ALL.iter().map(|k| k.build(analysis, unit)).collect()
}

fn anomaly_label(unit: Unit) -> String {
    format!("Temperature Anomaly ({})", unit.symbol())
}

fn month_ticks() -> Vec<String> {
    Month::ALL.iter().map(|m| m.abbrev().to_string()).collect()
}

fn convert(points: &[(i32, f64)], unit: Unit) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|&(year, v)| [year as f64, unit.anomaly(v)])
        .collect()
}

/// Dashed fitted line evaluated at each year in `years`.
fn trend_line(name: &str, fit: &LinearFit, years: &[i32], unit: Unit) -> Series {
    let points = years
        .iter()
        .map(|&y| [y as f64, unit.anomaly(fit.predict(y as f64))])
        .collect();
    Series::Line {
        name: format!(
            "{name} ({:+.3}{}/decade)",
            unit.anomaly(fit.slope_per_decade()),
            unit.symbol()
        ),
        points,
        color: color::TREND,
        dash: Dash::Dashed,
        markers: false,
    }
}

// ---------------------------------------------------------------------------
// Temperature trends
// ---------------------------------------------------------------------------

pub fn temperature_trends(a: &ClimateAnalysis, unit: Unit) -> Figure {
    let annual: Vec<(i32, f64)> = a
        .annual
        .iter()
        .filter_map(|p| p.mean.map(|m| (p.year, m)))
        .collect();
    let years: Vec<i32> = annual.iter().map(|p| p.0).collect();

    let mut series = vec![Series::Line {
        name: "Annual Temperature".into(),
        points: convert(&annual, unit),
        color: color::ANNUAL,
        dash: Dash::Solid,
        markers: true,
    }];
    if let Some(fit) = &a.trend {
        series.push(trend_line("Trend", fit, &years, unit));
    }
    series.push(Series::Line {
        name: format!("{}-Year Moving Average", a.options.moving_average_window),
        points: convert(&a.moving_average, unit),
        color: color::MOVING_AVERAGE,
        dash: Dash::Solid,
        markers: false,
    });

    Figure {
        id: "temperature_trends",
        title: format!("Global Temperature Anomalies ({})", a.dataset),
        panels: vec![
            Panel {
                title: "Annual Mean Anomaly".into(),
                x_label: "Year".into(),
                x_ticks: Vec::new(),
                y_label: anomaly_label(unit),
                series,
            },
            Panel {
                title: "Year-over-Year Change".into(),
                x_label: "Year".into(),
                x_ticks: Vec::new(),
                y_label: format!("Change ({})", unit.symbol()),
                series: vec![Series::Line {
                    name: "Year-over-Year Change".into(),
                    points: convert(&a.year_over_year, unit),
                    color: color::CHANGE,
                    dash: Dash::Solid,
                    markers: false,
                }],
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Monthly patterns
// ---------------------------------------------------------------------------

pub fn monthly_patterns(a: &ClimateAnalysis, unit: Unit) -> Figure {
    let mut grid: BTreeMap<i32, Vec<Option<f64>>> =
        a.annual.iter().map(|p| (p.year, vec![None; 12])).collect();
    for obs in &a.observations {
        if let Some(row) = grid.get_mut(&obs.year) {
            row[obs.month.index()] = Some(unit.anomaly(obs.anomaly));
        }
    }
    let map = DivergingMap::symmetric(grid.values().flatten().flatten().copied());

    let heatmap = Heatmap {
        column_labels: month_ticks(),
        rows: grid.keys().copied().collect(),
        values: grid.into_values().collect(),
        map,
        value_label: anomaly_label(unit),
    };

    let boxes = a
        .monthly
        .iter()
        .map(|m| BoxStats {
            label: m.month.abbrev().to_string(),
            x: m.month.index() as f64,
            min: unit.anomaly(m.stats.min),
            q1: unit.anomaly(m.stats.q1),
            median: unit.anomaly(m.stats.median),
            q3: unit.anomaly(m.stats.q3),
            max: unit.anomaly(m.stats.max),
        })
        .collect();

    Figure {
        id: "monthly_patterns",
        title: format!("Monthly Temperature Analysis ({})", a.dataset),
        panels: vec![
            Panel {
                title: "Monthly Temperature Patterns".into(),
                x_label: "Month".into(),
                x_ticks: month_ticks(),
                y_label: "Year".into(),
                series: vec![Series::Heatmap(heatmap)],
            },
            Panel {
                title: "Monthly Temperature Distributions".into(),
                x_label: "Month".into(),
                x_ticks: month_ticks(),
                y_label: anomaly_label(unit),
                series: vec![Series::Boxes {
                    name: "Monthly distribution".into(),
                    boxes,
                    color: color::ANNUAL,
                }],
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Seasonal analysis
// ---------------------------------------------------------------------------

pub fn seasonal_analysis(a: &ClimateAnalysis, unit: Unit) -> Figure {
    let palette = generate_palette(Season::ALL.len());
    let panels = Season::ALL
        .iter()
        .zip(palette)
        .map(|(&season, color)| {
            let points = series_for(&a.seasonal, season);
            let years: Vec<i32> = points.iter().map(|p| p.0).collect();
            let mut series = vec![Series::Line {
                name: season.to_string(),
                points: convert(&points, unit),
                color,
                dash: Dash::Solid,
                markers: true,
            }];
            let fit = a
                .seasonal_trends
                .iter()
                .find(|(s, _)| *s == season)
                .and_then(|(_, fit)| fit.as_ref());
            if let Some(fit) = fit {
                series.push(trend_line("Trend", fit, &years, unit));
            }
            Panel {
                title: season.to_string(),
                x_label: "Year".into(),
                x_ticks: Vec::new(),
                y_label: anomaly_label(unit),
                series,
            }
        })
        .collect();

    Figure {
        id: "seasonal_analysis",
        title: format!("Seasonal Temperature Patterns ({})", a.dataset),
        panels,
    }
}

// ---------------------------------------------------------------------------
// Decadal changes
// ---------------------------------------------------------------------------

pub fn decadal_changes(a: &ClimateAnalysis, unit: Unit) -> Figure {
    let change = a
        .decadal
        .iter()
        .filter_map(|d| {
            d.change.map(|c| Bar {
                x: d.decade as f64 + 5.0,
                y: unit.anomaly(c),
                error: None,
            })
        })
        .collect();
    let means = a
        .decadal
        .iter()
        .map(|d| Bar {
            x: d.decade as f64 + 5.0,
            y: unit.anomaly(d.mean),
            error: d.std_dev.map(|s| unit.anomaly(s)),
        })
        .collect();

    Figure {
        id: "decadal_changes",
        title: format!("Decadal Temperature Analysis ({})", a.dataset),
        panels: vec![
            Panel {
                title: "Change from Previous Decade".into(),
                x_label: "Decade".into(),
                x_ticks: Vec::new(),
                y_label: format!("Change ({})", unit.symbol()),
                series: vec![Series::Bars {
                    name: "Temperature Change".into(),
                    bars: change,
                    width: 8.0,
                    color: color::CHANGE,
                }],
            },
            Panel {
                title: "Decadal Mean ± 1 SD".into(),
                x_label: "Decade".into(),
                x_ticks: Vec::new(),
                y_label: anomaly_label(unit),
                series: vec![Series::Bars {
                    name: "Mean Temperature".into(),
                    bars: means,
                    width: 8.0,
                    color: color::SPREAD,
                }],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::AnalysisOptions;
    use crate::data::model::{ClimateDataset, MonthlyRow};

    fn analysis() -> ClimateAnalysis {
        let mut rows = BTreeMap::new();
        for year in 1960..1990 {
            let v = (year - 1960) as f64 * 0.03 - 0.2;
            rows.insert(year, MonthlyRow::new([Some(v); 12]));
        }
        ClimateAnalysis::compute(&ClimateDataset::new("synthetic", rows), &AnalysisOptions::default())
    }

    #[test]
    fn builds_every_figure_with_data() {
        let a = analysis();
        let figures = all_figures(&a, Unit::Celsius);
        let ids: Vec<&str> = figures.iter().map(|f| f.id).collect();
        assert_eq!(
            ids,
            vec!["temperature_trends", "monthly_patterns", "seasonal_analysis", "decadal_changes"]
        );
        for f in &figures {
            assert!(!f.panels.is_empty());
            assert!(f.panels.iter().all(|p| p.bounds().is_some()), "{}", f.id);
        }
    }

    #[test]
    fn fahrenheit_scales_plotted_values() {
        let a = analysis();
        let c = temperature_trends(&a, Unit::Celsius);
        let f = temperature_trends(&a, Unit::Fahrenheit);
        let (Series::Line { points: pc, .. }, Series::Line { points: pf, .. }) =
            (&c.panels[0].series[0], &f.panels[0].series[0])
        else {
            panic!("annual series is a line");
        };
        for (a, b) in pc.iter().zip(pf) {
            assert_eq!(a[0], b[0]);
            assert!((a[1] * 1.8 - b[1]).abs() < 1e-12);
        }
        assert!(f.panels[0].y_label.contains("°F"));
    }

    #[test]
    fn heatmap_covers_every_year() {
        let a = analysis();
        let fig = monthly_patterns(&a, Unit::Celsius);
        let Series::Heatmap(h) = &fig.panels[0].series[0] else {
            panic!("first monthly panel is a heatmap");
        };
        assert_eq!(h.rows.len(), 30);
        assert_eq!(h.column_labels.len(), 12);
        assert!(h.values.iter().all(|r| r.len() == 12));
    }

    #[test]
    fn decadal_bars_carry_spread() {
        let a = analysis();
        let fig = decadal_changes(&a, Unit::Celsius);
        let Series::Bars { bars, .. } = &fig.panels[1].series[0] else {
            panic!("decadal means are bars");
        };
        assert_eq!(bars.len(), 3);
        assert!(bars.iter().all(|b| b.error.is_some()));
        let Series::Bars { bars: change, .. } = &fig.panels[0].series[0] else {
            panic!("decadal change is bars");
        };
        assert_eq!(change.len(), 2);
    }
}
