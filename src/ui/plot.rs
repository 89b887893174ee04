use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, Plot, PlotPoints, PlotUi, Points, Polygon};

use crate::analysis::summary::MonthlySummary;
use crate::analysis::ClimateAnalysis;
use crate::chart::{Dash, Figure, Heatmap, Panel, Series};
use crate::state::{AppState, View};
use crate::units::Unit;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the selected chart or the statistical summary.
pub fn central_view(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a GISS temperature file to begin  (File → Open…)");
        });
        return;
    };

    match (state.view, &state.figure) {
        (View::Chart(_), Some(figure)) => figure_view(ui, figure),
        (View::Chart(_), None) => {
            ui.label("Nothing to plot.");
        }
        (View::StatisticalSummary, _) => summary_view(ui, analysis, state.config.output.unit),
    }
}

// ---------------------------------------------------------------------------
// Figures
// ---------------------------------------------------------------------------

/// Every panel of `figure` as its own interactive plot, stacked vertically.
pub fn figure_view(ui: &mut Ui, figure: &Figure) {
    ui.heading(&figure.title);
    let n = figure.panels.len().max(1) as f32;
    let height = ((ui.available_height() - 28.0 * n) / n).max(220.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, panel) in figure.panels.iter().enumerate() {
                ui.label(RichText::new(&panel.title).strong());
                panel_plot(ui, (figure.id, i), panel, height);
            }
        });
}

fn panel_plot(ui: &mut Ui, id: (&str, usize), panel: &Panel, height: f32) {
    let mut plot = Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(panel.x_label.clone())
        .y_axis_label(panel.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some((x0, x1, y0, y1)) = panel.bounds() {
        plot = plot.include_x(x0).include_x(x1).include_y(y0).include_y(y1);
    }
    if !panel.x_ticks.is_empty() {
        let ticks = panel.x_ticks.clone();
        plot = plot.x_axis_formatter(move |mark, _range| category(&ticks, mark.value));
    }
    if panel.series.iter().any(|s| matches!(s, Series::Heatmap(_))) {
        plot = plot.y_axis_formatter(|mark, _range| format!("{:.0}", mark.value));
    }

    plot.show(ui, |plot_ui| {
        for series in &panel.series {
            draw_series(plot_ui, series);
        }
    });
}

/// Label for integer positions inside `ticks`; blank between categories.
fn category(ticks: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < ticks.len() {
        ticks[i as usize].clone()
    } else {
        String::new()
    }
}

fn draw_series(plot_ui: &mut PlotUi, series: &Series) {
    match series {
        Series::Line {
            name,
            points,
            color,
            dash,
            markers,
        } => {
            let color = color.to_color32();
            let mut line = Line::new(PlotPoints::new(points.clone()))
                .name(name)
                .color(color)
                .width(2.0);
            if *dash == Dash::Dashed {
                line = line.style(LineStyle::dashed_loose());
            }
            plot_ui.line(line);
            if *markers {
                plot_ui.points(Points::new(PlotPoints::new(points.clone())).color(color).radius(2.5));
            }
        }
        Series::Bars {
            name,
            bars,
            width,
            color,
        } => {
            let color = color.to_color32();
            let chart = bars
                .iter()
                .map(|b| egui_plot::Bar::new(b.x, b.y).width(*width).fill(color))
                .collect();
            plot_ui.bar_chart(BarChart::new(chart).name(name).color(color));

            for b in bars {
                if let Some(e) = b.error {
                    let whisker = vec![[b.x, b.y - e], [b.x, b.y + e]];
                    plot_ui.line(Line::new(PlotPoints::new(whisker)).color(Color32::GRAY).width(1.5));
                }
            }
        }
        Series::Boxes { name, boxes, color } => {
            let color = color.to_color32();
            let elems = boxes
                .iter()
                .map(|b| {
                    BoxElem::new(b.x, BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max))
                        .name(&b.label)
                        .box_width(0.6)
                        .fill(color.gamma_multiply(0.4))
                        .stroke(Stroke::new(1.0, color))
                })
                .collect();
            plot_ui.box_plot(BoxPlot::new(elems).name(name));
        }
        Series::Heatmap(h) => draw_heatmap(plot_ui, h),
    }
}

fn draw_heatmap(plot_ui: &mut PlotUi, h: &Heatmap) {
    for (&year, row) in h.rows.iter().zip(&h.values) {
        let y = year as f64;
        for (col, value) in row.iter().enumerate() {
            let Some(value) = value else {
                continue;
            };
            let x = col as f64;
            let cell = vec![
                [x - 0.5, y - 0.5],
                [x + 0.5, y - 0.5],
                [x + 0.5, y + 0.5],
                [x - 0.5, y + 0.5],
            ];
            plot_ui.polygon(
                Polygon::new(PlotPoints::new(cell))
                    .fill_color(h.map.color_for(*value).to_color32())
                    .stroke(Stroke::NONE),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Statistical summary
// ---------------------------------------------------------------------------

pub fn summary_view(ui: &mut Ui, analysis: &ClimateAnalysis, unit: Unit) {
    let u = unit.symbol();
    ui.heading(format!("Statistical Summary ({})", analysis.dataset));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let Some(stats) = &analysis.statistics else {
                ui.label("No year has an annual mean.");
                return;
            };

            egui::Grid::new("summary_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    let row = |ui: &mut Ui, key: &str, value: String| {
                        ui.label(key);
                        ui.label(value);
                        ui.end_row();
                    };
                    row(ui, "Date range", format!("{} – {}", stats.first_year, stats.last_year));
                    row(ui, "Mean anomaly", format!("{:.3}{u}", unit.anomaly(stats.mean)));
                    row(
                        ui,
                        "Standard deviation",
                        stats
                            .std_dev
                            .map_or("n/a".into(), |sd| format!("{:.3}{u}", unit.anomaly(sd))),
                    );
                    row(
                        ui,
                        "Trend",
                        stats.trend.map_or("n/a".into(), |fit| {
                            format!(
                                "{:+.3}{u}/decade (R² = {:.3})",
                                unit.anomaly(fit.slope_per_decade()),
                                fit.r_squared
                            )
                        }),
                    );
                    row(
                        ui,
                        "Warmest year",
                        format!("{} ({:.3}{u})", stats.warmest.0, unit.anomaly(stats.warmest.1)),
                    );
                    row(
                        ui,
                        "Coldest year",
                        format!("{} ({:.3}{u})", stats.coldest.0, unit.anomaly(stats.coldest.1)),
                    );
                    for (season, fit) in &analysis.seasonal_trends {
                        let value = fit.map_or("n/a".into(), |fit| {
                            format!("{:+.3}{u}/decade", unit.anomaly(fit.slope_per_decade()))
                        });
                        row(ui, &format!("{season} trend"), value);
                    }
                });

            ui.add_space(12.0);
            ui.strong(format!(
                "Extreme years (|z| > {:.1}σ)",
                analysis.options.extreme_sigma
            ));
            if analysis.extremes.is_empty() {
                ui.label("none");
            }
            for e in &analysis.extremes {
                ui.label(format!(
                    "{}  {:+.3}{u}  z = {:+.2}  ({})",
                    e.year,
                    unit.anomaly(e.anomaly),
                    e.z_score,
                    e.kind
                ));
            }

            ui.add_space(12.0);
            ui.strong("Monthly Temperature Statistics");
            monthly_table(ui, &analysis.monthly, unit);
        });
}

fn monthly_table(ui: &mut Ui, monthly: &[MonthlySummary], unit: Unit) {
    const HEADERS: [&str; 9] = ["Month", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"];
    let fmt = |v: f64| format!("{:.3}", unit.anomaly(v));

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .columns(Column::auto().at_least(56.0), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for h in HEADERS {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|mut body| {
            for m in monthly {
                let s = &m.stats;
                let cells = [
                    m.month.abbrev().to_string(),
                    s.count.to_string(),
                    fmt(s.mean),
                    s.std_dev.map_or("n/a".into(), fmt),
                    fmt(s.min),
                    fmt(s.q1),
                    fmt(s.median),
                    fmt(s.q3),
                    fmt(s.max),
                ];
                body.row(18.0, |mut row| {
                    for cell in &cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_integer_positions() {
        let ticks = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(category(&ticks, 1.0), "Feb");
        assert_eq!(category(&ticks, 0.5), "");
        assert_eq!(category(&ticks, 2.0), "");
        assert_eq!(category(&ticks, -1.0), "");
    }
}
