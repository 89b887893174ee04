/// Presentation layer: renderer-independent figures built from a
/// [`ClimateAnalysis`](crate::analysis::ClimateAnalysis).
///
/// ```text
///   ClimateAnalysis ──build──▶ Figure ─┬─ raster  (plotters → PNG / JPEG)
///                                      ├─ pdf     (JPEG page in a PDF)
///                                      ├─ html    (plotly.js + JSON)
///                                      └─ ui::plot (egui_plot, in the app)
/// ```

pub mod build;
pub mod html;
pub mod pdf;
pub mod raster;

use std::path::Path;

use anyhow::{Context, Result};

use crate::color::{DivergingMap, Rgb};
use crate::config::ExportFormat;

// ---------------------------------------------------------------------------
// Figure model
// ---------------------------------------------------------------------------

/// One exported chart (one file), made of vertically stacked panels.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// File stem, e.g. `temperature_trends`.
    pub id: &'static str,
    pub title: String,
    pub panels: Vec<Panel>,
}

/// A single set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Category names for integer x positions 0, 1, 2, …; empty for a
    /// numeric x axis.
    pub x_ticks: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    /// Half-height of the error bar, if any.
    pub error: Option<f64>,
}

/// Five-number summary drawn as a box at position `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub x: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Grid of year × month cells. Column `c` spans `c ± 0.5` on the x axis and
/// row year `y` spans `y ± 0.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub column_labels: Vec<String>,
    pub rows: Vec<i32>,
    /// `values[row][column]`.
    pub values: Vec<Vec<Option<f64>>>,
    pub map: DivergingMap,
    pub value_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Line {
        name: String,
        points: Vec<[f64; 2]>,
        color: Rgb,
        dash: Dash,
        markers: bool,
    },
    Bars {
        name: String,
        bars: Vec<Bar>,
        width: f64,
        color: Rgb,
    },
    Boxes {
        name: String,
        boxes: Vec<BoxStats>,
        color: Rgb,
    },
    Heatmap(Heatmap),
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Line { name, .. } | Series::Bars { name, .. } | Series::Boxes { name, .. } => name,
            Series::Heatmap(h) => &h.value_label,
        }
    }
}

impl Panel {
    /// Data extent `(x_min, x_max, y_min, y_max)`, padded by 5% and never
    /// zero-width. `None` for a panel without data.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut xs: Vec<f64> = Vec::new();
        let mut ys: Vec<f64> = Vec::new();
        for s in &self.series {
            match s {
                Series::Line { points, .. } => {
                    xs.extend(points.iter().map(|p| p[0]));
                    ys.extend(points.iter().map(|p| p[1]));
                }
                Series::Bars { bars, width, .. } => {
                    for b in bars {
                        xs.extend([b.x - width / 2.0, b.x + width / 2.0]);
                        let e = b.error.unwrap_or(0.0);
                        ys.extend([0.0, b.y - e, b.y + e]);
                    }
                }
                Series::Boxes { boxes, .. } => {
                    for b in boxes {
                        xs.extend([b.x - 0.5, b.x + 0.5]);
                        ys.extend([b.min, b.max]);
                    }
                }
                Series::Heatmap(h) => {
                    xs.extend([-0.5, h.column_labels.len() as f64 - 0.5]);
                    if let (Some(first), Some(last)) = (h.rows.first(), h.rows.last()) {
                        ys.extend([*first as f64 - 0.5, *last as f64 + 0.5]);
                    }
                }
            }
        }
        let (x0, x1) = extent(&xs)?;
        let (y0, y1) = extent(&ys)?;
        let has_heatmap = self.series.iter().any(|s| matches!(s, Series::Heatmap(_)));
        if has_heatmap {
            return Some((x0, x1, y0, y1));
        }
        let (x0, x1) = pad(x0, x1, 0.02);
        let (y0, y1) = pad(y0, y1, 0.05);
        Some((x0, x1, y0, y1))
    }
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo <= hi).then_some((lo, hi))
}

fn pad(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - span * fraction, hi + span * fraction)
}

// ---------------------------------------------------------------------------
// File output
// ---------------------------------------------------------------------------

/// Render `figure` to `path` in the requested format.
pub fn render_to_file(figure: &Figure, format: ExportFormat, size: (u32, u32), path: &Path) -> Result<()> {
    match format {
        ExportFormat::Png | ExportFormat::Jpeg => {
            let image = raster::render(figure, size)?;
            let image_format = if format == ExportFormat::Png {
                image::ImageFormat::Png
            } else {
                image::ImageFormat::Jpeg
            };
            image
                .save_with_format(path, image_format)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        ExportFormat::Pdf => {
            let image = raster::render(figure, size)?;
            let bytes = pdf::image_page(&image)?;
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        }
        ExportFormat::Html => {
            let page = html::render_page(figure, size.1)?;
            std::fs::write(path, page).with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_padded() {
        let panel = Panel {
            title: "t".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            x_ticks: Vec::new(),
            series: vec![Series::Line {
                name: "l".into(),
                points: vec![[0.0, 0.0], [100.0, 10.0]],
                color: Rgb::new(0, 0, 0),
                dash: Dash::Solid,
                markers: false,
            }],
        };
        let (x0, x1, y0, y1) = panel.bounds().unwrap();
        assert!(x0 < 0.0 && x1 > 100.0);
        assert!((y0 + 0.5).abs() < 1e-12 && (y1 - 10.5).abs() < 1e-12);
    }

    #[test]
    fn flat_and_empty_bounds() {
        let mut panel = Panel {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_ticks: Vec::new(),
            series: Vec::new(),
        };
        assert!(panel.bounds().is_none());
        panel.series.push(Series::Line {
            name: "flat".into(),
            points: vec![[2000.0, 0.5]],
            color: Rgb::new(0, 0, 0),
            dash: Dash::Solid,
            markers: true,
        });
        let (x0, x1, y0, y1) = panel.bounds().unwrap();
        assert_eq!((x0, x1), (1999.0, 2001.0));
        assert_eq!((y0, y1), (-0.5, 1.5));
    }
}
