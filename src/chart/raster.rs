use std::sync::Once;

use anyhow::{anyhow, Result};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use super::{Dash, Figure, Heatmap, Panel, Series};
use crate::color::Rgb;

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

static REGISTER_FONT: Once = Once::new();

fn ensure_font() {
    REGISTER_FONT.call_once(|| {
        if register_font(FONT, FontStyle::Normal, FONT_BYTES).is_err() {
            log::error!("Bundled chart font could not be registered; text will be missing");
        }
    });
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Draw `figure` into an RGB bitmap of the given size.
pub fn render(figure: &Figure, (width, height): (u32, u32)) -> Result<RgbImage> {
    ensure_font();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    draw_figure(figure, &mut buffer, (width, height))
        .map_err(|e| anyhow!("rendering '{}': {e}", figure.id))?;
    RgbImage::from_raw(width, height, buffer).ok_or_else(|| anyhow!("bitmap buffer does not match {width}x{height}"))
}

fn draw_figure(figure: &Figure, buffer: &mut [u8], size: (u32, u32)) -> DrawResult<()> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(&figure.title, (FONT, 26))?;
    let areas = body.split_evenly((figure.panels.len().max(1), 1));
    for (panel, area) in figure.panels.iter().zip(areas.iter()) {
        draw_panel(panel, area)?;
    }
    root.present()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

fn draw_panel(panel: &Panel, area: &Area<'_>) -> DrawResult<()> {
    let Some((x0, x1, y0, y1)) = panel.bounds() else {
        area.draw(&Text::new(format!("{}: no data", panel.title), (20, 20), (FONT, 16).into_font()))?;
        return Ok(());
    };

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, (FONT, 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(64)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let ticks = &panel.x_ticks;
    let categorical = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < ticks.len() {
            ticks[i as usize].clone()
        } else {
            String::new()
        }
    };
    let whole = |x: &f64| format!("{x:.0}");
    let is_heatmap = panel.series.iter().any(|s| matches!(s, Series::Heatmap(_)));

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(panel.x_label.as_str()).y_desc(panel.y_label.as_str());
        if ticks.is_empty() {
            mesh.x_label_formatter(&whole);
        } else {
            mesh.x_labels(ticks.len() + 1).x_label_formatter(&categorical);
        }
        if is_heatmap {
            mesh.disable_mesh().y_label_formatter(&whole);
        }
        mesh.draw()?;
    }

    let mut labelled = false;
    for series in &panel.series {
        match series {
            Series::Line {
                name,
                points,
                color,
                dash,
                markers,
            } => {
                let color = rgb(*color);
                let style = color.stroke_width(2);
                let anno = match dash {
                    Dash::Solid => chart.draw_series(LineSeries::new(points.iter().map(|p| (p[0], p[1])), style))?,
                    Dash::Dashed => chart.draw_series(
                        points
                            .windows(2)
                            .step_by(2)
                            .map(|w| PathElement::new(vec![(w[0][0], w[0][1]), (w[1][0], w[1][1])], style)),
                    )?,
                };
                anno.label(name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                labelled = true;
                if *markers {
                    chart.draw_series(points.iter().map(|p| Circle::new((p[0], p[1]), 3, color.filled())))?;
                }
            }
            Series::Bars {
                name,
                bars,
                width,
                color,
            } => {
                let fill = rgb(*color).filled();
                let half = width / 2.0;
                chart
                    .draw_series(
                        bars.iter()
                            .map(|b| Rectangle::new([(b.x - half, 0.0), (b.x + half, b.y)], fill)),
                    )?
                    .label(name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], fill));
                labelled = true;

                let whisker = BLACK.stroke_width(1);
                let cap = half / 3.0;
                chart.draw_series(
                    bars.iter()
                        .filter_map(|b| b.error.map(|e| (b.x, b.y - e, b.y + e)))
                        .flat_map(|(x, lo, hi)| {
                            [
                                PathElement::new(vec![(x, lo), (x, hi)], whisker),
                                PathElement::new(vec![(x - cap, lo), (x + cap, lo)], whisker),
                                PathElement::new(vec![(x - cap, hi), (x + cap, hi)], whisker),
                            ]
                        }),
                )?;
            }
            Series::Boxes { boxes, color, .. } => {
                let fill = rgb(*color).mix(0.45).filled();
                let edge = rgb(*color).stroke_width(1);
                let line = BLACK.stroke_width(1);
                chart.draw_series(
                    boxes
                        .iter()
                        .map(|b| Rectangle::new([(b.x - 0.3, b.q1), (b.x + 0.3, b.q3)], fill)),
                )?;
                chart.draw_series(
                    boxes
                        .iter()
                        .map(|b| Rectangle::new([(b.x - 0.3, b.q1), (b.x + 0.3, b.q3)], edge)),
                )?;
                chart.draw_series(boxes.iter().flat_map(|b| {
                    [
                        PathElement::new(vec![(b.x - 0.3, b.median), (b.x + 0.3, b.median)], BLACK.stroke_width(2)),
                        PathElement::new(vec![(b.x, b.min), (b.x, b.q1)], line),
                        PathElement::new(vec![(b.x, b.q3), (b.x, b.max)], line),
                        PathElement::new(vec![(b.x - 0.15, b.min), (b.x + 0.15, b.min)], line),
                        PathElement::new(vec![(b.x - 0.15, b.max), (b.x + 0.15, b.max)], line),
                    ]
                }))?;
            }
            Series::Heatmap(h) => {
                chart.draw_series(heatmap_cells(h))?;
            }
        }
    }

    if labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 13))
            .draw()?;
    }
    Ok(())
}

fn heatmap_cells(h: &Heatmap) -> impl Iterator<Item = Rectangle<(f64, f64)>> + '_ {
    h.rows.iter().zip(&h.values).flat_map(move |(&year, row)| {
        row.iter().enumerate().filter_map(move |(col, value)| {
            let value = (*value)?;
            let (x, y) = (col as f64, year as f64);
            Some(Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                rgb(h.map.color_for(value)).filled(),
            ))
        })
    })
}
