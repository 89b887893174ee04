//! Interactive charts: a standalone page that draws a [`Figure`] with
//! plotly.js loaded from its CDN.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use super::{Dash, Figure, Panel, Series};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const BACKGROUND: &str = "#111111";
const GRID: &str = "#333333";
const TEXT: &str = "#e0e0e0";

/// Complete HTML document for `figure`, `height` pixels tall.
pub fn render_page(figure: &Figure, height: u32) -> Result<String> {
    let payload = serde_json::to_string(&figure_json(figure, height))
        .with_context(|| format!("serialising figure '{}'", figure.id))?;
    // A literal "</script>" inside the JSON would end the script block.
    let payload = payload.replace("</", "<\\/");
    let title = escape(&figure.title);
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body style="margin:0;background:{BACKGROUND}">
<div id="chart" style="width:100%;height:{height}px"></div>
<script>
const figure = {payload};
Plotly.newPlot("chart", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#
    ))
}

/// Plotly `{data, layout}` object for `figure`, one subplot row per panel.
pub fn figure_json(figure: &Figure, height: u32) -> Value {
    let rows = figure.panels.len().max(1);
    let mut data = Vec::new();
    let mut layout = Map::new();
    let mut annotations = Vec::new();

    layout.insert("title".into(), json!({ "text": figure.title, "x": 0.5 }));
    layout.insert("height".into(), json!(height));
    layout.insert("paper_bgcolor".into(), json!(BACKGROUND));
    layout.insert("plot_bgcolor".into(), json!(BACKGROUND));
    layout.insert("font".into(), json!({ "color": TEXT }));
    layout.insert("showlegend".into(), json!(true));
    layout.insert(
        "grid".into(),
        json!({ "rows": rows, "columns": 1, "pattern": "independent", "ygap": 0.35 }),
    );

    for (i, panel) in figure.panels.iter().enumerate() {
        let suffix = if i == 0 { String::new() } else { (i + 1).to_string() };
        let (xref, yref) = (format!("x{suffix}"), format!("y{suffix}"));

        for series in &panel.series {
            let mut trace = trace_json(series, panel);
            if let Value::Object(map) = &mut trace {
                map.insert("xaxis".into(), json!(xref));
                map.insert("yaxis".into(), json!(yref));
            }
            data.push(trace);
        }

        layout.insert(format!("xaxis{suffix}"), x_axis_json(panel));
        layout.insert(
            format!("yaxis{suffix}"),
            json!({ "title": { "text": panel.y_label }, "gridcolor": GRID, "zerolinecolor": GRID }),
        );
        annotations.push(json!({
            "text": format!("<b>{}</b>", escape(&panel.title)),
            "xref": format!("{xref} domain"),
            "yref": format!("{yref} domain"),
            "x": 0.5,
            "y": 1.0,
            "yanchor": "bottom",
            "showarrow": false,
        }));
    }
    layout.insert("annotations".into(), Value::Array(annotations));

    json!({ "data": data, "layout": Value::Object(layout) })
}

fn x_axis_json(panel: &Panel) -> Value {
    let mut axis = json!({
        "title": { "text": panel.x_label },
        "gridcolor": GRID,
        "zerolinecolor": GRID,
    });
    if !panel.x_ticks.is_empty() {
        axis["tickmode"] = json!("array");
        axis["tickvals"] = json!((0..panel.x_ticks.len()).collect::<Vec<_>>());
        axis["ticktext"] = json!(panel.x_ticks);
    }
    axis
}

fn trace_json(series: &Series, panel: &Panel) -> Value {
    match series {
        Series::Line {
            name,
            points,
            color,
            dash,
            markers,
        } => json!({
            "type": "scatter",
            "mode": if *markers { "lines+markers" } else { "lines" },
            "name": name,
            "x": points.iter().map(|p| p[0]).collect::<Vec<_>>(),
            "y": points.iter().map(|p| p[1]).collect::<Vec<_>>(),
            "line": {
                "color": color.to_hex(),
                "width": 2,
                "dash": match dash { Dash::Solid => "solid", Dash::Dashed => "dash" },
            },
            "marker": { "size": 5 },
        }),
        Series::Bars {
            name,
            bars,
            width,
            color,
        } => {
            let mut trace = json!({
                "type": "bar",
                "name": name,
                "x": bars.iter().map(|b| b.x).collect::<Vec<_>>(),
                "y": bars.iter().map(|b| b.y).collect::<Vec<_>>(),
                "width": width,
                "marker": { "color": color.to_hex() },
            });
            if bars.iter().any(|b| b.error.is_some()) {
                trace["error_y"] = json!({
                    "type": "data",
                    "visible": true,
                    "color": TEXT,
                    "array": bars.iter().map(|b| b.error.unwrap_or(0.0)).collect::<Vec<_>>(),
                });
            }
            trace
        }
        Series::Boxes { name, boxes, color } => json!({
            "type": "box",
            "name": name,
            "x": boxes.iter().map(|b| b.x).collect::<Vec<_>>(),
            "q1": boxes.iter().map(|b| b.q1).collect::<Vec<_>>(),
            "median": boxes.iter().map(|b| b.median).collect::<Vec<_>>(),
            "q3": boxes.iter().map(|b| b.q3).collect::<Vec<_>>(),
            "lowerfence": boxes.iter().map(|b| b.min).collect::<Vec<_>>(),
            "upperfence": boxes.iter().map(|b| b.max).collect::<Vec<_>>(),
            "marker": { "color": color.to_hex() },
            "text": boxes.iter().map(|b| b.label.as_str()).collect::<Vec<_>>(),
        }),
        Series::Heatmap(h) => json!({
            "type": "heatmap",
            "name": h.value_label,
            "x": (0..h.column_labels.len()).collect::<Vec<_>>(),
            "y": h.rows,
            "z": h.values,
            "text": h.rows.iter().map(|_| h.column_labels.clone()).collect::<Vec<_>>(),
            "hovertemplate": format!("%{{text}} %{{y}}: %{{z:.2f}}<extra>{}</extra>", escape(&panel.title)),
            "colorscale": "RdBu",
            "reversescale": true,
            "zmid": 0,
            "zmin": -h.map.limit,
            "zmax": h.map.limit,
            "colorbar": { "title": { "text": h.value_label } },
            "showlegend": false,
        }),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Bar, Heatmap};
    use crate::color::{DivergingMap, Rgb};

    fn figure() -> Figure {
        Figure {
            id: "demo",
            title: "Demo <figure>".into(),
            panels: vec![
                Panel {
                    title: "Line".into(),
                    x_label: "Year".into(),
                    y_label: "°C".into(),
                    x_ticks: Vec::new(),
                    series: vec![Series::Line {
                        name: "trend </script>".into(),
                        points: vec![[2000.0, 0.1], [2001.0, 0.2]],
                        color: Rgb::new(255, 0, 0),
                        dash: Dash::Dashed,
                        markers: false,
                    }],
                },
                Panel {
                    title: "Heat".into(),
                    x_label: "Month".into(),
                    y_label: "Year".into(),
                    x_ticks: vec!["Jan".into(), "Feb".into()],
                    series: vec![
                        Series::Heatmap(Heatmap {
                            column_labels: vec!["Jan".into(), "Feb".into()],
                            rows: vec![2000],
                            values: vec![vec![Some(0.3), None]],
                            map: DivergingMap { limit: 0.3 },
                            value_label: "°C".into(),
                        }),
                        Series::Bars {
                            name: "bars".into(),
                            bars: vec![Bar { x: 0.0, y: 1.0, error: Some(0.2) }],
                            width: 0.8,
                            color: Rgb::new(0, 0, 255),
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn traces_are_bound_to_their_subplot() {
        let v = figure_json(&figure(), 600);
        let data = v["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["xaxis"], "x");
        assert_eq!(data[0]["line"]["dash"], "dash");
        assert_eq!(data[1]["xaxis"], "x2");
        assert_eq!(data[1]["yaxis"], "y2");
        assert_eq!(data[1]["z"][0][1], Value::Null);
        assert_eq!(data[1]["zmid"], 0);
        assert_eq!(data[2]["error_y"]["array"][0], 0.2);

        let layout = &v["layout"];
        assert_eq!(layout["grid"]["rows"], 2);
        assert_eq!(layout["xaxis2"]["ticktext"][1], "Feb");
        assert!(layout["xaxis"].get("ticktext").is_none());
        assert_eq!(layout["annotations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn page_is_self_contained_and_escaped() {
        let page = render_page(&figure(), 600).unwrap();
        assert!(page.contains(PLOTLY_CDN));
        assert!(page.contains("<title>Demo &lt;figure&gt;</title>"));
        assert!(page.contains("height:600px"));
        assert_eq!(page.matches("</script>").count(), 2);
    }
}
