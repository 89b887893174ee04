//! Writes a full report: every chart, `statistics.txt` and an index page.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::summary::render_report;
use crate::analysis::ClimateAnalysis;
use crate::chart::{self, build::all_figures, Figure};
use crate::config::{ExportFormat, OutputOptions};

pub const STATISTICS_FILE: &str = "statistics.txt";
pub const REPORT_FILE: &str = "report.html";

/// Export everything into `output.dir`, returning the paths written in order.
pub fn export_all(analysis: &ClimateAnalysis, output: &OutputOptions) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&output.dir)
        .with_context(|| format!("creating output directory {}", output.dir.display()))?;

    let figures = all_figures(analysis, output.unit);
    let mut written = Vec::with_capacity(figures.len() + 2);

    for figure in &figures {
        let path = output.dir.join(file_name(figure, output.format));
        chart::render_to_file(figure, output.format, (output.width, output.height), &path)?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }

    let stats_path = output.dir.join(STATISTICS_FILE);
    fs::write(&stats_path, render_report(analysis, output.unit))
        .with_context(|| format!("writing {}", stats_path.display()))?;
    log::info!("Wrote {}", stats_path.display());
    written.push(stats_path);

    let report_path = output.dir.join(REPORT_FILE);
    fs::write(&report_path, report_page(analysis, &figures, output))
        .with_context(|| format!("writing {}", report_path.display()))?;
    log::info!("Wrote {}", report_path.display());
    written.push(report_path);

    Ok(written)
}

fn file_name(figure: &Figure, format: ExportFormat) -> String {
    format!("{}.{}", figure.id, format.extension())
}

fn report_page(analysis: &ClimateAnalysis, figures: &[Figure], output: &OutputOptions) -> String {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let body: String = figures
        .iter()
        .map(|figure| {
            let file = file_name(figure, output.format);
            let embed = match output.format {
                ExportFormat::Html => format!(
                    r#"<iframe src="{file}" width="100%" height="{}px" frameborder="0"></iframe>"#,
                    output.height + 20
                ),
                ExportFormat::Png | ExportFormat::Jpeg => {
                    format!(r#"<img src="{file}" alt="{}" style="max-width:100%">"#, escape(&figure.title))
                }
                ExportFormat::Pdf => format!(
                    r#"<embed src="{file}" type="application/pdf" width="100%" height="{}px"><p><a href="{file}">{file}</a></p>"#,
                    output.height
                ),
            };
            format!("<div class=\"viz\">\n<h2>{}</h2>\n{embed}\n</div>\n", escape(&figure.title))
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Climate Analysis Report</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 20px; }}
h1 {{ color: #2c3e50; }}
.viz {{ margin: 20px 0; }}
</style>
</head>
<body>
<h1>Climate Analysis Report</h1>
<p>Generated on: {generated}</p>
<p>Dataset: {dataset}</p>
<p>Units: {unit}. Summary statistics: <a href="{STATISTICS_FILE}">{STATISTICS_FILE}</a></p>
{body}</body>
</html>
"#,
        dataset = escape(&analysis.dataset),
        unit = output.unit,
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::AnalysisOptions;
    use crate::data::model::{ClimateDataset, MonthlyRow};

    fn analysis() -> ClimateAnalysis {
        let mut rows = BTreeMap::new();
        for year in 1990..2010 {
            let v = (year - 1990) as f64 * 0.02;
            rows.insert(year, MonthlyRow::new([Some(v); 12]));
        }
        ClimateAnalysis::compute(&ClimateDataset::new("GHCNv4/ERSSTv5", rows), &AnalysisOptions::default())
    }

    #[test]
    fn report_embeds_every_chart() {
        let a = analysis();
        let output = OutputOptions {
            format: ExportFormat::Png,
            ..OutputOptions::default()
        };
        let figures = all_figures(&a, output.unit);
        let page = report_page(&a, &figures, &output);
        for f in &figures {
            assert!(page.contains(&format!(r#"<img src="{}.png""#, f.id)));
        }
        assert!(page.contains("Dataset: GHCNv4/ERSSTv5"));
        assert!(page.contains("Generated on: "));
    }

    #[test]
    fn writes_html_export() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputOptions {
            dir: dir.path().join("out"),
            ..OutputOptions::default()
        };
        let written = export_all(&analysis(), &output).unwrap();
        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|p| p.exists()));
        assert!(output.dir.join("temperature_trends.html").exists());
        let stats = fs::read_to_string(output.dir.join(STATISTICS_FILE)).unwrap();
        assert!(stats.contains("GHCNv4/ERSSTv5"));
    }
}
