use std::fs;
use std::path::Path;

use rusty_climate::analysis::summary::render_report;
use rusty_climate::analysis::ClimateAnalysis;
use rusty_climate::config::{AnalysisOptions, ExportFormat, OutputOptions};
use rusty_climate::data::loader::load_file;
use rusty_climate::error::DataError;
use rusty_climate::export::export_all;
use rusty_climate::units::Unit;

const HEADER: &str = "Year,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec,J-D,D-N,DJF,MAM,JJA,SON";

/// A GISS-style file: title line, header, 1960–2023 with a warming trend and
/// a partial final year.
fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let mut text = String::from("Land-Ocean: Global Means\n");
    text.push_str(HEADER);
    text.push('\n');
    for year in 1960..=2023 {
        let base = (year - 1960) as f64 * 0.018 - 0.1;
        let cells: Vec<String> = (0..12)
            .map(|m| {
                if year == 2023 && m >= 6 {
                    "***".to_string()
                } else {
                    format!("{:.2}", base + (m as f64 - 5.5) * 0.005)
                }
            })
            .collect();
        text.push_str(&format!("{year},{},***,***,***,***,***,***\n", cells.join(",")));
    }
    let path = dir.join("GLB.Ts+dSST.csv");
    fs::write(&path, text).unwrap();
    path
}

fn analyse(path: &Path) -> ClimateAnalysis {
    let file = load_file(path).unwrap();
    let dataset = file.select(None).unwrap();
    ClimateAnalysis::compute(dataset, &AnalysisOptions::default())
}

#[test]
fn loads_and_aggregates_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analyse(&write_fixture(dir.path()));

    assert_eq!(analysis.dataset, "Land-Ocean: Global Means");
    assert_eq!(analysis.annual.len(), 64);
    assert_eq!(analysis.observations.len(), 63 * 12 + 6);

    let trend = analysis.trend.unwrap();
    assert!(trend.slope > 0.0);
    assert!((trend.slope_per_decade() - 0.18).abs() < 0.01);

    // 1960..=2023 → seven decades, the first without a change value
    assert_eq!(analysis.decadal.len(), 7);
    assert_eq!(analysis.decadal[0].decade, 1960);
    assert!(analysis.decadal[0].change.is_none());
    assert!(analysis.decadal[1..].iter().all(|d| d.change.unwrap() > 0.0));

    // trailing 10-year window drops the first nine years
    assert_eq!(analysis.moving_average.first().unwrap().0, 1969);
}

#[test]
fn stats_report_names_dataset_and_unit() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analyse(&write_fixture(dir.path()));
    let report = render_report(&analysis, Unit::Fahrenheit);
    assert!(report.contains("Dataset: Land-Ocean: Global Means"));
    assert!(report.contains("Date Range: 1960 - 2023"));
    assert!(report.contains("°F"));
}

#[test]
fn exports_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analyse(&write_fixture(dir.path()));

    for format in ExportFormat::ALL {
        let out = dir.path().join(format.extension());
        let output = OutputOptions {
            dir: out.clone(),
            format,
            width: 900,
            height: 700,
            ..OutputOptions::default()
        };
        let written = export_all(&analysis, &output).unwrap();
        assert_eq!(written.len(), 6, "{format}");

        for id in ["temperature_trends", "monthly_patterns", "seasonal_analysis", "decadal_changes"] {
            let path = out.join(format!("{id}.{}", format.extension()));
            let bytes = fs::read(&path).unwrap();
            assert!(!bytes.is_empty(), "{}", path.display());
            match format {
                ExportFormat::Png => assert!(bytes.starts_with(b"\x89PNG")),
                ExportFormat::Jpeg => assert!(bytes.starts_with(b"\xFF\xD8")),
                ExportFormat::Pdf => assert!(bytes.starts_with(b"%PDF-")),
                ExportFormat::Html => assert!(String::from_utf8(bytes).unwrap().contains("Plotly.newPlot")),
            }
        }

        let stats = fs::read_to_string(out.join("statistics.txt")).unwrap();
        assert!(stats.contains("Land-Ocean: Global Means"));
        let report = fs::read_to_string(out.join("report.html")).unwrap();
        assert!(report.contains(&format!("temperature_trends.{}", format.extension())));
    }
}

#[test]
fn missing_file_is_reported_before_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, DataError::NotFound { .. }));
}

#[test]
fn malformed_header_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Land-Ocean: Global Means\nYear,Jan,Feb\n1990,0.1,0.2\n").unwrap();
    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "Mar"));
}
