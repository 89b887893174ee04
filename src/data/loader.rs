use std::collections::BTreeMap;
use std::path::Path;

use csv::StringRecord;

use super::model::{ClimateDataset, DataFile, Month, MonthlyRow};
use crate::error::DataError;

/// Lines that open a new dataset inside a combined GISS file.
pub const SECTION_MARKERS: [&str; 3] = ["AIRS v6", "AIRS v7", "GHCNv4/ERSSTv5"];

/// Name given to a file's only section when it has neither marker nor title.
pub const DEFAULT_SECTION: &str = "GISTEMP";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every dataset contained in a GISS temperature CSV.
///
/// Accepted layouts:
/// * the plain `GLB.Ts+dSST.csv` download: an optional title line, then a
///   `Year,Jan,...,Dec,J-D,...` header and one row per year
/// * a combined file where `AIRS v6` / `AIRS v7` / `GHCNv4/ERSSTv5` marker
///   lines each start their own header and rows
///
/// Cells made only of `*` are missing values and load as `None`.
pub fn load_file(path: &Path) -> Result<DataFile, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let datasets = parse_str(&text)?;
    for ds in &datasets {
        let (first, last) = ds.year_range().unwrap_or_default();
        log::info!(
            "Loaded '{}': {} years ({first}–{last}), {} missing cells",
            ds.name,
            ds.len(),
            ds.missing_cells()
        );
    }

    Ok(DataFile {
        path: path.to_path_buf(),
        datasets,
    })
}

/// Parse file contents into one dataset per section.
pub fn parse_str(text: &str) -> Result<Vec<ClimateDataset>, DataError> {
    let text = text.trim_start_matches('\u{feff}');
    let sections = split_sections(text);
    if sections.is_empty() {
        return Err(DataError::MissingHeader {
            section: DEFAULT_SECTION.to_string(),
        });
    }
    sections.iter().map(parse_section).collect()
}

/// `true` for the `***` style markers and for empty cells.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.chars().all(|c| c == '*')
}

// ---------------------------------------------------------------------------
// Section splitting
// ---------------------------------------------------------------------------

struct RawSection<'a> {
    marker: Option<&'static str>,
    lines: Vec<&'a str>,
}

fn split_sections(text: &str) -> Vec<RawSection<'_>> {
    let mut sections: Vec<RawSection<'_>> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(marker) = section_marker(trimmed) {
            sections.push(RawSection {
                marker: Some(marker),
                lines: Vec::new(),
            });
            continue;
        }
        if sections.is_empty() {
            sections.push(RawSection {
                marker: None,
                lines: Vec::new(),
            });
        }
        if let Some(current) = sections.last_mut() {
            current.lines.push(line);
        }
    }

    // Title lines ahead of the first marker are a preamble, not a dataset.
    if sections.iter().any(|s| s.marker.is_some()) {
        sections.retain(|s| s.marker.is_some() || s.lines.iter().any(|l| is_header(l)));
    }
    sections
}

fn section_marker(line: &str) -> Option<&'static str> {
    if is_header(line) {
        return None;
    }
    SECTION_MARKERS.iter().copied().find(|m| line.contains(m))
}

fn is_header(line: &str) -> bool {
    line.split(',').next().map(str::trim) == Some("Year")
}

// ---------------------------------------------------------------------------
// Section parsing
// ---------------------------------------------------------------------------

fn parse_section(raw: &RawSection<'_>) -> Result<ClimateDataset, DataError> {
    let header_pos = raw.lines.iter().position(|l| is_header(l));
    let title = raw.lines[..header_pos.unwrap_or(raw.lines.len())]
        .first()
        .map(|l| l.trim().trim_end_matches(',').trim().to_string())
        .filter(|t| !t.is_empty());

    let name = match (raw.marker, title) {
        (Some(marker), _) => marker.to_string(),
        (None, Some(title)) => title,
        (None, None) => DEFAULT_SECTION.to_string(),
    };

    let header_pos = header_pos.ok_or_else(|| DataError::MissingHeader {
        section: name.clone(),
    })?;
    let body = raw.lines[header_pos..].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();

    let year_idx = column_index(&headers, "Year", &name)?;
    let mut month_idx = [0usize; 12];
    for month in Month::ALL {
        month_idx[month.index()] = column_index(&headers, month.abbrev(), &name)?;
    }

    let mut rows = BTreeMap::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let year_cell = record.get(year_idx).unwrap_or("");
        let Ok(year) = year_cell.parse::<i32>() else {
            log::warn!("'{name}' row {row_no}: skipping non-numeric year '{year_cell}'");
            continue;
        };

        let mut months = [None; 12];
        for month in Month::ALL {
            let cell = record.get(month_idx[month.index()]).unwrap_or("");
            months[month.index()] = parse_cell(cell, year, month);
        }

        if rows.insert(year, MonthlyRow::new(months)).is_some() {
            return Err(DataError::DuplicateYear {
                section: name,
                year,
            });
        }
    }

    if rows.is_empty() {
        return Err(DataError::Empty { section: name });
    }
    Ok(ClimateDataset::new(name, rows))
}

fn column_index(headers: &StringRecord, column: &str, section: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| DataError::MissingColumn {
            section: section.to_string(),
            column: column.to_string(),
        })
}

fn parse_cell(cell: &str, year: i32, month: Month) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::warn!("{year} {month}: treating unparseable value '{cell}' as missing");
            None
        }
    }
}
