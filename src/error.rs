use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a GISS temperature file.
///
/// Missing cells are never an error: they are loaded as `None` and skipped by
/// every aggregate. Only problems that make the table itself unusable end up
/// here.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV syntax error: {0}")]
    Csv(#[from] csv::Error),

    #[error("section '{section}' has no header row starting with 'Year'")]
    MissingHeader { section: String },

    #[error("section '{section}' is missing required column '{column}'")]
    MissingColumn { section: String, column: String },

    #[error("section '{section}' lists year {year} more than once")]
    DuplicateYear { section: String, year: i32 },

    #[error("section '{section}' contains no data rows")]
    Empty { section: String },

    #[error("unknown dataset '{name}' (available: {})", available.join(", "))]
    UnknownSection { name: String, available: Vec<String> },
}
