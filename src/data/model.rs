use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Month – one of the 12 monthly columns
// ---------------------------------------------------------------------------

/// Calendar month, numbered 1–12 like the GISS column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Month from its 1-based number.
    pub fn from_number(n: u32) -> Option<Month> {
        match n {
            1..=12 => Some(Self::ALL[n as usize - 1]),
            _ => None,
        }
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// 0-based position in a [`MonthlyRow`].
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Column header used by the GISS files.
    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

// ---------------------------------------------------------------------------
// Observation – one cell of the long table
// ---------------------------------------------------------------------------

/// A single monthly anomaly in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub month: Month,
    pub anomaly: f64,
}

// ---------------------------------------------------------------------------
// MonthlyRow – one row of the wide CSV
// ---------------------------------------------------------------------------

/// The 12 monthly cells of one year. `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyRow {
    pub months: [Option<f64>; 12],
}

impl MonthlyRow {
    pub fn new(months: [Option<f64>; 12]) -> Self {
        Self { months }
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.months[month.index()]
    }

    /// Valid (month, value) pairs in calendar order.
    pub fn valid(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        Month::ALL
            .iter()
            .zip(self.months.iter())
            .filter_map(|(&m, v)| v.map(|v| (m, v)))
    }

    pub fn valid_count(&self) -> usize {
        self.months.iter().filter(|v| v.is_some()).count()
    }

    /// Mean of the valid months, or `None` when fewer than `min_months` exist.
    pub fn mean(&self, min_months: usize) -> Option<f64> {
        let n = self.valid_count();
        if n == 0 || n < min_months {
            return None;
        }
        Some(self.valid().map(|(_, v)| v).sum::<f64>() / n as f64)
    }
}

// ---------------------------------------------------------------------------
// ClimateDataset – one section of a GISS file, indexed by year
// ---------------------------------------------------------------------------

/// One temperature series (a section of the source file).
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateDataset {
    /// Section name, e.g. `GHCNv4/ERSSTv5`.
    pub name: String,
    /// Rows keyed by year, ascending.
    pub rows: BTreeMap<i32, MonthlyRow>,
}

impl ClimateDataset {
    pub fn new(name: impl Into<String>, rows: BTreeMap<i32, MonthlyRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, year: i32) -> Option<&MonthlyRow> {
        self.rows.get(&year)
    }

    /// First and last year present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = *self.rows.keys().next()?;
        let last = *self.rows.keys().next_back()?;
        Some((first, last))
    }

    /// Number of missing cells across the table.
    pub fn missing_cells(&self) -> usize {
        self.rows.values().map(|r| 12 - r.valid_count()).sum()
    }
}

// ---------------------------------------------------------------------------
// DataFile – every section of one loaded file
// ---------------------------------------------------------------------------

/// Section preferred when a file carries several.
pub const PREFERRED_SECTION: &str = "GHCNv4/ERSSTv5";

/// A loaded file: one or more named datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFile {
    pub path: PathBuf,
    pub datasets: Vec<ClimateDataset>,
}

impl DataFile {
    pub fn names(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.name.clone()).collect()
    }

    /// Index of the dataset shown when nothing was requested.
    pub fn default_index(&self) -> usize {
        self.datasets
            .iter()
            .position(|d| d.name == PREFERRED_SECTION)
            .unwrap_or(0)
    }

    pub fn index_of(&self, name: &str) -> Result<usize, DataError> {
        self.datasets
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| DataError::UnknownSection {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Dataset by name, or the default one when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<&ClimateDataset, DataError> {
        let idx = match name {
            Some(n) => self.index_of(n)?,
            None => self.default_index(),
        };
        Ok(&self.datasets[idx])
    }
}
