/// Data layer: core types, loading, and reshaping.
///
/// Architecture:
/// ```text
///  GLB.Ts+dSST.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split sections, parse rows → DataFile
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ ClimateDataset │  BTreeMap<year, MonthlyRow>
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  wide → long (year, month, anomaly)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod reshape;
