use std::collections::BTreeMap;

use super::stats::{mean, sample_std};
use super::AnnualPoint;

/// Bucket key of a year: the first year of its decade.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Aggregate of one decade's annual means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecadeStats {
    pub decade: i32,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single member year.
    pub std_dev: Option<f64>,
    pub count: usize,
    /// Difference from the previous listed decade's mean.
    pub change: Option<f64>,
}

/// Group annual means into decades. Years without a mean are left out.
pub fn decadal_stats(annual: &[AnnualPoint]) -> Vec<DecadeStats> {
    let mut buckets: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for p in annual {
        if let Some(m) = p.mean {
            buckets.entry(decade_of(p.year)).or_default().push(m);
        }
    }

    let mut out: Vec<DecadeStats> = Vec::with_capacity(buckets.len());
    for (decade, values) in buckets {
        let Some(m) = mean(&values) else { continue };
        let change = out.last().map(|prev| m - prev.mean);
        out.push(DecadeStats {
            decade,
            mean: m,
            std_dev: sample_std(&values),
            count: values.len(),
            change,
        });
    }
    out
}
