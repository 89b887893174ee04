use std::fmt;

use super::stats::{mean, sample_std};
use super::AnnualPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeKind {
    Warm,
    Cold,
}

impl fmt::Display for ExtremeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtremeKind::Warm => f.pad("warm"),
            ExtremeKind::Cold => f.pad("cold"),
        }
    }
}

/// A year whose annual anomaly lies more than kσ from the series mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeYear {
    pub year: i32,
    pub anomaly: f64,
    pub z_score: f64,
    pub kind: ExtremeKind,
}

/// Flag years above `mean + k·σ` (warm) or below `mean − k·σ` (cold).
///
/// σ is the sample standard deviation of the annual means. Nothing is
/// flagged when σ is undefined or zero.
pub fn detect_extremes(annual: &[AnnualPoint], k: f64) -> Vec<ExtremeYear> {
    let values: Vec<f64> = annual.iter().filter_map(|p| p.mean).collect();
    let (Some(mu), Some(sigma)) = (mean(&values), sample_std(&values)) else {
        return Vec::new();
    };
    if sigma == 0.0 {
        return Vec::new();
    }

    annual
        .iter()
        .filter_map(|p| {
            let anomaly = p.mean?;
            let z_score = (anomaly - mu) / sigma;
            let kind = if z_score > k {
                ExtremeKind::Warm
            } else if z_score < -k {
                ExtremeKind::Cold
            } else {
                return None;
            };
            Some(ExtremeYear {
                year: p.year,
                anomaly,
                z_score,
                kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annual(values: &[f64]) -> Vec<AnnualPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| AnnualPoint {
                year: 1950 + i as i32,
                mean: Some(v),
                months: 12,
            })
            .collect()
    }

    #[test]
    fn flags_single_spike() {
        let mut values = vec![0.0; 20];
        values[7] = 3.0;
        let extremes = detect_extremes(&annual(&values), 2.0);
        assert_eq!(extremes.len(), 1);
        assert_eq!(extremes[0].year, 1957);
        assert_eq!(extremes[0].kind, ExtremeKind::Warm);
        assert!(extremes[0].z_score > 2.0);
    }

    #[test]
    fn flags_cold_dip() {
        let mut values = vec![0.5; 20];
        values[3] = -2.5;
        let extremes = detect_extremes(&annual(&values), 2.0);
        assert_eq!(extremes.len(), 1);
        assert_eq!(extremes[0].kind, ExtremeKind::Cold);
    }

    #[test]
    fn larger_k_flags_fewer_years() {
        let values: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin() + if i == 12 { 2.5 } else { 0.0 }).collect();
        let loose = detect_extremes(&annual(&values), 1.0).len();
        let strict = detect_extremes(&annual(&values), 2.5).len();
        assert!(strict <= loose);
    }

    #[test]
    fn flat_series_has_no_extremes() {
        assert!(detect_extremes(&annual(&[0.3; 10]), 2.0).is_empty());
        assert!(detect_extremes(&annual(&[0.3]), 2.0).is_empty());
    }
}
