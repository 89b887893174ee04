use super::AnnualPoint;

// ---------------------------------------------------------------------------
// Least-squares line
// ---------------------------------------------------------------------------

/// Ordinary least-squares fit `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Change per unit of x (°C/year when x is the year).
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Points used in the fit.
    pub n: usize,
}

impl LinearFit {
    /// Fit a line through `(x, y)` points.
    ///
    /// Returns `None` with fewer than two points or when every x is equal.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len();
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let x_mean = points.iter().map(|p| p.0).sum::<f64>() / nf;
        let y_mean = points.iter().map(|p| p.1).sum::<f64>() / nf;

        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
            let dx = x - x_mean;
            (sxx + dx * dx, sxy + dx * (y - y_mean))
        });
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let ss_tot: f64 = points.iter().map(|&(_, y)| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = points
            .iter()
            .map(|&(x, y)| (y - (slope * x + intercept)).powi(2))
            .sum();
        let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

        Some(Self {
            slope,
            intercept,
            r_squared,
            n,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Slope scaled to a ten-year step (°C/decade).
    pub fn slope_per_decade(&self) -> f64 {
        self.slope * 10.0
    }
}

/// Trend of annual means against year, skipping years without a mean.
pub fn annual_trend(annual: &[AnnualPoint]) -> Option<LinearFit> {
    let points: Vec<(f64, f64)> = annual
        .iter()
        .filter_map(|p| p.mean.map(|m| (p.year as f64, m)))
        .collect();
    LinearFit::fit(&points)
}

// ---------------------------------------------------------------------------
// Moving average and differences
// ---------------------------------------------------------------------------

/// Trailing `window`-year mean of the annual series.
///
/// The value for year *i* covers rows *i − window + 1 ..= i*. The first
/// `window − 1` years are dropped rather than averaged over a shorter
/// window. Missing annual means inside a window are skipped; a window with
/// no valid year yields nothing.
pub fn moving_average(annual: &[AnnualPoint], window: usize) -> Vec<(i32, f64)> {
    if window == 0 {
        return Vec::new();
    }
    annual
        .windows(window)
        .filter_map(|w| {
            let values: Vec<f64> = w.iter().filter_map(|p| p.mean).collect();
            let last = w.last()?;
            if values.is_empty() {
                return None;
            }
            Some((last.year, values.iter().sum::<f64>() / values.len() as f64))
        })
        .collect()
}

/// Change from the previous year, for consecutive years that both have a
/// mean.
pub fn year_over_year(annual: &[AnnualPoint]) -> Vec<(i32, f64)> {
    annual
        .windows(2)
        .filter_map(|w| match (w[0].mean, w[1].mean) {
            (Some(prev), Some(cur)) if w[1].year == w[0].year + 1 => Some((w[1].year, cur - prev)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[Option<f64>]) -> Vec<AnnualPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &mean)| AnnualPoint {
                year: 1900 + i as i32,
                mean,
                months: if mean.is_some() { 12 } else { 0 },
            })
            .collect()
    }

    #[test]
    fn exact_line_is_recovered() {
        let points: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, 0.5 * i as f64 - 3.0)).collect();
        let fit = LinearFit::fit(&points).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept + 3.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!((fit.slope_per_decade() - 5.0).abs() < 1e-12);
        assert!((fit.predict(4.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn slope_sign_follows_monotonic_series() {
        let rising = series(&[Some(-0.3), Some(-0.1), Some(0.0), Some(0.4), Some(0.9)]);
        let falling = series(&[Some(0.8), Some(0.5), Some(0.45), Some(0.1), Some(-0.2)]);
        for s in [rising, falling] {
            let fit = annual_trend(&s).unwrap();
            let delta = s.last().unwrap().mean.unwrap() - s[0].mean.unwrap();
            assert_eq!(fit.slope.signum(), delta.signum());
        }
    }

    #[test]
    fn degenerate_fits() {
        assert!(LinearFit::fit(&[(1.0, 2.0)]).is_none());
        assert!(LinearFit::fit(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
        assert!(annual_trend(&series(&[Some(1.0), None, None])).is_none());
    }

    #[test]
    fn moving_average_drops_leading_years() {
        let s = series(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let ma = moving_average(&s, 3);
        assert_eq!(ma, vec![(1902, 2.0), (1903, 3.0), (1904, 4.0)]);
        assert!(moving_average(&s, 6).is_empty());
        assert!(moving_average(&s, 0).is_empty());
    }

    #[test]
    fn moving_average_skips_missing_years() {
        let s = series(&[Some(1.0), None, Some(3.0), None, None]);
        let ma = moving_average(&s, 2);
        assert_eq!(ma, vec![(1901, 1.0), (1902, 3.0), (1903, 3.0)]);
    }

    #[test]
    fn year_over_year_needs_both_years() {
        let s = series(&[Some(0.1), Some(0.3), None, Some(0.2), Some(0.1)]);
        let diff = year_over_year(&s);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[0].0, 1901);
        assert!((diff[0].1 - 0.2).abs() < 1e-12);
        assert_eq!(diff[1].0, 1904);
        assert!((diff[1].1 + 0.1).abs() < 1e-12);
    }
}
