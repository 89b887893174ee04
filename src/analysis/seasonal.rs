use std::collections::BTreeMap;
use std::fmt;

use super::trend::LinearFit;
use crate::data::model::{Month, Observation};

/// Meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn of(month: Month) -> Season {
        match month {
            Month::Dec | Month::Jan | Month::Feb => Season::Winter,
            Month::Mar | Month::Apr | Month::May => Season::Spring,
            Month::Jun | Month::Jul | Month::Aug => Season::Summer,
            Month::Sep | Month::Oct | Month::Nov => Season::Fall,
        }
    }

    /// Year a month's season is credited to. December belongs to the
    /// following year's winter: winter 1991 is Dec 1990 + Jan/Feb 1991.
    pub fn year_of(year: i32, month: Month) -> i32 {
        if month == Month::Dec {
            year + 1
        } else {
            year
        }
    }

    /// Three-letter code used in the GISS tables.
    pub fn code(self) -> &'static str {
        match self {
            Season::Winter => "DJF",
            Season::Spring => "MAM",
            Season::Summer => "JJA",
            Season::Fall => "SON",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        write!(f, "{name} ({})", self.code())
    }
}

/// Mean anomaly of one season in one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalPoint {
    pub year: i32,
    pub season: Season,
    pub mean: f64,
    /// Valid months that went into the mean (1–3).
    pub months: usize,
}

/// Group long observations into seasonal means.
///
/// A season needs at least `min_months` valid months; missing months are
/// excluded rather than counted as zero. Output is ordered by year, then
/// season.
pub fn seasonal_means(observations: &[Observation], min_months: usize) -> Vec<SeasonalPoint> {
    let mut groups: BTreeMap<(i32, Season), (f64, usize)> = BTreeMap::new();
    for obs in observations {
        let key = (Season::year_of(obs.year, obs.month), Season::of(obs.month));
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += obs.anomaly;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .filter(|(_, (_, n))| *n >= min_months.max(1))
        .map(|((year, season), (sum, n))| SeasonalPoint {
            year,
            season,
            mean: sum / n as f64,
            months: n,
        })
        .collect()
}

/// Points of a single season, in year order.
pub fn series_for(points: &[SeasonalPoint], season: Season) -> Vec<(i32, f64)> {
    points
        .iter()
        .filter(|p| p.season == season)
        .map(|p| (p.year, p.mean))
        .collect()
}

/// Least-squares trend of each season against year.
pub fn seasonal_trends(points: &[SeasonalPoint]) -> Vec<(Season, Option<LinearFit>)> {
    Season::ALL
        .iter()
        .map(|&season| {
            let xy: Vec<(f64, f64)> = series_for(points, season)
                .into_iter()
                .map(|(y, v)| (y as f64, v))
                .collect();
            (season, LinearFit::fit(&xy))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, month: Month, anomaly: f64) -> Observation {
        Observation {
            year,
            month,
            anomaly,
        }
    }

    #[test]
    fn month_to_season_map() {
        assert_eq!(Season::of(Month::Dec), Season::Winter);
        assert_eq!(Season::of(Month::Feb), Season::Winter);
        assert_eq!(Season::of(Month::Mar), Season::Spring);
        assert_eq!(Season::of(Month::Aug), Season::Summer);
        assert_eq!(Season::of(Month::Nov), Season::Fall);
    }

    #[test]
    fn december_joins_next_winter() {
        let data = vec![
            obs(1990, Month::Dec, 0.3),
            obs(1991, Month::Jan, 0.6),
            obs(1991, Month::Feb, 0.9),
            obs(1991, Month::Dec, 5.0),
        ];
        let points = seasonal_means(&data, 3);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 1991);
        assert_eq!(points[0].season, Season::Winter);
        assert!((points[0].mean - 0.6).abs() < 1e-12);

        let partial = seasonal_means(&data, 1);
        assert_eq!(partial.len(), 2);
        assert_eq!(partial[1].year, 1992);
        assert_eq!(partial[1].months, 1);
    }

    #[test]
    fn missing_month_is_excluded_not_zeroed() {
        let data = vec![obs(2000, Month::Jun, 1.0), obs(2000, Month::Aug, 2.0)];
        let points = seasonal_means(&data, 2);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].season, Season::Summer);
        assert!((points[0].mean - 1.5).abs() < 1e-12);
    }

    #[test]
    fn trends_per_season() {
        let mut data = Vec::new();
        for (i, year) in (2000..2010).enumerate() {
            for m in [Month::Mar, Month::Apr, Month::May] {
                data.push(obs(year, m, i as f64 * 0.02));
            }
        }
        let points = seasonal_means(&data, 3);
        let trends = seasonal_trends(&points);
        assert_eq!(trends.len(), 4);
        let spring = trends.iter().find(|(s, _)| *s == Season::Spring).unwrap();
        assert!((spring.1.unwrap().slope - 0.02).abs() < 1e-12);
        assert!(trends.iter().find(|(s, _)| *s == Season::Winter).unwrap().1.is_none());
    }
}
