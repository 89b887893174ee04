use super::model::{ClimateDataset, Observation};

/// Melt the wide year×month table into long observations.
///
/// Ordered by year, then month. Missing cells produce no observation.
pub fn to_long(dataset: &ClimateDataset) -> Vec<Observation> {
    dataset
        .rows
        .iter()
        .flat_map(|(&year, row)| {
            row.valid().map(move |(month, anomaly)| Observation {
                year,
                month,
                anomaly,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{Month, MonthlyRow};

    #[test]
    fn melts_in_year_month_order_and_drops_missing() {
        let mut first = [Some(0.1); 12];
        first[1] = None;
        let mut rows = BTreeMap::new();
        rows.insert(2001, MonthlyRow::new([Some(0.2); 12]));
        rows.insert(2000, MonthlyRow::new(first));
        let ds = ClimateDataset::new("test", rows);

        let long = to_long(&ds);
        assert_eq!(long.len(), 23);
        assert_eq!(long[0].year, 2000);
        assert_eq!(long[0].month, Month::Jan);
        assert_eq!(long[1].month, Month::Mar);
        assert_eq!(long[11].year, 2001);
        assert!(long.iter().all(|o| o.anomaly > 0.0));
    }
}
