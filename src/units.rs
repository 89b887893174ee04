use std::fmt;

use serde::{Deserialize, Serialize};

/// Convert an absolute temperature from °C to °F.
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Convert an absolute temperature from °F to °C.
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Display unit for charts and reports.
///
/// Anomalies are temperature *differences*, so they only scale; the 32°
/// offset of [`celsius_to_fahrenheit`] does not apply to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Celsius, Unit::Fahrenheit];

    /// Convert an anomaly (or a rate such as °C/decade) given in °C.
    pub fn anomaly(self, celsius: f64) -> f64 {
        match self {
            Unit::Celsius => celsius,
            Unit::Fahrenheit => celsius * 9.0 / 5.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Celsius => write!(f, "Celsius"),
            Unit::Fahrenheit => write!(f, "Fahrenheit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_conversion_round_trips() {
        for x in [-40.0, -17.5, 0.0, 0.37, 21.3, 100.0, 1.0e6] {
            assert!((celsius_to_fahrenheit(fahrenheit_to_celsius(x)) - x).abs() < 1e-9);
            assert!((fahrenheit_to_celsius(celsius_to_fahrenheit(x)) - x).abs() < 1e-9);
        }
    }

    #[test]
    fn fixed_points() {
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 1e-12);
        assert!((celsius_to_fahrenheit(-40.0) + 40.0).abs() < 1e-12);
    }

    #[test]
    fn anomalies_scale_without_offset() {
        assert_eq!(Unit::Celsius.anomaly(1.5), 1.5);
        assert!((Unit::Fahrenheit.anomaly(1.0) - 1.8).abs() < 1e-12);
        assert_eq!(Unit::Fahrenheit.anomaly(0.0), 0.0);
    }
}
