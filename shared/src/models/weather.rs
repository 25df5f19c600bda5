//! Weather data models

use serde::{Deserialize, Serialize};

/// Current conditions plus the hourly precipitation series for one point.
///
/// `hourly_precipitation` and `hourly_timestamps` are matched by index.
/// Produced fresh for every request and discarded after use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    /// Current air temperature in °C
    pub temperature: f64,
    /// Precipitation (mm) of the hourly slot whose timestamp equals the
    /// current-conditions timestamp, 0 when there is no such slot
    pub current_precipitation: f64,
    pub hourly_precipitation: Vec<f64>,
    pub hourly_timestamps: Vec<String>,
}

impl WeatherSnapshot {
    /// Build a snapshot from a forecast payload, deriving the current
    /// precipitation from the hourly series.
    pub fn from_forecast(
        temperature: f64,
        current_time: &str,
        hourly_timestamps: Vec<String>,
        hourly_precipitation: Vec<f64>,
    ) -> Self {
        let current_precipitation =
            precipitation_at(current_time, &hourly_timestamps, &hourly_precipitation);

        Self {
            temperature,
            current_precipitation,
            hourly_precipitation,
            hourly_timestamps,
        }
    }
}

/// Look up the precipitation of the hourly slot labelled `current_time`.
///
/// The match is exact string equality on the timestamp label, first hit wins.
/// Any format or timezone mismatch between the two labels silently yields 0.
pub fn precipitation_at(current_time: &str, timestamps: &[String], precipitation: &[f64]) -> f64 {
    timestamps
        .iter()
        .position(|t| t == current_time)
        .and_then(|idx| precipitation.get(idx).copied())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_current_precipitation_exact_match() {
        let snapshot = WeatherSnapshot::from_forecast(
            31.5,
            "2024-07-01T14:00",
            hours(&["2024-07-01T13:00", "2024-07-01T14:00", "2024-07-01T15:00"]),
            vec![0.2, 1.4, 3.0],
        );
        assert_eq!(snapshot.current_precipitation, 1.4);
    }

    #[test]
    fn test_current_precipitation_defaults_to_zero_on_format_mismatch() {
        // Seconds on the current timestamp are enough to miss the slot
        let snapshot = WeatherSnapshot::from_forecast(
            31.5,
            "2024-07-01T14:00:00",
            hours(&["2024-07-01T13:00", "2024-07-01T14:00"]),
            vec![0.2, 1.4],
        );
        assert_eq!(snapshot.current_precipitation, 0.0);
    }

    #[test]
    fn test_current_precipitation_missing_value() {
        let p = precipitation_at(
            "2024-07-01T14:00",
            &hours(&["2024-07-01T13:00", "2024-07-01T14:00"]),
            &[0.5],
        );
        assert_eq!(p, 0.0);
    }
}
