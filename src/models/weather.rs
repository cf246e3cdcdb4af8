//! Current conditions reading and display methods

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single current-conditions reading for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Local observation time
    pub observed_at: DateTime<FixedOffset>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Free-text condition phrase, e.g. "Light rain"
    pub condition: String,
    /// Probability of precipitation today (0-100%)
    pub precipitation_probability: u8,
}

impl CurrentConditions {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} km/h", self.wind_speed)
    }
}
