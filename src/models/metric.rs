//! Display metric selection

use super::ForecastDay;
use crate::error::RouteWeatherError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The single forecast field shown for every city on a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    MaxTemp,
    MinTemp,
    /// Precipitation probability in percent
    Precipitation,
    WindSpeed,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::MaxTemp,
        Metric::MinTemp,
        Metric::Precipitation,
        Metric::WindSpeed,
    ];

    #[must_use]
    pub fn extract(self, day: &ForecastDay) -> f64 {
        match self {
            Metric::MaxTemp => day.max_temp,
            Metric::MinTemp => day.min_temp,
            Metric::Precipitation => f64::from(day.precipitation.probability),
            Metric::WindSpeed => day.wind_speed,
        }
    }

    /// Identifier used in forms and query strings
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::MaxTemp => "max_temp",
            Metric::MinTemp => "min_temp",
            Metric::Precipitation => "precipitation",
            Metric::WindSpeed => "wind_speed",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Metric::MaxTemp => "Maximum temperature",
            Metric::MinTemp => "Minimum temperature",
            Metric::Precipitation => "Precipitation probability",
            Metric::WindSpeed => "Wind speed",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Metric::MaxTemp | Metric::MinTemp => "°C",
            Metric::Precipitation => "%",
            Metric::WindSpeed => "km/h",
        }
    }
}

impl FromStr for Metric {
    type Err = RouteWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                RouteWeatherError::validation(format!(
                    "Unknown metric '{s}'. Must be one of: {}",
                    Metric::ALL.map(Metric::as_str).join(", ")
                ))
            })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
