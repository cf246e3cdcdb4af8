//! Forecast models: single days, per-city series and whole routes

use super::{City, Metric};
use crate::error::RouteWeatherError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of forecast days a request may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayCount {
    One,
    #[default]
    Three,
    Five,
}

impl DayCount {
    #[must_use]
    pub fn days(self) -> usize {
        match self {
            DayCount::One => 1,
            DayCount::Three => 3,
            DayCount::Five => 5,
        }
    }

    /// Path segment of the daily forecast endpoint that covers this many days
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            DayCount::One => "1day",
            DayCount::Three | DayCount::Five => "5day",
        }
    }
}

impl TryFrom<u8> for DayCount {
    type Error = RouteWeatherError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DayCount::One),
            3 => Ok(DayCount::Three),
            5 => Ok(DayCount::Five),
            other => Err(RouteWeatherError::validation(format!(
                "Day count must be 1, 3 or 5, got: {other}"
            ))),
        }
    }
}

impl From<DayCount> for u8 {
    fn from(value: DayCount) -> Self {
        match value {
            DayCount::One => 1,
            DayCount::Three => 3,
            DayCount::Five => 5,
        }
    }
}

impl FromStr for DayCount {
    type Err = RouteWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| RouteWeatherError::validation(format!("Day count is not a number: {s}")))?;
        DayCount::try_from(value)
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// Precipitation indicator for a forecast day
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Precipitation {
    /// Whether any precipitation is expected
    pub expected: bool,
    /// Probability of precipitation (0-100%)
    pub probability: u8,
}

/// One day of forecast for a single location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Minimum temperature in Celsius
    pub min_temp: f64,
    /// Maximum temperature in Celsius
    pub max_temp: f64,
    pub precipitation: Precipitation,
    /// Daytime wind speed in km/h
    pub wind_speed: f64,
}

impl ForecastDay {
    /// Value of the selected metric for this day
    #[must_use]
    pub fn value(&self, metric: Metric) -> f64 {
        metric.extract(self)
    }

    #[must_use]
    pub fn format_temperature_range(&self) -> String {
        format!("{:.1}°C / {:.1}°C", self.min_temp, self.max_temp)
    }
}

/// Forecast series for one city on the route
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityForecast {
    pub city: City,
    pub days: Vec<ForecastDay>,
}

/// Forecasts for every city on a route, ordered start, stops, end
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouteForecast {
    pub day_count: DayCount,
    pub cities: Vec<CityForecast>,
}

impl RouteForecast {
    #[must_use]
    pub fn new(day_count: DayCount, cities: Vec<CityForecast>) -> Self {
        Self { day_count, cities }
    }

    #[must_use]
    pub fn start(&self) -> Option<&CityForecast> {
        self.cities.first()
    }

    #[must_use]
    pub fn end(&self) -> Option<&CityForecast> {
        self.cities.last()
    }

    /// Intermediate stops, excluding start and end
    #[must_use]
    pub fn stops(&self) -> &[CityForecast] {
        if self.cities.len() <= 2 {
            &[]
        } else {
            &self.cities[1..self.cities.len() - 1]
        }
    }
}
