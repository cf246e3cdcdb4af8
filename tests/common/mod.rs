//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use routeweather::models::Precipitation;
use routeweather::{City, CurrentConditions, DayCount, ForecastDay, RouteWeatherError, WeatherSource};

/// In-memory weather source recording every call it receives
#[derive(Default)]
pub struct StubSource {
    cities: HashMap<String, City>,
    forecasts: HashMap<String, Vec<ForecastDay>>,
    conditions: HashMap<String, CurrentConditions>,
    unreachable: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a city whose forecast holds `days` consecutive days from 2024-06-01
    pub fn with_city(mut self, name: &str, key: &str, days: usize) -> Self {
        let city = City::new(name, key).with_coordinates(48.0 + days as f64, 2.0);
        let forecast = (0..days).map(|i| forecast_day(i as u32, 20.0 + i as f64)).collect();
        self.cities.insert(name.to_string(), city);
        self.forecasts.insert(key.to_string(), forecast);
        self
    }

    /// Searching this name fails with a transport error
    pub fn with_unreachable(mut self, name: &str) -> Self {
        self.unreachable.insert(name.to_string());
        self
    }

    pub fn with_conditions(mut self, key: &str, conditions: CurrentConditions) -> Self {
        self.conditions.insert(key.to_string(), conditions);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn forecast_day(offset: u32, max_temp: f64) -> ForecastDay {
    ForecastDay {
        date: NaiveDate::from_ymd_opt(2024, 6, 1 + offset).unwrap(),
        min_temp: max_temp - 10.0,
        max_temp,
        precipitation: Precipitation {
            expected: false,
            probability: 20,
        },
        wind_speed: 12.0,
    }
}

pub fn conditions(temperature: f64, condition: &str) -> CurrentConditions {
    CurrentConditions {
        observed_at: DateTime::parse_from_rfc3339("2024-06-01T12:00:00+02:00").unwrap(),
        temperature,
        wind_speed: 8.0,
        humidity: 40,
        condition: condition.to_string(),
        precipitation_probability: 0,
    }
}

#[async_trait]
impl WeatherSource for StubSource {
    async fn search_city(&self, query: &str) -> routeweather::Result<Vec<City>> {
        self.calls.lock().unwrap().push(format!("search:{query}"));
        if self.unreachable.contains(query) {
            return Err(RouteWeatherError::transport("connection refused"));
        }
        Ok(self.cities.get(query).cloned().into_iter().collect())
    }

    async fn daily_forecast(&self, key: &str, days: DayCount) -> routeweather::Result<Vec<ForecastDay>> {
        self.calls.lock().unwrap().push(format!("forecast:{key}:{days}"));
        Ok(self.forecasts.get(key).cloned().unwrap_or_default())
    }

    async fn current_conditions(&self, key: &str) -> routeweather::Result<CurrentConditions> {
        self.calls.lock().unwrap().push(format!("conditions:{key}"));
        self.conditions
            .get(key)
            .cloned()
            .ok_or_else(|| RouteWeatherError::not_found(format!("current conditions for location {key}")))
    }
}
