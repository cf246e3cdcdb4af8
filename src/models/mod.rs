//! Data models for the route weather service
//!
//! This module contains the core domain models organized by concern:
//! - Location: resolved cities with their location key and coordinates
//! - Weather: current conditions readings
//! - Forecast: per-day forecasts, day counts and route collections
//! - Metric: the forecast field selected for display

pub mod forecast;
pub mod location;
pub mod metric;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{CityForecast, DayCount, ForecastDay, Precipitation, RouteForecast};
pub use location::{City, Coordinates};
pub use metric::Metric;
pub use weather::CurrentConditions;
