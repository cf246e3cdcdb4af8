//! `RouteWeather` - weather forecasts along a travel route
//!
//! This library resolves city names through a weather data API, fetches
//! daily forecasts and current conditions for them, aggregates the cities of
//! a route (start, stops, end) and renders the result as HTML or chart data.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod forecast;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod render;
pub mod route;
pub mod suitability;
pub mod web;

// Re-export core types for public API
pub use api::{WeatherApiClient, WeatherSource};
pub use chart::{ChartPoint, ChartSeries, MapMarker, RouteChart, RouteLeg};
pub use config::{FetchMode, RouteWeatherConfig};
pub use error::RouteWeatherError;
pub use forecast::ForecastFetcher;
pub use location_resolver::CityResolver;
pub use models::{City, CityForecast, CurrentConditions, DayCount, ForecastDay, Metric, RouteForecast};
pub use route::{RouteAggregator, RouteRequest};
pub use suitability::Suitability;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteWeatherError>;
