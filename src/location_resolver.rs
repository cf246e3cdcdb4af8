//! City Resolution Module
//!
//! This module resolves free-text city names into cities carrying the
//! location key needed for forecast requests.

use crate::Result;
use crate::api::WeatherSource;
use crate::error::RouteWeatherError;
use crate::models::City;
use tracing::debug;

/// Service for resolving city names
pub struct CityResolver;

impl CityResolver {
    /// Resolve a city name to the best match of a single remote search
    pub async fn resolve(source: &dyn WeatherSource, name: &str) -> Result<City> {
        let query = name.trim();
        if query.is_empty() {
            return Err(RouteWeatherError::not_found("an empty city name"));
        }

        debug!("Searching city: {}", query);

        let city = source
            .search_city(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RouteWeatherError::not_found(format!("city '{query}'")))?;

        debug!(
            "Resolved city: {} (key {}) at {}",
            city.name,
            city.key,
            city.format_coordinates().unwrap_or_else(|| "unknown".into())
        );

        Ok(city)
    }
}
