//! Route aggregation: resolve and fetch every city from start to end
//!
//! A route is an ordered list of city names. The aggregator applies the
//! resolver and forecast fetcher to each of them and fails as a whole on the
//! first city that fails; partial routes are never returned.

use std::sync::Arc;

use futures::future;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::api::WeatherSource;
use crate::chart::RouteChart;
use crate::config::FetchMode;
use crate::error::RouteWeatherError;
use crate::forecast::ForecastFetcher;
use crate::location_resolver::CityResolver;
use crate::models::{CityForecast, DayCount, Metric, RouteForecast};

/// A parsed route lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// City names ordered start, stops, end
    pub cities: Vec<String>,
    pub days: DayCount,
    pub metric: Metric,
}

impl RouteRequest {
    /// Build a request from start, end and optional stops. Blank stops are dropped.
    pub fn new<I, S>(start: &str, stops: I, end: &str, days: DayCount, metric: Metric) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = start.trim();
        let end = end.trim();
        if start.is_empty() {
            return Err(RouteWeatherError::validation("Start city is required"));
        }
        if end.is_empty() {
            return Err(RouteWeatherError::validation("End city is required"));
        }

        let mut cities = vec![start.to_string()];
        cities.extend(
            stops
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty()),
        );
        cities.push(end.to_string());

        Ok(Self {
            cities,
            days,
            metric,
        })
    }

    /// Split a comma-separated stop list as typed into a form field
    #[must_use]
    pub fn split_stops(raw: Option<&str>) -> Vec<String> {
        raw.map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
    }

    /// Number of intermediate stops
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.cities.len().saturating_sub(2)
    }

    pub fn ensure_max_stops(&self, max_stops: usize) -> Result<()> {
        if self.stop_count() > max_stops {
            return Err(RouteWeatherError::validation(format!(
                "A route can have at most {max_stops} stops, got {}",
                self.stop_count()
            )));
        }
        Ok(())
    }
}

/// Applies the resolver and fetcher to every city of a route
#[derive(Clone)]
pub struct RouteAggregator {
    source: Arc<dyn WeatherSource>,
    mode: FetchMode,
}

impl RouteAggregator {
    #[must_use]
    pub fn new(source: Arc<dyn WeatherSource>, mode: FetchMode) -> Self {
        Self { source, mode }
    }

    #[must_use]
    pub fn source(&self) -> &dyn WeatherSource {
        self.source.as_ref()
    }

    /// Forecasts for every city, in route order
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn aggregate(&self, cities: &[String], days: DayCount) -> Result<RouteForecast> {
        if cities.is_empty() {
            return Err(RouteWeatherError::validation("A route needs at least one city"));
        }

        let forecasts = match self.mode {
            FetchMode::Sequential => self.aggregate_sequential(cities, days).await?,
            FetchMode::Concurrent => self.aggregate_concurrent(cities, days).await?,
        };

        info!("Aggregated forecasts for {} cities", forecasts.len());
        Ok(RouteForecast::new(days, forecasts))
    }

    /// Aggregate a request and project it onto its metric
    pub async fn chart(&self, request: &RouteRequest) -> Result<RouteChart> {
        let route = self.aggregate(&request.cities, request.days).await?;
        Ok(RouteChart::build(&route, request.metric))
    }

    async fn aggregate_sequential(&self, cities: &[String], days: DayCount) -> Result<Vec<CityForecast>> {
        let mut forecasts = Vec::with_capacity(cities.len());
        for (index, name) in cities.iter().enumerate() {
            match fetch_city(self.source(), name, days).await {
                Ok(forecast) => forecasts.push(forecast),
                Err(e) => {
                    warn!("Route aborted at city {} ({}): {}", index + 1, name, e);
                    return Err(e);
                }
            }
        }
        Ok(forecasts)
    }

    async fn aggregate_concurrent(&self, cities: &[String], days: DayCount) -> Result<Vec<CityForecast>> {
        let results =
            future::join_all(cities.iter().map(|name| fetch_city(self.source(), name, days))).await;

        // First failure in route order wins, regardless of completion order
        results
            .into_iter()
            .zip(cities)
            .map(|(result, name)| {
                result.inspect_err(|e| warn!("Route aborted at {}: {}", name, e))
            })
            .collect()
    }
}

async fn fetch_city(source: &dyn WeatherSource, name: &str, days: DayCount) -> Result<CityForecast> {
    let city = CityResolver::resolve(source, name)
        .await
        .map_err(|e| match e {
            e @ RouteWeatherError::NotFound { .. } => e,
            other => other.for_city(name.trim()),
        })?;

    let days = ForecastFetcher::fetch_days(source, &city.key, days)
        .await
        .map_err(|e| e.for_city(&city.name))?;

    Ok(CityForecast { city, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_request_orders_start_stops_end() {
        let request = RouteRequest::new(
            " Paris ",
            ["Strasbourg", "  ", "Frankfurt"],
            "Berlin",
            DayCount::Three,
            Metric::MaxTemp,
        )
        .unwrap();
        assert_eq!(request.cities, vec!["Paris", "Strasbourg", "Frankfurt", "Berlin"]);
        assert_eq!(request.stop_count(), 2);
    }

    #[rstest]
    #[case("", "Berlin", "Start city is required")]
    #[case("Paris", "  ", "End city is required")]
    fn test_request_requires_endpoints(#[case] start: &str, #[case] end: &str, #[case] message: &str) {
        let err = RouteRequest::new(start, Vec::<String>::new(), end, DayCount::One, Metric::MinTemp)
            .unwrap_err();
        assert!(err.to_string().contains(message));
    }

    #[test]
    fn test_split_stops() {
        assert_eq!(
            RouteRequest::split_stops(Some("Lyon, ,Dijon ,")),
            vec!["Lyon".to_string(), "Dijon".to_string()]
        );
        assert!(RouteRequest::split_stops(None).is_empty());
    }

    #[test]
    fn test_ensure_max_stops() {
        let request = RouteRequest::new("A", ["B", "C", "D"], "E", DayCount::One, Metric::MaxTemp)
            .unwrap();
        assert!(request.ensure_max_stops(3).is_ok());
        assert!(matches!(
            request.ensure_max_stops(2),
            Err(RouteWeatherError::Validation { .. })
        ));
    }
}
