//! Forecast fetching for resolved cities

use crate::Result;
use crate::api::WeatherSource;
use crate::error::RouteWeatherError;
use crate::models::{City, CurrentConditions, DayCount, ForecastDay};
use tracing::{debug, info};

/// Fetches daily forecasts and current conditions for resolved cities
pub struct ForecastFetcher;

impl ForecastFetcher {
    /// Fetch at most `days` forecast days for a location key, in remote order
    pub async fn fetch_days(
        source: &dyn WeatherSource,
        location_key: &str,
        days: DayCount,
    ) -> Result<Vec<ForecastDay>> {
        let mut forecast = source.daily_forecast(location_key, days).await?;
        if forecast.is_empty() {
            return Err(RouteWeatherError::not_found(format!(
                "forecast for location {location_key}"
            )));
        }

        forecast.truncate(days.days());
        debug!(
            "Fetched {} forecast days for location {}",
            forecast.len(),
            location_key
        );
        Ok(forecast)
    }

    /// Current conditions for a city, completed with today's precipitation probability
    pub async fn fetch_current(source: &dyn WeatherSource, city: &City) -> Result<CurrentConditions> {
        let mut conditions = source.current_conditions(&city.key).await?;
        let today = Self::fetch_days(source, &city.key, DayCount::One).await?;
        if let Some(day) = today.first() {
            conditions.precipitation_probability = day.precipitation.probability;
        }

        info!(
            "Current conditions for {}: {}, {}",
            city.name,
            conditions.condition,
            conditions.format_temperature()
        );
        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Precipitation;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate};
    use rstest::rstest;

    struct FixedForecast {
        days: Vec<ForecastDay>,
    }

    fn day(offset: u32, probability: u8) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 5, 1 + offset).unwrap(),
            min_temp: f64::from(offset),
            max_temp: f64::from(offset) + 10.0,
            precipitation: Precipitation {
                expected: probability > 0,
                probability,
            },
            wind_speed: 5.0,
        }
    }

    #[async_trait]
    impl WeatherSource for FixedForecast {
        async fn search_city(&self, _: &str) -> Result<Vec<City>> {
            Ok(vec![])
        }

        async fn daily_forecast(&self, _: &str, days: DayCount) -> Result<Vec<ForecastDay>> {
            let available = match days {
                DayCount::One => 1,
                _ => 5,
            };
            Ok(self.days.iter().take(available).cloned().collect())
        }

        async fn current_conditions(&self, _: &str) -> Result<CurrentConditions> {
            Ok(CurrentConditions {
                observed_at: DateTime::parse_from_rfc3339("2024-05-01T09:00:00+02:00").unwrap(),
                temperature: 16.0,
                wind_speed: 10.0,
                humidity: 60,
                condition: "Cloudy".to_string(),
                precipitation_probability: 0,
            })
        }
    }

    fn five_days() -> FixedForecast {
        FixedForecast {
            days: (0..5).map(|i| day(i, 10 * i as u8)).collect(),
        }
    }

    #[rstest]
    #[case(DayCount::One, 1)]
    #[case(DayCount::Three, 3)]
    #[case(DayCount::Five, 5)]
    #[tokio::test]
    async fn test_fetch_days_truncates_in_remote_order(
        #[case] days: DayCount,
        #[case] expected: usize,
    ) {
        let source = five_days();
        let forecast = ForecastFetcher::fetch_days(&source, "623", days).await.unwrap();
        assert_eq!(forecast.len(), expected);
        assert_eq!(forecast.as_slice(), &source.days[..expected]);
    }

    #[tokio::test]
    async fn test_fetch_days_empty_is_not_found() {
        let source = FixedForecast { days: vec![] };
        let err = ForecastFetcher::fetch_days(&source, "623", DayCount::Three)
            .await
            .unwrap_err();
        assert!(matches!(err, RouteWeatherError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_current_takes_probability_from_today() {
        let source = FixedForecast {
            days: vec![day(0, 70), day(1, 10)],
        };
        let city = City::new("Paris", "623");
        let conditions = ForecastFetcher::fetch_current(&source, &city).await.unwrap();
        assert_eq!(conditions.precipitation_probability, 70);
        assert_eq!(conditions.condition, "Cloudy");
    }
}
