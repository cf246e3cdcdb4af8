//! Weather API client
//!
//! This module provides the HTTP client that talks to the AccuWeather-style
//! weather data service: city search, daily forecasts and current conditions.
//! Requests are authenticated with a static API key passed as a query
//! parameter. Failed requests are never retried.

use crate::Result;
use crate::config::WeatherConfig;
use crate::error::RouteWeatherError;
use crate::models::{City, CurrentConditions, DayCount, ForecastDay};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Remote weather data, as seen by the resolver and fetchers
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Search cities by free-text name, best match first
    async fn search_city(&self, query: &str) -> Result<Vec<City>>;

    /// Daily forecast for a location key, in remote order and untruncated
    async fn daily_forecast(&self, location_key: &str, days: DayCount) -> Result<Vec<ForecastDay>>;

    /// Latest observation for a location key. `precipitation_probability`
    /// is left at zero; the observation endpoint does not report it.
    async fn current_conditions(&self, location_key: &str) -> Result<CurrentConditions>;
}

/// HTTP client for the weather data service
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RouteWeatherError::config("Weather API key is required"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("RouteWeather/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RouteWeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            language: config.language.clone(),
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{}?apikey={}&language={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Issue a single GET and decode the JSON body
    #[instrument(skip(self, params))]
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let start_time = Instant::now();
        let url = self.url(path, params);

        let response = self.client.get(&url).send().await.map_err(|e| {
            // reqwest errors carry the full URL, including the API key
            let e = e.without_url();
            warn!("Network error for {}: {}", path, e);
            RouteWeatherError::from(e)
        })?;

        let status = response.status();
        debug!("HTTP response received: {}", status);

        if !status.is_success() {
            error!("API request to {} failed with status {}", path, status);
            return Err(RouteWeatherError::transport(format!(
                "API request failed with status: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse response from {}: {}", path, e);
            RouteWeatherError::from(e)
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Successful API request to {} in {:.3}s",
            path,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow API response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    #[instrument(skip(self))]
    async fn search_city(&self, query: &str) -> Result<Vec<City>> {
        let results: Vec<accuweather::CitySearchResult> = self
            .get_json("/locations/v1/cities/search", &[("q", query)])
            .await?;

        if results.is_empty() {
            warn!("No results found for city '{}'", query);
        } else {
            debug!(
                "Search results: {:?}",
                results
                    .iter()
                    .map(|r| format!("{} ({})", r.localized_name, r.key))
                    .collect::<Vec<_>>()
            );
        }

        Ok(results
            .into_iter()
            .map(|result| result.into_city(query))
            .collect())
    }

    #[instrument(skip(self))]
    async fn daily_forecast(&self, location_key: &str, days: DayCount) -> Result<Vec<ForecastDay>> {
        let path = format!(
            "/forecasts/v1/daily/{}/{}",
            days.endpoint(),
            urlencoding::encode(location_key)
        );
        let response: accuweather::DailyForecastResponse = self
            .get_json(&path, &[("metric", "true"), ("details", "true")])
            .await?;

        Ok(response
            .daily_forecasts
            .into_iter()
            .map(ForecastDay::from)
            .collect())
    }

    #[instrument(skip(self))]
    async fn current_conditions(&self, location_key: &str) -> Result<CurrentConditions> {
        let path = format!(
            "/currentconditions/v1/{}",
            urlencoding::encode(location_key)
        );
        let readings: Vec<accuweather::CurrentConditionsResult> =
            self.get_json(&path, &[("details", "true")]).await?;

        readings
            .into_iter()
            .next()
            .map(CurrentConditions::from)
            .ok_or_else(|| {
                RouteWeatherError::not_found(format!(
                    "current conditions for location {location_key}"
                ))
            })
    }
}

/// Wire structures of the weather data service and conversions to domain models
mod accuweather {
    use crate::models::{City, CurrentConditions, ForecastDay, Precipitation};
    use chrono::{DateTime, FixedOffset};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CitySearchResult {
        pub key: String,
        pub localized_name: String,
        pub geo_position: Option<GeoPosition>,
        pub country: Option<NamedArea>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct GeoPosition {
        pub latitude: f64,
        pub longitude: f64,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct NamedArea {
        pub localized_name: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct DailyForecastResponse {
        #[serde(default)]
        pub daily_forecasts: Vec<DailyForecast>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct DailyForecast {
        pub date: DateTime<FixedOffset>,
        pub temperature: TemperatureRange,
        pub day: Option<DayPart>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct TemperatureRange {
        pub minimum: Measurement,
        pub maximum: Measurement,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Measurement {
        pub value: f64,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct DayPart {
        pub has_precipitation: Option<bool>,
        pub precipitation_probability: Option<u8>,
        pub wind: Option<Wind>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct Wind {
        pub speed: Option<Measurement>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CurrentConditionsResult {
        pub local_observation_date_time: DateTime<FixedOffset>,
        pub weather_text: Option<String>,
        pub temperature: MetricValue,
        pub relative_humidity: Option<u8>,
        pub wind: Option<CurrentWind>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct MetricValue {
        pub metric: Measurement,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct CurrentWind {
        pub speed: Option<MetricValue>,
    }

    impl CitySearchResult {
        pub fn into_city(self, query: &str) -> City {
            let mut city = City::new(self.localized_name, self.key);
            city.query = query.to_string();
            if let Some(position) = self.geo_position {
                city = city.with_coordinates(position.latitude, position.longitude);
            }
            if let Some(country) = self.country {
                city = city.with_country(country.localized_name);
            }
            city
        }
    }

    impl From<DailyForecast> for ForecastDay {
        fn from(daily: DailyForecast) -> Self {
            let day = daily.day;
            let expected = day
                .as_ref()
                .and_then(|d| d.has_precipitation)
                .unwrap_or(false);
            let probability = day
                .as_ref()
                .and_then(|d| d.precipitation_probability)
                .unwrap_or(0);
            let wind_speed = day
                .as_ref()
                .and_then(|d| d.wind.as_ref())
                .and_then(|w| w.speed.as_ref())
                .map_or(0.0, |s| s.value);

            ForecastDay {
                date: daily.date.date_naive(),
                min_temp: daily.temperature.minimum.value,
                max_temp: daily.temperature.maximum.value,
                precipitation: Precipitation {
                    expected,
                    probability,
                },
                wind_speed,
            }
        }
    }

    impl From<CurrentConditionsResult> for CurrentConditions {
        fn from(reading: CurrentConditionsResult) -> Self {
            CurrentConditions {
                observed_at: reading.local_observation_date_time,
                temperature: reading.temperature.metric.value,
                wind_speed: reading
                    .wind
                    .and_then(|w| w.speed)
                    .map_or(0.0, |s| s.metric.value),
                humidity: reading.relative_humidity.unwrap_or(0),
                condition: reading.weather_text.unwrap_or_default(),
                precipitation_probability: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::accuweather::{CitySearchResult, CurrentConditionsResult, DailyForecastResponse};
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_search_result_to_city() {
        let raw = r#"[{
            "Version": 1,
            "Key": "623",
            "Type": "City",
            "LocalizedName": "Paris",
            "Country": {"ID": "FR", "LocalizedName": "France"},
            "GeoPosition": {"Latitude": 48.857, "Longitude": 2.341}
        }]"#;
        let results: Vec<CitySearchResult> = serde_json::from_str(raw).unwrap();
        let city = results.into_iter().next().unwrap().into_city("paris");

        assert_eq!(city.key, "623");
        assert_eq!(city.name, "Paris");
        assert_eq!(city.query, "paris");
        assert_eq!(city.country.as_deref(), Some("France"));
        let coords = city.coordinates.unwrap();
        assert_eq!(coords.latitude, 48.857);
        assert_eq!(coords.longitude, 2.341);
    }

    #[test]
    fn test_daily_forecast_defaults_missing_fields() {
        let raw = r#"{"DailyForecasts": [
            {
                "Date": "2024-05-01T07:00:00+02:00",
                "Temperature": {"Minimum": {"Value": 8.1}, "Maximum": {"Value": 19.4}},
                "Day": {"HasPrecipitation": true, "PrecipitationProbability": 55,
                        "Wind": {"Speed": {"Value": 14.8, "Unit": "km/h"}}}
            },
            {
                "Date": "2024-05-02T07:00:00+02:00",
                "Temperature": {"Minimum": {"Value": 9.0}, "Maximum": {"Value": 21.0}}
            }
        ]}"#;
        let response: DailyForecastResponse = serde_json::from_str(raw).unwrap();
        let days: Vec<ForecastDay> = response
            .daily_forecasts
            .into_iter()
            .map(ForecastDay::from)
            .collect();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(days[0].precipitation.expected);
        assert_eq!(days[0].precipitation.probability, 55);
        assert_eq!(days[0].wind_speed, 14.8);

        assert!(!days[1].precipitation.expected);
        assert_eq!(days[1].precipitation.probability, 0);
        assert_eq!(days[1].wind_speed, 0.0);
    }

    #[test]
    fn test_missing_daily_forecasts_is_empty() {
        let response: DailyForecastResponse = serde_json::from_str("{}").unwrap();
        assert!(response.daily_forecasts.is_empty());
    }

    #[test]
    fn test_current_conditions_conversion() {
        let raw = r#"{
            "LocalObservationDateTime": "2024-05-01T10:05:00+02:00",
            "WeatherText": "Light rain",
            "Temperature": {"Metric": {"Value": 11.2}, "Imperial": {"Value": 52.0}},
            "RelativeHumidity": 87,
            "Wind": {"Speed": {"Metric": {"Value": 20.4}, "Imperial": {"Value": 12.7}}}
        }"#;
        let reading: CurrentConditionsResult = serde_json::from_str(raw).unwrap();
        let conditions = CurrentConditions::from(reading);

        assert_eq!(conditions.temperature, 11.2);
        assert_eq!(conditions.wind_speed, 20.4);
        assert_eq!(conditions.humidity, 87);
        assert_eq!(conditions.condition, "Light rain");
        assert_eq!(conditions.precipitation_probability, 0);
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = WeatherConfig::default();
        assert!(matches!(
            WeatherApiClient::new(&config),
            Err(RouteWeatherError::Config { .. })
        ));
    }

    #[test]
    fn test_url_encodes_parameters() {
        let config = WeatherConfig {
            api_key: Some("k&y".to_string()),
            base_url: "http://localhost:1234/".to_string(),
            ..WeatherConfig::default()
        };
        let client = WeatherApiClient::new(&config).unwrap();
        let url = client.url("/locations/v1/cities/search", &[("q", "São Paulo")]);
        assert_eq!(
            url,
            "http://localhost:1234/locations/v1/cities/search?apikey=k%26y&language=en-us&q=S%C3%A3o%20Paulo"
        );
    }
}
