//! HTTP server: HTML pages and JSON endpoints for the dashboard

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::RouteWeatherError;
use crate::api::{WeatherApiClient, WeatherSource};
use crate::config::{RouteConfig, RouteWeatherConfig, ServerConfig};
use crate::models::{DayCount, Metric};
use crate::route::{RouteAggregator, RouteRequest};

mod json;
mod pages;

/// Shared state of all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: RouteAggregator,
    pub route: Arc<RouteConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn WeatherSource>, route: RouteConfig) -> Self {
        Self {
            aggregator: RouteAggregator::new(source, route.fetch_mode),
            route: Arc::new(route),
        }
    }
}

/// Route lookup as sent by the form or the dashboard query string
#[derive(Debug, Default, Deserialize)]
pub struct RouteParams {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    /// Comma-separated intermediate stops
    pub stops: Option<String>,
    pub days: Option<String>,
    pub metric: Option<String>,
}

impl RouteParams {
    /// Validate into a route request, filling blanks from the configured defaults
    pub fn into_request(self, defaults: &RouteConfig) -> crate::Result<RouteRequest> {
        let days = match self.days.as_deref().map(str::trim) {
            None | Some("") => defaults.default_days,
            Some(raw) => raw.parse::<DayCount>()?,
        };
        let metric = match self.metric.as_deref().map(str::trim) {
            None | Some("") => defaults.default_metric,
            Some(raw) => raw.parse::<Metric>()?,
        };
        let stops = RouteRequest::split_stops(self.stops.as_deref());

        let request = RouteRequest::new(&self.start, stops, &self.end, days, metric)?;
        request.ensure_max_stops(defaults.max_stops)?;
        Ok(request)
    }
}

/// HTTP status for an error surfaced to a client
#[must_use]
pub fn status_for(error: &RouteWeatherError) -> StatusCode {
    match error {
        RouteWeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
        RouteWeatherError::Transport { .. } => StatusCode::BAD_GATEWAY,
        RouteWeatherError::Validation { .. } => StatusCode::BAD_REQUEST,
        RouteWeatherError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(pages::router())
        .nest("/api", json::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(cors)
}

/// Request timeout and tracing around the application router
pub fn with_server_layers(app: Router, server: &ServerConfig) -> Router {
    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(server.request_timeout_seconds.into()),
    ))
    .layer(TraceLayer::new_for_http())
}

/// Build the weather client from configuration and serve until Ctrl-C
pub async fn run(config: RouteWeatherConfig) -> Result<()> {
    let client = WeatherApiClient::new(&config.weather)?;
    let state = AppState::new(Arc::new(client), config.route.clone());

    let app = with_server_layers(router(state), &config.server);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind_address()))?;

    if let Some((cert, key)) = config.server.tls_paths() {
        return serve_tls(app, addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Web server failed")?;
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    app: Router,
    addr: SocketAddr,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS certificate {}", cert.display()))?;
    tracing::info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
        .with_context(|| "Web server failed")?;
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _app: Router,
    _addr: SocketAddr,
    _cert: &std::path::Path,
    _key: &std::path::Path,
) -> Result<()> {
    Err(RouteWeatherError::config("TLS is configured but this build lacks the `tls` feature").into())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_use_defaults_for_blanks() {
        let params = RouteParams {
            start: "Paris".into(),
            end: "Berlin".into(),
            stops: Some("".into()),
            days: Some(" ".into()),
            metric: None,
        };
        let request = params.into_request(&RouteConfig::default()).unwrap();
        assert_eq!(request.cities, vec!["Paris", "Berlin"]);
        assert_eq!(request.days, DayCount::Three);
        assert_eq!(request.metric, Metric::MaxTemp);
    }

    #[test]
    fn test_params_reject_bad_values() {
        let params = RouteParams {
            start: "Paris".into(),
            end: "Berlin".into(),
            days: Some("4".into()),
            ..RouteParams::default()
        };
        assert!(matches!(
            params.into_request(&RouteConfig::default()),
            Err(RouteWeatherError::Validation { .. })
        ));

        let params = RouteParams {
            start: "Paris".into(),
            end: "Berlin".into(),
            metric: Some("humidity".into()),
            ..RouteParams::default()
        };
        assert!(params.into_request(&RouteConfig::default()).is_err());
    }

    #[test]
    fn test_params_enforce_max_stops() {
        let config = RouteConfig {
            max_stops: 1,
            ..RouteConfig::default()
        };
        let params = RouteParams {
            start: "Paris".into(),
            end: "Berlin".into(),
            stops: Some("Reims, Metz".into()),
            ..RouteParams::default()
        };
        assert!(params.into_request(&config).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&RouteWeatherError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&RouteWeatherError::transport("x")), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&RouteWeatherError::validation("x")), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let server = ServerConfig {
            request_timeout_seconds: 1,
            ..ServerConfig::default()
        };

        let response = with_server_layers(slow, &server)
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
