use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::{AppState, RouteParams, status_for};
use crate::RouteWeatherError;
use crate::chart::RouteChart;
use crate::forecast::ForecastFetcher;
use crate::location_resolver::CityResolver;
use crate::models::{City, CurrentConditions};
use crate::suitability::Suitability;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/route", get(get_route))
        .route("/conditions", get(get_conditions))
}

/// Error body returned by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

pub struct ApiError(RouteWeatherError);

impl From<RouteWeatherError> for ApiError {
    fn from(err: RouteWeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("API request failed: {}", self.0);
        let body = ApiErrorBody {
            error: self.0.user_message(),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ConditionsQuery {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConditionsResponse {
    pub city: City,
    pub conditions: CurrentConditions,
    pub verdict: Suitability,
    pub message: String,
}

async fn get_route(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> Result<Json<RouteChart>, ApiError> {
    let request = params.into_request(&state.route)?;
    let chart = state.aggregator.chart(&request).await?;
    Ok(Json(chart))
}

async fn get_conditions(
    State(state): State<AppState>,
    Query(query): Query<ConditionsQuery>,
) -> Result<Json<ConditionsResponse>, ApiError> {
    let source = state.aggregator.source();
    let city = CityResolver::resolve(source, &query.city).await?;
    let conditions = ForecastFetcher::fetch_current(source, &city).await?;
    let verdict = Suitability::assess(&conditions);

    Ok(Json(ConditionsResponse {
        message: format!("Weather in {} is {}", city.name, verdict),
        city,
        conditions,
        verdict,
    }))
}
