use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
};

use super::{AppState, RouteParams, status_for};
use crate::chart::RouteChart;
use crate::render;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/route-weather", post(route_weather))
}

async fn home(State(state): State<AppState>) -> Html<String> {
    Html(render::home_page(
        state.route.default_days,
        state.route.default_metric,
    ))
}

async fn route_weather(
    State(state): State<AppState>,
    Form(params): Form<RouteParams>,
) -> (StatusCode, Html<String>) {
    let request = match params.into_request(&state.route) {
        Ok(request) => request,
        Err(e) => return (status_for(&e), Html(render::error_page(&e.user_message()))),
    };

    match state.aggregator.aggregate(&request.cities, request.days).await {
        Ok(route) => {
            let chart = RouteChart::build(&route, request.metric);
            (StatusCode::OK, Html(render::route_page(&route, &chart)))
        }
        Err(e) => {
            tracing::warn!("Route weather lookup failed: {}", e);
            (status_for(&e), Html(render::error_page(&e.user_message())))
        }
    }
}
