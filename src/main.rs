use anyhow::{Context, Result};
use routeweather::{RouteWeatherConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RouteWeatherConfig::load().with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging)?;

    tracing::info!(
        "Starting routeweather {} (fetch mode {:?}, weather API {})",
        routeweather::VERSION,
        config.route.fetch_mode,
        config.weather.base_url
    );

    web::run(config).await
}
