//! Error types and handling for the route weather service

use thiserror::Error;

/// Main error type for route weather lookups
#[derive(Error, Debug)]
pub enum RouteWeatherError {
    /// A city, location key or forecast was absent from the remote response
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Network or HTTP failure talking to the weather API
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// Route city the failed request was made for
        city: Option<String>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RouteWeatherError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
            city: None,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Prefix the message with the city the failure belongs to
    #[must_use]
    pub fn for_city(self, city: &str) -> Self {
        match self {
            Self::NotFound { message } => Self::not_found(format!("{city}: {message}")),
            Self::Transport {
                message,
                city: None,
            } => Self::Transport {
                message: format!("{city}: {message}"),
                city: Some(city.to_string()),
            },
            other => other,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RouteWeatherError::NotFound { message } => {
                format!("Nothing found for {message}. Please check the city name.")
            }
            RouteWeatherError::Transport { city: Some(city), .. } => {
                format!("Unable to reach the weather service for {city}. Please try again later.")
            }
            RouteWeatherError::Transport { city: None, .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            RouteWeatherError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            RouteWeatherError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RouteWeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::transport(format!("undecodable response body: {err}"))
        } else {
            Self::transport(err.to_string())
        }
    }
}
