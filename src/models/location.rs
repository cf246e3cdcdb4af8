//! City model: a display name plus the resolved location key

use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let from = haversine::Location {
            latitude: self.latitude,
            longitude: self.longitude,
        };
        let to = haversine::Location {
            latitude: other.latitude,
            longitude: other.longitude,
        };
        haversine::distance(from, to, haversine::Units::Kilometers)
    }
}

/// A city resolved through the weather API's search endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Name as typed by the user
    pub query: String,
    /// Localized name returned by the search
    pub name: String,
    /// Opaque location key used for forecast requests
    pub key: String,
    /// Coordinates, when the search returned them
    pub coordinates: Option<Coordinates>,
    /// Country name
    pub country: Option<String>,
}

impl City {
    /// Create a city with only a name and location key
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            query: name.clone(),
            name,
            key: key.into(),
            coordinates: None,
            country: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates::new(latitude, longitude));
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Label used for chart series and page headings
    #[must_use]
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }

    /// Format coordinates as a string, if known
    #[must_use]
    pub fn format_coordinates(&self) -> Option<String> {
        self.coordinates
            .map(|c| format!("{:.4}, {:.4}", c.latitude, c.longitude))
    }
}
