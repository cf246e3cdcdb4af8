//! "Is the weather fine?" heuristic over a current-conditions reading
//!
//! Rules are checked in a fixed order and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CurrentConditions;

const MIN_TEMPERATURE_C: f64 = -10.0;
const MAX_TEMPERATURE_C: f64 = 35.0;
const MAX_WIND_KMH: f64 = 50.0;
const MAX_HUMIDITY_PCT: u8 = 80;
const MAX_PRECIPITATION_PCT: u8 = 65;
const PRECIPITATION_WORDS: [&str; 3] = ["rain", "snow", "storm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    TooCold,
    TooHot,
    StrongWind,
    HighHumidity,
    HighPrecipitationChance,
    PrecipitationExpected,
    Fine,
}

impl Suitability {
    #[must_use]
    pub fn assess(reading: &CurrentConditions) -> Self {
        if reading.temperature < MIN_TEMPERATURE_C {
            Self::TooCold
        } else if reading.temperature > MAX_TEMPERATURE_C {
            Self::TooHot
        } else if reading.wind_speed > MAX_WIND_KMH {
            Self::StrongWind
        } else if reading.humidity > MAX_HUMIDITY_PCT {
            Self::HighHumidity
        } else if reading.precipitation_probability > MAX_PRECIPITATION_PCT {
            Self::HighPrecipitationChance
        } else if mentions_precipitation(&reading.condition) {
            Self::PrecipitationExpected
        } else {
            Self::Fine
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::TooCold => "too cold",
            Self::TooHot => "too hot",
            Self::StrongWind => "strong wind",
            Self::HighHumidity => "high humidity",
            Self::HighPrecipitationChance => "high chance of precipitation",
            Self::PrecipitationExpected => "precipitation expected",
            Self::Fine => "fine",
        }
    }

    #[must_use]
    pub fn is_fine(self) -> bool {
        self == Self::Fine
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

fn mentions_precipitation(condition: &str) -> bool {
    let condition = condition.to_lowercase();
    PRECIPITATION_WORDS.iter().any(|word| condition.contains(word))
}
