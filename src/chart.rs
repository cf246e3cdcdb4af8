//! Chart data for the interactive dashboard
//!
//! Projects a route forecast onto a single metric: one x/y series per city,
//! map markers for every city with coordinates, and the legs between them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{City, DayCount, Metric, RouteForecast};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: NaiveDate,
    pub y: f64,
}

/// Metric values of one city, labeled with the city name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Hop between two consecutive cities of the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    /// Great-circle distance, when both ends have coordinates
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteChart {
    pub metric: Metric,
    pub title: String,
    pub unit: String,
    pub days: DayCount,
    pub series: Vec<ChartSeries>,
    pub markers: Vec<MapMarker>,
    pub legs: Vec<RouteLeg>,
}

impl RouteChart {
    #[must_use]
    pub fn build(route: &RouteForecast, metric: Metric) -> Self {
        let series = route
            .cities
            .iter()
            .map(|forecast| ChartSeries {
                label: forecast.city.name.clone(),
                points: forecast
                    .days
                    .iter()
                    .map(|day| ChartPoint {
                        x: day.date,
                        y: day.value(metric),
                    })
                    .collect(),
            })
            .collect();

        let markers = route
            .cities
            .iter()
            .filter_map(|forecast| {
                forecast.city.coordinates.map(|c| MapMarker {
                    label: forecast.city.label(),
                    latitude: c.latitude,
                    longitude: c.longitude,
                })
            })
            .collect();

        let legs = route
            .cities
            .windows(2)
            .map(|pair| leg(&pair[0].city, &pair[1].city))
            .collect();

        Self {
            metric,
            title: format!("{} ({})", metric.title(), metric.unit()),
            unit: metric.unit().to_string(),
            days: route.day_count,
            series,
            markers,
            legs,
        }
    }

    /// Sum of all leg distances; `None` if any leg lacks coordinates
    #[must_use]
    pub fn total_distance_km(&self) -> Option<f64> {
        self.legs.iter().map(|leg| leg.distance_km).sum()
    }
}

fn leg(from: &City, to: &City) -> RouteLeg {
    let distance_km = match (from.coordinates, to.coordinates) {
        (Some(a), Some(b)) => Some(a.distance_km(&b)),
        _ => None,
    };
    RouteLeg {
        from: from.name.clone(),
        to: to.name.clone(),
        distance_km,
    }
}
