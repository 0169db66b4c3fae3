pub mod clipboard;
pub mod config;
pub mod coords;
pub mod directions;
pub mod error;
pub mod form;
pub mod geocoding;
pub mod links;
pub mod mapbox;
pub mod narrative;
pub mod pipeline;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Builds a coordinate from the `[longitude, latitude]` order used by map providers.
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn is_valid(self) -> bool {
        self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }
}

/// A named location. Only places carrying coordinates can be routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
}

impl Place {
    pub fn resolved(label: impl Into<String>, coordinates: Coordinate) -> Self {
        Self {
            label: label.into(),
            coordinates: Some(coordinates),
        }
    }

    pub fn unresolved(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            coordinates: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateProseRequest {
    pub maneuvers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateProseResponse {
    pub prose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

pub fn format_coord(value: f64) -> String {
    format!("{value:.5}")
}
