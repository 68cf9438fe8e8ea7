//! Raw timeseries payload as served by the Meteomatics JSON API

use crate::{Result, ViabilityError};
use serde::{Deserialize, Serialize};

/// Timeseries response: one block per requested parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPayload {
    pub version: Option<String>,
    pub user: Option<String>,
    #[serde(rename = "dateGenerated")]
    pub date_generated: Option<String>,
    pub status: Option<String>,
    /// Parameter blocks, in response order
    pub data: Vec<ParameterBlock>,
}

/// Samples of one parameter for the requested locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterBlock {
    /// Parameter identifier (e.g. `wind_speed_10m:ms`)
    pub parameter: String,
    pub coordinates: Vec<CoordinateSeries>,
}

/// Samples for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateSeries {
    pub lat: f64,
    pub lon: f64,
    pub dates: Vec<Sample>,
}

/// One timestamped value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// ISO-8601 timestamp (e.g. `2024-01-01T00:00:00Z`)
    pub date: String,
    pub value: f64,
}

impl RawPayload {
    /// Build a payload from parameter blocks only
    #[must_use]
    pub fn new(data: Vec<ParameterBlock>) -> Self {
        Self {
            version: None,
            user: None,
            date_generated: None,
            status: None,
            data,
        }
    }

    /// Decode a payload from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ViabilityError::input(e.to_string()))
    }

    /// Decode a payload from a JSON body
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ViabilityError::input(e.to_string()))
    }
}

impl ParameterBlock {
    /// Single-location block
    #[must_use]
    pub fn single(parameter: &str, lat: f64, lon: f64, dates: Vec<Sample>) -> Self {
        Self {
            parameter: parameter.to_string(),
            coordinates: vec![CoordinateSeries { lat, lon, dates }],
        }
    }
}

impl Sample {
    #[must_use]
    pub fn new(date: &str, value: f64) -> Self {
        Self {
            date: date.to_string(),
            value,
        }
    }
}
