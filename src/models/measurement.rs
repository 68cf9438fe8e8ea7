//! Weather parameters recognized by the analyzer

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five weather parameters the analysis understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    /// Air temperature at 2 m in Celsius
    Temperature,
    /// Dew point at 2 m in Celsius
    DewPoint,
    /// Relative humidity at 2 m in percent
    RelativeHumidity,
    /// Precipitation in mm
    Precipitation,
    /// Wind speed at 10 m in m/s
    WindSpeed,
}

impl Measurement {
    /// All recognized measurements, in request order
    pub const ALL: [Measurement; 5] = [
        Measurement::Temperature,
        Measurement::DewPoint,
        Measurement::RelativeHumidity,
        Measurement::Precipitation,
        Measurement::WindSpeed,
    ];

    /// Map a weather API parameter identifier to its measurement
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "t_2m:C" => Some(Measurement::Temperature),
            "dew_point_2m:C" => Some(Measurement::DewPoint),
            "relative_humidity_2m:p" => Some(Measurement::RelativeHumidity),
            "precip_1h:mm" => Some(Measurement::Precipitation),
            "wind_speed_10m:ms" => Some(Measurement::WindSpeed),
            _ => None,
        }
    }

    /// Weather API parameter identifier for this measurement
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Measurement::Temperature => "t_2m:C",
            Measurement::DewPoint => "dew_point_2m:C",
            Measurement::RelativeHumidity => "relative_humidity_2m:p",
            Measurement::Precipitation => "precip_1h:mm",
            Measurement::WindSpeed => "wind_speed_10m:ms",
        }
    }

    /// Comma-separated identifier list for requesting every measurement at once
    #[must_use]
    pub fn all_identifiers() -> String {
        Self::ALL
            .iter()
            .map(|m| m.identifier())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Temperature => write!(f, "temperature"),
            Measurement::DewPoint => write!(f, "dew point"),
            Measurement::RelativeHumidity => write!(f, "relative humidity"),
            Measurement::Precipitation => write!(f, "precipitation"),
            Measurement::WindSpeed => write!(f, "wind speed"),
        }
    }
}
