//! Error types and handling for the viability analyzer

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the viability analyzer
#[derive(Error, Debug)]
pub enum ViabilityError {
    /// Malformed weather payload
    #[error("Invalid payload: {message}")]
    Input { message: String },

    /// A month bucket without any day in it
    #[error("Month {month} has no days to analyze")]
    DegenerateBucket { month: String },

    /// Parameter identifier outside the recognized set (strict mode)
    #[error("Unknown parameter identifier: {identifier}")]
    UnknownParameter { identifier: String },

    /// A day lacking a measurement the analysis needs (strict mode)
    #[error("Day {date} is missing {measurement}")]
    MissingMeasurement {
        date: NaiveDate,
        measurement: String,
    },

    /// Annual summary requested over zero days
    #[error("No daily samples to summarize")]
    NoData,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// CSV export errors
    #[error("Export error: {message}")]
    Export { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ViabilityError {
    /// Create a new payload error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a new degenerate bucket error
    pub fn degenerate_bucket<S: Into<String>>(month: S) -> Self {
        Self::DegenerateBucket {
            month: month.into(),
        }
    }

    /// Create a new unknown parameter error
    pub fn unknown_parameter<S: Into<String>>(identifier: S) -> Self {
        Self::UnknownParameter {
            identifier: identifier.into(),
        }
    }

    /// Create a new missing measurement error
    pub fn missing_measurement<S: Into<String>>(date: NaiveDate, measurement: S) -> Self {
        Self::MissingMeasurement {
            date,
            measurement: measurement.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ViabilityError::Input { message } => {
                format!("The weather data could not be read: {message}")
            }
            ViabilityError::DegenerateBucket { month } => {
                format!("Month {month} has no data; the analysis cannot continue.")
            }
            ViabilityError::UnknownParameter { identifier } => {
                format!("The weather data contains an unsupported parameter ({identifier}).")
            }
            ViabilityError::MissingMeasurement { date, measurement } => {
                format!("The weather data for {date} has no {measurement} value.")
            }
            ViabilityError::NoData => "The weather data contains no days to analyze.".to_string(),
            ViabilityError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            ViabilityError::Api { .. } => {
                "Unable to reach the weather service. Please check your connection and credentials."
                    .to_string()
            }
            ViabilityError::Config { .. } => {
                "Configuration error. Please check your config file and credentials.".to_string()
            }
            ViabilityError::Export { .. } => {
                "Writing the CSV export failed.".to_string()
            }
            ViabilityError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<csv::Error> for ViabilityError {
    fn from(err: csv::Error) -> Self {
        ViabilityError::export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let input_err = ViabilityError::input("missing data");
        assert!(matches!(input_err, ViabilityError::Input { .. }));

        let bucket_err = ViabilityError::degenerate_bucket("2024-03");
        assert!(matches!(bucket_err, ViabilityError::DegenerateBucket { .. }));

        let validation_err = ViabilityError::validation("invalid coordinates");
        assert!(matches!(validation_err, ViabilityError::Validation { .. }));
    }

    #[test]
    fn test_display_messages() {
        let err = ViabilityError::degenerate_bucket("2024-03");
        assert_eq!(err.to_string(), "Month 2024-03 has no days to analyze");

        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let err = ViabilityError::missing_measurement(date, "wind speed");
        assert_eq!(err.to_string(), "Day 2024-01-02 is missing wind speed");
    }

    #[test]
    fn test_user_messages() {
        let api_err = ViabilityError::api("test");
        assert!(api_err.user_message().contains("Unable to reach"));

        let validation_err = ViabilityError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let unknown = ViabilityError::unknown_parameter("sunshine_duration_1h:min");
        assert!(unknown.user_message().contains("sunshine_duration_1h:min"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ViabilityError = io_err.into();
        assert!(matches!(err, ViabilityError::Io { .. }));
    }
}
