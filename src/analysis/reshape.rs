//! Reshaping of parameter-keyed payloads into date-keyed daily records

use crate::config::{AnalysisConfig, UnknownParameterPolicy};
use crate::models::{DailyRecord, Measurement, RawPayload};
use crate::{Result, ViabilityError};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Turn parameter blocks into one record per calendar day, sorted by date.
///
/// Samples falling on the same day overwrite each other in input order, so the
/// last sample processed for a (day, measurement) pair wins.
pub fn reshape_payload(payload: &RawPayload, config: &AnalysisConfig) -> Result<Vec<DailyRecord>> {
    let mut by_date: BTreeMap<NaiveDate, DailyRecord> = BTreeMap::new();

    for block in &payload.data {
        let series = block.coordinates.first().ok_or_else(|| {
            ViabilityError::input(format!(
                "parameter block '{}' has no coordinate series",
                block.parameter
            ))
        })?;

        if block.coordinates.len() > 1 {
            warn!(
                "Parameter {} carries {} locations, using the first ({}, {})",
                block.parameter,
                block.coordinates.len(),
                series.lat,
                series.lon
            );
        }

        let measurement = Measurement::from_identifier(&block.parameter);
        if measurement.is_none() {
            match config.unknown_parameters {
                UnknownParameterPolicy::Ignore => {
                    debug!("Ignoring values of unknown parameter {}", block.parameter);
                }
                UnknownParameterPolicy::Reject => {
                    return Err(ViabilityError::unknown_parameter(&block.parameter));
                }
            }
        }

        // Dates reported only by an unknown parameter still become (empty) days
        for sample in &series.dates {
            let date = truncate_to_date(&sample.date)?;
            let record = by_date
                .entry(date)
                .or_insert_with(|| DailyRecord::new(date));
            if let Some(measurement) = measurement {
                record.set(measurement, sample.value);
            }
        }
    }

    debug!("Reshaped payload into {} daily records", by_date.len());
    Ok(by_date.into_values().collect())
}

/// Calendar date of an ISO-8601 timestamp; time of day and offset are dropped
pub(crate) fn truncate_to_date(timestamp: &str) -> Result<NaiveDate> {
    let day = timestamp.split('T').next().unwrap_or(timestamp).trim();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| ViabilityError::input(format!("invalid sample date '{timestamp}': {e}")))
}
