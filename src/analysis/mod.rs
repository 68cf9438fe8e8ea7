//! Annual viability analysis
//!
//! This module turns a year of weather samples into wind and solar viability
//! figures in four forward-only stages:
//! - Reshape: parameter blocks into per-day records
//! - Group: per-day records into calendar months
//! - Monthly: viability metrics per month
//! - Annual: yearly totals and a recommendation

pub mod annual;
pub mod grouping;
pub mod monthly;
pub mod reshape;

pub use annual::summarize_year;
pub use grouping::group_by_month;
pub use monthly::analyze_month;
pub use reshape::reshape_payload;

use crate::Result;
use crate::config::AnalysisConfig;
use crate::models::{FullAnalysis, RawPayload};
use tracing::{debug, info, instrument};

/// Runs the four analysis stages with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct AnnualViabilityAnalyzer {
    config: AnalysisConfig,
}

impl AnnualViabilityAnalyzer {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a full payload. Any failing stage aborts the run.
    #[instrument(skip_all, fields(blocks = payload.data.len()))]
    pub fn run(&self, payload: &RawPayload) -> Result<FullAnalysis> {
        info!("Reshaping payload into daily records");
        let daily = reshape_payload(payload, &self.config)?;
        let day_count = daily.len();

        info!("Grouping {} days by month", day_count);
        let buckets = group_by_month(daily);

        info!("Analyzing {} months", buckets.len());
        let months = buckets
            .iter()
            .map(|bucket| {
                debug!("Analyzing {} ({} days)", bucket.key, bucket.len());
                analyze_month(bucket.key, &bucket.days, &self.config)
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Summarizing year");
        let annual = summarize_year(&months, &self.config)?;

        info!(
            wind_pct = annual.totals.wind.viability_pct,
            solar_pct = annual.totals.solar.viability_pct,
            "Analysis complete: {}",
            annual.recommendation
        );
        Ok(FullAnalysis { months, annual })
    }
}

/// Round half away from zero to 2 decimals
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `count` in `total` as a percentage with 2 decimals
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    round2(count as f64 / total as f64 * 100.0)
}
