//! `viability` - wind and solar viability from a year of weather samples
//!
//! This library reshapes a Meteomatics timeseries payload into daily records,
//! groups them by month, computes wind and solar viability per month, and
//! summarizes the year with a recommendation.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod meteomatics;
pub mod models;

// Re-export core types for public API
pub use analysis::{
    AnnualViabilityAnalyzer, analyze_month, group_by_month, reshape_payload, summarize_year,
};
pub use config::{AnalysisConfig, MissingValuePolicy, UnknownParameterPolicy, ViabilityConfig};
pub use error::ViabilityError;
pub use meteomatics::{MeteomaticsClient, TimeseriesQuery};
pub use models::{
    AnnualSummary, DailyRecord, FullAnalysis, MonthBucket, MonthKey, MonthNames, MonthlyAnalysis,
    RawPayload, Recommendation,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ViabilityError>;
