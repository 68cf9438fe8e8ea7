//! Data models for the viability analyzer
//!
//! This module contains the core domain models organized by concern:
//! - Payload: raw parameter blocks as served by the weather API
//! - Measurement: the recognized weather parameters
//! - Daily: per-day records and their month buckets
//! - Analysis: monthly and annual viability results

pub mod analysis;
pub mod daily;
pub mod measurement;
pub mod payload;

// Re-export all public types for convenient access
pub use analysis::{
    AnnualSummary, AnnualTotals, AnnualViability, FullAnalysis, MonthlyAnalysis, MonthlyMetrics,
    Recommendation, SolarMetrics, WindMetrics,
};
pub use daily::{DailyRecord, MonthBucket, MonthKey, MonthNames};
pub use measurement::Measurement;
pub use payload::{CoordinateSeries, ParameterBlock, RawPayload, Sample};
