//! Meteomatics weather API integration
//!
//! Builds timeseries and grid requests and fetches them over HTTP. Responses
//! are handed to the analysis untouched; no caching or retries happen here.

pub mod client;
pub mod query;

pub use client::{MeteomaticsClient, RawResponse, decode_payload};
pub use query::{BoundingBox, GridQuery, ResponseFormat, TimeseriesQuery, default_time_range};
