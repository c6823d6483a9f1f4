//! Metric fabrication and threshold classification
//!
//! - **sampler**: draws one bounded random value per (host, metric)
//! - **threshold**: classifies a value and builds the matching [`Alert`](crate::alerts::Alert)

pub mod sampler;
pub mod threshold;
