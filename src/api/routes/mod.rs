//! HTTP route handlers grouped by resource

pub mod alerts;
pub mod events;
pub mod grafana;
pub mod health;
pub mod snapshot;
pub mod stats;
