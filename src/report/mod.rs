//! Consumers of the processed dataset.
//!
//! - [`export`] - scored report CSV and the blank input template
//! - [`sample`] - built-in demo export
//! - [`metrics`] - dashboard aggregates
//! - [`query`] - user table filtering, sorting and paging
//! - [`cache`] - bounded cache of the last import

pub mod cache;
pub mod export;
pub mod metrics;
pub mod query;
pub mod sample;
