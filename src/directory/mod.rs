//! Directory export ingestion.
//!
//! - [`types`] - raw, normalized and processed user records
//! - [`parser`] - lenient CSV line parser producing raw records
//! - [`normalize`] - typed attribute derivation (groups, dates, flags)

pub mod normalize;
pub mod parser;
pub mod types;
