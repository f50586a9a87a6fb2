//! # AD Risk Audit
//!
//! Command-line tools and a library for scoring Active Directory user exports
//! for identity risk.
//!
//! ## Overview
//!
//! A directory export (CSV, optionally `.gz` or `.zst` compressed) goes
//! through three stages:
//!
//! 1. **Parse** - a tolerant, quote-aware line splitter turns the text into
//!    raw header-keyed records, dropping lines with fewer than five fields.
//! 2. **Normalize** - typed attributes are derived from each record: group
//!    list, days since last logon, dormancy, MFA, enabled and password flags.
//! 3. **Score** - a privilege sub-score and a password-hygiene sub-score
//!    combine into a 0-100 total and a Low/Medium/High/Critical tier, with
//!    human-readable issues and recommendations.
//!
//! The scored users feed the dashboard aggregates, the filtered user table,
//! the report CSV export and the JSON cache.
//!
//! ## Architecture
//!
//! - [`directory`] - record types, the export parser and normalization
//! - [`risk`] - scoring rules and the scorer
//! - [`pipeline`] - parse, normalize and score in one call; the active dataset
//! - [`report`] - dashboard metrics, queries, CSV export, demo data, cache
//! - [`commands`] - CLI command implementations
//! - [`utils`] - file reading, date handling and text formatting
//!
//! ## Example Usage
//!
//! ```bash
//! # Risk overview of an export
//! ad-risk analyze ad_users.csv
//!
//! # Same, on the built-in demo dataset, exporting the scored report
//! ad-risk analyze --sample --export
//!
//! # Critical users, highest score first
//! ad-risk users ad_users.csv --risk-level critical
//!
//! # Drill into one account
//! ad-risk show ad_users.csv --user jsmith
//!
//! # Blank template for a new export
//! ad-risk template
//! ```
//!
//! ## Library Usage
//!
//! ```
//! use ad_risk_audit::pipeline;
//! use ad_risk_audit::report::sample::generate_sample_csv;
//!
//! let users = pipeline::run(generate_sample_csv()).unwrap();
//! assert_eq!(users.len(), 5);
//! assert_eq!(users[0].id, "user-0");
//! ```

pub mod commands;
pub mod directory;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod utils;
