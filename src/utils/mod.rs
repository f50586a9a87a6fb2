//! Utility functions and helpers.
//!
//! - [`format`] - number and text formatting for terminal reports
//! - [`reader`] - export file reader with automatic decompression
//! - [`time`] - date parsing and day-count helpers
//!
//! # Examples
//!
//! ## Counting days since a directory timestamp
//!
//! ```
//! use ad_risk_audit::utils::time::{days_since, parse_directory_date};
//!
//! let now = parse_directory_date("2023-10-11").unwrap();
//! assert_eq!(days_since("2023-10-01", now, 9999), 10);
//! assert_eq!(days_since("not a date", now, 9999), 9999);
//! ```

pub mod format;
pub mod reader;
pub mod time;
