//! Blank input template.
//!
//! Writes a header-only CSV naming every recognized input column, ready to be
//! filled from a directory export.
//!
//! # Usage
//!
//! ```bash
//! ad-risk template
//! ad-risk template --output exports/ad_template.csv
//! ```

use crate::report::export::{write_template, TEMPLATE_FILE_NAME};
use anyhow::Result;

pub fn run(output: Option<&str>) -> Result<()> {
    let path = output.unwrap_or(TEMPLATE_FILE_NAME);
    write_template(path)?;
    println!("Template written to: {}", path);
    Ok(())
}
