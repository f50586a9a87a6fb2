//! Demo export.
//!
//! Prints the built-in five-account dataset, or writes it to a file so it can
//! be fed back through `analyze` and friends.
//!
//! # Usage
//!
//! ```bash
//! ad-risk sample > demo.csv
//! ad-risk sample --output demo.csv
//! ```

use crate::report::sample::generate_sample_csv;
use anyhow::{Context, Result};

pub fn run(output: Option<&str>) -> Result<()> {
    let csv = generate_sample_csv();
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", csv))
                .with_context(|| format!("Failed to write sample file: {}", path))?;
            eprintln!("Sample data written to: {}", path);
        }
        None => println!("{}", csv),
    }
    Ok(())
}
