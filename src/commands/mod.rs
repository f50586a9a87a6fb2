//! Command implementations for the `ad-risk` CLI.
//!
//! Every analysis command takes its input the same way: a path to a directory
//! export (plain, `.gz` or `.zst`) or `--sample` for the built-in demo data,
//! plus an optional JSON rules file.
//!
//! - [`analyze`] - dashboard overview, report export, JSON output and cache
//! - [`users`] - filtered, sorted and paged user table
//! - [`show`] - single-account drill-down
//! - [`template`] - blank input template
//! - [`sample`] - demo export

pub mod analyze;
pub mod sample;
pub mod show;
pub mod template;
pub mod users;

use crate::directory::types::ProcessedUser;
use crate::pipeline::{run_detailed, PipelineConfig};
use crate::report::sample::generate_sample_csv;
use crate::utils::format::format_number;
use crate::utils::reader::read_export_text;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

/// Where the export text comes from.
#[derive(Debug, Clone, Copy)]
pub struct InputSource<'a> {
    pub file: Option<&'a str>,
    pub sample: bool,
    pub rules: Option<&'a str>,
}

impl InputSource<'_> {
    fn read_text(&self) -> Result<String> {
        match (self.file, self.sample) {
            (_, true) => Ok(generate_sample_csv().to_string()),
            (Some(path), false) => read_export_text(path)
                .with_context(|| format!("Failed to read directory export: {}", path)),
            (None, false) => bail!("No input given. Pass an export file or --sample"),
        }
    }

    fn config(&self) -> Result<PipelineConfig> {
        match self.rules {
            Some(path) => PipelineConfig::from_file(path),
            None => Ok(PipelineConfig::default()),
        }
    }

    fn label(&self) -> &str {
        if self.sample {
            "sample data"
        } else {
            self.file.unwrap_or("-")
        }
    }
}

/// Read, parse, normalize and score the input.
pub fn load_users(source: &InputSource<'_>, now: DateTime<Utc>) -> Result<Vec<ProcessedUser>> {
    let config = source.config()?;
    load_users_with(source, &config, now)
}

/// Like [`load_users`], with an already loaded configuration.
pub fn load_users_with(
    source: &InputSource<'_>,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<Vec<ProcessedUser>> {
    let text = source.read_text()?;

    eprintln!("Processing: {}", source.label());
    let output = run_detailed(&text, config, now)?;

    if output.skipped_lines > 0 {
        eprintln!(
            "[WARN] Skipped {} row(s) with fewer than {} fields",
            format_number(output.skipped_lines),
            crate::directory::parser::MIN_FIELDS
        );
    }
    eprintln!("Scored {} users", format_number(output.users.len()));

    Ok(output.users)
}
