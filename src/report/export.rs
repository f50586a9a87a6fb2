//! CSV artifacts: the scored report export and the blank input template.
//!
//! The report header is written unquoted; data rows quote every non-numeric
//! cell, so names, departments and the `"; "`-joined issue lists survive any
//! embedded commas. Scores stay bare integers.

use crate::directory::types::{ProcessedUser, INPUT_COLUMNS};
use crate::utils::time::date_stamp;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Columns of the scored report, in order.
pub const EXPORT_COLUMNS: [&str; 12] = [
    "UserName",
    "SamAccountName",
    "Department",
    "Enabled",
    "RiskLevel",
    "TotalRiskScore",
    "PrivilegeScore",
    "HygieneScore",
    "Issues",
    "Recommendations",
    "LastLogonDate",
    "MFAEnabled",
];

pub const TEMPLATE_FILE_NAME: &str = "adhuntx_template.csv";

/// Separator used when flattening issue and recommendation lists.
pub const LIST_SEPARATOR: &str = "; ";

/// Default report file name for a given day, e.g. `adhuntx_report_2024-03-05.csv`.
pub fn report_file_name(now: &DateTime<Utc>) -> String {
    format!("adhuntx_report_{}.csv", date_stamp(now))
}

fn export_row(user: &ProcessedUser) -> [String; 12] {
    let risk = &user.risk;
    [
        user.user_name().to_string(),
        user.sam_account_name().to_string(),
        user.department().to_string(),
        user.user.account.enabled.clone(),
        risk.risk_level.to_string(),
        risk.total_risk_score.to_string(),
        risk.privilege_score.to_string(),
        risk.password_hygiene_score.to_string(),
        risk.issues.join(LIST_SEPARATOR),
        risk.recommendations.join(LIST_SEPARATOR),
        user.user.account.last_logon_date.clone(),
        user.user.has_mfa.to_string(),
    ]
}

/// Render the scored report as CSV text.
pub fn export_csv(users: &[ProcessedUser]) -> Result<String> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    header.write_record(EXPORT_COLUMNS)?;
    let buffer = header
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush report header: {}", e.error()))?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .has_headers(false)
        .from_writer(buffer);
    for user in users {
        rows.write_record(export_row(user))
            .with_context(|| format!("Failed to write report row for {}", user.id))?;
    }
    let buffer = rows
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush report rows: {}", e.error()))?;

    String::from_utf8(buffer).context("Report is not valid UTF-8")
}

/// Write the scored report to `path`, creating parent directories.
///
/// An empty dataset produces no file.
pub fn write_report(users: &[ProcessedUser], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if users.is_empty() {
        bail!("No users to export");
    }

    let contents = export_csv(users)?;
    write_text(path, &contents)
}

/// Header-only CSV listing the recognized input columns.
pub fn template_csv() -> String {
    format!("{}\n", INPUT_COLUMNS.join(","))
}

/// Write the input template to `path`, creating parent directories.
pub fn write_template(path: impl AsRef<Path>) -> Result<()> {
    write_text(path.as_ref(), &template_csv())
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(())
}
