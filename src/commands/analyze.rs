//! Directory risk overview.
//!
//! Runs the full pipeline over an export and prints the dashboard: headline
//! metrics, tier distribution, top issues, the privilege/hygiene matrix,
//! quick remediation counts and the highest-risk accounts.
//!
//! # Usage
//!
//! ```bash
//! # Analyze an export (plain or compressed)
//! ad-risk analyze ad_users.csv
//! ad-risk analyze ad_users.csv.gz --top 25
//!
//! # Try it on the built-in demo data
//! ad-risk analyze --sample
//!
//! # Write the scored report (default name adhuntx_report_<date>.csv)
//! ad-risk analyze ad_users.csv --export
//! ad-risk analyze ad_users.csv --export=reports/q3.csv
//!
//! # Full JSON output and a cache of the last import
//! ad-risk analyze ad_users.csv --json results.json --cache .ad-risk/last_import.json
//!
//! # Custom scoring rules
//! ad-risk analyze ad_users.csv --rules rules.json
//! ```

use super::{load_users, InputSource};
use crate::directory::types::ProcessedUser;
use crate::report::cache;
use crate::report::export::{report_file_name, write_report};
use crate::report::metrics::DashboardSummary;
use crate::report::query::UserQuery;
use crate::utils::format::{bar, format_number, truncate};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Output destinations for an analysis run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOutputs<'a> {
    /// Report CSV path; an empty string picks the dated default name.
    pub export: Option<&'a str>,
    pub json: Option<&'a str>,
    pub cache: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: DateTime<Utc>,
    summary: &'a DashboardSummary,
    users: &'a [ProcessedUser],
}

pub fn run(source: &InputSource<'_>, outputs: &AnalyzeOutputs<'_>, top: usize) -> Result<()> {
    let now = Utc::now();
    let users = load_users(source, now)?;
    let summary = DashboardSummary::from_users(&users);

    print_overview(&users, &summary, top);

    if let Some(export) = outputs.export {
        let path = if export.is_empty() {
            report_file_name(&now)
        } else {
            export.to_string()
        };
        write_report(&users, &path)?;
        println!("\nReport written to: {}", path);
    }

    if let Some(json_path) = outputs.json {
        write_json(json_path, &summary, &users, now)?;
        println!("JSON written to: {}", json_path);
    }

    if let Some(cache_path) = outputs.cache {
        match cache::store(cache_path, &users, now) {
            Ok(count) => println!("Cached {} users to: {}", count, cache_path),
            Err(e) => eprintln!("[WARN] Could not cache last import: {:#}", e),
        }
    }

    Ok(())
}

fn write_json(
    path: &str,
    summary: &DashboardSummary,
    users: &[ProcessedUser],
    now: DateTime<Utc>,
) -> Result<()> {
    let output = JsonOutput {
        generated_at: now,
        summary,
        users,
    };
    let file = File::create(path).with_context(|| format!("Failed to create JSON file: {}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &output)
        .with_context(|| format!("Failed to write JSON file: {}", path))?;
    writer.flush()?;
    Ok(())
}

fn print_overview(users: &[ProcessedUser], summary: &DashboardSummary, top: usize) {
    let metrics = &summary.metrics;
    let total = metrics.total_users;

    println!("\n{}", "=".repeat(100));
    println!("Directory Risk Overview");
    println!("{}", "=".repeat(100));
    println!("Total Users:        {}", format_number(total));
    println!(
        "Critical Risk:      {}",
        format_number(metrics.critical_risk_count)
    );
    println!("High Risk:          {}", format_number(metrics.high_risk_count));
    println!(
        "Avg Risk Score:     {} / 100 ({})",
        metrics.avg_risk_score,
        if metrics.avg_risk_score > 50 {
            "Elevated Risk"
        } else {
            "Acceptable"
        }
    );
    println!("Dormant Accounts:   {}", format_number(metrics.dormant_count));
    println!("MFA Adoption:       {}%", metrics.mfa_adoption_rate);

    println!("\n1. Risk Distribution");
    println!("{}", "-".repeat(100));
    for (level, count) in &summary.distribution {
        println!(
            "{:<10} {:>8}  {}",
            level.as_str(),
            format_number(*count),
            bar(*count, total, 50)
        );
    }

    println!("\n2. Top Issues");
    println!("{}", "-".repeat(100));
    for (label, count) in summary.issues.rows() {
        println!(
            "{:<12} {:>8}  {}",
            label,
            format_number(count),
            bar(count, total, 50)
        );
    }

    let matrix = &summary.matrix;
    println!("\n3. Risk Matrix (privilege vs. password hygiene, high = score > 50)");
    println!("{}", "-".repeat(100));
    println!("{:<22} {:>18} {:>18}", "", "Low Priv", "High Priv");
    println!(
        "{:<22} {:>18} {:>18}",
        "High Hygiene Risk",
        format_number(matrix.low_privilege_high_hygiene),
        format_number(matrix.high_privilege_high_hygiene)
    );
    println!(
        "{:<22} {:>18} {:>18}",
        "Low Hygiene Risk",
        format_number(matrix.low_privilege_low_hygiene),
        format_number(matrix.high_privilege_low_hygiene)
    );

    let remediation = &summary.remediation;
    println!("\n4. Quick Remediation");
    println!("{}", "-".repeat(100));
    println!(
        "Dormant privileged accounts:   remove {} account(s)",
        format_number(remediation.dormant_privileged)
    );
    println!(
        "MFA not enabled:               enforce for {} user(s)",
        format_number(remediation.missing_mfa)
    );
    println!(
        "Password never expires:        fix {} account(s)",
        format_number(remediation.password_never_expires)
    );

    let ranked = UserQuery::default().filter_sorted(users);
    println!("\n5. Top {} Highest-Risk Accounts", top.min(ranked.len()));
    println!("{}", "-".repeat(100));
    println!(
        "{:<28} {:<20} {:<16} {:<10} {:>6} {:>6} {:>6}",
        "User", "SamAccountName", "Department", "Level", "Total", "Priv", "Hyg"
    );
    println!("{}", "-".repeat(100));
    for user in ranked.iter().take(top) {
        println!(
            "{:<28} {:<20} {:<16} {:<10} {:>6} {:>6} {:>6}",
            truncate(user.user_name(), 27),
            truncate(user.sam_account_name(), 19),
            truncate(user.department(), 15),
            user.risk.risk_level.as_str(),
            user.risk.total_risk_score,
            user.risk.privilege_score,
            user.risk.password_hygiene_score
        );
    }
    println!("{}", "=".repeat(100));
}
