//! Paged user table.
//!
//! Filters the scored users by risk tier and a free-text search over name,
//! SAM account name and department, then sorts and pages the result.
//!
//! # Usage
//!
//! ```bash
//! # Highest-risk users first, 10 per page
//! ad-risk users ad_users.csv
//!
//! # Only critical accounts in Finance
//! ad-risk users ad_users.csv --risk-level critical --search finance
//!
//! # Alphabetical, page 2 of 25-row pages
//! ad-risk users ad_users.csv --sort name --asc --page 2 --page-size 25
//! ```

use super::{load_users, InputSource};
use crate::directory::types::RiskLevel;
use crate::report::query::{QueryPage, SortDirection, SortKey, UserQuery};
use crate::utils::format::{format_number, truncate, yes_no};
use anyhow::{anyhow, Result};
use chrono::Utc;

/// Table options as given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct TableOptions<'a> {
    /// Tier name, or `all` / `None` for every tier.
    pub risk_level: Option<&'a str>,
    pub search: Option<&'a str>,
    pub sort: &'a str,
    pub ascending: bool,
    pub page: usize,
    pub page_size: usize,
}

impl TableOptions<'_> {
    pub fn to_query(&self) -> Result<UserQuery> {
        let risk_level = match self.risk_level {
            None => None,
            Some(level) if level.eq_ignore_ascii_case("all") => None,
            Some(level) => Some(level.parse::<RiskLevel>().map_err(|e| anyhow!(e))?),
        };
        let sort_key = self.sort.parse::<SortKey>().map_err(|e| anyhow!(e))?;

        Ok(UserQuery {
            risk_level,
            search: self.search.unwrap_or_default().to_string(),
            sort_key,
            direction: if self.ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
            page: self.page,
            page_size: self.page_size,
        })
    }
}

pub fn run(source: &InputSource<'_>, options: &TableOptions<'_>) -> Result<()> {
    let query = options.to_query()?;
    let users = load_users(source, Utc::now())?;
    let page = query.page(&users);

    print_table(&page);
    Ok(())
}

fn print_table(page: &QueryPage<'_>) {
    println!("\n{}", "=".repeat(120));
    println!(
        "{:<26} {:<18} {:<16} {:<10} {:>6} {:>6} {:>6} {:<5} {:<8} {:>6}",
        "User",
        "SamAccountName",
        "Department",
        "Level",
        "Total",
        "Priv",
        "Hyg",
        "MFA",
        "Dormant",
        "Days"
    );
    println!("{}", "=".repeat(120));

    if page.rows.is_empty() {
        println!("No users match the current filters.");
    }

    for user in &page.rows {
        println!(
            "{:<26} {:<18} {:<16} {:<10} {:>6} {:>6} {:>6} {:<5} {:<8} {:>6}",
            truncate(user.user_name(), 25),
            truncate(user.sam_account_name(), 17),
            truncate(user.department(), 15),
            user.risk.risk_level.as_str(),
            user.risk.total_risk_score,
            user.risk.privilege_score,
            user.risk.password_hygiene_score,
            yes_no(user.user.has_mfa),
            yes_no(user.user.is_dormant),
            user.user.days_since_login
        );
    }

    println!("{}", "-".repeat(120));
    if page.rows.is_empty() {
        println!(
            "Page {} of {} ({} matching users)",
            page.page,
            page.total_pages,
            format_number(page.total_matches)
        );
    } else {
        println!(
            "Showing {} to {} of {} users (page {} of {})",
            format_number(page.offset + 1),
            format_number(page.offset + page.rows.len()),
            format_number(page.total_matches),
            page.page,
            page.total_pages
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options<'a>() -> TableOptions<'a> {
        TableOptions {
            risk_level: None,
            search: None,
            sort: "score",
            ascending: false,
            page: 1,
            page_size: 10,
        }
    }

    #[test]
    fn test_default_options_match_default_query() {
        assert_eq!(options().to_query().unwrap(), UserQuery::default());
    }

    #[test]
    fn test_all_means_no_tier_filter() {
        let opts = TableOptions {
            risk_level: Some("ALL"),
            ..options()
        };
        assert_eq!(opts.to_query().unwrap().risk_level, None);

        let opts = TableOptions {
            risk_level: Some("high"),
            ..options()
        };
        assert_eq!(opts.to_query().unwrap().risk_level, Some(RiskLevel::High));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let bad_level = TableOptions {
            risk_level: Some("severe"),
            ..options()
        };
        let err = bad_level.to_query().unwrap_err().to_string();
        assert!(err.contains("Invalid risk level"));

        let bad_sort = TableOptions {
            sort: "email",
            ..options()
        };
        assert!(bad_sort.to_query().is_err());
    }
}
