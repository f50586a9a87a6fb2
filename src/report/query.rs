//! Filtering, sorting and paging for the user table.
//!
//! Queries borrow from the processed dataset and return references in the
//! requested order; the source slice is never reordered.

use crate::directory::types::{ProcessedUser, RiskLevel};
use std::cmp::Ordering;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    UserName,
    Department,
    TotalRiskScore,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "username" | "user" => Ok(SortKey::UserName),
            "department" | "dept" => Ok(SortKey::Department),
            "score" | "risk" | "totalriskscore" => Ok(SortKey::TotalRiskScore),
            _ => Err(format!(
                "Invalid sort key '{}'. Use one of: name, department, score",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A table view over processed users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    /// `None` shows every tier.
    pub risk_level: Option<RiskLevel>,
    /// Case-insensitive substring of UserName, SamAccountName or Department.
    pub search: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            risk_level: None,
            search: String::new(),
            sort_key: SortKey::TotalRiskScore,
            direction: SortDirection::Descending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of query results.
#[derive(Debug)]
pub struct QueryPage<'a> {
    pub rows: Vec<&'a ProcessedUser>,
    /// Matches across all pages.
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
    /// 0-based offset of the first row within all matches.
    pub offset: usize,
}

impl UserQuery {
    pub fn matches(&self, user: &ProcessedUser) -> bool {
        let risk_ok = self
            .risk_level
            .map_or(true, |level| user.risk.risk_level == level);
        if !risk_ok {
            return false;
        }

        let needle = self.search.to_lowercase();
        user.user_name().to_lowercase().contains(&needle)
            || user.sam_account_name().to_lowercase().contains(&needle)
            || user
                .user
                .account
                .department
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    fn compare(&self, a: &ProcessedUser, b: &ProcessedUser) -> Ordering {
        let ordering = match self.sort_key {
            SortKey::UserName => a.user_name().cmp(b.user_name()),
            SortKey::Department => a.department().cmp(b.department()),
            SortKey::TotalRiskScore => a.risk.total_risk_score.cmp(&b.risk.total_risk_score),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// All matching users in sort order. Ties keep dataset order.
    pub fn filter_sorted<'a>(&self, users: &'a [ProcessedUser]) -> Vec<&'a ProcessedUser> {
        let mut rows: Vec<&ProcessedUser> = users.iter().filter(|u| self.matches(u)).collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }

    /// The requested page of matching users.
    ///
    /// Pages past the end are empty; a page size of zero is treated as one.
    pub fn page<'a>(&self, users: &'a [ProcessedUser]) -> QueryPage<'a> {
        let matches = self.filter_sorted(users);
        let page_size = self.page_size.max(1);
        let page = self.page.max(1);
        let total_matches = matches.len();
        let total_pages = total_matches / page_size + usize::from(total_matches % page_size != 0);
        let offset = (page - 1).saturating_mul(page_size);

        let rows = matches.into_iter().skip(offset).take(page_size).collect();

        QueryPage {
            rows,
            total_matches,
            page,
            total_pages,
            offset,
        }
    }
}
