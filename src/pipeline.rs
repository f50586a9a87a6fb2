//! The `text -> processed users` pipeline.
//!
//! Parsing, normalization and scoring run synchronously in one pass. Each
//! output record gets `id = "user-<index>"` in input order, so ids are only
//! stable within a single run.

use crate::directory::normalize::{normalize, NormalizePolicy};
use crate::directory::parser::parse_export;
use crate::directory::types::ProcessedUser;
use crate::risk::rules::ScoringConfig;
use crate::risk::scorer::score;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("No valid users found in CSV. Re-check the file and try again.")]
    NoValidUsers,

    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Everything that tunes a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalize: NormalizePolicy,
    pub scoring: ScoringConfig,
}

impl PipelineConfig {
    /// Load a JSON rules file. Omitted sections keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse rules file: {}", path.display()))
    }
}

/// Run the pipeline with the default configuration at the current time.
pub fn run(raw_text: &str) -> Result<Vec<ProcessedUser>, PipelineError> {
    run_with(raw_text, &PipelineConfig::default(), Utc::now())
}

/// Run the pipeline with an explicit configuration and reference time.
pub fn run_with(
    raw_text: &str,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<Vec<ProcessedUser>, PipelineError> {
    run_detailed(raw_text, config, now).map(|output| output.users)
}

/// Result of a pipeline run along with parse statistics.
#[derive(Debug)]
pub struct PipelineOutput {
    pub users: Vec<ProcessedUser>,
    /// Data lines dropped for having too few fields.
    pub skipped_lines: usize,
}

/// Run the pipeline and keep the parse statistics.
pub fn run_detailed(
    raw_text: &str,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<PipelineOutput, PipelineError> {
    let parsed = parse_export(raw_text);
    if parsed.skipped_lines > 0 {
        debug!(
            skipped = parsed.skipped_lines,
            "Dropped rows with too few fields"
        );
    }
    if parsed.records.is_empty() {
        return Err(PipelineError::NoValidUsers);
    }

    let users = parsed
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let user = normalize(record, now, &config.normalize);
            let risk = score(&user, &config.scoring);
            ProcessedUser {
                id: format!("user-{}", idx),
                user,
                risk,
            }
        })
        .collect::<Vec<_>>();

    debug!(users = users.len(), "Scored directory export");
    Ok(PipelineOutput {
        users,
        skipped_lines: parsed.skipped_lines,
    })
}

/// The current dataset: processed users of the last successful import.
///
/// Imports replace the whole dataset; nothing is merged with earlier data.
#[derive(Debug, Default)]
pub struct Dataset {
    users: Vec<ProcessedUser>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset with the result of a new run.
    ///
    /// On error the previous dataset is left as it was.
    pub fn import(
        &mut self,
        raw_text: &str,
        config: &PipelineConfig,
        now: DateTime<Utc>,
    ) -> Result<usize, PipelineError> {
        let users = run_with(raw_text, config, now)?;
        self.users = users;
        Ok(self.users.len())
    }

    pub fn users(&self) -> &[ProcessedUser] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn reset(&mut self) {
        self.users.clear();
    }

    /// Find a user by id or, case-insensitively, by SamAccountName.
    pub fn find(&self, key: &str) -> Result<&ProcessedUser, PipelineError> {
        find_user(&self.users, key)
    }
}

/// Find a user by id or, case-insensitively, by SamAccountName.
pub fn find_user<'a>(users: &'a [ProcessedUser], key: &str) -> Result<&'a ProcessedUser, PipelineError> {
    users
        .iter()
        .find(|u| u.id == key)
        .or_else(|| {
            users
                .iter()
                .find(|u| u.sam_account_name().eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| PipelineError::UserNotFound(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::types::RiskLevel;
    use crate::utils::time::parse_directory_date;

    fn now() -> DateTime<Utc> {
        parse_directory_date("2023-10-11T12:00:00Z").unwrap()
    }

    #[test]
    fn test_run_assigns_positional_ids() {
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                    A,a,True,2023-10-01,Users\n\
                    B,b,True,2023-10-01,Users\n";
        let users = run_with(text, &PipelineConfig::default(), now()).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "user-0");
        assert_eq!(users[1].id, "user-1");
        assert_eq!(users[1].sam_account_name(), "b");
    }

    #[test]
    fn test_run_domain_admin_scenario() {
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                    John Doe,jdoe,True,2023-10-01,Domain Admins;Users";
        let users = run_with(text, &PipelineConfig::default(), now()).unwrap();

        assert_eq!(users.len(), 1);
        let user = &users[0];
        assert_eq!(user.user.groups, vec!["Domain Admins", "Users"]);
        assert!(user.user.is_enabled);
        assert!(!user.user.is_dormant);
        assert!(user.risk.privilege_score >= 40);
        assert!(user
            .risk
            .issues
            .contains(&"Member of 1 high-privilege group(s)".to_string()));
    }

    #[test]
    fn test_run_header_only_is_error() {
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n";
        assert_eq!(
            run_with(text, &PipelineConfig::default(), now()),
            Err(PipelineError::NoValidUsers)
        );
        assert_eq!(run(""), Err(PipelineError::NoValidUsers));
    }

    #[test]
    fn test_run_detailed_counts_skipped_rows() {
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                    A,a,True,2023-10-01,Users\n\
                    truncated,row\n";
        let output = run_detailed(text, &PipelineConfig::default(), now()).unwrap();

        assert_eq!(output.users.len(), 1);
        assert_eq!(output.skipped_lines, 1);
    }

    #[test]
    fn test_dataset_import_replaces() {
        let config = PipelineConfig::default();
        let mut dataset = Dataset::new();

        let first = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                     A,a,True,2023-10-01,Users\n\
                     B,b,True,2023-10-01,Users\n";
        assert_eq!(dataset.import(first, &config, now()).unwrap(), 2);

        let second = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                      C,c,True,2023-10-01,Domain Admins\n";
        assert_eq!(dataset.import(second, &config, now()).unwrap(), 1);
        assert_eq!(dataset.users()[0].id, "user-0");
        assert_eq!(dataset.users()[0].user_name(), "C");
    }

    #[test]
    fn test_dataset_failed_import_keeps_previous() {
        let config = PipelineConfig::default();
        let mut dataset = Dataset::new();
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                    A,a,True,2023-10-01,Users\n";
        dataset.import(text, &config, now()).unwrap();

        let err = dataset.import("garbage", &config, now()).unwrap_err();
        assert_eq!(err, PipelineError::NoValidUsers);
        assert_eq!(dataset.users().len(), 1);

        dataset.reset();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_find_user() {
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf,MFAStatus\n\
                    A,alice,True,2023-10-01,Users,True\n\
                    B,bob,True,2023-10-01,Users,False\n";
        let mut dataset = Dataset::new();
        dataset
            .import(text, &PipelineConfig::default(), now())
            .unwrap();

        assert_eq!(dataset.find("user-1").unwrap().user_name(), "B");
        assert_eq!(dataset.find("ALICE").unwrap().id, "user-0");
        assert_eq!(
            dataset.find("carol").unwrap_err(),
            PipelineError::UserNotFound("carol".to_string())
        );
    }

    #[test]
    fn test_custom_config_changes_tiers() {
        let mut config = PipelineConfig::default();
        config.scoring.tiers.high = 60;
        let text = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n\
                    John Doe,jdoe,True,2023-10-01,Domain Admins";
        let users = run_with(text, &config, now()).unwrap();

        // Missing expiry date counts as expired (+40), missing MFA status as no MFA (+30).
        assert_eq!(users[0].risk.privilege_score, 40);
        assert_eq!(users[0].risk.password_hygiene_score, 70);
        assert_eq!(users[0].risk.total_risk_score, 52);
        assert_eq!(users[0].risk.risk_level, RiskLevel::Medium);
    }
}
