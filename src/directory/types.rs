//! Data structures for directory-service user exports and their risk profiles.
//!
//! Records move through three shapes:
//!
//! - [`RawUserRecord`] - header name to raw string value, straight from the CSV
//! - [`NormalizedUser`] - typed account columns plus derived attributes
//! - [`ProcessedUser`] - a normalized user with an id and a [`RiskProfile`]
//!
//! The serialized form keeps the export's PascalCase column names for the
//! account fields and camelCase names for derived attributes, so a cached
//! dataset reads the same way the source file does.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Column names recognized in a directory export, in template order.
pub const INPUT_COLUMNS: [&str; 12] = [
    "UserName",
    "SamAccountName",
    "Enabled",
    "LastLogonDate",
    "MemberOf",
    "Role",
    "Department",
    "PasswordLastSet",
    "PasswordExpiryDate",
    "MFAStatus",
    "PasswordNeverExpires",
    "DormantAccountFlag",
];

/// One data line of a directory export, keyed by header name.
///
/// Unrecognized columns are kept here even though normalization ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawUserRecord {
    fields: HashMap<String, String>,
}

impl RawUserRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. A repeated header overwrites the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Value of a field, or `""` when the column is absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    /// Value of a field, distinguishing an absent column from an empty cell.
    pub fn get_opt(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawUserRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// The recognized account columns of a record, as exported.
///
/// `Role`, `Department` and `DormantAccountFlag` are optional in the source
/// file and stay `None` when their column is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryAccount {
    pub user_name: String,
    pub sam_account_name: String,
    pub enabled: String,
    pub last_logon_date: String,
    pub member_of: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub password_last_set: String,
    pub password_expiry_date: String,
    #[serde(rename = "MFAStatus")]
    pub mfa_status: String,
    pub password_never_expires: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dormant_account_flag: Option<String>,
}

impl DirectoryAccount {
    pub fn from_record(record: &RawUserRecord) -> Self {
        let text = |name: &str| record.get(name).to_string();
        let optional = |name: &str| record.get_opt(name).map(str::to_string);

        Self {
            user_name: text("UserName"),
            sam_account_name: text("SamAccountName"),
            enabled: text("Enabled"),
            last_logon_date: text("LastLogonDate"),
            member_of: text("MemberOf"),
            role: optional("Role"),
            department: optional("Department"),
            password_last_set: text("PasswordLastSet"),
            password_expiry_date: text("PasswordExpiryDate"),
            mfa_status: text("MFAStatus"),
            password_never_expires: text("PasswordNeverExpires"),
            dormant_account_flag: optional("DormantAccountFlag"),
        }
    }

    /// Department for display, `""` when the column is missing.
    pub fn department_or_empty(&self) -> &str {
        self.department.as_deref().unwrap_or("")
    }
}

/// A directory account with typed, query-ready attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUser {
    #[serde(flatten)]
    pub account: DirectoryAccount,
    /// Group names in export order; duplicates are kept.
    pub groups: Vec<String>,
    /// Whole days since last logon, or the stale sentinel when unknown.
    pub days_since_login: i64,
    pub is_dormant: bool,
    #[serde(rename = "hasMFA")]
    pub has_mfa: bool,
    pub is_enabled: bool,
    pub password_never_expires: bool,
    pub password_expired: bool,
}

/// Risk tier derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// All tiers, most severe first.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Critical",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid risk level '{}'. Use one of: Critical, High, Medium, Low",
                    s
                )
            })
    }
}

/// Scores, tier and findings attached to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub privilege_score: u32,
    pub password_hygiene_score: u32,
    pub total_risk_score: u32,
    pub risk_level: RiskLevel,
    /// Privilege issues first, then hygiene issues.
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A fully scored user, as handed to every downstream consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedUser {
    /// `user-<index>` within one pipeline run.
    pub id: String,
    #[serde(flatten)]
    pub user: NormalizedUser,
    pub risk: RiskProfile,
}

impl ProcessedUser {
    pub fn user_name(&self) -> &str {
        &self.user.account.user_name
    }

    pub fn sam_account_name(&self) -> &str {
        &self.user.account.sam_account_name
    }

    pub fn department(&self) -> &str {
        self.user.account.department_or_empty()
    }
}
