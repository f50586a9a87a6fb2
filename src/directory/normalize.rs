//! Field normalization: raw string columns into typed account attributes.
//!
//! Normalization is total. Every raw record yields exactly one
//! [`NormalizedUser`]; bad dates fall back to the stale sentinel and unknown
//! boolean strings read as `false`.

use super::types::{DirectoryAccount, NormalizedUser, RawUserRecord};
use crate::utils::time::days_since;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Day count used for missing or unparseable dates.
pub const STALE_SENTINEL_DAYS: i64 = 9999;

/// Accounts idle for more than this many days are dormant.
pub const DORMANCY_THRESHOLD_DAYS: i64 = 90;

/// Tunables for date-derived attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizePolicy {
    /// Strictly more idle days than this marks an account dormant.
    pub dormancy_threshold_days: i64,
    /// Day count substituted for a missing or unparseable date. The default
    /// treats such accounts as maximally stale, which marks them dormant and
    /// their passwords expired.
    pub unparseable_date_days: i64,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        Self {
            dormancy_threshold_days: DORMANCY_THRESHOLD_DAYS,
            unparseable_date_days: STALE_SENTINEL_DAYS,
        }
    }
}

/// Normalize one raw record relative to `now`.
pub fn normalize(record: &RawUserRecord, now: DateTime<Utc>, policy: &NormalizePolicy) -> NormalizedUser {
    let account = DirectoryAccount::from_record(record);
    let sentinel = policy.unparseable_date_days;

    let groups = split_groups(&account.member_of);
    let is_enabled = is_true(&account.enabled);
    let days_since_login = days_since(&account.last_logon_date, now, sentinel).max(0);

    let dormant_flag = account.dormant_account_flag.as_deref().is_some_and(is_true);
    let is_dormant = dormant_flag || days_since_login > policy.dormancy_threshold_days;

    let has_mfa = is_true(&account.mfa_status);
    let password_never_expires = is_true(&account.password_never_expires);

    let days_past_expiry = days_since(&account.password_expiry_date, now, sentinel);
    let password_expired = days_past_expiry > 0 && !password_never_expires;

    NormalizedUser {
        account,
        groups,
        days_since_login,
        is_dormant,
        has_mfa,
        is_enabled,
        password_never_expires,
        password_expired,
    }
}

/// Split a group-membership cell on `;`, `|` or `,`.
///
/// Every occurrence of any of the three delimiters splits, so a cell that
/// mixes them is split on all of them. Tokens are trimmed but kept even when
/// empty; an empty cell has no groups.
pub fn split_groups(member_of: &str) -> Vec<String> {
    if member_of.is_empty() {
        return Vec::new();
    }
    member_of
        .split([';', '|', ','])
        .map(|g| g.trim().to_string())
        .collect()
}

/// Case-insensitive match against the literal `true`.
pub fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_directory_date;

    fn now() -> DateTime<Utc> {
        parse_directory_date("2023-10-11T12:00:00Z").unwrap()
    }

    fn record(pairs: &[(&str, &str)]) -> RawUserRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_split_groups() {
        assert_eq!(split_groups("Domain Admins;Users"), vec!["Domain Admins", "Users"]);
        assert_eq!(split_groups("A | B"), vec!["A", "B"]);
        assert_eq!(split_groups("A,B;C|D"), vec!["A", "B", "C", "D"]);
        assert!(split_groups("").is_empty());
    }

    #[test]
    fn test_split_groups_keeps_order_and_duplicates() {
        assert_eq!(split_groups("B;A;B"), vec!["B", "A", "B"]);
        assert_eq!(split_groups("A;;B"), vec!["A", "", "B"]);
    }

    #[test]
    fn test_is_true() {
        assert!(is_true("True"));
        assert!(is_true("TRUE"));
        assert!(is_true("true"));
        assert!(!is_true("yes"));
        assert!(!is_true(""));
        assert!(!is_true(" true"));
    }

    #[test]
    fn test_recent_login_not_dormant() {
        let user = normalize(
            &record(&[("LastLogonDate", "2023-10-01"), ("MFAStatus", "True")]),
            now(),
            &NormalizePolicy::default(),
        );
        assert_eq!(user.days_since_login, 10);
        assert!(!user.is_dormant);
        assert!(user.has_mfa);
    }

    #[test]
    fn test_dormancy_threshold_is_strict() {
        let policy = NormalizePolicy::default();
        let at_threshold = normalize(&record(&[("LastLogonDate", "2023-07-13")]), now(), &policy);
        assert_eq!(at_threshold.days_since_login, 90);
        assert!(!at_threshold.is_dormant);

        let past_threshold = normalize(&record(&[("LastLogonDate", "2023-07-12")]), now(), &policy);
        assert_eq!(past_threshold.days_since_login, 91);
        assert!(past_threshold.is_dormant);
    }

    #[test]
    fn test_explicit_dormant_flag() {
        let user = normalize(
            &record(&[("LastLogonDate", "2023-10-10"), ("DormantAccountFlag", "true")]),
            now(),
            &NormalizePolicy::default(),
        );
        assert!(user.is_dormant);
    }

    #[test]
    fn test_missing_dates_use_sentinel() {
        let user = normalize(&record(&[("UserName", "x")]), now(), &NormalizePolicy::default());
        assert_eq!(user.days_since_login, STALE_SENTINEL_DAYS);
        assert!(user.is_dormant);
        assert!(user.password_expired);
    }

    #[test]
    fn test_sentinel_policy_is_configurable() {
        let policy = NormalizePolicy {
            unparseable_date_days: 0,
            ..NormalizePolicy::default()
        };
        let user = normalize(&record(&[("LastLogonDate", "unknown")]), now(), &policy);
        assert_eq!(user.days_since_login, 0);
        assert!(!user.is_dormant);
        assert!(!user.password_expired);
    }

    #[test]
    fn test_password_expiry() {
        let policy = NormalizePolicy::default();
        let expired = normalize(&record(&[("PasswordExpiryDate", "2023-09-01")]), now(), &policy);
        assert!(expired.password_expired);

        let future = normalize(&record(&[("PasswordExpiryDate", "2024-09-01")]), now(), &policy);
        assert!(!future.password_expired);

        let never = normalize(
            &record(&[("PasswordExpiryDate", "2023-09-01"), ("PasswordNeverExpires", "True")]),
            now(),
            &policy,
        );
        assert!(never.password_never_expires);
        assert!(!never.password_expired);
    }

    #[test]
    fn test_future_login_clamped_to_zero() {
        let user = normalize(
            &record(&[("LastLogonDate", "2024-01-01")]),
            now(),
            &NormalizePolicy::default(),
        );
        assert_eq!(user.days_since_login, 0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = record(&[
            ("UserName", "John Doe"),
            ("MemberOf", "Domain Admins;Users"),
            ("LastLogonDate", "bad date"),
            ("Enabled", "True"),
        ]);
        let policy = NormalizePolicy::default();
        assert_eq!(normalize(&raw, now(), &policy), normalize(&raw, now(), &policy));
    }
}
