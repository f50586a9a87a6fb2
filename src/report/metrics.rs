//! Dashboard aggregates over a processed dataset.
//!
//! All aggregates read the user slice and never modify it.

use crate::directory::types::{ProcessedUser, RiskLevel};
use serde::Serialize;

/// Sub-scores above this count as "high" in the issue chart and risk matrix.
pub const HIGH_SUBSCORE_THRESHOLD: u32 = 50;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_users: usize,
    pub critical_risk_count: usize,
    pub high_risk_count: usize,
    /// Mean total risk score, rounded.
    pub avg_risk_score: u32,
    pub dormant_count: usize,
    /// Percentage of users with MFA, rounded.
    pub mfa_adoption_rate: u32,
}

impl DashboardMetrics {
    pub fn from_users(users: &[ProcessedUser]) -> Self {
        if users.is_empty() {
            return Self::default();
        }

        let total = users.len();
        let score_sum: u64 = users
            .iter()
            .map(|u| u64::from(u.risk.total_risk_score))
            .sum();
        let with_mfa = users.iter().filter(|u| u.user.has_mfa).count();

        Self {
            total_users: total,
            critical_risk_count: count_level(users, RiskLevel::Critical),
            high_risk_count: count_level(users, RiskLevel::High),
            avg_risk_score: (score_sum as f64 / total as f64).round() as u32,
            dormant_count: users.iter().filter(|u| u.user.is_dormant).count(),
            mfa_adoption_rate: (with_mfa as f64 / total as f64 * 100.0).round() as u32,
        }
    }
}

fn count_level(users: &[ProcessedUser], level: RiskLevel) -> usize {
    users.iter().filter(|u| u.risk.risk_level == level).count()
}

/// Number of users per tier, most severe first.
pub fn risk_distribution(users: &[ProcessedUser]) -> Vec<(RiskLevel, usize)> {
    RiskLevel::ALL
        .into_iter()
        .map(|level| (level, count_level(users, level)))
        .collect()
}

/// Counts behind the "top issues" chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCategoryCounts {
    pub no_mfa: usize,
    pub dormant: usize,
    pub password_never_expires: usize,
    pub high_privilege: usize,
}

impl IssueCategoryCounts {
    pub fn from_users(users: &[ProcessedUser]) -> Self {
        Self {
            no_mfa: users.iter().filter(|u| !u.user.has_mfa).count(),
            dormant: users.iter().filter(|u| u.user.is_dormant).count(),
            password_never_expires: users
                .iter()
                .filter(|u| u.user.password_never_expires)
                .count(),
            high_privilege: users
                .iter()
                .filter(|u| u.risk.privilege_score > HIGH_SUBSCORE_THRESHOLD)
                .count(),
        }
    }

    /// Labelled rows in chart order.
    pub fn rows(&self) -> [(&'static str, usize); 4] {
        [
            ("No MFA", self.no_mfa),
            ("Dormant", self.dormant),
            ("Pwd No Exp", self.password_never_expires),
            ("High Priv", self.high_privilege),
        ]
    }
}

/// Users bucketed by high/low privilege score against high/low hygiene score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMatrix {
    pub low_privilege_low_hygiene: usize,
    pub low_privilege_high_hygiene: usize,
    pub high_privilege_low_hygiene: usize,
    pub high_privilege_high_hygiene: usize,
}

impl RiskMatrix {
    pub fn from_users(users: &[ProcessedUser]) -> Self {
        let mut matrix = Self::default();
        for user in users {
            let high_privilege = user.risk.privilege_score > HIGH_SUBSCORE_THRESHOLD;
            let poor_hygiene = user.risk.password_hygiene_score > HIGH_SUBSCORE_THRESHOLD;
            let cell = match (high_privilege, poor_hygiene) {
                (false, false) => &mut matrix.low_privilege_low_hygiene,
                (false, true) => &mut matrix.low_privilege_high_hygiene,
                (true, false) => &mut matrix.high_privilege_low_hygiene,
                (true, true) => &mut matrix.high_privilege_high_hygiene,
            };
            *cell += 1;
        }
        matrix
    }
}

/// Counts for the quick-remediation panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationSummary {
    pub dormant_privileged: usize,
    pub missing_mfa: usize,
    pub password_never_expires: usize,
}

impl RemediationSummary {
    pub fn from_users(users: &[ProcessedUser]) -> Self {
        Self {
            dormant_privileged: users
                .iter()
                .filter(|u| u.user.is_dormant && u.risk.privilege_score > 0)
                .count(),
            missing_mfa: users.iter().filter(|u| !u.user.has_mfa).count(),
            password_never_expires: users
                .iter()
                .filter(|u| u.user.password_never_expires)
                .count(),
        }
    }
}

/// Everything the dashboard shows, bundled for JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub metrics: DashboardMetrics,
    pub distribution: Vec<(RiskLevel, usize)>,
    pub issues: IssueCategoryCounts,
    pub matrix: RiskMatrix,
    pub remediation: RemediationSummary,
}

impl DashboardSummary {
    pub fn from_users(users: &[ProcessedUser]) -> Self {
        Self {
            metrics: DashboardMetrics::from_users(users),
            distribution: risk_distribution(users),
            issues: IssueCategoryCounts::from_users(users),
            matrix: RiskMatrix::from_users(users),
            remediation: RemediationSummary::from_users(users),
        }
    }
}
