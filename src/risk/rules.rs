//! Scoring rule tables.
//!
//! Each sub-score is an ordered table of `condition -> points -> issue text`
//! rows. Rows are evaluated in table order, every triggered row contributes its
//! points once and its issue once, and the sum is capped at
//! [`ScoringConfig::score_cap`]. Recommendations follow the same pattern
//! without points.
//!
//! [`ScoringConfig::default`] is the stock rule set. A JSON rules file may
//! replace any part of it; omitted fields keep their defaults.
//!
//! ```json
//! {
//!   "escalation_group_count": 20,
//!   "tiers": { "critical": 75, "high": 50, "medium": 25 }
//! }
//! ```

use crate::directory::types::RiskLevel;
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the high-privilege group count in issue text.
pub const COUNT_PLACEHOLDER: &str = "{count}";

/// Groups that confer administrative control over the directory.
pub const HIGH_PRIVILEGE_GROUPS: [&str; 8] = [
    "Domain Admins",
    "Enterprise Admins",
    "Schema Admins",
    "Administrators",
    "Account Operators",
    "Backup Operators",
    "Server Operators",
    "Print Operators",
];

/// Group-name fragments that hint at delegated write or ownership rights.
pub const ESCALATION_KEYWORDS: [&str; 2] = ["owner", "write"];

/// Conditions feeding the privilege sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeCondition {
    /// At least one group matches the high-privilege list.
    HighPrivilegeMembership,
    /// Too many groups, or a group name containing an escalation keyword.
    EscalationPath,
    /// Dormant while holding either of the above.
    DormantWithPrivileges,
}

/// Conditions feeding the password-hygiene sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HygieneCondition {
    PasswordExpired,
    PasswordNeverExpires,
    Dormant,
    MfaMissing,
}

/// Conditions that trigger a remediation recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCondition {
    /// Privilege sub-score above zero.
    HasPrivilegeRisk,
    MfaMissing,
    PasswordNeverExpires,
    Dormant,
}

/// One row of a scoring table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRule<C> {
    pub condition: C,
    pub points: u32,
    /// Issue text; `{count}` expands to the high-privilege group count.
    pub issue: String,
}

impl<C> ScoreRule<C> {
    fn new(condition: C, points: u32, issue: &str) -> Self {
        Self {
            condition,
            points,
            issue: issue.to_string(),
        }
    }

    /// Issue text with the group count substituted.
    pub fn render_issue(&self, high_privilege_count: usize) -> String {
        self.issue
            .replace(COUNT_PLACEHOLDER, &high_privilege_count.to_string())
    }
}

/// One row of the recommendation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub condition: RecommendationCondition,
    pub text: String,
}

impl RecommendationRule {
    fn new(condition: RecommendationCondition, text: &str) -> Self {
        Self {
            condition,
            text: text.to_string(),
        }
    }
}

/// Lower bounds (inclusive) of each risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            critical: 70,
            high: 50,
            medium: 30,
        }
    }
}

impl TierThresholds {
    /// First matching tier, checked from Critical downwards.
    pub fn classify(&self, score: u32) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Complete scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Matched case-insensitively as substrings of group names.
    pub high_privilege_groups: Vec<String>,
    /// Matched case-insensitively as substrings of group names.
    pub escalation_keywords: Vec<String>,
    /// Strictly more groups than this is an escalation path.
    pub escalation_group_count: usize,
    pub privilege_rules: Vec<ScoreRule<PrivilegeCondition>>,
    pub hygiene_rules: Vec<ScoreRule<HygieneCondition>>,
    pub recommendations: Vec<RecommendationRule>,
    /// Upper bound applied to each sub-score.
    pub score_cap: u32,
    pub privilege_weight: f64,
    pub hygiene_weight: f64,
    pub tiers: TierThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        use HygieneCondition as H;
        use PrivilegeCondition as P;
        use RecommendationCondition as R;

        Self {
            high_privilege_groups: HIGH_PRIVILEGE_GROUPS.iter().map(|g| g.to_string()).collect(),
            escalation_keywords: ESCALATION_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            escalation_group_count: 15,
            privilege_rules: vec![
                ScoreRule::new(
                    P::HighPrivilegeMembership,
                    40,
                    "Member of {count} high-privilege group(s)",
                ),
                ScoreRule::new(
                    P::EscalationPath,
                    30,
                    "Potential Privilege Escalation Path (High group count or sensitive keywords)",
                ),
                ScoreRule::new(P::DormantWithPrivileges, 30, "Dormant account with privileges"),
            ],
            hygiene_rules: vec![
                ScoreRule::new(H::PasswordExpired, 40, "Password expired"),
                ScoreRule::new(H::PasswordNeverExpires, 40, "Password set to never expire"),
                ScoreRule::new(H::Dormant, 30, "Account is dormant"),
                ScoreRule::new(H::MfaMissing, 30, "MFA not enabled"),
            ],
            recommendations: vec![
                RecommendationRule::new(R::HasPrivilegeRisk, "Review group memberships"),
                RecommendationRule::new(R::MfaMissing, "Enforce MFA"),
                RecommendationRule::new(
                    R::PasswordNeverExpires,
                    "Disable \"Password Never Expires\"",
                ),
                RecommendationRule::new(R::Dormant, "Disable or remove dormant account"),
            ],
            score_cap: 100,
            privilege_weight: 0.6,
            hygiene_weight: 0.4,
            tiers: TierThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_inclusive() {
        let tiers = TierThresholds::default();
        assert_eq!(tiers.classify(0), RiskLevel::Low);
        assert_eq!(tiers.classify(29), RiskLevel::Low);
        assert_eq!(tiers.classify(30), RiskLevel::Medium);
        assert_eq!(tiers.classify(49), RiskLevel::Medium);
        assert_eq!(tiers.classify(50), RiskLevel::High);
        assert_eq!(tiers.classify(69), RiskLevel::High);
        assert_eq!(tiers.classify(70), RiskLevel::Critical);
        assert_eq!(tiers.classify(100), RiskLevel::Critical);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let tiers = TierThresholds::default();
        let mut previous = tiers.classify(0);
        for score in 1..=100 {
            let current = tiers.classify(score);
            assert!(current >= previous, "tier dropped at score {}", score);
            previous = current;
        }
    }

    #[test]
    fn test_render_issue_count() {
        let rule = ScoreRule::new(PrivilegeCondition::HighPrivilegeMembership, 40, "Member of {count} high-privilege group(s)");
        assert_eq!(rule.render_issue(2), "Member of 2 high-privilege group(s)");
    }

    #[test]
    fn test_partial_rules_file_keeps_defaults() {
        let json = r#"{ "escalation_group_count": 20, "tiers": { "critical": 80 } }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.escalation_group_count, 20);
        assert_eq!(config.tiers.critical, 80);
        assert_eq!(config.tiers.high, 50);
        assert_eq!(config.privilege_rules.len(), 3);
        assert_eq!(config.high_privilege_groups.len(), 8);
    }

    #[test]
    fn test_rule_table_from_json() {
        let json = r#"{ "hygiene_rules": [ { "condition": "mfa_missing", "points": 50, "issue": "No MFA" } ] }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.hygiene_rules.len(), 1);
        assert_eq!(config.hygiene_rules[0].condition, HygieneCondition::MfaMissing);
        assert_eq!(config.hygiene_rules[0].points, 50);
    }
}
