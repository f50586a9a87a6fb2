//! Per-user risk scoring.
//!
//! Two independent sub-scores are computed from a [`NormalizedUser`]:
//!
//! - **privilege** - high-privilege membership, escalation paths, dormant
//!   privileged accounts
//! - **password hygiene** - expired or never-expiring passwords, dormancy,
//!   missing MFA
//!
//! The total is `round(privilege * 0.6 + hygiene * 0.4)` and maps onto a
//! [`RiskLevel`] through the tier thresholds.

use super::rules::{
    HygieneCondition, PrivilegeCondition, RecommendationCondition, ScoreRule, ScoringConfig,
};
use crate::directory::types::{NormalizedUser, RiskProfile};

/// Group-derived facts the privilege rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeFacts {
    pub high_privilege_count: usize,
    pub escalation_path: bool,
    pub is_dormant: bool,
}

impl PrivilegeFacts {
    pub fn gather(user: &NormalizedUser, config: &ScoringConfig) -> Self {
        let high_privilege_count = count_high_privilege_groups(&user.groups, config);
        let escalation_path = user.groups.len() > config.escalation_group_count
            || user
                .groups
                .iter()
                .any(|g| contains_any_ignore_case(g, &config.escalation_keywords));

        Self {
            high_privilege_count,
            escalation_path,
            is_dormant: user.is_dormant,
        }
    }

    fn holds(&self, condition: PrivilegeCondition) -> bool {
        match condition {
            PrivilegeCondition::HighPrivilegeMembership => self.high_privilege_count > 0,
            PrivilegeCondition::EscalationPath => self.escalation_path,
            PrivilegeCondition::DormantWithPrivileges => {
                self.is_dormant && (self.high_privilege_count > 0 || self.escalation_path)
            }
        }
    }
}

/// A capped sub-score and the issues that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubScore {
    pub score: u32,
    pub issues: Vec<String>,
}

/// Whether a group name contains any configured high-privilege name.
pub fn is_high_privilege_group(group: &str, config: &ScoringConfig) -> bool {
    contains_any_ignore_case(group, &config.high_privilege_groups)
}

/// Number of groups matching any configured high-privilege name.
pub fn count_high_privilege_groups(groups: &[String], config: &ScoringConfig) -> usize {
    groups
        .iter()
        .filter(|g| is_high_privilege_group(g, config))
        .count()
}

fn contains_any_ignore_case(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

fn apply_rules<C: Copy>(
    rules: &[ScoreRule<C>],
    cap: u32,
    high_privilege_count: usize,
    holds: impl Fn(C) -> bool,
) -> SubScore {
    let mut total = 0u32;
    let mut issues = Vec::new();

    for rule in rules.iter().filter(|rule| holds(rule.condition)) {
        total = total.saturating_add(rule.points);
        issues.push(rule.render_issue(high_privilege_count));
    }

    SubScore {
        score: total.min(cap),
        issues,
    }
}

/// Privilege sub-score for a user.
pub fn privilege_score(user: &NormalizedUser, config: &ScoringConfig) -> SubScore {
    let facts = PrivilegeFacts::gather(user, config);
    apply_rules(
        &config.privilege_rules,
        config.score_cap,
        facts.high_privilege_count,
        |c| facts.holds(c),
    )
}

/// Password-hygiene sub-score for a user.
pub fn hygiene_score(user: &NormalizedUser, config: &ScoringConfig) -> SubScore {
    let high_privilege_count = count_high_privilege_groups(&user.groups, config);
    apply_rules(
        &config.hygiene_rules,
        config.score_cap,
        high_privilege_count,
        |c| match c {
            HygieneCondition::PasswordExpired => user.password_expired,
            HygieneCondition::PasswordNeverExpires => user.password_never_expires,
            HygieneCondition::Dormant => user.is_dormant,
            HygieneCondition::MfaMissing => !user.has_mfa,
        },
    )
}

/// Weighted total of the two sub-scores, rounded half up and capped.
pub fn total_score(privilege: u32, hygiene: u32, config: &ScoringConfig) -> u32 {
    let weighted =
        f64::from(privilege) * config.privilege_weight + f64::from(hygiene) * config.hygiene_weight;
    let rounded = weighted.round().max(0.0) as u32;
    rounded.min(config.score_cap)
}

/// Score a normalized user.
pub fn score(user: &NormalizedUser, config: &ScoringConfig) -> RiskProfile {
    let privilege = privilege_score(user, config);
    let hygiene = hygiene_score(user, config);

    let total_risk_score = total_score(privilege.score, hygiene.score, config);
    let risk_level = config.tiers.classify(total_risk_score);

    let recommendations = config
        .recommendations
        .iter()
        .filter(|rec| match rec.condition {
            RecommendationCondition::HasPrivilegeRisk => privilege.score > 0,
            RecommendationCondition::MfaMissing => !user.has_mfa,
            RecommendationCondition::PasswordNeverExpires => user.password_never_expires,
            RecommendationCondition::Dormant => user.is_dormant,
        })
        .map(|rec| rec.text.clone())
        .collect();

    let mut issues = privilege.issues;
    issues.extend(hygiene.issues);

    RiskProfile {
        privilege_score: privilege.score,
        password_hygiene_score: hygiene.score,
        total_risk_score,
        risk_level,
        issues,
        recommendations,
    }
}
