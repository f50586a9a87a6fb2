//! Risk scoring for normalized directory users.
//!
//! - [`rules`] - the scoring rule tables and thresholds
//! - [`scorer`] - privilege and password-hygiene sub-scores, total and tier
//!
//! # Example
//!
//! ```
//! use ad_risk_audit::directory::types::{DirectoryAccount, NormalizedUser, RiskLevel};
//! use ad_risk_audit::risk::{rules::ScoringConfig, scorer::score};
//!
//! let user = NormalizedUser {
//!     account: DirectoryAccount::default(),
//!     groups: vec!["Domain Admins".to_string()],
//!     days_since_login: 3,
//!     is_dormant: false,
//!     has_mfa: false,
//!     is_enabled: true,
//!     password_never_expires: false,
//!     password_expired: false,
//! };
//!
//! let profile = score(&user, &ScoringConfig::default());
//! assert_eq!(profile.privilege_score, 40);
//! assert_eq!(profile.password_hygiene_score, 30);
//! assert_eq!(profile.total_risk_score, 36);
//! assert_eq!(profile.risk_level, RiskLevel::Medium);
//! ```

pub mod rules;
pub mod scorer;
