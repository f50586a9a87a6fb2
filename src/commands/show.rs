//! Single-account drill-down.
//!
//! Looks up one user by id (`user-3`) or SAM account name and prints the
//! account attributes, group memberships, score breakdown, detected issues
//! and recommendations.
//!
//! # Usage
//!
//! ```bash
//! ad-risk show ad_users.csv --user jsmith
//! ad-risk show --sample --user user-1
//! ```

use super::{load_users_with, InputSource};
use crate::directory::types::ProcessedUser;
use crate::pipeline::{find_user, PipelineConfig};
use crate::risk::scorer::is_high_privilege_group;
use crate::utils::format::yes_no;
use anyhow::Result;
use chrono::Utc;

pub fn run(source: &InputSource<'_>, key: &str) -> Result<()> {
    let config = source.config()?;
    let users = load_users_with(source, &config, Utc::now())?;
    let user = find_user(&users, key)?;

    print_details(user, &config);
    Ok(())
}

fn print_details(user: &ProcessedUser, config: &PipelineConfig) {
    let account = &user.user.account;
    let risk = &user.risk;

    println!("\n{}", "=".repeat(80));
    println!("{} ({})", user.user_name(), user.sam_account_name());
    println!("{}", "=".repeat(80));
    println!("Id:                 {}", user.id);
    println!("Department:         {}", user.department());
    println!("Role:               {}", account.role.as_deref().unwrap_or(""));
    println!("Enabled:            {}", yes_no(user.user.is_enabled));
    println!("MFA:                {}", yes_no(user.user.has_mfa));
    println!("Last Logon:         {}", account.last_logon_date);
    if user.user.days_since_login == config.normalize.unparseable_date_days {
        println!("Days Since Login:   unknown");
    } else {
        println!("Days Since Login:   {}", user.user.days_since_login);
    }
    println!("Dormant:            {}", yes_no(user.user.is_dormant));
    println!("Password Last Set:  {}", account.password_last_set);
    println!("Password Expiry:    {}", account.password_expiry_date);
    println!(
        "Password Never Exp: {}",
        yes_no(user.user.password_never_expires)
    );
    println!("Password Expired:   {}", yes_no(user.user.password_expired));

    println!("\nRisk Profile");
    println!("{}", "-".repeat(80));
    println!("Risk Level:         {}", risk.risk_level);
    println!("Total Score:        {} / 100", risk.total_risk_score);
    println!("Privilege Score:    {}", risk.privilege_score);
    println!("Hygiene Score:      {}", risk.password_hygiene_score);

    println!("\nGroup Memberships ({})", user.user.groups.len());
    println!("{}", "-".repeat(80));
    if user.user.groups.is_empty() {
        println!("  (none)");
    }
    for group in &user.user.groups {
        if is_high_privilege_group(group, &config.scoring) {
            println!("  * {}  [high privilege]", group);
        } else {
            println!("    {}", group);
        }
    }

    println!("\nDetected Issues");
    println!("{}", "-".repeat(80));
    if risk.issues.is_empty() {
        println!("No critical risks identified.");
    }
    for issue in &risk.issues {
        println!("  - {}", issue);
    }

    println!("\nRecommendations");
    println!("{}", "-".repeat(80));
    if risk.recommendations.is_empty() {
        println!("No actions required.");
    }
    for rec in &risk.recommendations {
        println!("  - {}", rec);
    }
    println!("{}", "=".repeat(80));
}
