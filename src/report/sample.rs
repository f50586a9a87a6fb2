//! Built-in demo dataset.

/// Five accounts covering the main risk patterns: a privileged admin, a
/// stale user with a never-expiring password, a disabled dormant enterprise
/// admin, a clean user and an admin without MFA.
pub const SAMPLE_CSV: &str = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf,Role,Department,PasswordLastSet,PasswordExpiryDate,MFAStatus,PasswordNeverExpires,DormantAccountFlag
John Doe,jdoe,True,2023-10-01,Domain Admins;Users,Admin,IT,2023-09-01,2024-09-01,True,False,False
Jane Smith,jsmith,True,2023-05-15,Users,User,HR,2022-01-01,2022-04-01,False,True,False
Bob Martin,bmartin,False,2022-12-01,Enterprise Admins,Admin,IT,2022-11-01,2023-02-01,False,False,True
Alice Wonder,awonder,True,2023-10-25,Users;Marketing Team,Manager,Marketing,2023-08-15,2023-11-15,True,False,False
Dave Grohl,dgrohl,True,2023-10-20,Administrators;Backup Operators,Admin,IT,2023-10-01,2024-01-01,False,False,False";

/// The demo dataset as CSV text, usable without any file.
pub fn generate_sample_csv() -> &'static str {
    SAMPLE_CSV
}
