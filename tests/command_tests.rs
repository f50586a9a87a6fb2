use ad_risk_audit::commands::{self, analyze::AnalyzeOutputs, users::TableOptions, InputSource};
use ad_risk_audit::report::cache;
use ad_risk_audit::report::export::EXPORT_COLUMNS;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

const EXPORT: &str = "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf,Department,MFAStatus\n\
                      \"Doe, John\",jdoe,True,2023-10-01,\"Domain Admins;Users\",\"Sales, APAC\",True\n\
                      Ann Lee,alee,True,2023-09-30,Users,Finance,False\n";

fn write_export(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

fn file_source(path: &str) -> InputSource<'_> {
    InputSource {
        file: Some(path),
        sample: false,
        rules: None,
    }
}

const SAMPLE: InputSource<'static> = InputSource {
    file: None,
    sample: true,
    rules: None,
};

#[test]
fn test_analyze_missing_file() {
    let result = commands::analyze::run(
        &file_source("/nonexistent/ad_users.csv"),
        &AnalyzeOutputs::default(),
        10,
    );
    assert!(result.is_err());
}

#[test]
fn test_analyze_header_only_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_export(
        &temp_dir,
        "empty.csv",
        "UserName,SamAccountName,Enabled,LastLogonDate,MemberOf\n",
    );

    let result = commands::analyze::run(&file_source(&path), &AnalyzeOutputs::default(), 10);

    let err = result.unwrap_err().to_string();
    assert!(err.contains("No valid users found in CSV"));
}

#[test]
fn test_analyze_writes_export_json_and_cache() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(&temp_dir, "ad_users.csv", EXPORT);
    let report = temp_dir.path().join("out/report.csv");
    let json = temp_dir.path().join("results.json");
    let cache_path = temp_dir.path().join("cache/last_import.json");

    commands::analyze::run(
        &file_source(&input),
        &AnalyzeOutputs {
            export: Some(report.to_str().unwrap()),
            json: Some(json.to_str().unwrap()),
            cache: Some(cache_path.to_str().unwrap()),
        },
        5,
    )
    .unwrap();

    let mut reader = csv::Reader::from_path(&report).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, EXPORT_COLUMNS);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Doe, John");
    assert_eq!(&rows[0][2], "Sales, APAC");
    assert!(rows[0][5].parse::<u32>().is_ok());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["summary"]["metrics"]["totalUsers"], 2);
    assert_eq!(value["users"].as_array().unwrap().len(), 2);
    assert_eq!(value["users"][0]["SamAccountName"], "jdoe");

    let cached = cache::load(&cache_path).unwrap();
    assert_eq!(cached.total_users, 2);
    assert_eq!(cached.users[1].sam_account_name(), "alee");
}

#[test]
fn test_analyze_gzip_input() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ad_users.csv.gz");
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(EXPORT.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let result = commands::analyze::run(
        &file_source(path.to_str().unwrap()),
        &AnalyzeOutputs::default(),
        10,
    );
    assert!(result.is_ok());
}

#[test]
fn test_analyze_with_rules_file() {
    let temp_dir = TempDir::new().unwrap();
    let rules = write_export(
        &temp_dir,
        "rules.json",
        r#"{ "scoring": { "tiers": { "critical": 90, "high": 80, "medium": 60 } } }"#,
    );

    let source = InputSource {
        file: None,
        sample: true,
        rules: Some(rules.as_str()),
    };
    assert!(commands::analyze::run(&source, &AnalyzeOutputs::default(), 3).is_ok());

    let bad_rules = write_export(&temp_dir, "bad.json", "{ not json");
    let source = InputSource {
        rules: Some(bad_rules.as_str()),
        ..source
    };
    let err = commands::analyze::run(&source, &AnalyzeOutputs::default(), 3).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse rules file"));
}

#[test]
fn test_users_table_and_invalid_filters() {
    let options = TableOptions {
        risk_level: Some("critical"),
        search: None,
        sort: "name",
        ascending: true,
        page: 1,
        page_size: 2,
    };
    assert!(commands::users::run(&SAMPLE, &options).is_ok());

    let past_end = TableOptions {
        page: 50,
        ..options
    };
    assert!(commands::users::run(&SAMPLE, &past_end).is_ok());

    let bad_level = TableOptions {
        risk_level: Some("urgent"),
        ..options
    };
    let err = commands::users::run(&SAMPLE, &bad_level).unwrap_err();
    assert!(err.to_string().contains("Invalid risk level"));
}

#[test]
fn test_show_user_lookup() {
    assert!(commands::show::run(&SAMPLE, "JSMITH").is_ok());
    assert!(commands::show::run(&SAMPLE, "user-2").is_ok());

    let err = commands::show::run(&SAMPLE, "nobody").unwrap_err();
    assert!(err.to_string().contains("User not found: nobody"));
}

#[test]
fn test_template_command() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("templates/ad_template.csv");

    commands::template::run(Some(path.to_str().unwrap())).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("UserName,SamAccountName,Enabled,LastLogonDate,MemberOf"));
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn test_sample_command_round_trips_through_analyze() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("demo.csv");

    commands::sample::run(Some(path.to_str().unwrap())).unwrap();

    let result = commands::analyze::run(
        &file_source(path.to_str().unwrap()),
        &AnalyzeOutputs::default(),
        10,
    );
    assert!(result.is_ok());
}

#[test]
fn test_load_users_with_uses_given_config() {
    use ad_risk_audit::commands::load_users_with;
    use ad_risk_audit::pipeline::PipelineConfig;
    use chrono::Utc;

    // The rules path is never read when a config is passed in.
    let source = InputSource {
        file: None,
        sample: true,
        rules: Some("/nonexistent/rules.json"),
    };
    let mut config = PipelineConfig::default();
    config.scoring.high_privilege_groups = vec!["Marketing Team".to_string()];

    let users = load_users_with(&source, &config, Utc::now()).unwrap();
    let alice = users
        .iter()
        .find(|u| u.sam_account_name() == "awonder")
        .unwrap();
    assert_eq!(alice.risk.issues[0], "Member of 1 high-privilege group(s)");

    assert!(commands::load_users(&source, Utc::now()).is_err());
}

#[test]
fn test_show_with_rules_file() {
    let temp_dir = TempDir::new().unwrap();
    let rules = write_export(
        &temp_dir,
        "rules.json",
        r#"{ "scoring": { "high_privilege_groups": ["Backup Operators"] } }"#,
    );
    let source = InputSource {
        file: None,
        sample: true,
        rules: Some(rules.as_str()),
    };

    assert!(commands::show::run(&source, "dgrohl").is_ok());
}

#[test]
fn test_users_huge_page_size() {
    let options = TableOptions {
        risk_level: None,
        search: None,
        sort: "score",
        ascending: false,
        page: 1,
        page_size: usize::MAX,
    };
    assert!(commands::users::run(&SAMPLE, &options).is_ok());
}
