use handle_verifier::config::toml_config::TomlConfig;
use handle_verifier::config::Settings;
use handle_verifier::core::merge::merge_logs;
use handle_verifier::utils::validation::Validate;
use handle_verifier::Platform;
use tempfile::TempDir;

fn settings_in(dir: &std::path::Path) -> Settings {
    let config = TomlConfig::from_toml_str(&format!(
        "[output]\ndir = \"{}\"\n",
        dir.display().to_string().replace('\\', "/")
    ))
    .unwrap();
    let settings = Settings::from_toml(config).unwrap();
    settings.validate().unwrap();
    settings
}

#[test]
fn test_five_logs_with_one_row_each_merge_into_one_row() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_in(temp_dir.path());

    let lines = [
        (Platform::GeeksForGeeks, "P1, gfg_p1, True"),
        (Platform::Codeforces, "P1, tourist, True"),
        (Platform::LeetCode, "P1, lc_p1, False"),
        (Platform::CodeChef, "P1, cc_p1, true"),
        (Platform::HackerRank, "P1, hr_p1, false"),
    ];
    for (platform, line) in lines {
        std::fs::write(settings.log_path(platform), format!("{}\n", line)).unwrap();
    }

    let summary = merge_logs(&settings, None).unwrap();
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.report_path, temp_dir.path().join("participant_details.csv"));

    let content = std::fs::read_to_string(&summary.report_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "Handle,GeeksForGeeks Handle,Codeforces Handle,LeetCode Handle,CodeChef Handle,\
         HackerRank Handle,GeeksForGeeks URL Exists,Codeforces URL Exists,LeetCode URL Exists,\
         CodeChef URL Exists,HackerRank URL Exists"
    );
    assert_eq!(lines[1], "P1,gfg_p1,tourist,lc_p1,cc_p1,hr_p1,true,true,false,true,false");
}

#[test]
fn test_missing_logs_leave_their_columns_empty() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_in(temp_dir.path());

    std::fs::write(
        settings.log_path(Platform::Codeforces),
        "P1, tourist, true\nP2, petr, false\n",
    )
    .unwrap();

    let summary = merge_logs(&settings, None).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.missing_logs.len(), 4);
    assert!(!summary.missing_logs.contains(&Platform::Codeforces));

    let mut reader = csv::Reader::from_path(&summary.report_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[1][0], "P2");
    assert_eq!(&rows[1][2], "petr");
    assert_eq!(&rows[1][7], "false");
    assert_eq!(&rows[1][1], "");
    assert_eq!(&rows[1][6], "");
}

#[test]
fn test_malformed_log_aborts_merge() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_in(temp_dir.path());
    std::fs::write(settings.log_path(Platform::LeetCode), "not a record\n").unwrap();

    assert!(merge_logs(&settings, None).is_err());
    assert!(!settings.report_path().exists());
}
