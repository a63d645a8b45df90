use crate::config::*;

#[test]
fn empty_config_uses_defaults() {
    let cfg = AnalyzerConfig::from_toml_str("").expect("empty config");
    assert_eq!(cfg, AnalyzerConfig::default());
    assert_eq!(cfg.trace.extra_offset, 0);
    assert_eq!(cfg.trace.max_trace, None);
    assert_eq!(cfg.report.format, ReportFormat::Text);
}

#[test]
fn kebab_case_keys_are_read() {
    let cfg = AnalyzerConfig::from_toml_str(
        r#"
        [trace]
        extra-offset = 2
        max-trace = -1

        [report]
        format = "json"
        "#,
    )
    .expect("config");
    assert_eq!(cfg.trace.extra_offset, 2);
    assert_eq!(cfg.trace.max_trace, Some(-1));
    assert_eq!(cfg.report.format, ReportFormat::Json);
}

#[test]
fn unknown_format_is_rejected() {
    assert!(AnalyzerConfig::from_toml_str("[report]\nformat = \"html\"\n").is_err());
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = AnalyzerConfig::load(&dir.path().join("nope.toml")).expect_err("missing");
    assert!(err.to_string().contains("Failed to read config"));
}
