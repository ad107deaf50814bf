use std::io::Write;

use chrono::NaiveDate;
use cloudprobe_policy::{Policy, PolicyError, Severity};
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rules_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const RULES: &str = r#"
# shared with the provider profile config
profiles: [prod, stage]

exemptions:
  - test_name: test_bucket_versioning
    test_param_id: legacy-bucket
    expiration_day: 2026-11-30
    reason: migration in progress
  - test_name: test_bucket_versioning
    test_param_id: "*foo"
    expiration_day: 2026-11-30
    reason: foo buckets are scratch space
  - test_name: test_bucket_versioning
    test_param_id: "*-archive"
    expiration_day: 2026-01-31
    reason: expired long ago
  - test_name: test_bucket_versioning
    test_param_id: legacy-bucket
    expiration_day: 2030-01-01
    reason: duplicate, ignored
  - test_name: test_bucket_versioning
    reason: missing id and day

severities:
  - test_name: "*"
    severity: INFO
  - test_name: test_root_mfa
    severity: ERROR
  - test_name: test_root_mfa
    severity: WARN
  - test_name: test_sg_open_ingress
    severity: warn

regressions:
  - test_name: test_sg_open_ingress
    test_param_id: "*sg-0abc"
    comment: reopened by the bastion rollout
"#;

#[test]
fn test_load_from_file_and_match() {
    let file = rules_file(RULES);
    let policy = Policy::from_path_on(file.path(), day(2026, 10, 16)).unwrap();

    assert_eq!(policy.exemptions().len(), 2);

    let exact = policy
        .exemption("test_bucket_versioning", "legacy-bucket")
        .unwrap();
    assert_eq!(exact.reason, "migration in progress");
    assert_eq!(exact.expiration, day(2026, 11, 30));

    assert!(policy
        .exemption("test_bucket_versioning", "xyz-foo-123")
        .is_some());
    assert!(policy.exemption("test_bucket_versioning", "bar-123").is_none());
    assert!(policy
        .exemption("test_bucket_versioning", "old-archive")
        .is_none());
}

#[test]
fn test_severity_fallback_and_first_duplicate() {
    let file = rules_file(RULES);
    let policy = Policy::from_path_on(file.path(), day(2026, 10, 16)).unwrap();

    assert_eq!(policy.severity("test_root_mfa"), Some(Severity::Error));
    assert_eq!(policy.severity("anything_else"), Some(Severity::Info));
    // Lowercase level is rejected, so the fallback applies.
    assert_eq!(policy.severity("test_sg_open_ingress"), Some(Severity::Info));
}

#[test]
fn test_regression_wildcard() {
    let policy = Policy::from_yaml_str(RULES, day(2026, 10, 16)).unwrap();
    let notes = policy.annotate("test_sg_open_ingress", "prod/eu-west-1/sg-0abc123");
    assert_eq!(
        notes.regression.map(|r| r.comment.as_str()),
        Some("reopened by the bastion rollout")
    );
    assert!(notes.exemption.is_none());
}

#[test]
fn test_same_rule_before_and_after_expiry() {
    let rules = r#"
exemptions:
  - test_name: t
    test_param_id: id
    expiration_day: 2026-10-16
    reason: r
"#;
    let kept = Policy::from_yaml_str(rules, day(2026, 10, 16)).unwrap();
    assert!(kept.exemption("t", "id").is_some());

    let dropped = Policy::from_yaml_str(rules, day(2026, 10, 17)).unwrap();
    assert!(dropped.exemptions().is_empty());
}

#[test]
fn test_whole_file_errors() {
    let broken = rules_file("exemptions: [unclosed");
    assert!(matches!(
        Policy::from_path_on(broken.path(), day(2026, 1, 1)),
        Err(PolicyError::Yaml(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Policy::from_path_on(dir.path().join("missing.yaml"), day(2026, 1, 1)),
        Err(PolicyError::Io { .. })
    ));
}
