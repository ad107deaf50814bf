use chrono::NaiveDate;
use cloudprobe_policy::{global, install, Policy, PolicyError, Severity};

// Process-wide state: keep every assertion about it in one test.
#[test]
fn test_install_once() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    assert!(global().is_none());

    let first = Policy::from_yaml_str("severities: [{test_name: '*', severity: WARN}]", today).unwrap();
    let installed = install(first).unwrap();
    assert_eq!(installed.severity("any"), Some(Severity::Warn));

    let second = Policy::empty(today);
    assert!(matches!(install(second), Err(PolicyError::AlreadyInstalled)));

    assert_eq!(global().and_then(|p| p.severity("any")), Some(Severity::Warn));
}
