//! Policy rules for cloudprobe test outcomes.
//!
//! Three independent tables are loaded once from a YAML document:
//! time-boxed exemptions, severity levels and known regressions. Lookups take
//! a test name and the concrete parametrized test id; test ids may be
//! configured exactly or as `*`-prefixed substring patterns.
//!
//! ```
//! use chrono::NaiveDate;
//! use cloudprobe_policy::{Policy, Severity};
//!
//! let rules = r#"
//! severities:
//!   - test_name: "*"
//!     severity: WARN
//! regressions:
//!   - test_name: test_public_buckets
//!     test_param_id: "*-assets"
//!     comment: reopened
//! "#;
//! let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! let policy = Policy::from_yaml_str(rules, today).unwrap();
//!
//! let notes = policy.annotate("test_public_buckets", "prod-assets");
//! assert_eq!(notes.severity, Some(Severity::Warn));
//! assert!(notes.regression.is_some());
//! ```
//!
//! This crate only resolves rules. Deciding what an exemption or a severity
//! does to a test result is up to the caller.

pub mod document;
pub mod error;
pub mod exemption;
pub mod pattern;
pub mod policy;
pub mod regression;
pub mod severity;
pub mod table;

pub use document::RulesDocument;
pub use error::{PolicyError, PolicyResult};
pub use exemption::{load_exemptions, Exemption};
pub use pattern::Pattern;
pub use policy::{global, install, Annotations, Policy};
pub use regression::{load_regressions, Regression};
pub use severity::{load_severities, Severity, SeverityTable, UnknownSeverity};
pub use table::RuleTable;
