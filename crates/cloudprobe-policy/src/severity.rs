//! Per-test severity levels.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::typed_entries;

/// Test name whose severity applies to every test without its own entry.
pub const FALLBACK_TEST_NAME: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity level: {0}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeverityTable {
    by_test: HashMap<String, Severity>,
}

impl SeverityTable {
    pub fn len(&self) -> usize {
        self.by_test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_test.is_empty()
    }

    /// The test's own level, else the `*` level, else none.
    pub fn get(&self, test_name: &str) -> Option<Severity> {
        self.by_test
            .get(test_name)
            .or_else(|| self.by_test.get(FALLBACK_TEST_NAME))
            .copied()
    }

    pub fn fallback(&self) -> Option<Severity> {
        self.by_test.get(FALLBACK_TEST_NAME).copied()
    }
}

#[derive(Debug, Deserialize)]
struct RawSeverity {
    test_name: String,
    severity: String,
}

pub fn load_severities(entries: &[serde_yaml::Value]) -> SeverityTable {
    let mut table = SeverityTable::default();
    for (index, raw) in typed_entries::<RawSeverity>("severities", entries) {
        let severity = match raw.severity.parse::<Severity>() {
            Ok(s) => s,
            Err(e) => {
                warn!(section = "severities", index, test_name = %raw.test_name, error = %e, "skipping severity rule");
                continue;
            }
        };
        if table.by_test.contains_key(&raw.test_name) {
            warn!(section = "severities", index, test_name = %raw.test_name, "duplicate severity ignored");
            continue;
        }
        table.by_test.insert(raw.test_name, severity);
    }
    table
}
