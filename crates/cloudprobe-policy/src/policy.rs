//! Loaded rule tables and the lookups the test-annotation layer calls.

use std::path::Path;

use chrono::{Local, NaiveDate};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::info;

use crate::document::RulesDocument;
use crate::error::{PolicyError, PolicyResult};
use crate::exemption::{load_exemptions, Exemption};
use crate::regression::{load_regressions, Regression};
use crate::severity::{load_severities, Severity, SeverityTable};
use crate::table::RuleTable;

static INSTALLED: OnceCell<Policy> = OnceCell::new();

/// Everything a single test instance is annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Annotations<'a> {
    pub exemption: Option<&'a Exemption>,
    pub severity: Option<Severity>,
    pub regression: Option<&'a Regression>,
}

impl Annotations<'_> {
    pub fn is_empty(&self) -> bool {
        self.exemption.is_none() && self.severity.is_none() && self.regression.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    exemptions: RuleTable<Exemption>,
    severities: SeverityTable,
    regressions: RuleTable<Regression>,
    loaded_on: NaiveDate,
}

impl Policy {
    /// No rules at all.
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            exemptions: RuleTable::new(),
            severities: SeverityTable::default(),
            regressions: RuleTable::new(),
            loaded_on: today,
        }
    }

    pub fn from_document(doc: &RulesDocument, today: NaiveDate) -> Self {
        let policy = Self {
            exemptions: load_exemptions(doc.exemptions(), today),
            severities: load_severities(doc.severities()),
            regressions: load_regressions(doc.regressions()),
            loaded_on: today,
        };
        info!(
            exemptions = policy.exemptions.len(),
            severities = policy.severities.len(),
            regressions = policy.regressions.len(),
            %today,
            "loaded policy rules"
        );
        policy
    }

    pub fn from_yaml_str(source: &str, today: NaiveDate) -> PolicyResult<Self> {
        Ok(Self::from_document(&RulesDocument::from_yaml_str(source)?, today))
    }

    /// Load a rules file, expiring exemptions against the local calendar day.
    pub fn from_path(path: impl AsRef<Path>) -> PolicyResult<Self> {
        Self::from_path_on(path, Local::now().date_naive())
    }

    pub fn from_path_on(path: impl AsRef<Path>, today: NaiveDate) -> PolicyResult<Self> {
        Ok(Self::from_document(&RulesDocument::from_path(path)?, today))
    }

    pub fn loaded_on(&self) -> NaiveDate {
        self.loaded_on
    }

    pub fn exemptions(&self) -> &RuleTable<Exemption> {
        &self.exemptions
    }

    pub fn severities(&self) -> &SeverityTable {
        &self.severities
    }

    pub fn regressions(&self) -> &RuleTable<Regression> {
        &self.regressions
    }

    pub fn exemption(&self, test_name: &str, test_id: &str) -> Option<&Exemption> {
        self.exemptions.get(test_name, test_id)
    }

    pub fn severity(&self, test_name: &str) -> Option<Severity> {
        self.severities.get(test_name)
    }

    pub fn regression(&self, test_name: &str, test_id: &str) -> Option<&Regression> {
        self.regressions.get(test_name, test_id)
    }

    pub fn annotate(&self, test_name: &str, test_id: &str) -> Annotations<'_> {
        Annotations {
            exemption: self.exemption(test_name, test_id),
            severity: self.severity(test_name),
            regression: self.regression(test_name, test_id),
        }
    }
}

/// Install the process-wide policy. Only the first call succeeds.
pub fn install(policy: Policy) -> PolicyResult<&'static Policy> {
    let mut installed_now = false;
    let current = INSTALLED.get_or_init(|| {
        installed_now = true;
        policy
    });
    if installed_now {
        Ok(current)
    } else {
        Err(PolicyError::AlreadyInstalled)
    }
}

pub fn global() -> Option<&'static Policy> {
    INSTALLED.get()
}
