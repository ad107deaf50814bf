//! On-disk rules document.
//!
//! ```yaml
//! exemptions:
//!   - test_name: test_s3_bucket_versioning
//!     test_param_id: "*-logs"
//!     expiration_day: 2026-12-31
//!     reason: log buckets are write-once
//! severities:
//!   - test_name: "*"
//!     severity: WARN
//! regressions:
//!   - test_name: test_iam_root_mfa
//!     test_param_id: audit
//!     comment: reopened after account migration
//! ```
//!
//! Each section is kept as raw YAML nodes so one malformed rule can be
//! skipped without rejecting its neighbours. Unknown top-level keys are
//! ignored.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::error::{PolicyError, PolicyResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesDocument {
    #[serde(default)]
    exemptions: Option<Vec<serde_yaml::Value>>,
    #[serde(default)]
    severities: Option<Vec<serde_yaml::Value>>,
    #[serde(default)]
    regressions: Option<Vec<serde_yaml::Value>>,
}

impl RulesDocument {
    pub fn from_yaml_str(source: &str) -> PolicyResult<Self> {
        // An empty file deserializes as null.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str::<Option<Self>>(source)?.unwrap_or_default())
    }

    pub fn from_path(path: impl AsRef<Path>) -> PolicyResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn exemptions(&self) -> &[serde_yaml::Value] {
        self.exemptions.as_deref().unwrap_or_default()
    }

    pub fn severities(&self) -> &[serde_yaml::Value] {
        self.severities.as_deref().unwrap_or_default()
    }

    pub fn regressions(&self) -> &[serde_yaml::Value] {
        self.regressions.as_deref().unwrap_or_default()
    }
}

/// Deserialize each entry on its own, warning about and dropping the ones
/// that do not fit `T`.
pub(crate) fn typed_entries<'a, T: DeserializeOwned>(
    section: &'static str,
    entries: &'a [serde_yaml::Value],
) -> impl Iterator<Item = (usize, T)> + 'a {
    entries.iter().enumerate().filter_map(move |(index, entry)| {
        match serde_yaml::from_value::<T>(entry.clone()) {
            Ok(parsed) => Some((index, parsed)),
            Err(e) => {
                warn!(section, index, error = %e, "skipping malformed rule");
                None
            }
        }
    })
}
