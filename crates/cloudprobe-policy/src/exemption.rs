//! Time-boxed exemptions: known failures that are expected to fail until a
//! given day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::typed_entries;
use crate::pattern::Pattern;
use crate::table::RuleTable;

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exemption {
    pub test_name: String,
    pub test_id: Pattern,
    /// Last day (inclusive) on which the exemption applies.
    pub expiration: NaiveDate,
    pub reason: String,
}

impl Exemption {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.expiration >= day
    }
}

#[derive(Debug, Deserialize)]
struct RawExemption {
    test_name: String,
    test_param_id: String,
    expiration_day: String,
    reason: String,
}

/// Build the exemption table from raw `exemptions` entries.
///
/// Entries whose expiration day is strictly before `today` are dropped, as
/// are malformed ones. For a repeated `(test_name, test_param_id)` the first
/// entry wins.
pub fn load_exemptions(entries: &[serde_yaml::Value], today: NaiveDate) -> RuleTable<Exemption> {
    let mut table = RuleTable::new();
    for (index, raw) in typed_entries::<RawExemption>("exemptions", entries) {
        let expiration = match NaiveDate::parse_from_str(raw.expiration_day.trim(), DAY_FORMAT) {
            Ok(day) => day,
            Err(e) => {
                warn!(
                    section = "exemptions",
                    index,
                    expiration_day = %raw.expiration_day,
                    error = %e,
                    "skipping exemption with unparseable expiration day"
                );
                continue;
            }
        };
        if expiration < today {
            warn!(
                section = "exemptions",
                index,
                test_name = %raw.test_name,
                test_param_id = %raw.test_param_id,
                %expiration,
                "dropping expired exemption"
            );
            continue;
        }

        let exemption = Exemption {
            test_id: Pattern::parse(&raw.test_param_id),
            test_name: raw.test_name,
            expiration,
            reason: raw.reason,
        };
        let (name, pattern) = (exemption.test_name.clone(), exemption.test_id.clone());
        if let Err(dup) = table.insert(&name, pattern, exemption) {
            warn!(
                section = "exemptions",
                index,
                test_name = %dup.test_name,
                test_param_id = %dup.test_id,
                "duplicate exemption ignored"
            );
        }
    }
    table
}
