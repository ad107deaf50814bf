//! Known regressions: previously passing tests flagged for attention.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::typed_entries;
use crate::pattern::Pattern;
use crate::table::RuleTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Regression {
    pub test_name: String,
    pub test_id: Pattern,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct RawRegression {
    test_name: String,
    test_param_id: String,
    comment: String,
}

pub fn load_regressions(entries: &[serde_yaml::Value]) -> RuleTable<Regression> {
    let mut table = RuleTable::new();
    for (index, raw) in typed_entries::<RawRegression>("regressions", entries) {
        let regression = Regression {
            test_id: Pattern::parse(&raw.test_param_id),
            test_name: raw.test_name,
            comment: raw.comment,
        };
        let (name, pattern) = (regression.test_name.clone(), regression.test_id.clone());
        if let Err(dup) = table.insert(&name, pattern, regression) {
            warn!(
                section = "regressions",
                index,
                test_name = %dup.test_name,
                test_param_id = %dup.test_id,
                "duplicate regression ignored"
            );
        }
    }
    table
}
