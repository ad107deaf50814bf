//! Two-level rule table: test name → (test-id pattern → rule).

use std::collections::HashMap;

use crate::pattern::Pattern;

#[derive(Debug, Clone)]
struct TestRules<R> {
    /// Insertion order; wildcard matching walks this.
    entries: Vec<(Pattern, R)>,
    /// Exact test id → index into `entries`.
    exact: HashMap<String, usize>,
}

impl<R> Default for TestRules<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            exact: HashMap::new(),
        }
    }
}

/// Read-only after loading.
#[derive(Debug, Clone)]
pub struct RuleTable<R> {
    tests: HashMap<String, TestRules<R>>,
    len: usize,
}

impl<R> Default for RuleTable<R> {
    fn default() -> Self {
        Self {
            tests: HashMap::new(),
            len: 0,
        }
    }
}

impl<R> RuleTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains_test(&self, test_name: &str) -> bool {
        self.tests.contains_key(test_name)
    }

    /// Register `rule`. The first rule for a `(test_name, pattern)` pair wins;
    /// a duplicate is handed back in `Err`.
    pub fn insert(&mut self, test_name: &str, pattern: Pattern, rule: R) -> Result<(), R> {
        let rules = self.tests.entry(test_name.to_string()).or_default();
        if rules.entries.iter().any(|(p, _)| *p == pattern) {
            return Err(rule);
        }
        if let Pattern::Exact(id) = &pattern {
            rules.exact.insert(id.clone(), rules.entries.len());
        }
        rules.entries.push((pattern, rule));
        self.len += 1;
        Ok(())
    }

    /// Resolve the rule for a concrete test instance.
    ///
    /// Exact id first, then wildcard patterns in insertion order; the first
    /// wildcard whose remainder occurs in `test_id` wins.
    pub fn get(&self, test_name: &str, test_id: &str) -> Option<&R> {
        let rules = self.tests.get(test_name)?;
        if let Some(&idx) = rules.exact.get(test_id) {
            return Some(&rules.entries[idx].1);
        }
        rules
            .entries
            .iter()
            .find(|(pattern, _)| pattern.is_wildcard() && pattern.matches(test_id))
            .map(|(_, rule)| rule)
    }

    /// Every `(test_name, pattern, rule)`; test names in arbitrary order,
    /// patterns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pattern, &R)> {
        self.tests.iter().flat_map(|(name, rules)| {
            rules
                .entries
                .iter()
                .map(move |(pattern, rule)| (name.as_str(), pattern, rule))
        })
    }
}
