//! Multi-filter evaluation
//!
//! Classifies a list of changed paths against every filter of a [`FilterSet`] in
//! one pass. Pure: no I/O, no shared state beyond a per-run pattern cache.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use super::FilterSet;
use super::glob::{Matcher, compile};

/// Per-run memoization of compiled patterns, keyed by pattern text
#[derive(Debug, Default)]
pub struct PatternCache {
    matchers: HashMap<String, Matcher>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the matcher for a pattern, compiling it on first use
    pub fn matcher(&mut self, pattern: &str) -> &Matcher {
        self.matchers.entry(pattern.to_string()).or_insert_with(|| {
            if pattern.starts_with('!') {
                tracing::warn!(
                    "Pattern '{}' starts with '!': exclusions are not supported, the pattern is matched literally",
                    pattern
                );
            }
            compile(pattern)
        })
    }

    /// Number of distinct patterns compiled so far
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Outcome of one filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    files: Vec<String>,
}

impl MatchResult {
    pub fn matched(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn count(&self) -> usize {
        self.files.len()
    }

    /// Matched files in first-seen order, without duplicates
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// Results for every filter, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    results: IndexMap<String, MatchResult>,
}

impl Evaluation {
    pub fn get(&self, name: &str) -> Option<&MatchResult> {
        self.results.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchResult)> {
        self.results.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// Names of the filters that matched at least one path
    pub fn matched_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, result)| result.matched())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Evaluate every filter against the changed paths
pub fn evaluate(filters: &FilterSet, changed: &[String]) -> Evaluation {
    let mut cache = PatternCache::new();
    evaluate_with_cache(filters, changed, &mut cache)
}

/// Same as [`evaluate`], reusing an existing pattern cache
pub fn evaluate_with_cache(filters: &FilterSet, changed: &[String], cache: &mut PatternCache) -> Evaluation {
    let mut results = IndexMap::with_capacity(filters.len());

    for filter in filters {
        let matchers: Vec<Matcher> = filter
            .patterns
            .iter()
            .map(|pattern| cache.matcher(pattern).clone())
            .collect();

        let files: IndexSet<&str> = changed
            .iter()
            .map(String::as_str)
            .filter(|path| matchers.iter().any(|matcher| matcher.is_match(path)))
            .collect();

        tracing::debug!("Filter '{}' matched {} file(s)", filter.name, files.len());

        results.insert(
            filter.name.clone(),
            MatchResult {
                files: files.into_iter().map(str::to_string).collect(),
            },
        );
    }

    Evaluation { results }
}
