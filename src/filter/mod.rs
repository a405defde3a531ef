//! Named path filters
//!
//! A filter is a name bound to a list of glob patterns. Filters are declared by the
//! user (see [`declaration`]), compiled with [`glob`], and evaluated against the
//! changed paths of a commit range with [`evaluate()`].

pub mod declaration;
pub mod evaluate;
pub mod glob;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use evaluate::{Evaluation, MatchResult, PatternCache, evaluate, evaluate_with_cache};
pub use glob::{Matcher, compile};

/// Declared value of a filter: one pattern or a list of patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternList {
    Single(String),
    Many(Vec<String>),
}

impl PatternList {
    pub fn into_patterns(self) -> Vec<String> {
        match self {
            Self::Single(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        }
    }
}

/// A named group of inclusion patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub patterns: Vec<String>,
}

impl Filter {
    pub fn new(name: impl Into<String>, patterns: PatternList) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.into_patterns(),
        }
    }
}

/// All declared filters, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: IndexMap<String, Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter. A later filter with the same name replaces the earlier one
    /// but keeps its original position.
    pub fn insert(&mut self, filter: Filter) {
        self.filters.insert(filter.name.clone(), filter);
    }

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.values()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl From<IndexMap<String, PatternList>> for FilterSet {
    fn from(declared: IndexMap<String, PatternList>) -> Self {
        let mut set = FilterSet::new();
        for (name, patterns) in declared {
            set.insert(Filter::new(name, patterns));
        }
        set
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = indexmap::map::Values<'a, String, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.values()
    }
}
