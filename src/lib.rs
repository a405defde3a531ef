//! # pathgate
//!
//! Report which named groups of paths ("filters") were touched by a change.
//!
//! A run resolves the two repository states to compare from the triggering CI
//! event, lists the paths that differ between them, and classifies those paths
//! against every filter in one pass. For each filter it reports whether anything
//! matched, how many files matched and, optionally, which ones.
//!
//! ## Quick Start
//!
//! ```bash
//! # Which parts of the repository changed since main?
//! pathgate --base main --filters '{"src": "src/**", "docs": ["docs/**", "*.md"]}'
//!
//! # Does a pattern match a path?
//! pathgate check 'src/**/*.rs' src/lib.rs
//! ```
//!
//! ## Library use
//!
//! ```
//! use pathgate::filter::{self, Filter, FilterSet, PatternList};
//!
//! let mut filters = FilterSet::new();
//! filters.insert(Filter::new("src", PatternList::Single("src/**".into())));
//!
//! let changed = vec!["src/main.rs".to_string(), "README.md".to_string()];
//! let evaluation = filter::evaluate(&filters, &changed);
//! assert_eq!(evaluation.matched_names(), vec!["src"]);
//! ```

pub mod changes;
pub mod cli;
pub mod error;
pub mod filter;
pub mod git;
pub mod output;

pub use cli::Cli;
pub use error::Error;
