//! Filter declaration reader
//!
//! Filters are declared as a mapping of name to one pattern or a list of patterns,
//! written as JSON or YAML:
//!
//! ```yaml
//! backend:
//!   - 'src/**'
//!   - Cargo.toml
//! docs: 'docs/**'
//! ```
//!
//! Text that starts with `{` or `[` must be valid JSON. Anything else is read as
//! YAML, and text YAML rejects goes through [`parse_lenient`], a small line reader
//! that covers the common hand-written shape (for instance unquoted `**/*.rs`
//! list items, which YAML reads as aliases). Text none of them accepts is a
//! configuration error.

use std::path::Path;

use indexmap::IndexMap;

use super::{FilterSet, PatternList};
use crate::error::Error;

/// Parse a filter declaration
pub fn parse(input: &str) -> Result<FilterSet, Error> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::configuration("filters input is required"));
    }

    let declared = if input.starts_with(['{', '[']) {
        // JSON-looking text must be valid JSON, never reinterpreted line by line
        serde_json::from_str(input)
            .map_err(|e| Error::configuration(format!("filters input is not valid JSON: {e}")))?
    } else {
        match serde_yml::from_str(input) {
            Ok(declared) => declared,
            Err(e) => {
                tracing::debug!("Filters are not valid YAML ({}), using the line reader", e);
                parse_lenient(input)?
            }
        }
    };

    let filters = FilterSet::from(declared);
    if filters.is_empty() {
        return Err(Error::configuration("filters input does not declare any filter"));
    }

    tracing::debug!("Parsed {} filter(s)", filters.len());
    Ok(filters)
}

/// Parse a declaration given inline, or read from a file when prefixed with `@`
pub fn load(value: &str) -> Result<FilterSet, Error> {
    match value.trim_start().strip_prefix('@') {
        Some(path) => {
            let path = Path::new(path.trim());
            let text = std::fs::read_to_string(path).map_err(|e| {
                Error::configuration(format!("cannot read filters file {}: {}", path.display(), e))
            })?;
            parse(&text)
        }
        None => parse(value),
    }
}

/// Minimal reader for a flat mapping of lists.
///
/// Understands only:
/// - `name:` starting a filter
/// - `- pattern` adding a pattern to the current filter
/// - `name: pattern` declaring a single-pattern filter
/// - blank lines and `#` comments
///
/// Surrounding single or double quotes are stripped from names and patterns.
/// There is no nesting, no flow syntax and no escape handling. Any other line
/// is a configuration error.
pub fn parse_lenient(input: &str) -> Result<IndexMap<String, PatternList>, Error> {
    let mut filters: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut current: Option<String> = None;

    for (index, raw) in input.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(item) = line.strip_prefix('-') {
            let Some(patterns) = current.as_ref().and_then(|name| filters.get_mut(name)) else {
                return Err(line_error(number, line, "list item outside a filter"));
            };
            let pattern = pattern_value(item, number, line)?;
            patterns.push(pattern);
            continue;
        }

        if let Some(name) = line.strip_suffix(':') {
            let name = filter_name(name, number, line)?;
            filters.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        if let Some((name, pattern)) = line.split_once(": ") {
            let name = filter_name(name, number, line)?;
            let pattern = pattern_value(pattern, number, line)?;
            filters.insert(name, vec![pattern]);
            current = None;
            continue;
        }

        return Err(line_error(number, line, "expected `name:`, `- pattern` or `name: pattern`"));
    }

    Ok(filters
        .into_iter()
        .map(|(name, patterns)| (name, PatternList::Many(patterns)))
        .collect())
}

fn filter_name(raw: &str, number: usize, line: &str) -> Result<String, Error> {
    let name = unquote(raw.trim());
    if name.is_empty() || name.contains(['{', '}', '[', ']', '"', '\'', ',', ':']) {
        return Err(line_error(number, line, "invalid filter name"));
    }
    Ok(name.to_string())
}

fn pattern_value(raw: &str, number: usize, line: &str) -> Result<String, Error> {
    let pattern = unquote(raw.trim());
    if pattern.is_empty() {
        return Err(line_error(number, line, "empty pattern"));
    }
    if pattern.starts_with(['[', '{']) {
        return Err(line_error(number, line, "flow syntax is not supported"));
    }
    Ok(pattern.to_string())
}

fn line_error(number: usize, line: &str, reason: &str) -> Error {
    Error::configuration(format!("filters input line {number} ({line}): {reason}"))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
