//! Glob pattern compiler
//!
//! Turns one filter pattern into an anchored [`Matcher`] over repository-relative
//! paths. Supported syntax is deliberately small:
//!
//! - `**` as a whole segment matches zero or more path segments
//! - `*` matches any run of characters within a segment
//! - `?` matches a single character within a segment
//! - everything else is literal
//!
//! `/` is always the separator and matching is case-sensitive.

use regex::Regex;

const RECURSIVE: &str = "**";

/// Compiled predicate for a single glob pattern
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    regex: Option<Regex>,
}

impl Matcher {
    /// Test whether the whole path is matched by the pattern
    pub fn is_match(&self, path: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(path),
            // Only reachable when the generated regex exceeded the size limit
            None => path == self.pattern,
        }
    }
}

/// Compile a glob pattern into a matcher. Never fails: any string yields some matcher.
pub fn compile(pattern: &str) -> Matcher {
    let source = glob_to_regex(pattern);
    let regex = match Regex::new(&source) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("Pattern '{}' could not be compiled ({}), matching it literally", pattern, e);
            None
        }
    };

    Matcher {
        pattern: pattern.to_string(),
        regex,
    }
}

enum Segment<'a> {
    Recursive,
    Plain(&'a str),
}

/// Convert a glob pattern into an anchored regex source string
pub fn glob_to_regex(pattern: &str) -> String {
    let mut segments = Vec::new();
    for part in pattern.split('/') {
        if part == RECURSIVE {
            // `a/**/**/b` behaves like `a/**/b`
            if matches!(segments.last(), Some(Segment::Recursive)) {
                continue;
            }
            segments.push(Segment::Recursive);
        } else {
            segments.push(Segment::Plain(part));
        }
    }

    let last = segments.len().saturating_sub(1);
    let mut regex = String::from("(?s)^");
    let mut after_recursive = false;

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Recursive => {
                let piece = match (i == 0, i == last) {
                    (true, true) => ".*",
                    (true, false) => "(?:.*/)?",
                    (false, true) => "(?:/.*)?",
                    (false, false) => "(?:/.*)?/",
                };
                regex.push_str(piece);
                after_recursive = true;
            }
            Segment::Plain(text) => {
                if i > 0 && !after_recursive {
                    regex.push('/');
                }
                push_segment(&mut regex, text);
                after_recursive = false;
            }
        }
    }

    regex.push('$');
    regex
}

fn push_segment(regex: &mut String, segment: &str) {
    let mut buf = [0u8; 4];
    for c in segment.chars() {
        match c {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            _ => regex.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_segment_star() {
        let matcher = compile("*.py");
        assert!(matcher.is_match("main.py"));
        assert!(!matcher.is_match("main.js"));
        assert!(!matcher.is_match("dir/main.py"));
    }

    #[test]
    fn test_leading_recursive() {
        let matcher = compile("**/*.py");
        assert!(matcher.is_match("main.py"));
        assert!(matcher.is_match("dir/main.py"));
        assert!(matcher.is_match("dir/sub/main.py"));
        assert!(!matcher.is_match("main.js"));
    }

    #[test]
    fn test_trailing_recursive() {
        let matcher = compile("src/**");
        assert!(matcher.is_match("src"));
        assert!(matcher.is_match("src/main.py"));
        assert!(matcher.is_match("src/utils/helper.py"));
        assert!(!matcher.is_match("test/main.py"));
        assert!(!matcher.is_match("srcs/main.py"));
    }

    #[test]
    fn test_interior_recursive() {
        let matcher = compile("a/**/b");
        assert!(matcher.is_match("a/b"));
        assert!(matcher.is_match("a/x/b"));
        assert!(matcher.is_match("a/x/y/b"));
        assert!(!matcher.is_match("ab"));
        assert!(!matcher.is_match("a/b/c"));
    }

    #[test]
    fn test_consecutive_recursive_segments_collapse() {
        let matcher = compile("a/**/**/b");
        assert!(matcher.is_match("a/b"));
        assert!(matcher.is_match("a/x/y/b"));

        let everything = compile("**/**");
        assert!(everything.is_match("a/b"));
        assert!(everything.is_match("file"));
    }

    #[test]
    fn test_question_mark_stays_in_segment() {
        let matcher = compile("file?.txt");
        assert!(matcher.is_match("file1.txt"));
        assert!(!matcher.is_match("file.txt"));
        assert!(!matcher.is_match("file12.txt"));
        assert!(!compile("a?b").is_match("a/b"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let matcher = compile("docs/(draft)+[v1].md");
        assert!(matcher.is_match("docs/(draft)+[v1].md"));
        assert!(!matcher.is_match("docs/draftdraft1.md"));
        assert!(!compile("a.b").is_match("axb"));
    }

    #[test]
    fn test_matching_is_anchored_and_case_sensitive() {
        let matcher = compile("src/main.rs");
        assert!(matcher.is_match("src/main.rs"));
        assert!(!matcher.is_match("src/main.rs.bak"));
        assert!(!matcher.is_match("app/src/main.rs"));
        assert!(!matcher.is_match("SRC/main.rs"));
    }

    #[test]
    fn test_negation_marker_is_literal() {
        let matcher = compile("!src/**");
        assert!(!matcher.is_match("src/main.rs"));
        assert!(matcher.is_match("!src/main.rs"));
    }

    #[test]
    fn test_glob_to_regex_shapes() {
        assert_eq!(glob_to_regex("**"), "(?s)^.*$");
        assert_eq!(glob_to_regex("**/x"), "(?s)^(?:.*/)?x$");
        assert_eq!(glob_to_regex("x/**"), "(?s)^x(?:/.*)?$");
        assert_eq!(glob_to_regex("a/**/b"), "(?s)^a(?:/.*)?/b$");
    }

    proptest! {
        #[test]
        fn prop_double_star_matches_everything(path in "[a-zA-Z0-9_. -]{0,8}(/[a-zA-Z0-9_. -]{1,8}){0,5}") {
            prop_assert!(compile("**").is_match(&path));
        }

        #[test]
        fn prop_literal_pattern_matches_only_itself(
            pattern in "[a-z.+()$^|]{1,6}(/[a-z.+()$^|]{1,6}){0,3}",
            path in "[a-z.+()$^|]{1,6}(/[a-z.+()$^|]{1,6}){0,3}",
        ) {
            let matcher = compile(&pattern);
            prop_assert!(matcher.is_match(&pattern));
            prop_assert_eq!(matcher.is_match(&path), path == pattern);
        }

        #[test]
        fn prop_compile_is_idempotent(
            pattern in "([a-c*?]{1,3}|\\*\\*)(/([a-c*?]{1,3}|\\*\\*)){0,3}",
            paths in proptest::collection::vec("[a-c]{1,3}(/[a-c]{1,3}){0,4}", 1..16),
        ) {
            let first = compile(&pattern);
            let second = compile(&pattern);
            for path in &paths {
                prop_assert_eq!(first.is_match(path), second.is_match(path));
            }
        }

        #[test]
        fn prop_single_star_never_crosses_separator(dir in "[a-z]{1,5}", file in "[a-z]{1,5}") {
            let flat = format!("{file}.ext");
            let nested = format!("{dir}/{file}.ext");
            let matcher = compile("*.ext");
            prop_assert!(matcher.is_match(&flat));
            prop_assert!(!matcher.is_match(&nested));
            prop_assert!(compile("**/*.ext").is_match(&nested));
        }
    }
}
