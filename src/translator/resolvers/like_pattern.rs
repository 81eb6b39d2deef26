use once_cell::sync::Lazy;
use regex::Regex;

use crate::translator::TranslateError;

static WILDCARD: Lazy<Regex> = Lazy::new(|| Regex::new("[%_]").expect("wildcard regex"));

/// A SQL `LIKE` pattern rewritten as a regular expression for the store's
/// `match` operation.
///
/// A leading or trailing `%` is dropped and leaves that end unanchored;
/// otherwise the end is anchored with `^` / `$`. Inner `%` becomes `.*`,
/// `_` becomes `.`, everything else is matched literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    regex: String,
    case_insensitive: bool,
}

impl LikePattern {
    pub fn compile(pattern: &str, case_insensitive: bool) -> Result<Self, TranslateError> {
        let (body, anchor_start) = match pattern.strip_prefix('%') {
            Some(rest) => (rest, false),
            None => (pattern, true),
        };
        let (body, anchor_end) = match body.strip_suffix('%') {
            Some(rest) => (rest, false),
            None => (body, true),
        };

        let mut regex = String::new();
        if case_insensitive {
            regex.push_str("(?i)");
        }
        if anchor_start {
            regex.push('^');
        }
        let mut last = 0;
        for m in WILDCARD.find_iter(body) {
            regex.push_str(&regex::escape(&body[last..m.start()]));
            regex.push_str(if m.as_str() == "%" { ".*" } else { "." });
            last = m.end();
        }
        regex.push_str(&regex::escape(&body[last..]));
        if anchor_end {
            regex.push('$');
        }

        Regex::new(&regex).map_err(|e| TranslateError::InvalidLikePattern(e.to_string()))?;
        Ok(Self { regex, case_insensitive })
    }

    pub fn as_str(&self) -> &str {
        &self.regex
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}
