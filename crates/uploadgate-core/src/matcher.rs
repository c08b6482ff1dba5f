//! Accepted MIME type rules
//!
//! A matcher is either a literal substring or a regular expression. Both are
//! evaluated against the MIME type resolved for the source file.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use regex::Regex;

#[derive(Debug, Clone)]
pub enum MimeMatcher {
    /// Accepts any MIME type containing this string
    Literal(String),
    /// Accepts any MIME type the expression matches
    Pattern(Regex),
}

impl MimeMatcher {
    /// Compile a pattern matcher
    pub fn pattern(expr: &str) -> Result<Self, regex::Error> {
        Regex::new(expr).map(MimeMatcher::Pattern)
    }

    pub fn matches(&self, mime_type: &str) -> bool {
        match self {
            MimeMatcher::Literal(needle) => mime_type.contains(needle.as_str()),
            MimeMatcher::Pattern(re) => re.is_match(mime_type),
        }
    }
}

impl PartialEq for MimeMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MimeMatcher::Literal(a), MimeMatcher::Literal(b)) => a == b,
            (MimeMatcher::Pattern(a), MimeMatcher::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for MimeMatcher {
    fn from(value: &str) -> Self {
        MimeMatcher::Literal(value.to_string())
    }
}

impl From<String> for MimeMatcher {
    fn from(value: String) -> Self {
        MimeMatcher::Literal(value)
    }
}

impl From<Regex> for MimeMatcher {
    fn from(value: Regex) -> Self {
        MimeMatcher::Pattern(value)
    }
}

/// Parses the textual form used in configuration: `/expr/` is a pattern,
/// anything else is a literal.
impl FromStr for MimeMatcher {
    type Err = regex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() >= 2 && s.starts_with('/') && s.ends_with('/') {
            MimeMatcher::pattern(&s[1..s.len() - 1])
        } else {
            Ok(MimeMatcher::Literal(s.to_string()))
        }
    }
}

impl Display for MimeMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MimeMatcher::Literal(s) => write!(f, "{}", s),
            MimeMatcher::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
