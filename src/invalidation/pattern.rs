//! Pattern Engine
//!
//! Compiles glob-style invalidation patterns into anchored matchers.
//!
//! The pattern language has exactly two special forms:
//! - `*` matches zero or more characters of any kind
//! - `\x` matches the character `x` literally (so `\*` is a literal star)
//!
//! Every other character is literal. Patterns always match the whole key,
//! never a substring.

use regex::Regex;
use tracing::warn;

use crate::error::{CacheError, Result};

/// The pattern that selects every key.
pub const MATCH_ALL: &str = "*";

// == Compile ==
/// Compiles one glob pattern into a full-string anchored regex.
pub fn pattern_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");

    let mut buf = [0u8; 4];
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => source.push_str(".*"),
            '\\' => {
                // A trailing backslash has nothing to escape and stands for itself.
                let literal = chars.next().unwrap_or('\\');
                source.push_str(&regex::escape(literal.encode_utf8(&mut buf)));
            }
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|e| CacheError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

// == Escape ==
/// Escapes an externally supplied identifier so it is matched literally when
/// interpolated into a pattern.
pub fn escape_literal(identifier: &str) -> String {
    let mut escaped = String::with_capacity(identifier.len());
    for c in identifier.chars() {
        if c == '*' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// == Match ==
/// Returns true iff `key` fully matches at least one of `patterns`.
///
/// An empty list never matches. Patterns that fail to compile are logged and
/// skipped.
pub fn matches_cache_key<S: AsRef<str>>(key: &str, patterns: &[S]) -> bool {
    PatternSet::compile(patterns).is_match(key)
}

// == Pattern Set ==
/// A compiled list of patterns, built once per invalidation.
#[derive(Debug, Default)]
pub struct PatternSet {
    compiled: Vec<Regex>,
}

impl PatternSet {
    /// Compiles every pattern, skipping (and logging) the ones that fail.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let compiled = patterns
            .iter()
            .filter_map(|p| match pattern_to_regex(p.as_ref()) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(error = %e, "Skipping invalidation pattern");
                    None
                }
            })
            .collect();

        Self { compiled }
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(key))
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
