//! Glob patterns for operation and type names.
//!
//! `*` matches any run of characters, `?` one character, and `[...]` a
//! character class. Names are matched whole and case-sensitively.

use glob::Pattern;

use crate::error::{InterceptError, Result};

/// Compile `patterns`, failing on the first malformed one.
pub fn compile<I, S>(patterns: I) -> Result<Vec<Pattern>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Pattern::new(pattern).map_err(|e| InterceptError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

/// Check whether `candidate` matches any of `patterns`.
pub fn any_match(patterns: &[Pattern], candidate: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(candidate))
}
