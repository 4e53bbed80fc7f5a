//! Category pattern matching.
//!
//! A pattern is one of, checked in this order:
//! - `:regex:<expr>` — `<expr>` is compiled as a regular expression and
//!   tested against the full path. A pattern that fails to compile matches
//!   nothing; it never surfaces an error.
//! - `:in:[a:b:c]` / `:not_in:[a:b:c]` — colon-separated folder-name
//!   prefixes. `:in:` matches paths starting with any listed prefix,
//!   `:not_in:` matches paths starting with none of them.
//! - anything else — a literal prefix of the path, surrounding whitespace
//!   trimmed.

use regex::Regex;
use tracing::debug;

const REGEX_PREFIX: &str = ":regex:";
const IN_PREFIX: &str = ":in:[";
const NOT_IN_PREFIX: &str = ":not_in:[";

/// Does `pattern` match `path`?
///
/// Pure and total: every `(pattern, path)` pair yields a bool.
#[must_use]
pub fn matches(pattern: &str, path: &str) -> bool {
    if let Some(expr) = pattern.strip_prefix(REGEX_PREFIX) {
        return match Regex::new(expr) {
            Ok(re) => re.is_match(path),
            Err(e) => {
                debug!(pattern = expr, error = %e, "invalid regex pattern, matching nothing");
                false
            }
        };
    }

    if let Some(list) = pattern.strip_prefix(IN_PREFIX) {
        return in_list(list, path);
    }
    if let Some(list) = pattern.strip_prefix(NOT_IN_PREFIX) {
        return !in_list(list, path);
    }

    path.starts_with(pattern.trim())
}

/// Does `path` start with any of the colon-separated prefixes in `list`
/// (trailing `]` tolerated)?
fn in_list(list: &str, path: &str) -> bool {
    let list = list.strip_suffix(']').unwrap_or(list);
    list.split(':').any(|prefix| path.starts_with(prefix))
}
