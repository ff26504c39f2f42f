//! Detection of regex constructs that need the PCRE2 engine
//!
//! This is a syntactic check for lookaround and numbered backreferences only.
//! Other PCRE-only constructs are not detected.

use regex::Regex;
use std::sync::LazyLock;

static LOOKAROUND: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\(\?<?[=!]").ok());
static BACKREFERENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\\[1-9]").ok());

/// Whether a pattern needs extended regex support, and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pcre2Requirement {
    pub required: bool,
    pub reason: &'static str,
}

/// Inspect a ripgrep pattern for lookaround (`(?=`, `(?!`, `(?<=`, `(?<!`)
/// and backreferences (`\1`..`\9`)
pub fn needs_extended_regex(pattern: &str) -> Pcre2Requirement {
    if matches(&LOOKAROUND, pattern) {
        return Pcre2Requirement {
            required: true,
            reason: "pattern contains lookaround",
        };
    }
    if matches(&BACKREFERENCE, pattern) {
        return Pcre2Requirement {
            required: true,
            reason: "pattern contains backreference",
        };
    }
    Pcre2Requirement {
        required: false,
        reason: "PCRE2 not required",
    }
}

fn matches(re: &LazyLock<Option<Regex>>, pattern: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(pattern))
}
