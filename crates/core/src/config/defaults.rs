//! Default values and functions for configuration

use std::path::PathBuf;

pub const DEFAULT_AST_GREP_BINARY: &str = "ast-grep";
pub const DEFAULT_RIPGREP_BINARY: &str = "rg";
pub const DEFAULT_FIXTURES_DIR: &str = "corpora_fixtures";

pub(crate) fn default_ast_grep_binary() -> String {
    DEFAULT_AST_GREP_BINARY.to_string()
}

pub(crate) fn default_ripgrep_binary() -> String {
    DEFAULT_RIPGREP_BINARY.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_min_f1() -> f64 {
    0.95
}

pub(crate) fn default_concurrency() -> usize {
    1
}

pub(crate) fn default_fixtures_dir() -> PathBuf {
    PathBuf::from(DEFAULT_FIXTURES_DIR)
}

pub(crate) fn default_alpha() -> f64 {
    0.2
}

pub(crate) fn default_beta() -> f64 {
    0.5
}

pub(crate) fn default_gamma() -> f64 {
    0.2
}

pub(crate) fn default_delta() -> f64 {
    0.05
}

pub(crate) fn default_zeta() -> f64 {
    0.5
}
