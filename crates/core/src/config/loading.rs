//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, GymConfig};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: Builder,
    key: &str,
    value: T,
) -> Result<Builder> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl GymConfig {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `CODESEARCH_GYM_` and use double
    /// underscores for nested values, e.g. `CODESEARCH_GYM_TOOLS__TIMEOUT_SECS=5`.
    /// A missing file is not an error; defaults and environment still apply.
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // The config crate doesn't apply serde defaults for keys it has never seen
        let builder = set_config_default(builder, "tools.ast_grep_binary", DEFAULT_AST_GREP_BINARY)?;
        let builder = set_config_default(builder, "tools.ripgrep_binary", DEFAULT_RIPGREP_BINARY)?;
        let builder =
            set_config_default(builder, "tools.timeout_secs", default_timeout_secs() as i64)?;
        let builder = set_config_default(builder, "grading.tolerance", 0i64)?;
        let builder = set_config_default(builder, "grading.min_f1", default_min_f1())?;
        let builder =
            set_config_default(builder, "grading.concurrency", default_concurrency() as i64)?;
        let builder = set_config_default(builder, "fixtures.base_dir", DEFAULT_FIXTURES_DIR)?;
        let builder = set_config_default(builder, "reward.alpha", default_alpha())?;
        let builder = set_config_default(builder, "reward.beta", default_beta())?;
        let builder = set_config_default(builder, "reward.gamma", default_gamma())?;
        let builder = set_config_default(builder, "reward.delta", default_delta())?;
        let mut builder = set_config_default(builder, "reward.zeta", default_zeta())?;

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("CODESEARCH_GYM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.codesearch-gym/config.toml or custom --config path)
    /// 3. Environment variables (CODESEARCH_GYM_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        let config = Self::from_file(&path)?;
        config.validate()?;
        Ok(config)
    }
}
