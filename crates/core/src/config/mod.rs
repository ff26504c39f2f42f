//! Configuration for the grading harness
//!
//! Configuration can be loaded from TOML files and/or environment variables
//! prefixed with `CODESEARCH_GYM_`.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use defaults::*;

pub use defaults::{DEFAULT_AST_GREP_BINARY, DEFAULT_FIXTURES_DIR, DEFAULT_RIPGREP_BINARY};

const MAX_TIMEOUT_SECS: u64 = 3600;
const MAX_CONCURRENCY: usize = 64;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.codesearch-gym/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".codesearch-gym").join("config.toml"))
}

/// External search tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Structural matcher executable
    #[serde(default = "default_ast_grep_binary")]
    pub ast_grep_binary: String,

    /// Textual matcher executable
    #[serde(default = "default_ripgrep_binary")]
    pub ripgrep_binary: String,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ast_grep_binary: default_ast_grep_binary(),
            ripgrep_binary: default_ripgrep_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Scoring and batch verification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Line tolerance when matching predicted spans to ground truth
    #[serde(default)]
    pub tolerance: usize,

    /// Minimum span F1 for a blueprint to pass verification
    #[serde(default = "default_min_f1")]
    pub min_f1: f64,

    /// Blueprints verified concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            tolerance: 0,
            min_f1: default_min_f1(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// Directory under which fixture corpora are materialized
    #[serde(default = "default_fixtures_dir")]
    pub base_dir: PathBuf,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            base_dir: default_fixtures_dir(),
        }
    }
}

/// Weights of the reward signal components
///
/// `total = alpha*parse + beta*find + gamma*scope - delta*effort
///          - zeta*pcre2_rule - zeta*errors`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardWeights {
    /// Weight of the parse component
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Weight of span F1
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Weight of file IoU
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// Penalty per unit of effort
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Penalty per reported error
    #[serde(default = "default_zeta")]
    pub zeta: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            delta: default_delta(),
            zeta: default_zeta(),
        }
    }
}

impl RewardWeights {
    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("delta", self.delta),
            ("zeta", self.zeta),
        ]
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GymConfig {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub grading: GradingConfig,

    #[serde(default)]
    pub fixtures: FixturesConfig,

    #[serde(default)]
    pub reward: RewardWeights,
}

impl GymConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tools.ast_grep_binary.trim().is_empty() {
            return Err(Error::config(
                "tools.ast_grep_binary must not be empty".to_string(),
            ));
        }
        if self.tools.ripgrep_binary.trim().is_empty() {
            return Err(Error::config(
                "tools.ripgrep_binary must not be empty".to_string(),
            ));
        }

        if self.tools.timeout_secs == 0 {
            return Err(Error::config(
                "tools.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.tools.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(Error::config(format!(
                "tools.timeout_secs too large (max {MAX_TIMEOUT_SECS}, got {})",
                self.tools.timeout_secs
            )));
        }

        if !(0.0..=1.0).contains(&self.grading.min_f1) {
            return Err(Error::config(format!(
                "grading.min_f1 must be between 0.0 and 1.0 (got {})",
                self.grading.min_f1
            )));
        }

        if self.grading.concurrency == 0 {
            return Err(Error::config(
                "grading.concurrency must be greater than 0".to_string(),
            ));
        }
        if self.grading.concurrency > MAX_CONCURRENCY {
            return Err(Error::config(format!(
                "grading.concurrency too large (max {MAX_CONCURRENCY}, got {})",
                self.grading.concurrency
            )));
        }

        for (name, weight) in self.reward.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::config(format!(
                    "reward.{name} must be a finite non-negative number (got {weight})"
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::config(format!("Failed to create config directory: {e}"))
                })?;
            }
        }

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
