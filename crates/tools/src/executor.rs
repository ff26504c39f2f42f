//! Dispatch of typed requests to the matching adapter

use crate::outcome::ToolOutcome;
use crate::process::{CommandRunner, SystemRunner};
use crate::{ast_grep, ripgrep};
use async_trait::async_trait;
use codesearch_gym_core::{ToolRequest, ToolsConfig};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A search capability that executes a tool request rooted at a directory
#[async_trait]
pub trait SearchTool: Send + Sync {
    async fn search(&self, request: &ToolRequest, cwd: Option<&Path>) -> ToolOutcome;
}

/// Executes requests with the configured ast-grep and ripgrep binaries
#[derive(Clone)]
pub struct ToolExecutor {
    config: ToolsConfig,
    runner: Arc<dyn CommandRunner>,
}

impl ToolExecutor {
    /// Create an executor that spawns real processes
    pub fn new(config: ToolsConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    /// Create an executor with a custom command runner
    pub fn with_runner(config: ToolsConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchTool for ToolExecutor {
    async fn search(&self, request: &ToolRequest, cwd: Option<&Path>) -> ToolOutcome {
        info!("Executing {} for pattern {:?}", request.tool_name(), request.pattern());
        match request {
            ToolRequest::Structural(r) => {
                ast_grep::run(
                    self.runner.as_ref(),
                    &self.config.ast_grep_binary,
                    r,
                    cwd,
                    self.timeout(),
                )
                .await
            }
            ToolRequest::Textual(r) => {
                ripgrep::run(
                    self.runner.as_ref(),
                    &self.config.ripgrep_binary,
                    r,
                    cwd,
                    self.timeout(),
                )
                .await
            }
        }
    }
}
