//! Search tool adapters
//!
//! Runs ast-grep (structural) and ripgrep (textual) as external processes with
//! a timeout and normalizes their JSON output into [`Finding`] values.
//!
//! [`Finding`]: codesearch_gym_core::Finding

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod ast_grep;
mod executor;
mod outcome;
pub mod process;
pub mod ripgrep;

pub use executor::{SearchTool, ToolExecutor};
pub use outcome::ToolOutcome;
pub use process::{
    CommandRunner, Invocation, ProcessOutput, SystemRunner, EXIT_NOT_FOUND, EXIT_SIGNALED,
    EXIT_SPAWN_FAILED, EXIT_TIMEOUT,
};
