//! Core types for the codesearch-gym grading harness
//!
//! This crate provides the foundational abstractions shared by the tool
//! adapters, the grader and the verification orchestrator:
//!
//! - **Findings**: normalized match locations
//! - **Requests**: typed structural and textual search requests
//! - **Tool calls**: validation and repair of tool-call documents
//! - **Blueprints**: test cases with ground truth, and their on-disk formats
//! - **Configuration**: harness configuration management
//! - **Error handling**: unified error types

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod blueprint;
pub mod config;
pub mod error;
pub mod finding;
pub mod pcre;
pub mod request;
pub mod tool_call;

// Re-export main types for convenience
pub use blueprint::{load_blueprints, save_blueprints, Blueprint};
pub use config::{FixturesConfig, GradingConfig, GymConfig, RewardWeights, ToolsConfig};
pub use error::{Error, Result, ResultExt};
pub use finding::Finding;
pub use pcre::{needs_extended_regex, Pcre2Requirement};
pub use request::{Language, StructuralRequest, TextualRequest, ToolName, ToolRequest};
pub use tool_call::{repair_tool_call, tool_call_for, validate_tool_call, RepairOutcome};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::blueprint::Blueprint;
    pub use crate::error::{Result, ResultExt};
    pub use crate::finding::Finding;
    pub use crate::request::{ToolName, ToolRequest};
}
