//! Library interface for the codesearch-gym CLI
//!
//! This module exposes the command implementations for integration testing
//! while keeping argument parsing in main.rs.

pub mod commands;

pub use anyhow::Result;
pub use codesearch_gym_core::GymConfig;
