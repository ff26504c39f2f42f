//! Fixture corpora, seed blueprints and the verification orchestrator
//!
//! A blueprint is verified by materializing its corpus, running its request
//! through a [`SearchTool`](codesearch_gym_tools::SearchTool) rooted at the
//! corpus directory and grading the findings against its ground truth.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod fixtures;
mod report;
pub mod seeds;
mod verification;

pub use fixtures::{
    cleanup_fixtures, corpus_path, find_corpus, fixtures, materialize_all, materialize_corpus,
    FixtureCorpus,
};
pub use report::VerificationReport;
pub use seeds::{adversarial_seeds, seed_by_id};
pub use verification::{SeedVerification, VerificationStage, Verifier};
