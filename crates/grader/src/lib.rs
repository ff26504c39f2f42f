//! Scoring of predicted findings against ground truth
//!
//! Provides file-level IoU, greedy span precision/recall/F1 with a line
//! tolerance, a composite grade report and a weighted reward signal.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod metrics;
pub mod report;
pub mod reward;

pub use metrics::{file_iou, span_f1, Span, SpanMetrics};
pub use report::{grade_results, GradeReport};
pub use reward::{compute_reward_signal, RewardOptions, RewardSignal};
