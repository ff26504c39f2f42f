//! Aggregated verification results

use crate::verification::SeedVerification;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pass/fail counts and per-blueprint details for a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub min_f1: f64,
    pub summary: String,
    pub results: Vec<SeedVerification>,
}

impl VerificationReport {
    pub fn from_results(results: Vec<SeedVerification>, min_f1: f64) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            min_f1,
            summary: format!("passed={passed}/{total}, failed={failed}, min_f1={min_f1}"),
            results,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verification Report")?;
        write!(f, "{}", self.summary)?;
        for result in &self.results {
            write!(
                f,
                "\n- {}: {}  F1={:.3}  IoU={:.3} pred={} gt={}",
                result.seed_id,
                if result.passed { "PASS" } else { "FAIL" },
                result.span_f1,
                result.file_iou,
                result.num_predicted,
                result.num_ground_truth
            )?;
            if !result.passed && !result.errors.is_empty() {
                write!(f, "\n  errors: {:?}", result.errors)?;
            }
        }
        Ok(())
    }
}
