//! Composite grade of one set of predicted findings

use crate::metrics::{file_iou, span_f1, SpanMetrics};
use codesearch_gym_core::Finding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File IoU, span metrics and raw counts for one grading call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub file_iou: f64,
    pub span_metrics: SpanMetrics,
    pub num_predicted: usize,
    pub num_ground_truth: usize,
}

/// Grade predicted findings against ground truth
pub fn grade_results(predicted: &[Finding], ground_truth: &[Finding], tolerance: usize) -> GradeReport {
    GradeReport {
        file_iou: file_iou(predicted, ground_truth),
        span_metrics: span_f1(predicted, ground_truth, tolerance),
        num_predicted: predicted.len(),
        num_ground_truth: ground_truth.len(),
    }
}

impl GradeReport {
    pub fn f1(&self) -> f64 {
        self.span_metrics.f1
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for GradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File IoU: {:.3}", self.file_iou)?;
        writeln!(f, "Span Precision: {:.3}", self.span_metrics.precision)?;
        writeln!(f, "Span Recall: {:.3}", self.span_metrics.recall)?;
        writeln!(f, "Span F1: {:.3}", self.span_metrics.f1)?;
        writeln!(f, "Num Predicted: {}", self.num_predicted)?;
        write!(f, "Num Ground Truth: {}", self.num_ground_truth)
    }
}
