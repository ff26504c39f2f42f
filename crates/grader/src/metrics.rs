//! File-level and span-level overlap metrics

use codesearch_gym_core::Finding;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A `(path, start_line, end_line)` interval derived from a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub path: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Span<'a> {
    /// Build a span, swapping the bounds if the producer emitted them reversed
    pub fn from_finding(finding: &'a Finding) -> Self {
        let end_line = finding.effective_end_line();
        Self {
            path: &finding.path,
            start: finding.line.min(end_line),
            end: finding.line.max(end_line),
        }
    }

    /// Whether two spans on the same path intersect once each is widened by
    /// `tolerance` lines on both sides
    pub fn overlaps(&self, other: &Span<'_>, tolerance: usize) -> bool {
        self.path == other.path
            && self.end.saturating_add(tolerance) >= other.start
            && other.end.saturating_add(tolerance) >= self.start
    }
}

/// Precision, recall and F1 of a greedy span matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    #[serde(rename = "tp")]
    pub true_positives: usize,
    #[serde(rename = "fp")]
    pub false_positives: usize,
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

impl SpanMetrics {
    /// Derive the ratios from raw counts
    pub fn from_counts(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        let precision = ratio(true_positives, true_positives + false_positives);
        let recall = ratio(true_positives, true_positives + false_negatives);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            true_positives,
            false_positives,
            false_negatives,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Jaccard index of the distinct file paths on each side
///
/// Two empty sides are a vacuous match (1.0).
pub fn file_iou(predicted: &[Finding], ground_truth: &[Finding]) -> f64 {
    let p: HashSet<&str> = predicted.iter().map(|f| f.path.as_str()).collect();
    let g: HashSet<&str> = ground_truth.iter().map(|f| f.path.as_str()).collect();
    if p.is_empty() && g.is_empty() {
        return 1.0;
    }
    let union = p.union(&g).count();
    if union == 0 {
        return 0.0;
    }
    p.intersection(&g).count() as f64 / union as f64
}

/// Greedy one-to-one span matching
///
/// Predicted spans are visited in order and each claims the first unclaimed
/// ground-truth span it overlaps. Order therefore decides ties.
pub fn span_f1(predicted: &[Finding], ground_truth: &[Finding], tolerance: usize) -> SpanMetrics {
    let gt_spans: Vec<Span<'_>> = ground_truth.iter().map(Span::from_finding).collect();
    let mut claimed = vec![false; gt_spans.len()];
    let mut true_positives = 0;

    for prediction in predicted.iter().map(Span::from_finding) {
        let hit = gt_spans
            .iter()
            .enumerate()
            .find(|(idx, gt)| !claimed[*idx] && prediction.overlaps(gt, tolerance))
            .map(|(idx, _)| idx);
        if let Some(idx) = hit {
            claimed[idx] = true;
            true_positives += 1;
        }
    }

    SpanMetrics::from_counts(
        true_positives,
        predicted.len().saturating_sub(true_positives),
        ground_truth.len().saturating_sub(true_positives),
    )
}
