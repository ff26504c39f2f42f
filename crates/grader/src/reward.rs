//! Scalar reward for a graded tool call

use crate::report::grade_results;
use codesearch_gym_core::{needs_extended_regex, validate_tool_call, Finding, RewardWeights, ToolName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Effort units charged per false positive
const EFFORT_PER_FALSE_POSITIVE: f64 = 0.01;

/// Per-call scoring options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardOptions {
    /// Line tolerance for span matching
    pub tolerance: usize,
    pub weights: RewardWeights,
    /// Error count used when the tool call carries no `errors` value
    pub errors: f64,
}

/// Reward components and their weighted total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSignal {
    /// 1.0 when the tool call validates
    pub parse: f64,
    /// Span F1
    pub find: f64,
    /// File IoU
    pub scope: f64,
    pub effort: f64,
    /// 1.0 when a textual pattern needs PCRE2 but the call left it off
    pub pcre2_rule: f64,
    pub errors: f64,
    pub total: f64,
}

/// Whether a ripgrep call uses lookaround/backreferences without enabling PCRE2
fn pcre2_violation(tool_call: &Value) -> bool {
    let is_textual = tool_call
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| name == ToolName::RipgrepSearch.to_string());
    if !is_textual {
        return false;
    }
    let Some(args) = tool_call.get("arguments") else {
        return false;
    };
    let pattern = args.get("pattern").and_then(Value::as_str).unwrap_or("");
    let pcre2 = args.get("pcre2").and_then(Value::as_bool).unwrap_or(false);
    needs_extended_regex(pattern).required && !pcre2
}

/// Combine parse validity, match quality and penalties into one reward
///
/// An `errors` number embedded in the tool call takes precedence over
/// `options.errors`.
pub fn compute_reward_signal(
    predicted: &[Finding],
    ground_truth: &[Finding],
    tool_call: &Value,
    options: &RewardOptions,
) -> RewardSignal {
    let report = grade_results(predicted, ground_truth, options.tolerance);
    let weights = &options.weights;

    let parse = if validate_tool_call(tool_call).is_ok() { 1.0 } else { 0.0 };
    let find = report.span_metrics.f1;
    let scope = report.file_iou;
    let effort = EFFORT_PER_FALSE_POSITIVE * report.span_metrics.false_positives as f64;
    let pcre2_rule = if pcre2_violation(tool_call) { 1.0 } else { 0.0 };
    let errors = tool_call
        .get("errors")
        .and_then(Value::as_f64)
        .unwrap_or(options.errors);

    let total = weights.alpha * parse + weights.beta * find + weights.gamma * scope
        - weights.delta * effort
        - weights.zeta * pcre2_rule
        - weights.zeta * errors;
    debug!("Reward total {total:.3} (f1 {find:.3}, iou {scope:.3}, errors {errors})");

    RewardSignal {
        parse,
        find,
        scope,
        effort,
        pcre2_rule,
        errors,
        total,
    }
}
