//! End-to-end scoring of tool calls through the public grader API

use codesearch_gym_core::{Finding, RewardWeights};
use codesearch_gym_grader::{compute_reward_signal, grade_results, RewardOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_lookbehind_without_pcre2_is_penalized() {
    let gt = vec![Finding::new("config.txt", 1)];
    let call = json!({
        "name": "ripgrep_search",
        "arguments": {"pattern": "(?<=password=)\\S+"}
    });

    let signal = compute_reward_signal(&[], &gt, &call, &RewardOptions::default());

    assert_eq!(signal.parse, 1.0);
    assert_eq!(signal.pcre2_rule, 1.0);
    assert_eq!(signal.find, 0.0);
    // 0.2 * parse - 0.5 * pcre2_rule
    assert!(close(signal.total, -0.3));
}

#[test]
fn test_false_positives_cost_effort() {
    let gt = vec![Finding::new("src/App.js", 4)];
    let predicted = vec![
        Finding::new("src/App.js", 4),
        Finding::new("src/App.js", 40),
        Finding::new("src/utils.js", 2),
    ];
    let call = json!({
        "name": "ast_grep_search",
        "arguments": {"pattern": "useEffect($$ARGS)", "language": "javascript"}
    });

    let signal = compute_reward_signal(&predicted, &gt, &call, &RewardOptions::default());
    let report = grade_results(&predicted, &gt, 0);

    assert_eq!(report.span_metrics.false_positives, 2);
    assert!(close(signal.effort, 0.02));
    assert!(close(signal.find, 0.5));
    assert!(close(signal.scope, 0.5));
    // 0.2 + 0.5 * 0.5 + 0.2 * 0.5 - 0.05 * 0.02
    assert!(close(signal.total, 0.549));
}

#[test]
fn test_embedded_errors_override_option() {
    let gt = vec![Finding::new("main.c", 4)];
    let predicted = gt.clone();
    let call = json!({
        "name": "ripgrep_search",
        "arguments": {"pattern": "printf\\(", "file_types": ["c"]},
        "errors": 2
    });
    let options = RewardOptions {
        errors: 5.0,
        ..RewardOptions::default()
    };

    let signal = compute_reward_signal(&predicted, &gt, &call, &options);
    assert_eq!(signal.errors, 2.0);
    // 0.2 + 0.5 + 0.2 - 0.5 * 2
    assert!(close(signal.total, -0.1));
}

#[test]
fn test_custom_weights_and_tolerance() {
    let gt = vec![Finding::new("a.py", 10)];
    let predicted = vec![Finding::new("a.py", 12)];
    let call = json!({"name": "ripgrep_search", "arguments": {"pattern": "def"}});
    let options = RewardOptions {
        tolerance: 2,
        weights: RewardWeights {
            alpha: 0.0,
            beta: 1.0,
            gamma: 0.0,
            delta: 0.0,
            zeta: 0.0,
        },
        errors: 0.0,
    };

    let signal = compute_reward_signal(&predicted, &gt, &call, &options);
    assert_eq!(signal.total, 1.0);

    let strict = RewardOptions {
        tolerance: 1,
        ..options
    };
    assert_eq!(compute_reward_signal(&predicted, &gt, &call, &strict).total, 0.0);
}
