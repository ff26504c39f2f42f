//! Orchestrator tests against a programmable search tool

use async_trait::async_trait;
use codesearch_gym_core::{Blueprint, Finding, GymConfig, TextualRequest, ToolRequest};
use codesearch_gym_tools::{SearchTool, ToolOutcome};
use codesearch_gym_verify::{adversarial_seeds, VerificationStage, Verifier};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Answers each pattern with a canned outcome and records the working directory
#[derive(Default)]
struct StubTool {
    outcomes: HashMap<String, ToolOutcome>,
    calls: Mutex<Vec<(String, Option<PathBuf>)>>,
}

impl StubTool {
    fn with_findings(mut self, pattern: &str, findings: Vec<Finding>) -> Self {
        self.outcomes.insert(
            pattern.to_string(),
            ToolOutcome {
                success: true,
                exit_code: if findings.is_empty() { 1 } else { 0 },
                findings,
                stdout: String::new(),
                stderr: String::new(),
            },
        );
        self
    }

    fn with_failure(mut self, pattern: &str, exit_code: i32, stderr: &str) -> Self {
        self.outcomes.insert(
            pattern.to_string(),
            ToolOutcome {
                success: false,
                findings: Vec::new(),
                stdout: String::new(),
                stderr: stderr.to_string(),
                exit_code,
            },
        );
        self
    }

    fn calls(&self) -> Vec<(String, Option<PathBuf>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTool for StubTool {
    async fn search(&self, request: &ToolRequest, cwd: Option<&Path>) -> ToolOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((request.pattern().to_string(), cwd.map(Path::to_path_buf)));
        self.outcomes
            .get(request.pattern())
            .cloned()
            .unwrap_or_else(|| ToolOutcome {
                success: true,
                findings: Vec::new(),
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 1,
            })
    }
}

fn blueprint(id: &str, pattern: &str, corpus: &str, ground_truth: Vec<Finding>) -> Blueprint {
    Blueprint {
        id: id.to_string(),
        intent: format!("find {pattern}"),
        request: TextualRequest::new(pattern).into(),
        corpus: corpus.to_string(),
        ground_truth,
        description: None,
    }
}

#[tokio::test]
async fn test_unknown_corpus_does_not_abort_batch() {
    let dir = TempDir::new().unwrap();
    let tool = StubTool::default()
        .with_findings("TODO:", vec![Finding::new("src/utils.js", 2)])
        .with_findings(r"printf\(", vec![Finding::new("main.c", 4)]);
    let verifier = Verifier::new(tool, dir.path());

    let blueprints = vec![
        blueprint("todo", "TODO:", "react_hooks", vec![Finding::new("src/utils.js", 2)]),
        blueprint("lost", "anything", "no_such_corpus", vec![Finding::new("a", 1)]),
        blueprint("printf", r"printf\(", "c_printf", vec![Finding::new("main.c", 4)]),
    ];
    let report = verifier.verify_all(&blueprints).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.summary, "passed=2/3, failed=1, min_f1=0.95");

    let lost = &report.results[1];
    assert_eq!(lost.seed_id, "lost");
    assert!(!lost.passed);
    assert_eq!(lost.errors, vec!["Unknown corpus: no_such_corpus"]);
    assert_eq!(lost.stage, VerificationStage::CorpusMissing);

    assert!(report.results[0].passed);
    assert!(report.results[2].passed);
    assert_eq!(report.results[2].span_f1, 1.0);

    // The unknown corpus never reaches the tool
    let patterns: Vec<String> = verifier.tool().calls().into_iter().map(|(p, _)| p).collect();
    assert_eq!(patterns, vec!["TODO:".to_string(), r"printf\(".to_string()]);

    // Batch verification materializes every corpus up front
    assert!(dir.path().join("rust_macros").join("src/main.rs").exists());
}

#[tokio::test]
async fn test_single_verification_materializes_only_its_corpus() {
    let dir = TempDir::new().unwrap();
    let tool = StubTool::default().with_findings("DB", vec![Finding::new("src/api.ts", 2)]);
    let verifier = Verifier::new(tool, dir.path());

    let result = verifier
        .verify_seed(&blueprint(
            "db",
            "DB",
            "typescript_async",
            vec![Finding::new("src/api.ts", 2)],
        ))
        .await;

    assert!(result.passed);
    assert_eq!(result.stage, VerificationStage::Graded);
    assert!(dir.path().join("typescript_async/src/api.ts").exists());
    assert!(!dir.path().join("react_hooks").exists());

    let calls = verifier.tool().calls();
    let cwd = calls[0].1.clone().unwrap();
    assert!(cwd.is_absolute());
    assert!(cwd.ends_with("typescript_async"));
}

#[tokio::test]
async fn test_tool_failure_records_stderr() {
    let dir = TempDir::new().unwrap();
    let tool = StubTool::default().with_failure("x", 127, "rg not found: No such file or directory");
    let verifier = Verifier::new(tool, dir.path());

    let result = verifier
        .verify_seed(&blueprint("x", "x", "mixed_comments", vec![Finding::new("text.txt", 1)]))
        .await;

    assert!(!result.ok);
    assert!(!result.passed);
    assert_eq!(result.stage, VerificationStage::Executed);
    assert_eq!(result.errors, vec!["rg not found: No such file or directory"]);
}

#[tokio::test]
async fn test_blueprint_without_ground_truth_is_explained() {
    let dir = TempDir::new().unwrap();
    let tool = StubTool::default().with_findings("TODO:", vec![Finding::new("src/utils.js", 2)]);
    let verifier = Verifier::new(tool, dir.path());

    let blueprints = vec![
        blueprint("empty", "anything", "react_hooks", Vec::new()),
        blueprint("todo", "TODO:", "react_hooks", vec![Finding::new("src/utils.js", 2)]),
    ];
    let report = verifier.verify_all(&blueprints).await;

    let empty = &report.results[0];
    assert!(!empty.passed);
    assert_eq!(empty.stage, VerificationStage::CorpusReady);
    assert_eq!(
        empty.errors,
        vec!["Invalid blueprint: ground_truth must be non-empty"]
    );
    assert!(report.results[1].passed);

    // The invalid blueprint never reaches the tool
    let patterns: Vec<String> = verifier.tool().calls().into_iter().map(|(p, _)| p).collect();
    assert_eq!(patterns, vec!["TODO:".to_string()]);
}

#[tokio::test]
async fn test_threshold_applies_to_span_f1() {
    let dir = TempDir::new().unwrap();
    // One hit and one false positive: F1 = 2/3
    let tool = StubTool::default().with_findings(
        "the",
        vec![Finding::new("text.txt", 1), Finding::new("comments.js", 1)],
    );
    let gt = vec![Finding::new("text.txt", 1)];

    let strict = Verifier::new(tool, dir.path());
    let result = strict.verify_seed(&blueprint("the", "the", "mixed_comments", gt.clone())).await;
    assert!(result.ok);
    assert!(!result.passed);
    assert!(result.errors.is_empty());
    assert!((result.span_f1 - 2.0 / 3.0).abs() < 1e-9);
    assert!((result.file_iou - 0.5).abs() < 1e-9);

    let tool = StubTool::default().with_findings(
        "the",
        vec![Finding::new("text.txt", 1), Finding::new("comments.js", 1)],
    );
    let lenient = Verifier::new(tool, dir.path()).with_min_f1(0.5);
    assert!(lenient.verify_seed(&blueprint("the", "the", "mixed_comments", gt)).await.passed);
}

#[tokio::test]
async fn test_seeds_pass_with_ground_truth_answers() {
    let dir = TempDir::new().unwrap();
    let seeds = adversarial_seeds();
    let tool = seeds.iter().fold(StubTool::default(), |tool, seed| {
        tool.with_findings(seed.request.pattern(), seed.ground_truth.clone())
    });

    let mut config = GymConfig::default();
    config.fixtures.base_dir = dir.path().to_path_buf();
    config.grading.concurrency = 4;
    let verifier = Verifier::from_config(tool, &config);

    let report = verifier.verify_all(&seeds).await;
    assert_eq!(report.passed, 8);
    assert!(report.all_passed());
    let ids: Vec<&str> = report.results.iter().map(|r| r.seed_id.as_str()).collect();
    let expected: Vec<&str> = seeds.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, expected);
}
