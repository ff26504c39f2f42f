//! Verification of blueprints against materialized fixture corpora

use crate::fixtures::{corpus_path, find_corpus, materialize_all, materialize_corpus};
use crate::report::VerificationReport;
use codesearch_gym_core::{Blueprint, GymConfig};
use codesearch_gym_grader::grade_results;
use codesearch_gym_tools::SearchTool;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Furthest step a blueprint reached during verification
///
/// An invalid blueprint stops at `CorpusReady` without running the tool. A
/// tool failure stops at `Executed`; only successful runs reach `Graded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStage {
    CorpusMissing,
    CorpusReady,
    Executed,
    Graded,
}

/// Verdict and metrics for one blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedVerification {
    pub seed_id: String,
    /// Whether the search tool reported success
    pub ok: bool,
    /// Tool success and span F1 at or above the threshold
    pub passed: bool,
    pub span_f1: f64,
    pub file_iou: f64,
    pub num_predicted: usize,
    pub num_ground_truth: usize,
    pub errors: Vec<String>,
    pub stage: VerificationStage,
}

impl SeedVerification {
    fn failed_before_execution(
        blueprint: &Blueprint,
        stage: VerificationStage,
        error: String,
    ) -> Self {
        Self {
            seed_id: blueprint.id.clone(),
            ok: false,
            passed: false,
            span_f1: 0.0,
            file_iou: 0.0,
            num_predicted: 0,
            num_ground_truth: blueprint.ground_truth.len(),
            errors: vec![error],
            stage,
        }
    }
}

/// Runs blueprints through a search tool and grades the results
pub struct Verifier<T: SearchTool> {
    tool: T,
    fixtures_dir: PathBuf,
    min_f1: f64,
    tolerance: usize,
    concurrency: usize,
}

impl<T: SearchTool> Verifier<T> {
    pub fn new(tool: T, fixtures_dir: impl Into<PathBuf>) -> Self {
        let defaults = GymConfig::default();
        Self {
            tool,
            fixtures_dir: fixtures_dir.into(),
            min_f1: defaults.grading.min_f1,
            tolerance: defaults.grading.tolerance,
            concurrency: defaults.grading.concurrency,
        }
    }

    /// Build a verifier from the grading and fixtures sections of a config
    pub fn from_config(tool: T, config: &GymConfig) -> Self {
        Self::new(tool, config.fixtures.base_dir.clone())
            .with_min_f1(config.grading.min_f1)
            .with_tolerance(config.grading.tolerance)
            .with_concurrency(config.grading.concurrency)
    }

    pub fn with_min_f1(mut self, min_f1: f64) -> Self {
        self.min_f1 = min_f1;
        self
    }

    pub fn with_tolerance(mut self, tolerance: usize) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn fixtures_dir(&self) -> &Path {
        &self.fixtures_dir
    }

    pub fn min_f1(&self) -> f64 {
        self.min_f1
    }

    /// Verify a single blueprint
    ///
    /// Only the blueprint's own corpus is materialized, and only if its
    /// directory does not exist yet.
    pub async fn verify_seed(&self, blueprint: &Blueprint) -> SeedVerification {
        let id = blueprint.id.as_str();
        debug!("{id}: {:?}", VerificationStage::CorpusMissing);

        let Some(corpus) = find_corpus(&blueprint.corpus) else {
            warn!("{id}: unknown corpus {}", blueprint.corpus);
            return SeedVerification::failed_before_execution(
                blueprint,
                VerificationStage::CorpusMissing,
                format!("Unknown corpus: {}", blueprint.corpus),
            );
        };

        let root = match corpus_path(&self.fixtures_dir, corpus.name) {
            Ok(root) if root.exists() => root,
            _ => match materialize_corpus(corpus, &self.fixtures_dir) {
                Ok(root) => root,
                Err(e) => {
                    warn!("{id}: failed to materialize {}: {e}", corpus.name);
                    return SeedVerification::failed_before_execution(
                        blueprint,
                        VerificationStage::CorpusMissing,
                        e.to_string(),
                    );
                }
            },
        };
        debug!("{id}: {:?} at {}", VerificationStage::CorpusReady, root.display());

        if let Err(reason) = blueprint.validate() {
            warn!("{id}: invalid blueprint: {reason}");
            return SeedVerification::failed_before_execution(
                blueprint,
                VerificationStage::CorpusReady,
                format!("Invalid blueprint: {reason}"),
            );
        }

        let outcome = self.tool.search(&blueprint.request, Some(&root)).await;
        debug!(
            "{id}: {:?} (exit {}, {} findings)",
            VerificationStage::Executed,
            outcome.exit_code,
            outcome.findings.len()
        );

        // Findings from a failed run are still graded
        let report = grade_results(&outcome.findings, &blueprint.ground_truth, self.tolerance);
        let (stage, errors) = if outcome.success {
            (VerificationStage::Graded, Vec::new())
        } else {
            (VerificationStage::Executed, vec![outcome.stderr])
        };
        let passed = outcome.success && report.span_metrics.f1 >= self.min_f1;

        info!(
            "{id}: {} (F1 {:.3}, IoU {:.3})",
            if passed { "PASS" } else { "FAIL" },
            report.span_metrics.f1,
            report.file_iou
        );

        SeedVerification {
            seed_id: blueprint.id.clone(),
            ok: outcome.success,
            passed,
            span_f1: report.span_metrics.f1,
            file_iou: report.file_iou,
            num_predicted: report.num_predicted,
            num_ground_truth: report.num_ground_truth,
            errors,
            stage,
        }
    }

    /// Verify a batch of blueprints
    ///
    /// All corpora are materialized up front; each blueprint is then verified
    /// independently and results keep the input order.
    pub async fn verify_all(&self, blueprints: &[Blueprint]) -> VerificationReport {
        if let Err(e) = materialize_all(&self.fixtures_dir) {
            // verify_seed retries per corpus and records the failure
            warn!("Failed to materialize fixtures: {e}");
        }

        let results: Vec<SeedVerification> = stream::iter(blueprints)
            .map(|blueprint| self.verify_seed(blueprint))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = VerificationReport::from_results(results, self.min_f1);
        info!("Verification finished: {}", report.summary);
        report
    }
}
