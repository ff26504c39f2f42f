//! Command implementations

use anyhow::{anyhow, bail, Context, Result};
use codesearch_gym_core::{
    load_blueprints, repair_tool_call, save_blueprints, validate_tool_call, Blueprint,
};
use codesearch_gym_grader::{
    compute_reward_signal, grade_results, GradeReport, RewardOptions, RewardSignal,
};
use codesearch_gym_tools::SearchTool;
use codesearch_gym_verify::{
    adversarial_seeds, corpus_path, find_corpus, materialize_corpus, VerificationReport, Verifier,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Load blueprints from a file, or fall back to the built-in seeds
pub fn load_blueprint_set(path: Option<&Path>) -> Result<Vec<Blueprint>> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("Blueprint file {} does not exist", path.display());
            }
            load_blueprints(path)
                .with_context(|| format!("Failed to load blueprints from {}", path.display()))
        }
        None => Ok(adversarial_seeds()),
    }
}

/// Read a JSON document from disk
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Verify blueprints, optionally restricted to one id
///
/// A single blueprint is verified on its own so only its corpus is
/// materialized.
pub async fn verify<T: SearchTool>(
    verifier: &Verifier<T>,
    blueprints: &[Blueprint],
    seed_id: Option<&str>,
) -> Result<VerificationReport> {
    match seed_id {
        Some(id) => {
            let blueprint = blueprints
                .iter()
                .find(|b| b.id == id)
                .ok_or_else(|| anyhow!("Unknown seed id: {id}"))?;
            let result = verifier.verify_seed(blueprint).await;
            Ok(VerificationReport::from_results(vec![result], verifier.min_f1()))
        }
        None => Ok(verifier.verify_all(blueprints).await),
    }
}

/// Summary of the tool run behind a grade
#[derive(Debug, Clone, Serialize)]
pub struct ToolRun {
    pub success: bool,
    pub exit_code: i32,
    pub stderr: String,
}

/// Output of the `grade` command
#[derive(Debug, Clone, Serialize)]
pub struct GradeOutput {
    pub blueprint_id: String,
    /// Validation failure of the tool call; the tool is not run when set
    pub validation_error: Option<String>,
    pub tool: Option<ToolRun>,
    pub grade: GradeReport,
    pub reward: RewardSignal,
}

/// Execute a tool call in the blueprint's corpus and score it
///
/// An invalid tool call is not executed and is graded as producing no findings.
pub async fn grade_tool_call<T: SearchTool>(
    tool: &T,
    blueprint: &Blueprint,
    tool_call: &Value,
    fixtures_dir: &Path,
    options: &RewardOptions,
) -> Result<GradeOutput> {
    let (predicted, validation_error, run) = match validate_tool_call(tool_call) {
        Err(reason) => {
            warn!("Tool call is invalid: {reason}");
            (Vec::new(), Some(reason), None)
        }
        Ok(request) => {
            let corpus = find_corpus(&blueprint.corpus)
                .ok_or_else(|| anyhow!("Unknown corpus: {}", blueprint.corpus))?;
            let mut root = corpus_path(fixtures_dir, corpus.name)?;
            if !root.exists() {
                root = materialize_corpus(corpus, fixtures_dir)?;
            }
            let outcome = tool.search(&request, Some(&root)).await;
            let run = ToolRun {
                success: outcome.success,
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            };
            (outcome.findings, None, Some(run))
        }
    };

    let grade = grade_results(&predicted, &blueprint.ground_truth, options.tolerance);
    let reward = compute_reward_signal(&predicted, &blueprint.ground_truth, tool_call, options);
    info!("Graded {}: F1 {:.3}, reward {:.3}", blueprint.id, grade.f1(), reward.total);

    Ok(GradeOutput {
        blueprint_id: blueprint.id.clone(),
        validation_error,
        tool: run,
        grade,
        reward,
    })
}

/// Output of the `validate` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutput {
    pub valid: bool,
    pub reason: Option<String>,
    /// Whether repair changed the call into a valid one
    pub repaired: bool,
    pub notes: Vec<String>,
    pub call: Value,
}

/// Validate a tool-call document, optionally repairing it first
pub fn validate_document(call: &Value, repair: bool) -> ValidationOutput {
    let (call, repaired, notes) = if repair {
        let outcome = repair_tool_call(call);
        (outcome.call, outcome.repaired, outcome.notes)
    } else {
        (call.clone(), false, Vec::new())
    };
    let reason = validate_tool_call(&call).err();
    ValidationOutput {
        valid: reason.is_none(),
        reason,
        repaired,
        notes,
        call,
    }
}

/// Write the built-in seeds to a blueprint document
pub fn export_seeds(path: &Path) -> Result<usize> {
    let seeds = adversarial_seeds();
    save_blueprints(&seeds, path)
        .with_context(|| format!("Failed to write seeds to {}", path.display()))?;
    Ok(seeds.len())
}
