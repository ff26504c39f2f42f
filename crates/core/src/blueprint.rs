//! Blueprints: fixed test cases pairing a tool request with expected findings
//!
//! Blueprints are stored either as a JSON list (`*.json`) or as one JSON
//! object per line (`*.jsonl`).

use crate::error::{Error, Result};
use crate::finding::Finding;
use crate::request::{ToolName, ToolRequest};
use crate::tool_call::{tool_call_for, validate_tool_call};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A verifiable tool call over a named fixture corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlueprintRecord", into = "BlueprintRecord")]
pub struct Blueprint {
    pub id: String,
    /// Natural-language task the tool call answers
    pub intent: String,
    pub request: ToolRequest,
    /// Name of the fixture corpus the request runs against
    pub corpus: String,
    pub ground_truth: Vec<Finding>,
    pub description: Option<String>,
}

/// On-disk shape of a blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlueprintRecord {
    id: String,
    intent: String,
    tool: ToolName,
    arguments: serde_json::Value,
    corpus: String,
    #[serde(default)]
    ground_truth: Vec<Finding>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<BlueprintRecord> for Blueprint {
    type Error = Error;

    fn try_from(record: BlueprintRecord) -> Result<Self> {
        let request = ToolRequest::from_parts(record.tool, record.arguments)
            .map_err(|e| Error::blueprint(format!("{}: invalid arguments: {e}", record.id)))?;
        Ok(Self {
            id: record.id,
            intent: record.intent,
            request,
            corpus: record.corpus,
            ground_truth: record.ground_truth,
            description: record.description,
        })
    }
}

impl From<Blueprint> for BlueprintRecord {
    fn from(bp: Blueprint) -> Self {
        // Typed requests always serialize to an object
        let arguments = bp
            .request
            .arguments()
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default()));
        Self {
            id: bp.id,
            intent: bp.intent,
            tool: bp.request.tool_name(),
            arguments,
            corpus: bp.corpus,
            ground_truth: bp.ground_truth,
            description: bp.description,
        }
    }
}

impl Blueprint {
    pub fn tool(&self) -> ToolName {
        self.request.tool_name()
    }

    /// The tool-call document this blueprint expects a model to emit
    pub fn to_tool_call(&self) -> Result<serde_json::Value> {
        tool_call_for(&self.request)
    }

    /// Check that the blueprint is usable for verification
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.ground_truth.is_empty() {
            return Err("ground_truth must be non-empty".to_string());
        }
        let call = self.to_tool_call().map_err(|e| e.to_string())?;
        validate_tool_call(&call).map_err(|e| format!("invalid tool call: {e}"))?;
        Ok(())
    }
}

fn is_jsonl(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"))
}

/// Load blueprints from a `.json` list/object or a `.jsonl` file
///
/// A missing file yields an empty list.
pub fn load_blueprints(path: &Path) -> Result<Vec<Blueprint>> {
    if !path.exists() {
        debug!("Blueprint file {} does not exist", path.display());
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let file = path.display().to_string();

    if is_jsonl(path) {
        let mut blueprints = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let bp = serde_json::from_str(line)
                .map_err(|e| Error::parse(&file, format!("line {}: {e}", idx + 1)))?;
            blueprints.push(bp);
        }
        return Ok(blueprints);
    }

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| Error::parse(&file, e.to_string()))?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| Error::parse(&file, e.to_string()))
        }
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(|bp| vec![bp])
            .map_err(|e| Error::parse(&file, e.to_string())),
        _ => Err(Error::parse(&file, "Invalid JSON content for blueprints")),
    }
}

/// Save blueprints, choosing the format from the file extension
pub fn save_blueprints(blueprints: &[Blueprint], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_jsonl(path) {
        let mut out = String::new();
        for bp in blueprints {
            out.push_str(&serde_json::to_string(bp)?);
            out.push('\n');
        }
        out
    } else {
        serde_json::to_string_pretty(blueprints)?
    };

    std::fs::write(path, content)?;
    debug!("Saved {} blueprints to {}", blueprints.len(), path.display());
    Ok(())
}
