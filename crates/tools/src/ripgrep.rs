//! Textual search adapter for ripgrep
//!
//! ripgrep's `--json` mode streams one event object per line. Only `match`
//! events are consumed; each submatch becomes its own finding.

use crate::outcome::ToolOutcome;
use crate::process::{CommandRunner, Invocation};
use codesearch_gym_core::{Finding, TextualRequest};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MatchData {
    path: TextField,
    #[serde(default)]
    lines: Option<TextField>,
    #[serde(default)]
    line_number: Option<usize>,
    #[serde(default)]
    submatches: Vec<Submatch>,
}

#[derive(Debug, Deserialize)]
struct TextField {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Submatch {
    #[serde(rename = "match")]
    matched: TextField,
    start: usize,
    end: usize,
}

impl MatchData {
    fn into_findings(self) -> Vec<Finding> {
        let Some(path) = self.path.text else {
            return Vec::new();
        };
        let line = self.line_number.unwrap_or(1);
        let has_line_text = self.lines.as_ref().is_some_and(|l| l.text.is_some());

        self.submatches
            .into_iter()
            .filter_map(|sub| {
                let mut finding = Finding::new(path.clone(), line).with_end_line(line);
                if has_line_text {
                    // An offset with no 1-based column drops the submatch
                    let column = sub.start.checked_add(1)?;
                    finding = finding.with_column(column).with_end_column(sub.end);
                }
                finding.text = sub.matched.text;
                Some(finding)
            })
            .collect()
    }
}

/// Build the ripgrep command line
///
/// The pattern goes through `-e` so a leading `-` is never read as a flag.
pub fn build_invocation(binary: &str, request: &TextualRequest, cwd: Option<&Path>) -> Invocation {
    let mut invocation = Invocation::new(binary).arg("--json");
    if request.pcre2 {
        invocation = invocation.arg("-P");
    }
    invocation = invocation.arg(if request.case_sensitive { "-s" } else { "-i" });
    for file_type in request.file_types.iter().flatten() {
        invocation = invocation.args(["-t", file_type.as_str()]);
    }
    if let Some(context) = request.context_lines {
        invocation = invocation.args(["-C".to_string(), context.to_string()]);
    }
    invocation
        .args(["-e", request.pattern.as_str()])
        .args(request.paths.iter().flatten().cloned())
        .current_dir(cwd.map(Path::to_path_buf))
}

/// Parse a ripgrep JSON event stream, skipping undecodable lines and events
pub fn parse_output(stdout: &str) -> Vec<Finding> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .filter(|event| event.get("type").and_then(Value::as_str) == Some("match"))
        .filter_map(|mut event| event.get_mut("data").map(Value::take))
        .filter_map(|data| serde_json::from_value::<MatchData>(data).ok())
        .flat_map(MatchData::into_findings)
        .collect()
}

/// Run a textual search and normalize its output
pub async fn run(
    runner: &dyn CommandRunner,
    binary: &str,
    request: &TextualRequest,
    cwd: Option<&Path>,
    timeout: Duration,
) -> ToolOutcome {
    let invocation = build_invocation(binary, request, cwd);
    let output = runner.run(&invocation, timeout).await;
    let findings = parse_output(&output.stdout);
    debug!(
        "ripgrep exited with {} and produced {} findings",
        output.exit_code,
        findings.len()
    );
    ToolOutcome::from_output(output, findings)
}
