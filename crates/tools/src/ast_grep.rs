//! Structural search adapter for ast-grep
//!
//! ast-grep prints either a single JSON array or one JSON object per line.
//! Each match carries a `range` with 0-based `start`/`end` positions.

use crate::outcome::ToolOutcome;
use crate::process::{CommandRunner, Invocation};
use codesearch_gym_core::{Finding, StructuralRequest};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MatchRecord {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    path: Option<String>,
    range: MatchRange,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchRange {
    start: Position,
    #[serde(default)]
    end: Option<Position>,
}

#[derive(Debug, Deserialize)]
struct Position {
    line: usize,
    #[serde(default)]
    column: Option<usize>,
}

impl MatchRecord {
    fn into_finding(self) -> Option<Finding> {
        let path = self.file.or(self.path)?;
        let start = self.range.start;
        let end = self.range.end;
        // Positions that cannot be made 1-based drop the record
        Some(Finding {
            path,
            line: start.line.checked_add(1)?,
            column: one_based(start.column)?,
            end_line: one_based(end.as_ref().map(|p| p.line))?,
            end_column: one_based(end.and_then(|p| p.column))?,
            text: self.text,
            context_before: None,
            context_after: None,
        })
    }
}

/// Shift an optional 0-based position; `None` when it overflows
fn one_based(position: Option<usize>) -> Option<Option<usize>> {
    match position {
        Some(p) => p.checked_add(1).map(Some),
        None => Some(None),
    }
}

/// Build the ast-grep command line; paths are appended positionally
pub fn build_invocation(binary: &str, request: &StructuralRequest, cwd: Option<&Path>) -> Invocation {
    Invocation::new(binary)
        .args(["-p", request.pattern.as_str()])
        .args(["-l".to_string(), request.language.to_string()])
        .arg("--json")
        .args(request.paths.iter().flatten().cloned())
        .current_dir(cwd.map(Path::to_path_buf))
}

/// Split raw output into candidate JSON records
fn candidate_records(stdout: &str) -> Vec<Value> {
    let trimmed = stdout.trim();
    if trimmed.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str(trimmed) {
            return items;
        }
    }
    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .collect()
}

/// Parse ast-grep output, skipping any record that does not decode
pub fn parse_output(stdout: &str) -> Vec<Finding> {
    candidate_records(stdout)
        .into_iter()
        .filter_map(|value| serde_json::from_value::<MatchRecord>(value).ok())
        .filter_map(MatchRecord::into_finding)
        .collect()
}

/// Run a structural search and normalize its output
pub async fn run(
    runner: &dyn CommandRunner,
    binary: &str,
    request: &StructuralRequest,
    cwd: Option<&Path>,
    timeout: Duration,
) -> ToolOutcome {
    let invocation = build_invocation(binary, request, cwd);
    let output = runner.run(&invocation, timeout).await;
    let findings = parse_output(&output.stdout);
    debug!(
        "ast-grep exited with {} and produced {} findings",
        output.exit_code,
        findings.len()
    );
    ToolOutcome::from_output(output, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesearch_gym_core::Language;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_invocation() {
        let request = StructuralRequest {
            pattern: "def $F($$ARGS)".to_string(),
            language: Language::Python,
            paths: Some(vec!["src/".to_string(), "tests/".to_string()]),
        };
        let invocation = build_invocation("ast-grep", &request, Some(Path::new("/tmp/corpus")));
        assert_eq!(invocation.program, "ast-grep");
        assert_eq!(
            invocation.args,
            vec!["-p", "def $F($$ARGS)", "-l", "python", "--json", "src/", "tests/"]
        );
        assert_eq!(invocation.cwd.as_deref(), Some(Path::new("/tmp/corpus")));
    }

    #[test]
    fn test_parse_array() {
        let stdout = r#"[{"file": "src/a.py",
            "range": {"start": {"line": 2, "column": 0}, "end": {"line": 2, "column": 9}},
            "text": "def foo()"}]"#;
        assert_eq!(
            parse_output(stdout),
            vec![Finding::new("src/a.py", 3)
                .with_column(1)
                .with_end_line(3)
                .with_end_column(10)
                .with_text("def foo()")]
        );
    }

    #[test]
    fn test_parse_lines_skips_malformed() {
        let stdout = "not-json\n{\"file\": \"x\"}\n\
            {\"path\": \"b.js\", \"range\": {\"start\": {\"line\": 0}}}\n";
        assert_eq!(parse_output(stdout), vec![Finding::new("b.js", 1)]);
    }

    #[test]
    fn test_parse_skips_positions_that_overflow() {
        let stdout = "{\"file\": \"a.py\", \"range\": {\"start\": {\"line\": 18446744073709551615}}}\n\
            {\"file\": \"a.py\", \"range\": {\"start\": {\"line\": 2, \"column\": 18446744073709551615}}}\n\
            {\"file\": \"b.py\", \"range\": {\"start\": {\"line\": 0}}}\n";
        assert_eq!(parse_output(stdout), vec![Finding::new("b.py", 1)]);
    }

    #[test]
    fn test_parse_prefers_file_over_path() {
        let stdout = r#"{"file": "a.rs", "path": "ignored.rs", "range": {"start": {"line": 4}}}"#;
        assert_eq!(parse_output(stdout)[0].path, "a.rs");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_output("").is_empty());
        assert!(parse_output("[]").is_empty());
    }
}
