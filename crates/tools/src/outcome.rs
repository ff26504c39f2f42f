use crate::process::ProcessOutput;
use codesearch_gym_core::Finding;

/// Result of one search tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    /// True when the tool exited with 0 (matches) or 1 (no matches)
    pub success: bool,
    pub findings: Vec<Finding>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ToolOutcome {
    /// Build an outcome from process output and the findings parsed from it
    pub fn from_output(output: ProcessOutput, findings: Vec<Finding>) -> Self {
        Self {
            success: matches!(output.exit_code, 0 | 1),
            findings,
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }
}
