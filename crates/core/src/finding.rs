//! Normalized match locations
//!
//! Every search tool output is mapped into [`Finding`] values so predictions
//! and ground truth can be compared with the same metrics.

use serde::{Deserialize, Serialize};

/// One matched location in a corpus
///
/// Lines and columns are 1-based. `end_line` defaults to `line` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Repository-relative path of the matched file
    pub path: String,
    /// First line of the match
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    /// Matched text as reported by the tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_before: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_after: Option<Vec<String>>,
}

impl Finding {
    /// Create a finding with only a path and a line
    pub fn new(path: impl Into<String>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
            column: None,
            end_line: None,
            end_column: None,
            text: None,
            context_before: None,
            context_after: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_end_line(mut self, end_line: usize) -> Self {
        self.end_line = Some(end_line);
        self
    }

    pub fn with_end_column(mut self, end_column: usize) -> Self {
        self.end_column = Some(end_column);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Last line of the match, falling back to `line`
    pub fn effective_end_line(&self) -> usize {
        self.end_line.unwrap_or(self.line)
    }
}
