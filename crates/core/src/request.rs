//! Typed search tool requests
//!
//! A request is a tagged union keyed by [`ToolName`]: structural requests go
//! to ast-grep, textual requests go to ripgrep.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Languages accepted by the structural matcher
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Java,
    Cpp,
    CSharp,
}

impl Language {
    /// Resolve a language name, accepting common short aliases (`js`, `c++`, ...)
    pub fn from_alias(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        let canonical = match lower.as_str() {
            "js" => "javascript",
            "ts" => "typescript",
            "py" => "python",
            "c++" => "cpp",
            "c#" => "csharp",
            other => other,
        };
        Self::from_str(canonical).ok()
    }
}

/// Wire names of the two search tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    /// Structural pattern matcher (ast-grep)
    AstGrepSearch,
    /// Textual regex matcher (ripgrep)
    RipgrepSearch,
}

/// Structural pattern search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuralRequest {
    pub pattern: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
}

/// Textual regex search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextualRequest {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Use the extended (PCRE2) regex engine
    #[serde(default)]
    pub pcre2: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_lines: Option<u32>,
}

impl TextualRequest {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            file_types: None,
            paths: None,
            case_sensitive: false,
            pcre2: false,
            context_lines: None,
        }
    }
}

impl StructuralRequest {
    pub fn new(pattern: impl Into<String>, language: Language) -> Self {
        Self {
            pattern: pattern.into(),
            language,
            paths: None,
        }
    }
}

/// A request for one of the two search tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Structural(StructuralRequest),
    Textual(TextualRequest),
}

impl ToolRequest {
    /// Build a request from a tool name and its JSON arguments object
    pub fn from_parts(name: ToolName, arguments: serde_json::Value) -> Result<Self> {
        let request = match name {
            ToolName::AstGrepSearch => Self::Structural(serde_json::from_value(arguments)?),
            ToolName::RipgrepSearch => Self::Textual(serde_json::from_value(arguments)?),
        };
        if request.pattern().is_empty() {
            return Err(Error::invalid_input("pattern must be non-empty string"));
        }
        Ok(request)
    }

    pub fn tool_name(&self) -> ToolName {
        match self {
            Self::Structural(_) => ToolName::AstGrepSearch,
            Self::Textual(_) => ToolName::RipgrepSearch,
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Self::Structural(r) => &r.pattern,
            Self::Textual(r) => &r.pattern,
        }
    }

    /// The JSON arguments object for this request
    pub fn arguments(&self) -> Result<serde_json::Value> {
        let value = match self {
            Self::Structural(r) => serde_json::to_value(r)?,
            Self::Textual(r) => serde_json::to_value(r)?,
        };
        Ok(value)
    }
}

impl From<StructuralRequest> for ToolRequest {
    fn from(request: StructuralRequest) -> Self {
        Self::Structural(request)
    }
}

impl From<TextualRequest> for ToolRequest {
    fn from(request: TextualRequest) -> Self {
        Self::Textual(request)
    }
}
