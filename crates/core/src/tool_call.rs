//! Tool-call documents: shape validation and common repairs
//!
//! A tool call is the JSON object a model emits:
//! `{"name": "ast_grep_search" | "ripgrep_search", "arguments": {...}}`.
//! An optional top-level `errors` number is carried through to the reward signal.

use crate::pcre::needs_extended_regex;
use crate::request::{Language, ToolName, ToolRequest};
use serde_json::{Map, Value};
use std::str::FromStr;

const STRUCTURAL_FIELDS: &[&str] = &["pattern", "language", "paths"];
const TEXTUAL_FIELDS: &[&str] = &[
    "pattern",
    "file_types",
    "paths",
    "case_sensitive",
    "pcre2",
    "context_lines",
];

/// Build the tool-call document for a typed request
pub fn tool_call_for(request: &ToolRequest) -> crate::Result<Value> {
    Ok(serde_json::json!({
        "name": request.tool_name().to_string(),
        "arguments": request.arguments()?,
    }))
}

/// Validate a tool-call document against the fixed shape for its tool name
///
/// Returns the typed request on success, or a short reason on failure.
pub fn validate_tool_call(call: &Value) -> Result<ToolRequest, String> {
    let obj = call
        .as_object()
        .ok_or_else(|| "call must be object".to_string())?;

    for key in obj.keys() {
        if !matches!(key.as_str(), "name" | "arguments" | "errors") {
            return Err(format!("unexpected field '{key}'"));
        }
    }

    if let Some(errors) = obj.get("errors") {
        if !errors.as_f64().is_some_and(|e| e >= 0.0) {
            return Err("errors must be a non-negative number".to_string());
        }
    }

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .and_then(|n| ToolName::from_str(n).ok())
        .ok_or_else(|| "invalid name".to_string())?;

    let args = obj
        .get("arguments")
        .and_then(Value::as_object)
        .ok_or_else(|| "arguments must be object".to_string())?;

    match name {
        ToolName::AstGrepSearch => validate_structural(args)?,
        ToolName::RipgrepSearch => validate_textual(args)?,
    }

    ToolRequest::from_parts(name, Value::Object(args.clone())).map_err(|e| e.to_string())
}

fn validate_structural(args: &Map<String, Value>) -> Result<(), String> {
    reject_unknown(args, STRUCTURAL_FIELDS)?;
    check_pattern(args)?;
    let language_ok = args
        .get("language")
        .and_then(Value::as_str)
        .is_some_and(|l| Language::from_str(l).is_ok());
    if !language_ok {
        return Err("invalid language".to_string());
    }
    check_string_list(args, "paths")
}

fn validate_textual(args: &Map<String, Value>) -> Result<(), String> {
    reject_unknown(args, TEXTUAL_FIELDS)?;
    check_pattern(args)?;
    check_string_list(args, "file_types")?;
    check_string_list(args, "paths")?;
    check_bool(args, "case_sensitive")?;
    check_bool(args, "pcre2")?;
    if let Some(ctx) = args.get("context_lines") {
        if !ctx.is_u64() {
            return Err("context_lines must be integer >= 0".to_string());
        }
    }
    Ok(())
}

fn reject_unknown(args: &Map<String, Value>, allowed: &[&str]) -> Result<(), String> {
    match args.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(format!("unexpected field '{key}'")),
        None => Ok(()),
    }
}

fn check_pattern(args: &Map<String, Value>) -> Result<(), String> {
    match args.get("pattern").and_then(Value::as_str) {
        Some(p) if !p.is_empty() => Ok(()),
        _ => Err("pattern must be non-empty string".to_string()),
    }
}

fn check_string_list(args: &Map<String, Value>, field: &str) -> Result<(), String> {
    let Some(value) = args.get(field) else {
        return Ok(());
    };
    let ok = value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string));
    if ok {
        Ok(())
    } else {
        Err(format!("{field} must be list of strings"))
    }
}

fn check_bool(args: &Map<String, Value>, field: &str) -> Result<(), String> {
    match args.get(field) {
        Some(value) if !value.is_boolean() => Err(format!("{field} must be boolean")),
        _ => Ok(()),
    }
}

/// Result of [`repair_tool_call`]
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// The (possibly) repaired call
    pub call: Value,
    /// True when at least one repair was applied and the result validates
    pub repaired: bool,
    /// Validation reason (if still invalid) followed by one note per repair
    pub notes: Vec<String>,
}

/// Apply common repairs to a tool call
///
/// Maps language aliases for structural calls; for textual calls defaults
/// `case_sensitive`/`pcre2` and turns on `pcre2` when the pattern needs it.
pub fn repair_tool_call(call: &Value) -> RepairOutcome {
    let mut repaired = call.clone();
    let mut notes = Vec::new();

    let name = repaired
        .get("name")
        .and_then(Value::as_str)
        .and_then(|n| ToolName::from_str(n).ok());

    if !repaired.get("arguments").is_some_and(Value::is_object) {
        return RepairOutcome {
            call: repaired,
            repaired: false,
            notes: vec!["arguments not an object".to_string()],
        };
    }

    if let Some(args) = repaired
        .get_mut("arguments")
        .and_then(Value::as_object_mut)
    {
        repair_arguments(name, args, &mut notes);
    }

    let validation = validate_tool_call(&repaired);
    let was_repaired = !notes.is_empty() && validation.is_ok();
    if let Err(reason) = validation {
        notes.insert(0, reason);
    }

    RepairOutcome {
        call: repaired,
        repaired: was_repaired,
        notes,
    }
}

fn repair_arguments(
    name: Option<ToolName>,
    args: &mut Map<String, Value>,
    notes: &mut Vec<String>,
) {
    match name {
        Some(ToolName::AstGrepSearch) => {
            let alias = args
                .get("language")
                .and_then(Value::as_str)
                .filter(|l| Language::from_str(l).is_err())
                .and_then(Language::from_alias);
            if let Some(language) = alias {
                args.insert("language".to_string(), Value::from(language.to_string()));
                notes.push("mapped language alias".to_string());
            }
        }
        Some(ToolName::RipgrepSearch) => {
            if !args.contains_key("case_sensitive") {
                args.insert("case_sensitive".to_string(), Value::Bool(false));
                notes.push("defaulted case_sensitive=false".to_string());
            }
            if !args.contains_key("pcre2") {
                args.insert("pcre2".to_string(), Value::Bool(false));
                notes.push("defaulted pcre2=false".to_string());
            }
            let needs_pcre2 = args
                .get("pattern")
                .and_then(Value::as_str)
                .is_some_and(|p| needs_extended_regex(p).required);
            let pcre2_on = args.get("pcre2").and_then(Value::as_bool).unwrap_or(false);
            if needs_pcre2 && !pcre2_on {
                args.insert("pcre2".to_string(), Value::Bool(true));
                notes.push("auto-enabled pcre2 for lookaround/backref".to_string());
            }
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{StructuralRequest, TextualRequest};
    use serde_json::json;

    #[test]
    fn test_valid_structural_call() {
        let call = json!({
            "name": "ast_grep_search",
            "arguments": {"pattern": "def $F($$$A)", "language": "python", "paths": ["src"]}
        });
        let request = validate_tool_call(&call).unwrap();
        assert_eq!(
            request,
            ToolRequest::Structural(StructuralRequest {
                pattern: "def $F($$$A)".to_string(),
                language: Language::Python,
                paths: Some(vec!["src".to_string()]),
            })
        );
    }

    #[test]
    fn test_valid_textual_call() {
        let call = json!({
            "name": "ripgrep_search",
            "arguments": {
                "pattern": "TODO",
                "file_types": ["js"],
                "case_sensitive": true,
                "pcre2": false,
                "context_lines": 2
            }
        });
        let ToolRequest::Textual(request) = validate_tool_call(&call).unwrap() else {
            panic!("expected textual request");
        };
        assert!(request.case_sensitive);
        assert_eq!(request.context_lines, Some(2));
    }

    #[test]
    fn test_rejections() {
        let cases = [
            (json!([]), "call must be object"),
            (json!({"name": "grep", "arguments": {}}), "invalid name"),
            (
                json!({"name": "ripgrep_search", "arguments": "x"}),
                "arguments must be object",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": ""}}),
                "pattern must be non-empty string",
            ),
            (
                json!({"name": "ast_grep_search", "arguments": {"pattern": "x", "language": "cobol"}}),
                "invalid language",
            ),
            (
                json!({"name": "ast_grep_search", "arguments": {"pattern": "x", "language": "go", "paths": [1]}}),
                "paths must be list of strings",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x", "file_types": "js"}}),
                "file_types must be list of strings",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x", "pcre2": "yes"}}),
                "pcre2 must be boolean",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x", "case_sensitive": 1}}),
                "case_sensitive must be boolean",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x", "context_lines": -1}}),
                "context_lines must be integer >= 0",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x", "language": "go"}}),
                "unexpected field 'language'",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x"}, "extra": 1}),
                "unexpected field 'extra'",
            ),
            (
                json!({"name": "ripgrep_search", "arguments": {"pattern": "x"}, "errors": -1}),
                "errors must be a non-negative number",
            ),
        ];
        for (call, reason) in cases {
            assert_eq!(validate_tool_call(&call).unwrap_err(), reason, "{call}");
        }
    }

    #[test]
    fn test_embedded_errors_allowed() {
        let call = json!({
            "name": "ast_grep_search",
            "arguments": {"pattern": "x", "language": "python"},
            "errors": 3.0
        });
        assert!(validate_tool_call(&call).is_ok());
    }

    #[test]
    fn test_tool_call_for_round_trips() {
        let request = ToolRequest::Textual(TextualRequest {
            pcre2: true,
            ..TextualRequest::new(r"(?<=password=)\S+")
        });
        let call = tool_call_for(&request).unwrap();
        assert_eq!(call["name"], "ripgrep_search");
        assert_eq!(validate_tool_call(&call).unwrap(), request);
    }

    #[test]
    fn test_repair_language_alias() {
        let call = json!({"name": "ast_grep_search", "arguments": {"pattern": "x", "language": "TS"}});
        let outcome = repair_tool_call(&call);
        assert!(outcome.repaired);
        assert_eq!(outcome.call["arguments"]["language"], "typescript");
        assert_eq!(outcome.notes, vec!["mapped language alias"]);
    }

    #[test]
    fn test_repair_enables_pcre2() {
        let call = json!({"name": "ripgrep_search", "arguments": {"pattern": r"\b(\w+)\s+\1\b"}});
        let outcome = repair_tool_call(&call);
        assert!(outcome.repaired);
        assert_eq!(outcome.call["arguments"]["pcre2"], true);
        assert_eq!(outcome.call["arguments"]["case_sensitive"], false);
        assert!(outcome
            .notes
            .contains(&"auto-enabled pcre2 for lookaround/backref".to_string()));
    }

    #[test]
    fn test_repair_leaves_complete_call_alone() {
        let call = json!({
            "name": "ripgrep_search",
            "arguments": {"pattern": "x", "case_sensitive": true, "pcre2": false}
        });
        let outcome = repair_tool_call(&call);
        assert!(!outcome.repaired);
        assert!(outcome.notes.is_empty());
        assert_eq!(outcome.call, call);
    }

    #[test]
    fn test_repair_non_object_arguments() {
        let call = json!({"name": "ripgrep_search", "arguments": null});
        let outcome = repair_tool_call(&call);
        assert!(!outcome.repaired);
        assert_eq!(outcome.notes, vec!["arguments not an object"]);
    }

    #[test]
    fn test_repair_reports_remaining_invalidity() {
        let call = json!({"name": "ripgrep_search", "arguments": {"pattern": ""}});
        let outcome = repair_tool_call(&call);
        assert!(!outcome.repaired);
        assert_eq!(outcome.notes[0], "pattern must be non-empty string");
    }
}
