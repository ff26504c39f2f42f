//! Adversarial seed blueprints
//!
//! Each seed stresses one aspect of tool choice: structure vs text, type
//! filters, unicode identifiers, comment traps and PCRE2-only regex features.

use codesearch_gym_core::{
    Blueprint, Finding, Language, StructuralRequest, TextualRequest, ToolRequest,
};

fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

fn seed(
    id: &str,
    intent: &str,
    request: impl Into<ToolRequest>,
    corpus: &str,
    ground_truth: Vec<Finding>,
    description: &str,
) -> Blueprint {
    Blueprint {
        id: id.to_string(),
        intent: intent.to_string(),
        request: request.into(),
        corpus: corpus.to_string(),
        ground_truth,
        description: Some(description.to_string()),
    }
}

/// The built-in adversarial seed set
pub fn adversarial_seeds() -> Vec<Blueprint> {
    vec![
        seed(
            "seed_001_useeffect_ast",
            "Find React useEffect hook calls in JavaScript (structural match, not TODO comments)",
            StructuralRequest {
                paths: strings(&["src"]),
                ..StructuralRequest::new("useEffect($$ARGS)", Language::JavaScript)
            },
            "react_hooks",
            vec![Finding::new("src/App.js", 4)],
            "Tests AST pattern matching vs naive text search that would match comments",
        ),
        seed(
            "seed_002_todo_text",
            "Find all TODO comments across JavaScript files",
            TextualRequest {
                file_types: strings(&["js"]),
                case_sensitive: false,
                ..TextualRequest::new("TODO:")
            },
            "react_hooks",
            vec![Finding::new("src/utils.js", 2)],
            "Tests text search for comments where AST patterns cannot help",
        ),
        seed(
            "seed_003_pcre2_lookbehind",
            "Extract password values using lookbehind (requires PCRE2)",
            TextualRequest {
                pcre2: true,
                ..TextualRequest::new(r"(?<=password=)\S+")
            },
            "mixed_comments",
            vec![Finding::new("config.txt", 1)],
            "Tests PCRE2 requirement detection: lookbehind needs the -P flag",
        ),
        seed(
            "seed_004_type_filter_c",
            "Find printf calls in C files only, excluding Go's fmt.Printf",
            TextualRequest {
                file_types: strings(&["c"]),
                ..TextualRequest::new(r"printf\(")
            },
            "c_printf",
            vec![Finding::new("main.c", 4)],
            "Tests type filter to distinguish between languages with similar syntax",
        ),
        seed(
            "seed_005_unicode_identifier",
            "Find Python function named café (unicode identifier)",
            StructuralRequest::new("def café($$ARGS): $$BODY", Language::Python),
            "python_unicode",
            vec![Finding::new("app.py", 2)],
            "Tests unicode identifier handling: AST sees the native identifier, regex would be messy",
        ),
        seed(
            "seed_006_comment_trap",
            "Find actual async function definitions, not mentions in comments",
            StructuralRequest {
                paths: strings(&["src"]),
                ..StructuralRequest::new("async function $NAME($$ARGS) { $$BODY }", Language::TypeScript)
            },
            "typescript_async",
            vec![Finding::new("src/api.ts", 1)],
            "Tests avoiding false positives from comments/strings that naive regex would match",
        ),
        seed(
            "seed_007_multiturn_reduction",
            "Find files with DB.query mentions, then structurally verify async function calls",
            TextualRequest {
                file_types: strings(&["ts"]),
                paths: strings(&["src"]),
                ..TextualRequest::new(r"DB\.query")
            },
            "typescript_async",
            vec![Finding::new("src/api.ts", 2)],
            "Tests broad text search that would be followed by structural refinement (multi-turn pattern)",
        ),
        seed(
            "seed_008_pcre2_backref",
            "Find duplicate consecutive words using backreference",
            TextualRequest {
                pcre2: true,
                ..TextualRequest::new(r"\b(\w+)\s+\1\b")
            },
            "mixed_comments",
            vec![Finding::new("text.txt", 1)],
            r"Tests backreference requirement: pattern uses \1 which requires PCRE2",
        ),
    ]
}

/// Find a seed by id
pub fn seed_by_id(id: &str) -> Option<Blueprint> {
    adversarial_seeds().into_iter().find(|s| s.id == id)
}
