//! Named fixture corpora and their materialization on disk
//!
//! Each corpus is a small set of files used as a deterministic target for the
//! search tools. Corpora are written under `<base>/<corpus name>/`.

use codesearch_gym_core::{Error, Result, ResultExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A named set of files, keyed by corpus-relative path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureCorpus {
    pub name: &'static str,
    pub description: &'static str,
    pub files: &'static [(&'static str, &'static str)],
}

static FIXTURES: [FixtureCorpus; 7] = [
    FixtureCorpus {
        name: "react_hooks",
        description: "React project with useEffect and TODO in comments",
        files: &[
            (
                "src/App.js",
                r#"import React, { useEffect, useState } from 'react';
function App() {
  const [n, setN] = useState(0);
  useEffect(() => { console.log('mount'); }, []);
  return <div>{n}</div>;
}
export default App;"#,
            ),
            (
                "src/utils.js",
                "// Utilities\n// TODO: useEffect cleanup is needed\nexport function inc(x) { return x + 1; }",
            ),
            (
                "src/legacy.js",
                "// Old-style class component\nclass Legacy { method() { return 1; } }\nexport { Legacy };",
            ),
        ],
    },
    FixtureCorpus {
        name: "typescript_async",
        description: "TypeScript code with async function and DB.query",
        files: &[
            (
                "src/api.ts",
                r#"export async function fetchUser(id: string) {
  const rows = await DB.query(`select * from users where id = ${id}`);
  return rows[0];
}"#,
            ),
            (
                "src/sync.ts",
                "// this file mentions async but is not actually async\nexport function add(a: number, b: number) { return a + b; }",
            ),
            (
                "types/index.d.ts",
                "declare const DB: { query(sql: string): Promise<any[]> };\nexport { DB };",
            ),
        ],
    },
    FixtureCorpus {
        name: "python_unicode",
        description: "Python with unicode identifier café and ascii cafe",
        files: &[
            (
                "app.py",
                "# -*- coding: utf-8 -*-\ndef café():\n    return 1\n\ndef cafe():\n    return 2",
            ),
            (
                "utils.py",
                "def deco(f):\n    def w(*a, **k):\n        return f(*a, **k)\n    return w",
            ),
            (
                "test.py",
                "def test_something():\n    s = \"TODO: nothing\"\n    assert True",
            ),
        ],
    },
    FixtureCorpus {
        name: "go_printf",
        description: "Go code using fmt.Printf",
        files: &[
            (
                "main.go",
                "package main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Printf(\"hello %d\", 1)\n}",
            ),
            ("logger.go", "package main\n\nfunc Logf(s string) {}"),
            ("utils.go", "package main\n\nfunc Add(a, b int) int { return a + b }"),
        ],
    },
    FixtureCorpus {
        name: "c_printf",
        description: "C code using printf",
        files: &[
            (
                "main.c",
                "#include <stdio.h>\n\nint main() {\n    printf(\"hello %d\", 1);\n    return 0;\n}",
            ),
            ("utils.c", "int add(int a, int b) { return a + b; }"),
            ("logger.h", "void logf(const char* s);"),
        ],
    },
    FixtureCorpus {
        name: "rust_macros",
        description: "Rust project using println! macro",
        files: &[
            (
                "Cargo.toml",
                "[package]\nname = \"sample\"\nversion = \"0.1.0\"\nedition = \"2021\"",
            ),
            ("src/main.rs", "fn main() {\n    println!(\"hello {}\", 1);\n}"),
            (
                "src/lib.rs",
                "#[allow(dead_code)]\npub fn add(a: i32, b: i32) -> i32 { a + b }",
            ),
        ],
    },
    FixtureCorpus {
        name: "mixed_comments",
        description: "Mixed files with passwords and duplicate words in text",
        files: &[
            ("config.txt", "password=secret123\n"),
            ("text.txt", "This is the the sample.\n"),
            (
                "comments.js",
                "// async should not be matched here\nfunction real() { return 1 }",
            ),
        ],
    },
];

/// All known fixture corpora
pub fn fixtures() -> &'static [FixtureCorpus] {
    &FIXTURES
}

/// Look up a corpus by name
pub fn find_corpus(name: &str) -> Option<&'static FixtureCorpus> {
    FIXTURES.iter().find(|c| c.name == name)
}

/// Absolute directory of a corpus under `base`
pub fn corpus_path(base: &Path, name: &str) -> Result<PathBuf> {
    let base = std::path::absolute(base).context("Failed to resolve fixtures directory")?;
    Ok(base.join(name))
}

/// Write a corpus's files under `<base>/<name>/`, overwriting existing files
pub fn materialize_corpus(corpus: &FixtureCorpus, base: &Path) -> Result<PathBuf> {
    let root = corpus_path(base, corpus.name)?;
    for (rel, content) in corpus.files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::fixture(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(&path, content)
            .map_err(|e| Error::fixture(format!("Failed to write {}: {e}", path.display())))?;
    }
    debug!("Materialized corpus {} at {}", corpus.name, root.display());
    Ok(root)
}

/// Materialize every known corpus, returning each corpus root by name
pub fn materialize_all(base: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut roots = BTreeMap::new();
    for corpus in fixtures() {
        roots.insert(corpus.name.to_string(), materialize_corpus(corpus, base)?);
    }
    info!("Materialized {} fixture corpora under {}", roots.len(), base.display());
    Ok(roots)
}

/// Remove the fixtures directory and everything in it
pub fn cleanup_fixtures(base: &Path) -> Result<()> {
    let root = std::path::absolute(base).context("Failed to resolve fixtures directory")?;
    if root.exists() {
        std::fs::remove_dir_all(&root)
            .map_err(|e| Error::fixture(format!("Failed to remove {}: {e}", root.display())))?;
        info!("Removed fixtures under {}", root.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_corpus_names_are_unique() {
        let mut names: Vec<_> = fixtures().iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 7);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_find_corpus() {
        assert_eq!(find_corpus("c_printf").map(|c| c.files.len()), Some(3));
        assert!(find_corpus("nope").is_none());
    }

    #[test]
    fn test_materialize_corpus_writes_files() {
        let dir = TempDir::new().unwrap();
        let corpus = find_corpus("react_hooks").unwrap();
        let root = materialize_corpus(corpus, dir.path()).unwrap();

        assert!(root.is_absolute());
        assert_eq!(root, corpus_path(dir.path(), "react_hooks").unwrap());
        let app = std::fs::read_to_string(root.join("src/App.js")).unwrap();
        assert_eq!(
            app.lines().nth(3),
            Some("  useEffect(() => { console.log('mount'); }, []);")
        );
        assert!(!app.ends_with('\n'));
    }

    #[test]
    fn test_trailing_newlines_preserved() {
        let dir = TempDir::new().unwrap();
        let root = materialize_corpus(find_corpus("mixed_comments").unwrap(), dir.path()).unwrap();
        let config = std::fs::read_to_string(root.join("config.txt")).unwrap();
        assert_eq!(config, "password=secret123\n");
    }

    #[test]
    fn test_materialize_all_and_cleanup() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("fixtures");
        let roots = materialize_all(&base).unwrap();

        assert_eq!(roots.len(), 7);
        assert!(roots["rust_macros"].join("src/main.rs").exists());
        assert!(roots["typescript_async"].join("types/index.d.ts").exists());

        cleanup_fixtures(&base).unwrap();
        assert!(!base.exists());
        // Cleaning a missing directory is a no-op
        cleanup_fixtures(&base).unwrap();
    }
}
