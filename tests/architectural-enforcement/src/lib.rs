//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleeping in production code (wait on I/O or timers instead)
//! - No blocking HTTP or socket I/O
//! - The core crate stays free of terminal UI dependencies
//!
//! The helpers here locate workspace sources and strip test code so each
//! check only sees what ships.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories checked by every rule
pub const PRODUCTION_DIRS: &[&str] = &["companion/core/src", "tui/src"];

/// Workspace root (two levels above this package)
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../.."))
}

/// A production line: file, 1-based line number, text
pub struct SourceLine {
    pub path: PathBuf,
    pub number: usize,
    pub text: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.text.trim())
    }
}

/// Every non-test, non-comment line of Rust code under `dir` (relative to the workspace root)
#[must_use]
pub fn production_lines(dir: &str) -> Vec<SourceLine> {
    let root = workspace_root().join(dir);
    let mut lines = Vec::new();
    for entry in walkdir::WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };
        lines.extend(strip_tests(&content).into_iter().map(|(number, text)| SourceLine {
            path: entry.path().to_path_buf(),
            number,
            text,
        }));
    }
    lines
}

/// Production lines of a file: `#[cfg(test)]` items and comments dropped
///
/// Each `#[cfg(test)]` item is skipped up to its closing brace (or `;`).
#[must_use]
pub fn strip_tests(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut in_test_item = false;
    let mut depth = 0usize;
    let mut opened = false;

    for (idx, line) in content.lines().enumerate() {
        let code = code_part(line);

        if !in_test_item && line.trim() == "#[cfg(test)]" {
            in_test_item = true;
            depth = 0;
            opened = false;
            continue;
        }

        if in_test_item {
            for c in code.chars() {
                match c {
                    '{' => {
                        depth += 1;
                        opened = true;
                    }
                    '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            let ends_without_body = !opened && code.trim_end().ends_with(';');
            if (opened && depth == 0) || ends_without_body {
                in_test_item = false;
            }
            continue;
        }

        if !code.trim().is_empty() {
            lines.push((idx + 1, code.to_string()));
        }
    }
    lines
}

/// A line up to its `//` comment, if any
///
/// A `//` inside a string literal (`"https://..."`) does not start a comment.
#[must_use]
pub fn code_part(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            // '"' is a char literal, not the start of a string
            b'\'' if !in_string && bytes.get(i + 1) == Some(&b'"') && bytes.get(i + 2) == Some(&b'\'') => {
                i += 2;
            }
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
        i += 1;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tests_drops_test_module_and_comments() {
        let source = "fn main() {}\n// std::thread::sleep\n#[cfg(test)]\nmod tests {\n    fn x() {}\n}\n";
        let lines = strip_tests(source);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, 1);
    }

    #[test]
    fn test_url_literal_is_not_a_comment() {
        let source = r#"const URL: &str = "https://example.test"; std::thread::sleep(d);"#;
        let lines = strip_tests(source);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].1.contains("std::thread::sleep"));

        assert_eq!(code_part("let c = '\"'; // note"), "let c = '\"'; ");
        assert_eq!(code_part(r#"let s = "a \" // b"; x"#), r#"let s = "a \" // b"; x"#);
    }

    #[test]
    fn test_code_after_test_module_is_scanned() {
        let source = "#[cfg(test)]\nmod tests {\n    fn x() { sleep(); }\n}\n\nfn later() { std::thread::sleep(d); }\n#[cfg(test)]\nmod more;\nfn last() {}\n";
        let lines = strip_tests(source);
        let numbers: Vec<usize> = lines.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![6, 9]);
        assert!(lines[0].1.contains("std::thread::sleep"));
    }

    #[test]
    fn test_workspace_root_contains_members() {
        assert!(workspace_root().join("companion/core/Cargo.toml").exists());
        assert!(workspace_root().join("tui/Cargo.toml").exists());
    }
}
