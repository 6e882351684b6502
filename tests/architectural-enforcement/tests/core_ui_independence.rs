//! Integration Test: Headless Core
//!
//! **Policy**: `companion-core` holds all domain state and backend plumbing and
//! never depends on a terminal. Any surface (the TUI, tests, a future GUI)
//! drives it through `Studio`.

use std::fs;

use architectural_enforcement::{production_lines, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("companion/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for krate in UI_CRATES {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(krate)),
            "companion/core/Cargo.toml must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_reference_ui_crates() {
    let violations: Vec<String> = production_lines("companion/core/src")
        .into_iter()
        .filter(|line| UI_CRATES.iter().any(|k| line.text.contains(&format!("{k}::"))))
        .map(|line| line.to_string())
        .collect();

    assert!(
        violations.is_empty(),
        "core must stay headless:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_scanner_sees_core_sources() {
    // Guards against the checks above passing on an empty directory
    assert!(!production_lines("companion/core/src").is_empty());
    assert!(!production_lines("tui/src").is_empty());
}
