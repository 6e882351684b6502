//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT sleep. Backend completions arrive on a
//! channel and the UI waits on it together with terminal events and a frame
//! interval (`tokio::time::interval`).

use architectural_enforcement::{production_lines, PRODUCTION_DIRS};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations: Vec<String> = PRODUCTION_DIRS
        .iter()
        .flat_map(|dir| production_lines(dir))
        .filter(|line| {
            line.text.contains("thread::sleep") || line.text.contains("time::sleep(")
        })
        .map(|line| line.to_string())
        .collect();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }
        eprintln!("\n✅ Use instead:");
        eprintln!("  - Studio::wait_for_completion() for backend results");
        eprintln!("  - tokio::time::interval() for animation frames");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}
