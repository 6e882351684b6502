//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: HTTP and socket I/O in production code MUST be async.
//! **Required**: `reqwest::Client` and `tokio::net`, never `reqwest::blocking` or `std::net`.
//!
//! Reading the config file before the runtime does any work is acceptable.

use architectural_enforcement::{production_lines, PRODUCTION_DIRS};

/// Test that production code does not use blocking network I/O
#[test]
fn test_no_blocking_io_in_production_code() {
    let mut violations = Vec::new();

    for line in PRODUCTION_DIRS.iter().flat_map(|dir| production_lines(dir)) {
        if line.text.contains("reqwest::blocking") {
            violations.push(format!("{line} (blocking HTTP client)"));
        }
        if line.text.contains("std::net::") || line.text.contains("use std::net") {
            violations.push(format!("{line} (blocking network I/O)"));
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking I/O calls found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }
        panic!(
            "\nFound {} blocking I/O violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}
