//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Production code in the core and TUI crates MUST NOT block the
//! async runtime.
//! **Required**: Use `tokio::fs`, `tokio::net`, `tokio::time::sleep` and the
//! async `reqwest` client inside `async fn`.

use architectural_enforcement::{scan_dir, workspace_root, Violation};

fn find_blocking_io_violations() -> Vec<Violation> {
    let root = workspace_root();
    let mut violations = scan_dir(&root.join("core/src"));
    violations.extend(scan_dir(&root.join("tui/src")));
    violations
}

/// Test that production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_production_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O calls found in async production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }

        eprintln!("\nREQUIRED async I/O:");
        eprintln!("  - tokio::fs::read_to_string().await, tokio::fs::write().await");
        eprintln!("  - tokio::net::TcpStream::connect().await");
        eprintln!("  - tokio::time::sleep().await");
        eprintln!("  - reqwest::Client (async)");
        eprintln!("\nACCEPTABLE blocking I/O:");
        eprintln!("  - Non-async functions (before the tokio runtime starts)");
        eprintln!("  - Test code");

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.",
            violations.len()
        );
    }
}

/// The scan must actually see the sources it guards
#[test]
fn test_scanned_directories_exist() {
    let root = workspace_root();
    assert!(root.join("core/src/lib.rs").exists());
    assert!(root.join("tui/src/main.rs").exists());
}
