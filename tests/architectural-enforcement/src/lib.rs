//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No blocking file or network I/O inside `async fn` bodies
//! - No blocking HTTP client
//! - No thread sleeps on the async runtime
//!
//! Blocking calls are fine in synchronous code that runs before the runtime
//! starts (config loading, log file setup) and in test modules.
//!
//! The scanner is line-based: it tracks brace depth to know when it is
//! inside an `async fn` body and stops at the first `#[cfg(test)]`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Forbidden call prefixes and what they are
pub const FORBIDDEN_IN_ASYNC: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    ("std::thread::sleep", "Blocking sleep"),
];

/// One offending line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Source file
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Which rule fired
    pub kind: &'static str,
    /// The trimmed source line
    pub text: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.kind,
            self.text
        )
    }
}

/// Workspace root, two levels above this crate
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Scan every `.rs` file under `dir`
#[must_use]
pub fn scan_dir(dir: &Path) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !dir.exists() {
        return violations;
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        if let Ok(source) = fs::read_to_string(path) {
            violations.extend(scan_source(path, &source));
        }
    }

    violations
}

/// Scan one file's contents
#[must_use]
pub fn scan_source(path: &Path, source: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut depth: usize = 0;
    let mut pending_async = false;
    // Depth outside the async fn body currently being scanned
    let mut async_floor: Option<usize> = None;

    for (idx, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }

        let code = line.split("//").next().unwrap_or("");

        if code.contains("async fn ") {
            pending_async = true;
        }

        if async_floor.is_some() {
            for (pattern, kind) in FORBIDDEN_IN_ASYNC {
                if code.contains(pattern) {
                    violations.push(Violation {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        kind,
                        text: trimmed.to_string(),
                    });
                }
            }
        }

        for c in code.chars() {
            match c {
                '{' => {
                    if pending_async && async_floor.is_none() {
                        async_floor = Some(depth);
                        pending_async = false;
                    }
                    depth += 1;
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    if async_floor == Some(depth) {
                        async_floor = None;
                    }
                }
                // Trait method declarations end without a body
                ';' if pending_async && async_floor.is_none() => pending_async = false,
                _ => {}
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<usize> {
        scan_source(Path::new("mem.rs"), source)
            .into_iter()
            .map(|v| v.line)
            .collect()
    }

    #[test]
    fn test_sync_fn_may_block() {
        let source = "fn load() {\n    let s = std::fs::read_to_string(\"x\");\n}\n";
        assert!(scan(source).is_empty());
    }

    #[test]
    fn test_async_fn_may_not_block() {
        let source = "\
async fn load() {
    if true {
        let s = std::fs::read_to_string(\"x\");
    }
    std::thread::sleep(d);
}
fn after() {
    std::fs::remove_file(\"x\");
}
";
        assert_eq!(scan(source), vec![3, 5]);
    }

    #[test]
    fn test_trait_declaration_does_not_open_scope() {
        let source = "\
trait Store {
    async fn get(&self) -> String;
}
fn sync() {
    std::fs::write(\"x\", \"y\");
}
";
        assert!(scan(source).is_empty());
    }

    #[test]
    fn test_stops_at_test_module() {
        let source = "\
#[cfg(test)]
mod tests {
    async fn helper() { std::fs::read(\"x\"); }
}
";
        assert!(scan(source).is_empty());
    }
}
