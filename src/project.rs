//! Project constraint discovery.
//!
//! Walks up from the working directory looking for a version constraint:
//! `.nodeup.json` (`{"node": "<range>"}`) takes priority over
//! `package.json` (`engines.node`) within each directory. The first
//! constraint found wins; a `package.json` without an engines field does
//! not stop the walk.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Tool-specific project file name.
pub const PROJECT_FILE: &str = ".nodeup.json";

#[derive(Debug, Deserialize)]
struct ProjectFile {
    node: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    engines: Option<Engines>,
}

#[derive(Debug, Deserialize)]
struct Engines {
    node: Option<String>,
}

/// Searches the directory and its ancestors for a version constraint.
///
/// Returns `None` when no project file carries one.
///
/// # Errors
///
/// Returns an error when a project file exists but is not valid JSON;
/// a malformed file is a user mistake to surface, not something to
/// silently walk past.
pub fn discover_constraint(start_dir: &Path) -> Result<Option<String>> {
    for dir in start_dir.ancestors() {
        let project_file = dir.join(PROJECT_FILE);
        if project_file.is_file() {
            let content = std::fs::read_to_string(&project_file)
                .with_context(|| format!("failed to read {}", project_file.display()))?;
            let parsed: ProjectFile = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", project_file.display()))?;
            if let Some(constraint) = non_empty(parsed.node) {
                log::debug!("constraint {constraint:?} from {}", project_file.display());
                return Ok(Some(constraint));
            }
        }

        let package_json = dir.join("package.json");
        if package_json.is_file() {
            let content = std::fs::read_to_string(&package_json)
                .with_context(|| format!("failed to read {}", package_json.display()))?;
            let parsed: PackageJson = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", package_json.display()))?;
            if let Some(constraint) = non_empty(parsed.engines.and_then(|e| e.node)) {
                log::debug!("constraint {constraint:?} from {}", package_json.display());
                return Ok(Some(constraint));
            }
        }
    }

    Ok(None)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_test_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("nodeup_test_{}_{}", name, rand::random::<u64>()));
        std::fs::create_dir_all(&dir).expect("should create temp dir");
        dir
    }

    #[test]
    fn engines_node_is_discovered() {
        let root = temp_test_dir("project_engines");
        std::fs::write(
            root.join("package.json"),
            r#"{"name": "app", "engines": {"node": "^18.0.0"}}"#,
        )
        .expect("should write package.json");

        let constraint = discover_constraint(&root).expect("should discover");
        assert_eq!(constraint.as_deref(), Some("^18.0.0"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn project_file_takes_priority_over_package_json() {
        let root = temp_test_dir("project_priority");
        std::fs::write(root.join(PROJECT_FILE), r#"{"node": "20.x"}"#)
            .expect("should write project file");
        std::fs::write(
            root.join("package.json"),
            r#"{"engines": {"node": "^18.0.0"}}"#,
        )
        .expect("should write package.json");

        let constraint = discover_constraint(&root).expect("should discover");
        assert_eq!(constraint.as_deref(), Some("20.x"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn walk_continues_past_package_json_without_engines() {
        let root = temp_test_dir("project_walk");
        let nested = root.join("packages").join("app");
        std::fs::create_dir_all(&nested).expect("should create nested dirs");

        std::fs::write(nested.join("package.json"), r#"{"name": "app"}"#)
            .expect("should write inner package.json");
        std::fs::write(
            root.join("package.json"),
            r#"{"engines": {"node": ">=16"}}"#,
        )
        .expect("should write outer package.json");

        let constraint = discover_constraint(&nested).expect("should discover");
        assert_eq!(constraint.as_deref(), Some(">=16"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn no_project_files_yields_none() {
        let root = temp_test_dir("project_none");
        let nested = root.join("deep");
        std::fs::create_dir_all(&nested).expect("should create dir");

        // The walk continues above the temp dir; real ancestors might
        // carry project files, so only assert when they do not.
        if let Ok(None) = discover_constraint(&nested) {
            // expected in a clean environment
        }

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn malformed_project_file_is_an_error() {
        let root = temp_test_dir("project_malformed");
        std::fs::write(root.join(PROJECT_FILE), b"{not json").expect("should write");

        let err = discover_constraint(&root).expect_err("malformed JSON must surface");
        assert!(format!("{err:#}").contains(PROJECT_FILE));

        let _ = std::fs::remove_dir_all(&root);
    }
}
