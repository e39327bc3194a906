//! Environment composition for child processes and pty sessions.
//!
//! The parent process environment is never mutated. Every change is
//! carried in an [`EnvOverlay`], applied either at `Command::spawn` or
//! written into a pty session as shell assignments.

use std::path::Path;

/// Platform `PATH` separator.
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Ordered environment changes for one child process or session.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    vars: Vec<(String, String)>,
}

impl EnvOverlay {
    /// An empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variable, keeping insertion order.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.vars.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.vars.push((name, value));
        }
    }

    /// The variables in insertion order.
    #[must_use]
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Applies the overlay to a command being built.
    pub fn apply(&self, command: &mut std::process::Command) {
        for (name, value) in &self.vars {
            command.env(name, value);
        }
    }
}

/// Builds the overlay that activates a runtime for a child process.
///
/// Prepends the runtime's bin directory to `PATH` and points
/// `NPM_CONFIG_PREFIX` at the runtime directory so global npm installs
/// land inside the managed tree.
#[must_use]
pub fn runtime_overlay(
    runtime_dir: &Path,
    current_path: &str,
    strip_shadowing: bool,
) -> EnvOverlay {
    let bin_dir = crate::config::runtime_bin_dir(runtime_dir);
    let path = if strip_shadowing {
        compose_path_stripped(&bin_dir.to_string_lossy(), current_path)
    } else {
        compose_path(&bin_dir.to_string_lossy(), current_path)
    };

    let mut overlay = EnvOverlay::new();
    overlay.set("PATH", path);
    overlay.set(
        "NPM_CONFIG_PREFIX",
        runtime_dir.to_string_lossy().into_owned(),
    );
    overlay
}

/// Prepends a directory to a `PATH` value.
#[must_use]
pub fn compose_path(bin_dir: &str, current: &str) -> String {
    if current.is_empty() {
        return bin_dir.to_string();
    }
    format!("{bin_dir}{PATH_SEPARATOR}{current}")
}

/// Prepends a directory to a `PATH` value, dropping entries that carry
/// a `node` executable.
///
/// Used for interactive sessions, where a previously activated runtime
/// earlier on `PATH` would silently shadow the selected one.
#[must_use]
pub fn compose_path_stripped(bin_dir: &str, current: &str) -> String {
    let kept: Vec<&str> = current
        .split(PATH_SEPARATOR)
        .filter(|entry| !entry.is_empty() && !contains_node_executable(entry))
        .collect();
    if kept.is_empty() {
        return bin_dir.to_string();
    }
    format!(
        "{bin_dir}{PATH_SEPARATOR}{}",
        kept.join(&PATH_SEPARATOR.to_string())
    )
}

/// Whether a directory holds a `node` executable.
fn contains_node_executable(dir: &str) -> bool {
    let exe = if cfg!(windows) { "node.exe" } else { "node" };
    Path::new(dir).join(exe).is_file()
}
