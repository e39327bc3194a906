//! Login shell discovery for interactive sessions.
//!
//! On Unix the `SHELL` environment variable names the user's shell;
//! when it is unset or broken, common shells are looked up on `PATH`.
//! Windows prefers PowerShell and falls back to `COMSPEC`.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Finds the shell to host an interactive session.
///
/// # Errors
///
/// Returns an error when no shell can be located at all.
pub fn discover_shell() -> Result<PathBuf> {
    if cfg!(windows) {
        discover_windows_shell()
    } else {
        discover_unix_shell()
    }
}

fn discover_unix_shell() -> Result<PathBuf> {
    if let Ok(shell) = std::env::var("SHELL") {
        if !shell.is_empty() {
            let path = PathBuf::from(&shell);
            if path.is_file() {
                return Ok(path);
            }
            log::debug!("SHELL points at a missing file: {shell}");
        }
    }

    for candidate in ["bash", "zsh", "fish", "sh"] {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }

    anyhow::bail!("no usable shell found; set the SHELL environment variable")
}

fn discover_windows_shell() -> Result<PathBuf> {
    for candidate in ["pwsh", "powershell"] {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }

    let comspec = std::env::var("COMSPEC").context("neither PowerShell nor COMSPEC available")?;
    Ok(PathBuf::from(comspec))
}
