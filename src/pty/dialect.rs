//! Shell dialect handling for pty sessions.
//!
//! Environment injection happens by typing assignment statements into
//! the session, so the syntax must match the shell being hosted. The
//! dialect is picked from the executable's base name; anything
//! unrecognized is treated as POSIX.

use std::path::Path;

/// Syntax family of a hosted shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellDialect {
    /// sh, bash, zsh, dash, ksh and friends.
    Posix,
    /// fish, which has its own assignment builtin.
    Fish,
    /// PowerShell (both `powershell` and `pwsh`).
    PowerShell,
    /// cmd.exe.
    Cmd,
}

impl ShellDialect {
    /// Picks the dialect from a shell executable path.
    #[must_use]
    pub fn from_shell_path(shell_path: &Path) -> Self {
        let name = shell_path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match name.as_str() {
            "fish" => Self::Fish,
            "pwsh" | "powershell" => Self::PowerShell,
            "cmd" => Self::Cmd,
            _ => Self::Posix,
        }
    }

    /// Formats one environment assignment in this dialect.
    #[must_use]
    pub fn format_assignment(self, name: &str, value: &str) -> String {
        match self {
            Self::Posix => format!("export {name}=\"{}\"", escape_double_quoted(value)),
            Self::Fish => format!("set -gx {name} \"{}\"", escape_double_quoted(value)),
            Self::PowerShell => {
                format!("$env:{name} = \"{}\"", escape_powershell_quoted(value))
            }
            Self::Cmd => format!("set \"{name}={value}\""),
        }
    }

    /// The command that clears the screen in this dialect.
    #[must_use]
    pub fn clear_command(self) -> &'static str {
        match self {
            Self::Posix | Self::Fish => "clear",
            Self::PowerShell => "Clear-Host",
            Self::Cmd => "cls",
        }
    }

    /// Line ending the shell expects on typed input.
    #[must_use]
    pub fn line_ending(self) -> &'static str {
        match self {
            Self::Posix | Self::Fish => "\n",
            Self::PowerShell | Self::Cmd => "\r\n",
        }
    }
}

/// Escapes a value for a double-quoted POSIX or fish string.
fn escape_double_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

/// Escapes a value for a double-quoted PowerShell string.
fn escape_powershell_quoted(value: &str) -> String {
    value.replace('`', "``").replace('"', "`\"")
}
