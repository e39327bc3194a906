//! Use command: pin a runtime for one command or an interactive shell.
//!
//! With a trailing command this behaves like `run` with an explicit
//! constraint. Without one it opens the user's shell in a pty with the
//! selected runtime prepended to `PATH`; entries shadowed by other node
//! installs are stripped so the pinned runtime always wins.

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::env;
use crate::pty::session;
use crate::shell::discover_shell;

/// Arguments for the use command.
#[derive(Args, Debug)]
pub struct UseArgs {
    /// Version constraint, e.g. `18`, `^18.0.0`, `18.x`.
    ///
    /// Falls back to the project constraint, then to any version.
    pub constraint: Option<String>,

    /// Optional command to run instead of an interactive shell.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Executes the use command.
///
/// # Errors
///
/// Propagates resolution, acquisition, shell discovery, and session
/// failures. The session's non-zero exit carries the shell's code.
pub async fn execute(args: &UseArgs, config: &Config) -> Result<()> {
    let constraint = super::effective_constraint(args.constraint.as_deref())?;

    if !args.command.is_empty() {
        return super::run::run_with_constraint(&constraint, &args.command, config).await;
    }

    let shell = discover_shell()?;
    let current_path = std::env::var("PATH").unwrap_or_default();

    let (overlay, banner_version) = match super::prepare_runtime(&constraint, config).await? {
        // The active runtime already satisfies; host a plain session.
        None => (env::EnvOverlay::new(), None),
        Some(runtime_dir) => {
            let overlay = env::runtime_overlay(&runtime_dir, &current_path, true);
            let version = runtime_dir
                .file_name()
                .and_then(|n| n.to_str())
                .map(ToString::to_string);
            (overlay, version)
        }
    };

    let welcome = match banner_version {
        Some(name) => format!("nodeup: shell session with {name} (exit to leave)"),
        None => "nodeup: shell session with the active node (exit to leave)".to_string(),
    };

    session::start(&shell, &overlay, &welcome).await
}
