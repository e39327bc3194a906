#![warn(clippy::pedantic)]

//! # nodeup
//!
//! Per-project Node.js runtime manager. Given a version constraint
//! (explicit, or discovered from `.nodeup.json` / `package.json`
//! engines), nodeup resolves a concrete Node.js version, downloads and
//! caches the matching platform build, and runs commands or an
//! interactive shell with that runtime on `PATH`.
//!
//! ## Subcommands
//!
//! - `run` - Run a command under the project's runtime
//! - `use` - Pin a runtime for one command or an interactive shell
//! - `remove` - Delete cached runtimes matching a constraint
//! - `clean` - Delete the whole cache
//! - `list` - Show cached versions
//! - `list-remote` - Show versions published on the mirror
//!
//! Bare invocation delegates to `run`: `nodeup npm test` is
//! `nodeup run npm test`.
//!
//! ## Examples
//!
//! ```bash
//! nodeup run npm ci
//! nodeup use 18 node --version
//! nodeup use 20.x
//! nodeup remove "<17.0.0"
//! ```

mod archive;
mod commands;
mod config;
mod env;
mod errors;
mod exec;
mod logging;
mod project;
mod pty;
mod runtime;
mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{clean, list, list_remote, remove, run, use_cmd};
use config::Config;
use errors::NodeupError;

/// Per-project Node.js runtime manager.
#[derive(Parser)]
#[command(
    name = "nodeup",
    author,
    version,
    about = "Run commands under the Node.js version your project asks for",
    after_help = "\
VERSION RESOLUTION:
    The version constraint is taken from, in order:
    1. The explicit constraint argument (for 'use')
    2. .nodeup.json (\"node\" field), walking up from the working directory
    3. package.json (\"engines\".\"node\"), same walk
    4. Any version ('*')

ENVIRONMENT VARIABLES:
    NODEUP_DIR              Cache directory (default: ~/.nodeup)
    NODEUP_MIRROR           Distribution mirror (default: https://nodejs.org/dist/)
    NODEUP_DEBUG            Enable debug logging"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the nodeup CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a command under the project's Node.js runtime.
    ///
    /// Resolves the project constraint, downloads the runtime if
    /// needed, and executes the command with it prepended to PATH. The
    /// exit code is the command's own.
    Run(run::RunArgs),

    /// Pin a runtime for one command or an interactive shell.
    ///
    /// With a trailing command, runs it under the selected runtime.
    /// Without one, opens your shell in a session with the runtime
    /// active; type 'exit' to leave.
    #[command(name = "use")]
    Use(use_cmd::UseArgs),

    /// Delete cached runtimes matching a constraint.
    Remove(remove::RemoveArgs),

    /// Delete the whole cache directory.
    Clean,

    /// Show cached Node.js versions.
    List,

    /// Show versions published on the mirror.
    ListRemote(list_remote::ListRemoteArgs),

    /// Anything else is shorthand for 'run'.
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[tokio::main]
async fn main() {
    logging::init(logging::debug_enabled_from_env());

    if let Err(e) = run().await {
        let exit_code = handle_error(&e);
        std::process::exit(exit_code);
    }
}

/// Handles an error and returns the appropriate exit code.
///
/// For `ProcessExitCode` errors, returns the embedded exit code without
/// printing anything (the child already wrote its output). For all
/// other errors, prints the error and returns exit code 1.
fn handle_error(e: &anyhow::Error) -> i32 {
    if let Some(NodeupError::ProcessExitCode { code }) = e.downcast_ref::<NodeupError>() {
        return *code;
    }
    eprintln!("Error: {e:?}");
    1
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    dispatch(cli, &config).await
}

async fn dispatch(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(&args, config).await,
        Some(Commands::Use(args)) => use_cmd::execute(&args, config).await,
        Some(Commands::Remove(args)) => remove::execute(&args, config).await,
        Some(Commands::Clean) => clean::execute(config).await,
        Some(Commands::List) => list::execute(config).await,
        Some(Commands::ListRemote(args)) => list_remote::execute(&args, config).await,
        Some(Commands::External(command)) => {
            let args = run::RunArgs { command };
            run::execute(&args, config).await
        }
        // Bare invocation is `run` with nothing to run, which reports
        // the missing command.
        None => {
            let args = run::RunArgs {
                command: Vec::new(),
            };
            run::execute(&args, config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_exit_code_is_forwarded_without_output() {
        let err: anyhow::Error = NodeupError::process_exit_code(3).into();
        assert_eq!(handle_error(&err), 3);
    }

    #[test]
    fn other_errors_exit_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(handle_error(&err), 1);
    }

    #[test]
    fn cli_parses_external_subcommand_as_run() {
        let cli = Cli::parse_from(["nodeup", "node", "--version"]);
        match cli.command {
            Some(Commands::External(command)) => {
                assert_eq!(command, vec!["node", "--version"]);
            }
            _ => panic!("expected external subcommand"),
        }
    }

    #[tokio::test]
    async fn bare_invocation_is_a_missing_command_error() {
        let cli = Cli::parse_from(["nodeup"]);
        assert!(cli.command.is_none());

        let root = std::env::temp_dir().join(format!("nodeup_test_bare_{}", std::process::id()));
        let config = Config::new(root.clone(), "http://127.0.0.1:1/dist/");

        let err = dispatch(cli, &config)
            .await
            .expect_err("bare invocation should not succeed");
        assert!(matches!(
            err.downcast_ref::<NodeupError>(),
            Some(NodeupError::NoCommand)
        ));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn cli_parses_use_with_constraint_and_command() {
        let cli = Cli::parse_from(["nodeup", "use", "18", "npm", "test"]);
        match cli.command {
            Some(Commands::Use(args)) => {
                assert_eq!(args.constraint.as_deref(), Some("18"));
                assert_eq!(args.command, vec!["npm", "test"]);
            }
            _ => panic!("expected use subcommand"),
        }
    }
}
