//! Run command: execute one command under the project's runtime.
//!
//! The constraint comes from the project (`.nodeup.json` or
//! `package.json` engines); with no project constraint, any runtime
//! satisfies and the active one wins.

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::env;
use crate::errors::NodeupError;
use crate::exec;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// The command to execute, with its arguments.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Executes a command under a runtime satisfying the project
/// constraint.
///
/// # Errors
///
/// Propagates resolution, acquisition, and execution failures; a
/// non-zero child exit surfaces as [`NodeupError::ProcessExitCode`].
pub async fn execute(args: &RunArgs, config: &Config) -> Result<()> {
    if args.command.is_empty() {
        return Err(NodeupError::NoCommand.into());
    }

    let constraint = super::effective_constraint(None)?;
    run_with_constraint(&constraint, &args.command, config).await
}

/// Shared run path for `run` and `use <constraint> <cmd>`.
pub(crate) async fn run_with_constraint(
    constraint: &crate::runtime::constraint::Constraint,
    command: &[String],
    config: &Config,
) -> Result<()> {
    match super::prepare_runtime(constraint, config).await? {
        None => exec::run_directly(command),
        Some(runtime_dir) => {
            let current_path = std::env::var("PATH").unwrap_or_default();
            let overlay = env::runtime_overlay(&runtime_dir, &current_path, false);
            exec::run_under_runtime(&runtime_dir, command, &overlay)
        }
    }
}
