//! Remove command: delete cached runtimes matching a constraint.

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::runtime::cache;
use crate::runtime::constraint::Constraint;

/// Arguments for the remove command.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Version constraint selecting the runtimes to delete,
    /// e.g. `<17.0.0` or `18.x`.
    pub constraint: String,
}

/// Executes the remove command.
///
/// Matching nothing is a notice, not an error.
///
/// # Errors
///
/// Propagates constraint parse failures and filesystem errors.
pub async fn execute(args: &RemoveArgs, config: &Config) -> Result<()> {
    let constraint = Constraint::parse(&args.constraint)?;
    let removed = cache::remove_matching(config, &constraint)?;

    if removed.is_empty() {
        println!("No cached versions match {}", constraint);
        return Ok(());
    }

    for version in &removed {
        println!("Removed node v{version}");
    }
    Ok(())
}
