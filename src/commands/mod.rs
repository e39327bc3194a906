//! Subcommand implementations for the nodeup CLI.

pub mod clean;
pub mod list;
pub mod list_remote;
pub mod remove;
pub mod run;
pub mod use_cmd;

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::project;
use crate::runtime::acquire;
use crate::runtime::constraint::Constraint;
use crate::runtime::resolver::{self, Resolution};

/// Resolves a constraint and materializes the runtime when one is
/// needed.
///
/// Returns `None` when the runtime already active on `PATH` satisfies
/// the constraint, so the caller can delegate to it untouched; returns
/// the extracted runtime directory otherwise.
pub(crate) async fn prepare_runtime(
    constraint: &Constraint,
    config: &Config,
) -> Result<Option<PathBuf>> {
    match resolver::resolve(constraint, config).await? {
        Resolution::Active(version) => {
            log::debug!("delegating to active node v{version}");
            Ok(None)
        }
        Resolution::Cached { version, path } => {
            log::debug!("using cached node v{version}");
            Ok(Some(path))
        }
        Resolution::Remote(version) => {
            let path = acquire::ensure(&version, config).await?;
            Ok(Some(path))
        }
    }
}

/// Picks the effective constraint: explicit argument, then project
/// discovery, then match-anything.
pub(crate) fn effective_constraint(explicit: Option<&str>) -> Result<Constraint> {
    if let Some(raw) = explicit {
        return Constraint::parse(raw);
    }
    let cwd = std::env::current_dir()?;
    match project::discover_constraint(&cwd)? {
        Some(raw) => Constraint::parse(&raw),
        None => Constraint::parse("*"),
    }
}
