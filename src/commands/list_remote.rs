//! List-remote command: show versions published on the mirror.

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::runtime::index;

/// Arguments for the list-remote command.
#[derive(Args, Debug)]
pub struct ListRemoteArgs {
    /// Only show LTS releases.
    #[clap(long)]
    pub lts: bool,
}

/// Executes the list-remote command.
///
/// Prints versions in the index's own order, newest first, with LTS
/// codenames where the release has one.
///
/// # Errors
///
/// Propagates index fetch failures.
pub async fn execute(args: &ListRemoteArgs, config: &Config) -> Result<()> {
    let releases = index::fetch_index(config).await?;

    for release in &releases {
        if args.lts && !release.is_lts() {
            continue;
        }
        match release.lts_codename() {
            Some(codename) => println!("v{} ({codename})", release.version_number()),
            None => println!("v{}", release.version_number()),
        }
    }
    Ok(())
}
