//! List command: show cached runtime versions.

use anyhow::Result;

use crate::config::Config;
use crate::runtime::cache;

/// Executes the list command.
///
/// # Errors
///
/// Propagates cache scan failures.
pub async fn execute(config: &Config) -> Result<()> {
    let runtimes = cache::list_cached(config)?;

    if runtimes.is_empty() {
        println!("No cached Node.js versions");
        println!("Run 'nodeup use <version>' to download one.");
        return Ok(());
    }

    println!("Cached Node.js versions:");
    for runtime in runtimes {
        println!("  v{}", runtime.version);
    }
    Ok(())
}
