//! Clean command: delete the whole cache root.

use anyhow::{Context, Result};

use crate::config::Config;

/// Executes the clean command.
///
/// A missing cache root is already clean.
///
/// # Errors
///
/// Propagates filesystem errors for an existing root.
pub async fn execute(config: &Config) -> Result<()> {
    if !config.cache_root.exists() {
        println!("Cache is already clean");
        return Ok(());
    }

    std::fs::remove_dir_all(&config.cache_root)
        .with_context(|| format!("failed to remove {}", config.cache_root.display()))?;
    println!("Removed {}", config.cache_root.display());
    Ok(())
}
