//! Runtime acquisition: cache check, download, extract.
//!
//! `ensure` is idempotent at the directory level. A cache hit requires
//! the runtime directory to exist and be non-empty, so an interrupted
//! extraction is retried instead of being served as a valid runtime.

use anyhow::{Context, Result};
use semver::Version;
use std::path::{Path, PathBuf};

use crate::archive::extract_archive;
use crate::config::Config;
use crate::errors::NodeupError;
use crate::runtime::download::download_file;
use crate::runtime::target::ArtifactTarget;

/// Ensures the given version is extracted in the local cache and
/// returns its runtime directory.
///
/// A second call for the same version performs no network I/O.
///
/// # Errors
///
/// Returns [`NodeupError::UnsupportedPlatform`] when the host has no
/// published artifact, and propagates download and extraction failures.
pub async fn ensure(version: &Version, config: &Config) -> Result<PathBuf> {
    let target = ArtifactTarget::for_host(version).ok_or_else(|| {
        NodeupError::UnsupportedPlatform {
            version: version.to_string(),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    })?;

    let runtime_dir = config.runtime_dir(&target.file_name);
    if is_populated(&runtime_dir) {
        log::debug!("cache hit: {}", runtime_dir.display());
        return Ok(runtime_dir);
    }

    let url = config.artifact_url(&version.to_string(), &target.full_name);
    let staged = config.download_path(&target.full_name);
    log::debug!("downloading {url}");
    println!("Downloading Node.js v{version}...");

    download_file(&url, &staged).await?;

    let dest = config.runtimes_dir();
    let extracted = extract_archive(&staged, &dest)
        .with_context(|| format!("failed to extract {}", staged.display()));

    // The staged archive is transient either way.
    let _ = std::fs::remove_file(&staged);
    extracted?;

    if !is_populated(&runtime_dir) {
        anyhow::bail!(
            "archive did not produce the expected runtime directory: {}",
            runtime_dir.display()
        );
    }

    Ok(runtime_dir)
}

/// A usable cache entry is a directory with at least one child.
fn is_populated(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}
