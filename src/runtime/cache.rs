//! Local cache of extracted Node.js runtimes.
//!
//! Each cached runtime is one directory under `<cache_root>/node`, named
//! exactly like the mirror artifact (`node-v18.20.0-linux-x64`). The cache
//! has a single writer; enumeration is a prefix scan that skips anything
//! it cannot parse.

use anyhow::{Context, Result};
use semver::Version;
use std::path::PathBuf;

use crate::config::Config;
use crate::runtime::constraint::{parse_version, Constraint};

/// One extracted runtime in the local cache.
#[derive(Debug, Clone)]
pub struct CachedRuntime {
    /// Parsed version, without a leading `v`.
    pub version: Version,
    /// Absolute path of the extracted runtime directory.
    pub path: PathBuf,
}

/// Lists cached runtimes sorted ascending by version.
///
/// A missing cache directory is an empty cache, not an error. Directory
/// names that do not carry a parsable version are skipped.
pub fn list_cached(config: &Config) -> Result<Vec<CachedRuntime>> {
    let dir = config.runtimes_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir)
        .with_context(|| format!("failed to read cache directory: {}", dir.display()))?;

    let mut runtimes = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| "failed to read cache entry")?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(version) = version_from_dir_name(name) else {
            log::debug!("skipping unrecognized cache entry: {name}");
            continue;
        };
        runtimes.push(CachedRuntime {
            version,
            path: entry.path(),
        });
    }

    runtimes.sort_by(|a, b| a.version.cmp(&b.version));
    Ok(runtimes)
}

/// Returns the newest cached runtime satisfying the constraint.
pub fn best_cached_match(
    config: &Config,
    constraint: &Constraint,
) -> Result<Option<CachedRuntime>> {
    let runtimes = list_cached(config)?;
    Ok(runtimes
        .into_iter()
        .rev()
        .find(|r| constraint.matches(&r.version)))
}

/// Removes every cached runtime satisfying the constraint.
///
/// Returns the versions that were removed; an empty result means nothing
/// matched, which callers treat as a notice rather than an error.
pub fn remove_matching(config: &Config, constraint: &Constraint) -> Result<Vec<Version>> {
    let mut removed = Vec::new();
    for runtime in list_cached(config)? {
        if !constraint.matches(&runtime.version) {
            continue;
        }
        std::fs::remove_dir_all(&runtime.path)
            .with_context(|| format!("failed to remove {}", runtime.path.display()))?;
        removed.push(runtime.version);
    }
    Ok(removed)
}

/// Parses the version out of a cache directory name.
///
/// Names follow the artifact convention `node-v{version}-{os}-{arch}`.
fn version_from_dir_name(name: &str) -> Option<Version> {
    let rest = name.strip_prefix("node-v")?;
    // Version ends at the os segment, two dash-separated fields from the end.
    let mut parts = rest.rsplitn(3, '-');
    let _arch = parts.next()?;
    let _os = parts.next()?;
    let version = parts.next()?;
    parse_version(version)
}
