//! Version resolution.
//!
//! Resolution walks three tiers in strict order: the runtime already
//! active on `PATH`, the local cache, then the remote index. The first
//! two tiers never touch the network, which keeps repeated invocations
//! in an already-satisfied environment fast and offline-safe.

use anyhow::Result;
use semver::Version;
use std::path::PathBuf;

use crate::config::Config;
use crate::errors::NodeupError;
use crate::runtime::cache;
use crate::runtime::constraint::{parse_version, Constraint};
use crate::runtime::index::{self, RemoteVersion};

/// Where a resolved version came from.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The `node` already on `PATH` satisfies the constraint.
    Active(Version),
    /// A cached runtime satisfies the constraint.
    Cached {
        /// The cached version.
        version: Version,
        /// Its extracted runtime directory.
        path: PathBuf,
    },
    /// The remote index names a satisfying version not yet cached.
    Remote(Version),
}

impl Resolution {
    /// The concrete version regardless of tier.
    #[must_use]
    pub fn version(&self) -> &Version {
        match self {
            Self::Active(v) | Self::Remote(v) => v,
            Self::Cached { version, .. } => version,
        }
    }
}

/// Resolves a constraint to a concrete version.
///
/// # Errors
///
/// Returns [`NodeupError::NoMatchingVersion`] when no tier yields a
/// satisfying version, and propagates cache scan and index fetch
/// failures.
pub async fn resolve(constraint: &Constraint, config: &Config) -> Result<Resolution> {
    if let Some(active) = probe_active_version() {
        if constraint.matches(&active) {
            log::debug!("active node v{active} satisfies {constraint}");
            return Ok(Resolution::Active(active));
        }
        log::debug!("active node v{active} does not satisfy {constraint}");
    }

    if let Some(cached) = cache::best_cached_match(config, constraint)? {
        log::debug!("cached node v{} satisfies {constraint}", cached.version);
        return Ok(Resolution::Cached {
            version: cached.version,
            path: cached.path,
        });
    }

    let remote = index::fetch_index(config).await?;
    if let Some(version) = best_remote_match(&remote, constraint) {
        log::debug!("remote node v{version} satisfies {constraint}");
        return Ok(Resolution::Remote(version));
    }

    Err(NodeupError::no_matching_version(constraint.as_str()).into())
}

/// Picks the first satisfying entry of the remote index.
///
/// The index is ordered newest first, so the first match is the best
/// one; entries are not re-sorted.
fn best_remote_match(index: &[RemoteVersion], constraint: &Constraint) -> Option<Version> {
    index.iter().find_map(|entry| {
        let number = entry.version_number();
        if constraint.matches_str(number) {
            parse_version(number)
        } else {
            None
        }
    })
}

/// Probes the version of the `node` currently on `PATH`.
///
/// Any failure (no binary, odd output) means there is no active
/// runtime; resolution falls through to the next tier.
fn probe_active_version() -> Option<Version> {
    let output = std::process::Command::new("node")
        .arg("--version")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    parse_version(stdout.trim())
}
