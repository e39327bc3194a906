//! Remote version index.
//!
//! The mirror publishes `index.json`, an array of release descriptors
//! ordered newest first. That ordering is part of the published contract
//! and is preserved here; the resolver takes the first satisfying entry
//! instead of re-sorting.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::config::Config;

/// Request timeout for the index fetch in seconds.
const INDEX_TIMEOUT_SECS: u64 = 30;

/// One release entry from the remote index.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVersion {
    /// Version with the mirror's leading `v`, e.g. `v18.20.0`.
    pub version: String,
    /// LTS codename, or `false` for non-LTS releases.
    #[serde(default)]
    pub lts: LtsField,
    /// Release date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
}

impl RemoteVersion {
    /// The version without the leading `v`.
    #[must_use]
    pub fn version_number(&self) -> &str {
        self.version.strip_prefix('v').unwrap_or(&self.version)
    }

    /// Whether this release is on an LTS line.
    #[must_use]
    pub fn is_lts(&self) -> bool {
        matches!(self.lts, LtsField::Codename(_))
    }

    /// The LTS codename, if any.
    #[must_use]
    pub fn lts_codename(&self) -> Option<&str> {
        match &self.lts {
            LtsField::Codename(name) => Some(name),
            LtsField::NotLts(_) => None,
        }
    }
}

/// The index encodes `lts` as either a codename string or `false`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LtsField {
    /// Codename of the LTS line, e.g. `Hydrogen`.
    Codename(String),
    /// Literal `false` for current (non-LTS) releases.
    NotLts(bool),
}

impl Default for LtsField {
    fn default() -> Self {
        Self::NotLts(false)
    }
}

/// Fetches the remote index, newest release first.
///
/// # Errors
///
/// Returns an error carrying the URL when the request fails, the server
/// answers with a non-success status, or the body is not valid JSON.
pub async fn fetch_index(config: &Config) -> Result<Vec<RemoteVersion>> {
    let url = config.index_url();
    log::debug!("fetching version index from {url}");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(INDEX_TIMEOUT_SECS))
        .build()
        .context("failed to create HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    if !response.status().is_success() {
        bail!("HTTP error {}: {url}", response.status());
    }

    let index: Vec<RemoteVersion> = response
        .json()
        .await
        .with_context(|| format!("failed to parse version index from {url}"))?;

    log::debug!("index lists {} releases", index.len());
    Ok(index)
}
