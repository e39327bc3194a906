//! Node-style semver range matching.
//!
//! Ranges found in the wild (`package.json` engines fields, user input)
//! use a few notations `semver::VersionReq` does not accept directly:
//! hyphen ranges (`16.0.0 - 18.0.0`), `v`-prefixed versions, and
//! space-separated comparator lists. [`Constraint`] normalizes those
//! onto the crate's syntax before parsing; everything else (`^`, `~`,
//! `>=`, wildcards like `18.x` and `*`) passes through unchanged.

use anyhow::{Context, Result};
use semver::{Version, VersionReq};

/// A parsed version constraint.
#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    req: VersionReq,
}

impl Constraint {
    /// Parses a node-style range.
    ///
    /// # Errors
    ///
    /// Returns an error naming the input when the range is not valid
    /// after normalization.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = normalize_range(raw);
        let req = VersionReq::parse(&normalized)
            .with_context(|| format!("invalid version constraint: {raw}"))?;
        Ok(Self {
            raw: raw.trim().to_string(),
            req,
        })
    }

    /// The constraint as the user wrote it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests a dotted version string against the constraint.
    ///
    /// A leading `v` on the candidate is accepted and stripped. Returns
    /// `false` for candidates that do not parse as semver at all.
    #[must_use]
    pub fn matches_str(&self, version: &str) -> bool {
        match parse_version(version) {
            Some(v) => self.req.matches(&v),
            None => false,
        }
    }

    /// Tests a parsed version against the constraint.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.req.matches(version)
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses a version string, tolerating a leading `v`.
#[must_use]
pub fn parse_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Rewrites node-style range syntax onto `VersionReq` syntax.
///
/// Hyphen ranges become a `>=lo, <=hi` pair; bare space separation
/// between comparators becomes comma separation; `v` prefixes on
/// version tokens are dropped.
fn normalize_range(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "*".to_string();
    }

    if let Some((lo, hi)) = split_hyphen_range(trimmed) {
        return format!(">={}, <={}", strip_v(lo), strip_v(hi));
    }

    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(strip_v_in_comparator)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits `lo - hi` into its endpoints.
///
/// The hyphen must be surrounded by whitespace so versions with
/// pre-release tags (`1.0.0-rc.1`) are not misread as ranges.
fn split_hyphen_range(range: &str) -> Option<(&str, &str)> {
    let idx = range.find(" - ")?;
    let lo = range[..idx].trim();
    let hi = range[idx + 3..].trim();
    if lo.is_empty() || hi.is_empty() {
        return None;
    }
    Some((lo, hi))
}

fn strip_v(token: &str) -> &str {
    token.strip_prefix('v').unwrap_or(token)
}

/// Drops a `v` sitting between a comparator operator and the version.
fn strip_v_in_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| c != '>' && c != '<' && c != '=' && c != '^' && c != '~')
        .unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    format!("{op}{}", strip_v(version))
}
