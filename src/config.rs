//! Runtime configuration for nodeup.
//!
//! A [`Config`] is constructed exactly once at process entry and passed
//! down explicitly; no module reads the cache root or mirror from the
//! global environment after startup. This keeps the components testable
//! with injected roots and avoids load-order surprises.
//!
//! ## Directory Structure
//!
//! ```text
//! ~/.nodeup/                     # Cache root (or NODEUP_DIR)
//!   node/                        # Extracted runtimes
//!     node-v18.20.0-linux-x64/
//!       bin/node
//!   download/                    # Transient download staging
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the cache root directory.
pub const CACHE_ROOT_ENV: &str = "NODEUP_DIR";

/// Environment variable overriding the distribution mirror base URL.
pub const MIRROR_ENV: &str = "NODEUP_MIRROR";

/// Environment variable enabling debug logging.
pub const DEBUG_ENV: &str = "NODEUP_DEBUG";

/// Default distribution mirror.
const DEFAULT_MIRROR: &str = "https://nodejs.org/dist/";

/// Process-wide configuration, built once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for extracted runtimes and download staging.
    pub cache_root: PathBuf,
    /// Mirror base URL, always ending with a slash.
    pub mirror_base: String,
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// The cache root comes from `NODEUP_DIR`, defaulting to `~/.nodeup`;
    /// the mirror base from `NODEUP_MIRROR`, defaulting to the official
    /// Node.js distribution URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no cache root is configured and the home
    /// directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let cache_root = match std::env::var_os(CACHE_ROOT_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .context("cannot determine home directory; set NODEUP_DIR")?
                .join(".nodeup"),
        };

        let mirror_base = std::env::var(MIRROR_ENV)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIRROR.to_string());

        Ok(Self::new(cache_root, mirror_base))
    }

    /// Creates a configuration with an explicit root and mirror.
    #[must_use]
    pub fn new(cache_root: PathBuf, mirror_base: impl Into<String>) -> Self {
        let mut mirror_base = mirror_base.into();
        if !mirror_base.ends_with('/') {
            mirror_base.push('/');
        }
        Self {
            cache_root,
            mirror_base,
        }
    }

    /// Directory holding extracted runtimes.
    #[must_use]
    pub fn runtimes_dir(&self) -> PathBuf {
        self.cache_root.join("node")
    }

    /// Directory for transient download staging.
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.cache_root.join("download")
    }

    /// Path of the extracted runtime directory for an artifact name.
    #[must_use]
    pub fn runtime_dir(&self, artifact_name: &str) -> PathBuf {
        self.runtimes_dir().join(artifact_name)
    }

    /// Staging path for a downloaded archive file.
    #[must_use]
    pub fn download_path(&self, file_name: &str) -> PathBuf {
        self.download_dir().join(file_name)
    }

    /// URL of the remote version index.
    #[must_use]
    pub fn index_url(&self) -> String {
        format!("{}index.json", self.mirror_base)
    }

    /// URL of a versioned artifact on the mirror.
    #[must_use]
    pub fn artifact_url(&self, version: &str, full_name: &str) -> String {
        format!("{}v{}/{}", self.mirror_base, version, full_name)
    }
}

/// Returns the binary directory inside an extracted runtime.
///
/// Windows distributions are flat (`node.exe` at the root); Unix
/// distributions keep binaries under `bin/`.
#[must_use]
pub fn runtime_bin_dir(runtime_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        runtime_dir.to_path_buf()
    } else {
        runtime_dir.join("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_base_gains_trailing_slash() {
        let config = Config::new(PathBuf::from("/tmp/cache"), "https://mirror.test/node");
        assert_eq!(config.mirror_base, "https://mirror.test/node/");
    }

    #[test]
    fn index_url_appends_index_json() {
        let config = Config::new(PathBuf::from("/tmp/cache"), "https://nodejs.org/dist/");
        assert_eq!(config.index_url(), "https://nodejs.org/dist/index.json");
    }

    #[test]
    fn artifact_url_includes_v_prefix_and_file() {
        let config = Config::new(PathBuf::from("/tmp/cache"), "https://nodejs.org/dist/");
        assert_eq!(
            config.artifact_url("18.20.0", "node-v18.20.0-linux-x64.tar.gz"),
            "https://nodejs.org/dist/v18.20.0/node-v18.20.0-linux-x64.tar.gz"
        );
    }

    #[test]
    fn cache_layout_nests_under_root() {
        let config = Config::new(PathBuf::from("/tmp/cache"), "https://nodejs.org/dist/");
        assert_eq!(
            config.runtime_dir("node-v18.20.0-linux-x64"),
            PathBuf::from("/tmp/cache/node/node-v18.20.0-linux-x64")
        );
        assert_eq!(
            config.download_path("node-v18.20.0-linux-x64.tar.gz"),
            PathBuf::from("/tmp/cache/download/node-v18.20.0-linux-x64.tar.gz")
        );
    }

    #[cfg(unix)]
    #[test]
    fn bin_dir_is_bin_subdirectory_on_unix() {
        assert_eq!(
            runtime_bin_dir(Path::new("/cache/node/node-v18.20.0-linux-x64")),
            PathBuf::from("/cache/node/node-v18.20.0-linux-x64/bin")
        );
    }

    #[test]
    #[serial_test::serial]
    fn from_env_respects_overrides() {
        std::env::set_var(CACHE_ROOT_ENV, "/tmp/nodeup-test-root");
        std::env::set_var(MIRROR_ENV, "https://registry.npmmirror.com/-/binary/node");

        let config = Config::from_env().expect("config should build");
        assert_eq!(config.cache_root, PathBuf::from("/tmp/nodeup-test-root"));
        assert_eq!(
            config.mirror_base,
            "https://registry.npmmirror.com/-/binary/node/"
        );

        std::env::remove_var(CACHE_ROOT_ENV);
        std::env::remove_var(MIRROR_ENV);
    }
}
