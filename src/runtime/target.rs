//! Platform artifact naming for the Node.js distribution mirror.
//!
//! The mirror publishes one archive per `(os, arch)` pair, named
//! `node-v{version}-{os}-{arch}{ext}`. This module maps a host platform
//! and a concrete version onto that name as a pure function so tests can
//! exercise every pair without touching the network.

use semver::Version;

/// Archive suffix used on each operating system.
///
/// The mirror also publishes `.zip` for Windows; `.7z` is preferred there
/// for its size, matching the download the official installer scripts use.
const LINUX_EXT: &str = ".tar.gz";
const DARWIN_EXT: &str = ".tar.xz";
const WINDOWS_EXT: &str = ".7z";

/// First Node.js release with a native darwin-arm64 build.
const FIRST_DARWIN_ARM64: Version = Version::new(16, 0, 0);

/// A resolved distribution artifact for one version on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    /// Directory name inside the archive and in the local cache,
    /// e.g. `node-v18.20.0-linux-x64`.
    pub file_name: String,
    /// Archive file name on the mirror, e.g.
    /// `node-v18.20.0-linux-x64.tar.gz`.
    pub full_name: String,
    /// Archive suffix including the leading dot.
    pub ext: &'static str,
}

impl ArtifactTarget {
    /// Builds the artifact target for the host platform.
    ///
    /// Returns `None` when no artifact is published for the host.
    #[must_use]
    pub fn for_host(version: &Version) -> Option<Self> {
        Self::for_platform(std::env::consts::OS, std::env::consts::ARCH, version)
    }

    /// Builds the artifact target for an explicit `(os, arch)` pair.
    ///
    /// `os` and `arch` use the `std::env::consts` vocabulary. Apple
    /// silicon below 16.0.0 maps to the x64 artifact, which runs under
    /// Rosetta; 16.0.0 is the first release with a native arm64 build.
    #[must_use]
    pub fn for_platform(os: &str, arch: &str, version: &Version) -> Option<Self> {
        let (dist_os, ext) = match os {
            "linux" => ("linux", LINUX_EXT),
            "macos" => ("darwin", DARWIN_EXT),
            "windows" => ("win", WINDOWS_EXT),
            _ => return None,
        };

        let dist_arch = match (dist_os, arch) {
            ("linux" | "darwin" | "win", "x86_64") => "x64",
            ("win", "x86") => "x86",
            ("linux", "aarch64") => "arm64",
            ("darwin", "aarch64") => {
                if *version < FIRST_DARWIN_ARM64 {
                    "x64"
                } else {
                    "arm64"
                }
            }
            ("win", "aarch64") => "arm64",
            ("linux", "arm") => "armv7l",
            ("linux", "powerpc64") => "ppc64le",
            ("linux", "s390x") => "s390x",
            _ => return None,
        };

        let file_name = format!("node-v{version}-{dist_os}-{dist_arch}");
        let full_name = format!("{file_name}{ext}");
        Some(Self {
            file_name,
            full_name,
            ext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("test version should parse")
    }

    #[test]
    fn linux_x64_uses_tar_gz() {
        let t = ArtifactTarget::for_platform("linux", "x86_64", &v("18.20.0"))
            .expect("should be supported");
        assert_eq!(t.file_name, "node-v18.20.0-linux-x64");
        assert_eq!(t.full_name, "node-v18.20.0-linux-x64.tar.gz");
        assert_eq!(t.ext, ".tar.gz");
    }

    #[test]
    fn macos_arm64_uses_tar_xz() {
        let t = ArtifactTarget::for_platform("macos", "aarch64", &v("20.11.0"))
            .expect("should be supported");
        assert_eq!(t.full_name, "node-v20.11.0-darwin-arm64.tar.xz");
    }

    #[test]
    fn macos_arm64_below_16_falls_back_to_x64() {
        let t = ArtifactTarget::for_platform("macos", "aarch64", &v("14.21.3"))
            .expect("should be supported");
        assert_eq!(t.full_name, "node-v14.21.3-darwin-x64.tar.xz");

        let native = ArtifactTarget::for_platform("macos", "aarch64", &v("16.0.0"))
            .expect("should be supported");
        assert_eq!(native.full_name, "node-v16.0.0-darwin-arm64.tar.xz");
    }

    #[test]
    fn windows_x64_uses_7z() {
        let t = ArtifactTarget::for_platform("windows", "x86_64", &v("18.20.0"))
            .expect("should be supported");
        assert_eq!(t.full_name, "node-v18.20.0-win-x64.7z");
    }

    #[test]
    fn linux_armv7_maps_to_armv7l() {
        let t = ArtifactTarget::for_platform("linux", "arm", &v("18.20.0"))
            .expect("should be supported");
        assert_eq!(t.file_name, "node-v18.20.0-linux-armv7l");
    }

    #[test]
    fn unsupported_combinations_yield_none() {
        assert!(ArtifactTarget::for_platform("freebsd", "x86_64", &v("18.20.0")).is_none());
        assert!(ArtifactTarget::for_platform("macos", "s390x", &v("18.20.0")).is_none());
    }
}
