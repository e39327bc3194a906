//! Archive extraction for downloaded Node.js distributions.
//!
//! The mirror ships four formats depending on platform: `.tar.gz`,
//! `.tar.xz`, `.zip`, and `.7z`. Dispatch is by file suffix. Entry names
//! come from the mirror and are treated as untrusted: every resolved
//! path must stay under the destination directory, in all four formats.
//!
//! Archives keep their top-level `node-v{version}-{os}-{arch}` folder;
//! it becomes the runtime's cache directory.

mod sevenz;
mod tar;
mod zip;

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::errors::NodeupError;

pub use self::sevenz::extract_7z;
pub use self::tar::{extract_tar_gz, extract_tar_xz};
pub use self::zip::extract_zip;

/// Extracts an archive into the destination directory, dispatching on
/// the file suffix.
///
/// # Errors
///
/// Returns [`NodeupError::UnsupportedArchive`] for unknown suffixes and
/// propagates extraction failures, including traversal rejections.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let name = archive_path.to_string_lossy();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive_path, dest_dir)
    } else if name.ends_with(".tar.xz") {
        extract_tar_xz(archive_path, dest_dir)
    } else if name.ends_with(".zip") {
        extract_zip(archive_path, dest_dir)
    } else if name.ends_with(".7z") {
        extract_7z(archive_path, dest_dir)
    } else {
        Err(NodeupError::UnsupportedArchive {
            file: name.into_owned(),
        }
        .into())
    }
}

/// Resolves an archive entry path under the destination directory.
///
/// Rejects absolute paths and any `..` component so a crafted entry
/// cannot write outside the destination.
pub(crate) fn safe_join(dest_dir: &Path, entry_path: &Path) -> Result<PathBuf> {
    if entry_path.is_absolute()
        || entry_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(NodeupError::PathTraversal {
            entry: entry_path.to_path_buf(),
        }
        .into());
    }
    Ok(dest_dir.join(entry_path))
}

/// Creates the parent directory of an output path.
pub(crate) fn ensure_parent(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
