//! Zip extraction for mirrors that publish Windows builds as `.zip`.

use anyhow::{Context, Result};
use std::path::Path;

use super::{ensure_parent, safe_join};

/// Extracts a `.zip` archive into the destination directory.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, an entry escapes the
/// destination, or writing fails.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;

    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive: {}", archive_path.display()))?;

    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create directory: {}", dest_dir.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("failed to read archive entry {i}"))?;

        // enclosed_name already filters traversal; keep the shared guard
        // so all four formats fail the same way.
        let entry_path = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                return Err(crate::errors::NodeupError::PathTraversal {
                    entry: entry.name().into(),
                }
                .into())
            }
        };
        let output_path = safe_join(dest_dir, &entry_path)?;

        if entry.is_dir() {
            std::fs::create_dir_all(&output_path).with_context(|| {
                format!("failed to create directory: {}", output_path.display())
            })?;
        } else {
            ensure_parent(&output_path)?;

            let mut outfile = std::fs::File::create(&output_path)
                .with_context(|| format!("failed to create file: {}", output_path.display()))?;
            std::io::copy(&mut entry, &mut outfile)
                .with_context(|| format!("failed to extract: {}", output_path.display()))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&output_path, std::fs::Permissions::from_mode(mode))
                    .with_context(|| {
                        format!("failed to set permissions: {}", output_path.display())
                    })?;
            }
        }
    }

    Ok(())
}
