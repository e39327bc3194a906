//! 7z extraction for the Windows distribution.

use anyhow::{Context, Result};
use sevenz_rust::{Password, SevenZReader};
use std::io::Read;
use std::path::Path;

use super::{ensure_parent, safe_join};

/// Extracts a `.7z` archive into the destination directory.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, an entry escapes the
/// destination, or writing fails.
pub fn extract_7z(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create directory: {}", dest_dir.display()))?;

    let mut reader = SevenZReader::open(archive_path, Password::empty())
        .with_context(|| format!("failed to read 7z archive: {}", archive_path.display()))?;

    // for_each_entries only carries its own error type; the first
    // extraction failure is stashed and re-raised after the walk stops.
    let mut failure: Option<anyhow::Error> = None;
    reader
        .for_each_entries(|entry, entry_reader| {
            match extract_entry(entry.name(), entry.is_directory(), entry_reader, dest_dir) {
                Ok(()) => Ok(true),
                Err(e) => {
                    failure = Some(e);
                    Ok(false)
                }
            }
        })
        .with_context(|| format!("failed to walk 7z archive: {}", archive_path.display()))?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn extract_entry(
    name: &str,
    is_directory: bool,
    reader: &mut dyn Read,
    dest_dir: &Path,
) -> Result<()> {
    let output_path = safe_join(dest_dir, Path::new(name))?;

    if is_directory {
        std::fs::create_dir_all(&output_path)
            .with_context(|| format!("failed to create directory: {}", output_path.display()))?;
        return Ok(());
    }

    ensure_parent(&output_path)?;
    let mut outfile = std::fs::File::create(&output_path)
        .with_context(|| format!("failed to create file: {}", output_path.display()))?;
    std::io::copy(reader, &mut outfile)
        .with_context(|| format!("failed to extract: {}", output_path.display()))?;
    Ok(())
}
