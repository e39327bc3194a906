//! Tar extraction shared by the gzip and xz distributions.
//!
//! Node tarballs carry directories, regular files with executable bits,
//! symlinks (`bin/npm` points into `lib/node_modules`), and occasionally
//! hard links. Symlinks are recreated verbatim; hard links are linked to
//! the already-extracted target inside the destination. Device and FIFO
//! entries are skipped with a warning instead of aborting the archive.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;
use tar::{Archive, EntryType};
use xz2::read::XzDecoder;

use super::{ensure_parent, safe_join};

/// Extracts a `.tar.gz` archive into the destination directory.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, an entry escapes the
/// destination, or writing fails.
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;
    extract_tar(GzDecoder::new(file), archive_path, dest_dir)
}

/// Extracts a `.tar.xz` archive into the destination directory.
///
/// # Errors
///
/// Same failure modes as [`extract_tar_gz`].
pub fn extract_tar_xz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;
    extract_tar(XzDecoder::new(file), archive_path, dest_dir)
}

/// Walks the tar entries, applying the traversal guard to each one.
fn extract_tar<R: Read>(decoder: R, archive_path: &Path, dest_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create directory: {}", dest_dir.display()))?;

    let mut archive = Archive::new(decoder);

    for entry in archive
        .entries()
        .with_context(|| format!("failed to read tar entries: {}", archive_path.display()))?
    {
        let mut entry = entry
            .with_context(|| format!("failed to read tar entry: {}", archive_path.display()))?;

        let entry_path = entry
            .path()
            .context("failed to get entry path")?
            .into_owned();
        let output_path = safe_join(dest_dir, &entry_path)?;

        match entry.header().entry_type() {
            EntryType::Directory => {
                std::fs::create_dir_all(&output_path).with_context(|| {
                    format!("failed to create directory: {}", output_path.display())
                })?;
                #[cfg(unix)]
                if let Ok(mode) = entry.header().mode() {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(
                        &output_path,
                        std::fs::Permissions::from_mode(mode),
                    )
                    .with_context(|| {
                        format!("failed to set permissions: {}", output_path.display())
                    })?;
                }
            }
            EntryType::Symlink => {
                let link_target = entry
                    .link_name()
                    .context("failed to get symlink target")?
                    .with_context(|| format!("symlink without target: {}", entry_path.display()))?
                    .into_owned();
                ensure_parent(&output_path)?;
                make_symlink(&link_target, &output_path)?;
            }
            EntryType::Link => {
                let link_target = entry
                    .link_name()
                    .context("failed to get hard link target")?
                    .with_context(|| {
                        format!("hard link without target: {}", entry_path.display())
                    })?
                    .into_owned();
                // Hard link targets resolve inside the destination.
                let target_path = safe_join(dest_dir, &link_target)?;
                ensure_parent(&output_path)?;
                std::fs::hard_link(&target_path, &output_path).with_context(|| {
                    format!(
                        "failed to hard link {} to {}",
                        output_path.display(),
                        target_path.display()
                    )
                })?;
            }
            EntryType::Fifo | EntryType::Block | EntryType::Char => {
                log::warn!("skipping special tar entry: {}", entry_path.display());
            }
            _ => {
                ensure_parent(&output_path)?;
                entry
                    .unpack(&output_path)
                    .with_context(|| format!("failed to extract: {}", output_path.display()))?;
            }
        }
    }

    Ok(())
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> Result<()> {
    // Replaying the same archive must not fail on an existing link.
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(link)
            .with_context(|| format!("failed to replace symlink: {}", link.display()))?;
    }
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "failed to create symlink {} -> {}",
            link.display(),
            target.display()
        )
    })
}

#[cfg(not(unix))]
fn make_symlink(target: &Path, link: &Path) -> Result<()> {
    // Symlink creation needs privileges on Windows and the Windows
    // distribution does not use them.
    log::warn!(
        "skipping symlink {} -> {}",
        link.display(),
        target.display()
    );
    let _ = (target, link);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::path::PathBuf;
    use tar::{Builder, Header};

    fn temp_test_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("nodeup_test_{}_{}", name, rand::random::<u64>()));
        std::fs::create_dir_all(&dir).expect("should create temp dir");
        dir
    }

    /// Builds a small runtime-shaped tar.gz: a directory, an executable
    /// file, a plain file, and (on the consumer side) a symlink.
    fn create_runtime_tar_gz(archive_path: &Path) {
        let file = std::fs::File::create(archive_path).expect("should create file");
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);

        let mut header = Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "node-v18.20.0-linux-x64/bin/", std::io::empty())
            .expect("should append dir");

        let mut header = Header::new_gnu();
        header.set_size(11);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                "node-v18.20.0-linux-x64/bin/node",
                b"node binary".as_slice(),
            )
            .expect("should append node");

        let mut header = Header::new_gnu();
        header.set_size(7);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                "node-v18.20.0-linux-x64/README.md",
                b"Node.js".as_slice(),
            )
            .expect("should append readme");

        let mut header = Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        header.set_cksum();
        builder
            .append_link(
                &mut header,
                "node-v18.20.0-linux-x64/bin/npm",
                "../lib/node_modules/npm/bin/npm-cli.js",
            )
            .expect("should append symlink");

        builder.finish().expect("should finish");
    }

    #[test]
    fn round_trip_preserves_layout() {
        let temp_dir = temp_test_dir("tar_round_trip");
        let archive_path = temp_dir.join("node.tar.gz");
        let dest_dir = temp_dir.join("output");

        create_runtime_tar_gz(&archive_path);
        extract_tar_gz(&archive_path, &dest_dir).expect("should extract");

        let root = dest_dir.join("node-v18.20.0-linux-x64");
        assert!(root.join("bin").join("node").exists());
        assert!(root.join("README.md").exists());

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[cfg(unix)]
    #[test]
    fn round_trip_preserves_executable_bit_and_symlink() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = temp_test_dir("tar_modes");
        let archive_path = temp_dir.join("node.tar.gz");
        let dest_dir = temp_dir.join("output");

        create_runtime_tar_gz(&archive_path);
        extract_tar_gz(&archive_path, &dest_dir).expect("should extract");

        let root = dest_dir.join("node-v18.20.0-linux-x64");

        let node_mode = std::fs::metadata(root.join("bin").join("node"))
            .expect("should stat node")
            .permissions()
            .mode();
        assert_eq!(node_mode & 0o111, 0o111, "node should be executable");

        let npm = root.join("bin").join("npm");
        let meta = std::fs::symlink_metadata(&npm).expect("should stat npm");
        assert!(meta.file_type().is_symlink(), "npm should be a symlink");
        assert_eq!(
            std::fs::read_link(&npm).expect("should read link"),
            PathBuf::from("../lib/node_modules/npm/bin/npm-cli.js")
        );

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[cfg(unix)]
    #[test]
    fn re_extraction_over_existing_symlink_succeeds() {
        let temp_dir = temp_test_dir("tar_replay");
        let archive_path = temp_dir.join("node.tar.gz");
        let dest_dir = temp_dir.join("output");

        create_runtime_tar_gz(&archive_path);
        extract_tar_gz(&archive_path, &dest_dir).expect("first extraction should succeed");
        extract_tar_gz(&archive_path, &dest_dir).expect("second extraction should succeed");

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn tar_xz_round_trip() {
        let temp_dir = temp_test_dir("tar_xz");
        let archive_path = temp_dir.join("node.tar.xz");
        let dest_dir = temp_dir.join("output");

        // Build the tar in memory, then xz-compress it.
        let mut tar_bytes = Vec::new();
        {
            let mut builder = Builder::new(&mut tar_bytes);
            let mut header = Header::new_gnu();
            header.set_size(11);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(
                    &mut header,
                    "node-v20.11.0-darwin-arm64/bin/node",
                    b"node binary".as_slice(),
                )
                .expect("should append node");
            builder.finish().expect("should finish");
        }

        let file = std::fs::File::create(&archive_path).expect("should create file");
        let mut encoder = xz2::write::XzEncoder::new(file, 6);
        std::io::Write::write_all(&mut encoder, &tar_bytes).expect("should compress");
        encoder.finish().expect("should finish xz stream");

        extract_tar_xz(&archive_path, &dest_dir).expect("should extract");
        assert!(dest_dir
            .join("node-v20.11.0-darwin-arm64")
            .join("bin")
            .join("node")
            .exists());

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    // Traversal rejection is exercised through the zip extractor, whose
    // writer allows arbitrary entry names; the tar builder refuses to
    // produce `..` paths. The shared guard has its own unit tests.
}
