//! Streaming HTTP download.
//!
//! Archives stream to a `.tmp` sibling of the destination and are
//! renamed into place on success, so a partially written file is never
//! mistaken for a finished download. A failed request surfaces the URL
//! and, when the server answered, the status code; the operation fails
//! once, with no automatic retry.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

/// Request timeout for the whole transfer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Minimum interval between progress line updates.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Downloads a file from the given URL to the specified path.
///
/// The body streams to disk with a progress line on stdout. The total
/// size comes from the HTTP `Content-Length` header when the server
/// provides one.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with a
/// non-success status, the destination cannot be created, or writing
/// fails. The staged `.tmp` file is removed on failure.
pub async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let temp_path = dest.with_extension("tmp");

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    if let Err(e) = stream_to_file(url, &temp_path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, dest).await.with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            dest.display()
        )
    })
}

/// Streams the response body to the destination file.
async fn stream_to_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    if !response.status().is_success() {
        bail!("HTTP error {}: {url}", response.status());
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("failed to create file: {}", dest.display()))?;

    let mut progress = Progress::start(response.content_length());
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("failed to read chunk from {url}"))?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("failed to write to {}", dest.display()))?;
        progress.advance(chunk.len() as u64);
    }

    file.flush()
        .await
        .with_context(|| format!("failed to flush {}", dest.display()))?;

    progress.finish();
    Ok(())
}

/// Tracks transfer progress and repaints a carriage-return line.
struct Progress {
    downloaded: u64,
    total: Option<u64>,
    started: Instant,
    last_render: Instant,
}

impl Progress {
    fn start(total: Option<u64>) -> Self {
        let now = Instant::now();
        Self {
            downloaded: 0,
            total,
            started: now,
            last_render: now,
        }
    }

    fn advance(&mut self, bytes: u64) {
        self.downloaded += bytes;
        if self.last_render.elapsed() >= PROGRESS_INTERVAL {
            self.render();
            self.last_render = Instant::now();
        }
    }

    fn finish(&mut self) {
        self.render();
        println!();
    }

    fn render(&self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        #[allow(clippy::cast_precision_loss)]
        let rate = if elapsed > 0.0 {
            self.downloaded as f64 / elapsed
        } else {
            0.0
        };

        match self.total {
            Some(total) if total > 0 => {
                let percent = self.downloaded.saturating_mul(100) / total;
                print!(
                    "\r{}/{} ({percent}%) {}     ",
                    human_size(self.downloaded),
                    human_size(total),
                    human_rate(rate)
                );
            }
            _ => {
                print!(
                    "\r{} {}     ",
                    human_size(self.downloaded),
                    human_rate(rate)
                );
            }
        }
        let _ = std::io::stdout().flush();
    }
}

/// Formats a byte count with a binary unit suffix.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Formats a transfer rate in bytes per second.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn human_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", human_size(bytes_per_sec as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read as _, Write as _};
    use std::path::PathBuf;

    fn temp_test_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("nodeup_test_{}_{}", name, rand::random::<u64>()));
        std::fs::create_dir_all(&dir).expect("should create temp dir");
        dir
    }

    #[tokio::test]
    async fn connection_failure_fails_once_and_leaves_no_file() {
        let temp_dir = temp_test_dir("download_refused");
        let dest = temp_dir.join("node.tar.gz");

        let started = Instant::now();
        let err = download_file("http://127.0.0.1:1/dist/node.tar.gz", &dest)
            .await
            .expect_err("unroutable url should fail");

        // A single refused connection returns immediately; a backoff
        // loop would take seconds.
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "failure should be immediate, took {:?}",
            started.elapsed()
        );
        let msg = format!("{err:#}");
        assert!(msg.contains("127.0.0.1"), "error should name the url: {msg}");
        assert!(!dest.exists());
        assert!(!dest.with_extension("tmp").exists());

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[tokio::test]
    async fn http_error_carries_status_and_url() {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("should bind a local port");
        let addr = listener.local_addr().expect("should have an address");

        std::thread::spawn(move || {
            if let Ok((mut socket, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf);
                let _ = socket
                    .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n");
            }
        });

        let temp_dir = temp_test_dir("download_404");
        let dest = temp_dir.join("node.tar.gz");
        let url = format!("http://{addr}/dist/node.tar.gz");

        let err = download_file(&url, &dest)
            .await
            .expect_err("404 should fail the download");
        let msg = format!("{err:#}");
        assert!(msg.contains("404"), "error should carry the status: {msg}");
        assert!(msg.contains(&url), "error should carry the url: {msg}");
        assert!(!dest.exists());

        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn size_format_scales_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn rate_format_scales_units() {
        assert_eq!(human_rate(100.0), "100 B/s");
        assert_eq!(human_rate(2048.0), "2.0 KB/s");
        assert_eq!(human_rate(2.5 * 1024.0 * 1024.0), "2.5 MB/s");
    }
}
