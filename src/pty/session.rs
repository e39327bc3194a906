//! Interactive pty session hosting.
//!
//! The session spawns the user's shell in a fresh pty, injects the
//! environment overlay by typing assignment statements in the shell's
//! own dialect, clears the screen, drains the echoed setup noise within
//! a bounded window, prints a welcome banner, then bridges the real
//! stdin and stdout to the pty until the shell exits. The session's
//! exit status is the shell's.

use std::io::{IsTerminal, Read, Write};
use std::path::Path;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use portable_pty::{native_pty_system, CommandBuilder};

use crate::env::EnvOverlay;
use crate::errors::NodeupError;
use crate::pty::dialect::ShellDialect;
use crate::pty::resize::{current_size, ResizeWatcher};

/// How long echoed setup output is discarded before the banner.
const SETUP_DRAIN_WINDOW: Duration = Duration::from_millis(500);

/// RAII guard for raw mode on the real terminal.
///
/// Restores cooked mode on every exit path, panics included.
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Runs an interactive shell session and blocks until the shell exits.
///
/// # Errors
///
/// Failures before the terminal handoff (pty allocation, spawn, setup
/// writes) abort the session. A non-zero shell exit surfaces as
/// [`NodeupError::ProcessExitCode`], matching the executor's contract.
pub async fn start(shell_path: &Path, overlay: &EnvOverlay, welcome: &str) -> Result<()> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(current_size())
        .context("failed to allocate pty")?;

    let mut cmd = CommandBuilder::new(shell_path);
    if let Ok(cwd) = std::env::current_dir() {
        cmd.cwd(cwd);
    }
    let mut child = pair
        .slave
        .spawn_command(cmd)
        .with_context(|| format!("failed to spawn shell: {}", shell_path.display()))?;
    drop(pair.slave);

    let master = pair.master;
    let mut writer = master.take_writer().context("failed to open pty writer")?;
    let mut reader = master
        .try_clone_reader()
        .context("failed to open pty reader")?;
    let master = Arc::new(Mutex::new(master));

    let interactive = std::io::stdin().is_terminal();
    let raw_guard = if interactive {
        Some(RawModeGuard::new()?)
    } else {
        None
    };
    let watcher = interactive.then(|| ResizeWatcher::spawn(Arc::clone(&master)));

    // Type the overlay into the shell, then clear the screen.
    let dialect = ShellDialect::from_shell_path(shell_path);
    let eol = dialect.line_ending();
    for (name, value) in overlay.vars() {
        write!(writer, "{}{eol}", dialect.format_assignment(name, value))
            .context("failed to write setup to pty")?;
    }
    write!(writer, "{}{eol}", dialect.clear_command()).context("failed to write setup to pty")?;
    writer.flush().context("failed to flush pty setup")?;

    // All pty output funnels through one channel; the thread ends when
    // the shell closes its side.
    let (tx, rx) = channel::<Vec<u8>>();
    std::thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    // stdin -> pty. The thread parks on a blocking stdin read and dies
    // with the process once the shell is gone.
    std::thread::spawn(move || {
        let mut stdin = std::io::stdin();
        let mut buf = [0u8; 8192];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if writer.write_all(&buf[..n]).is_err() || writer.flush().is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The bridge blocks on channel reads and child.wait(), so it runs
    // on a blocking worker; the async workers stay free to drive the
    // resize watcher.
    let welcome = welcome.to_string();
    let status = tokio::task::spawn_blocking(move || {
        // Discard the echoed setup statements.
        let drain_deadline = Instant::now() + SETUP_DRAIN_WINDOW;
        loop {
            let Some(remaining) = drain_deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            match rx.recv_timeout(remaining) {
                Ok(_) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let mut stdout = std::io::stdout();
        if !welcome.is_empty() {
            let _ = write!(stdout, "{welcome}\r\n");
        }
        let _ = stdout.flush();

        // pty -> stdout until the shell closes the pty.
        while let Ok(chunk) = rx.recv() {
            if stdout.write_all(&chunk).is_err() {
                break;
            }
            let _ = stdout.flush();
        }

        child.wait().context("failed to wait for shell")
    })
    .await
    .context("session bridge task failed")??;

    drop(watcher);
    drop(raw_guard);

    if status.success() {
        return Ok(());
    }
    #[allow(clippy::cast_possible_wrap)]
    let code = status.exit_code() as i32;
    Err(NodeupError::process_exit_code(code).into())
}
