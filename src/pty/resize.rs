//! Terminal resize propagation for pty sessions.
//!
//! On Unix the watcher reacts to `SIGWINCH`; elsewhere it polls the
//! terminal size on an interval. Either way the new size is forwarded
//! to the pty master so full-screen programs inside the session keep
//! rendering correctly.

use portable_pty::{MasterPty, PtySize};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Shared handle to the pty master, locked only for resize calls.
pub type SharedMaster = Arc<Mutex<Box<dyn MasterPty + Send>>>;

/// Background task forwarding terminal size changes to the pty.
///
/// Dropping the watcher aborts the task, so the signal registration is
/// torn down on every exit path of the session.
pub struct ResizeWatcher {
    handle: JoinHandle<()>,
}

impl ResizeWatcher {
    /// Spawns the watcher for the given master.
    #[must_use]
    pub fn spawn(master: SharedMaster) -> Self {
        let handle = tokio::spawn(watch(master));
        Self { handle }
    }

    #[cfg(test)]
    fn abort_handle(&self) -> tokio::task::AbortHandle {
        self.handle.abort_handle()
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(unix)]
async fn watch(master: SharedMaster) {
    use tokio::signal::unix::{signal, SignalKind};

    let Ok(mut winch) = signal(SignalKind::window_change()) else {
        return;
    };
    while winch.recv().await.is_some() {
        apply_current_size(&master);
    }
}

#[cfg(not(unix))]
async fn watch(master: SharedMaster) {
    let mut last = crossterm::terminal::size().ok();
    let mut interval = tokio::time::interval(std::time::Duration::from_millis(500));
    loop {
        interval.tick().await;
        let current = crossterm::terminal::size().ok();
        if current != last {
            last = current;
            apply_current_size(&master);
        }
    }
}

/// Queries the real terminal and applies its size to the pty.
fn apply_current_size(master: &SharedMaster) {
    let Ok((cols, rows)) = crossterm::terminal::size() else {
        return;
    };
    let size = PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    };
    if let Ok(master) = master.lock() {
        let _ = master.resize(size);
    }
}

/// The current terminal size, with an 80x24 fallback for non-tty
/// environments.
#[must_use]
pub fn current_size() -> PtySize {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_size_always_yields_nonzero_dimensions() {
        let size = current_size();
        assert!(size.rows > 0);
        assert!(size.cols > 0);
    }

    #[tokio::test]
    async fn dropping_the_watcher_aborts_its_task() {
        let pair = portable_pty::native_pty_system()
            .openpty(current_size())
            .expect("should allocate a pty");
        let master: SharedMaster = Arc::new(Mutex::new(pair.master));

        let watcher = ResizeWatcher::spawn(Arc::clone(&master));
        let abort = watcher.abort_handle();
        drop(watcher);

        for _ in 0..100 {
            if abort.is_finished() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("watcher task still running after drop");
    }
}
