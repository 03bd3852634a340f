use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Detects modifications of a single file by polling its modification time.
pub struct FileWatcher {
    path: PathBuf,
    last_mtime: Option<SystemTime>,
    last_poll: Option<Instant>,
}

impl FileWatcher {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            last_mtime: file_mtime(path),
            last_poll: None,
        }
    }

    /// Check the file if at least [`POLL_INTERVAL`] passed since the last check.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_poll {
            if now.duration_since(last) < POLL_INTERVAL {
                return false;
            }
        }
        self.last_poll = Some(now);
        self.check()
    }

    /// Returns true exactly once per observed change of the modification time.
    /// A file that disappears is not reported until it comes back.
    pub fn check(&mut self) -> bool {
        let Some(current) = file_mtime(&self.path) else {
            return false;
        };
        if self.last_mtime == Some(current) {
            return false;
        }
        log::debug!("{} changed on disk", self.path.display());
        self.last_mtime = Some(current);
        true
    }

    /// Forget pending changes, e.g. after a manual reload.
    pub fn sync(&mut self) {
        self.last_mtime = file_mtime(&self.path);
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}
