//! Helpers shared by the unit tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

/// Held while a test has moved the process into another directory.
static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Runs a test from `dir`, for checking that stages inherit the caller's
/// working directory. The previous directory is restored on drop.
pub(crate) struct DirGuard {
    restore_to: PathBuf,
    _cwd: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(dir: &Path) -> Self {
        // The cwd is process-wide; `#[serial]` alone does not cover helpers.
        let cwd = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let restore_to = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self {
            restore_to,
            _cwd: cwd,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.restore_to);
    }
}

/// In-memory echo sink that can be inspected after a run.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|poison| poison.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        let mut buf = self.0.lock().unwrap_or_else(|poison| poison.into_inner());
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Argument vector for `sh -c <script>`.
pub(crate) fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}
