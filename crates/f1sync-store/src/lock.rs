//! Single-run lock file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;

/// Lock file holding the PID of the run currently driving the site.
///
/// Released when dropped.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    locked: bool,
}

impl RunLock {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            locked: false,
        }
    }

    /// Create and acquire in one step.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut lock = Self::new(path);
        lock.try_acquire()?;
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// PID recorded in the lock file, if any.
    pub fn read_pid(&self) -> Result<Option<u32>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.lock_error(e))?;
        let pid = contents
            .trim()
            .parse::<u32>()
            .map_err(|e| StoreError::LockFile {
                path: self.path.clone(),
                reason: format!("Invalid PID format: {}", e),
            })?;

        Ok(Some(pid))
    }

    /// Take the lock, clearing a lock left behind by a dead process.
    ///
    /// The lock file appears atomically with its PID already written. A file
    /// naming a live process, this one included, means the lock is held.
    pub fn try_acquire(&mut self) -> Result<(), StoreError> {
        if self.locked {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.lock_error(e))?;
        }

        let pid = std::process::id();
        for attempt in 0..2 {
            match self.create_exclusive(pid) {
                Ok(()) => {
                    self.locked = true;
                    debug!("Lock acquired: {} (PID: {})", self.path.display(), pid);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt == 0 => {
                    self.clear_stale()?;
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    let pid = self.read_pid().ok().flatten().unwrap_or(0);
                    return Err(StoreError::Locked {
                        path: self.path.clone(),
                        pid,
                    });
                }
                Err(e) => return Err(self.lock_error(e)),
            }
        }
        Err(StoreError::LockFile {
            path: self.path.clone(),
            reason: "lock file kept reappearing".to_string(),
        })
    }

    /// Publish a lock file holding `pid`; fails with `AlreadyExists` if one
    /// is present.
    fn create_exclusive(&self, pid: u32) -> std::io::Result<()> {
        let mut staged = self.path.as_os_str().to_owned();
        staged.push(format!(".{}.tmp", pid));
        let staged = PathBuf::from(staged);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staged)?;
        write!(file, "{}", pid)?;
        file.sync_all()?;
        drop(file);

        let linked = fs::hard_link(&staged, &self.path);
        let _ = fs::remove_file(&staged);
        linked
    }

    /// Remove the existing lock file if its holder is gone.
    fn clear_stale(&self) -> Result<(), StoreError> {
        match self.read_pid() {
            Ok(Some(pid)) if is_process_running(pid) => Err(StoreError::Locked {
                path: self.path.clone(),
                pid,
            }),
            Ok(Some(pid)) => {
                warn!(
                    "Removing stale lock file (PID {} not running): {}",
                    pid,
                    self.path.display()
                );
                self.remove_existing()
            }
            Ok(None) => Ok(()),
            Err(StoreError::LockFile { reason, .. }) => {
                warn!("Removing unreadable lock file {}: {}", self.path.display(), reason);
                self.remove_existing()
            }
            Err(e) => Err(e),
        }
    }

    fn remove_existing(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.lock_error(e)),
        }
    }

    /// Remove the lock file if this instance holds it.
    pub fn release(&mut self) -> Result<(), StoreError> {
        if !self.locked {
            return Ok(());
        }
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.lock_error(e))?;
        }
        self.locked = false;
        debug!("Lock released: {}", self.path.display());
        Ok(())
    }

    fn lock_error(&self, e: std::io::Error) -> StoreError {
        StoreError::LockFile {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to remove lock file on drop: {}", e);
        }
    }
}

/// Check if a process with the given PID is running.
#[cfg(unix)]
pub(crate) fn is_process_running(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    // Signal 0 only checks for existence; EPERM means it exists under another user.
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn is_process_running(_pid: u32) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_lock() -> (TempDir, RunLock) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");
        (dir, RunLock::new(path))
    }

    #[test]
    fn test_acquire_and_release() {
        let (_dir, mut lock) = temp_lock();
        lock.try_acquire().unwrap();

        assert!(lock.is_locked());
        assert_eq!(lock.read_pid().unwrap(), Some(std::process::id()));

        lock.release().unwrap();
        assert!(!lock.is_locked());
        assert!(!lock.path().exists());
    }

    #[test]
    fn test_drop_releases() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");
        {
            let _lock = RunLock::acquire(&path).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_live_holder_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");
        // PID 1 is always alive on unix.
        fs::write(&path, "1").unwrap();

        let err = RunLock::acquire(&path).unwrap_err();
        assert!(matches!(err, StoreError::Locked { pid: 1, .. }));
        // The foreign lock is left in place.
        assert!(path.exists());
    }

    #[test]
    fn test_stale_lock_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let dead = child.id();
        child.wait().unwrap();
        fs::write(&path, dead.to_string()).unwrap();

        let lock = RunLock::acquire(&path).unwrap();
        assert_eq!(lock.read_pid().unwrap(), Some(std::process::id()));
    }

    #[test]
    fn test_garbage_lock_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");
        fs::write(&path, "not-a-pid").unwrap();

        let lock = RunLock::acquire(&path).unwrap();
        assert!(lock.is_locked());
    }

    #[test]
    fn test_second_acquire_in_same_process_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");

        let first = RunLock::acquire(&path).unwrap();
        let err = RunLock::acquire(&path).unwrap_err();
        let own = std::process::id();
        assert!(matches!(err, StoreError::Locked { pid, .. } if pid == own));

        // The refused attempt leaves the holder's file alone.
        assert!(path.exists());
        drop(first);
        assert!(!path.exists());

        let again = RunLock::acquire(&path).unwrap();
        assert!(again.is_locked());
    }

    #[test]
    fn test_acquire_leaves_only_the_lock_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f1sync.lock");
        let _lock = RunLock::acquire(&path).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("f1sync.lock")]);
    }

    #[test]
    fn test_try_acquire_twice_on_same_guard() {
        let (_dir, mut lock) = temp_lock();
        lock.try_acquire().unwrap();
        lock.try_acquire().unwrap();
        assert!(lock.is_locked());
    }

    #[test]
    fn test_release_without_acquire_keeps_foreign_file() {
        let (_dir, mut lock) = temp_lock();
        fs::write(lock.path(), "1").unwrap();
        lock.release().unwrap();
        assert!(lock.path().exists());
    }

    #[test]
    fn test_current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }
}
