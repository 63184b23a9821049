use std::fs::{self, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::error::{Error, Result};

/// A single-writer lock implemented as an exclusively-created PID file,
/// rather than an advisory `flock`: `acquire` retries `O_CREAT|O_EXCL`
/// against the lock path until it wins, times out, or hits an
/// unrecoverable I/O error, and `release` refuses to remove a lock file
/// this process doesn't own.
pub struct WriterLock {
    path: PathBuf,
    held: bool,
}

impl WriterLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WriterLock { path: path.into(), held: false }
    }

    /// Try to acquire the lock, retrying until `timeout` elapses. `None`
    /// retries forever; `Some(Duration::ZERO)` fails immediately if held.
    pub fn acquire(&mut self, timeout: Option<Duration>) -> Result<()> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            match Self::write_pid_file(&self.path) {
                Ok(()) => {
                    self.held = true;
                    return Ok(());
                }
                Err(err) if err.kind() == IoErrorKind::AlreadyExists => {
                    if let Some(deadline) = deadline {
                        if Instant::now() >= deadline {
                            return Err(if timeout == Some(Duration::ZERO) {
                                Error::LockAlreadyHeld
                            } else {
                                Error::LockTimeout
                            });
                        }
                    }
                    thread::sleep(Duration::from_millis(100));
                }
                Err(err) => return Err(Error::LockFailed(err.to_string())),
            }
        }
    }

    /// Release the lock, failing if it isn't held or is held by another
    /// process (e.g. this `WriterLock` was never the one that acquired it).
    pub fn release(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Err(Error::LockNotHeld);
        }
        if Self::read_pid(&self.path)? != std::process::id() {
            return Err(Error::LockNotMine);
        }
        fs::remove_file(&self.path)?;
        self.held = false;
        Ok(())
    }

    fn write_pid_file(path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create_new(true).write(true).open(path)?;
        write!(file, "{}\n", std::process::id())
    }

    fn read_pid(path: &Path) -> Result<u32> {
        let mut contents = String::new();
        fs::File::open(path)?.read_to_string(&mut contents)?;
        contents
            .trim()
            .parse()
            .map_err(|_| Error::LockFailed(format!("lock file {} does not contain a valid pid", path.display())))
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        if self.held {
            let _ = self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquires_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.lock");
        let mut lock = WriterLock::new(&path);
        lock.acquire(Some(Duration::from_millis(100))).unwrap();
        assert!(path.exists());
        lock.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn second_acquire_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.lock");
        let mut first = WriterLock::new(&path);
        first.acquire(None).unwrap();

        let mut second = WriterLock::new(&path);
        let err = second.acquire(Some(Duration::from_millis(150))).unwrap_err();
        assert!(matches!(err, Error::LockTimeout));
    }

    #[test]
    fn zero_timeout_reports_already_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.lock");
        let mut first = WriterLock::new(&path);
        first.acquire(None).unwrap();

        let mut second = WriterLock::new(&path);
        let err = second.acquire(Some(Duration::ZERO)).unwrap_err();
        assert!(matches!(err, Error::LockAlreadyHeld));
    }

    #[test]
    fn release_without_holding_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.lock");
        let mut lock = WriterLock::new(&path);
        assert!(matches!(lock.release().unwrap_err(), Error::LockNotHeld));
    }
}
