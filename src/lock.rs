//! Advisory file locking for multi-process coordination.
//!
//! A thin pass-through to `flock(2)` on the database file descriptor. The
//! lock is advisory: it coordinates only processes that also take it, and
//! this crate never takes it on its own behalf. All requests are
//! non-blocking; contention surfaces as [`Error::AlreadyLocked`].

use std::io;
use std::os::raw::c_int;
use std::os::unix::io::AsRawFd;

use crate::dbm::Dbm;
use crate::error::{Error, Result};

impl Dbm {
    /// Take a shared (read) lock without blocking.
    pub fn try_lock_shared(&self) -> Result<()> {
        self.flock(libc::LOCK_SH | libc::LOCK_NB)
    }

    /// Take an exclusive (write) lock without blocking.
    pub fn try_lock_exclusive(&self) -> Result<()> {
        self.flock(libc::LOCK_EX | libc::LOCK_NB)
    }

    /// Release a previously taken advisory lock.
    pub fn unlock(&self) -> Result<()> {
        self.flock(libc::LOCK_UN)
    }

    fn flock(&self, operation: c_int) -> Result<()> {
        let rc = unsafe { libc::flock(self.as_raw_fd(), operation) };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::WouldBlock {
            Err(Error::AlreadyLocked)
        } else {
            Err(Error::Engine {
                code: -1,
                errno: err.raw_os_error(),
            })
        }
    }
}
