use std::ffi::CString;
use std::os::raw::c_int;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::{
    OpenFlags, DEFAULT_MODE, STORE_INSERT, STORE_KEY_EXISTS, STORE_REPLACE,
};
use crate::datum::{from_datum, to_datum};
use crate::error::{register_means_not_found, Error, Result};
use crate::ffi;
use crate::iter::Item;

/// An open ndbm database.
///
/// The handle exclusively owns the underlying native `DBM*`. It is released
/// exactly once, either by [`Dbm::close`] or on drop.
///
/// The native engine offers no cross-thread safety guarantee, and its error
/// register and iteration cursor are per-handle shared state; `Dbm` is
/// therefore neither `Send` nor `Sync`. Cross-process coordination is the
/// caller's job, via the advisory locks in this crate or otherwise.
pub struct Dbm {
    /// Native handle, valid until `closed` is set
    handle: *mut ffi::DBM,
    /// Path the database was opened at, kept for diagnostics
    path: PathBuf,
    /// Guards against double release; the native layer does not
    closed: bool,
}

impl Dbm {
    /// Open or create the database at `path`.
    ///
    /// `path` is a prefix; the engine owns the file(s) beneath it. `mode`
    /// sets permissions when [`OpenFlags::CREATE`] creates the database.
    pub fn open<P: AsRef<Path>>(path: P, flags: OpenFlags, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let c_path =
            CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::InvalidPath)?;

        let handle =
            unsafe { ffi::dbm_open(c_path.as_ptr(), flags.bits(), mode as libc::mode_t) };
        if handle.is_null() {
            return Err(Error::engine(-1));
        }

        debug!("opened database at {}", path.display());
        Ok(Dbm {
            handle,
            path,
            closed: false,
        })
    }

    /// Open read-write, creating with owner/group read-write permissions.
    pub fn open_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Dbm::open(path, OpenFlags::RDWR | OpenFlags::CREATE, DEFAULT_MODE)
    }

    /// Release the native handle.
    ///
    /// Dropping the handle closes it too; this form only makes the release
    /// point explicit.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        unsafe { ffi::dbm_close(self.handle) };
        self.closed = true;
        debug!("closed database at {}", self.path.display());
    }

    /// Path the database was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw native handle for sibling modules.
    pub(crate) fn handle_ptr(&self) -> *mut ffi::DBM {
        self.handle
    }

    /// Clear the engine's error register.
    ///
    /// The register spans operations, so every fetching or mutating call
    /// clears it first; otherwise a stale code from an earlier call leaks
    /// into the classification of this one.
    pub(crate) fn clear_error(&self) {
        unsafe { ffi::dbm_clearerr(self.handle) };
    }

    /// Read the engine's error register.
    pub(crate) fn error_code(&self) -> c_int {
        unsafe { ffi::dbm_error(self.handle) }
    }

    /// Store a key, failing with [`Error::KeyAlreadyExists`] if it is
    /// present. Never silently overwrites.
    pub fn insert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        match self.store(key, value, STORE_INSERT)? {
            STORE_KEY_EXISTS => Err(Error::KeyAlreadyExists(key.to_vec())),
            _ => Ok(()),
        }
    }

    /// Store a key unconditionally, creating or overwriting.
    pub fn replace(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.store(key, value, STORE_REPLACE)?;
        Ok(())
    }

    fn store(&self, key: &[u8], value: &[u8], mode: c_int) -> Result<c_int> {
        self.clear_error();
        let status =
            unsafe { ffi::dbm_store(self.handle, to_datum(key), to_datum(value), mode) };
        if status < 0 {
            return Err(Error::engine(self.error_code()));
        }
        Ok(status)
    }

    /// Fetch the value stored under `key`.
    pub fn fetch(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.clear_error();
        let datum = unsafe { ffi::dbm_fetch(self.handle, to_datum(key)) };
        match unsafe { from_datum(datum) } {
            Some(value) => Ok(value),
            None => {
                let code = self.error_code();
                if register_means_not_found(code) {
                    Err(Error::KeyNotFound(key.to_vec()))
                } else {
                    Err(Error::engine(code))
                }
            }
        }
    }

    /// Remove the entry stored under `key`.
    ///
    /// Not idempotent: deleting an already-removed key fails with
    /// [`Error::KeyNotFound`].
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.clear_error();
        let status = unsafe { ffi::dbm_delete(self.handle, to_datum(key)) };
        if status == 0 {
            return Ok(());
        }
        // BSD ndbm signals a miss with a positive status; gdbm returns -1
        // and records it in the error register.
        let code = self.error_code();
        if status == crate::constants::DELETE_NOT_FOUND || register_means_not_found(code) {
            Err(Error::KeyNotFound(key.to_vec()))
        } else {
            Err(Error::engine(code))
        }
    }

    /// Apply [`Dbm::replace`] for each item in order.
    ///
    /// Not transactional: on failure a prefix of `items` has been applied
    /// and the remainder has not. The first error is returned.
    pub fn update(&self, items: &[Item]) -> Result<()> {
        for item in items {
            self.replace(&item.key, &item.value)?;
        }
        Ok(())
    }
}

impl AsRawFd for Dbm {
    /// File descriptor of the underlying database file, exposed for
    /// OS-level advisory locking.
    fn as_raw_fd(&self) -> RawFd {
        unsafe { ffi::dbm_dirfno(self.handle) }
    }
}

impl Drop for Dbm {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Dbm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Dbm")
            .field("path", &self.path)
            .field("closed", &self.closed)
            .finish()
    }
}
