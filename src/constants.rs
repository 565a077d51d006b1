use std::os::raw::c_int;

use bitflags::bitflags;

// Open flags
bitflags! {
    /// Flags for [`Dbm::open`](crate::Dbm::open), passed straight through to
    /// the native `dbm_open`. `OpenFlags::empty()` opens read-only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: c_int {
        /// Open for reading and writing.
        const RDWR = libc::O_RDWR;
        /// Create the database if it does not exist.
        const CREATE = libc::O_CREAT;
    }
}

/// File mode used by [`Dbm::open_default`](crate::Dbm::open_default):
/// owner/group read-write, no world access.
pub const DEFAULT_MODE: u32 = 0o660;

// dbm_store modes (DBM_INSERT / DBM_REPLACE)
pub(crate) const STORE_INSERT: c_int = 0;
pub(crate) const STORE_REPLACE: c_int = 1;

/// dbm_store status when an insert finds the key already present.
pub(crate) const STORE_KEY_EXISTS: c_int = 1;

/// BSD ndbm reports a missing key to dbm_delete with this status; gdbm
/// returns -1 and records the miss in the error register instead.
pub(crate) const DELETE_NOT_FOUND: c_int = 1;

/// The engine's dedicated not-found code (GDBM_ITEM_NOT_FOUND). Engines
/// that signal a miss purely through a null data pointer never report it,
/// which is harmless: a zero register with no data also classifies as
/// not-found.
pub(crate) const ENGINE_ITEM_NOT_FOUND: c_int = 15;

/// Register value meaning no error has been recorded since the last clear.
pub(crate) const ENGINE_NO_ERROR: c_int = 0;
