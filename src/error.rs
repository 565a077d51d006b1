use std::io;
use std::os::raw::c_int;
use std::result;

use crate::constants::{ENGINE_ITEM_NOT_FOUND, ENGINE_NO_ERROR};

/// Custom result type for database operations
pub type Result<T> = result::Result<T, Error>;

/// Errors reported by the database layer.
///
/// Native status codes, the engine's error register, and `errno` are all
/// normalized into this taxonomy; callers match on the variant and never see
/// a raw return code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Insert found the key already present; the stored value is unchanged.
    KeyAlreadyExists(Vec<u8>),
    /// Fetch or delete addressed a key that is not in the database.
    KeyNotFound(Vec<u8>),
    /// The native engine reported a failure. `code` is the engine's error
    /// register value (-1 when the engine exposed none) and `errno` the
    /// system error captured at the call site, when one was set.
    Engine { code: c_int, errno: Option<i32> },
    /// A non-blocking advisory lock request found the file already locked.
    AlreadyLocked,
    /// The database path contains an interior NUL byte and cannot be passed
    /// to the native engine.
    InvalidPath,
}

impl Error {
    /// Engine failure carrying the current system error, if any.
    pub(crate) fn engine(code: c_int) -> Error {
        Error::Engine {
            code,
            errno: io::Error::last_os_error().raw_os_error().filter(|&e| e != 0),
        }
    }
}

/// Whether an error-register value, read after a call that produced no
/// data, means the key is genuinely absent. Engines disagree here: gdbm
/// records a dedicated not-found code, while BSD ndbm records nothing at
/// all, so both a cleared register and the not-found code classify as a
/// miss. Any other value is a real engine failure.
pub(crate) fn register_means_not_found(register: c_int) -> bool {
    register == ENGINE_NO_ERROR || register == ENGINE_ITEM_NOT_FOUND
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::KeyAlreadyExists(key) => {
                write!(f, "Key already exists: {}", String::from_utf8_lossy(key))
            }
            Error::KeyNotFound(key) => {
                write!(f, "Key not found: {}", String::from_utf8_lossy(key))
            }
            Error::Engine { code, errno } => {
                write!(f, "Engine error (code {})", code)?;
                if let Some(errno) = errno {
                    write!(f, ": {}", io::Error::from_raw_os_error(*errno))?;
                }
                Ok(())
            }
            Error::AlreadyLocked => write!(f, "Database file is already locked"),
            Error::InvalidPath => write!(f, "Database path contains an interior NUL byte"),
        }
    }
}
