//! Marshalling between byte slices and the native buffer descriptor.
//!
//! Data crosses the boundary by copy in both directions: a [`Datum`] built
//! by [`to_datum`] borrows the caller's slice only for the duration of one
//! native call, and [`from_datum`] copies out of engine-owned memory before
//! returning, so no aliasing survives a call.

use crate::ffi::Datum;

/// Build a native descriptor borrowing `bytes`.
///
/// Valid for zero-length input: `as_ptr` on an empty slice is still
/// non-null, and the engine never dereferences a descriptor with a zero
/// length.
#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub(crate) fn to_datum(bytes: &[u8]) -> Datum {
    Datum {
        dptr: bytes.as_ptr() as *mut std::os::raw::c_char,
        dsize: bytes.len() as std::os::raw::c_int,
    }
}

/// Build a native descriptor borrowing `bytes` (POSIX layout).
#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
pub(crate) fn to_datum(bytes: &[u8]) -> Datum {
    Datum {
        dptr: bytes.as_ptr() as *mut std::os::raw::c_void,
        dsize: bytes.len() as libc::size_t,
    }
}

/// Copy a native descriptor out into owned bytes.
///
/// A null `dptr` is the engine's shared "no data" signal across all layout
/// variants and maps to `None`.
///
/// # Safety
///
/// A non-null `dptr` must point at `dsize` readable bytes that stay valid
/// for the duration of this call.
pub(crate) unsafe fn from_datum(datum: Datum) -> Option<Vec<u8>> {
    if datum.dptr.is_null() {
        return None;
    }
    let bytes = std::slice::from_raw_parts(datum.dptr as *const u8, datum.dsize as usize);
    Some(bytes.to_vec())
}
