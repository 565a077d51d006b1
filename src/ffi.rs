//! Raw declarations for the nine ndbm entry points.
//!
//! The `datum` struct layout is not uniform across engines: gdbm and the
//! BSDs use a `char*` pointer with an `int` length, while the POSIX layout
//! used on macOS carries a `void*` pointer with a `size_t` length. The
//! variant is chosen at build time; everything above this module sees only
//! [`Datum`].

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
use std::os::raw::c_char;
use std::os::raw::c_int;
#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
use std::os::raw::c_void;

/// Opaque native database handle. Only ever used behind a pointer.
#[repr(C)]
pub struct DBM {
    _private: [u8; 0],
}

/// Native buffer descriptor, gdbm/BSD layout.
#[cfg(any(target_os = "linux", target_os = "freebsd"))]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Datum {
    pub dptr: *mut c_char,
    pub dsize: c_int,
}

/// Native buffer descriptor, POSIX layout.
#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Datum {
    pub dptr: *mut c_void,
    pub dsize: libc::size_t,
}

extern "C" {
    pub fn dbm_open(file: *const std::os::raw::c_char, open_flags: c_int, file_mode: libc::mode_t) -> *mut DBM;
    pub fn dbm_close(db: *mut DBM);
    pub fn dbm_store(db: *mut DBM, key: Datum, content: Datum, store_mode: c_int) -> c_int;
    pub fn dbm_fetch(db: *mut DBM, key: Datum) -> Datum;
    pub fn dbm_delete(db: *mut DBM, key: Datum) -> c_int;
    pub fn dbm_firstkey(db: *mut DBM) -> Datum;
    pub fn dbm_nextkey(db: *mut DBM) -> Datum;
    pub fn dbm_dirfno(db: *mut DBM) -> c_int;
    pub fn dbm_clearerr(db: *mut DBM);
    pub fn dbm_error(db: *mut DBM) -> c_int;
}
