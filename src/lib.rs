// src/lib.rs
mod constants;
mod datum;
mod dbm;
mod error;
mod ffi;
mod iter;
mod lock;

pub use constants::{OpenFlags, DEFAULT_MODE};
pub use dbm::Dbm;
pub use error::{Error, Result};
pub use iter::{Item, Keys};
