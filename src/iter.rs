//! Traversal over all stored keys.
//!
//! The engine exposes exactly two traversal primitives, first-key and
//! next-key, driving a single cursor it holds internally per handle.
//! Consequences the caller must respect:
//!
//! - at most one traversal is live per handle; starting another (or calling
//!   [`Dbm::first_key`]) resets the shared cursor,
//! - interleaving mutation with traversal on the same handle leaves the
//!   cursor position undefined,
//! - traversal order is an artifact of the engine's hash layout and is not
//!   stable across modifications.
//!
//! Each visited key costs one native call, as does each value fetch; the
//! engine has no bulk-export primitive.

use log::debug;

use crate::datum::from_datum;
use crate::dbm::Dbm;
use crate::error::{register_means_not_found, Error, Result};
use crate::ffi::{self, Datum};

/// A key-value pair materialized out of the database.
///
/// Ordering is by key, so a collection of items can be sorted for
/// order-independent comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Item {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Item {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Item {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Dbm {
    /// Reset the engine cursor and return the first key, or `None` for an
    /// empty database.
    pub fn first_key(&self) -> Result<Option<Vec<u8>>> {
        self.clear_error();
        let datum = unsafe { ffi::dbm_firstkey(self.handle_ptr()) };
        self.cursor_result(datum)
    }

    /// Advance the engine cursor, returning `None` at the end of the
    /// traversal.
    pub fn next_key(&self) -> Result<Option<Vec<u8>>> {
        self.clear_error();
        let datum = unsafe { ffi::dbm_nextkey(self.handle_ptr()) };
        self.cursor_result(datum)
    }

    /// A null data pointer from the cursor normally means end of
    /// traversal; only a leftover register value marks it as a failure.
    fn cursor_result(&self, datum: Datum) -> Result<Option<Vec<u8>>> {
        match unsafe { from_datum(datum) } {
            Some(key) => Ok(Some(key)),
            None => {
                let code = self.error_code();
                if register_means_not_found(code) {
                    Ok(None)
                } else {
                    Err(Error::engine(code))
                }
            }
        }
    }

    /// Lazy traversal over all keys, restarting the cursor from the top.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            dbm: self,
            state: KeysState::Start,
        }
    }

    /// Invoke `visitor` for every stored key.
    ///
    /// Stops at the first error the visitor or the cursor raises and
    /// returns it.
    pub fn for_each_key<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        let mut current = self.first_key()?;
        while let Some(key) = current {
            visitor(&key)?;
            current = self.next_key()?;
        }
        Ok(())
    }

    /// Invoke `visitor` for every stored value.
    ///
    /// A key whose fetch fails is skipped rather than reported: under
    /// concurrent external mutation a key handed out by the cursor may be
    /// gone by the time it is fetched. Use [`Dbm::for_each_item`] for the
    /// fail-fast variant.
    pub fn for_each_value<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        self.for_each_key(|key| match self.fetch(key) {
            Ok(value) => visitor(&value),
            Err(err) => {
                debug!("skipping key that vanished during value traversal: {}", err);
                Ok(())
            }
        })
    }

    /// Invoke `visitor` for every stored key-value pair.
    ///
    /// Unlike [`Dbm::for_each_value`], a failed fetch aborts the traversal
    /// and is returned.
    pub fn for_each_item<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<()>,
    {
        self.for_each_key(|key| {
            let value = self.fetch(key)?;
            visitor(key, &value)
        })
    }

    /// All keys, in engine traversal order.
    pub fn all_keys(&self) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        let _ = self.for_each_key(|key| {
            keys.push(key.to_vec());
            Ok(())
        });
        keys
    }

    /// All values, in engine traversal order.
    pub fn all_values(&self) -> Vec<Vec<u8>> {
        let mut values = Vec::new();
        let _ = self.for_each_value(|value| {
            values.push(value.to_vec());
            Ok(())
        });
        values
    }

    /// All key-value pairs, in engine traversal order.
    pub fn all_items(&self) -> Vec<Item> {
        let mut items = Vec::new();
        let _ = self.for_each_item(|key, value| {
            items.push(Item::new(key, value));
            Ok(())
        });
        items
    }

    /// Number of stored entries, counted by a full traversal.
    pub fn count(&self) -> usize {
        let mut count = 0;
        let _ = self.for_each_key(|_| {
            count += 1;
            Ok(())
        });
        count
    }
}

enum KeysState {
    Start,
    Running,
    Done,
}

/// Iterator over all keys of a [`Dbm`].
///
/// Drives the single engine-held cursor: creating a second `Keys` for the
/// same handle, or mutating during iteration, disturbs any traversal
/// already in progress. The iterator is fused; after the end or an error it
/// keeps returning `None`.
pub struct Keys<'a> {
    dbm: &'a Dbm,
    state: KeysState,
}

impl Iterator for Keys<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.state {
            KeysState::Start => self.dbm.first_key(),
            KeysState::Running => self.dbm.next_key(),
            KeysState::Done => return None,
        };
        match step {
            Ok(Some(key)) => {
                self.state = KeysState::Running;
                Some(Ok(key))
            }
            Ok(None) => {
                self.state = KeysState::Done;
                None
            }
            Err(err) => {
                self.state = KeysState::Done;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Keys<'_> {}
