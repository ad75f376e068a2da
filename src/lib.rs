//! # radix-symtab
//!
//! A symbol table mapping byte-string keys to non-zero `u32` values, stored
//! as an edge-compressed radix tree.
//!
//! Besides exact lookup, insertion and removal, the tree answers two prefix
//! queries: unambiguous completion of a prefix and bounded enumeration of the
//! keys that start with it. `0` is the absent sentinel and cannot be stored.
//!
//! ## Example
//!
//! ```rust
//! use radix_symtab::RadixMap;
//!
//! let mut tab = RadixMap::new();
//! tab.put(b"symtab_create", 1).unwrap();
//! tab.put(b"symtab_destroy", 2).unwrap();
//! tab.put(b"main", 3).unwrap();
//!
//! assert_eq!(tab.get(b"main"), Some(3));
//!
//! let mut buf = Vec::with_capacity(64);
//! buf.extend_from_slice(b"sy");
//! assert!(tab.complete(&mut buf).unwrap());
//! assert_eq!(buf, b"symtab_");
//!
//! let keys: Vec<_> = tab.prefix_iter(b"symtab_").map(|(k, _)| k).collect();
//! assert_eq!(keys.len(), 2);
//! ```
//!
//! [`LinearMap`] offers the same operations over a flat slot array, and
//! [`LockedMap`] serializes access to either map behind a reader/writer lock.

#![deny(unsafe_op_in_unsafe_fn)]

mod debug;
mod error;
mod linear;
mod node;
mod prefix;
mod radix;
mod shared;
mod walk;

pub use error::{Result, SymtabError};
pub use linear::LinearMap;
pub use prefix::PrefixIter;
pub use radix::RadixMap;
pub use shared::LockedMap;

/// Construction options shared by both map implementations.
#[derive(Debug, Clone)]
pub struct Config {
    /// Expected number of keys; used to reserve storage up front.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
        }
    }
}

/// The operation contract common to [`RadixMap`] and [`LinearMap`].
pub trait SymbolMap {
    /// Inserts or updates `key`, returning the previous value. `value` must
    /// be non-zero.
    fn put(&mut self, key: &[u8], value: u32) -> Result<Option<u32>>;

    fn get(&self, key: &[u8]) -> Option<u32>;

    /// Removes `key`, returning its value.
    fn remove(&mut self, key: &[u8]) -> Option<u32>;

    /// Extends `buf` to the longest prefix shared by every key that starts
    /// with it, without growing the buffer. Returns whether `buf` changed.
    fn complete(&self, buf: &mut Vec<u8>) -> Result<bool>;

    /// Calls `f` once per key starting with `buf`, at most `max_results`
    /// times unless it is `0`. Returns the number of calls.
    fn prefix_for_each(
        &self,
        buf: &mut Vec<u8>,
        max_results: usize,
        f: &mut dyn FnMut(&[u8], u32),
    ) -> Result<usize>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

macro_rules! impl_symbol_map {
    ($ty:ty) => {
        impl SymbolMap for $ty {
            fn put(&mut self, key: &[u8], value: u32) -> Result<Option<u32>> {
                <$ty>::put(self, key, value)
            }

            fn get(&self, key: &[u8]) -> Option<u32> {
                <$ty>::get(self, key)
            }

            fn remove(&mut self, key: &[u8]) -> Option<u32> {
                <$ty>::remove(self, key)
            }

            fn complete(&self, buf: &mut Vec<u8>) -> Result<bool> {
                <$ty>::complete(self, buf)
            }

            fn prefix_for_each(
                &self,
                buf: &mut Vec<u8>,
                max_results: usize,
                f: &mut dyn FnMut(&[u8], u32),
            ) -> Result<usize> {
                <$ty>::prefix_for_each(self, buf, max_results, f)
            }

            fn len(&self) -> usize {
                <$ty>::len(self)
            }
        }
    };
}

impl_symbol_map!(RadixMap);
impl_symbol_map!(LinearMap);


#[cfg(test)]
mod proptests;
