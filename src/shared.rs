//! Reader/writer serialization around a whole map.
//!
//! The maps themselves do no locking. [`LockedMap`] takes the shared lock for
//! lookups and enumeration and the exclusive lock for mutation, so every
//! call observes a tree that satisfies its invariants.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::SymbolMap;

pub struct LockedMap<M> {
    inner: RwLock<M>,
}

impl<M: SymbolMap> LockedMap<M> {
    pub fn new(map: M) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }

    pub fn put(&self, key: impl AsRef<[u8]>, value: u32) -> Result<Option<u32>> {
        self.inner.write().put(key.as_ref(), value)
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<u32> {
        self.inner.read().get(key.as_ref())
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().contains_key(key.as_ref())
    }

    pub fn remove(&self, key: impl AsRef<[u8]>) -> Option<u32> {
        self.inner.write().remove(key.as_ref())
    }

    pub fn complete(&self, buf: &mut Vec<u8>) -> Result<bool> {
        self.inner.read().complete(buf)
    }

    /// Enumerates under the shared lock; `f` must not call back into this map
    /// for writing.
    pub fn prefix_for_each<F>(
        &self,
        buf: &mut Vec<u8>,
        max_results: usize,
        mut f: F,
    ) -> Result<usize>
    where
        F: FnMut(&[u8], u32),
    {
        self.inner.read().prefix_for_each(buf, max_results, &mut f)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Holds the shared lock for a sequence of reads.
    pub fn read(&self) -> RwLockReadGuard<'_, M> {
        self.inner.read()
    }

    /// Holds the exclusive lock for a sequence of mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, M> {
        self.inner.write()
    }

    pub fn into_inner(self) -> M {
        self.inner.into_inner()
    }
}

impl<M: SymbolMap + Default> Default for LockedMap<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}
