//! Flat-array symbol table with linear-scan lookup.
//!
//! Every operation scans the slot array, so each call costs O(n). It serves
//! as the baseline the radix tree is measured against and as a reference
//! model in tests.

use std::num::NonZeroU32;

use crate::error::{ensure_capacity, Result, SymtabError};
use crate::walk::common_prefix_len;
use crate::Config;

#[derive(Clone, Debug)]
struct Slot {
    key: Box<[u8]>,
    value: NonZeroU32,
}

/// A symbol table stored as an unordered array of slots.
///
/// Removed slots are left empty and reused by the next insertion, so
/// enumeration follows slot order rather than key order.
#[derive(Clone, Debug, Default)]
pub struct LinearMap {
    slots: Vec<Option<Slot>>,
    count: usize,
}

impl LinearMap {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config {
            initial_capacity: capacity,
        })
    }

    pub fn with_config(config: Config) -> Self {
        tracing::debug!(initial_capacity = config.initial_capacity, "creating linear map");
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn find(&self, key: &[u8]) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| &*s.key == key))
    }

    fn entries(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().flatten()
    }

    pub fn get(&self, key: &[u8]) -> Option<u32> {
        self.find(key)
            .and_then(|i| self.slots[i].as_ref())
            .map(|s| s.value.get())
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    pub fn put(&mut self, key: &[u8], value: u32) -> Result<Option<u32>> {
        let value = NonZeroU32::new(value).ok_or(SymtabError::InvalidValue)?;
        if let Some(slot) = self.find(key).and_then(|i| self.slots[i].as_mut()) {
            let old = std::mem::replace(&mut slot.value, value);
            return Ok(Some(old.get()));
        }

        let slot = Slot {
            key: key.into(),
            value,
        };
        match self.slots.iter().position(Option::is_none) {
            Some(free) => self.slots[free] = Some(slot),
            None => self.slots.push(Some(slot)),
        }
        self.count += 1;
        Ok(None)
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<u32> {
        let slot = self.find(key).and_then(|i| self.slots[i].take())?;
        self.count -= 1;
        Some(slot.value.get())
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.count = 0;
    }

    /// Extends `buf` to the longest common prefix of all keys starting with
    /// it. See [`crate::RadixMap::complete`].
    pub fn complete(&self, buf: &mut Vec<u8>) -> Result<bool> {
        let prefix = buf.as_slice();
        let mut common: Option<&[u8]> = None;
        for slot in self.entries().filter(|s| s.key.starts_with(prefix)) {
            let key = &slot.key[..];
            common = Some(match common {
                None => key,
                Some(c) => &c[..common_prefix_len(c, key)],
            });
        }

        match common {
            Some(c) if c.len() > buf.len() => {
                ensure_capacity(buf, c.len())?;
                let tail = &c[buf.len()..];
                buf.extend_from_slice(tail);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Calls `f` for every key starting with `buf` in slot order. See
    /// [`crate::RadixMap::prefix_for_each`].
    pub fn prefix_for_each<F>(
        &self,
        buf: &mut Vec<u8>,
        max_results: usize,
        mut f: F,
    ) -> Result<usize>
    where
        F: FnMut(&[u8], u32),
    {
        let original = buf.len();
        let mut calls = 0usize;
        for slot in self.entries() {
            if max_results != 0 && calls == max_results {
                break;
            }
            if !slot.key.starts_with(&buf[..original]) {
                continue;
            }
            if let Err(e) = ensure_capacity(buf, slot.key.len()) {
                buf.truncate(original);
                return Err(e);
            }
            buf.truncate(original);
            buf.extend_from_slice(&slot.key[original..]);
            f(buf.as_slice(), slot.value.get());
            calls += 1;
        }
        buf.truncate(original);
        Ok(calls)
    }

    /// Lazily yields every key starting with `prefix`, in slot order.
    pub fn prefix_iter<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = (Vec<u8>, u32)> + 'a {
        self.entries()
            .filter(move |s| s.key.starts_with(prefix))
            .map(|s| (s.key.to_vec(), s.value.get()))
    }
}
