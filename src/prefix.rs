//! Prefix completion and prefix enumeration.
//!
//! Both operations write into a caller-owned key buffer. The buffer's spare
//! capacity bounds how far it may be extended: these functions never grow it
//! and report [`SymtabError::BufferTooSmall`] instead.

use crate::error::{ensure_capacity, Result, SymtabError};
use crate::node::{NodeArena, NodeId};
use crate::radix::RadixMap;
use crate::walk::End;

use smallvec::SmallVec;

impl RadixMap {
    /// Extends `buf` to the longest string that every stored key starting
    /// with `buf` also starts with.
    ///
    /// Returns `Ok(false)` and leaves `buf` untouched when the prefix already
    /// names a stored key or a branch point, or when no key starts with it.
    pub fn complete(&self, buf: &mut Vec<u8>) -> Result<bool> {
        let path = self.walk(buf.as_slice());
        let node = path.last();

        let tail: &[u8] = match path.end {
            End::Inside { matched } => &self.nodes[node].label[matched..],
            // Only the root can be a value-less node with a single child.
            End::Exact
                if self.nodes[node].value.is_none()
                    && self.nodes.child_count_up_to(node, 1) == 1 =>
            {
                match self.nodes[node].child {
                    Some(child) => &self.nodes[child].label,
                    None => return Ok(false),
                }
            }
            _ => return Ok(false),
        };

        ensure_capacity(buf, buf.len() + tail.len())?;
        buf.extend_from_slice(tail);
        Ok(true)
    }

    /// Calls `f` with every stored key starting with `buf`, up to
    /// `max_results` times (`0` means unlimited). Returns the number of calls.
    ///
    /// During each call `buf` holds the full matched key; it is restored to
    /// the original prefix before returning, including on error. Keys are
    /// visited depth first, a key before its extensions, siblings in the
    /// order they were inserted.
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
        let capacity = buf.capacity();
        let mut cursor = Cursor::seek(self, buf.as_slice());
        let mut calls = 0usize;

        let outcome = loop {
            if max_results != 0 && calls == max_results {
                break Ok(calls);
            }
            match cursor.advance(&self.nodes, buf, Some(capacity)) {
                Ok(Some(value)) => {
                    f(buf.as_slice(), value);
                    calls += 1;
                }
                Ok(None) => break Ok(calls),
                Err(e) => break Err(e),
            }
        };

        buf.truncate(original);
        outcome
    }

    /// Lazily yields every stored key starting with `prefix`, in the same
    /// order as [`RadixMap::prefix_for_each`]. Bound the sequence with
    /// [`Iterator::take`].
    pub fn prefix_iter(&self, prefix: &[u8]) -> PrefixIter<'_> {
        let key = prefix.to_vec();
        let cursor = Cursor::seek(self, &key);
        PrefixIter {
            nodes: &self.nodes,
            cursor,
            key,
        }
    }

    /// Yields all entries in enumeration order.
    pub fn iter(&self) -> PrefixIter<'_> {
        self.prefix_iter(b"")
    }
}

/// Pending work of a depth-first enumeration: each entry is a node plus the
/// key length at which its label starts.
struct Cursor {
    stack: Vec<(NodeId, usize)>,
}

impl Cursor {
    /// Positions the cursor on the subtree whose keys all start with `prefix`.
    fn seek(map: &RadixMap, prefix: &[u8]) -> Self {
        let path = map.walk(prefix);
        let node = path.last();
        let start = match path.end {
            End::Exact => Some(prefix.len() - map.nodes[node].label.len()),
            End::Inside { matched } => Some(prefix.len() - matched),
            End::Diverged { .. } | End::Vacant { .. } => None,
        };
        Self {
            stack: start.map(|base| (node, base)).into_iter().collect(),
        }
    }

    /// Rewrites `key` to the next value-bearing node's full key and returns
    /// its value. `limit` caps the key length.
    fn advance(
        &mut self,
        nodes: &NodeArena,
        key: &mut Vec<u8>,
        limit: Option<usize>,
    ) -> Result<Option<u32>> {
        while let Some((id, base)) = self.stack.pop() {
            let node = &nodes[id];
            let end = base + node.label.len();
            if let Some(capacity) = limit {
                if end > capacity {
                    return Err(SymtabError::BufferTooSmall {
                        needed: end,
                        capacity,
                    });
                }
            }
            key.truncate(base);
            key.extend_from_slice(&node.label);

            let children: SmallVec<[NodeId; 8]> = nodes.siblings(node.child).collect();
            self.stack.extend(children.into_iter().rev().map(|c| (c, end)));

            if let Some(value) = node.value {
                return Ok(Some(value.get()));
            }
        }
        Ok(None)
    }
}

/// Iterator returned by [`RadixMap::prefix_iter`].
pub struct PrefixIter<'a> {
    nodes: &'a NodeArena,
    cursor: Cursor,
    key: Vec<u8>,
}

impl Iterator for PrefixIter<'_> {
    type Item = (Vec<u8>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        // The iterator owns its key buffer and may grow it freely.
        match self.cursor.advance(self.nodes, &mut self.key, None) {
            Ok(Some(value)) => Some((self.key.clone(), value)),
            Ok(None) | Err(_) => None,
        }
    }
}
