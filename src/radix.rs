//! Edge-compressed radix tree keyed by byte strings.

use std::num::NonZeroU32;

use smallvec::SmallVec;

use crate::error::{Result, SymtabError};
use crate::node::{Node, NodeArena, NodeId};
use crate::walk::{walk, End, Path};
use crate::Config;

/// A symbol table stored as an edge-compressed radix tree.
///
/// Nodes carry a byte label, an optional value and child/sibling links.
/// Between public calls the tree keeps these invariants:
/// - the root label is empty, every other label is non-empty
/// - siblings start with pairwise distinct bytes
/// - a value-less node other than the root never has exactly one child
///
/// The root's value slot holds the value of the empty key.
pub struct RadixMap {
    pub(crate) nodes: NodeArena,
    count: usize,
}

impl RadixMap {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty map, reserving node slots for roughly `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config {
            initial_capacity: capacity,
        })
    }

    pub fn with_config(config: Config) -> Self {
        tracing::debug!(initial_capacity = config.initial_capacity, "creating radix map");
        Self {
            nodes: NodeArena::with_capacity(config.initial_capacity),
            count: 0,
        }
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.live()
    }

    pub fn memory_usage(&self) -> usize {
        self.nodes.memory_usage()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub(crate) fn walk(&self, key: &[u8]) -> Path {
        walk(&self.nodes, key)
    }

    pub fn get(&self, key: &[u8]) -> Option<u32> {
        let path = self.walk(key);
        match path.end {
            End::Exact => self.nodes[path.last()].value.map(NonZeroU32::get),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or updates `key`, returning the previous value.
    ///
    /// `value` must be non-zero; `0` is rejected with
    /// [`SymtabError::InvalidValue`] and leaves the map untouched.
    pub fn put(&mut self, key: &[u8], value: u32) -> Result<Option<u32>> {
        let value = NonZeroU32::new(value).ok_or(SymtabError::InvalidValue)?;
        let path = self.walk(key);
        let node = path.last();

        match path.end {
            End::Exact => {
                let old = self.nodes[node].value.replace(value);
                if old.is_none() {
                    self.count += 1;
                }
                return Ok(old.map(NonZeroU32::get));
            }
            End::Vacant { tail } => {
                let leaf = self.nodes.alloc(Node::leaf(&key[path.rest_at..], value));
                match tail {
                    Some(last) => self.nodes[last].next = Some(leaf),
                    None => self.nodes[node].child = Some(leaf),
                }
            }
            End::Inside { matched } => {
                self.split(node, matched);
                self.nodes[node].value = Some(value);
            }
            End::Diverged { matched } => {
                let suffix = self.split(node, matched);
                let leaf = self.nodes.alloc(Node::leaf(&key[path.rest_at..], value));
                self.nodes[suffix].next = Some(leaf);
            }
        }

        self.count += 1;
        Ok(None)
    }

    /// Removes `key`, returning its value. Absent keys leave the tree untouched.
    pub fn remove(&mut self, key: &[u8]) -> Option<u32> {
        let path = self.walk(key);
        if path.end != End::Exact {
            return None;
        }

        let mut frames = path.frames;
        let target = frames.pop()?;
        let old = self.nodes[target.node].value.take()?;
        self.count -= 1;

        // The empty key lives on the root, which is exempt from compression.
        let Some(&parent) = frames.last() else {
            return Some(old.get());
        };

        if self.nodes[target.node].has_children() {
            self.compress(target.node);
        } else {
            self.unlink(target.node, parent.node, target.prev);
            self.nodes.free(target.node);
        }

        // Walk back up until a node no longer needs merging.
        while let Some(frame) = frames.pop() {
            if frame.node == NodeId::ROOT || !self.compress(frame.node) {
                break;
            }
        }

        Some(old.get())
    }

    /// Removes every key, releasing nodes with an explicit work list so the
    /// teardown depth never depends on the tree's shape.
    pub fn clear(&mut self) {
        let mut pending: Vec<NodeId> = self.nodes[NodeId::ROOT].child.into_iter().collect();
        let mut released = 0usize;
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id];
            pending.extend(node.next);
            pending.extend(node.child);
            self.nodes.free(id);
            released += 1;
        }
        let root = &mut self.nodes[NodeId::ROOT];
        root.child = None;
        root.value = None;
        self.count = 0;
        tracing::debug!(released, "cleared radix map");
    }

    /// Drops all nodes and their slots at once.
    pub fn reset(&mut self) {
        self.nodes.reset();
        self.count = 0;
    }

    /// Breaks `id`'s edge after `at` bytes. `id` keeps the head of the label
    /// as a value-less branch point; a new node takes the tail together with
    /// the old value and children, becoming `id`'s only child.
    fn split(&mut self, id: NodeId, at: usize) -> NodeId {
        let node = &mut self.nodes[id];
        debug_assert!(at > 0 && at < node.label.len());
        let tail = Node {
            label: SmallVec::from_slice(&node.label[at..]),
            value: node.value.take(),
            child: node.child.take(),
            next: None,
        };
        node.label.truncate(at);
        let tail = self.nodes.alloc(tail);
        self.nodes[id].child = Some(tail);
        tracing::trace!(at, "split edge");
        tail
    }

    /// Merges a value-less node with its only child. Returns whether a merge
    /// happened.
    fn compress(&mut self, id: NodeId) -> bool {
        if self.nodes[id].value.is_some() || self.nodes.child_count_up_to(id, 1) != 1 {
            return false;
        }
        let Some(child) = self.nodes[id].child else {
            return false;
        };
        let absorbed = std::mem::take(&mut self.nodes[child]);
        let node = &mut self.nodes[id];
        node.label.extend_from_slice(&absorbed.label);
        node.value = absorbed.value;
        node.child = absorbed.child;
        self.nodes.free(child);
        tracing::trace!(label_len = self.nodes[id].label.len(), "merged edge");
        true
    }

    fn unlink(&mut self, id: NodeId, parent: NodeId, prev: Option<NodeId>) {
        let next = self.nodes[id].next.take();
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.nodes[parent].child = next,
        }
    }
}

impl Default for RadixMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RadixMap {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            count: self.count,
        }
    }
}

impl std::fmt::Debug for RadixMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)),
            )
            .finish()
    }
}
