//! Edge-compressed nodes and the slot arena that owns them.
//!
//! Every node lives in one arena slot and is referenced by a [`NodeId`].
//! A node is owned by exactly one link: its parent's `child` or its
//! predecessor's `next`. Slots released by merges and deletions go onto a
//! free list and are handed out again before the arena grows.

use std::num::NonZeroU32;

use smallvec::SmallVec;

/// Inline capacity of an edge label before it spills to the heap.
pub(crate) const INLINE_LABEL: usize = 16;

pub(crate) type Label = SmallVec<[u8; INLINE_LABEL]>;

/// Index of a node slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// The root always occupies slot 0.
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Node {
    pub(crate) label: Label,
    pub(crate) value: Option<NonZeroU32>,
    /// First child; the remaining children hang off its `next` chain.
    pub(crate) child: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl Node {
    pub(crate) fn leaf(label: &[u8], value: NonZeroU32) -> Self {
        debug_assert!(!label.is_empty());
        Self {
            label: SmallVec::from_slice(label),
            value: Some(value),
            child: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn has_children(&self) -> bool {
        self.child.is_some()
    }

    /// First byte of the label, which siblings dispatch on.
    #[inline]
    pub(crate) fn first_byte(&self) -> Option<u8> {
        self.label.first().copied()
    }
}

#[derive(Clone)]
pub(crate) struct NodeArena {
    slots: Vec<Node>,
    free: Vec<NodeId>,
}

impl NodeArena {
    /// Creates an arena holding only the empty root.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.push(Node::default());
        Self {
            slots,
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = node;
            return id;
        }
        let idx = self.slots.len();
        assert!(idx < u32::MAX as usize, "node arena exhausted");
        self.slots.push(node);
        NodeId(idx as u32)
    }

    /// Releases a slot. The node must already be unlinked from the tree.
    pub(crate) fn free(&mut self, id: NodeId) {
        debug_assert_ne!(id, NodeId::ROOT, "root is never freed");
        let slot = &mut self.slots[id.index()];
        slot.label = SmallVec::new();
        slot.value = None;
        slot.child = None;
        slot.next = None;
        self.free.push(id);
        tracing::trace!(slot = id.0, "freed node");
    }

    /// Drops every node except an empty root, keeping the slot allocation.
    pub(crate) fn reset(&mut self) {
        self.slots.truncate(1);
        self.slots[0] = Node::default();
        self.free.clear();
    }

    /// Number of nodes currently linked into the tree, root included.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        let spilled: usize = self
            .slots
            .iter()
            .filter(|n| n.label.spilled())
            .map(|n| n.label.capacity())
            .sum();
        self.slots.capacity() * std::mem::size_of::<Node>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
            + spilled
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.free.shrink_to_fit();
        // Trailing free slots can be dropped outright.
        while self.slots.len() > 1 {
            let last = NodeId((self.slots.len() - 1) as u32);
            match self.free.iter().position(|&id| id == last) {
                Some(pos) => {
                    self.free.swap_remove(pos);
                    self.slots.pop();
                }
                None => break,
            }
        }
        self.slots.shrink_to_fit();
    }

    /// Iterates a sibling chain starting at `first`.
    pub(crate) fn siblings(&self, first: Option<NodeId>) -> Siblings<'_> {
        Siblings {
            arena: self,
            cur: first,
        }
    }

    /// Number of direct children of `id`, stopping early once it exceeds `cap`.
    pub(crate) fn child_count_up_to(&self, id: NodeId, cap: usize) -> usize {
        self.siblings(self[id].child).take(cap + 1).count()
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.slots[id.index()]
    }
}

impl std::ops::IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.index()]
    }
}

pub(crate) struct Siblings<'a> {
    arena: &'a NodeArena,
    cur: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.arena[id].next;
        Some(id)
    }
}
