//! The shared descent primitive.
//!
//! At each node the walker compares the edge label against the remaining key
//! and lands in exactly one of three cases: the edge is fully consumed, the
//! edge does not overlap at all (try the next sibling), or the key diverges
//! or ends partway through the edge. Every public map operation interprets a
//! [`Path`] produced here.

use smallvec::{smallvec, SmallVec};

use crate::node::{NodeArena, NodeId};

/// Length of the longest common run of bytes at the start of `a` and `b`.
#[inline]
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Outcome of matching one edge label against the remaining key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// The whole label matched.
    Consumed(usize),
    /// Nothing matched; move to the next sibling.
    Miss,
    /// `0 < n < label.len()` bytes matched.
    Split(usize),
}

#[inline]
pub(crate) fn step(label: &[u8], rest: &[u8]) -> Step {
    let common = common_prefix_len(label, rest);
    if common == label.len() {
        Step::Consumed(common)
    } else if common == 0 {
        Step::Miss
    } else {
        Step::Split(common)
    }
}

/// A node on the walked path together with its predecessor in the parent's
/// child chain.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub(crate) node: NodeId,
    pub(crate) prev: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum End {
    /// The key ends exactly at the boundary of the last node's edge.
    Exact,
    /// The key ends `matched` bytes into the last node's edge.
    Inside { matched: usize },
    /// The key diverges from the last node's edge after `matched` bytes.
    Diverged { matched: usize },
    /// The last node's edge was consumed but no child continues the key.
    /// `tail` is the last child in its chain, if any.
    Vacant { tail: Option<NodeId> },
}

/// Root-to-node trail recorded by [`walk`].
#[derive(Debug)]
pub(crate) struct Path {
    /// Visited nodes, root first. Never empty.
    pub(crate) frames: SmallVec<[Frame; 16]>,
    pub(crate) end: End,
    /// Offset of the first key byte not matched along the path.
    pub(crate) rest_at: usize,
}

impl Path {
    #[inline]
    pub(crate) fn last(&self) -> NodeId {
        self.frames[self.frames.len() - 1].node
    }
}

pub(crate) fn walk(arena: &NodeArena, key: &[u8]) -> Path {
    let mut frames: SmallVec<[Frame; 16]> = smallvec![Frame {
        node: NodeId::ROOT,
        prev: None,
    }];
    let mut at = 0usize;

    'descend: loop {
        let parent = frames[frames.len() - 1].node;
        let rest = &key[at..];
        if rest.is_empty() {
            return Path {
                frames,
                end: End::Exact,
                rest_at: at,
            };
        }

        let mut prev = None;
        for id in arena.siblings(arena[parent].child) {
            match step(&arena[id].label, rest) {
                Step::Miss => prev = Some(id),
                Step::Consumed(n) => {
                    frames.push(Frame { node: id, prev });
                    at += n;
                    continue 'descend;
                }
                Step::Split(n) => {
                    frames.push(Frame { node: id, prev });
                    let end = if n == rest.len() {
                        End::Inside { matched: n }
                    } else {
                        End::Diverged { matched: n }
                    };
                    return Path {
                        frames,
                        end,
                        rest_at: at + n,
                    };
                }
            }
        }

        return Path {
            frames,
            end: End::Vacant { tail: prev },
            rest_at: at,
        };
    }
}
