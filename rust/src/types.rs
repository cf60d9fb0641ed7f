//! Core types and data structures for Bimap.
//!
//! An [`Entry`] is stored once, in the arena, and carries two independent
//! linkage blocks: one places it in the left-ordered tree, the other in the
//! right-ordered tree. The sentinel is a payload-less node whose left child in
//! each tree is that tree's root; its id doubles as the end handle.

use std::cell::Cell;

use crate::arena::{Arena, NodeId, NULL_NODE};
use crate::compare::Natural;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Id of the sentinel node. Never handed out by the arena.
pub const SENTINEL: NodeId = u32::MAX - 1;

// ============================================================================
// SIDES AND LINKAGE
// ============================================================================

/// One of the two orderings of a bimap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Ordered by the left value.
    Left = 0,
    /// Ordered by the right value.
    Right = 1,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// The other side.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Position of a node within one side's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl Link {
    pub(crate) const DETACHED: Link = Link {
        parent: NULL_NODE,
        left: NULL_NODE,
        right: NULL_NODE,
    };
}

/// One stored pair with its linkage into both trees.
#[derive(Debug, Clone)]
pub(crate) struct Entry<L, R> {
    pub(crate) left: L,
    pub(crate) right: R,
    pub(crate) links: [Link; 2],
}

impl<L, R> Entry<L, R> {
    pub(crate) fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            links: [Link::DETACHED; 2],
        }
    }
}

/// The two search trees over a shared entry set.
#[derive(Debug)]
pub(crate) struct DualTree<L, R> {
    pub(crate) arena: Arena<Entry<L, R>>,
    pub(crate) sentinel: [Link; 2],
}

impl<L, R> DualTree<L, R> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            sentinel: [Link::DETACHED; 2],
        }
    }

    #[inline]
    pub(crate) fn entry(&self, id: NodeId) -> &Entry<L, R> {
        &self.arena[id]
    }

    #[inline]
    pub(crate) fn link(&self, side: Side, id: NodeId) -> &Link {
        if id == SENTINEL {
            &self.sentinel[side.index()]
        } else {
            &self.arena[id].links[side.index()]
        }
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, side: Side, id: NodeId) -> &mut Link {
        if id == SENTINEL {
            &mut self.sentinel[side.index()]
        } else {
            &mut self.arena[id].links[side.index()]
        }
    }

    #[inline]
    pub(crate) fn root(&self, side: Side) -> NodeId {
        self.sentinel[side.index()].left
    }

    pub(crate) fn set_root(&mut self, side: Side, root: NodeId) {
        self.attach_left(side, SENTINEL, root);
    }

    /// Make `child` the left child of `parent`; `child` may be `NULL_NODE`.
    #[inline]
    pub(crate) fn attach_left(&mut self, side: Side, parent: NodeId, child: NodeId) {
        self.link_mut(side, parent).left = child;
        if child != NULL_NODE {
            self.link_mut(side, child).parent = parent;
        }
    }

    /// Make `child` the right child of `parent`; `child` may be `NULL_NODE`.
    #[inline]
    pub(crate) fn attach_right(&mut self, side: Side, parent: NodeId, child: NodeId) {
        self.link_mut(side, parent).right = child;
        if child != NULL_NODE {
            self.link_mut(side, child).parent = parent;
        }
    }

    /// Put `replacement` in whichever child slot of `parent` holds `old`.
    pub(crate) fn replace_child(
        &mut self,
        side: Side,
        parent: NodeId,
        old: NodeId,
        replacement: NodeId,
    ) {
        if self.link(side, parent).left == old {
            self.attach_left(side, parent, replacement);
        } else {
            self.attach_right(side, parent, replacement);
        }
    }

    /// Drop every entry and detach the sentinel from both trees.
    pub(crate) fn reset(&mut self) {
        self.arena.clear();
        self.sentinel = [Link::DETACHED; 2];
    }
}

// ============================================================================
// HANDLES
// ============================================================================

pub(crate) mod private {
    pub trait Sealed {}
}

/// Common behaviour of [`LeftHandle`] and [`RightHandle`].
pub trait Handle: Copy + Eq + private::Sealed {
    /// The ordering this handle walks.
    const SIDE: Side;

    #[doc(hidden)]
    fn node(self) -> NodeId;

    #[doc(hidden)]
    fn generation(self) -> u32;

    #[doc(hidden)]
    fn from_parts(node: NodeId, generation: u32) -> Self;

    /// Returns true if this is the past-the-end handle.
    fn is_end(self) -> bool {
        self.node() == SENTINEL
    }
}

side_handle!(left, Left, Right);
side_handle!(right, Right, Left);

// ============================================================================
// BIMAP
// ============================================================================

/// A bidirectional ordered map.
///
/// Holds a set of `(L, R)` pairs in which every left value and every right
/// value is unique. Both sides are kept sorted (by `CL` and `CR`
/// respectively) so either one can be used as a lookup key for the other.
///
/// # Examples
///
/// ```
/// use treebimap::Bimap;
///
/// let mut bimap = Bimap::new();
/// bimap.insert(1, "one");
/// bimap.insert(2, "two");
///
/// assert_eq!(bimap.get_by_left(&2), Some(&"two"));
/// assert_eq!(bimap.get_by_right(&"one"), Some(&1));
///
/// // duplicates on either side are rejected
/// assert!(bimap.insert(3, "one").is_end());
/// assert_eq!(bimap.len(), 2);
/// ```
///
/// # Structure
///
/// Each side is a binary search tree assembled from split and merge
/// operations. Merge picks the new subtree root by comparing the opposite
/// side's values, so no priority is stored, and no height bound holds:
/// strongly correlated left and right orders produce deep trees.
pub struct Bimap<L, R, CL = Natural, CR = Natural> {
    pub(crate) tree: DualTree<L, R>,
    pub(crate) cmp_left: CL,
    pub(crate) cmp_right: CR,
    pub(crate) len: usize,
    /// Minimum node of each tree; meaningful only while `stale` is false.
    pub(crate) leftmost: [Cell<NodeId>; 2],
    pub(crate) stale: Cell<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::BOTH.map(Side::index), [0, 1]);
    }

    #[test]
    fn test_handles_flip_and_end() {
        assert!(LeftHandle::END.is_end());
        assert!(RightHandle::END.is_end());
        assert_eq!(LeftHandle::END.flip(), RightHandle::END);
        let h = LeftHandle {
            node: 7,
            generation: 3,
        };
        assert_eq!(h.flip().flip(), h);
        assert_ne!(h, LeftHandle { node: 7, generation: 4 });
        assert_eq!(<RightHandle as Handle>::SIDE, Side::Right);
    }

    #[test]
    fn test_attach_and_replace_child() {
        let mut tree: DualTree<i32, i32> = DualTree::with_capacity(4);
        let a = tree.arena.allocate(Entry::new(1, 1));
        let b = tree.arena.allocate(Entry::new(2, 2));
        let c = tree.arena.allocate(Entry::new(3, 3));

        tree.set_root(Side::Left, b);
        tree.attach_left(Side::Left, b, a);
        assert_eq!(tree.root(Side::Left), b);
        assert_eq!(tree.link(Side::Left, b).parent, SENTINEL);
        assert_eq!(tree.link(Side::Left, a).parent, b);
        // right tree untouched
        assert_eq!(tree.root(Side::Right), NULL_NODE);

        tree.replace_child(Side::Left, b, a, c);
        assert_eq!(tree.link(Side::Left, b).left, c);
        assert_eq!(tree.link(Side::Left, c).parent, b);

        tree.reset();
        assert_eq!(tree.arena.len(), 0);
        assert_eq!(tree.root(Side::Left), NULL_NODE);
    }
}
