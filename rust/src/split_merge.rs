//! Split and merge: the two structural primitives of both trees.
//!
//! Every structural change to a tree is expressed through these two
//! operations. Insertion splits a tree around the new entry's key and merges
//! the pieces back with the entry in between; erasure merges the two children
//! of the removed entry into one replacement subtree.
//!
//! Merge has no stored priority. When two subtree roots compete for the top
//! position, the one whose value on the *opposite* side is smaller wins. The
//! shapes of the two trees therefore follow each other, and the height of a
//! tree depends on how correlated the two orders are; sorted, correlated input
//! gives a path-shaped tree. Both primitives walk the tree iteratively so that
//! deep trees cannot exhaust the call stack.

use crate::arena::{NodeId, NULL_NODE};
use crate::compare::Comparator;
use crate::types::{Bimap, Side};

/// Which child slot of a node the next merged subtree goes into.
#[derive(Clone, Copy)]
enum Slot {
    Left,
    Right,
}

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    /// Returns true if entry `a` orders strictly before entry `b` on `side`.
    #[inline]
    pub(crate) fn precedes(&self, side: Side, a: NodeId, b: NodeId) -> bool {
        let (a, b) = (self.tree.entry(a), self.tree.entry(b));
        match side {
            Side::Left => self.cmp_left.less(&a.left, &b.left),
            Side::Right => self.cmp_right.less(&a.right, &b.right),
        }
    }

    /// Partition the subtree at `root` into the entries strictly less than
    /// `pivot` and the entries not less than it, both ordered on `side`.
    ///
    /// `pivot` only supplies the key; it does not need to be in the tree.
    /// Both returned roots are detached (parent `NULL_NODE`).
    pub(crate) fn split(&mut self, side: Side, root: NodeId, pivot: NodeId) -> (NodeId, NodeId) {
        let mut less_root = NULL_NODE;
        let mut less_tail = NULL_NODE;
        let mut rest_root = NULL_NODE;
        let mut rest_tail = NULL_NODE;
        let mut current = root;

        while current != NULL_NODE {
            if self.precedes(side, current, pivot) {
                // `current` and its left subtree are all less than the pivot
                let next = self.tree.link(side, current).right;
                if less_tail == NULL_NODE {
                    less_root = current;
                    self.tree.link_mut(side, current).parent = NULL_NODE;
                } else {
                    self.tree.attach_right(side, less_tail, current);
                }
                less_tail = current;
                current = next;
            } else {
                let next = self.tree.link(side, current).left;
                if rest_tail == NULL_NODE {
                    rest_root = current;
                    self.tree.link_mut(side, current).parent = NULL_NODE;
                } else {
                    self.tree.attach_left(side, rest_tail, current);
                }
                rest_tail = current;
                current = next;
            }
        }

        if less_tail != NULL_NODE {
            self.tree.link_mut(side, less_tail).right = NULL_NODE;
        }
        if rest_tail != NULL_NODE {
            self.tree.link_mut(side, rest_tail).left = NULL_NODE;
        }
        (less_root, rest_root)
    }

    /// Join two subtrees on `side` whose keys do not interleave: every key of
    /// `first` must order before every key of `second`.
    ///
    /// Returns the detached root of the merged subtree.
    pub(crate) fn merge(&mut self, side: Side, first: NodeId, second: NodeId) -> NodeId {
        let secondary = side.opposite();
        let mut root = NULL_NODE;
        let mut hook: Option<(NodeId, Slot)> = None;
        let (mut a, mut b) = (first, second);

        loop {
            if a == NULL_NODE || b == NULL_NODE {
                let rest = if a == NULL_NODE { b } else { a };
                self.hang(side, hook, rest, &mut root);
                return root;
            }

            if self.precedes(side, b, a) {
                std::mem::swap(&mut a, &mut b);
            }

            if self.precedes(secondary, a, b) {
                // `a` stays on top; `b` merges into its right subtree
                self.hang(side, hook, a, &mut root);
                hook = Some((a, Slot::Right));
                a = self.tree.link(side, a).right;
            } else {
                // `b` stays on top; `a` merges into its left subtree
                self.hang(side, hook, b, &mut root);
                hook = Some((b, Slot::Left));
                b = self.tree.link(side, b).left;
            }
        }
    }

    /// Place `subtree` at `hook`, or make it the merged root when there is no
    /// hook yet.
    #[inline]
    fn hang(&mut self, side: Side, hook: Option<(NodeId, Slot)>, subtree: NodeId, root: &mut NodeId) {
        match hook {
            None => {
                *root = subtree;
                if subtree != NULL_NODE {
                    self.tree.link_mut(side, subtree).parent = NULL_NODE;
                }
            }
            Some((parent, Slot::Left)) => self.tree.attach_left(side, parent, subtree),
            Some((parent, Slot::Right)) => self.tree.attach_right(side, parent, subtree),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::NULL_NODE;
    use crate::types::{Entry, Side, SENTINEL};
    use crate::Bimap;

    /// Allocate detached entries without linking them into either tree.
    fn detached(bimap: &mut Bimap<i32, i32>, pairs: &[(i32, i32)]) -> Vec<u32> {
        pairs
            .iter()
            .map(|&(l, r)| bimap.tree.arena.allocate(Entry::new(l, r)))
            .collect()
    }

    fn in_order(bimap: &Bimap<i32, i32>, side: Side, root: u32) -> Vec<i32> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = root;
        while current != NULL_NODE || !stack.is_empty() {
            while current != NULL_NODE {
                stack.push(current);
                current = bimap.tree.link(side, current).left;
            }
            if let Some(id) = stack.pop() {
                let entry = bimap.tree.entry(id);
                out.push(match side {
                    Side::Left => entry.left,
                    Side::Right => entry.right,
                });
                current = bimap.tree.link(side, id).right;
            }
        }
        out
    }

    #[test]
    fn test_merge_uses_opposite_value_as_priority() {
        let mut bimap = Bimap::new();
        let ids = detached(&mut bimap, &[(1, 50), (2, 10)]);

        let root = bimap.merge(Side::Left, ids[0], ids[1]);
        // (2, 10) has the smaller right value, so it becomes the parent
        assert_eq!(root, ids[1]);
        assert_eq!(bimap.tree.link(Side::Left, root).left, ids[0]);
        assert_eq!(bimap.tree.link(Side::Left, ids[0]).parent, ids[1]);
        assert_eq!(bimap.tree.link(Side::Left, root).parent, NULL_NODE);
    }

    #[test]
    fn test_merge_swaps_out_of_order_roots() {
        let mut bimap = Bimap::new();
        let ids = detached(&mut bimap, &[(9, 1), (3, 2)]);

        let root = bimap.merge(Side::Left, ids[0], ids[1]);
        assert_eq!(in_order(&bimap, Side::Left, root), vec![3, 9]);
    }

    #[test]
    fn test_split_then_merge_restores_order() {
        let mut bimap = Bimap::new();
        let pairs: Vec<(i32, i32)> = (0..20).map(|i| (i, (i * 7) % 20)).collect();
        let ids = detached(&mut bimap, &pairs);

        let mut root = NULL_NODE;
        for &id in &ids {
            root = bimap.merge(Side::Left, root, id);
        }
        assert_eq!(in_order(&bimap, Side::Left, root), (0..20).collect::<Vec<_>>());

        let pivot = bimap.tree.arena.allocate(Entry::new(10, 99));
        let (less, rest) = bimap.split(Side::Left, root, pivot);
        assert_eq!(in_order(&bimap, Side::Left, less), (0..10).collect::<Vec<_>>());
        assert_eq!(in_order(&bimap, Side::Left, rest), (10..20).collect::<Vec<_>>());

        let joined = bimap.merge(Side::Left, less, rest);
        assert_eq!(in_order(&bimap, Side::Left, joined), (0..20).collect::<Vec<_>>());
        assert_ne!(joined, SENTINEL);
    }

    #[test]
    fn test_split_empty_and_one_sided() {
        let mut bimap = Bimap::new();
        let ids = detached(&mut bimap, &[(5, 5), (6, 6), (0, 0)]);
        assert_eq!(bimap.split(Side::Right, NULL_NODE, ids[0]), (NULL_NODE, NULL_NODE));

        let root = bimap.merge(Side::Right, ids[0], ids[1]);
        let (less, rest) = bimap.split(Side::Right, root, ids[2]);
        assert_eq!(less, NULL_NODE);
        assert_eq!(in_order(&bimap, Side::Right, rest), vec![5, 6]);
    }
}
