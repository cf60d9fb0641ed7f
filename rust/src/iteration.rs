//! Navigation and iterator implementations for Bimap.
//!
//! Both orderings are walked through parent links, so stepping a handle never
//! needs the comparators. The sentinel closes each ordering into a ring:
//! stepping forward from the last entry or back from the first one lands on
//! the end handle, and stepping back from the end handle lands on the last
//! entry.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use paste::paste;

use crate::arena::{Arena, NodeId, NULL_NODE};
use crate::compare::Comparator;
use crate::types::{Bimap, DualTree, Entry, Handle, LeftHandle, RightHandle, Side, SENTINEL};

// ============================================================================
// TREE NAVIGATION
// ============================================================================

impl<L, R> DualTree<L, R> {
    /// Leftmost node of the subtree at `id` (which must not be `NULL_NODE`).
    pub(crate) fn minimum(&self, side: Side, mut id: NodeId) -> NodeId {
        loop {
            let left = self.link(side, id).left;
            if left == NULL_NODE {
                return id;
            }
            id = left;
        }
    }

    /// Rightmost node of the subtree at `id` (which must not be `NULL_NODE`).
    pub(crate) fn maximum(&self, side: Side, mut id: NodeId) -> NodeId {
        loop {
            let right = self.link(side, id).right;
            if right == NULL_NODE {
                return id;
            }
            id = right;
        }
    }

    /// First entry in `side` order, or the sentinel when empty.
    pub(crate) fn first(&self, side: Side) -> NodeId {
        match self.root(side) {
            NULL_NODE => SENTINEL,
            root => self.minimum(side, root),
        }
    }

    /// Last entry in `side` order, or the sentinel when empty.
    pub(crate) fn last(&self, side: Side) -> NodeId {
        match self.root(side) {
            NULL_NODE => SENTINEL,
            root => self.maximum(side, root),
        }
    }

    /// In-order successor; the sentinel after the last entry and after itself.
    pub(crate) fn successor(&self, side: Side, id: NodeId) -> NodeId {
        if id == SENTINEL {
            return SENTINEL;
        }
        let link = self.link(side, id);
        if link.right != NULL_NODE {
            return self.minimum(side, link.right);
        }

        let mut current = id;
        let mut parent = link.parent;
        while parent != SENTINEL && self.link(side, parent).right == current {
            current = parent;
            parent = self.link(side, parent).parent;
        }
        parent
    }

    /// In-order predecessor; the sentinel before the first entry, and the last
    /// entry before the sentinel.
    pub(crate) fn predecessor(&self, side: Side, id: NodeId) -> NodeId {
        if id == SENTINEL {
            return self.last(side);
        }
        let link = self.link(side, id);
        if link.left != NULL_NODE {
            return self.maximum(side, link.left);
        }

        let mut current = id;
        let mut parent = link.parent;
        while parent != SENTINEL && self.link(side, parent).left == current {
            current = parent;
            parent = self.link(side, parent).parent;
        }
        parent
    }

    #[inline]
    fn pair(&self, id: NodeId) -> (&L, &R) {
        let entry = self.entry(id);
        (&entry.left, &entry.right)
    }
}

// ============================================================================
// HANDLE STEPPING AND THE EXTREMAL CACHE
// ============================================================================

impl<L, R, CL, CR> Bimap<L, R, CL, CR> {
    /// First node of `side`, recomputing both cached minima if a mutation
    /// made them stale.
    pub(crate) fn first_node(&self, side: Side) -> NodeId {
        if self.stale.get() {
            for side in Side::BOTH {
                self.leftmost[side.index()].set(self.tree.first(side));
            }
            self.stale.set(false);
        }
        self.leftmost[side.index()].get()
    }

    #[inline]
    pub(crate) fn mark_stale(&self) {
        self.stale.set(true);
    }

    /// Handle to the first entry in left order; the end handle when empty.
    pub fn begin_left(&self) -> LeftHandle {
        self.handle(self.first_node(Side::Left))
    }

    /// Handle to the first entry in right order; the end handle when empty.
    pub fn begin_right(&self) -> RightHandle {
        self.handle(self.first_node(Side::Right))
    }

    /// The past-the-end handle of the left order.
    pub fn end_left(&self) -> LeftHandle {
        LeftHandle::END
    }

    /// The past-the-end handle of the right order.
    pub fn end_right(&self) -> RightHandle {
        RightHandle::END
    }

    /// Handle to the last entry in left order; the end handle when empty.
    pub fn last_left(&self) -> LeftHandle {
        self.handle(self.tree.last(Side::Left))
    }

    /// Handle to the last entry in right order; the end handle when empty.
    pub fn last_right(&self) -> RightHandle {
        self.handle(self.tree.last(Side::Right))
    }

    /// Step a handle forward in its own order. The end handle stays put.
    ///
    /// # Panics
    ///
    /// Panics if the handle's entry has been erased.
    pub fn next<H: Handle>(&self, handle: H) -> H {
        self.handle(self.tree.successor(H::SIDE, self.position(handle)))
    }

    /// Step a handle back in its own order. Stepping back from the first entry
    /// gives the end handle; stepping back from the end handle gives the last
    /// entry. Panics if the handle's entry has been erased.
    pub fn prev<H: Handle>(&self, handle: H) -> H {
        self.handle(self.tree.predecessor(H::SIDE, self.position(handle)))
    }

    /// Iterate over all pairs in left order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treebimap::Bimap;
    ///
    /// let bimap: Bimap<_, _> = [(2, 'x'), (1, 'y')].into_iter().collect();
    /// let pairs: Vec<_> = bimap.iter().collect();
    /// assert_eq!(pairs, vec![(&1, &'y'), (&2, &'x')]);
    /// ```
    pub fn iter(&self) -> Iter<'_, L, R> {
        self.iter_left()
    }

    /// Iterate over all pairs, ordered by left value.
    pub fn iter_left(&self) -> Iter<'_, L, R> {
        Iter::new(self, Side::Left)
    }

    /// Iterate over all pairs, ordered by right value. Items are still
    /// `(left, right)`.
    pub fn iter_right(&self) -> Iter<'_, L, R> {
        Iter::new(self, Side::Right)
    }

    /// Left values in ascending order.
    pub fn left_values(&self) -> impl DoubleEndedIterator<Item = &L> + ExactSizeIterator + '_ {
        self.iter_left().map(|(l, _)| l)
    }

    /// Right values in ascending order.
    pub fn right_values(&self) -> impl DoubleEndedIterator<Item = &R> + ExactSizeIterator + '_ {
        self.iter_right().map(|(_, r)| r)
    }
}

// ============================================================================
// RANGE QUERIES
// ============================================================================

macro_rules! range_side {
    ($side:ident, $Side:ident, $Key:ident, $Other:ident, $cmp:ident, $key_field:ident, $other_field:ident) => {
        paste! {
            #[doc = "Iterate over the pairs whose " $side " value falls in `range`, in " $side " order."]
            ///
            /// An inverted range yields nothing.
            pub fn [<range_ $side>]<B>(&self, range: B) -> Range<'_, L, R>
            where
                B: RangeBounds<$Key>,
            {
                let start = match range.start_bound() {
                    Bound::Included(key) => self.[<lower_bound_ $side>](key).node,
                    Bound::Excluded(key) => self.[<upper_bound_ $side>](key).node,
                    Bound::Unbounded => self.first_node(Side::$Side),
                };
                let stop = match range.end_bound() {
                    Bound::Included(key) => self.[<upper_bound_ $side>](key).node,
                    Bound::Excluded(key) => self.[<lower_bound_ $side>](key).node,
                    Bound::Unbounded => SENTINEL,
                };

                let inverted = start == SENTINEL
                    || (stop != SENTINEL && self.precedes(Side::$Side, stop, start));
                if inverted {
                    Range::new(&self.tree, Side::$Side, SENTINEL, SENTINEL)
                } else {
                    Range::new(&self.tree, Side::$Side, start, stop)
                }
            }
        }
    };
}

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    for_each_side!(range_side);
}

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over every pair of a bimap in one side's order.
pub struct Iter<'a, L, R> {
    tree: &'a DualTree<L, R>,
    side: Side,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

/// Iterator over the pairs between two positions of one side's order.
pub struct Range<'a, L, R> {
    tree: &'a DualTree<L, R>,
    side: Side,
    /// Next node to yield from the front.
    front: NodeId,
    /// One past the next node to yield from the back.
    back: NodeId,
}

/// Owning iterator over the pairs of a bimap in left order.
pub struct IntoIter<L, R> {
    arena: Arena<Entry<L, R>>,
    order: std::vec::IntoIter<NodeId>,
}

// ============================================================================
// ITER IMPLEMENTATION
// ============================================================================

impl<'a, L, R> Iter<'a, L, R> {
    fn new<CL, CR>(bimap: &'a Bimap<L, R, CL, CR>, side: Side) -> Self {
        Self {
            tree: &bimap.tree,
            side,
            front: bimap.first_node(side),
            back: SENTINEL,
            remaining: bimap.len,
        }
    }
}

impl<'a, L, R> Iterator for Iter<'a, L, R> {
    type Item = (&'a L, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        self.front = self.tree.successor(self.side, id);
        self.remaining -= 1;
        Some(self.tree.pair(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<L, R> DoubleEndedIterator for Iter<'_, L, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.tree.predecessor(self.side, self.back);
        self.remaining -= 1;
        Some(self.tree.pair(self.back))
    }
}

impl<L, R> ExactSizeIterator for Iter<'_, L, R> {}

impl<L, R> FusedIterator for Iter<'_, L, R> {}

impl<L, R> Clone for Iter<'_, L, R> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

// ============================================================================
// RANGE IMPLEMENTATION
// ============================================================================

impl<'a, L, R> Range<'a, L, R> {
    fn new(tree: &'a DualTree<L, R>, side: Side, front: NodeId, back: NodeId) -> Self {
        Self {
            tree,
            side,
            front,
            back,
        }
    }
}

impl<'a, L, R> Iterator for Range<'a, L, R> {
    type Item = (&'a L, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let id = self.front;
        self.front = self.tree.successor(self.side, id);
        Some(self.tree.pair(id))
    }
}

impl<L, R> DoubleEndedIterator for Range<'_, L, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.tree.predecessor(self.side, self.back);
        Some(self.tree.pair(self.back))
    }
}

impl<L, R> FusedIterator for Range<'_, L, R> {}

// ============================================================================
// OWNING ITERATION AND COLLECTION
// ============================================================================

impl<L, R> Iterator for IntoIter<L, R> {
    type Item = (L, R);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.arena.deallocate(id).map(|entry| (entry.left, entry.right))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<L, R> DoubleEndedIterator for IntoIter<L, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        self.arena.deallocate(id).map(|entry| (entry.left, entry.right))
    }
}

impl<L, R> ExactSizeIterator for IntoIter<L, R> {}

impl<L, R, CL, CR> IntoIterator for Bimap<L, R, CL, CR> {
    type Item = (L, R);
    type IntoIter = IntoIter<L, R>;

    fn into_iter(self) -> IntoIter<L, R> {
        let mut order = Vec::with_capacity(self.len);
        let mut id = self.tree.first(Side::Left);
        while id != SENTINEL {
            order.push(id);
            id = self.tree.successor(Side::Left, id);
        }
        IntoIter {
            arena: self.tree.arena,
            order: order.into_iter(),
        }
    }
}

impl<'a, L, R, CL, CR> IntoIterator for &'a Bimap<L, R, CL, CR> {
    type Item = (&'a L, &'a R);
    type IntoIter = Iter<'a, L, R>;

    fn into_iter(self) -> Iter<'a, L, R> {
        self.iter()
    }
}

impl<L, R, CL, CR> Extend<(L, R)> for Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    /// Insert every pair; pairs that collide with an existing left or right
    /// value are skipped.
    fn extend<I: IntoIterator<Item = (L, R)>>(&mut self, iter: I) {
        for (left, right) in iter {
            self.insert(left, right);
        }
    }
}

impl<L, R, CL, CR> FromIterator<(L, R)> for Bimap<L, R, CL, CR>
where
    CL: Comparator<L> + Default,
    CR: Comparator<R> + Default,
{
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        let mut bimap = Self::default();
        bimap.extend(iter);
        bimap
    }
}

// ============================================================================
// EQUALITY AND FORMATTING
// ============================================================================

impl<L, R, CL, CR> PartialEq for Bimap<L, R, CL, CR>
where
    L: PartialEq,
    R: PartialEq,
{
    /// Equal when both hold the same pairs in the same left order.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter_left().eq(other.iter_left())
    }
}

impl<L: Eq, R: Eq, CL, CR> Eq for Bimap<L, R, CL, CR> {}

impl<L: fmt::Debug, R: fmt::Debug, CL, CR> fmt::Debug for Bimap<L, R, CL, CR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_left()).finish()
    }
}
