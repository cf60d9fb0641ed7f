//! GET operations for Bimap.
//!
//! This module contains the read operations: exact lookup on either side,
//! lower and upper bounds, and dereferencing handles. Every lookup is a single
//! descent from the root of the queried side's tree.

use std::cmp::Ordering;

use paste::paste;

use crate::arena::{NodeId, NULL_NODE};
use crate::compare::Comparator;
use crate::error::{BimapError, KeyResult};
use crate::types::{Bimap, Handle, LeftHandle, RightHandle, Side, SENTINEL};

impl<L, R, CL, CR> Bimap<L, R, CL, CR> {
    /// Both values of the entry a handle refers to; `None` for the end handle
    /// or a handle whose entry has been erased.
    pub fn pair<H: Handle>(&self, handle: H) -> Option<(&L, &R)> {
        self.tree
            .arena
            .get_versioned(handle.node(), handle.generation())
            .map(|entry| (&entry.left, &entry.right))
    }

    /// Stamp a node id with its slot's current generation.
    #[inline]
    pub(crate) fn handle<H: Handle>(&self, id: NodeId) -> H {
        H::from_parts(id, self.tree.arena.generation(id))
    }

    /// The node a handle names, or `SENTINEL` for the end handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle's entry has been erased.
    pub(crate) fn position<H: Handle>(&self, handle: H) -> NodeId {
        if handle.is_end() {
            return SENTINEL;
        }
        match self
            .tree
            .arena
            .get_versioned(handle.node(), handle.generation())
        {
            Some(_) => handle.node(),
            None => panic!(
                "stale handle: node {} (generation {}) has been erased",
                handle.node(),
                handle.generation()
            ),
        }
    }

    /// The left value of the entry a handle refers to.
    pub fn left_value<H: Handle>(&self, handle: H) -> Option<&L> {
        self.pair(handle).map(|(left, _)| left)
    }

    /// The right value of the entry a handle refers to.
    pub fn right_value<H: Handle>(&self, handle: H) -> Option<&R> {
        self.pair(handle).map(|(_, right)| right)
    }

    /// Descend `side`'s tree looking for the node `probe` reports as equal.
    ///
    /// `probe` returns the ordering of a node's key relative to the query.
    fn descend<F>(&self, side: Side, probe: F) -> NodeId
    where
        F: Fn(NodeId) -> Ordering,
    {
        let mut current = self.tree.root(side);
        while current != NULL_NODE {
            let link = self.tree.link(side, current);
            match probe(current) {
                Ordering::Less => current = link.right,
                Ordering::Greater => current = link.left,
                Ordering::Equal => return current,
            }
        }
        SENTINEL
    }

    /// Smallest node for which `qualifies` holds, assuming `qualifies` is
    /// monotone (false for a prefix of the order, true for the rest).
    fn bound<F>(&self, side: Side, qualifies: F) -> NodeId
    where
        F: Fn(NodeId) -> bool,
    {
        let mut current = self.tree.root(side);
        let mut best = SENTINEL;
        while current != NULL_NODE {
            let link = self.tree.link(side, current);
            if qualifies(current) {
                best = current;
                current = link.left;
            } else {
                current = link.right;
            }
        }
        best
    }
}

macro_rules! lookup_side {
    ($side:ident, $Side:ident, $Key:ident, $Other:ident, $cmp:ident, $key_field:ident, $other_field:ident) => {
        paste! {
            #[doc = "Handle to the entry whose " $side " value equals `key`; the end handle if there is none."]
            pub fn [<find_ $side>](&self, key: &$Key) -> [<$Side Handle>] {
                let found = self.descend(Side::$Side, |id| {
                    self.$cmp.compare(&self.tree.entry(id).$key_field, key)
                });
                self.handle(found)
            }

            #[doc = "Returns true if some entry has `key` as its " $side " value."]
            pub fn [<contains_ $side>](&self, key: &$Key) -> bool {
                !self.[<find_ $side>](key).is_end()
            }

            #[doc = "The " $other_field " value paired with the " $side " value `key`."]
            pub fn [<get_by_ $side>](&self, key: &$Key) -> Option<&$Other> {
                self.tree
                    .arena
                    .get(self.[<find_ $side>](key).node)
                    .map(|entry| &entry.$other_field)
            }

            #[doc = "The " $other_field " value paired with the " $side " value `key`, or"]
            #[doc = "`BimapError::KeyNotFound` when it is absent."]
            pub fn [<at_ $side>](&self, key: &$Key) -> KeyResult<&$Other> {
                self.[<get_by_ $side>](key).ok_or(BimapError::KeyNotFound)
            }

            #[doc = "Handle to the first entry whose " $side " value is not less than `key`."]
            pub fn [<lower_bound_ $side>](&self, key: &$Key) -> [<$Side Handle>] {
                self.handle(self.bound(Side::$Side, |id| {
                    !self.$cmp.less(&self.tree.entry(id).$key_field, key)
                }))
            }

            #[doc = "Handle to the first entry whose " $side " value is greater than `key`."]
            pub fn [<upper_bound_ $side>](&self, key: &$Key) -> [<$Side Handle>] {
                self.handle(self.bound(Side::$Side, |id| {
                    self.$cmp.less(key, &self.tree.entry(id).$key_field)
                }))
            }

            #[doc = "The pair with the smallest " $side " value."]
            pub fn [<first_by_ $side>](&self) -> Option<(&L, &R)> {
                self.pair(self.[<begin_ $side>]())
            }

            #[doc = "The pair with the largest " $side " value."]
            pub fn [<last_by_ $side>](&self) -> Option<(&L, &R)> {
                self.pair(self.[<last_ $side>]())
            }
        }
    };
}

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    for_each_side!(lookup_side);
}
