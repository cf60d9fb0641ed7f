//! INSERT operations for Bimap.
//!
//! A new entry is allocated once and then linked into each tree by splitting
//! the tree at the entry's key and merging the pieces back around it.

use crate::arena::NodeId;
use crate::compare::Comparator;
use crate::error::{BimapError, ModifyResult};
use crate::types::{Bimap, Entry, LeftHandle, Side};

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    /// Insert the pair `(left, right)`.
    ///
    /// Returns a handle to the new entry, or the end handle without touching
    /// the bimap if `left` or `right` is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use treebimap::Bimap;
    ///
    /// let mut bimap = Bimap::new();
    /// let h = bimap.insert("x", 1);
    /// assert_eq!(bimap.right_value(h), Some(&1));
    /// assert!(bimap.insert("y", 1).is_end());
    /// ```
    pub fn insert(&mut self, left: L, right: R) -> LeftHandle {
        if self.contains_left(&left) || self.contains_right(&right) {
            return LeftHandle::END;
        }
        let id = self.link_entry(left, right);
        self.handle(id)
    }

    /// Insert the pair `(left, right)`, reporting which side collided.
    pub fn try_insert(&mut self, left: L, right: R) -> ModifyResult<LeftHandle> {
        if self.contains_left(&left) {
            return Err(BimapError::duplicate_key("left"));
        }
        if self.contains_right(&right) {
            return Err(BimapError::duplicate_key("right"));
        }
        let id = self.link_entry(left, right);
        Ok(self.handle(id))
    }

    /// The right value bound to `key`. If `key` is absent, any pair holding
    /// the default right value is dropped first and `(key, R::default())` is
    /// inserted in its place.
    ///
    /// # Examples
    ///
    /// ```
    /// use treebimap::Bimap;
    ///
    /// let mut bimap: Bimap<i32, String> = Bimap::new();
    /// assert_eq!(bimap.at_left_or_default(5), "");
    /// bimap.at_left_or_default(7);
    /// assert_eq!(bimap.len(), 1);
    /// assert!(!bimap.contains_left(&5));
    /// ```
    pub fn at_left_or_default(&mut self, key: L) -> &R
    where
        R: Default,
    {
        let found = self.find_left(&key);
        if !found.is_end() {
            return &self.tree.entry(found.node).right;
        }

        let default = R::default();
        let holder = self.find_right(&default);
        if !holder.is_end() {
            self.unlink_entry(holder.node);
        }
        let id = self.link_entry(key, default);
        &self.tree.entry(id).right
    }

    /// The left value bound to `key`. If `key` is absent, any pair holding
    /// the default left value is dropped first and `(L::default(), key)` is
    /// inserted in its place.
    pub fn at_right_or_default(&mut self, key: R) -> &L
    where
        L: Default,
    {
        let found = self.find_right(&key);
        if !found.is_end() {
            return &self.tree.entry(found.node).left;
        }

        let default = L::default();
        let holder = self.find_left(&default);
        if !holder.is_end() {
            self.unlink_entry(holder.node);
        }
        let id = self.link_entry(default, key);
        &self.tree.entry(id).left
    }

    /// Allocate an entry for a pair known to be absent on both sides and link
    /// it into both trees.
    pub(crate) fn link_entry(&mut self, left: L, right: R) -> NodeId {
        let id = self.tree.arena.allocate(Entry::new(left, right));
        for side in Side::BOTH {
            let root = self.tree.root(side);
            let (less, rest) = self.split(side, root, id);
            let head = self.merge(side, less, id);
            let root = self.merge(side, head, rest);
            self.tree.set_root(side, root);
        }
        self.len += 1;
        self.mark_stale();
        id
    }
}
