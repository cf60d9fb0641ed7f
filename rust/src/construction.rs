//! Construction, copying and assignment for Bimap.
//!
//! Copies insert the source's pairs starting from the middle of its left
//! order and working outward toward both ends. Since merge picks subtree roots
//! by the opposite side's value, the copy ends up with the same tree shapes as
//! the source. Assignment keeps the old contents as a backup until the copy is
//! complete and puts them back if the copy fails.

use std::cell::Cell;

use crate::arena::{ArenaStats, NodeId};
use crate::compare::{Comparator, Natural};
use crate::error::{BimapResultExt, InitResult};
use crate::types::{Bimap, DualTree, Side, SENTINEL};

impl<L, R> Bimap<L, R, Natural, Natural>
where
    L: Ord,
    R: Ord,
{
    /// Create an empty bimap ordered naturally on both sides.
    ///
    /// # Examples
    ///
    /// ```
    /// use treebimap::Bimap;
    ///
    /// let bimap = Bimap::<i32, String>::new();
    /// assert!(bimap.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparators(Natural, Natural)
    }

    /// Create an empty bimap with room for `capacity` pairs before the arena
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparators(capacity, Natural, Natural)
    }
}

impl<L, R, CL, CR> Bimap<L, R, CL, CR> {
    /// Create an empty bimap with the given orderings.
    ///
    /// # Examples
    ///
    /// ```
    /// use treebimap::{Bimap, Natural, Reversed};
    ///
    /// let mut bimap = Bimap::with_comparators(Reversed(Natural), Natural);
    /// bimap.insert(1, 'a');
    /// bimap.insert(2, 'b');
    /// let lefts: Vec<_> = bimap.iter().map(|(l, _)| *l).collect();
    /// assert_eq!(lefts, vec![2, 1]);
    /// ```
    pub fn with_comparators(cmp_left: CL, cmp_right: CR) -> Self {
        Self::with_capacity_and_comparators(0, cmp_left, cmp_right)
    }

    /// Create an empty bimap with the given orderings and arena capacity.
    pub fn with_capacity_and_comparators(capacity: usize, cmp_left: CL, cmp_right: CR) -> Self {
        Self {
            tree: DualTree::with_capacity(capacity),
            cmp_left,
            cmp_right,
            len: 0,
            leftmost: [Cell::new(SENTINEL), Cell::new(SENTINEL)],
            stale: Cell::new(false),
        }
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the bimap holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The ordering of the left side.
    pub fn left_comparator(&self) -> &CL {
        &self.cmp_left
    }

    /// The ordering of the right side.
    pub fn right_comparator(&self) -> &CR {
        &self.cmp_right
    }

    /// Get statistics for the entry arena.
    pub fn arena_stats(&self) -> ArenaStats {
        self.tree.arena.stats()
    }

    /// Drop every pair; both trees start over empty.
    pub fn clear(&mut self) {
        self.tree.reset();
        self.len = 0;
        for cell in &self.leftmost {
            cell.set(SENTINEL);
        }
        self.stale.set(false);
    }
}

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    L: Clone,
    R: Clone,
    CL: Comparator<L> + Clone,
    CR: Comparator<R> + Clone,
{
    /// Copy `self`, reporting arena allocation failure instead of aborting.
    pub fn try_clone(&self) -> InitResult<Self> {
        let mut copy = self.empty_like();
        copy.tree
            .arena
            .try_reserve(self.len)
            .with_operation("try_clone")?;
        copy.copy_entries_from(self);
        Ok(copy)
    }

    /// Replace the contents of `self` with a copy of `source`.
    ///
    /// On failure `self` is left exactly as it was.
    pub fn try_clone_from(&mut self, source: &Self) -> InitResult<()> {
        let mut fresh = source.empty_like();
        fresh.tree.arena.succeed(&self.tree.arena);
        let backup = std::mem::replace(self, fresh);
        if let Err(e) = self.tree.arena.try_reserve(source.len) {
            *self = backup;
            return Err::<(), _>(e).with_operation("try_clone_from");
        }

        let guard = RestoreOnUnwind::new(self, backup);
        guard.target.copy_entries_from(source);
        guard.disarm();
        Ok(())
    }

    fn empty_like(&self) -> Self {
        Self::with_capacity_and_comparators(0, self.cmp_left.clone(), self.cmp_right.clone())
    }

    /// Insert clones of every pair of `source`, starting from the middle of
    /// its left order and alternating outward toward both ends.
    fn copy_entries_from(&mut self, source: &Self) {
        let total = source.len;
        if total == 0 {
            return;
        }

        let src = &source.tree;
        let mut pivot = src.first(Side::Left);
        for _ in 0..total / 2 {
            pivot = src.successor(Side::Left, pivot);
        }
        self.copy_entry(src, pivot);

        let mut upper = src.successor(Side::Left, pivot);
        let mut lower = src.predecessor(Side::Left, pivot);
        let mut take_upper = true;
        let mut remaining = total - 1;
        while remaining > 0 {
            let from_upper = if upper == SENTINEL {
                false
            } else if lower == SENTINEL {
                true
            } else {
                take_upper
            };

            if from_upper {
                self.copy_entry(src, upper);
                upper = src.successor(Side::Left, upper);
            } else {
                self.copy_entry(src, lower);
                lower = src.predecessor(Side::Left, lower);
            }
            take_upper = !take_upper;
            remaining -= 1;
        }
    }

    fn copy_entry(&mut self, src: &DualTree<L, R>, id: NodeId) {
        let entry = src.entry(id);
        self.link_entry(entry.left.clone(), entry.right.clone());
    }
}

impl<L, R, CL, CR> Clone for Bimap<L, R, CL, CR>
where
    L: Clone,
    R: Clone,
    CL: Comparator<L> + Clone,
    CR: Comparator<R> + Clone,
{
    /// Copy with a balanced bulk insert. A panic while cloning a value drops
    /// the partial copy; `self` is never modified.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_and_comparators(
            self.len,
            self.cmp_left.clone(),
            self.cmp_right.clone(),
        );
        copy.copy_entries_from(self);
        copy
    }

    /// Assign a copy of `source`. If cloning a value panics, the previous
    /// contents of `self` are restored before the panic propagates.
    fn clone_from(&mut self, source: &Self) {
        let mut fresh = Self::with_capacity_and_comparators(
            source.len,
            source.cmp_left.clone(),
            source.cmp_right.clone(),
        );
        fresh.tree.arena.succeed(&self.tree.arena);
        let backup = std::mem::replace(self, fresh);
        let guard = RestoreOnUnwind::new(self, backup);
        guard.target.copy_entries_from(source);
        guard.disarm();
    }
}

impl<L, R, CL, CR> Default for Bimap<L, R, CL, CR>
where
    CL: Default,
    CR: Default,
{
    fn default() -> Self {
        Self::with_comparators(CL::default(), CR::default())
    }
}

/// Puts a saved bimap back into `target` unless disarmed first.
struct RestoreOnUnwind<'a, T> {
    target: &'a mut T,
    backup: Option<T>,
}

impl<'a, T> RestoreOnUnwind<'a, T> {
    fn new(target: &'a mut T, backup: T) -> Self {
        Self {
            target,
            backup: Some(backup),
        }
    }

    /// Keep the new contents and drop the backup.
    fn disarm(mut self) {
        self.backup = None;
    }
}

impl<T> Drop for RestoreOnUnwind<'_, T> {
    fn drop(&mut self) {
        if let Some(backup) = self.backup.take() {
            *self.target = backup;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    /// Panics on clone once `FUSE` clones have happened.
    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct Fragile(u32);

    thread_local! {
        static FUSE: Cell<usize> = const { Cell::new(usize::MAX) };
    }

    impl Clone for Fragile {
        fn clone(&self) -> Self {
            FUSE.with(|fuse| {
                let left = fuse.get();
                if left == 0 {
                    panic!("fragile clone");
                }
                fuse.set(left - 1);
            });
            Fragile(self.0)
        }
    }

    fn sample(n: u32) -> Bimap<Fragile, u32> {
        let mut bimap = Bimap::new();
        for i in 0..n {
            bimap.insert(Fragile(i), i * 3);
        }
        bimap
    }

    #[test]
    fn test_new_is_empty() {
        let bimap = Bimap::<i32, String>::new();
        assert!(bimap.is_empty());
        assert_eq!(bimap.len(), 0);
        assert_eq!(bimap.arena_stats().allocated_count, 0);
    }

    #[test]
    fn test_default_uses_default_comparators() {
        let bimap: Bimap<u8, u8> = Bimap::default();
        assert_eq!(*bimap.left_comparator(), Natural);
        assert_eq!(bimap.right_comparator().compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn test_with_capacity_preallocates() {
        let bimap = Bimap::<u64, u64>::with_capacity(32);
        assert!(bimap.arena_stats().total_capacity >= 32);
        assert!(bimap.is_empty());
    }

    #[test]
    fn test_clone_matches_source() {
        let source = sample(25);
        let copy = source.clone();
        assert_eq!(copy, source);
        assert!(copy.check_invariants());
    }

    #[test]
    fn test_clone_of_single_and_empty() {
        assert_eq!(sample(0).clone().len(), 0);
        let one = sample(1);
        assert_eq!(one.clone(), one);
    }

    #[test]
    fn test_clone_preserves_tree_shape() {
        let mut source = Bimap::new();
        for i in 0..64 {
            source.insert(i, (i * 37) % 64);
        }
        let copy = source.clone();
        assert_eq!(copy.tree_heights(), source.tree_heights());

        let mut path = Bimap::new();
        for i in 0..64 {
            path.insert(i, i);
        }
        // correlated orders give a path no matter how the copy is ordered
        assert_eq!(path.clone().tree_heights(), (64, 64));
    }

    #[test]
    fn test_clone_panic_leaves_source_intact() {
        let source = sample(10);
        FUSE.with(|fuse| fuse.set(4));
        let result = catch_unwind(AssertUnwindSafe(|| source.clone()));
        FUSE.with(|fuse| fuse.set(usize::MAX));

        assert!(result.is_err());
        assert_eq!(source.len(), 10);
        assert!(source.check_invariants());
    }

    #[test]
    fn test_clone_from_restores_on_panic() {
        let source = sample(10);
        let mut target = Bimap::new();
        target.insert(Fragile(100), 7);

        FUSE.with(|fuse| fuse.set(3));
        let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
        FUSE.with(|fuse| fuse.set(usize::MAX));

        assert!(result.is_err());
        assert_eq!(target.len(), 1);
        assert_eq!(target.get_by_left(&Fragile(100)), Some(&7));
        assert!(target.check_invariants());
    }

    #[test]
    fn test_clone_from_replaces_contents() {
        let source = sample(6);
        let mut target = sample(2);
        target.clone_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_try_clone_and_try_clone_from() {
        let source = sample(8);
        let copy = source.try_clone().unwrap();
        assert_eq!(copy, source);

        let mut target = sample(3);
        target.try_clone_from(&source).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn test_try_clone_reports_allocation_failure() {
        let mut source = sample(2);
        source.len = usize::MAX / 2;
        let err = source.try_clone().unwrap_err();
        assert!(err.is_allocation_error());
        source.len = 2;
        assert!(source.check_invariants());
    }

    #[test]
    fn test_try_clone_from_failure_keeps_target() {
        let mut source = sample(2);
        let mut target: Bimap<Fragile, u32> = Bimap::new();
        target.insert(Fragile(7), 7);
        let kept = target.find_left(&Fragile(7));

        source.len = usize::MAX / 2;
        let err = target.try_clone_from(&source).unwrap_err();
        source.len = 2;
        assert!(err.is_allocation_error());

        assert_eq!(target.len(), 1);
        assert_eq!(target.get_by_left(&Fragile(7)), Some(&7));
        assert_eq!(target.pair(kept), Some((&Fragile(7), &7)));
        assert!(target.check_invariants());
    }

    #[test]
    fn test_clone_from_retires_old_handles() {
        let source = sample(4);
        let mut target = sample(4);
        let old = target.find_left(&Fragile(1));
        target.clone_from(&source);
        let fresh = target.find_left(&Fragile(1));
        assert_eq!(target.pair(old), None);
        assert_eq!(target.pair(fresh), Some((&Fragile(1), &3)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut bimap = sample(5);
        let old = bimap.begin_left();
        bimap.clear();
        assert!(bimap.is_empty());
        assert!(bimap.begin_left().is_end());
        assert_eq!(bimap.arena_stats().allocated_count, 0);
        let fresh = bimap.insert(Fragile(1), 1);
        assert_eq!(bimap.len(), 1);
        assert_eq!(bimap.pair(old), None);
        assert_eq!(bimap.pair(fresh), Some((&Fragile(1), &1)));
        assert!(bimap.check_invariants());
    }
}
