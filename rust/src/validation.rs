//! Validation and debugging utilities for Bimap.
//!
//! This module contains invariant checking for both trees, shape statistics,
//! and a structured dump of the node layout for debugging.

use std::fmt::Debug;

use crate::arena::{NodeId, NULL_NODE};
use crate::compare::Comparator;
use crate::error::{BimapError, BimapResult, TreeResult};
use crate::types::{Bimap, Side, SENTINEL};

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    /// Check if both trees maintain their invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> BimapResult<()> {
        let left_ids = self.check_side(Side::Left)?;
        let right_ids = self.check_side(Side::Right)?;

        // Both trees must thread exactly the same entries
        let mut left_sorted = left_ids;
        let mut right_sorted = right_ids;
        left_sorted.sort_unstable();
        right_sorted.sort_unstable();
        if left_sorted != right_sorted {
            return Err(BimapError::data_integrity(
                "Entry set check",
                "left and right trees hold different entries",
            ));
        }

        self.check_arena_consistency(left_sorted.len())?;
        self.check_extremal_cache()
    }

    /// Walk one side's tree in order, checking parent links and strict key
    /// order. Returns the visited ids.
    fn check_side(&self, side: Side) -> TreeResult<Vec<NodeId>> {
        let root = self.tree.root(side);
        if root != NULL_NODE && self.tree.link(side, root).parent != SENTINEL {
            return Err(BimapError::corrupted_tree(
                &format!("{:?} root", side),
                &format!("node {} is not a child of the sentinel", root),
            ));
        }

        let mut visited = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut previous: Option<NodeId> = None;
        let mut current = root;

        while current != NULL_NODE || !stack.is_empty() {
            while current != NULL_NODE {
                if !self.tree.arena.contains(current) {
                    return Err(BimapError::corrupted_tree(
                        &format!("{:?} tree", side),
                        &format!("node {} is linked but not allocated", current),
                    ));
                }
                if visited.len() + stack.len() > self.tree.arena.len() {
                    return Err(BimapError::corrupted_tree(
                        &format!("{:?} tree", side),
                        "more nodes reachable than allocated (cycle?)",
                    ));
                }
                self.check_children(side, current)?;
                stack.push(current);
                current = self.tree.link(side, current).left;
            }

            let Some(id) = stack.pop() else { break };
            if let Some(prev) = previous {
                if !self.precedes(side, prev, id) {
                    return Err(BimapError::data_integrity(
                        &format!("{:?} order check", side),
                        &format!("node {} does not sort after node {}", id, prev),
                    ));
                }
            }
            previous = Some(id);
            visited.push(id);
            current = self.tree.link(side, id).right;
        }

        Ok(visited)
    }

    fn check_children(&self, side: Side, id: NodeId) -> TreeResult<()> {
        let link = self.tree.link(side, id);
        for child in [link.left, link.right] {
            if child != NULL_NODE && self.tree.link(side, child).parent != id {
                return Err(BimapError::corrupted_tree(
                    &format!("{:?} parent link", side),
                    &format!("node {} does not point back to parent {}", child, id),
                ));
            }
        }
        Ok(())
    }

    /// Check that the tree node count, `len` and the arena agree.
    fn check_arena_consistency(&self, tree_count: usize) -> TreeResult<()> {
        let stats = self.tree.arena.stats();
        if tree_count != self.len || stats.allocated_count != self.len {
            return Err(BimapError::data_integrity(
                "Arena consistency check",
                &format!(
                    "{} in trees, len {}, {} in arena",
                    tree_count, self.len, stats.allocated_count
                ),
            ));
        }
        Ok(())
    }

    /// A fresh cache must name the true first entry of each side.
    fn check_extremal_cache(&self) -> TreeResult<()> {
        if self.stale.get() {
            return Ok(());
        }
        for side in Side::BOTH {
            let cached = self.leftmost[side.index()].get();
            let actual = self.tree.first(side);
            if cached != actual {
                return Err(BimapError::data_integrity(
                    &format!("{:?} begin cache", side),
                    &format!("cached node {} but first node is {}", cached, actual),
                ));
            }
        }
        Ok(())
    }

    /// Alias for check_invariants_detailed (for test compatibility).
    pub fn validate(&self) -> BimapResult<()> {
        self.check_invariants_detailed()
    }

    // ============================================================================
    // VALIDATION HELPERS FOR OPERATIONS
    // ============================================================================

    /// Check if the bimap is in a valid state for operations
    pub fn validate_for_operation(&self, operation: &str) -> BimapResult<()> {
        self.check_invariants_detailed().map_err(|e| {
            BimapError::data_integrity(operation, &format!("Validation for {}: {}", operation, e))
        })
    }
}

// ============================================================================
// DEBUGGING AND TESTING UTILITIES
// ============================================================================

impl<L, R, CL, CR> Bimap<L, R, CL, CR> {
    /// Number of nodes on the longest root-to-leaf path of the left and the
    /// right tree. An empty bimap has heights `(0, 0)`.
    pub fn tree_heights(&self) -> (usize, usize) {
        (self.height(Side::Left), self.height(Side::Right))
    }

    fn height(&self, side: Side) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.tree.root(side), 1)];
        while let Some((id, depth)) = stack.pop() {
            if id == NULL_NODE {
                continue;
            }
            deepest = deepest.max(depth);
            let link = self.tree.link(side, id);
            stack.push((link.left, depth + 1));
            stack.push((link.right, depth + 1));
        }
        deepest
    }

    /// Emit the layout of both trees as `tracing` debug events, one per
    /// node, in pre-order.
    pub fn log_tree_structure(&self)
    where
        L: Debug,
        R: Debug,
    {
        let (left_height, right_height) = self.tree_heights();
        tracing::debug!(
            len = self.len,
            left_height,
            right_height,
            "Bimap structure"
        );

        for side in Side::BOTH {
            let mut stack = vec![(self.tree.root(side), 0usize)];
            while let Some((id, depth)) = stack.pop() {
                if id == NULL_NODE {
                    continue;
                }
                let link = self.tree.link(side, id);
                match self.tree.arena.get(id) {
                    Some(entry) => tracing::debug!(
                        side = ?side,
                        depth,
                        node = id,
                        parent = link.parent,
                        left = ?entry.left,
                        right = ?entry.right,
                        "Entry"
                    ),
                    None => tracing::debug!(side = ?side, depth, node = id, "Entry <missing>"),
                }
                stack.push((link.right, depth + 1));
                stack.push((link.left, depth + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::NULL_NODE;
    use crate::types::{Link, Side, SENTINEL};
    use crate::{Bimap, BimapError};

    fn sample() -> Bimap<i32, i32> {
        (0..16).map(|i| (i, (i * 5) % 17)).collect()
    }

    #[test]
    fn test_valid_bimap_passes() {
        let bimap = sample();
        assert!(bimap.check_invariants());
        assert_eq!(bimap.validate(), Ok(()));
        assert!(bimap.validate_for_operation("insert").is_ok());
        assert!(Bimap::<u8, u8>::new().check_invariants());
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut bimap = sample();
        let root = bimap.tree.root(Side::Right);
        let child = {
            let link = bimap.tree.link(Side::Right, root);
            if link.left != NULL_NODE { link.left } else { link.right }
        };
        bimap.tree.link_mut(Side::Right, child).parent = NULL_NODE;

        match bimap.check_invariants_detailed() {
            Err(BimapError::CorruptedTree(msg)) => assert!(msg.contains("parent")),
            other => panic!("expected corruption, got {:?}", other),
        }
    }

    #[test]
    fn test_detects_order_violation() {
        let mut bimap = sample();
        let first = bimap.tree.first(Side::Left);
        bimap.tree.arena[first].left = 99;
        let err = bimap.validate_for_operation("lookup").unwrap_err();
        assert!(matches!(err, BimapError::DataIntegrityError(_)));
        assert!(err.to_string().contains("lookup"));
    }

    #[test]
    fn test_detects_entry_missing_from_one_tree() {
        let mut bimap = sample();
        // detach the whole left tree below its root
        let root = bimap.tree.root(Side::Left);
        bimap.tree.arena[root].links[Side::Left as usize] = Link {
            parent: SENTINEL,
            ..Link::DETACHED
        };
        assert!(!bimap.check_invariants());
    }

    #[test]
    fn test_detects_length_mismatch() {
        let mut bimap = sample();
        bimap.len += 1;
        assert!(matches!(
            bimap.check_invariants_detailed(),
            Err(BimapError::DataIntegrityError(_))
        ));
    }

    #[test]
    fn test_tree_heights() {
        assert_eq!(Bimap::<i32, i32>::new().tree_heights(), (0, 0));

        let mut path = Bimap::new();
        for i in 0..10 {
            path.insert(i, i);
        }
        assert_eq!(path.tree_heights(), (10, 10));

        let mut anti = Bimap::new();
        for i in 0..10 {
            anti.insert(i, -i);
        }
        assert_eq!(anti.tree_heights(), (10, 10));

        let (left, right) = sample().tree_heights();
        assert!(left < 16 && right < 16);
    }

    #[test]
    fn test_deep_tree_is_handled_iteratively() {
        let mut bimap = Bimap::new();
        for i in 0..5_000 {
            bimap.insert(i, i);
        }
        assert_eq!(bimap.tree_heights(), (5_000, 5_000));
        assert!(bimap.check_invariants());
        assert!(bimap.erase_left_key(&2_500));
        bimap.log_tree_structure();
        let copy = bimap.clone();
        assert_eq!(copy.len(), 4_999);
    }
}
