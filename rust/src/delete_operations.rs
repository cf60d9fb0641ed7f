//! DELETE operations for Bimap.
//!
//! Removing an entry replaces it, in each tree, by the merge of its two
//! children. Handles to every other entry stay valid.

use paste::paste;

use crate::arena::NodeId;
use crate::compare::Comparator;
use crate::types::{Bimap, LeftHandle, RightHandle, Side};

impl<L, R, CL, CR> Bimap<L, R, CL, CR>
where
    CL: Comparator<L>,
    CR: Comparator<R>,
{
    /// Unlink entry `id` from both trees and hand back its pair.
    ///
    /// Panics if `id` is not a live entry; that includes the sentinel.
    pub(crate) fn unlink_entry(&mut self, id: NodeId) -> (L, R) {
        let entry = match self.tree.arena.deallocate(id) {
            Some(entry) => entry,
            None => panic!("cannot erase node {}: not a live entry of this bimap", id),
        };

        for side in Side::BOTH {
            let link = entry.links[side.index()];
            let replacement = self.merge(side, link.left, link.right);
            self.tree.replace_child(side, link.parent, id, replacement);
        }
        self.len -= 1;
        self.mark_stale();
        (entry.left, entry.right)
    }
}

macro_rules! erase_side {
    ($side:ident, $Side:ident, $Key:ident, $Other:ident, $cmp:ident, $key_field:ident, $other_field:ident) => {
        paste! {
            #[doc = "Erase the entry `handle` refers to and return the handle that follows it in " $side " order."]
            ///
            /// # Panics
            ///
            /// Panics if `handle` is the end handle or its entry was already
            /// erased, even if a newer entry now occupies its storage.
            pub fn [<erase_ $side>](&mut self, handle: [<$Side Handle>]) -> [<$Side Handle>] {
                let id = self.position(handle);
                let next = self.tree.successor(Side::$Side, id);
                self.unlink_entry(id);
                self.handle(next)
            }

            #[doc = "Erase the pair whose " $side " value is `key`. Returns false if there is none."]
            pub fn [<erase_ $side _key>](&mut self, key: &$Key) -> bool {
                let found = self.[<find_ $side>](key);
                if found.is_end() {
                    return false;
                }
                self.unlink_entry(found.node);
                true
            }

            #[doc = "Erase every entry from `first` up to, not including, `last` in " $side " order."]
            ///
            /// `last` must be reachable from `first`. Returns `last`.
            pub fn [<erase_ $side _range>](
                &mut self,
                mut first: [<$Side Handle>],
                last: [<$Side Handle>],
            ) -> [<$Side Handle>] {
                while first != last {
                    first = self.[<erase_ $side>](first);
                }
                last
            }

            #[doc = "Remove the pair whose " $side " value is `key` and return it."]
            pub fn [<remove_by_ $side>](&mut self, key: &$Key) -> Option<(L, R)> {
                let found = self.[<find_ $side>](key);
                if found.is_end() {
                    None
                } else {
                    Some(self.unlink_entry(found.node))
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
    for_each_side!(erase_side);
}
