//! Ordered bidirectional map in Rust.
//!
//! This crate provides [`Bimap`], a set of `(left, right)` pairs in which every
//! left value and every right value is unique. Each pair is stored once and
//! threaded through two binary search trees, one ordered by left value and one
//! by right value, so lookups, bounds, ranges and ordered iteration work the
//! same way from either side.
//!
//! Positions are expressed as [`LeftHandle`] and [`RightHandle`]. A handle
//! stays valid until the entry it names is erased, and can be flipped to view
//! the same entry in the other ordering.
//!
//! ```
//! use treebimap::Bimap;
//!
//! let mut ports = Bimap::new();
//! ports.insert("http", 80);
//! ports.insert("https", 443);
//! ports.insert("ssh", 22);
//!
//! assert_eq!(ports.get_by_right(&443), Some(&"https"));
//! let by_port: Vec<_> = ports.right_values().copied().collect();
//! assert_eq!(by_port, vec![22, 80, 443]);
//!
//! let h = ports.find_left(&"ssh");
//! let next_by_port = ports.next(h.flip());
//! assert_eq!(ports.left_value(next_by_port), Some(&"http"));
//! ```

#[macro_use]
mod macros;

mod arena;
mod compare;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod split_merge;
mod types;
mod validation;

pub use arena::ArenaStats;
pub use compare::{Comparator, Natural, Reversed};
pub use error::{BimapError, BimapResult, BimapResultExt, InitResult, KeyResult, ModifyResult};
pub use iteration::{IntoIter, Iter, Range};
pub use types::{Bimap, Handle, LeftHandle, RightHandle, Side};
