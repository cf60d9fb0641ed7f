//! Macros that stamp out the side-symmetric parts of the API.
//!
//! Most bimap operations exist once per side (`find_left` / `find_right`,
//! `erase_left` / `erase_right`, ...). Each operation module defines a
//! `macro_rules!` body parameterized by side and feeds it to
//! [`for_each_side!`], which expands it for the left and the right view.

/// Expand `$mac!` once per side of the bimap.
///
/// Arguments passed to `$mac`, in order: the side's lowercase name, its
/// `Side` variant, its key type parameter, the opposite type parameter, the
/// comparator field, the entry field holding the key and the entry field
/// holding the opposite value.
macro_rules! for_each_side {
    ($mac:ident) => {
        $mac!(left, Left, L, R, cmp_left, left, right);
        $mac!(right, Right, R, L, cmp_right, right, left);
    };
}

/// Define the handle type of one side.
macro_rules! side_handle {
    ($side:ident, $Side:ident, $Opposite:ident) => {
        ::paste::paste! {
            #[doc = "A stable reference to one entry, viewed in " $side " order."]
            #[doc = ""]
            #[doc = "The handle stays valid until its entry is erased; after that the"]
            #[doc = "bimap rejects it, even once the entry's storage is reused. The end"]
            #[doc = "handle never changes across mutations."]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct [<$Side Handle>] {
                pub(crate) node: NodeId,
                pub(crate) generation: u32,
            }

            impl [<$Side Handle>] {
                /// The past-the-end handle.
                pub const END: Self = Self {
                    node: SENTINEL,
                    generation: 0,
                };

                /// Returns true if this is the past-the-end handle.
                #[inline]
                pub fn is_end(self) -> bool {
                    self.node == SENTINEL
                }

                /// View the same entry from the other side.
                #[inline]
                pub fn flip(self) -> [<$Opposite Handle>] {
                    [<$Opposite Handle>] {
                        node: self.node,
                        generation: self.generation,
                    }
                }
            }

            impl private::Sealed for [<$Side Handle>] {}

            impl Handle for [<$Side Handle>] {
                const SIDE: Side = Side::$Side;

                #[inline]
                fn node(self) -> NodeId {
                    self.node
                }

                #[inline]
                fn generation(self) -> u32 {
                    self.generation
                }

                #[inline]
                fn from_parts(node: NodeId, generation: u32) -> Self {
                    Self { node, generation }
                }
            }
        }
    };
}
