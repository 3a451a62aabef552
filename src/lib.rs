//! An insert-only AVL tree.
//!
//! [`AvlTree`] keeps values of one `Ord` type in a binary search tree that
//! rebalances itself after every insertion, so every node's two subtrees
//! differ in height by at most one. Nodes cache their height; an absent
//! child counts as [`EMPTY_HEIGHT`] (`-1`), a leaf as `0`.
//!
//! Besides exact-value [`search`](AvlTree::search), the tree exposes its
//! shape read-only through [`AvlTree::root`] and the [`Node`] accessors, and
//! supports in-order and level-order traversal.
//!
//! Rotations are reported at `trace` level through the `log` facade.
//!
//! There is no removal.

mod tree;
pub use tree::{AvlTree, Iter, LevelOrder, Node, EMPTY_HEIGHT};
