//! An unbalanced, ordered Binary Search Tree with parent pointers and every classic traversal.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert and find stored
//! records. BSTs are typically defined recursively using the notion of a `Node`. A `Node` stores
//! a key, a value and sometimes child `Node`s. The invariants of this BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have a key less than its own key.
//! 2. For every `Node`, all the `Node`s in its right subtree have a key greater than or equal to
//!    its own key. Duplicate keys are kept, not overwritten.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)` where `height` is the longest path from the root to a leaf. This
//! tree never rebalances so the height depends entirely on the order keys were inserted in. In
//! the worst case (sorted input) it is the number of nodes, which is why every walk over the
//! tree, and dropping it, uses an explicit stack or queue rather than the call stack.
//!
//! ## Navigation
//!
//! Each `Node` also points back at its parent. That lets [`Tree::successor`] and
//! [`Tree::predecessor`] step to the next or previous key in `O(height)` without searching from
//! the root again.
//!
//! ## Traversals
//!
//! In-order, pre-order and post-order traversals come in two flavors which always agree: an
//! iterative one driven by an explicit stack ([`Tree::in_order`] and friends) and a recursive one
//! ([`Tree::in_order_recursive`] and friends). [`Tree::breadth_first`] walks level by level.
//! Iterating over `&Tree` is the iterative in-order traversal.
//!
//! ```
//! use ordered_tree::Tree;
//!
//! let tree: Tree<_, _> = [(4, "d"), (2, "b"), (6, "f"), (1, "a")].into_iter().collect();
//!
//! let values: Vec<_> = tree.iter().map(|n| *n.value()).collect();
//! assert_eq!(values, ["a", "b", "d", "f"]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod compare;
mod error;
pub mod traversal;
mod tree;


pub use compare::{Compare, Natural};
pub use error::TreeError;
pub use traversal::{BreadthFirst, Order, Recursive, Traversal};
pub use tree::{Node, Tree};
