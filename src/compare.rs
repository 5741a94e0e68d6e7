//! The ordering capability a [`Tree`][crate::Tree] uses to place its keys.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::Tree;
//!
//! // Largest key first.
//! let mut tree = Tree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
//! tree.insert_all([(1, "one"), (3, "three"), (2, "two")]);
//!
//! let keys: Vec<_> = tree.iter().map(|n| *n.key()).collect();
//! assert_eq!(keys, [3, 2, 1]);
//! ```

use std::cmp::Ordering;

/// A total order over `K`.
pub trait Compare<K: ?Sized> {
    /// Compares `a` to `b`. Must be a total order for the tree to behave.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation. This is the default comparator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
