//! Depth-first and breadth-first walks over a [`Tree`][crate::Tree].
//!
//! Every depth-first order exists twice. [`Traversal`] simulates the call stack with an explicit
//! `Vec` of work entries and is what [`Tree::iter`][crate::Tree::iter] uses. [`Recursive`] is the
//! textbook definition, a lazy concatenation of the two subtrees and the node itself, and yields
//! exactly the same sequence.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::{Node, Tree};
//!
//! fn keys<'a>(nodes: impl Iterator<Item = &'a Node<i32, ()>>) -> Vec<i32> {
//!     nodes.map(|n| *n.key()).collect()
//! }
//!
//! let tree: Tree<_, _> = [4, 2, 6, 3, 1, 5, 7].iter().map(|&k| (k, ())).collect();
//!
//! assert_eq!(keys(tree.pre_order()), [4, 2, 1, 3, 6, 5, 7]);
//! assert_eq!(keys(tree.pre_order_recursive()), [4, 2, 1, 3, 6, 5, 7]);
//! assert_eq!(keys(tree.post_order()), [1, 3, 2, 5, 7, 6, 4]);
//! assert_eq!(keys(tree.breadth_first()), [4, 2, 6, 1, 3, 5, 7]);
//! ```

use std::collections::VecDeque;
use std::iter::{self, FusedIterator};

use crate::tree::Node;

/// When a node is emitted relative to its subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, node, right subtree.
    InOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// What to do with a node when its stack entry is popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// Replace the entry with the node's children and the node itself.
    Expand,
    /// Yield the node.
    Emit,
}

/// A depth-first traversal driven by an explicit stack, so walking a degenerate tree doesn't
/// recurse once per level.
pub struct Traversal<'a, K, V> {
    order: Order,
    stack: Vec<(&'a Node<K, V>, Visit)>,
}

impl<K, V> Clone for Traversal<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K, V> Traversal<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, order: Order) -> Self {
        Self {
            order,
            stack: root.map(|node| (node, Visit::Expand)).into_iter().collect(),
        }
    }

    /// The order this traversal emits nodes in.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Pushes the node's entries in the reverse of the order they should come out in. Missing
    /// children are skipped.
    fn expand(&mut self, node: &'a Node<K, V>) {
        let left = node.left().map(|n| (n, Visit::Expand));
        let right = node.right().map(|n| (n, Visit::Expand));
        let this = Some((node, Visit::Emit));

        let entries = match self.order {
            Order::PreOrder => [right, left, this],
            Order::InOrder => [right, this, left],
            Order::PostOrder => [this, right, left],
        };
        self.stack.extend(entries.into_iter().flatten());
    }
}

impl<'a, K, V> Iterator for Traversal<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, visit)) = self.stack.pop() {
            match visit {
                Visit::Emit => return Some(node),
                Visit::Expand => self.expand(node),
            }
        }
        None
    }
}

impl<K, V> FusedIterator for Traversal<'_, K, V> {}

type Nodes<'a, K, V> = Box<dyn Iterator<Item = &'a Node<K, V>> + 'a>;

/// A depth-first traversal defined by structural recursion. Subtrees are only expanded once the
/// iterator reaches them but each `next` call nests once per level of the tree.
pub struct Recursive<'a, K, V> {
    inner: Nodes<'a, K, V>,
}

impl<'a, K, V> Recursive<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, order: Order) -> Self {
        Self {
            inner: subtree(root, order),
        }
    }
}

/// The nodes of the subtree rooted at `node`. An absent subtree is empty.
fn subtree<'a, K, V>(node: Option<&'a Node<K, V>>, order: Order) -> Nodes<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    let Some(node) = node else {
        return Box::new(iter::empty());
    };

    let this = iter::once(node);
    let left = deferred(node.left(), order);
    let right = deferred(node.right(), order);
    match order {
        Order::PreOrder => Box::new(this.chain(left).chain(right)),
        Order::InOrder => Box::new(left.chain(this).chain(right)),
        Order::PostOrder => Box::new(left.chain(right).chain(this)),
    }
}

/// Like [`subtree`] but doesn't build anything until it's first polled.
fn deferred<'a, K, V>(
    node: Option<&'a Node<K, V>>,
    order: Order,
) -> impl Iterator<Item = &'a Node<K, V>> + 'a
where
    K: 'a,
    V: 'a,
{
    iter::once_with(move || subtree(node, order)).flatten()
}

impl<'a, K, V> Iterator for Recursive<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A level-order traversal: every node at one depth before any node at the next, left to right.
pub struct BreadthFirst<'a, K, V> {
    queue: VecDeque<&'a Node<K, V>>,
}

impl<K, V> Clone for BreadthFirst<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<'a, K, V> BreadthFirst<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        Self {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for BreadthFirst<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node)
    }
}

impl<K, V> FusedIterator for BreadthFirst<'_, K, V> {}

#[cfg(test)]
mod tests {
    use crate::Tree;

    fn keys<'a>(nodes: impl Iterator<Item = &'a crate::Node<i32, i32>>) -> Vec<i32> {
        nodes.map(|n| *n.key()).collect()
    }

    fn tree_of(keys: &[i32]) -> Tree<i32, i32> {
        keys.iter().map(|&k| (k, -k)).collect()
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = tree_of(&[]);

        assert!(tree.in_order().next().is_none());
        assert!(tree.pre_order().next().is_none());
        assert!(tree.post_order().next().is_none());
        assert!(tree.in_order_recursive().next().is_none());
        assert!(tree.pre_order_recursive().next().is_none());
        assert!(tree.post_order_recursive().next().is_none());
        assert!(tree.breadth_first().next().is_none());
    }

    #[test]
    fn single_node() {
        let tree = tree_of(&[1]);

        assert_eq!(keys(tree.in_order()), [1]);
        assert_eq!(keys(tree.pre_order_recursive()), [1]);
        assert_eq!(keys(tree.post_order()), [1]);
        assert_eq!(keys(tree.breadth_first()), [1]);
    }

    #[test]
    fn in_order() {
        let tree = tree_of(&[4, 2, 6, 3, 1, 5, 7]);

        assert_eq!(keys(tree.in_order()), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(keys(tree.in_order_recursive()), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(keys((&tree).into_iter()), [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn pre_order() {
        let tree = tree_of(&[4, 2, 6, 3, 1, 5, 7]);

        assert_eq!(keys(tree.pre_order()), [4, 2, 1, 3, 6, 5, 7]);
        assert_eq!(keys(tree.pre_order_recursive()), [4, 2, 1, 3, 6, 5, 7]);
    }

    #[test]
    fn post_order() {
        let tree = tree_of(&[4, 2, 6, 3, 1, 5, 7]);

        assert_eq!(keys(tree.post_order()), [1, 3, 2, 5, 7, 6, 4]);
        assert_eq!(keys(tree.post_order_recursive()), [1, 3, 2, 5, 7, 6, 4]);
    }

    #[test]
    fn breadth_first() {
        let tree = tree_of(&[4, 2, 6, 3, 1, 5, 7]);

        assert_eq!(keys(tree.breadth_first()), [4, 2, 6, 1, 3, 5, 7]);
    }

    #[test]
    fn lopsided_trees() {
        let left = tree_of(&[3, 2, 1]);
        assert_eq!(keys(left.pre_order()), [3, 2, 1]);
        assert_eq!(keys(left.post_order()), [1, 2, 3]);
        assert_eq!(keys(left.breadth_first()), [3, 2, 1]);

        let right = tree_of(&[1, 2, 3]);
        assert_eq!(keys(right.pre_order()), [1, 2, 3]);
        assert_eq!(keys(right.post_order_recursive()), [3, 2, 1]);
        assert_eq!(keys(right.in_order()), [1, 2, 3]);
    }

    #[test]
    fn traversals_restart() {
        let tree = tree_of(&[2, 1, 3]);

        let mut first = tree.in_order();
        assert_eq!(first.next().map(|n| *n.key()), Some(1));

        // A new call starts over without touching the first one.
        assert_eq!(keys(tree.in_order()), [1, 2, 3]);
        assert_eq!(keys(first), [2, 3]);
    }

    #[test]
    fn clones_are_independent() {
        let tree = tree_of(&[2, 1, 3]);

        let mut bfs = tree.breadth_first();
        bfs.next();
        assert_eq!(keys(bfs.clone()), [1, 3]);
        assert_eq!(keys(bfs), [1, 3]);

        let mut post = tree.post_order();
        post.next();
        assert_eq!(keys(post.clone()), keys(post));
    }

    #[test]
    fn iterative_is_fused() {
        let tree = tree_of(&[1]);
        let mut iter = tree.pre_order();

        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
