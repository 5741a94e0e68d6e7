//! An unbalanced BST whose nodes point back at their parents. Children are owned through raw
//! pointers in the same way the standard library's `BTreeMap` owns its nodes, and the parent
//! pointer is only an observer used to walk upwards for [`Tree::successor`] and
//! [`Tree::predecessor`].
//!
//! # Examples
//!
//! ```
//! use ordered_tree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.find(&1).is_none());
//! assert!(tree.minimum().is_none());
//!
//! tree.insert(2, "two");
//! tree.insert(1, "one");
//! tree.insert(3, "three");
//! assert_eq!(tree.find(&1).map(|n| *n.value()), Some("one"));
//!
//! // Walk the keys in order using the parent pointers.
//! let one = tree.minimum().unwrap();
//! let two = tree.successor(one).unwrap().unwrap();
//! assert_eq!(*two.key(), 2);
//! assert_eq!(tree.predecessor(two), Ok(Some(one)));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::compare::{Compare, Natural};
use crate::error::TreeError;
use crate::traversal::{BreadthFirst, Order, Recursive, Traversal};

/// An unbalanced Binary Search Tree. Keys are placed using the comparator `C`: smaller keys go
/// left and equal or greater keys go right, so duplicate keys are kept (not overwritten) and
/// iterate in the order they were inserted.
pub struct Tree<K, V, C = Natural> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that handing out `&Node`s doesn't
    // conflict with the `Box`'s uniqueness and so the children's parent pointers stay valid when
    // the `Tree` moves.
    root: Link<K, V>,
    len: usize,
    comparator: C,
    marker: PhantomData<Box<Node<K, V>>>,
}

// SAFETY: The tree exclusively owns every node reachable from `root` and only hands out shared
// references to them from `&self`, so it is exactly as thread-safe as its contents.
unsafe impl<K: Send, V: Send, C: Send> Send for Tree<K, V, C> {}
// SAFETY: See above. Nothing reachable through `&Tree` can mutate a node.
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for Tree<K, V, C> {}

impl<K, V, C: Default> Default for Tree<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C> Drop for Tree<K, V, C> {
    // Nothing is balanced so the tree can be as deep as it is long. Release the nodes with an
    // explicit stack instead of recursing.
    fn drop(&mut self) {
        let mut stack: Vec<NonNull<Node<K, V>>> = self.root.take().0.into_iter().collect();
        while let Some(ptr) = stack.pop() {
            // SAFETY: We own every node reachable from the root and each one is pushed exactly
            // once (by its parent, or above for the root) so this won't be freed twice. They were
            // all allocated using `Box::new` (in `Node::new_boxed`) so this should be well
            // aligned, etc.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }
    }
}

impl<K, V, C> Clone for Tree<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone + Compare<K>,
{
    // Re-inserting in pre-order visits every node after all of its ancestors and before anything
    // else on its descent path so the clone has exactly the same shape.
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.comparator.clone());
        for node in self.pre_order() {
            tree.insert(node.key.clone(), node.value.clone());
        }
        tree
    }
}

impl<K, V, C> fmt::Debug for Tree<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|n| (&n.key, &n.value)))
            .finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generates a new, empty `Tree` ordered by the keys' [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> Tree<K, V, C> {
    /// Generates a new, empty `Tree` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// tree.insert("ccc", 3);
    /// tree.insert("a", 1);
    ///
    /// assert_eq!(tree.minimum().map(|n| *n.value()), Some(1));
    /// // Only the length matters to this comparator.
    /// assert_eq!(tree.find(&"zzz").map(|n| *n.key()), Some("ccc"));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: Link(None),
            len: 0,
            comparator,
            marker: PhantomData,
        }
    }

    /// Inserts the key and value into the tree. Equal keys never overwrite each other: the new
    /// node goes into the right subtree of any equal key it meets on the way down.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, "first");
    /// tree.insert(1, "second");
    ///
    /// assert_eq!(tree.len(), 2);
    /// // The shallowest match wins.
    /// assert_eq!(tree.find(&1).map(|n| *n.value()), Some("first"));
    /// ```
    pub fn insert(&mut self, key: K, value: V)
    where
        C: Compare<K>,
    {
        let mut new_node = Node::new_boxed(key, value);
        self.len += 1;

        let Some(mut current) = self.root.0 else {
            self.root = Link(Some(NonNull::from(Box::leak(new_node))));
            trace!(depth = 0, "inserted root");
            return;
        };

        let mut depth = 1usize;
        loop {
            // SAFETY: Every link reachable from the root points at a live node owned by this
            // tree. We hold `&mut self` so no `&Node` handed out earlier can still be alive, and
            // `as_ptr` doesn't borrow `current` so we can keep walking with it.
            let node = unsafe { &mut *current.as_ptr() };
            let slot = match self.comparator.compare(&new_node.key, &node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Equal | Ordering::Greater => &mut node.right,
            };

            match slot.0 {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => {
                    new_node.parent = Link(Some(current));
                    *slot = Link(Some(NonNull::from(Box::leak(new_node))));
                    trace!(depth, "inserted node");
                    return;
                }
            }
        }
    }

    /// Inserts each pair in iteration order. Since nothing is rebalanced the order determines
    /// the shape of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert_all((1..=3).map(|k| (k, k * 10)));
    ///
    /// // Ascending input gives a right-leaning list.
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn insert_all<I>(&mut self, pairs: I)
    where
        C: Compare<K>,
        I: IntoIterator<Item = (K, V)>,
    {
        let before = self.len;
        for (key, value) in pairs {
            self.insert(key, value);
        }
        debug!(inserted = self.len - before, len = self.len, "bulk insert");
    }

    /// Potentially finds the node with the given key. With duplicate keys this is the shallowest
    /// one, which is also the one inserted first.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.find(&1).map(|n| *n.value()), Some(2));
    /// assert!(tree.find(&42).is_none());
    /// ```
    pub fn find(&self, key: &K) -> Option<&Node<K, V>>
    where
        C: Compare<K>,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Whether any node has a key equal to `key`.
    pub fn contains_key(&self, key: &K) -> bool
    where
        C: Compare<K>,
    {
        self.find(key).is_some()
    }

    /// The number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels in the tree. An empty tree has a height of 0 and a single node has a
    /// height of 1.
    pub fn height(&self) -> usize {
        let mut level: Vec<&Node<K, V>> = self.root().into_iter().collect();
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|n| n.left().into_iter().chain(n.right()))
                .collect();
        }
        height
    }

    /// The root node, if there is one.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.node()
    }

    /// The node with the smallest key or `None` if the tree is empty.
    pub fn minimum(&self) -> Option<&Node<K, V>> {
        self.root().map(Node::minimum)
    }

    /// The node with the largest key or `None` if the tree is empty. With duplicate keys this is
    /// the one inserted last.
    pub fn maximum(&self) -> Option<&Node<K, V>> {
        self.root().map(Node::maximum)
    }

    /// The node that comes after `node` in key order. `Ok(None)` means `node` is the last one.
    ///
    /// # Errors
    ///
    /// [`TreeError::ForeignNode`] if `node` wasn't obtained from this tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert_all([(2, ()), (1, ()), (3, ())]);
    ///
    /// let max = tree.maximum().unwrap();
    /// assert_eq!(tree.successor(max), Ok(None));
    ///
    /// let mut other = Tree::new();
    /// other.insert(2, ());
    /// assert_eq!(tree.successor(other.root().unwrap()), Err(TreeError::ForeignNode));
    /// ```
    pub fn successor<'a>(
        &'a self,
        node: &'a Node<K, V>,
    ) -> Result<Option<&'a Node<K, V>>, TreeError> {
        self.check_owned(node)?;
        Ok(node.successor())
    }

    /// The node that comes before `node` in key order. `Ok(None)` means `node` is the first one.
    ///
    /// # Errors
    ///
    /// [`TreeError::ForeignNode`] if `node` wasn't obtained from this tree.
    pub fn predecessor<'a>(
        &'a self,
        node: &'a Node<K, V>,
    ) -> Result<Option<&'a Node<K, V>>, TreeError> {
        self.check_owned(node)?;
        Ok(node.predecessor())
    }

    /// Iterates over the nodes in key order. This is the same as [`Tree::in_order`].
    pub fn iter(&self) -> Traversal<'_, K, V> {
        self.in_order()
    }

    /// Left subtree, node, right subtree, using an explicit stack.
    pub fn in_order(&self) -> Traversal<'_, K, V> {
        Traversal::new(self.root(), Order::InOrder)
    }

    /// Node, left subtree, right subtree, using an explicit stack.
    pub fn pre_order(&self) -> Traversal<'_, K, V> {
        Traversal::new(self.root(), Order::PreOrder)
    }

    /// Left subtree, right subtree, node, using an explicit stack.
    pub fn post_order(&self) -> Traversal<'_, K, V> {
        Traversal::new(self.root(), Order::PostOrder)
    }

    /// The same sequence as [`Tree::in_order`] built by recursing into each subtree. Each call to
    /// `next` nests as deep as the tree so prefer [`Tree::in_order`] for degenerate trees.
    pub fn in_order_recursive(&self) -> Recursive<'_, K, V> {
        Recursive::new(self.root(), Order::InOrder)
    }

    /// The same sequence as [`Tree::pre_order`] built by recursing into each subtree.
    pub fn pre_order_recursive(&self) -> Recursive<'_, K, V> {
        Recursive::new(self.root(), Order::PreOrder)
    }

    /// The same sequence as [`Tree::post_order`] built by recursing into each subtree.
    pub fn post_order_recursive(&self) -> Recursive<'_, K, V> {
        Recursive::new(self.root(), Order::PostOrder)
    }

    /// Level by level from the root, left to right within a level.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_, _> = [(4, ()), (2, ()), (6, ()), (1, ())].into_iter().collect();
    /// let keys: Vec<_> = tree.breadth_first().map(|n| *n.key()).collect();
    ///
    /// assert_eq!(keys, [4, 2, 6, 1]);
    /// ```
    pub fn breadth_first(&self) -> BreadthFirst<'_, K, V> {
        BreadthFirst::new(self.root())
    }

    /// Ensures `node` lives in this tree by climbing to the top of its tree and comparing that to
    /// our root.
    fn check_owned(&self, node: &Node<K, V>) -> Result<(), TreeError> {
        let mut top = node;
        while let Some(parent) = top.parent() {
            top = parent;
        }

        if self.root.points_to(top) {
            Ok(())
        } else {
            debug!("rejected a node from another tree");
            Err(TreeError::ForeignNode)
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a Tree<K, V, C> {
    type Item = &'a Node<K, V>;
    type IntoIter = Traversal<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for Tree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.insert_all(iter);
        tree
    }
}

struct Link<K, V>(Option<NonNull<Node<K, V>>>);

impl<K, V> Clone for Link<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, V> Copy for Link<K, V> {}

impl<K, V> Link<K, V> {
    fn node(&self) -> Option<&Node<K, V>> {
        // SAFETY: If the link is not `None` then it points at a valid `Node` owned by the tree
        // this link lives in. Nodes are never freed or moved until the whole tree drops and they
        // are only mutated through `&mut Tree`, so the shared reference can't alias a mutable one.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn points_to(&self, node: &Node<K, V>) -> bool {
        self.0 == Some(NonNull::from(node))
    }
}

/// A node in a [`Tree`]. Nodes are only ever handed out by reference so the tree can be walked
/// from any of them.
pub struct Node<K, V> {
    key: K,
    value: V,
    parent: Link<K, V>,
    left: Link<K, V>,
    right: Link<K, V>,
}

// SAFETY: A `&Node` only gives shared access to its key, its value and other nodes of the same
// tree, which `Tree`'s `Sync` bound already covers.
unsafe impl<K: Sync, V: Sync> Sync for Node<K, V> {}
// SAFETY: Nodes are never handed out by value. This only exists so `&Node` is `Send` when `Node`
// is `Sync`.
unsafe impl<K: Send, V: Send> Send for Node<K, V> {}

impl<K, V> fmt::Debug for Node<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Nodes are compared by identity. Two different nodes with equal keys and values are not equal.
impl<K, V> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl<K, V> Eq for Node<K, V> {}

impl<K, V> Node<K, V> {
    fn new_boxed(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: Link(None),
            parent: Link(None),
            right: Link(None),
        })
    }

    /// The key this node was inserted with.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value this node was inserted with.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The parent of this node. Only the root has no parent.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    /// The root of this node's left subtree.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The root of this node's right subtree.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// Whether this node is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.parent.0.is_none()
    }

    /// The node with the smallest key in the subtree rooted at this node.
    pub fn minimum(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        node
    }

    /// The node with the largest key in the subtree rooted at this node.
    pub fn maximum(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right() {
            node = right;
        }
        node
    }

    /// The leftmost node of the right subtree if there is one. Otherwise the first ancestor we
    /// reach by climbing up from a left child.
    fn successor(&self) -> Option<&Self> {
        if let Some(right) = self.right() {
            return Some(right.minimum());
        }

        let mut node = self;
        let mut parent = node.parent();
        while let Some(p) = parent {
            if !p.right.points_to(node) {
                break;
            }
            node = p;
            parent = p.parent();
        }
        parent
    }

    /// Mirror image of [`Node::successor`].
    fn predecessor(&self) -> Option<&Self> {
        if let Some(left) = self.left() {
            return Some(left.maximum());
        }

        let mut node = self;
        let mut parent = node.parent();
        while let Some(p) = parent {
            if !p.left.points_to(node) {
                break;
            }
            node = p;
            parent = p.parent();
        }
        parent
    }
}


#[cfg(test)]
mod quicktests {
    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and to a `Vec` of everything inserted. Duplicates go
    /// right so a stable sort of the `Vec` by key is exactly the in-order traversal.
    fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut Tree<K, V>, model: &mut Vec<(K, V)>)
    where
        K: Clone + Ord + std::fmt::Debug,
        V: Clone + PartialEq + std::fmt::Debug,
    {
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    bst.insert(k.clone(), v.clone());
                    model.push((k.clone(), v.clone()));
                }
                Op::Find(k) => {
                    let expected = model.iter().find(|(key, _)| key == k).map(|(_, v)| v);
                    assert_eq!(bst.find(k).map(Node::value), expected);
                }
                Op::Iter => {
                    let mut sorted = model.clone();
                    sorted.sort_by(|a, b| a.0.cmp(&b.0));
                    let actual: Vec<_> = bst
                        .iter()
                        .map(|n| (n.key.clone(), n.value.clone()))
                        .collect();
                    assert_eq!(actual, sorted);
                }
            }
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
            let mut tree = Tree::new();
            let mut model = Vec::new();

            do_ops(&ops, &mut tree, &mut model);
            tree.len() == model.len()
                && model.iter().all(|(key, _)| tree.contains_key(key))
        }
    }

    quickcheck::quickcheck! {
        fn contains(xs: Vec<i8>) -> bool {
            let mut tree = Tree::new();
            for x in &xs {
                tree.insert(*x, *x);
            }

            xs.iter().all(|x| tree.find(x).map(Node::value) == Some(x))
        }
    }

    quickcheck::quickcheck! {
        fn successor_undoes_predecessor(xs: Vec<i8>) -> bool {
            let tree: Tree<i8, ()> = xs.iter().map(|&x| (x, ())).collect();

            tree.iter().all(|node| {
                let next_ok = match tree.successor(node) {
                    Ok(Some(next)) => tree.predecessor(next) == Ok(Some(node)),
                    Ok(None) => Some(node) == tree.maximum(),
                    Err(_) => false,
                };
                let prev_ok = match tree.predecessor(node) {
                    Ok(Some(prev)) => tree.successor(prev) == Ok(Some(node)),
                    Ok(None) => Some(node) == tree.minimum(),
                    Err(_) => false,
                };
                next_ok && prev_ok
            })
        }
    }
}
