use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;

use log::trace;

/// Height an absent child contributes to its parent's height and balance.
pub const EMPTY_HEIGHT: i32 = -1;

type Link<T> = Option<Box<Node<T>>>;

/// An insert-only, self-balancing binary search tree.
///
/// Every node's two subtrees differ in height by at most one, so search and
/// insertion are `O(log n)`. Values are kept in their natural (`Ord`) order
/// and duplicates are ignored.
///
/// ```
/// use avl_insert::AvlTree;
/// let mut tree = AvlTree::new();
/// tree.insert(30);
/// tree.insert(20);
/// tree.insert(10);
/// let root = tree.root().unwrap();
/// assert_eq!(root.value(), &20);
/// assert_eq!(root.left().map(|n| *n.value()), Some(10));
/// assert_eq!(root.right().map(|n| *n.value()), Some(30));
/// ```
#[derive(Clone)]
pub struct AvlTree<T> {
    root: Link<T>,
    num_nodes: usize,
}

/// A single tree node: one value, two owned children and a cached height.
///
/// Nodes are owned by their parent (or by the tree, for the root) and are
/// only ever handed out by shared reference.
#[derive(Clone, Debug)]
pub struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    height: i32,
}

/// A borrowing iterator over the values of a tree, in ascending order.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

/// A borrowing iterator over the nodes of a tree, breadth first.
pub struct LevelOrder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// What inserting into a subtree did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    /// The value was already present. Nothing below changed.
    Duplicate,
    /// A fresh leaf now roots the subtree.
    Created,
    /// The value went below the subtree root, on the given side.
    Descended(Side),
}

impl<T> Node<T> {
    fn leaf(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    /// Returns the stored value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the left child, holding only smaller values.
    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    /// Returns the right child, holding only greater values.
    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    /// Returns the number of edges on the longest path down to a leaf.
    /// A leaf has height 0.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the right subtree height minus the left subtree height.
    /// Positive means right-heavy, negative means left-heavy.
    pub fn balance_factor(&self) -> i32 {
        link_height(&self.right) - link_height(&self.left)
    }

    /// Refreshes the cached height from the children.
    /// Must run after either child link changes and before the height is read.
    pub(crate) fn recompute_height(&mut self) {
        self.height = 1 + cmp::max(link_height(&self.left), link_height(&self.right));
    }
}

fn link_height<T>(link: &Link<T>) -> i32 {
    link.as_ref().map_or(EMPTY_HEIGHT, |node| node.height)
}

impl<T: Ord> AvlTree<T> {
    /// Creates an empty tree.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the root node, or [`EMPTY_HEIGHT`] for an empty tree.
    pub fn height(&self) -> i32 {
        link_height(&self.root)
    }

    /// Returns the topmost node, if any.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the node holding a value equal to `value`.
    pub fn search(&self, value: &T) -> Option<&Node<T>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match value.cmp(&node.value) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Returns true if the tree holds a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.search(value).is_some()
    }

    /// Inserts a value, rebalancing on the way back up.
    /// Returns false, leaving the tree untouched, if an equal value is already present.
    pub fn insert(&mut self, value: T) -> bool {
        let (root, placement) = Self::insert_into(self.root.take(), value);
        self.root = Some(root);
        if placement == Placement::Duplicate {
            return false;
        }
        self.num_nodes += 1;
        true
    }

    /// Returns an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.num_nodes,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Returns an iterator visiting the root, then every node at depth 1,
    /// then depth 2, and so on, left to right within a level.
    pub fn level_order(&self) -> LevelOrder<'_, T> {
        LevelOrder {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Calls `f` on every node in level order.
    pub fn traverse_level_order<F: FnMut(&Node<T>)>(&self, mut f: F) {
        for node in self.level_order() {
            f(node);
        }
    }

    /// Returns the tree row by row. Row `d` has `2^d` slots, left to right,
    /// with `None` where no node sits. The last row holds at least one value.
    pub fn levels(&self) -> Vec<Vec<Option<&T>>> {
        let mut levels = Vec::new();
        let mut row = vec![self.root.as_deref()];
        while row.iter().any(Option::is_some) {
            levels.push(row.iter().map(|slot| slot.map(Node::value)).collect());
            row = row
                .iter()
                .flat_map(|slot| match slot {
                    Some(node) => [node.left(), node.right()],
                    None => [None, None],
                })
                .collect();
        }
        levels
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        for node in self.level_order() {
            let left_height = link_height(&node.left);
            let right_height = link_height(&node.right);

            // Check direct children order
            if let Some(left) = node.left() {
                assert!(left.value < node.value);
            }
            if let Some(right) = node.right() {
                assert!(right.value > node.value);
            }

            // Check height
            assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            num_nodes += 1;
        }

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);

        // Check ordering across subtrees
        let mut values = self.iter();
        if let Some(mut prev) = values.next() {
            for value in values {
                assert!(prev < value);
                prev = value;
            }
        }
    }

    /// Inserts `value` into the subtree owned by `link` and hands back the
    /// subtree's (possibly rotated) root for the caller to re-link.
    fn insert_into(link: Link<T>, value: T) -> (Box<Node<T>>, Placement) {
        let mut node = match link {
            None => return (Node::leaf(value), Placement::Created),
            Some(node) => node,
        };

        let side = match value.cmp(&node.value) {
            Ordering::Equal => return (node, Placement::Duplicate),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };

        let below = match side {
            Side::Left => {
                let (child, below) = Self::insert_into(node.left.take(), value);
                node.left = Some(child);
                below
            }
            Side::Right => {
                let (child, below) = Self::insert_into(node.right.take(), value);
                node.right = Some(child);
                below
            }
        };
        if below == Placement::Duplicate {
            return (node, Placement::Duplicate);
        }

        node.recompute_height();
        (Self::rebalance(node, below), Placement::Descended(side))
    }

    /// Restores the AVL condition at `node` if the last insertion broke it.
    /// `below` tells where the inserted value went relative to the child on
    /// the heavy side, which selects between a single and a double rotation.
    fn rebalance(node: Box<Node<T>>, below: Placement) -> Box<Node<T>> {
        let balance = node.balance_factor();
        debug_assert!((-2..=2).contains(&balance));
        if balance < -1 {
            if below == Placement::Descended(Side::Left) {
                trace!("left-left imbalance at height {}, rotating right", node.height);
                Self::rotate_right(node)
            } else {
                trace!("left-right imbalance at height {}, rotating left-right", node.height);
                Self::rotate_left_right(node)
            }
        } else if balance > 1 {
            if below == Placement::Descended(Side::Right) {
                trace!("right-right imbalance at height {}, rotating left", node.height);
                Self::rotate_left(node)
            } else {
                trace!("right-left imbalance at height {}, rotating right-left", node.height);
                Self::rotate_right_left(node)
            }
        } else {
            node
        }
    }

    fn rotate_left(mut pivot: Box<Node<T>>) -> Box<Node<T>> {
        match pivot.right.take() {
            None => pivot,
            Some(mut right) => {
                pivot.right = right.left.take();
                pivot.recompute_height();
                right.left = Some(pivot);
                right.recompute_height();
                right
            }
        }
    }

    fn rotate_right(mut pivot: Box<Node<T>>) -> Box<Node<T>> {
        match pivot.left.take() {
            None => pivot,
            Some(mut left) => {
                pivot.left = left.right.take();
                pivot.recompute_height();
                left.right = Some(pivot);
                left.recompute_height();
                left
            }
        }
    }

    fn rotate_left_right(mut pivot: Box<Node<T>>) -> Box<Node<T>> {
        pivot.left = pivot.left.take().map(Self::rotate_left);
        Self::rotate_right(pivot)
    }

    fn rotate_right_left(mut pivot: Box<Node<T>>) -> Box<Node<T>> {
        pivot.right = pivot.right.take().map(Self::rotate_right);
        Self::rotate_left(pivot)
    }
}

impl<T: Ord> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T: Ord> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut current: Option<&'a Node<T>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Iterator for LevelOrder<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node)
    }
}
