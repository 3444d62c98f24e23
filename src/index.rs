// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! AVL-balanced ordered index with duplicate tolerance.
//!
//! Each distinct key owns one node, and each node owns a [`Chain`] holding
//! every value inserted under that key in insertion order. Tree shape
//! depends only on the set of distinct keys, so appending a duplicate never
//! touches heights or rotates anything.
//!
//! Structure:
//! - Nodes are boxed and strictly owned by their parent (no back links)
//! - Heights are stored per node, an absent child has height 0
//! - Balance factor is `height(left) - height(right)`, kept within [-1, 1]
//!
//! Operations:
//! - insert: O(log n) for a new key, O(log n) descent + O(1) append otherwise
//! - delete: O(log n) descent, plus chain removal, plus O(log n) rebalancing
//!   when the last occurrence of a key goes away
//! - search: O(log n)
//! - flatten: O(n + occurrences), lazily

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::chain::{self, Chain};
use crate::error::{Error, InvariantError};

/// Direction of a flatten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl From<bool> for Order {
    /// `true` means ascending.
    fn from(ascending: bool) -> Order {
        return if ascending { Order::Ascending } else { Order::Descending };
    }
}

type Link<T> = Option<Box<Node<T>>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) height: i32,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) chain: Chain<T>,
}

impl<T> Node<T> {
    #[inline(always)]
    fn balance(&self) -> i32 {
        return height(&self.left) - height(&self.right);
    }

    #[inline(always)]
    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

impl<T: Clone> Node<T> {
    fn new(value: T) -> Node<T> {
        return Node {
            key: value.clone(),
            height: 1,
            left: None,
            right: None,
            chain: Chain::with_value(value),
        };
    }
}

#[inline(always)]
fn height<T>(link: &Link<T>) -> i32 {
    return link.as_ref().map_or(0, |node| node.height);
}

/// Rotate the subtree left, returning the new subtree root.
///
/// ```text
///     x                y
///    / \              / \
///   a   y     =>     x   c
///      / \          / \
///     b   c        a   b
/// ```
fn rotate_left<T>(mut x: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    tracing::trace!(height = y.height, "rotated left");
    return y;
}

/// Mirror image of [`rotate_left`].
fn rotate_right<T>(mut y: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    tracing::trace!(height = x.height, "rotated right");
    return x;
}

/// Recompute the height of `node` and restore its balance.
///
/// A left-heavy node whose left child leans right needs the double
/// rotation, and symmetrically on the other side. After an insertion the
/// heavy child never has balance 0, so this picks the same rotation as
/// comparing the inserted key against the child's key would.
fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance() < 0 { rotate_left(left) } else { left });
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance() > 0 { rotate_right(right) } else { right });
        }
        return rotate_left(node);
    }

    return node;
}

/// Whether an insertion created a node or landed in an existing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inserted {
    Key,
    Occurrence,
}

fn insert_node<T: Ord + Clone>(link: Link<T>, value: T, inserted: &mut Inserted) -> Box<Node<T>> {
    let mut node = match link {
        None => {
            *inserted = Inserted::Key;
            tracing::trace!("created node");
            return Box::new(Node::new(value));
        }
        Some(node) => node,
    };

    match value.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), value, inserted)),
        Ordering::Greater => node.right = Some(insert_node(node.right.take(), value, inserted)),
        Ordering::Equal => {
            node.chain.append(value);
            *inserted = Inserted::Occurrence;
            return node;
        }
    }

    if *inserted == Inserted::Occurrence {
        return node;
    }
    return rebalance(node);
}

/// What a delete did on its way down.
struct Deletion<T> {
    removed: Option<T>,
    /// The key's last occurrence went and its node was removed.
    reclaimed: bool,
}

fn delete_node<T: Ord>(link: Link<T>, value: &T, deletion: &mut Deletion<T>) -> Link<T> {
    let mut node = link?;

    match value.cmp(&node.key) {
        Ordering::Less => node.left = delete_node(node.left.take(), value, deletion),
        Ordering::Greater => node.right = delete_node(node.right.take(), value, deletion),
        Ordering::Equal => {
            match node.chain.remove(value) {
                Ok(occurrence) => deletion.removed = Some(occurrence),
                Err(Error::NotFound) => return Some(node),
            }
            if !node.chain.is_empty() {
                return Some(node);
            }

            tracing::trace!("reclaiming node with empty chain");
            deletion.reclaimed = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    let (rest, successor) = take_min(right);
                    let Node { key, chain, .. } = *successor;
                    node.key = key;
                    node.chain = chain;
                    node.left = Some(left);
                    node.right = rest;
                }
            }
        }
    }

    if !deletion.reclaimed {
        return Some(node);
    }
    return Some(rebalance(node));
}

/// Detach the leftmost node of a subtree.
///
/// Returns the rebalanced remainder and the detached node. The leftmost
/// node has no left child, so it is spliced out by promoting its right
/// child.
fn take_min<T>(mut node: Box<Node<T>>) -> (Link<T>, Box<Node<T>>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            return (rest, node);
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            return (Some(rebalance(node)), min);
        }
    }
}

/// An ordered index of values, tolerant of duplicates.
///
/// Keys are the values themselves; values comparing equal share a node and
/// are kept in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Index<T> {
    pub(crate) root: Link<T>,
    len: usize,
    distinct: usize,
}

impl<T> Index<T> {
    /// Create a new empty index.
    pub fn new() -> Index<T> {
        return Index {
            root: None,
            len: 0,
            distinct: 0,
        };
    }

    /// Total number of occurrences stored.
    pub fn len(&self) -> usize {
        return self.len;
    }

    /// Number of distinct keys, which is the number of nodes.
    pub fn distinct(&self) -> usize {
        return self.distinct;
    }

    /// Return true if the index is empty.
    pub fn is_empty(&self) -> bool {
        return self.root.is_none();
    }

    /// Height of the tree, 0 when empty.
    pub fn height(&self) -> i32 {
        return height(&self.root);
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.distinct = 0;
    }

    /// Iterate over every occurrence in key order.
    ///
    /// Occurrences under one key come out in insertion order in both
    /// directions.
    pub fn flatten(&self, order: Order) -> Flatten<'_, T> {
        let mut flatten = Flatten {
            stack: SmallVec::new(),
            chain: None,
            order,
            remaining: self.len,
        };
        flatten.descend(self.root.as_deref());
        return flatten;
    }

    /// Consume the index into a sorted vector, moving every value out.
    ///
    /// Same order as [`Index::flatten`].
    pub fn into_sorted(self, order: Order) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        drain(self.root, order, &mut out);
        return out;
    }
}

fn drain<T>(link: Link<T>, order: Order, out: &mut Vec<T>) {
    let Some(node) = link else {
        return;
    };
    let Node { left, right, chain, .. } = *node;
    let (first, last) = match order {
        Order::Ascending => (left, right),
        Order::Descending => (right, left),
    };
    drain(first, order, out);
    out.extend(chain);
    drain(last, order, out);
}

impl<T: Ord> Index<T> {
    /// Find the chain of occurrences stored under `key`.
    pub fn search(&self, key: &T) -> Result<&Chain<T>, Error> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Ok(&node.chain),
            };
        }
        return Err(Error::NotFound);
    }

    /// Return true if at least one occurrence of `key` is stored.
    pub fn contains(&self, key: &T) -> bool {
        return self.search(key).is_ok();
    }

    /// Remove one occurrence of `value` and return it.
    ///
    /// Deleting something that is not there is a no-op and returns `None`.
    /// When the last occurrence of a key goes, its node is removed and the
    /// tree rebalanced.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let mut deletion = Deletion { removed: None, reclaimed: false };
        self.root = delete_node(self.root.take(), value, &mut deletion);

        if deletion.removed.is_some() {
            self.len -= 1;
        }
        if deletion.reclaimed {
            self.distinct -= 1;
        }
        return deletion.removed;
    }

    /// Check every structural invariant of the tree.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut previous: Option<&T> = None;
        validate_node(self.root.as_deref(), &mut previous)?;
        return Ok(());
    }
}

/// Walks in order, checking key order against the previous key and
/// returning the computed height.
fn validate_node<'a, T: Ord>(node: Option<&'a Node<T>>, previous: &mut Option<&'a T>) -> Result<i32, InvariantError> {
    let Some(node) = node else {
        return Ok(0);
    };

    let left = validate_node(node.left.as_deref(), previous)?;
    if let Some(prev) = previous {
        if *prev >= &node.key {
            return Err(InvariantError::Unordered);
        }
    }
    *previous = Some(&node.key);
    if node.chain.is_empty() {
        return Err(InvariantError::EmptyChain);
    }
    let right = validate_node(node.right.as_deref(), previous)?;

    let expected = 1 + left.max(right);
    if node.height != expected {
        return Err(InvariantError::HeightMismatch { stored: node.height, expected });
    }
    let balance = left - right;
    if balance.abs() > 1 {
        return Err(InvariantError::Unbalanced { balance });
    }
    return Ok(expected);
}

impl<T: Ord + Clone> Index<T> {
    /// Insert one value.
    pub fn insert(&mut self, value: T) {
        let mut inserted = Inserted::Occurrence;
        self.root = Some(insert_node(self.root.take(), value, &mut inserted));
        self.len += 1;
        if inserted == Inserted::Key {
            self.distinct += 1;
        }
    }

    /// Insert every value in order.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.insert(value);
        }
    }

    /// Move a value whose key may have changed: delete then reinsert.
    pub fn relocate(&mut self, value: T) {
        self.delete(&value);
        self.insert(value);
    }
}

impl<T> Default for Index<T> {
    fn default() -> Index<T> {
        return Index::new();
    }
}

impl<T: Ord + Clone> Extend<T> for Index<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        self.insert_all(values);
    }
}

impl<T: Ord + Clone> FromIterator<T> for Index<T> {
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Index<T> {
        let mut index = Index::new();
        index.insert_all(values);
        return index;
    }
}

/// Lazy in-order traversal of an [`Index`].
///
/// The stack holds the nodes still to visit on the path back up; AVL
/// height stays small enough that it rarely spills to the heap.
pub struct Flatten<'a, T> {
    stack: SmallVec<[&'a Node<T>; 32]>,
    chain: Option<chain::Iter<'a, T>>,
    order: Order,
    remaining: usize,
}

impl<'a, T> Flatten<'a, T> {
    /// Push the path towards the first node of `node`'s subtree.
    fn descend(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = match self.order {
                Order::Ascending => current.left.as_deref(),
                Order::Descending => current.right.as_deref(),
            };
        }
    }
}

impl<'a, T> Iterator for Flatten<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(value) = self.chain.as_mut().and_then(|chain| chain.next()) {
                self.remaining -= 1;
                return Some(value);
            }

            let node = self.stack.pop()?;
            self.chain = Some(node.chain.iter());
            let next = match self.order {
                Order::Ascending => node.right.as_deref(),
                Order::Descending => node.left.as_deref(),
            };
            self.descend(next);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<T> ExactSizeIterator for Flatten<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(values: &[i32]) -> Index<i32> {
        let index: Index<i32> = values.iter().copied().collect();
        index.validate().unwrap();
        return index;
    }

    fn ascending(index: &Index<i32>) -> Vec<i32> {
        return index.flatten(Order::Ascending).copied().collect();
    }

    fn root_key(index: &Index<i32>) -> i32 {
        return index.root.as_ref().unwrap().key;
    }

    // =========================================================================
    // Rotations
    // =========================================================================

    #[test]
    fn left_left_case_rotates_right() {
        let index = index_of(&[3, 2, 1]);
        assert_eq!(root_key(&index), 2);
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn right_right_case_rotates_left() {
        let index = index_of(&[1, 2, 3]);
        assert_eq!(root_key(&index), 2);
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn left_right_case_double_rotates() {
        let index = index_of(&[3, 1, 2]);
        assert_eq!(root_key(&index), 2);
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn right_left_case_double_rotates() {
        let index = index_of(&[1, 3, 2]);
        assert_eq!(root_key(&index), 2);
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn rotation_without_pivot_is_identity() {
        let leaf = Box::new(Node::new(1));
        let rotated = rotate_left(leaf.clone());
        assert_eq!(rotated, leaf);
        let rotated = rotate_right(leaf.clone());
        assert_eq!(rotated, leaf);
    }

    // =========================================================================
    // Insert
    // =========================================================================

    #[test]
    fn duplicates_share_a_node() {
        let index = index_of(&[4, 4, 4]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.distinct(), 1);
        assert_eq!(index.height(), 1);
        assert_eq!(index.search(&4).unwrap().len(), 3);
    }

    #[test]
    fn duplicate_insert_does_not_reshape() {
        let mut index = index_of(&[2, 1, 3]);
        let before = index.root.as_ref().unwrap().height;
        index.insert(1);
        index.insert(1);
        assert_eq!(index.root.as_ref().unwrap().height, before);
        assert_eq!(root_key(&index), 2);
        index.validate().unwrap();
    }

    #[test]
    fn empty_index() {
        let index: Index<i32> = Index::new();
        assert!(index.is_empty());
        assert_eq!(index.height(), 0);
        assert_eq!(index.flatten(Order::Ascending).next(), None);
        assert_eq!(index.search(&1).err(), Some(Error::NotFound));
        index.validate().unwrap();
    }

    // =========================================================================
    // Delete
    // =========================================================================

    #[test]
    fn delete_leaf() {
        let mut index = index_of(&[2, 1, 3]);
        assert_eq!(index.delete(&1), Some(1));
        assert_eq!(ascending(&index), vec![2, 3]);
        assert_eq!(index.distinct(), 2);
        index.validate().unwrap();
    }

    #[test]
    fn delete_node_with_one_child() {
        let mut index = index_of(&[2, 1, 3, 4]);
        assert_eq!(index.delete(&3), Some(3));
        assert_eq!(ascending(&index), vec![1, 2, 4]);
        index.validate().unwrap();
    }

    #[test]
    fn delete_node_with_two_children_takes_successor_chain() {
        let mut index = index_of(&[2, 1, 4, 3, 5, 3]);
        assert_eq!(root_key(&index), 2);
        assert_eq!(index.delete(&2), Some(2));
        assert_eq!(root_key(&index), 3);
        assert_eq!(index.search(&3).unwrap().len(), 2);
        assert_eq!(ascending(&index), vec![1, 3, 3, 4, 5]);
        index.validate().unwrap();
    }

    #[test]
    fn delete_rebalances_ancestors() {
        let mut index = index_of(&[4, 2, 6, 1, 3, 5, 7, 8]);
        index.delete(&1);
        index.delete(&3);
        index.delete(&2);
        index.validate().unwrap();
        assert_eq!(ascending(&index), vec![4, 5, 6, 7, 8]);
        assert_eq!(index.height(), 3);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut index = index_of(&[5, 3, 8]);
        let before = index.clone();
        assert_eq!(index.delete(&4), None);
        assert_eq!(index, before);
    }

    #[test]
    fn delete_everything() {
        let mut index = index_of(&[5, 3, 8, 3, 1]);
        for value in [3, 1, 8, 3, 5] {
            assert_eq!(index.delete(&value), Some(value));
            index.validate().unwrap();
        }
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.distinct(), 0);
    }

    #[test]
    fn relocate_keeps_counts() {
        let mut index = index_of(&[1, 2, 2]);
        index.relocate(2);
        assert_eq!(index.len(), 3);
        assert_eq!(ascending(&index), vec![1, 2, 2]);
        index.relocate(9);
        assert_eq!(index.len(), 4);
        assert_eq!(ascending(&index), vec![1, 2, 2, 9]);
    }

    // =========================================================================
    // Flatten
    // =========================================================================

    #[test]
    fn flatten_both_directions() {
        let index = index_of(&[5, 3, 8, 3, 1]);
        assert_eq!(ascending(&index), vec![1, 3, 3, 5, 8]);
        let descending: Vec<i32> = index.flatten(Order::Descending).copied().collect();
        assert_eq!(descending, vec![8, 5, 3, 3, 1]);
    }

    #[test]
    fn flatten_reports_exact_size() {
        let index = index_of(&[5, 3, 8, 3, 1]);
        let mut flatten = index.flatten(Order::Ascending);
        assert_eq!(flatten.len(), 5);
        flatten.next();
        assert_eq!(flatten.len(), 4);
    }

    #[test]
    fn into_sorted_matches_flatten() {
        let index = index_of(&[2, 1, 2, 3, 0, 3]);
        for order in [Order::Ascending, Order::Descending] {
            let borrowed: Vec<i32> = index.flatten(order).copied().collect();
            assert_eq!(index.clone().into_sorted(order), borrowed);
        }
        assert_eq!(index.into_sorted(Order::Descending), vec![3, 3, 2, 2, 1, 0]);
    }

    #[test]
    fn order_from_bool() {
        assert_eq!(Order::from(true), Order::Ascending);
        assert_eq!(Order::from(false), Order::Descending);
    }
}
