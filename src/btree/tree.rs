//! B-tree core implementation.
//!
//! This module provides the main BTree struct with operations for:
//! - insert: single-pass insertion, splitting full nodes on the way down
//! - contains / get: point lookups
//! - remove / take: single-pass deletion, filling minimal nodes on the way down
//! - iter: ascending in-order traversal
//!
//! The tree never walks back up after reaching a leaf. Every node the
//! insertion path is about to enter is split first if full, and every node the
//! deletion path is about to enter is topped up first if it holds only `t - 1`
//! keys. Height only changes at the root: a full root is split under a new
//! root, and a keyless internal root is replaced by its only child.

use super::iter::Iter;
use super::node::Node;
use crate::error::Result;
use crate::types::{BTreeConfig, DEFAULT_MIN_DEGREE};
use std::fmt;
use tracing::debug;

/// An in-memory B-tree multiset
///
/// Elements are kept in ascending order. Equal elements are not merged:
/// inserting a value that is already present stores another occurrence and
/// increases [`len`](Self::len), while [`remove`](Self::remove) takes out a
/// single occurrence (which one is unspecified when several are equal).
#[derive(Clone)]
pub struct BTree<T> {
    /// Minimum degree `t`
    min_degree: usize,
    /// Root node (None means empty tree)
    root: Option<Node<T>>,
    /// Number of stored elements, duplicates included
    len: usize,
}

impl<T> BTree<T> {
    /// Create an empty B-tree with minimum degree `t`
    ///
    /// Fails with [`BTreeError::InvalidDegree`](crate::BTreeError::InvalidDegree)
    /// when `t < 2` or when `2t` does not fit in a `usize`.
    pub fn new(min_degree: usize) -> Result<Self> {
        Self::with_config(&BTreeConfig::new(min_degree))
    }

    /// Create an empty B-tree from a configuration
    pub fn with_config(config: &BTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_degree: config.min_degree,
            root: None,
            len: 0,
        })
    }

    /// Get the minimum degree of the tree
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Get the configuration this tree was built with
    pub fn config(&self) -> BTreeConfig {
        BTreeConfig::new(self.min_degree)
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the root node, if any
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_ref()
    }

    /// Get the height of the tree (0 when empty, 1 for a single leaf)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_ref();
        while let Some(current) = node {
            height += 1;
            node = current.child(0);
        }
        height
    }

    /// Drop every element
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        debug!("tree cleared");
    }

    /// Iterate over all elements in ascending order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_ref(), self.len)
    }

    /// Smallest element
    pub fn first(&self) -> Option<&T> {
        self.root.as_ref().and_then(Node::leftmost)
    }

    /// Largest element
    pub fn last(&self) -> Option<&T> {
        self.root.as_ref().and_then(Node::rightmost)
    }

    /// Remove and return the smallest element
    pub fn pop_first(&mut self) -> Option<T> {
        let item = self.root.as_mut()?.pop_first();
        self.finish_removal(item)
    }

    /// Remove and return the largest element
    pub fn pop_last(&mut self) -> Option<T> {
        let item = self.root.as_mut()?.pop_last();
        self.finish_removal(item)
    }

    /// Copy all elements into a vector in ascending order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Move all elements into a vector in ascending order
    pub fn into_vec(self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            root.drain_into(&mut items);
        }
        items
    }

    /// Account for a removal and shrink the root if it ran out of keys
    fn finish_removal(&mut self, item: Option<T>) -> Option<T> {
        if item.is_some() {
            self.len -= 1;
        }

        if let Some(root) = self.root.take() {
            if root.is_empty() {
                if root.is_leaf() {
                    debug!("last element removed, tree is empty");
                } else {
                    self.root = root.into_only_child();
                    debug!(height = self.height(), "root collapsed");
                }
            } else {
                self.root = Some(root);
            }
        }

        item
    }

    #[cfg(test)]
    pub(crate) fn from_parts(min_degree: usize, root: Option<Node<T>>, len: usize) -> Self {
        Self {
            min_degree,
            root,
            len,
        }
    }
}

impl<T: Ord> BTree<T> {
    /// Insert an element
    ///
    /// Always stores the element, even if an equal one is present, and
    /// returns `true`.
    pub fn insert(&mut self, item: T) -> bool {
        let root = match self.root.take() {
            None => {
                let mut root = Node::new_leaf(self.min_degree);
                if let Err(err) = root.push_key(item) {
                    panic!("fresh root rejected its first key: {err}");
                }
                debug!(min_degree = self.min_degree, "root created");
                root
            }
            Some(root) if root.is_full() => {
                // The only place the tree gains a level
                let mut root = root.grow();
                root.insert_non_full(item);
                debug!(len = self.len + 1, "root split");
                root
            }
            Some(mut root) => {
                root.insert_non_full(item);
                root
            }
        };

        self.root = Some(root);
        self.len += 1;
        true
    }

    /// Check if an element equal to `item` is present
    pub fn contains(&self, item: &T) -> bool {
        self.get(item).is_some()
    }

    /// Get a reference to a stored element equal to `item`
    pub fn get(&self, item: &T) -> Option<&T> {
        self.root.as_ref()?.get(item)
    }

    /// Remove one occurrence of `item`
    ///
    /// Returns `true` if a matching element was found and removed.
    pub fn remove(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }

    /// Remove one occurrence of `item` and return it
    pub fn take(&mut self, item: &T) -> Option<T> {
        let removed = self.root.as_mut()?.remove(item);
        self.finish_removal(removed)
    }
}

impl<T: Ord> Default for BTree<T> {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            root: None,
            len: 0,
        }
    }
}

impl<T: Ord> Extend<T> for BTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for BTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a BTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for BTree<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for BTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
