//! B-tree node.
//!
//! A node owns a sorted run of at most `2t - 1` keys and, when internal,
//! exactly one more child than it has keys. Children are owned inline, so the
//! structure is a strict ownership tree: a subtree is dropped exactly when it
//! is unlinked from its parent.
//!
//! The positional primitives (`insert_key`, `set_key_at`, `remove_key_at`)
//! only know the node's own capacity. The structural operations (`split_child`,
//! `fill_child`, `merge_children`, the two borrows) are invoked on a parent and
//! rearrange two or three of its children; their preconditions are asserted,
//! since violating one means the tree-level orchestration is broken.

use crate::error::{BTreeError, Result};
use crate::types::{max_keys, min_keys};
use std::mem;
use tracing::trace;

/// A node in the B-tree
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Minimum degree `t` of the owning tree
    min_degree: usize,
    /// Fixed at creation
    leaf: bool,
    /// Sorted keys, at most `2t - 1`
    keys: Vec<T>,
    /// `keys.len() + 1` children for internal nodes, empty for leaves
    children: Vec<Node<T>>,
}

impl<T> Node<T> {
    /// Create a new empty leaf node
    pub fn new_leaf(min_degree: usize) -> Self {
        Self::empty(min_degree, true)
    }

    /// Create a new empty internal node
    ///
    /// The caller is responsible for installing `len() + 1` children.
    pub fn new_internal(min_degree: usize) -> Self {
        Self::empty(min_degree, false)
    }

    fn empty(min_degree: usize, leaf: bool) -> Self {
        Self {
            min_degree,
            leaf,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Minimum degree this node was created with
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Check if this is a leaf node
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Number of keys in this node
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if this node holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Maximum number of keys (`2t - 1`)
    pub fn capacity(&self) -> usize {
        max_keys(self.min_degree)
    }

    /// Check if the node holds `2t - 1` keys
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity()
    }

    /// Check if the node holds exactly `t - 1` keys, so removing one would underflow
    pub fn is_minimal(&self) -> bool {
        self.keys.len() == min_keys(self.min_degree)
    }

    /// All keys in ascending order
    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    /// All children, left to right (empty for leaves)
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// Get the key at the given index
    pub fn key_at(&self, index: usize) -> Option<&T> {
        self.keys.get(index)
    }

    /// Get the first key of this node
    pub fn first_key(&self) -> Option<&T> {
        self.keys.first()
    }

    /// Get the last key of this node
    pub fn last_key(&self) -> Option<&T> {
        self.keys.last()
    }

    /// Get the child at the given index
    pub fn child(&self, index: usize) -> Option<&Node<T>> {
        self.children.get(index)
    }

    /// Insert a key at `index`, shifting later keys right
    ///
    /// Fails without mutating if the node is full or `index > len()`.
    /// Keeping the keys sorted is the caller's job.
    pub fn insert_key(&mut self, index: usize, key: T) -> Result<()> {
        if self.is_full() {
            return Err(BTreeError::NodeFull {
                capacity: self.capacity(),
            });
        }
        if index > self.keys.len() {
            return Err(BTreeError::IndexOutOfBounds {
                index,
                len: self.keys.len(),
            });
        }
        self.keys.insert(index, key);
        Ok(())
    }

    /// Append a key after the current last key
    pub fn push_key(&mut self, key: T) -> Result<()> {
        self.insert_key(self.keys.len(), key)
    }

    /// Overwrite the key at `index`, returning the previous key
    pub fn set_key_at(&mut self, index: usize, key: T) -> Result<T> {
        let len = self.keys.len();
        let slot = self
            .keys
            .get_mut(index)
            .ok_or(BTreeError::IndexOutOfBounds { index, len })?;
        Ok(mem::replace(slot, key))
    }

    /// Remove the key at `index`, shifting later keys left
    pub fn remove_key_at(&mut self, index: usize) -> Result<T> {
        if index >= self.keys.len() {
            return Err(BTreeError::IndexOutOfBounds {
                index,
                len: self.keys.len(),
            });
        }
        Ok(self.keys.remove(index))
    }

    /// Smallest key in the subtree rooted here
    pub fn leftmost(&self) -> Option<&T> {
        let mut node = self;
        while !node.leaf {
            node = &node.children[0];
        }
        node.keys.first()
    }

    /// Largest key in the subtree rooted here
    pub fn rightmost(&self) -> Option<&T> {
        let mut node = self;
        while !node.leaf {
            node = &node.children[node.children.len() - 1];
        }
        node.keys.last()
    }

    /// Split the full child at `index` around its median
    ///
    /// The child keeps its lower `t - 1` keys, a new right sibling takes the
    /// upper `t - 1` keys (and upper `t` children), and the median moves up
    /// into this node at `index`.
    pub fn split_child(&mut self, index: usize) {
        assert!(!self.leaf, "split_child called on a leaf");
        assert!(!self.is_full(), "parent must have room for the promoted median");

        let t = self.min_degree;
        let child = &mut self.children[index];
        assert!(child.is_full(), "only a full child can be split");

        let mut sibling = Self::empty(t, child.leaf);
        sibling.keys.extend(child.keys.drain(t..));
        if !child.leaf {
            sibling.children.extend(child.children.drain(t..));
        }
        let median = child.keys.pop().expect("full child has a median");

        trace!(
            index,
            left = child.keys.len(),
            right = sibling.keys.len(),
            "split child"
        );

        self.keys.insert(index, median);
        self.children.insert(index + 1, sibling);
    }

    /// Bring the minimal child at `index` up to at least `t` keys
    ///
    /// Borrows from the left sibling if it can spare a key, else from the right
    /// sibling, else merges with the right sibling (or the left one when
    /// `index` is the last child). Returns the index of the child that now
    /// covers the original child's key range, which is `index - 1` only after
    /// a merge into the left sibling.
    pub fn fill_child(&mut self, index: usize) -> usize {
        assert!(
            self.children[index].is_minimal(),
            "fill_child requires a child with exactly t - 1 keys"
        );

        let last = self.children.len() - 1;
        if index > 0 && !self.children[index - 1].is_minimal() {
            self.borrow_from_prev(index);
            index
        } else if index < last && !self.children[index + 1].is_minimal() {
            self.borrow_from_next(index);
            index
        } else if index < last {
            self.merge_children(index);
            index
        } else {
            self.merge_children(index - 1);
            index - 1
        }
    }

    /// Rotate one key from the left sibling through the separator into the child at `index`
    pub fn borrow_from_prev(&mut self, index: usize) {
        assert!(index > 0, "child {index} has no left sibling");

        let (before, after) = self.children.split_at_mut(index);
        let sibling = &mut before[index - 1];
        let child = &mut after[0];
        assert!(
            sibling.keys.len() > min_keys(sibling.min_degree),
            "left sibling has no key to spare"
        );

        let raised = sibling.keys.pop().expect("left sibling has keys");
        let lowered = mem::replace(&mut self.keys[index - 1], raised);
        child.keys.insert(0, lowered);
        if !child.leaf {
            let moved = sibling.children.pop().expect("internal sibling has children");
            child.children.insert(0, moved);
        }

        trace!(index, "borrowed from left sibling");
    }

    /// Rotate one key from the right sibling through the separator into the child at `index`
    pub fn borrow_from_next(&mut self, index: usize) {
        assert!(
            index + 1 < self.children.len(),
            "child {index} has no right sibling"
        );

        let (before, after) = self.children.split_at_mut(index + 1);
        let child = &mut before[index];
        let sibling = &mut after[0];
        assert!(
            sibling.keys.len() > min_keys(sibling.min_degree),
            "right sibling has no key to spare"
        );

        let raised = sibling.keys.remove(0);
        let lowered = mem::replace(&mut self.keys[index], raised);
        child.keys.push(lowered);
        if !child.leaf {
            child.children.push(sibling.children.remove(0));
        }

        trace!(index, "borrowed from right sibling");
    }

    /// Merge the child at `index + 1` and the separator between them into the child at `index`
    pub fn merge_children(&mut self, index: usize) {
        assert!(
            index + 1 < self.children.len(),
            "child {index} has no right sibling to merge"
        );
        let merged_len = self.children[index].len() + self.children[index + 1].len() + 1;
        assert!(
            merged_len <= self.capacity(),
            "merged node would hold {merged_len} keys"
        );

        let separator = self.keys.remove(index);
        let right = self.children.remove(index + 1);
        let left = &mut self.children[index];
        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);

        trace!(index, len = merged_len, "merged children");
    }

    /// Remove the smallest key of this subtree, filling ahead on the way down
    ///
    /// Called on the root or on a node that holds at least `t` keys.
    pub(crate) fn pop_first(&mut self) -> Option<T> {
        if self.leaf {
            return if self.keys.is_empty() {
                None
            } else {
                Some(self.keys.remove(0))
            };
        }
        let index = if self.children[0].is_minimal() {
            self.fill_child(0)
        } else {
            0
        };
        self.children[index].pop_first()
    }

    /// Remove the largest key of this subtree, filling ahead on the way down
    pub(crate) fn pop_last(&mut self) -> Option<T> {
        if self.leaf {
            return self.keys.pop();
        }
        let last = self.children.len() - 1;
        let index = if self.children[last].is_minimal() {
            self.fill_child(last)
        } else {
            last
        };
        self.children[index].pop_last()
    }

    /// Take the only child out of a keyless internal node
    pub(crate) fn into_only_child(mut self) -> Option<Node<T>> {
        if self.leaf || !self.keys.is_empty() {
            return None;
        }
        self.children.pop()
    }

    /// Wrap a full node as the single child of a new internal node and split it
    pub(crate) fn grow(self) -> Node<T> {
        let mut root = Self::new_internal(self.min_degree);
        root.children.push(self);
        root.split_child(0);
        root
    }

    /// Move every key of this subtree into `out` in ascending order
    pub(crate) fn drain_into(self, out: &mut Vec<T>) {
        if self.leaf {
            out.extend(self.keys);
            return;
        }
        let mut children = self.children.into_iter();
        for key in self.keys {
            if let Some(child) = children.next() {
                child.drain_into(out);
            }
            out.push(key);
        }
        if let Some(last) = children.next() {
            last.drain_into(out);
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(min_degree: usize, keys: Vec<T>, children: Vec<Node<T>>) -> Self {
        Self {
            min_degree,
            leaf: children.is_empty(),
            keys,
            children,
        }
    }
}

impl<T: Ord> Node<T> {
    /// Index of the first key that is `>= item`, or `len()` if there is none
    ///
    /// This is both where `item` would sit among the keys and which child to
    /// descend into when it is not here.
    pub fn search_index(&self, item: &T) -> usize {
        self.keys.partition_point(|key| key < item)
    }

    /// Find a key equal to `item` in the subtree rooted here
    pub fn get(&self, item: &T) -> Option<&T> {
        let mut node = self;
        loop {
            let index = node.search_index(item);
            if let Some(key) = node.keys.get(index) {
                if key == item {
                    return Some(key);
                }
            }
            if node.leaf {
                return None;
            }
            node = &node.children[index];
        }
    }

    /// Insert `item` into the subtree rooted at this non-full node
    ///
    /// Every full child on the descent path is split before it is entered, so
    /// the leaf that finally receives `item` always has room.
    pub(crate) fn insert_non_full(&mut self, item: T) {
        let mut index = self.search_index(&item);
        if self.leaf {
            if let Err(err) = self.insert_key(index, item) {
                panic!("leaf reached without room for insertion: {err}");
            }
            return;
        }

        if self.children[index].is_full() {
            self.split_child(index);
            if item > self.keys[index] {
                index += 1;
            }
        }
        self.children[index].insert_non_full(item);
    }

    /// Remove one key equal to `item` from the subtree rooted here
    ///
    /// Called on the root or on a node that holds at least `t` keys; every
    /// minimal child is filled before it is entered.
    pub(crate) fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.search_index(item);
        let found = self.keys.get(index).is_some_and(|key| key == item);

        if found {
            return if self.leaf {
                self.remove_key_at(index).ok()
            } else {
                self.remove_separator(index, item)
            };
        }

        if self.leaf {
            return None;
        }

        let index = if self.children[index].is_minimal() {
            self.fill_child(index)
        } else {
            index
        };
        self.children[index].remove(item)
    }

    /// Remove the separator at `index` of this internal node
    ///
    /// It is replaced by its in-order predecessor or successor when the
    /// adjacent child can spare a key; otherwise the two children are merged
    /// around it and the removal continues in the merged child.
    fn remove_separator(&mut self, index: usize, item: &T) -> Option<T> {
        let replacement = if !self.children[index].is_minimal() {
            self.children[index].pop_last()
        } else if !self.children[index + 1].is_minimal() {
            self.children[index + 1].pop_first()
        } else {
            self.merge_children(index);
            return self.children[index].remove(item);
        };

        replacement.map(|key| mem::replace(&mut self.keys[index], key))
    }
}
