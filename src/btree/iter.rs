//! In-order iteration.
//!
//! The iterator keeps a stack of `(node, next_key_index)` frames representing
//! the path from the root to the current position. A frame `(node, i)` means
//! every key before `keys[i]` and every child up to `children[i]` has already
//! been yielded.

use super::node::Node;
use std::iter::FusedIterator;

/// Ascending iterator over the elements of a [`BTree`](super::BTree)
///
/// Created by [`BTree::iter`](super::BTree::iter). The tree cannot be mutated
/// while the iterator is alive.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    stack: Vec<(&'a Node<T>, usize)>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    /// Push the path from `node` down to its leftmost leaf
    fn descend(&mut self, mut node: &'a Node<T>) {
        loop {
            self.stack.push((node, 0));
            match node.child(0) {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.0;
            let index = frame.1;

            if index < node.len() {
                frame.1 += 1;
                if let Some(child) = node.child(index + 1) {
                    self.descend(child);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return node.key_at(index);
            }

            // Every key and child of this node has been visited
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(keys: &[i32]) -> Node<i32> {
        Node::from_parts(2, keys.to_vec(), Vec::new())
    }

    #[test]
    fn test_iter_empty() {
        let mut iter = Iter::<i32>::new(None, 0);
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_two_levels() {
        let root = Node::from_parts(
            2,
            vec![10, 20],
            vec![leaf(&[1, 5]), leaf(&[15]), leaf(&[25, 30])],
        );
        let iter = Iter::new(Some(&root), 7);
        assert_eq!(iter.len(), 7);
        let items: Vec<i32> = iter.copied().collect();
        assert_eq!(items, vec![1, 5, 10, 15, 20, 25, 30]);
    }

    #[test]
    fn test_iter_three_levels() {
        let left = Node::from_parts(2, vec![2], vec![leaf(&[1]), leaf(&[3])]);
        let right = Node::from_parts(2, vec![6], vec![leaf(&[5]), leaf(&[7, 8])]);
        let root = Node::from_parts(2, vec![4], vec![left, right]);

        let mut iter = Iter::new(Some(&root), 8);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.len(), 7);
        let rest: Vec<i32> = iter.copied().collect();
        assert_eq!(rest, vec![2, 3, 4, 5, 6, 7, 8]);
    }
}
