//! # BTree Multiset
//!
//! An in-memory, order-preserving B-tree over any totally ordered element type.
//!
//! ## Architecture
//!
//! - **Node** (`btree::Node`): a bounded, sorted run of keys plus owned
//!   children, with the positional and split/fill/merge primitives
//! - **Tree** (`btree::BTree`): root lifecycle, element count, and the
//!   single-pass insert and delete descents built on those primitives
//!
//! Insertion splits every full node before entering it and deletion tops up
//! every minimal node before entering it, so neither ever walks back up.
//!
//! ## Usage
//!
//! ```rust
//! use btree_multiset::BTree;
//!
//! let mut tree = BTree::new(3)?;
//! for item in [50, 10, 40, 20, 30] {
//!     tree.insert(item);
//! }
//!
//! assert!(tree.contains(&40));
//! assert!(tree.remove(&40));
//! assert!(!tree.remove(&40));
//!
//! let items: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(items, vec![10, 20, 30, 50]);
//! # Ok::<(), btree_multiset::BTreeError>(())
//! ```
//!
//! Equal elements are stored side by side; see [`BTree`] for the exact
//! duplicate semantics.

pub mod btree;
pub mod error;
pub mod types;

pub use btree::{BTree, Iter, Node, TreeNode, TreeStats};
pub use error::{BTreeError, Result};
pub use types::{BTreeConfig, DEFAULT_MIN_DEGREE, MAX_DEGREE, MIN_DEGREE};
