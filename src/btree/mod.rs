//! B-tree implementation.
//!
//! This module provides an in-memory B-tree that supports:
//! - Insertion (duplicates kept)
//! - Membership tests
//! - Deletion of a single occurrence
//! - Ascending iteration
//! - Diagnostics (dump, export, validation)

mod export;
mod iter;
mod node;
mod tree;

pub use export::{TreeNode, TreeStats};
pub use iter::Iter;
pub use node::Node;
pub use tree::BTree;
