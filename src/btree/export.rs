//! Diagnostics: tree export, text dump, statistics and invariant checks.
//!
//! None of this is needed for normal use. The export and dump exist for
//! debugging and visualization; `validate` is what the tests lean on.

use super::node::Node;
use super::tree::BTree;
use crate::error::{BTreeError, Result};
use crate::types::{max_keys, min_keys};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Node type for visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Whether this is a leaf node
    pub is_leaf: bool,
    /// Keys in this node, rendered with `Display`
    pub keys: Vec<String>,
    /// Child nodes (only for internal nodes)
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_node<T: fmt::Display>(node: &Node<T>) -> Self {
        Self {
            is_leaf: node.is_leaf(),
            keys: node.keys().iter().map(ToString::to_string).collect(),
            children: node.children().iter().map(Self::from_node).collect(),
        }
    }
}

/// Tree statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    /// Number of stored elements
    pub len: usize,
    /// Number of levels
    pub height: usize,
    /// Number of nodes
    pub node_count: usize,
    /// Minimum degree `t`
    pub min_degree: usize,
}

impl<T> BTree<T> {
    /// Gather statistics about the tree shape
    pub fn stats(&self) -> TreeStats {
        fn count_nodes<T>(node: &Node<T>) -> usize {
            1 + node.children().iter().map(count_nodes).sum::<usize>()
        }

        TreeStats {
            len: self.len(),
            height: self.height(),
            node_count: self.root().map_or(0, count_nodes),
            min_degree: self.min_degree(),
        }
    }
}

impl<T: fmt::Display> BTree<T> {
    /// Export the tree structure for visualization
    pub fn export(&self) -> Option<TreeNode> {
        self.root().map(TreeNode::from_node)
    }

    /// Export the tree structure as pretty-printed JSON (`null` when empty)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Render the tree as indented text, one node per line
    ///
    /// ```text
    /// [40]
    ///   [10, 20, 30]
    ///   [50, 60]
    /// ```
    pub fn dump(&self) -> String {
        fn dump_node<T: fmt::Display>(node: &Node<T>, depth: usize, out: &mut String) {
            let keys: Vec<String> = node.keys().iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "{}[{}]", "  ".repeat(depth), keys.join(", "));
            for child in node.children() {
                dump_node(child, depth + 1, out);
            }
        }

        let mut out = String::new();
        match self.root() {
            Some(root) => dump_node(root, 0, &mut out),
            None => out.push_str("<empty>\n"),
        }
        out
    }
}

impl<T: Ord> BTree<T> {
    /// Check every structural invariant
    ///
    /// - the element count is zero exactly when there is no root, and matches
    ///   the number of stored keys
    /// - every non-root node holds between `t - 1` and `2t - 1` keys
    /// - keys are sorted within each node
    /// - internal nodes have one more child than keys, leaves have none
    /// - all leaves sit at the same depth
    /// - each separator bounds the keys of its two neighbouring subtrees
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root() else {
            if self.len() != 0 {
                return Err(BTreeError::invariant(format!(
                    "empty tree reports {} elements",
                    self.len()
                )));
            }
            return Ok(());
        };

        if root.is_empty() {
            return Err(BTreeError::invariant("root holds no keys"));
        }

        let mut checker = Checker {
            min_degree: self.min_degree(),
            leaf_depth: None,
            key_count: 0,
        };
        checker.check(root, 0, true, None, None)?;

        if checker.key_count != self.len() {
            return Err(BTreeError::invariant(format!(
                "tree reports {} elements but holds {}",
                self.len(),
                checker.key_count
            )));
        }
        Ok(())
    }
}

struct Checker {
    min_degree: usize,
    leaf_depth: Option<usize>,
    key_count: usize,
}

impl Checker {
    fn check<T: Ord>(
        &mut self,
        node: &Node<T>,
        depth: usize,
        is_root: bool,
        lower: Option<&T>,
        upper: Option<&T>,
    ) -> Result<()> {
        let len = node.len();
        let max = max_keys(self.min_degree);
        let min = if is_root { 1 } else { min_keys(self.min_degree) };
        if len < min || len > max {
            return Err(BTreeError::invariant(format!(
                "node at depth {depth} holds {len} keys, expected {min}..={max}"
            )));
        }

        let keys = node.keys();
        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(BTreeError::invariant(format!(
                "keys out of order in node at depth {depth}"
            )));
        }
        let below_lower = lower.is_some_and(|bound| keys.iter().any(|key| key < bound));
        let above_upper = upper.is_some_and(|bound| keys.iter().any(|key| key > bound));
        if below_lower || above_upper {
            return Err(BTreeError::invariant(format!(
                "node at depth {depth} has keys outside its separators"
            )));
        }
        self.key_count += len;

        if node.is_leaf() {
            if !node.children().is_empty() {
                return Err(BTreeError::invariant(format!(
                    "leaf at depth {depth} has children"
                )));
            }
            return match self.leaf_depth {
                None => {
                    self.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(BTreeError::invariant(format!(
                    "leaf at depth {depth}, expected all leaves at depth {expected}"
                ))),
            };
        }

        let children = node.children();
        if children.len() != len + 1 {
            return Err(BTreeError::invariant(format!(
                "internal node at depth {depth} has {len} keys but {} children",
                children.len()
            )));
        }

        for (index, child) in children.iter().enumerate() {
            let child_lower = if index == 0 { lower } else { keys.get(index - 1) };
            let child_upper = if index == len { upper } else { keys.get(index) };
            self.check(child, depth + 1, false, child_lower, child_upper)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Result<BTree<i32>> {
        let mut btree = BTree::new(2)?;
        btree.extend([10, 20, 30, 40]);
        Ok(btree)
    }

    #[test]
    fn test_export_tree() -> Result<()> {
        let btree = sample_tree()?;
        let root = btree.export().expect("non-empty tree exports a root");
        assert!(!root.is_leaf);
        assert_eq!(root.keys, vec!["20"]);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].keys, vec!["30", "40"]);
        assert!(root.children[1].is_leaf);

        let empty: BTree<i32> = BTree::new(2)?;
        assert_eq!(empty.export(), None);
        assert_eq!(empty.to_json()?, "null");
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> Result<()> {
        let btree = sample_tree()?;
        let json = btree.to_json()?;
        assert!(json.contains("\"isLeaf\": false"));

        let parsed: Option<TreeNode> = serde_json::from_str(&json)?;
        assert_eq!(parsed, btree.export());
        Ok(())
    }

    #[test]
    fn test_dump() -> Result<()> {
        let btree = sample_tree()?;
        assert_eq!(btree.dump(), "[20]\n  [10]\n  [30, 40]\n");

        let empty: BTree<i32> = BTree::new(3)?;
        assert_eq!(empty.dump(), "<empty>\n");
        Ok(())
    }

    #[test]
    fn test_stats() -> Result<()> {
        let btree = sample_tree()?;
        let stats = btree.stats();
        assert_eq!(
            stats,
            TreeStats {
                len: 4,
                height: 2,
                node_count: 3,
                min_degree: 2,
            }
        );
        Ok(())
    }

    #[test]
    fn test_validate_accepts_built_trees() -> Result<()> {
        sample_tree()?.validate()?;
        BTree::<i32>::new(5)?.validate()?;

        let mut btree = BTree::new(3)?;
        for i in 0..500 {
            btree.insert((i * 37) % 101);
        }
        btree.validate()
    }

    #[test]
    fn test_validate_reports_violations() {
        let leaf = |keys: &[i32]| Node::from_parts(2, keys.to_vec(), Vec::new());

        let miscounted = BTree::from_parts(2, Some(leaf(&[1, 2])), 3);
        assert!(matches!(
            miscounted.validate(),
            Err(BTreeError::InvariantViolation(_))
        ));

        let underfull = BTree::from_parts(
            2,
            Some(Node::from_parts(2, vec![5], vec![leaf(&[]), leaf(&[6])])),
            2,
        );
        assert!(underfull.validate().is_err());

        let uneven = BTree::from_parts(
            2,
            Some(Node::from_parts(
                2,
                vec![5],
                vec![
                    leaf(&[1]),
                    Node::from_parts(2, vec![7], vec![leaf(&[6]), leaf(&[8])]),
                ],
            )),
            5,
        );
        assert!(uneven.validate().is_err());

        let misplaced = BTree::from_parts(
            2,
            Some(Node::from_parts(2, vec![5], vec![leaf(&[9]), leaf(&[6])])),
            3,
        );
        assert!(misplaced.validate().is_err());

        let phantom = BTree::<i32>::from_parts(2, None, 1);
        assert!(phantom.validate().is_err());
    }
}
