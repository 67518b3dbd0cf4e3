//! End-to-end scenarios for insertion, deletion and root lifecycle.

use btree_multiset::{BTree, BTreeConfig, BTreeError, Node, Result};

fn items(tree: &BTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

#[test]
fn test_scenario_insert_then_remove_every_other() -> Result<()> {
    let mut tree = BTree::new(3)?;
    for item in [10, 20, 30, 40, 50, 60, 70, 80, 90] {
        assert!(tree.insert(item));
        tree.validate()?;
    }
    assert_eq!(tree.len(), 9);

    for item in [10, 30, 50, 70] {
        assert!(tree.remove(&item), "failed to remove {}", item);
        tree.validate()?;
    }

    assert_eq!(tree.len(), 5);
    assert_eq!(items(&tree), vec![20, 40, 60, 80, 90]);
    for item in [10, 30, 50, 70] {
        assert!(!tree.contains(&item));
    }
    Ok(())
}

#[test]
fn test_scenario_letters_split_root_when_full() -> Result<()> {
    let letters = [
        'F', 'S', 'Q', 'K', 'C', 'L', 'H', 'T', 'V', 'W', 'M', 'R', 'N', 'P', 'A', 'B', 'X', 'Y',
        'D', 'Z', 'E',
    ];
    let mut tree = BTree::new(2)?;
    let mut first_growth = None;

    for (position, letter) in letters.into_iter().enumerate() {
        let root_was_full = tree.root().is_some_and(|root| root.len() == 3);
        let height_before = tree.height();

        tree.insert(letter);
        tree.validate()?;

        let grew = tree.height() > height_before && height_before > 0;
        assert_eq!(
            grew, root_was_full,
            "height change mismatch when inserting {}",
            letter
        );
        if grew && first_growth.is_none() {
            first_growth = Some(position);
        }
        assert!(tree.root().is_some_and(|root| root.len() <= 3));
    }

    // F, S, Q fill the root; K is the fourth key
    assert_eq!(first_growth, Some(3));

    let mut expected = letters.to_vec();
    expected.sort_unstable();
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
    assert_eq!(tree.len(), letters.len());
    Ok(())
}

#[test]
fn test_remove_from_empty_tree() -> Result<()> {
    let mut tree: BTree<i32> = BTree::new(2)?;
    assert!(!tree.remove(&7));
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    tree.validate()
}

#[test]
fn test_degree_one_is_rejected() {
    assert!(matches!(
        BTree::<i32>::new(1),
        Err(BTreeError::InvalidDegree {
                degree: 1,
                min: 2,
                ..
            })
    ));
    assert!(BTree::<i32>::with_config(&BTreeConfig::new(1)).is_err());
}

#[test]
fn test_removing_only_element_empties_tree() -> Result<()> {
    let mut tree = BTree::new(4)?;
    tree.insert(99);
    assert!(tree.remove(&99));
    assert!(tree.root().is_none());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), 0);
    tree.validate()
}

#[test]
fn test_round_trip_single_item() -> Result<()> {
    let mut tree: BTree<i32> = (0..100).collect();
    tree.insert(1000);
    assert!(tree.contains(&1000));
    assert!(tree.remove(&1000));
    assert!(!tree.contains(&1000));
    tree.validate()
}

#[test]
fn test_drain_ascending_and_descending() -> Result<()> {
    for t in 2..=5 {
        let mut tree = BTree::new(t)?;
        tree.extend(0..300);

        for item in 0..150 {
            assert!(tree.remove(&item));
        }
        tree.validate()?;

        for item in (150..300).rev() {
            assert!(tree.remove(&item));
            tree.validate()?;
        }
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
    }
    Ok(())
}

#[test]
fn test_remove_internal_separators() -> Result<()> {
    let mut tree = BTree::new(2)?;
    tree.extend(1..=64);

    // Separators of the root and its children force predecessor, successor and merge paths
    while let Some(root) = tree.root() {
        let separator = match root.key_at(0) {
            Some(key) => *key,
            None => break,
        };
        assert!(tree.remove(&separator));
        assert!(!tree.contains(&separator));
        tree.validate()?;
    }
    assert!(tree.is_empty());
    Ok(())
}

#[test]
fn test_height_stays_logarithmic() -> Result<()> {
    let mut tree = BTree::new(2)?;
    tree.extend(0..4096);
    tree.validate()?;
    // With t = 2 every internal node has at least two children
    assert!(tree.height() <= 13, "height {} too large", tree.height());

    let stats = tree.stats();
    assert_eq!(stats.len, 4096);
    assert!(stats.node_count >= 4096 / 3);
    Ok(())
}

#[test]
fn test_root_node_shape_after_growth() -> Result<()> {
    let mut tree = BTree::new(3)?;
    tree.extend(1..=5);
    assert_eq!(tree.height(), 1);

    tree.insert(6);
    let root = tree.root().expect("tree has a root");
    assert_eq!(root.keys(), &[3]);
    assert_eq!(root.children().iter().map(Node::len).collect::<Vec<_>>(), vec![2, 3]);
    Ok(())
}
