//! Integration tests for AvlTree: set semantics, bulk removal and rendering.

use itertools::Itertools;
use rstest::rstest;

use avlkit::util::testing;
use avlkit::{AvlTree, TreeDisplay};

fn tree_of(keys: impl IntoIterator<Item = i64>) -> AvlTree<i64> {
    testing::init_test_setup();
    keys.into_iter().collect()
}

fn keys(tree: &AvlTree<i64>) -> Vec<i64> {
    tree.iter().copied().collect()
}

// ============================================================
// Set semantics
// ============================================================

#[test]
fn given_duplicate_key_when_inserting_then_returns_false_and_count_stays() {
    let mut tree = tree_of([5]);

    assert!(!tree.insert(5));

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.height(), 1);
}

#[test]
fn given_string_keys_when_finding_by_str_then_borrowed_lookup_works() {
    testing::init_test_setup();
    let tree: AvlTree<String> = ["pear", "apple", "fig"].iter().map(|s| s.to_string()).collect();

    assert_eq!(tree.find("fig").map(String::as_str), Some("fig"));
    assert!(tree.contains("apple"));
    assert!(!tree.contains("plum"));
    assert_eq!(
        tree.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["apple", "fig", "pear"]
    );
}

#[test]
fn given_all_keys_removed_when_querying_then_tree_is_empty() {
    let mut tree = tree_of(0..50);

    for key in (0..50).rev() {
        assert!(tree.remove(&key));
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.root_key(), None);
    assert!(tree.is_consistent());
}

#[test]
fn given_len_when_compared_with_walk_count_then_they_agree() {
    let mut tree = tree_of((0..300).map(|k| k * 7 % 300));
    tree.remove_upper(&150);
    for key in (0..150).step_by(3) {
        tree.remove(&key);
    }

    assert_eq!(tree.len(), tree.count());
}

#[test]
fn given_extend_with_overlapping_keys_when_iterating_then_keys_unique_and_sorted() {
    let mut tree = tree_of([1, 3, 5]);

    tree.extend([5, 4, 3, 2, 1, 0]);

    assert_eq!(keys(&tree), vec![0, 1, 2, 3, 4, 5]);
    assert!(keys(&tree).iter().tuple_windows().all(|(a, b)| a < b));
}

#[test]
fn given_cleared_tree_when_reused_then_behaves_like_new() {
    let mut tree = tree_of(0..10);

    tree.clear();
    assert!(tree.is_empty());

    assert!(tree.insert(3));
    assert_eq!(keys(&tree), vec![3]);
}

// ============================================================
// Bulk removal
// ============================================================

#[rstest]
#[case(vec![1, 2, 3, 4, 5], 3, vec![1, 2, 3], 2)]
#[case(vec![1, 2, 4, 5], 3, vec![1, 2], 2)]
#[case(vec![10, 20], 5, vec![], 2)]
#[case(vec![10, 20], 50, vec![10, 20], 0)]
#[case(vec![], 0, vec![], 0)]
fn given_boundary_when_removing_upper_then_boundary_is_kept(
    #[case] start: Vec<i64>,
    #[case] boundary: i64,
    #[case] expected: Vec<i64>,
    #[case] removed: usize,
) {
    let mut tree = tree_of(start);

    assert_eq!(tree.remove_upper(&boundary), removed);

    assert_eq!(keys(&tree), expected);
    assert!(tree.is_consistent());
    assert_eq!(tree.len(), expected.len());
}

#[rstest]
#[case(vec![1, 2, 3, 4, 5], 3, vec![3, 4, 5])]
#[case(vec![1, 2, 4, 5], 3, vec![4, 5])]
#[case(vec![10, 20], 50, vec![])]
fn given_boundary_when_removing_lower_then_boundary_is_kept(
    #[case] start: Vec<i64>,
    #[case] boundary: i64,
    #[case] expected: Vec<i64>,
) {
    let mut tree = tree_of(start);

    tree.remove_lower(&boundary);

    assert_eq!(keys(&tree), expected);
    assert!(tree.is_consistent());
}

#[test]
fn given_1024_keys_when_removing_above_220_then_221_remain_balanced() {
    let mut tree = tree_of((0..1024).rev());

    assert_eq!(tree.remove_upper(&220), 803);

    assert_eq!(tree.len(), 221);
    assert!(tree.is_consistent());
    assert!(tree.height() <= 10);
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn given_keys_1_to_7_when_rendering_values_then_lists_each_on_its_own_line() {
    let tree = tree_of(1..=7);

    assert_eq!(tree.render_values(), "1\n2\n3\n4\n5\n6\n7\n");
    assert_eq!(tree.summary(), "height = 3, count = 7");
}

#[test]
fn given_perfect_tree_when_rendering_then_root_is_first_line() {
    let tree = tree_of(1..=7);

    let rendered = tree.to_tree_string().to_string();

    assert_eq!(rendered.lines().next(), Some("4 (h=3)"));
    assert_eq!(rendered.lines().count(), 7);
    assert!(rendered.contains("1 (h=1)"));
    assert!(rendered.contains("6 (h=2)"));
}
