//! Integration tests for AvlMap.

use rstest::{fixture, rstest};

use avlkit::util::testing;
use avlkit::{AvlMap, TreeDisplay};

#[fixture]
fn fruits() -> AvlMap<String, u32> {
    testing::init_test_setup();
    [("kiwi", 3), ("apple", 1), ("melon", 5), ("fig", 2), ("pear", 4)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ============================================================
// Insertion policies
// ============================================================

#[rstest]
fn given_existing_key_when_inserting_then_value_replaced_and_old_returned(
    mut fruits: AvlMap<String, u32>,
) {
    let old = fruits.insert("fig".to_string(), 20);

    assert_eq!(old, Some(2));
    assert_eq!(fruits.get("fig"), Some(&20));
    assert_eq!(fruits.len(), 5);
    assert!(fruits.is_consistent());
}

#[rstest]
fn given_same_upsert_twice_when_inspecting_then_structure_is_identical(
    mut fruits: AvlMap<String, u32>,
) {
    fruits.insert("plum".to_string(), 6);
    let rendered = fruits.to_tree_string().to_string();

    fruits.insert("plum".to_string(), 6);

    assert_eq!(fruits.to_tree_string().to_string(), rendered);
    assert_eq!(fruits.len(), 6);
}

#[rstest]
fn given_existing_key_when_try_inserting_then_entry_handed_back(
    mut fruits: AvlMap<String, u32>,
) {
    let result = fruits.try_insert("kiwi".to_string(), 99);

    assert_eq!(result, Err(("kiwi".to_string(), 99)));
    assert_eq!(fruits.get("kiwi"), Some(&3));
}

#[rstest]
fn given_new_key_when_try_inserting_then_accepted(mut fruits: AvlMap<String, u32>) {
    assert_eq!(fruits.try_insert("date".to_string(), 7), Ok(()));
    assert_eq!(fruits.get("date"), Some(&7));
}

#[rstest]
fn given_value_when_mutating_in_place_then_lookup_sees_change(mut fruits: AvlMap<String, u32>) {
    if let Some(value) = fruits.get_mut("pear") {
        *value += 10;
    }

    assert_eq!(fruits.get("pear"), Some(&14));
}

// ============================================================
// Ordered access and removal
// ============================================================

#[rstest]
fn given_map_when_iterating_then_entries_are_key_ordered(fruits: AvlMap<String, u32>) {
    let keys: Vec<&str> = fruits.keys().map(String::as_str).collect();
    let values: Vec<u32> = fruits.values().copied().collect();

    assert_eq!(keys, vec!["apple", "fig", "kiwi", "melon", "pear"]);
    assert_eq!(values, vec![1, 2, 3, 5, 4]);
    assert_eq!(fruits.first().map(|(k, _)| k.as_str()), Some("apple"));
    assert_eq!(fruits.last().map(|(k, _)| k.as_str()), Some("pear"));
}

#[rstest]
fn given_map_when_removing_then_value_returned_once(mut fruits: AvlMap<String, u32>) {
    assert_eq!(fruits.remove("melon"), Some(5));
    assert_eq!(fruits.remove("melon"), None);
    assert!(!fruits.contains_key("melon"));
    assert_eq!(fruits.len(), 4);
}

#[rstest]
fn given_map_when_popping_then_drains_from_both_ends(mut fruits: AvlMap<String, u32>) {
    assert_eq!(fruits.pop_first(), Some(("apple".to_string(), 1)));
    assert_eq!(fruits.pop_last(), Some(("pear".to_string(), 4)));
    assert_eq!(fruits.len(), 3);
    assert!(fruits.is_consistent());

    while fruits.pop_first().is_some() {}
    assert!(fruits.is_empty());
    assert_eq!(fruits.pop_last(), None);
}

#[rstest]
fn given_boundary_when_removing_upper_then_entries_above_returned_ascending(
    mut fruits: AvlMap<String, u32>,
) {
    let removed = fruits.remove_upper("kiwi");

    assert_eq!(
        removed,
        vec![("melon".to_string(), 5), ("pear".to_string(), 4)]
    );
    assert_eq!(fruits.len(), 3);
    assert!(fruits.contains_key("kiwi"));
    assert!(fruits.is_consistent());
}

#[rstest]
fn given_boundary_when_removing_lower_then_entries_below_returned_ascending(
    mut fruits: AvlMap<String, u32>,
) {
    let removed = fruits.remove_lower("kiwi");

    assert_eq!(
        removed,
        vec![("apple".to_string(), 1), ("fig".to_string(), 2)]
    );
    assert_eq!(fruits.first().map(|(k, v)| (k.as_str(), *v)), Some(("kiwi", 3)));
}

#[test]
fn given_many_entries_when_removing_half_then_height_stays_logarithmic() {
    testing::init_test_setup();
    let mut map: AvlMap<u32, u32> = (0..2048).map(|k| (k, k * k)).collect();

    for key in (0..2048).filter(|k| k % 2 == 0) {
        assert_eq!(map.remove(&key), Some(key * key));
    }

    assert_eq!(map.len(), 1024);
    assert!(map.height() <= 15);
    assert!(map.is_consistent());
}
