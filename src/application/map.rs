use std::borrow::Borrow;

use generational_arena::Index;
use tracing::instrument;

use crate::application::requests::{InsertEntry, KeyProbe};
use crate::domain::{self, Inserted, NodeArena, NodeStore};

/// Ordered key-value map on the balancing engine.
///
/// Inserting an existing key installs a fresh node in place of the old one and hands the
/// old value back, the engine's replacement path. Like [`crate::application::AvlTree`] it
/// owns its storage and root, and is not synchronized.
#[derive(Debug)]
pub struct AvlMap<K, V> {
    nodes: NodeArena<K, V>,
    root: Option<Index>,
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
        }
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces. Returns the previous value of `key`, if any.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut request = InsertEntry::upsert(key, value);
        let (root, outcome) = domain::insert_at(&mut self.nodes, self.root, &mut request);
        self.root = root;
        match outcome {
            Inserted::Replaced { overridden, .. } => {
                self.nodes.release(overridden).map(|node| node.into_parts().1)
            }
            Inserted::Created(_) | Inserted::Updated(_) | Inserted::Declined => None,
        }
    }

    /// Inserts only when `key` is absent. Hands the entry back otherwise.
    #[instrument(level = "trace", skip_all)]
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        let mut request = InsertEntry::if_absent(key, value);
        let (root, _) = domain::insert_at(&mut self.nodes, self.root, &mut request);
        self.root = root;
        match request.into_unplaced() {
            Some(entry) => Err(entry),
            None => Ok(()),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = domain::find_at(&self.nodes, self.root, &KeyProbe::new(key))?;
        self.nodes.get(node).map(|n| n.value())
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = domain::find_at(&self.nodes, self.root, &KeyProbe::new(key))?;
        self.nodes.get_mut(node).map(|n| n.value_mut())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        domain::find_at(&self.nodes, self.root, &KeyProbe::new(key)).is_some()
    }

    #[instrument(level = "trace", skip_all)]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = domain::remove_at(&mut self.nodes, self.root, &KeyProbe::new(key));
        self.root = root;
        let node = self.nodes.release(removed?)?;
        Some(node.into_parts().1)
    }

    /// Removes and returns every entry whose key is strictly greater than `boundary`,
    /// in ascending order.
    #[instrument(level = "debug", skip_all)]
    pub fn remove_upper<Q>(&mut self, boundary: &Q) -> Vec<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, detached) =
            domain::remove_upper(&mut self.nodes, self.root, &KeyProbe::new(boundary));
        self.root = root;
        self.take_all(detached)
    }

    /// Removes and returns every entry whose key is strictly less than `boundary`,
    /// in ascending order.
    #[instrument(level = "debug", skip_all)]
    pub fn remove_lower<Q>(&mut self, boundary: &Q) -> Vec<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, detached) =
            domain::remove_lower(&mut self.nodes, self.root, &KeyProbe::new(boundary));
        self.root = root;
        self.take_all(detached)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let (root, minimum) = domain::remove_at_minimum(&mut self.nodes, self.root?);
        self.root = root;
        self.nodes.release(minimum).map(|n| n.into_parts())
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let (root, maximum) = domain::remove_at_maximum(&mut self.nodes, self.root?);
        self.root = root;
        self.nodes.release(maximum).map(|n| n.into_parts())
    }

    fn take_all(&mut self, detached: Vec<Index>) -> Vec<(K, V)> {
        detached
            .into_iter()
            .filter_map(|node| self.nodes.release(node))
            .map(|node| node.into_parts())
            .collect()
    }
}

impl<K, V> AvlMap<K, V> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        usize::from(domain::height(&self.nodes, self.root))
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        domain::in_order(&self.nodes, self.root)
            .filter_map(move |n| self.nodes.get(n))
            .map(|node| (node.key(), node.value()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.edge(|nodes, n| nodes.left(n))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.edge(|nodes, n| nodes.right(n))
    }

    fn edge(&self, step: impl Fn(&NodeArena<K, V>, Index) -> Option<Index>) -> Option<(&K, &V)> {
        let mut node = self.root?;
        while let Some(next) = step(&self.nodes, node) {
            node = next;
        }
        self.nodes.get(node).map(|n| (n.key(), n.value()))
    }

    pub fn is_consistent(&self) -> bool {
        domain::check_consistency(&self.nodes, self.root)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn nodes(&self) -> &NodeArena<K, V> {
        &self.nodes
    }

    pub(crate) fn root(&self) -> Option<Index> {
        self.root
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_existing_key_when_upserting_then_returns_previous_value_and_keeps_shape() {
        let mut map: AvlMap<i32, &str> = (1..=5).map(|k| (k, "old")).collect();
        let height = map.height();

        assert_eq!(map.insert(3, "new"), Some("old"));

        assert_eq!(map.get(&3), Some(&"new"));
        assert_eq!(map.len(), 5);
        assert_eq!(map.height(), height);
        assert!(map.is_consistent());
    }

    #[test]
    fn given_existing_key_when_try_inserting_then_entry_is_handed_back() {
        let mut map = AvlMap::new();
        assert_eq!(map.try_insert(1, 'a'), Ok(()));

        assert_eq!(map.try_insert(1, 'b'), Err((1, 'b')));
        assert_eq!(map.get(&1), Some(&'a'));
    }

    #[test]
    fn given_map_when_popping_edges_then_returns_min_and_max() {
        let mut map: AvlMap<i32, i32> = (0..20).map(|k| (k, k * k)).collect();

        assert_eq!(map.first(), Some((&0, &0)));
        assert_eq!(map.last(), Some((&19, &361)));
        assert_eq!(map.pop_first(), Some((0, 0)));
        assert_eq!(map.pop_last(), Some((19, 361)));
        assert_eq!(map.len(), 18);
        assert!(map.is_consistent());
    }
}
