use std::borrow::Borrow;
use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::requests::{InsertEntry, KeyProbe};
use crate::domain::{self, Inserted, NodeArena};

/// Ordered set of keys kept in a height-balanced tree.
///
/// Owns both the node storage and the root handle. Every engine call hands the current
/// root in and stores the returned root back. Nodes the engine detaches are released
/// from the arena right away.
///
/// Not synchronized; share behind a lock if several threads need to mutate it.
#[derive(Debug)]
pub struct AvlTree<K> {
    nodes: NodeArena<K, ()>,
    root: Option<Index>,
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
        }
    }
}

impl<K: Ord> AvlTree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key`. Returns `false`, leaving the tree unchanged, if it was already present.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, key: K) -> bool {
        let mut request = InsertEntry::if_absent(key, ());
        let (root, outcome) = domain::insert_at(&mut self.nodes, self.root, &mut request);
        self.root = root;
        match outcome {
            Inserted::Created(_) => true,
            Inserted::Declined => false,
            Inserted::Replaced { overridden, .. } => {
                self.nodes.release(overridden);
                false
            }
            Inserted::Updated(_) => false,
        }
    }

    pub fn find<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        domain::find_at(&self.nodes, self.root, &KeyProbe::new(key)).map(|n| self.nodes.key(n))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes `key` and destroys its node. Returns `false` if the key was absent.
    #[instrument(level = "trace", skip_all)]
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = domain::remove_at(&mut self.nodes, self.root, &KeyProbe::new(key));
        self.root = root;
        match removed {
            Some(node) => self.nodes.release(node).is_some(),
            None => false,
        }
    }

    /// Removes every key strictly greater than `boundary`. Returns how many were removed.
    #[instrument(level = "debug", skip_all)]
    pub fn remove_upper<Q>(&mut self, boundary: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, detached) =
            domain::remove_upper(&mut self.nodes, self.root, &KeyProbe::new(boundary));
        self.root = root;
        self.release_all(detached)
    }

    /// Removes every key strictly less than `boundary`. Returns how many were removed.
    #[instrument(level = "debug", skip_all)]
    pub fn remove_lower<Q>(&mut self, boundary: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, detached) =
            domain::remove_lower(&mut self.nodes, self.root, &KeyProbe::new(boundary));
        self.root = root;
        self.release_all(detached)
    }

    fn release_all(&mut self, detached: Vec<Index>) -> usize {
        let released = detached
            .into_iter()
            .filter_map(|node| self.nodes.release(node))
            .count();
        debug!(released, remaining = self.len(), "released detached nodes");
        released
    }
}

impl<K> AvlTree<K> {
    /// Number of keys, O(1).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of keys reachable from the root, O(n). Equals [`AvlTree::len`] unless nodes
    /// leaked out of the tree.
    pub fn count(&self) -> usize {
        domain::count(&self.nodes, self.root)
    }

    /// Height of the tree, 0 when empty.
    pub fn height(&self) -> usize {
        usize::from(domain::height(&self.nodes, self.root))
    }

    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|n| self.nodes.key(n))
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        domain::in_order(&self.nodes, self.root).map(move |n| self.nodes.key(n))
    }

    /// Checks cached heights and balance of every node.
    pub fn is_consistent(&self) -> bool {
        domain::check_consistency(&self.nodes, self.root)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn nodes(&self) -> &NodeArena<K, ()> {
        &self.nodes
    }

    pub(crate) fn root(&self) -> Option<Index> {
        self.root
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: fmt::Display> AvlTree<K> {
    /// One key per line, ascending.
    pub fn render_values(&self) -> String {
        self.iter().map(|k| format!("{}\n", k)).collect()
    }

    pub fn summary(&self) -> String {
        format!("height = {}, count = {}", self.height(), self.count())
    }
}
