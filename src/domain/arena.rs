use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::capability::NodeStore;

/// Tree node stored in a [`NodeArena`].
///
/// The structural fields are only reachable through [`NodeStore`].
#[derive(Debug)]
pub struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Index>,
    right: Option<Index>,
    height: u8,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Cached height of the subtree rooted here.
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Arena-backed node storage.
///
/// Uses a generational arena so handles of released nodes never alias a node allocated
/// later in the same slot. Nodes are only created through [`NodeArena::allocate`] and only
/// destroyed through [`NodeArena::release`]; the engine itself never does either.
#[derive(Debug)]
pub struct NodeArena<K, V> {
    arena: Arena<Node<K, V>>,
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> NodeArena<K, V> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
        }
    }

    #[instrument(level = "trace", skip_all)]
    pub fn allocate(&mut self, key: K, value: V) -> Index {
        self.arena.insert(Node::new(key, value))
    }

    /// Destroys a node the engine handed back, returning its contents.
    #[instrument(level = "trace", skip(self))]
    pub fn release(&mut self, idx: Index) -> Option<Node<K, V>> {
        self.arena.remove(idx)
    }

    pub fn get(&self, idx: Index) -> Option<&Node<K, V>> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut Node<K, V>> {
        self.arena.get_mut(idx)
    }

    /// Key of a live node.
    ///
    /// # Panics
    /// If `idx` is not live in this arena.
    pub fn key(&self, idx: Index) -> &K {
        &self.arena[idx].key
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
    }
}

impl<K, V> NodeStore for NodeArena<K, V> {
    type Handle = Index;

    fn left(&self, node: Index) -> Option<Index> {
        self.arena[node].left
    }

    fn right(&self, node: Index) -> Option<Index> {
        self.arena[node].right
    }

    fn height(&self, node: Index) -> u8 {
        self.arena[node].height
    }

    fn set_left(&mut self, node: Index, child: Option<Index>) {
        self.arena[node].left = child;
    }

    fn set_right(&mut self, node: Index, child: Option<Index>) {
        self.arena[node].right = child;
    }

    fn set_height(&mut self, node: Index, height: u8) {
        self.arena[node].height = height;
    }
}
