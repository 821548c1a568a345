//! Per-call request objects binding a key to the engine's capability contracts.

use std::borrow::Borrow;
use std::cmp::Ordering;

use generational_arena::Index;

use crate::domain::{Comparable, Insertable, NodeArena};

/// Looks up a borrowed key.
#[derive(Debug, Clone, Copy)]
pub struct KeyProbe<'a, Q: ?Sized> {
    key: &'a Q,
}

impl<'a, Q: ?Sized> KeyProbe<'a, Q> {
    pub fn new(key: &'a Q) -> Self {
        Self { key }
    }
}

impl<K, V, Q> Comparable<NodeArena<K, V>> for KeyProbe<'_, Q>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    fn compare(&self, store: &NodeArena<K, V>, node: Index) -> Ordering {
        self.key.cmp(store.key(node).borrow())
    }
}

/// Collision policy of an insertion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCollision {
    /// Leave the existing node untouched.
    Keep,
    /// Install a fresh node in place of the existing one.
    Replace,
}

/// Carries one entry into the tree.
///
/// The entry moves into the arena when `create` accepts it. A spent request compares
/// `Equal` to everything; the engine never compares after creating.
#[derive(Debug)]
pub struct InsertEntry<K, V> {
    entry: Option<(K, V)>,
    policy: OnCollision,
}

impl<K, V> InsertEntry<K, V> {
    /// Inserts only when the key is absent.
    pub fn if_absent(key: K, value: V) -> Self {
        Self {
            entry: Some((key, value)),
            policy: OnCollision::Keep,
        }
    }

    /// Inserts, replacing the node of an equal key.
    pub fn upsert(key: K, value: V) -> Self {
        Self {
            entry: Some((key, value)),
            policy: OnCollision::Replace,
        }
    }

    /// Returns the entry if it was never placed into the tree.
    pub fn into_unplaced(self) -> Option<(K, V)> {
        self.entry
    }
}

impl<K: Ord, V> Comparable<NodeArena<K, V>> for InsertEntry<K, V> {
    fn compare(&self, store: &NodeArena<K, V>, node: Index) -> Ordering {
        match &self.entry {
            Some((key, _)) => key.cmp(store.key(node)),
            None => Ordering::Equal,
        }
    }
}

impl<K: Ord, V> Insertable<NodeArena<K, V>> for InsertEntry<K, V> {
    fn create(&mut self, store: &mut NodeArena<K, V>, overridden: Option<Index>) -> Option<Index> {
        if overridden.is_some() && self.policy == OnCollision::Keep {
            return None;
        }
        let (key, value) = self.entry.take()?;
        Some(store.allocate(key, value))
    }
}
