//! Read-only walks: consistency check, node count and ascending enumeration.

use std::iter::FusedIterator;

use crate::domain::capability::NodeStore;
use crate::domain::engine::{balance_factor, height_of, sub_height};

/// Verifies cached heights and the balance invariant for every node of the subtree.
///
/// Meant for tests and diagnostics; no mutating path relies on it. Key order is not
/// checked here, enumerate with [`in_order`] for that.
pub fn check_consistency<S: NodeStore>(store: &S, root: Option<S::Handle>) -> bool {
    let Some(node) = root else {
        return true;
    };
    if store.height(node) != sub_height(store, node) + 1 {
        return false;
    }
    if !(-1..=1).contains(&balance_factor(store, node)) {
        return false;
    }
    check_consistency(store, store.left(node)) && check_consistency(store, store.right(node))
}

/// Number of nodes in the subtree, O(n).
pub fn count<S: NodeStore>(store: &S, root: Option<S::Handle>) -> usize {
    match root {
        None => 0,
        Some(node) => 1 + count(store, store.left(node)) + count(store, store.right(node)),
    }
}

/// Cached height of the subtree, 0 when empty.
pub fn height<S: NodeStore>(store: &S, root: Option<S::Handle>) -> u8 {
    height_of(store, root)
}

/// Lazily enumerates the subtree in ascending order.
///
/// Each call starts a fresh walk of the tree as it is now. The iterator borrows the store,
/// so the tree cannot change underneath a running walk.
pub fn in_order<S: NodeStore>(store: &S, root: Option<S::Handle>) -> InOrder<'_, S> {
    let mut iter = InOrder {
        store,
        stack: Vec::with_capacity(usize::from(height_of(store, root))),
    };
    iter.push_left_spine(root);
    iter
}

/// Iterator returned by [`in_order`].
pub struct InOrder<'a, S: NodeStore> {
    store: &'a S,
    stack: Vec<S::Handle>,
}

impl<'a, S: NodeStore> InOrder<'a, S> {
    fn push_left_spine(&mut self, mut current: Option<S::Handle>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = self.store.left(node);
        }
    }
}

impl<'a, S: NodeStore> Iterator for InOrder<'a, S> {
    type Item = S::Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(self.store.right(node));
        Some(node)
    }
}

impl<'a, S: NodeStore> FusedIterator for InOrder<'a, S> {}
