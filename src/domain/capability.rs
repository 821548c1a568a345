//! Capability contracts the balancing engine is written against.
//!
//! The engine never reads node fields directly. It walks and relinks the tree through a
//! [`NodeStore`], navigates with a [`Comparable`] request and obtains new nodes only from an
//! [`Insertable`] request. Any node layout that can answer these three contracts can be kept
//! balanced by [`crate::domain::engine`].

use std::cmp::Ordering;
use std::fmt::Debug;

/// Structural accessors for the nodes held by a store.
///
/// A handle is an opaque, copyable reference to one node. Every node caches the height of
/// its subtree: 1 for a leaf, with absent children counting as 0.
///
/// Implementations may panic when handed a handle that is not live in the store. The engine
/// only passes handles it obtained from the store or from a request's `create` step.
pub trait NodeStore {
    type Handle: Copy + Eq + Debug;

    fn left(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn right(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn height(&self, node: Self::Handle) -> u8;

    fn set_left(&mut self, node: Self::Handle, child: Option<Self::Handle>);

    fn set_right(&mut self, node: Self::Handle, child: Option<Self::Handle>);

    fn set_height(&mut self, node: Self::Handle, height: u8);
}

/// Three-way comparison of a target key against the key held by `node`.
///
/// `Less` means the target sorts before the node (search continues left), `Greater` means
/// it sorts after (search continues right), `Equal` is a hit.
///
/// The comparison must be a total order consistent with the keys already in the tree.
/// Nothing checks this at runtime: an inconsistent comparison silently breaks the search
/// order, which [`crate::domain::check_consistency`] cannot detect.
pub trait Comparable<S: NodeStore> {
    fn compare(&self, store: &S, node: S::Handle) -> Ordering;
}

/// A comparison that can also produce the node to install at the insertion point.
pub trait Insertable<S: NodeStore>: Comparable<S> {
    /// Called once per insertion, at the position where the search ended.
    ///
    /// `overridden` is `None` at an empty position and the colliding node on an `Equal`
    /// comparison. Returning `None` declines the insertion and leaves the tree untouched.
    /// Returning a handle installs it; the engine overwrites its children and height.
    fn create(&mut self, store: &mut S, overridden: Option<S::Handle>) -> Option<S::Handle>;
}

/// Plain closures work as comparisons.
impl<S, F> Comparable<S> for F
where
    S: NodeStore,
    F: Fn(&S, S::Handle) -> Ordering,
{
    fn compare(&self, store: &S, node: S::Handle) -> Ordering {
        self(store, node)
    }
}
