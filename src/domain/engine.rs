//! Height-balanced search, insertion and removal over any [`NodeStore`].
//!
//! Every mutating function takes the current subtree root by value and returns the new
//! root. Callers must store the returned root back; rotations replace the local root, so
//! the old handle is not necessarily the root anymore.
//!
//! Recursion depth equals the tree height, which the balance invariant keeps logarithmic.
//! Nothing here synchronizes: a tree must be mutated by one owner at a time.

use std::cmp::Ordering;

use tracing::trace;

use crate::domain::capability::{Comparable, Insertable, NodeStore};

/// Outcome of [`insert_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted<H> {
    /// A new node was installed at an empty position.
    Created(H),
    /// `node` took the place of the colliding `overridden` node, inheriting its children
    /// and height. `overridden` is fully detached and now belongs to the caller.
    Replaced { node: H, overridden: H },
    /// The request handed back the colliding node itself; it stays in place.
    Updated(H),
    /// The request declined; the tree is unchanged.
    Declined,
}

impl<H: Copy> Inserted<H> {
    /// The node now holding the key, if any.
    pub fn node(&self) -> Option<H> {
        match *self {
            Inserted::Created(node) | Inserted::Updated(node) => Some(node),
            Inserted::Replaced { node, .. } => Some(node),
            Inserted::Declined => None,
        }
    }
}

pub(crate) fn height_of<S: NodeStore>(store: &S, node: Option<S::Handle>) -> u8 {
    node.map_or(0, |n| store.height(n))
}

pub(crate) fn sub_height<S: NodeStore>(store: &S, node: S::Handle) -> u8 {
    height_of(store, store.left(node)).max(height_of(store, store.right(node)))
}

pub(crate) fn balance_factor<S: NodeStore>(store: &S, node: S::Handle) -> i16 {
    i16::from(height_of(store, store.left(node))) - i16::from(height_of(store, store.right(node)))
}

fn update_height<S: NodeStore>(store: &mut S, node: S::Handle) {
    let height = sub_height(store, node) + 1;
    store.set_height(node, height);
}

/// Clears the structural fields of a node leaving the tree.
fn detach<S: NodeStore>(store: &mut S, node: S::Handle) {
    store.set_left(node, None);
    store.set_right(node, None);
    store.set_height(node, 1);
}

fn rotate_right<S: NodeStore>(store: &mut S, y: S::Handle) -> S::Handle {
    let Some(x) = store.left(y) else {
        return y;
    };
    trace!(pivot = ?y, "rotate right");

    let moved = store.right(x);
    store.set_right(x, Some(y));
    store.set_left(y, moved);

    update_height(store, y);
    update_height(store, x);
    x
}

fn rotate_left<S: NodeStore>(store: &mut S, x: S::Handle) -> S::Handle {
    let Some(y) = store.right(x) else {
        return x;
    };
    trace!(pivot = ?x, "rotate left");

    let moved = store.left(y);
    store.set_left(y, Some(x));
    store.set_right(x, moved);

    update_height(store, x);
    update_height(store, y);
    y
}

/// Restores the balance invariant at `node`, assuming both subtrees are valid and their
/// heights differ by at most two. Returns the new local root.
pub fn rebalance<S: NodeStore>(store: &mut S, node: S::Handle) -> S::Handle {
    let balance = balance_factor(store, node);
    if balance < -1 {
        if let Some(right) = store.right(node) {
            if balance_factor(store, right) > 0 {
                let lifted = rotate_right(store, right);
                store.set_right(node, Some(lifted));
            }
        }
        rotate_left(store, node)
    } else if balance > 1 {
        if let Some(left) = store.left(node) {
            if balance_factor(store, left) < 0 {
                let lifted = rotate_left(store, left);
                store.set_left(node, Some(lifted));
            }
        }
        rotate_right(store, node)
    } else {
        update_height(store, node);
        node
    }
}

/// Returns the node comparing `Equal`, or `None`.
pub fn find_at<S, R>(store: &S, root: Option<S::Handle>, request: &R) -> Option<S::Handle>
where
    S: NodeStore,
    R: Comparable<S> + ?Sized,
{
    let mut current = root;
    while let Some(node) = current {
        current = match request.compare(store, node) {
            Ordering::Less => store.left(node),
            Ordering::Greater => store.right(node),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

/// Inserts through `request`, rebalancing the path back to the root.
pub fn insert_at<S, R>(
    store: &mut S,
    root: Option<S::Handle>,
    request: &mut R,
) -> (Option<S::Handle>, Inserted<S::Handle>)
where
    S: NodeStore,
    R: Insertable<S> + ?Sized,
{
    let Some(node) = root else {
        return match request.create(store, None) {
            Some(created) => {
                detach(store, created);
                (Some(created), Inserted::Created(created))
            }
            None => (None, Inserted::Declined),
        };
    };

    match request.compare(store, node) {
        Ordering::Less => {
            let left = store.left(node);
            let (left, outcome) = insert_at(store, left, request);
            if outcome == Inserted::Declined {
                return (Some(node), outcome);
            }
            store.set_left(node, left);
            (Some(rebalance(store, node)), outcome)
        }
        Ordering::Greater => {
            let right = store.right(node);
            let (right, outcome) = insert_at(store, right, request);
            if outcome == Inserted::Declined {
                return (Some(node), outcome);
            }
            store.set_right(node, right);
            (Some(rebalance(store, node)), outcome)
        }
        Ordering::Equal => match request.create(store, Some(node)) {
            None => (Some(node), Inserted::Declined),
            Some(same) if same == node => (Some(node), Inserted::Updated(node)),
            Some(replacement) => {
                let (left, right, height) =
                    (store.left(node), store.right(node), store.height(node));
                store.set_left(replacement, left);
                store.set_right(replacement, right);
                store.set_height(replacement, height);
                detach(store, node);
                (
                    Some(replacement),
                    Inserted::Replaced {
                        node: replacement,
                        overridden: node,
                    },
                )
            }
        },
    }
}

/// Removes the node comparing `Equal`. Returns the new root and the detached node, whose
/// ownership passes to the caller. A miss returns `None` and leaves the tree untouched.
pub fn remove_at<S, R>(
    store: &mut S,
    root: Option<S::Handle>,
    request: &R,
) -> (Option<S::Handle>, Option<S::Handle>)
where
    S: NodeStore,
    R: Comparable<S> + ?Sized,
{
    let Some(node) = root else {
        return (None, None);
    };

    match request.compare(store, node) {
        Ordering::Less => {
            let left = store.left(node);
            let (left, removed) = remove_at(store, left, request);
            if removed.is_none() {
                return (Some(node), None);
            }
            store.set_left(node, left);
            (Some(rebalance(store, node)), removed)
        }
        Ordering::Greater => {
            let right = store.right(node);
            let (right, removed) = remove_at(store, right, request);
            if removed.is_none() {
                return (Some(node), None);
            }
            store.set_right(node, right);
            (Some(rebalance(store, node)), removed)
        }
        Ordering::Equal => {
            let replacement = match (store.left(node), store.right(node)) {
                (Some(left), Some(right)) => {
                    let (rest, successor) = remove_at_minimum(store, right);
                    store.set_left(successor, Some(left));
                    store.set_right(successor, rest);
                    Some(rebalance(store, successor))
                }
                (Some(left), None) => Some(left),
                (None, Some(right)) => Some(right),
                (None, None) => None,
            };
            detach(store, node);
            (replacement, Some(node))
        }
    }
}

/// Detaches the leftmost node of a non-empty subtree.
/// Returns the rebalanced remainder and the detached node.
pub fn remove_at_minimum<S: NodeStore>(
    store: &mut S,
    root: S::Handle,
) -> (Option<S::Handle>, S::Handle) {
    match store.left(root) {
        Some(left) => {
            let (rest, minimum) = remove_at_minimum(store, left);
            store.set_left(root, rest);
            (Some(rebalance(store, root)), minimum)
        }
        None => {
            let rest = store.right(root);
            detach(store, root);
            (rest, root)
        }
    }
}

/// Detaches the rightmost node of a non-empty subtree.
/// Returns the rebalanced remainder and the detached node.
pub fn remove_at_maximum<S: NodeStore>(
    store: &mut S,
    root: S::Handle,
) -> (Option<S::Handle>, S::Handle) {
    match store.right(root) {
        Some(right) => {
            let (rest, maximum) = remove_at_maximum(store, right);
            store.set_right(root, rest);
            (Some(rebalance(store, root)), maximum)
        }
        None => {
            let rest = store.left(root);
            detach(store, root);
            (rest, root)
        }
    }
}

/// Detaches every node whose key sorts strictly after `boundary`.
///
/// The boundary key itself, if present, is kept. The retained nodes are re-joined into a
/// balanced tree. Detached nodes are returned in ascending order and belong to the caller.
pub fn remove_upper<S, R>(
    store: &mut S,
    root: Option<S::Handle>,
    boundary: &R,
) -> (Option<S::Handle>, Vec<S::Handle>)
where
    S: NodeStore,
    R: Comparable<S> + ?Sized,
{
    let mut detached = Vec::new();
    let root = split_upper(store, root, boundary, &mut detached);
    (root, detached)
}

/// Detaches every node whose key sorts strictly before `boundary`; the mirror of
/// [`remove_upper`].
pub fn remove_lower<S, R>(
    store: &mut S,
    root: Option<S::Handle>,
    boundary: &R,
) -> (Option<S::Handle>, Vec<S::Handle>)
where
    S: NodeStore,
    R: Comparable<S> + ?Sized,
{
    let mut detached = Vec::new();
    let root = split_lower(store, root, boundary, &mut detached);
    (root, detached)
}

fn split_upper<S, R>(
    store: &mut S,
    root: Option<S::Handle>,
    boundary: &R,
    detached: &mut Vec<S::Handle>,
) -> Option<S::Handle>
where
    S: NodeStore,
    R: Comparable<S> + ?Sized,
{
    let node = root?;
    let (left, right) = (store.left(node), store.right(node));
    match boundary.compare(store, node) {
        Ordering::Less => {
            let kept = split_upper(store, left, boundary, detached);
            detach(store, node);
            detached.push(node);
            release_subtree(store, right, detached);
            kept
        }
        Ordering::Equal => {
            release_subtree(store, right, detached);
            Some(join(store, left, node, None))
        }
        Ordering::Greater => {
            let kept = split_upper(store, right, boundary, detached);
            Some(join(store, left, node, kept))
        }
    }
}

fn split_lower<S, R>(
    store: &mut S,
    root: Option<S::Handle>,
    boundary: &R,
    detached: &mut Vec<S::Handle>,
) -> Option<S::Handle>
where
    S: NodeStore,
    R: Comparable<S> + ?Sized,
{
    let node = root?;
    let (left, right) = (store.left(node), store.right(node));
    match boundary.compare(store, node) {
        Ordering::Greater => {
            release_subtree(store, left, detached);
            detach(store, node);
            detached.push(node);
            split_lower(store, right, boundary, detached)
        }
        Ordering::Equal => {
            release_subtree(store, left, detached);
            Some(join(store, None, node, right))
        }
        Ordering::Less => {
            let kept = split_lower(store, left, boundary, detached);
            Some(join(store, kept, node, right))
        }
    }
}

/// Concatenates `left`, `pivot` and `right`, where every key of `left` sorts before the
/// pivot and every key of `right` after it. The subtrees may differ in height arbitrarily;
/// the pivot is sunk along the spine of the taller one until the heights meet.
fn join<S: NodeStore>(
    store: &mut S,
    left: Option<S::Handle>,
    pivot: S::Handle,
    right: Option<S::Handle>,
) -> S::Handle {
    let (left_height, right_height) = (height_of(store, left), height_of(store, right));
    match (left, right) {
        (Some(tall), _) if left_height > right_height + 1 => {
            let inner = store.right(tall);
            let joined = join(store, inner, pivot, right);
            store.set_right(tall, Some(joined));
            rebalance(store, tall)
        }
        (_, Some(tall)) if right_height > left_height + 1 => {
            let inner = store.left(tall);
            let joined = join(store, left, pivot, inner);
            store.set_left(tall, Some(joined));
            rebalance(store, tall)
        }
        _ => {
            store.set_left(pivot, left);
            store.set_right(pivot, right);
            update_height(store, pivot);
            pivot
        }
    }
}

/// Detaches a whole subtree, appending its nodes in ascending order.
fn release_subtree<S: NodeStore>(
    store: &mut S,
    root: Option<S::Handle>,
    detached: &mut Vec<S::Handle>,
) {
    let Some(node) = root else {
        return;
    };
    let (left, right) = (store.left(node), store.right(node));
    release_subtree(store, left, detached);
    detach(store, node);
    detached.push(node);
    release_subtree(store, right, detached);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeArena;
    use crate::domain::diagnostics::{check_consistency, count, in_order};
    use generational_arena::Index;

    struct Key(i32);

    impl Comparable<NodeArena<i32, ()>> for Key {
        fn compare(&self, store: &NodeArena<i32, ()>, node: Index) -> Ordering {
            self.0.cmp(store.key(node))
        }
    }

    impl Insertable<NodeArena<i32, ()>> for Key {
        fn create(&mut self, store: &mut NodeArena<i32, ()>, overridden: Option<Index>) -> Option<Index> {
            match overridden {
                Some(_) => None,
                None => Some(store.allocate(self.0, ())),
            }
        }
    }

    fn build(keys: impl IntoIterator<Item = i32>) -> (NodeArena<i32, ()>, Option<Index>) {
        let mut store = NodeArena::new();
        let mut root = None;
        for key in keys {
            root = insert_at(&mut store, root, &mut Key(key)).0;
        }
        (store, root)
    }

    fn keys(store: &NodeArena<i32, ()>, root: Option<Index>) -> Vec<i32> {
        in_order(store, root).map(|n| *store.key(n)).collect()
    }

    #[test]
    fn given_left_leaning_chain_when_rebalancing_then_rotates_right() {
        let (store, root) = build([3, 2, 1]);

        assert_eq!(root.map(|r| *store.key(r)), Some(2));
        assert_eq!(store.height(root.unwrap()), 2);
        assert!(check_consistency(&store, root));
    }

    #[test]
    fn given_right_left_zigzag_when_rebalancing_then_double_rotates() {
        let (store, root) = build([1, 3, 2]);

        assert_eq!(root.map(|r| *store.key(r)), Some(2));
        assert!(check_consistency(&store, root));
    }

    #[test]
    fn given_node_with_two_children_when_removing_then_successor_takes_its_place() {
        let (mut store, root) = build([2, 1, 3]);

        let (root, removed) = remove_at(&mut store, root, &Key(2));

        assert_eq!(removed.map(|n| *store.key(n)), Some(2));
        assert_eq!(root.map(|r| *store.key(r)), Some(3));
        assert_eq!(keys(&store, root), vec![1, 3]);
        assert!(check_consistency(&store, root));
    }

    #[test]
    fn given_removed_node_when_returned_then_it_is_detached() {
        let (mut store, root) = build(1..=7);

        let (_, removed) = remove_at(&mut store, root, &Key(4));
        let removed = removed.unwrap();

        assert_eq!(store.left(removed), None);
        assert_eq!(store.right(removed), None);
        assert_eq!(store.height(removed), 1);
    }

    #[test]
    fn given_tree_when_extracting_extremes_then_returns_min_and_max() {
        let (mut store, root) = build(1..=10);

        let (root, minimum) = remove_at_minimum(&mut store, root.unwrap());
        assert_eq!(*store.key(minimum), 1);
        let (root, maximum) = remove_at_maximum(&mut store, root.unwrap());
        assert_eq!(*store.key(maximum), 10);

        assert_eq!(keys(&store, root), (2..=9).collect::<Vec<_>>());
        assert!(check_consistency(&store, root));
    }

    #[test]
    fn given_uneven_subtrees_when_joining_then_result_is_balanced() {
        let (mut store, left) = build(1..=31);
        let pivot = store.allocate(32, ());

        let root = join(&mut store, left, pivot, None);

        assert_eq!(count(&store, Some(root)), 32);
        assert_eq!(keys(&store, Some(root)), (1..=32).collect::<Vec<_>>());
        assert!(check_consistency(&store, Some(root)));
    }

    #[test]
    fn given_collision_when_request_declines_then_outcome_is_declined() {
        let (mut store, root) = build([5]);

        let (after, outcome) = insert_at(&mut store, root, &mut Key(5));

        assert_eq!(outcome, Inserted::Declined);
        assert_eq!(after, root);
        assert_eq!(store.len(), 1);
    }
}
