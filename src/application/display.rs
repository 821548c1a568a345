use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::application::{AvlMap, AvlTree};
use crate::domain::{NodeArena, NodeStore};

/// Placeholder for a missing child whose sibling exists.
pub const ABSENT: &str = "·";

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<K: Display> TreeDisplay for AvlTree<K> {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_string(&self) -> Tree<String> {
        render(self.nodes(), self.root(), |key, _| key.to_string())
    }
}

impl<K: Display, V: Display> TreeDisplay for AvlMap<K, V> {
    #[instrument(level = "debug", skip_all)]
    fn to_tree_string(&self) -> Tree<String> {
        render(self.nodes(), self.root(), |key, value| format!("{key}: {value}"))
    }
}

fn render<K, V>(
    nodes: &NodeArena<K, V>,
    root: Option<Index>,
    label: impl Fn(&K, &V) -> String + Copy,
) -> Tree<String> {
    match root {
        Some(root) => build_tree(nodes, root, label),
        None => Tree::new("Empty tree".to_string()),
    }
}

fn build_tree<K, V>(
    nodes: &NodeArena<K, V>,
    idx: Index,
    label: impl Fn(&K, &V) -> String + Copy,
) -> Tree<String> {
    let text = match nodes.get(idx) {
        Some(node) => format!("{} (h={})", label(node.key(), node.value()), node.height()),
        None => ABSENT.to_string(),
    };
    let mut tree = Tree::new(text);

    let (left, right) = (nodes.left(idx), nodes.right(idx));
    if left.is_none() && right.is_none() {
        return tree;
    }
    for child in [left, right] {
        match child {
            Some(child) => tree.push(build_tree(nodes, child, label)),
            None => tree.push(Tree::new(ABSENT.to_string())),
        };
    }
    tree
}
