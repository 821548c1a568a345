//! Domain layer: the balancing engine and its capability contracts
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod capability;
pub mod diagnostics;
pub mod engine;

pub use arena::{Node, NodeArena};
pub use capability::{Comparable, Insertable, NodeStore};
pub use diagnostics::{check_consistency, count, height, in_order, InOrder};
pub use engine::{
    find_at, insert_at, rebalance, remove_at, remove_at_maximum, remove_at_minimum,
    remove_lower, remove_upper, Inserted,
};
