//! Height-balanced (AVL) binary search tree engine.
//!
//! The [`domain`] engine keeps any node layout balanced as long as the layout can answer
//! the [`domain::NodeStore`] accessors, and navigates with caller-supplied
//! [`domain::Comparable`] / [`domain::Insertable`] requests. The [`application`] layer binds
//! it to concrete containers ([`AvlTree`], [`AvlMap`]) that own node storage.
//!
//! ```
//! use avlkit::AvlTree;
//!
//! let mut tree: AvlTree<i32> = (1..=7).collect();
//! assert_eq!(tree.root_key(), Some(&4));
//! assert!(tree.remove(&4));
//! assert_eq!(tree.remove_upper(&5), 2);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
//! ```
//!
//! Single-threaded by contract: trees hold no locks, mutation needs exclusive access.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::{AvlMap, AvlTree, TreeDisplay};
pub use config::DriverSettings;
