//! Application layer: concrete trees, rendering and the stress driver
//!
//! This layer binds key types to the domain engine and owns node lifetimes.

pub mod display;
pub mod driver;
pub mod error;
pub mod map;
pub mod requests;
pub mod tree;

pub use display::TreeDisplay;
pub use driver::{CycleReport, Driver};
pub use error::{ApplicationError, ApplicationResult};
pub use map::AvlMap;
pub use requests::{InsertEntry, KeyProbe, OnCollision};
pub use tree::AvlTree;
