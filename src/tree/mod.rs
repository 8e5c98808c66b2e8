//! Recursive operations over [`Value`](crate::value::Value) trees.

mod clone;
mod compare;
mod error;
mod merge;

pub use clone::deep_clone;
pub use compare::{compare, compare_lists};
pub use error::CloneError;
pub use merge::merge;
