#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

mod utils;
pub use utils::helper::{height_bound, min_height};

mod node;
pub use node::{Color, NodeId};

mod rb_tree;
pub use rb_tree::RbTree;

mod remove;

mod traversal;
pub use traversal::{Iter, Traverse};

mod validate;
pub use validate::Violation;

pub use ordered_float::OrderedFloat;

/// A red-black tree keyed by floating point values.
///
/// Keys are wrapped in [`OrderedFloat`], which gives floats a total order
/// (`NaN` sorts after every other value and equals itself).
pub type FloatRbTree<T> = RbTree<OrderedFloat<T>>;
