//! Eager collections.

mod collection;
mod selector;

pub use collection::*;
pub use selector::*;
