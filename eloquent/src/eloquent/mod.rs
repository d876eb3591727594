//! Deferred collections.

mod eloquent;

pub use eloquent::*;
