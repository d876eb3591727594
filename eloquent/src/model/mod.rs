//! Single-document models.

mod model;

pub use model::*;
