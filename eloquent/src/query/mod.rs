//! Query specifications, their compiler, the operator table and the matcher.

mod compiler;
mod matcher;
mod operators;
mod spec;

pub use compiler::*;
pub use matcher::*;
pub use operators::*;
pub use spec::*;
