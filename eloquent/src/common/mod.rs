mod context;
mod macros;
mod pattern;
mod sort_order;
mod util;
mod value;

pub use context::*;
pub use macros::*;
pub use pattern::*;
pub use sort_order::*;
pub use util::*;
pub use value::*;
