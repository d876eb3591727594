mod document;
mod path_accessor;

pub use document::*;
pub use path_accessor::*;
