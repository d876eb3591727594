use crate::common::Value;
use crate::document::PathAccessor;
use serde::Serialize;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Picks a value out of a collection item, either by field path or with a closure.
///
/// ```rust
/// use eloquent::collection::Selector;
/// use eloquent::document::PathAccessor;
/// use eloquent::{doc, val};
///
/// let item = val!(doc!{ user: { age: 30 } });
/// let accessor = PathAccessor::default();
///
/// assert_eq!(Selector::from("user.age").select(&item, &accessor), val!(30));
/// let doubled = Selector::by(|v| val!(v.as_document().map_or(0, |d| d.len() * 2)));
/// assert_eq!(doubled.select(&item, &accessor), val!(2usize));
/// ```
#[derive(Clone)]
pub enum Selector {
    /// A field path resolved with the collection's accessor. Missing fields
    /// select `null`; the empty path selects the item itself.
    Path(String),
    Fn(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
}

impl Selector {
    pub fn path(path: &str) -> Self {
        Selector::Path(path.to_string())
    }

    pub fn by<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Selector::Fn(Arc::new(f))
    }

    pub fn select(&self, item: &Value, accessor: &PathAccessor) -> Value {
        match self {
            Selector::Path(path) if path.is_empty() => item.clone(),
            Selector::Path(path) => accessor
                .get_value(item, path)
                .cloned()
                .unwrap_or(Value::Null),
            Selector::Fn(f) => f(item),
        }
    }
}

impl Debug for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Path(path) => write!(f, "Selector::Path({})", path),
            Selector::Fn(_) => write!(f, "Selector::Fn"),
        }
    }
}

impl From<&str> for Selector {
    fn from(path: &str) -> Self {
        Selector::path(path)
    }
}

impl From<String> for Selector {
    fn from(path: String) -> Self {
        Selector::Path(path)
    }
}

impl From<&String> for Selector {
    fn from(path: &String) -> Self {
        Selector::Path(path.clone())
    }
}

/// One page of a paginated collection. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Value>,
    /// Number of the previous page, if any.
    pub prev: Option<usize>,
    /// Number of the next page, if any.
    pub next: Option<usize>,
    pub page: usize,
    pub per_page: usize,
}

/// Side on which `pad` adds filler items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadDirection {
    Left,
    #[default]
    Right,
}
