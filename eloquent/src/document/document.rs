use crate::common::Value;
use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

/// A schema-less record made of string keys and [Value]s.
///
/// Keys keep their insertion order, which is the order used when iterating,
/// serializing and listing paths. Equality, hashing and ordering ignore key
/// order: `{a: 1, b: 2}` equals `{b: 2, a: 1}`.
///
/// Keys are stored as given. Dotted access into nested documents is the job
/// of [PathAccessor](crate::document::PathAccessor).
#[derive(Clone, Default)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eloquent::document::Document;
    ///
    /// let doc = Document::new();
    /// assert!(doc.is_empty());
    /// assert_eq!(doc.len(), 0);
    /// ```
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Document {
            data: IndexMap::with_capacity(capacity),
        }
    }

    /// Builds a document from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> EloquentResult<Document> {
        match Value::from(json) {
            Value::Document(doc) => Ok(doc),
            other => {
                log::error!("Expected a JSON object, found {:?}", other);
                Err(EloquentError::new(
                    "A document can only be built from a JSON object",
                    ErrorKind::InvalidArgument,
                ))
            }
        }
    }

    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the text is not valid JSON or not an object.
    pub fn from_json_str(json: &str) -> EloquentResult<Document> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Document::from_json(value)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Inserts a top-level entry and returns the value it replaced.
    ///
    /// Replacing an existing key keeps its position.
    pub fn insert<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    pub fn entry(&mut self, key: impl Into<String>) -> Entry<'_, String, Value> {
        self.data.entry(key.into())
    }

    /// Removes a top-level entry, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.data.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.data.iter_mut()
    }

    /// Keeps only the entries for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.data.retain(|k, v| f(k, v));
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.data.len());
        for (key, value) in self.data.iter() {
            map.insert(key.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }

    pub(crate) fn to_debug_string(&self) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let entries = self
            .data
            .iter()
            .map(|(key, value)| format!("\"{}\": {}", key, value.to_debug_string()))
            .collect::<Vec<_>>();
        format!("{{{}}}", entries.join(", "))
    }

    fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<(&String, &Value)> = self.data.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .all(|(key, value)| other.data.get(key) == Some(value))
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // order-insensitive: combine per-entry hashes commutatively
        let mut combined: u64 = 0;
        for (key, value) in self.data.iter() {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            value.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        self.data.len().hash(state);
        combined.hash(state);
    }
}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_entries().cmp(&other.sorted_entries())
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for (key, value) in self.data.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }
        doc
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl From<IndexMap<String, Value>> for Document {
    fn from(data: IndexMap<String, Value>) -> Self {
        Document { data }
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = EloquentError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Document::from_json(value)
    }
}

#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals (needed for operator-form
/// keys such as `"$$age"`). Values may be literals, nested `{...}` documents,
/// `[...]` arrays, `null`, or any parenthesised expression.
///
/// # Examples
///
/// ```rust
/// use eloquent::doc;
///
/// let empty = doc!{};
/// assert!(empty.is_empty());
///
/// let base = 100;
/// let user = doc!{
///     name: "Alice",
///     score: (base * 2),
///     address: { city: "Lyon" },
///     skills: ["Liberty", "Equality"],
///     nickname: null,
/// };
/// assert_eq!(user.len(), 5);
///
/// let query = doc!{ "$$age": { gte: 18 } };
/// assert!(query.contains_key("$$age"));
/// ```
#[macro_export]
macro_rules! doc {
    // an empty document
    () => {
        $crate::document::Document::new()
    };

    // a document with outer braces
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    // a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::document::Document::new();
            $(
                doc.insert(
                    $crate::document::normalize(stringify!($key)),
                    $crate::doc_value!($value),
                );
            )*
            doc
        }
    };
}

/// Helper macro converting values for [doc!].
#[macro_export]
macro_rules! doc_value {
    (null) => {
        $crate::common::Value::Null
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
