use crate::common::Value;
use crate::config::DEFAULT_FIELD_SEPARATOR;
use crate::document::Document;
use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use smallvec::SmallVec;

/// Dotted field paths, most of which are short.
pub type FieldVec = SmallVec<[String; 8]>;

/// Reads and writes values inside nested documents through field paths.
///
/// A field path is a list of segments joined by the separator, e.g.
/// `"social.github"`. While walking a path, a document step looks the segment
/// up as a key and an array step parses the segment as an index. Any other
/// step, or a missing key, ends the walk without a value.
///
/// # Examples
///
/// ```rust
/// use eloquent::doc;
/// use eloquent::document::PathAccessor;
/// use eloquent::val;
///
/// let accessor = PathAccessor::default();
/// let mut doc = doc!{ a: { b: { c: 3 } }, tags: ["x", "y"] };
///
/// assert_eq!(accessor.get(&doc, "a.b.c"), Some(&val!(3)));
/// assert_eq!(accessor.get(&doc, "tags.1"), Some(&val!("y")));
/// assert_eq!(accessor.get_or(&doc, "a.x.c", val!(0)), val!(0));
///
/// accessor.set(&mut doc, "a.b.c", 4).unwrap();
/// assert_eq!(accessor.get(&doc, "a.b.c"), Some(&val!(4)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAccessor {
    separator: String,
}

impl PathAccessor {
    /// Creates an accessor splitting paths on `separator`.
    pub fn new(separator: &str) -> Self {
        PathAccessor {
            separator: separator.to_string(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Splits a path into its segments.
    pub fn split<'a>(&self, path: &'a str) -> SmallVec<[&'a str; 8]> {
        path.split(self.separator.as_str()).collect()
    }

    /// Joins a prefix and a key into a path.
    pub fn join(&self, prefix: &str, key: &str) -> String {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", prefix, self.separator, key)
        }
    }

    /// Resolves `path` inside `doc`.
    pub fn get<'a>(&self, doc: &'a Document, path: &str) -> Option<&'a Value> {
        if path.is_empty() {
            return None;
        }

        let segments = self.split(path);
        let first = doc.get(segments[0])?;
        resolve(first, &segments[1..])
    }

    /// Resolves `path` inside `doc`, returning `default` when any step is missing.
    pub fn get_or(&self, doc: &Document, path: &str, default: Value) -> Value {
        self.get(doc, path).cloned().unwrap_or(default)
    }

    /// Resolves `path` inside an arbitrary value. Only documents and arrays
    /// can be walked; any path into a scalar resolves to nothing.
    pub fn get_value<'a>(&self, value: &'a Value, path: &str) -> Option<&'a Value> {
        if path.is_empty() {
            return None;
        }
        resolve(value, &self.split(path))
    }

    pub fn has(&self, doc: &Document, path: &str) -> bool {
        self.get(doc, path).is_some()
    }

    /// Writes `value` at `path`.
    ///
    /// Every missing or scalar intermediate step is replaced by a new nested
    /// document; numeric segments never create arrays. An existing array is
    /// only walked through when the segment is an index inside its bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the path is empty or has an empty segment.
    pub fn set<T: Into<Value>>(&self, doc: &mut Document, path: &str, value: T) -> EloquentResult<()> {
        let segments = self.validated_segments(path)?;
        set_in_document(doc, &segments, value.into());
        Ok(())
    }

    /// Removes the value at `path` and returns it.
    ///
    /// Nothing happens when the parent chain does not fully resolve. A final
    /// segment addressing an array element removes that element.
    pub fn unset(&self, doc: &mut Document, path: &str) -> Option<Value> {
        if path.is_empty() {
            return None;
        }

        let segments = self.split(path);
        let (last, parents) = segments.split_last()?;
        if parents.is_empty() {
            return doc.remove(last);
        }

        let parent = resolve_mut(doc.get_mut(parents[0])?, &parents[1..])?;
        match parent {
            Value::Document(inner) => inner.remove(last),
            Value::Array(arr) => match last.parse::<usize>() {
                Ok(index) if index < arr.len() => Some(arr.remove(index)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Lists the path of every leaf in `doc`, depth first in insertion order.
    ///
    /// Nested documents are walked; every other value, arrays included, is a leaf.
    /// An empty nested document contributes no path.
    pub fn paths(&self, doc: &Document) -> FieldVec {
        let mut fields = FieldVec::new();
        self.collect_paths(doc, "", &mut fields);
        fields
    }

    fn collect_paths(&self, doc: &Document, prefix: &str, fields: &mut FieldVec) {
        for (key, value) in doc.iter() {
            let field = self.join(prefix, key);
            match value {
                Value::Document(inner) => self.collect_paths(inner, &field, fields),
                _ => fields.push(field),
            }
        }
    }

    fn validated_segments<'a>(&self, path: &'a str) -> EloquentResult<SmallVec<[&'a str; 8]>> {
        if path.is_empty() {
            log::error!("Field path cannot be empty");
            return Err(EloquentError::new(
                "Field path cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        let segments = self.split(path);
        if segments.iter().any(|s| s.is_empty()) {
            log::error!("Field path {} has an empty segment", path);
            return Err(EloquentError::new(
                &format!("Field path `{}` has an empty segment", path),
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(segments)
    }
}

impl Default for PathAccessor {
    fn default() -> Self {
        PathAccessor::new(DEFAULT_FIELD_SEPARATOR)
    }
}

fn resolve<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Document(doc) => doc.get(segment)?,
            Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn resolve_mut<'a>(value: &'a mut Value, segments: &[&str]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Document(doc) => doc.get_mut(segment)?,
            Value::Array(arr) => arr.get_mut(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_in_document(doc: &mut Document, segments: &[&str], value: Value) {
    let key = segments[0];
    if segments.len() == 1 {
        doc.insert(key, value);
        return;
    }

    let slot = doc.entry(key).or_insert(Value::Null);
    set_in_value(slot, &segments[1..], value);
}

fn set_in_value(slot: &mut Value, segments: &[&str], value: Value) {
    let index = match (&*slot, segments[0].parse::<usize>()) {
        (Value::Array(arr), Ok(index)) if index < arr.len() => Some(index),
        _ => None,
    };

    match (slot, index) {
        (Value::Document(doc), _) => set_in_document(doc, segments, value),
        (Value::Array(arr), Some(index)) => {
            if segments.len() == 1 {
                arr[index] = value;
            } else {
                set_in_value(&mut arr[index], &segments[1..], value);
            }
        }
        (slot, _) => {
            let mut doc = Document::new();
            set_in_document(&mut doc, segments, value);
            *slot = Value::Document(doc);
        }
    }
}
