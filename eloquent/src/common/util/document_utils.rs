use crate::common::Value;
use crate::document::Document;

/// Returns true when the value carries no content: `null`, an empty array,
/// an empty document, or a string made only of whitespace.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::Document(doc) => doc.is_empty(),
        _ => false,
    }
}

/// Recursively merges `source` into `target`.
///
/// Nested documents present on both sides are merged key by key; every other
/// value in `source` (arrays included) replaces the one in `target`.
pub fn merge_deep(target: &mut Document, source: &Document) {
    for (key, value) in source.iter() {
        match (target.get_mut(key), value) {
            (Some(Value::Document(existing)), Value::Document(incoming)) => {
                merge_deep(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merges only the first level of `source` into `target`.
pub fn merge_shallow(target: &mut Document, source: &Document) {
    for (key, value) in source.iter() {
        target.insert(key.clone(), value.clone());
    }
}
