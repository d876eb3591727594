use crate::common::{Pattern, Value};
use crate::config::DEFAULT_OPERATOR_MARKER;
use crate::document::Document;
use crate::errors::{EloquentError, EloquentResult, ErrorKind};

/// One entry of a [QuerySpec], classified when the specification is built.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// `{ field: literal }`, compiled to an `eq` constraint.
    Literal(Value),
    /// `{ field: /pattern/ }`, compiled to a `regexp` constraint.
    Pattern(Pattern),
    /// `{ field: { ... } }`, compiled recursively under `field`.
    Nested(QuerySpec),
    /// `{ "$$field": { operator: operand, ... } }`, one constraint per operator.
    Operators(Vec<(String, Value)>),
}

/// A declarative description of match constraints.
///
/// A specification is either parsed from a [Document] or built fluently.
/// The two forms below are equivalent:
///
/// ```rust
/// use eloquent::doc;
/// use eloquent::query::QuerySpec;
///
/// let parsed = QuerySpec::parse(&doc!{
///     name: "Ada",
///     "$$age": { gte: 18, lt: 65 },
///     address: { city: "London" },
/// }, "$$").unwrap();
///
/// let built = QuerySpec::new()
///     .eq("name", "Ada")
///     .op("age", "gte", 18)
///     .op("age", "lt", 65)
///     .nested("address", QuerySpec::new().eq("city", "London"));
///
/// assert_eq!(parsed, built);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySpec {
    entries: Vec<(String, QueryNode)>,
}

impl QuerySpec {
    /// Creates an empty specification, which matches everything.
    pub fn new() -> Self {
        QuerySpec {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[(String, QueryNode)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a direct-form entry. A pattern value becomes a pattern entry.
    pub fn eq<T: Into<Value>>(mut self, field: &str, value: T) -> Self {
        let node = match value.into() {
            Value::Pattern(pattern) => QueryNode::Pattern(pattern),
            other => QueryNode::Literal(other),
        };
        self.entries.push((field.to_string(), node));
        self
    }

    /// Adds a pattern entry.
    pub fn matches(mut self, field: &str, pattern: Pattern) -> Self {
        self.entries
            .push((field.to_string(), QueryNode::Pattern(pattern)));
        self
    }

    /// Adds a nested specification under `field`.
    pub fn nested(mut self, field: &str, spec: QuerySpec) -> Self {
        self.entries.push((field.to_string(), QueryNode::Nested(spec)));
        self
    }

    /// Adds an operator-form constraint. Operators on the same field are
    /// grouped into one entry, as in `{ "$$age": { gte: 18, lt: 65 } }`.
    pub fn op<T: Into<Value>>(mut self, field: &str, operator: &str, operand: T) -> Self {
        let operand = operand.into();
        let existing = self.entries.iter_mut().find_map(|(name, node)| match node {
            QueryNode::Operators(ops) if name == field => Some(ops),
            _ => None,
        });

        match existing {
            Some(ops) => ops.push((operator.to_string(), operand)),
            None => self.entries.push((
                field.to_string(),
                QueryNode::Operators(vec![(operator.to_string(), operand)]),
            )),
        }
        self
    }

    /// Parses a document-shaped specification.
    ///
    /// A key starting with `marker` is in operator form and its value must be
    /// a document of `operator: operand` entries. Any other key is in direct
    /// form: a pattern value, a nested document, or a literal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if an operator-form key has nothing after the
    /// marker or its value is not a document.
    pub fn parse(doc: &Document, marker: &str) -> EloquentResult<QuerySpec> {
        let mut spec = QuerySpec::new();
        for (key, value) in doc.iter() {
            if let Some(field) = key.strip_prefix(marker) {
                if field.is_empty() {
                    log::error!("Operator-form key {} has no field name", key);
                    return Err(EloquentError::new(
                        &format!("Operator-form key `{}` has no field name", key),
                        ErrorKind::InvalidQuery,
                    ));
                }

                let operators = match value {
                    Value::Document(ops) => ops
                        .iter()
                        .map(|(op, operand)| (op.clone(), operand.clone()))
                        .collect(),
                    other => {
                        log::error!("Operator-form key {} expects a document, found {:?}", key, other);
                        return Err(EloquentError::new(
                            &format!("Operator-form key `{}` expects a document of operators", key),
                            ErrorKind::InvalidQuery,
                        ));
                    }
                };
                spec.entries
                    .push((field.to_string(), QueryNode::Operators(operators)));
                continue;
            }

            let node = match value {
                Value::Pattern(pattern) => QueryNode::Pattern(pattern.clone()),
                Value::Document(nested) => QueryNode::Nested(QuerySpec::parse(nested, marker)?),
                literal => QueryNode::Literal(literal.clone()),
            };
            spec.entries.push((key.clone(), node));
        }
        Ok(spec)
    }
}

impl TryFrom<&Document> for QuerySpec {
    type Error = EloquentError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        QuerySpec::parse(doc, DEFAULT_OPERATOR_MARKER)
    }
}

impl TryFrom<Document> for QuerySpec {
    type Error = EloquentError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        QuerySpec::parse(&doc, DEFAULT_OPERATOR_MARKER)
    }
}

/// Anything a query method accepts: a built [QuerySpec] or a [Document] to parse.
pub trait IntoQuery {
    /// Produces the specification, parsing documents with `marker`.
    fn into_query(self, marker: &str) -> EloquentResult<QuerySpec>;
}

impl IntoQuery for QuerySpec {
    fn into_query(self, _marker: &str) -> EloquentResult<QuerySpec> {
        Ok(self)
    }
}

impl IntoQuery for &QuerySpec {
    fn into_query(self, _marker: &str) -> EloquentResult<QuerySpec> {
        Ok(self.clone())
    }
}

impl IntoQuery for Document {
    fn into_query(self, marker: &str) -> EloquentResult<QuerySpec> {
        QuerySpec::parse(&self, marker)
    }
}

impl IntoQuery for &Document {
    fn into_query(self, marker: &str) -> EloquentResult<QuerySpec> {
        QuerySpec::parse(self, marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{doc, val};

    #[test]
    fn test_parse_direct_forms() {
        let mut query = doc! { name: "Ada", age: 36, active: null };
        query.insert("initial", Pattern::new("^A").unwrap());
        let spec = QuerySpec::parse(&query, "$$").unwrap();

        assert_eq!(spec.len(), 4);
        assert_eq!(spec.entries()[0], ("name".to_string(), QueryNode::Literal(val!("Ada"))));
        assert_eq!(spec.entries()[2], ("active".to_string(), QueryNode::Literal(Value::Null)));
        assert!(matches!(spec.entries()[3].1, QueryNode::Pattern(_)));
    }

    #[test]
    fn test_parse_nested() {
        let spec = QuerySpec::parse(&doc! { social: { github: "ada" } }, "$$").unwrap();
        assert_eq!(
            spec.entries()[0].1,
            QueryNode::Nested(QuerySpec::new().eq("github", "ada"))
        );
    }

    #[test]
    fn test_parse_operator_form() {
        let spec = QuerySpec::parse(&doc! { "$$age": { gte: 18, lt: 65 } }, "$$").unwrap();
        assert_eq!(
            spec.entries()[0],
            (
                "age".to_string(),
                QueryNode::Operators(vec![
                    ("gte".to_string(), val!(18)),
                    ("lt".to_string(), val!(65))
                ])
            )
        );
    }

    #[test]
    fn test_parse_arrays_are_literals() {
        let spec = QuerySpec::parse(&doc! { tags: ["a", "b"] }, "$$").unwrap();
        assert_eq!(spec.entries()[0].1, QueryNode::Literal(val!(vec!["a", "b"])));
    }

    #[test]
    fn test_parse_operator_form_requires_document() {
        let err = QuerySpec::parse(&doc! { "$$age": 18 }, "$$").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidQuery);
    }

    #[test]
    fn test_parse_operator_form_requires_field() {
        let err = QuerySpec::parse(&doc! { "$$": { eq: 1 } }, "$$").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidQuery);
    }

    #[test]
    fn test_parse_custom_marker() {
        let spec = QuerySpec::parse(&doc! { "@age": { eq: 1 }, "$$x": 2 }, "@").unwrap();
        assert!(matches!(spec.entries()[0].1, QueryNode::Operators(_)));
        assert_eq!(spec.entries()[1], ("$$x".to_string(), QueryNode::Literal(val!(2))));
    }

    #[test]
    fn test_op_groups_by_field() {
        let spec = QuerySpec::new().op("age", "gt", 1).eq("name", "x").op("age", "lt", 9);
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_eq_with_pattern_value() {
        let spec = QuerySpec::new().eq("name", Pattern::new("^A").unwrap());
        assert!(matches!(spec.entries()[0].1, QueryNode::Pattern(_)));
    }

    #[test]
    fn test_into_query() {
        let spec = doc! { a: 1 }.into_query("$$").unwrap();
        assert_eq!(spec, QuerySpec::new().eq("a", 1));
        assert_eq!((&spec).into_query("$$").unwrap(), spec);
    }
}
