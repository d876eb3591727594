use crate::common::Value;
use crate::config::EloquentConfig;
use crate::document::{Document, PathAccessor};
use crate::errors::EloquentResult;
use crate::query::{QueryNode, QuerySpec, EQ, REGEXP};
use std::fmt::{Display, Formatter};

/// A compiled constraint: the value at `path` must satisfy `operator` against `operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub path: String,
    pub operator: String,
    pub operand: Value,
}

impl Triple {
    pub fn new(path: &str, operator: &str, operand: Value) -> Self {
        Triple {
            path: path.to_string(),
            operator: operator.to_string(),
            operand,
        }
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.path, self.operator, self.operand)
    }
}

/// Flattens a [QuerySpec] into a list of [Triple]s sorted by path.
///
/// ```rust
/// use eloquent::doc;
/// use eloquent::query::{QueryBuilder, Triple};
/// use eloquent::val;
///
/// let builder = QueryBuilder::default();
/// let triples = builder.compile_document(&doc!{
///     name: "Ada",
///     address: { city: "London" },
///     "$$age": { gte: 18 },
/// }).unwrap();
///
/// assert_eq!(triples, vec![
///     Triple::new("address.city", "eq", val!("London")),
///     Triple::new("age", "gte", val!(18)),
///     Triple::new("name", "eq", val!("Ada")),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    accessor: PathAccessor,
    marker: String,
}

impl QueryBuilder {
    pub fn new(config: &EloquentConfig) -> Self {
        QueryBuilder {
            accessor: PathAccessor::new(&config.field_separator()),
            marker: config.operator_marker(),
        }
    }

    /// Compiles a specification. Triples are sorted by path with a stable
    /// sort, so constraints on the same path keep their declaration order.
    pub fn compile(&self, spec: &QuerySpec) -> Vec<Triple> {
        let mut triples = Vec::new();
        self.compile_into(spec, "", &mut triples);
        triples.sort_by(|a, b| a.path.cmp(&b.path));

        log::debug!(
            "Compiled query into [{}]",
            triples
                .iter()
                .map(Triple::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        triples
    }

    /// Parses `doc` with the configured operator marker, then compiles it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the document is not a valid specification.
    pub fn compile_document(&self, doc: &Document) -> EloquentResult<Vec<Triple>> {
        let spec = QuerySpec::parse(doc, &self.marker)?;
        Ok(self.compile(&spec))
    }

    fn compile_into(&self, spec: &QuerySpec, prefix: &str, triples: &mut Vec<Triple>) {
        for (key, node) in spec.entries() {
            let path = self.accessor.join(prefix, key);
            match node {
                QueryNode::Operators(operators) => {
                    for (operator, operand) in operators {
                        triples.push(Triple::new(&path, operator, operand.clone()));
                    }
                }
                QueryNode::Pattern(pattern) => {
                    triples.push(Triple::new(&path, REGEXP, Value::Pattern(pattern.clone())));
                }
                QueryNode::Nested(nested) => self.compile_into(nested, &path, triples),
                QueryNode::Literal(value) => {
                    triples.push(Triple::new(&path, EQ, value.clone()));
                }
            }
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        QueryBuilder::new(&EloquentConfig::default())
    }
}
