use crate::common::Value;
use crate::document::{Document, PathAccessor};
use crate::errors::EloquentResult;
use crate::query::{OperatorFn, OperatorTable, QueryBuilder, QuerySpec, Triple};
use std::fmt::{Debug, Formatter};

/// Evaluates compiled constraints against documents.
///
/// Operators are resolved when the matcher is built, so a constraint naming
/// an unregistered operator fails before any document is visited, even when
/// there is nothing to match against.
#[derive(Clone)]
pub struct Matcher {
    constraints: Vec<(Triple, OperatorFn)>,
    accessor: PathAccessor,
}

impl Matcher {
    /// Builds a matcher from compiled triples.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperator` if a triple names an operator missing from `operators`.
    pub fn new(
        triples: Vec<Triple>,
        operators: &OperatorTable,
        accessor: PathAccessor,
    ) -> EloquentResult<Matcher> {
        let mut constraints = Vec::with_capacity(triples.len());
        for triple in triples {
            let f = operators.resolve(&triple.operator)?;
            constraints.push((triple, f));
        }
        Ok(Matcher {
            constraints,
            accessor,
        })
    }

    /// Compiles `spec` with `builder` and builds a matcher over the result.
    pub fn compile(
        spec: &QuerySpec,
        builder: &QueryBuilder,
        operators: &OperatorTable,
        accessor: PathAccessor,
    ) -> EloquentResult<Matcher> {
        Matcher::new(builder.compile(spec), operators, accessor)
    }

    pub fn triples(&self) -> Vec<&Triple> {
        self.constraints.iter().map(|(t, _)| t).collect()
    }

    /// Returns true when every constraint holds for `item`.
    ///
    /// A missing field resolves to [Value::Null]. Items that are not
    /// documents expose no fields.
    pub fn matches(&self, item: &Value) -> bool {
        self.constraints.iter().all(|(triple, f)| {
            let field = self.accessor.get_value(item, &triple.path).unwrap_or(&Value::Null);
            f(&triple.operand, field)
        })
    }

    pub fn matches_document(&self, doc: &Document) -> bool {
        self.constraints.iter().all(|(triple, f)| {
            let field = self.accessor.get(doc, &triple.path).unwrap_or(&Value::Null);
            f(&triple.operand, field)
        })
    }
}

impl Debug for Matcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("triples", &self.triples())
            .field("accessor", &self.accessor)
            .finish()
    }
}

/// Matches a single document against a specification with the default
/// configuration and the built-in operators.
pub fn is_match(spec: &QuerySpec, doc: &Document) -> EloquentResult<bool> {
    let matcher = Matcher::compile(
        spec,
        &QueryBuilder::default(),
        &OperatorTable::default(),
        PathAccessor::default(),
    )?;
    Ok(matcher.matches_document(doc))
}
