use crate::common::Value;
use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A binary predicate evaluated as `operator(operand, field_value)`.
pub type OperatorFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

pub const EQ: &str = "eq";
pub const NOT: &str = "not";
pub const GT: &str = "gt";
pub const GTE: &str = "gte";
pub const LT: &str = "lt";
pub const LTE: &str = "lte";
pub const IN: &str = "in";
pub const NOT_IN: &str = "notIn";
pub const CONTAINS: &str = "contains";
pub const NOT_CONTAINS: &str = "notContains";
pub const REGEXP: &str = "regexp";

/// Maps a comparator alias to its canonical operator name.
///
/// ```rust
/// use eloquent::query::canonical_name;
///
/// assert_eq!(canonical_name(">="), "gte");
/// assert_eq!(canonical_name("!="), "not");
/// assert_eq!(canonical_name("contains"), "contains");
/// ```
pub fn canonical_name(name: &str) -> &str {
    match name {
        "<" => LT,
        ">" => GT,
        "<=" => LTE,
        ">=" => GTE,
        "==" => EQ,
        "!=" => NOT,
        other => other,
    }
}

/// Named predicates used to evaluate compiled constraints.
///
/// The table is persistent: [OperatorTable::register] returns an extended
/// copy and leaves the receiver untouched.
///
/// ```rust
/// use eloquent::query::OperatorTable;
/// use eloquent::val;
///
/// let table = OperatorTable::new()
///     .register("between", |range, field| {
///         match range.as_array().map(|r| r.as_slice()) {
///             Some([low, high]) => field >= low && field <= high,
///             _ => false,
///         }
///     })
///     .unwrap();
///
/// assert!(table.evaluate("between", &val!(vec![1, 5]), &val!(3)).unwrap());
/// assert!(table.evaluate(">", &val!(1), &val!(3)).unwrap());
/// ```
#[derive(Clone)]
pub struct OperatorTable {
    operators: im::HashMap<String, OperatorFn>,
}

impl OperatorTable {
    /// Creates a table holding the built-in operators.
    pub fn new() -> Self {
        let mut operators: im::HashMap<String, OperatorFn> = im::HashMap::new();
        operators.insert(EQ.to_string(), Arc::new(eq));
        operators.insert(NOT.to_string(), Arc::new(not));
        operators.insert(GT.to_string(), Arc::new(gt));
        operators.insert(GTE.to_string(), Arc::new(gte));
        operators.insert(LT.to_string(), Arc::new(lt));
        operators.insert(LTE.to_string(), Arc::new(lte));
        operators.insert(IN.to_string(), Arc::new(is_in));
        operators.insert(NOT_IN.to_string(), Arc::new(not_in));
        operators.insert(CONTAINS.to_string(), Arc::new(contains));
        operators.insert(NOT_CONTAINS.to_string(), Arc::new(not_contains));
        operators.insert(REGEXP.to_string(), Arc::new(regexp));
        OperatorTable { operators }
    }

    /// Returns a table where `name` is bound to `f`. Registering a built-in
    /// name overrides it; aliases register under their canonical name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn register<F>(&self, name: &str, f: F) -> EloquentResult<OperatorTable>
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        if name.trim().is_empty() {
            log::error!("Operator name cannot be empty");
            return Err(EloquentError::new(
                "Operator name cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        Ok(OperatorTable {
            operators: self
                .operators
                .update(canonical_name(name).to_string(), Arc::new(f)),
        })
    }

    pub fn get(&self, name: &str) -> Option<OperatorFn> {
        self.operators.get(canonical_name(name)).cloned()
    }

    /// Looks an operator up, failing when it is not registered.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperator` naming the missing operator.
    pub fn resolve(&self, name: &str) -> EloquentResult<OperatorFn> {
        match self.get(name) {
            Some(f) => Ok(f),
            None => {
                log::error!("Operator {} is not registered", name);
                Err(EloquentError::new(
                    &format!("Operator `{}` is not registered", name),
                    ErrorKind::UnknownOperator,
                ))
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(canonical_name(name))
    }

    /// Names of all registered operators in ascending order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.operators.keys().cloned().collect();
        names.sort();
        names
    }

    /// Evaluates `name` against an operand and a field value.
    pub fn evaluate(&self, name: &str, operand: &Value, field: &Value) -> EloquentResult<bool> {
        let f = self.resolve(name)?;
        Ok(f(operand, field))
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for OperatorTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorTable")
            .field("operators", &self.names())
            .finish()
    }
}

// ordering is only defined between values of the same kind
fn compare(operand: &Value, field: &Value) -> Option<Ordering> {
    let comparable = (operand.is_number() && field.is_number())
        || (operand.is_string() && field.is_string())
        || (operand.is_bool() && field.is_bool());
    if comparable {
        Some(field.cmp(operand))
    } else {
        None
    }
}

fn eq(operand: &Value, field: &Value) -> bool {
    match operand {
        Value::Pattern(pattern) => pattern.is_match(&field.to_plain_string()),
        _ => field == operand,
    }
}

fn not(operand: &Value, field: &Value) -> bool {
    !eq(operand, field)
}

fn gt(operand: &Value, field: &Value) -> bool {
    compare(operand, field) == Some(Ordering::Greater)
}

fn gte(operand: &Value, field: &Value) -> bool {
    matches!(compare(operand, field), Some(Ordering::Greater | Ordering::Equal))
}

fn lt(operand: &Value, field: &Value) -> bool {
    compare(operand, field) == Some(Ordering::Less)
}

fn lte(operand: &Value, field: &Value) -> bool {
    matches!(compare(operand, field), Some(Ordering::Less | Ordering::Equal))
}

fn is_in(operand: &Value, field: &Value) -> bool {
    match operand {
        Value::Array(candidates) => candidates.contains(field),
        _ => false,
    }
}

fn not_in(operand: &Value, field: &Value) -> bool {
    !is_in(operand, field)
}

fn contains(operand: &Value, field: &Value) -> bool {
    match (field, operand) {
        (Value::Array(items), _) => items.contains(operand),
        (Value::String(text), Value::String(needle)) => text.contains(needle.as_str()),
        _ => false,
    }
}

fn not_contains(operand: &Value, field: &Value) -> bool {
    !contains(operand, field)
}

fn regexp(operand: &Value, field: &Value) -> bool {
    match operand {
        Value::Pattern(pattern) => pattern.is_match(&field.to_plain_string()),
        Value::String(needle) => field.to_plain_string().contains(needle.as_str()),
        _ => false,
    }
}
