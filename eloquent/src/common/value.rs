use crate::common::Pattern;
use crate::document::Document;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Compare two floats for equality with proper NaN handling.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Compare two floats with proper NaN and total ordering.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    // NaN sorts after every other number
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

// bounds of the floats that convert to i128 without saturating
const I128_FLOAT_MIN: f64 = -170141183460469231731687303715884105728.0;
const I128_FLOAT_MAX: f64 = 170141183460469231731687303715884105728.0;

/// Returns the float as an exact integer when it is integral and in range.
#[inline]
fn float_as_integer(f: f64) -> Option<i128> {
    if f.is_finite() && f.fract() == 0.0 && (I128_FLOAT_MIN..I128_FLOAT_MAX).contains(&f) {
        Some(f as i128)
    } else {
        None
    }
}

/// Compares an integer with a float without rounding the integer.
fn num_cmp_integer_float(i: i128, f: f64) -> Ordering {
    if f.is_nan() {
        return Ordering::Less;
    }
    if let Some(int) = float_as_integer(f) {
        return i.cmp(&int);
    }
    if f.is_finite() && f.abs() < I128_FLOAT_MAX {
        // a fractional float lies strictly between floor and floor + 1
        let floor = f.floor() as i128;
        return if i <= floor { Ordering::Less } else { Ordering::Greater };
    }
    if f > 0.0 {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Total order over numeric values, exact across integer and float variants.
/// Returns `None` unless both values are numbers.
fn num_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.as_integer(), b.as_integer()) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => b.as_f64().map(|y| num_cmp_integer_float(x, y)),
        (None, Some(y)) => a.as_f64().map(|x| num_cmp_integer_float(y, x).reverse()),
        (None, None) => match (a, b) {
            (Value::F64(x), Value::F64(y)) => Some(num_cmp_float(*x, *y)),
            _ => None,
        },
    }
}

/// Represents a value held by a [Document] or a collection.
///
/// Scalars (`Null`, `Bool`, the numeric variants and `String`), arrays and
/// nested documents make up real data. [Value::Pattern] only carries meaning
/// inside a query specification, where it selects the `regexp` operator.
///
/// Numeric variants are interchangeable for comparison purposes: `I64(1)`,
/// `U64(1)` and `F64(1.0)` are equal and hash identically.
///
/// ```rust
/// use eloquent::common::Value;
/// use eloquent::val;
///
/// assert_eq!(val!(42), Value::I64(42));
/// assert_eq!(val!(42), val!(42.0));
/// assert!(val!("b") > val!("a"));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Array(Vec<Value>),
    Document(Document),
    /// A compiled regular expression used by query specifications.
    Pattern(Pattern),
}

impl Value {
    /// Creates a [Value] from anything convertible into one.
    pub fn from<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    /// Creates an array value from a vector of convertible items.
    pub fn from_vec<T: Into<Value>>(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(Into::into).collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            Value::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns the integer value of an integral numeric variant.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::I64(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Returns any numeric variant widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Pattern(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::U64(_) | Value::F64(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::I64(_) | Value::U64(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Value::Pattern(_))
    }

    /// Moves the value out, leaving [Value::Null] behind.
    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    /// Renders the value as plain text: strings without quotes, integral
    /// floats without a fractional part, arrays joined by commas.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F64(v) => format_float(*v),
            Value::String(v) => v.clone(),
            Value::Array(v) => v.iter().map(Value::to_plain_string).collect::<Vec<_>>().join(","),
            Value::Document(_) => self.to_json().to_string(),
            Value::Pattern(p) => format!("/{}/", p.as_str()),
        }
    }

    /// Converts the value into a `serde_json::Value`. Patterns become their source text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::U64(v) => serde_json::Value::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Array(v) => serde_json::Value::Array(v.iter().map(Value::to_json).collect()),
            Value::Document(doc) => doc.to_json(),
            Value::Pattern(p) => serde_json::Value::String(p.as_str().to_string()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I64(_) | Value::U64(_) | Value::F64(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Document(_) => 5,
            Value::Pattern(_) => 6,
        }
    }

    pub(crate) fn to_debug_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => format!("bool({})", v),
            Value::I64(v) => format!("i64({})", v),
            Value::U64(v) => format!("u64({})", v),
            Value::F64(v) => format!("f64({})", v),
            Value::String(v) => format!("string(\"{}\")", v),
            Value::Array(v) => format!(
                "array([{}])",
                v.iter().map(Value::to_debug_string).collect::<Vec<_>>().join(", ")
            ),
            Value::Document(doc) => format!("object({})", doc.to_debug_string()),
            Value::Pattern(p) => format!("pattern(/{}/)", p.as_str()),
        }
    }
}

fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let (Value::F64(a), Value::F64(b)) = (self, other) {
            return num_eq_float(*a, *b);
        }
        if let Some(ordering) = num_cmp(self, other) {
            return ordering == Ordering::Equal;
        }

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        if let Some(ordering) = num_cmp(self, other) {
            return ordering;
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Document(a), Value::Document(b)) => a.cmp(b),
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str().cmp(b.as_str()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::I64(_) | Value::U64(_) | Value::F64(_) => hash_number(self, state),
            Value::String(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
            Value::Document(v) => v.hash(state),
            Value::Pattern(v) => v.as_str().hash(state),
        }
    }
}

// integral floats hash like integers so that hashing agrees with equality
fn hash_number<H: Hasher>(value: &Value, state: &mut H) {
    if let Some(int) = value.as_integer() {
        int.hash(state);
        return;
    }
    if let Some(float) = value.as_f64() {
        if let Some(int) = float_as_integer(float) {
            int.hash(state);
        } else if float.is_nan() {
            f64::NAN.to_bits().hash(state);
        } else {
            float.to_bits().hash(state);
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Array(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for item in v {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Document(doc) => {
                let mut map = serializer.serialize_map(Some(doc.len()))?;
                for (key, value) in doc.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Pattern(p) => serializer.serialize_str(p.as_str()),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::I64(value as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::U64(value as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u64, usize);

impl From<u8> for Value {
    #[inline]
    fn from(value: u8) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u16> for Value {
    #[inline]
    fn from(value: u16) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Pattern> for Value {
    fn from(value: Pattern) -> Self {
        Value::Pattern(value)
    }
}

impl From<regex::Regex> for Value {
    fn from(value: regex::Regex) -> Self {
        Value::Pattern(Pattern::from(value))
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::I64(v)
                } else if let Some(v) = n.as_u64() {
                    Value::U64(v)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(v) => Value::Array(v.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                let mut doc = Document::new();
                for (key, value) in map {
                    doc.insert(key, Value::from(value));
                }
                Value::Document(doc)
            }
        }
    }
}

/// A macro to create a `Value` from a given expression.
///
/// ```rust
/// use eloquent::common::Value;
/// use eloquent::val;
///
/// assert_eq!(val!(42), Value::I64(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// assert_eq!(val!(true), Value::Bool(true));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
