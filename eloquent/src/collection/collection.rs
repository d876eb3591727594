use crate::collection::{PadDirection, Page, Selector};
use crate::common::{is_blank, Context, SortOrder, Value};
use crate::config::EloquentConfig;
use crate::document::{Document, PathAccessor};
use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use crate::query::{canonical_name, IntoQuery, Matcher, QueryBuilder, QuerySpec};
use indexmap::IndexMap;
use itertools::Itertools;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

/// An ordered, eagerly available sequence of values with a fluent query surface.
///
/// Every derived collection (from `find`, `map`, `collect`, ...) inherits the
/// configuration, operator table and macros of the collection it came from.
/// Transformations return new collections; only the methods taking
/// `&mut self` (`push`, `unshift`, `pop`, `shift`, `splice`, `shuffle` and
/// the `sort*` family) change the receiver.
///
/// # Examples
///
/// ```rust
/// use eloquent::collection::Collection;
/// use eloquent::{doc, val};
///
/// let people = Collection::new(vec![
///     doc!{ name: "Ana", age: 17 },
///     doc!{ name: "Luis", age: 18 },
///     doc!{ name: "Eva", age: 25 },
/// ]);
///
/// let adults = people.find(doc!{ "$$age": { gte: 18 } }).unwrap();
/// assert_eq!(adults.count(), 2);
/// assert_eq!(adults.join("name", ", ", " and "), "Luis and Eva");
/// assert_eq!(people.sum("age"), val!(60));
/// ```
#[derive(Clone)]
pub struct Collection {
    items: Vec<Value>,
    context: Context<Collection>,
}

impl Collection {
    /// Creates a collection with the default configuration.
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Collection {
            items: items.into_iter().map(Into::into).collect(),
            context: Context::default(),
        }
    }

    /// Creates a collection on a custom configuration.
    pub fn with_config<I, T>(items: I, config: EloquentConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Collection {
            items: items.into_iter().map(Into::into).collect(),
            context: Context::new(config),
        }
    }

    pub(crate) fn with_context(items: Vec<Value>, context: Context<Collection>) -> Self {
        Collection { items, context }
    }

    /// Creates a sibling collection holding `items`, sharing this collection's
    /// configuration, operators and macros.
    pub fn collect<I, T>(&self, items: I) -> Collection
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Collection {
            items: items.into_iter().map(Into::into).collect(),
            context: self.context.clone(),
        }
    }

    pub fn context(&self) -> &Context<Collection> {
        &self.context
    }

    pub fn config(&self) -> &EloquentConfig {
        self.context.config()
    }

    fn accessor(&self) -> &PathAccessor {
        self.context.accessor()
    }

    // ---------------------------------------------------------------- extension

    /// Registers an operator on this collection and everything derived from it afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn add_operator<F>(mut self, name: &str, f: F) -> EloquentResult<Self>
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        let operators = self.context.operators().register(name, f)?;
        self.context = self.context.with_operators(operators);
        Ok(self)
    }

    /// Registers a macro on this collection and everything derived from it afterwards.
    ///
    /// ```rust
    /// use eloquent::collection::Collection;
    /// use eloquent::val;
    ///
    /// let numbers = Collection::new(vec![1, 2, 3])
    ///     .add_macro("double_sum", |c, _| Ok(val!(c.sum("").as_i64().unwrap_or(0) * 2)))
    ///     .unwrap();
    /// let derived = numbers.collect(vec![5]);
    /// assert_eq!(derived.call("double_sum", &[]).unwrap(), val!(10));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn add_macro<F>(mut self, name: &str, f: F) -> EloquentResult<Self>
    where
        F: Fn(&Collection, &[Value]) -> EloquentResult<Value> + Send + Sync + 'static,
    {
        let macros = self.context.macros().register(name, f)?;
        self.context = self.context.with_macros(macros);
        Ok(self)
    }

    /// Invokes a registered macro.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMacro` if `name` is not registered.
    pub fn call(&self, name: &str, args: &[Value]) -> EloquentResult<Value> {
        self.context.macros().invoke(self, name, args)
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.context.macros().contains(name)
    }

    // ------------------------------------------------------------------ access

    pub fn all(&self) -> &[Value] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    // ------------------------------------------------------------------- query

    /// Builds a matcher for `query` using this collection's configuration and operators.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for a malformed specification and
    /// `UnknownOperator` for an unregistered operator.
    pub fn matcher<Q: IntoQuery>(&self, query: Q) -> EloquentResult<Matcher> {
        let config = self.context.config();
        let spec = query.into_query(&config.operator_marker())?;
        Matcher::compile(
            &spec,
            &QueryBuilder::new(config),
            self.context.operators(),
            self.accessor().clone(),
        )
    }

    /// Keeps the items matching `query`, in their original order.
    ///
    /// # Errors
    ///
    /// See [Collection::matcher].
    pub fn find<Q: IntoQuery>(&self, query: Q) -> EloquentResult<Collection> {
        let matcher = self.matcher(query)?;
        Ok(self.find_by(|item| matcher.matches(item)))
    }

    /// Keeps the items for which `predicate` returns true.
    pub fn find_by<F>(&self, mut predicate: F) -> Collection
    where
        F: FnMut(&Value) -> bool,
    {
        self.collect(self.items.iter().filter(|item| predicate(item)).cloned())
    }

    /// Returns the first item matching `query`.
    pub fn find_one<Q: IntoQuery>(&self, query: Q) -> EloquentResult<Option<Value>> {
        let matcher = self.matcher(query)?;
        Ok(self.find_one_by(|item| matcher.matches(item)))
    }

    pub fn find_one_by<F>(&self, mut predicate: F) -> Option<Value>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().find(|item| predicate(item)).cloned()
    }

    /// Keeps the items that do not match `query`: the exact complement of
    /// [Collection::find].
    pub fn not<Q: IntoQuery>(&self, query: Q) -> EloquentResult<Collection> {
        let matcher = self.matcher(query)?;
        Ok(self.not_by(|item| matcher.matches(item)))
    }

    pub fn not_by<F>(&self, mut predicate: F) -> Collection
    where
        F: FnMut(&Value) -> bool,
    {
        self.collect(self.items.iter().filter(|item| !predicate(item)).cloned())
    }

    /// Shorthand for `where_op(field, "eq", value)`.
    pub fn where_eq<T: Into<Value>>(&self, field: &str, value: T) -> EloquentResult<Collection> {
        self.where_op(field, "eq", value)
    }

    /// Keeps the items whose `field` satisfies `operator` against `value`.
    /// Comparator aliases such as `>=` are accepted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `field` is empty and `UnknownOperator`
    /// if `operator` is not registered.
    pub fn where_op<T: Into<Value>>(
        &self,
        field: &str,
        operator: &str,
        value: T,
    ) -> EloquentResult<Collection> {
        if field.is_empty() {
            log::error!("Field name of a where clause cannot be empty");
            return Err(EloquentError::new(
                "Field name of a where clause cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        self.find(QuerySpec::new().op(field, canonical_name(operator), value))
    }

    // -------------------------------------------------------------- transforms

    /// Alias of [Collection::find_by].
    pub fn filter<F>(&self, predicate: F) -> Collection
    where
        F: FnMut(&Value) -> bool,
    {
        self.find_by(predicate)
    }

    /// Alias of [Collection::not_by].
    pub fn reject<F>(&self, predicate: F) -> Collection
    where
        F: FnMut(&Value) -> bool,
    {
        self.not_by(predicate)
    }

    /// Maps every item with its index.
    pub fn map<F, T>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, usize) -> T,
        T: Into<Value>,
    {
        self.collect(self.items.iter().enumerate().map(|(index, item)| f(item, index)))
    }

    /// Maps every item to the value at `path` (`null` when missing).
    pub fn pluck(&self, path: &str) -> Collection {
        let selector = Selector::path(path);
        self.collect(
            self.items
                .iter()
                .map(|item| selector.select(item, self.accessor())),
        )
    }

    pub fn reduce<T, F>(&self, mut f: F, seed: T) -> T
    where
        F: FnMut(T, &Value, usize) -> T,
    {
        self.items
            .iter()
            .enumerate()
            .fold(seed, |acc, (index, item)| f(acc, item, index))
    }

    /// Calls `f` on every item until it returns false.
    pub fn each<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&Value, usize) -> bool,
    {
        for (index, item) in self.items.iter().enumerate() {
            if !f(item, index) {
                break;
            }
        }
        self
    }

    pub fn every<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().all(|item| predicate(item))
    }

    pub fn some<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().any(|item| predicate(item))
    }

    /// Appends `items` to a copy of this collection.
    pub fn concat<I, T>(&self, items: I) -> Collection
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.collect(
            self.items
                .iter()
                .cloned()
                .chain(items.into_iter().map(Into::into)),
        )
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    pub fn first_where<F>(&self, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    pub fn last_where<F>(&self, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().rev().find(|item| predicate(item))
    }

    /// Position of the first item satisfying `predicate`.
    pub fn index_of<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().position(|item| predicate(item))
    }

    /// Splits the items into those satisfying `predicate` and the rest.
    pub fn partition<F>(&self, mut predicate: F) -> (Collection, Collection)
    where
        F: FnMut(&Value) -> bool,
    {
        let (pass, fail): (Vec<Value>, Vec<Value>) =
            self.items.iter().cloned().partition(|item| predicate(item));
        (self.collect(pass), self.collect(fail))
    }

    /// Items from `start` up to `end` (exclusive, default the end). Bounds are clamped.
    pub fn slice(&self, start: usize, end: Option<usize>) -> Collection {
        let len = self.items.len();
        let end = end.unwrap_or(len).min(len);
        let start = start.min(end);
        self.collect(self.items[start..end].iter().cloned())
    }

    /// Pads the collection to `size` items with `fill`. Nothing changes when
    /// the collection already has `size` items or more.
    pub fn pad<T: Into<Value>>(&self, size: usize, fill: T, direction: PadDirection) -> Collection {
        if size <= self.items.len() {
            return self.collect(self.items.iter().cloned());
        }

        let fill = fill.into();
        let padding = std::iter::repeat(fill).take(size - self.items.len());
        match direction {
            PadDirection::Left => self.collect(padding.chain(self.items.iter().cloned())),
            PadDirection::Right => self.collect(self.items.iter().cloned().chain(padding)),
        }
    }

    /// Drops blank items: `null`, empty arrays and documents, whitespace-only strings.
    pub fn compact(&self) -> Collection {
        self.not_by(is_blank)
    }

    /// Union of the top-level keys of every document item, in first-seen order.
    pub fn keys(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(Value::as_document)
            .flat_map(|doc| doc.keys().cloned())
            .unique()
            .collect()
    }

    /// Logs the items at debug level.
    pub fn dump(&self) -> &Self {
        log::debug!("{:?}", self);
        self
    }

    // ---------------------------------------------------------------- grouping

    /// Groups items by the plain-text rendering of the selected value.
    /// Items without the field are grouped under `"null"`.
    pub fn group_by<S: Into<Selector>>(&self, selector: S) -> IndexMap<String, Vec<Value>> {
        let selector = selector.into();
        let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
        for item in self.items.iter() {
            let key = selector.select(item, self.accessor()).to_plain_string();
            groups.entry(key).or_default().push(item.clone());
        }
        groups
    }

    /// Counts items per plain-text rendering of the selected value.
    pub fn count_by<S: Into<Selector>>(&self, selector: S) -> IndexMap<String, usize> {
        let selector = selector.into();
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for item in self.items.iter() {
            let key = selector.select(item, self.accessor()).to_plain_string();
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    // ----------------------------------------------------------------- sorting

    /// Sorts the items in place by their natural order.
    pub fn sort(&mut self) -> &mut Self {
        self.items.sort();
        self
    }

    /// Sorts the items in place by the value at `path`. The sort is stable.
    ///
    /// Items without the field come after every item that has it; the
    /// direction applies to the whole ordering, so a descending sort lists them first.
    pub fn sort_by_key(&mut self, path: &str, order: SortOrder) -> &mut Self {
        let accessor = self.context.accessor().clone();
        self.items.sort_by(|a, b| {
            let ordering = match (accessor.get_value(a, path), accessor.get_value(b, path)) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            order.apply(ordering)
        });
        self
    }

    /// Sorts the items in place with a comparator.
    pub fn sort_by<F>(&mut self, compare: F) -> &mut Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        self.items.sort_by(compare);
        self
    }

    // ------------------------------------------------------------------ unique

    /// Removes duplicate items, keeping the first occurrence.
    pub fn unique(&self) -> Collection {
        self.collect(self.items.iter().unique().cloned())
    }

    /// Removes items whose selected value was already seen.
    pub fn unique_by<S: Into<Selector>>(&self, selector: S) -> Collection {
        let selector = selector.into();
        let accessor = self.accessor();
        self.collect(
            self.items
                .iter()
                .unique_by(|item| selector.select(item, accessor))
                .cloned(),
        )
    }

    // -------------------------------------------------------------- pagination

    /// Breaks the items into arrays of `size` items. A size of zero is treated as one.
    pub fn chunk(&self, size: usize) -> Collection {
        let size = size.max(1);
        self.collect(
            self.items
                .chunks(size)
                .map(|chunk| Value::Array(chunk.to_vec())),
        )
    }

    /// Returns page `page` (1-based, clamped to at least 1) holding up to
    /// `per_page` items, or the configured page size when `None`.
    pub fn paginate(&self, page: usize, per_page: Option<usize>) -> Page {
        let page = page.max(1);
        let per_page = per_page.unwrap_or_else(|| self.config().per_page()).max(1);
        let start = (page - 1).saturating_mul(per_page);
        let remaining = self.items.len().saturating_sub(start);

        Page {
            items: self.items.iter().skip(start).take(per_page).cloned().collect(),
            prev: if page > 1 { Some(page - 1) } else { None },
            next: if remaining > per_page { Some(page + 1) } else { None },
            page,
            per_page,
        }
    }

    // ------------------------------------------------------------- aggregation

    /// Joins the selected values as plain text. The last two values are
    /// joined with `last_glue`, the others with `glue`.
    pub fn join<S: Into<Selector>>(&self, selector: S, glue: &str, last_glue: &str) -> String {
        let selector = selector.into();
        let mut parts: Vec<String> = self
            .items
            .iter()
            .map(|item| selector.select(item, self.accessor()).to_plain_string())
            .collect();

        match parts.pop() {
            None => String::new(),
            Some(last) if parts.is_empty() => last,
            Some(last) => format!("{}{}{}", parts.join(glue), last_glue, last),
        }
    }

    /// Sums the numeric selected values; other values are ignored.
    ///
    /// The result is an integer while every summed value is an integer and
    /// the total fits, a float otherwise.
    pub fn sum<S: Into<Selector>>(&self, selector: S) -> Value {
        let selector = selector.into();
        sum_values(self.items.iter().map(|item| selector.select(item, self.accessor())))
    }

    /// Greatest selected value, ignoring `null`.
    pub fn max<S: Into<Selector>>(&self, selector: S) -> Option<Value> {
        let selector = selector.into();
        self.items
            .iter()
            .map(|item| selector.select(item, self.accessor()))
            .filter(|value| !value.is_null())
            .max()
    }

    /// Smallest selected value, ignoring `null`.
    pub fn min<S: Into<Selector>>(&self, selector: S) -> Option<Value> {
        let selector = selector.into();
        self.items
            .iter()
            .map(|item| selector.select(item, self.accessor()))
            .filter(|value| !value.is_null())
            .min()
    }

    // -------------------------------------------------------------- projection

    /// Keeps only the given field paths of every document item. Other items
    /// pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a kept path cannot be written back.
    pub fn only(&self, keys: &[&str]) -> EloquentResult<Collection> {
        let accessor = self.accessor();
        let mut items = Vec::with_capacity(self.items.len());
        for item in self.items.iter() {
            match item {
                Value::Document(doc) => {
                    let mut projected = Document::new();
                    for key in keys {
                        if let Some(value) = accessor.get(doc, key) {
                            accessor.set(&mut projected, key, value.clone())?;
                        }
                    }
                    items.push(Value::Document(projected));
                }
                other => items.push(other.clone()),
            }
        }
        Ok(self.collect(items))
    }

    /// Removes the given field paths from every document item.
    pub fn forget(&self, keys: &[&str]) -> Collection {
        let accessor = self.accessor();
        self.collect(self.items.iter().map(|item| match item {
            Value::Document(doc) => {
                let mut doc = doc.clone();
                for key in keys {
                    accessor.unset(&mut doc, key);
                }
                Value::Document(doc)
            }
            other => other.clone(),
        }))
    }

    /// Alias of [Collection::forget].
    pub fn except(&self, keys: &[&str]) -> Collection {
        self.forget(keys)
    }

    // ------------------------------------------------------------ control flow

    /// Applies `f` when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Collection
    where
        F: FnOnce(Collection) -> Collection,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Applies `then` when `condition` holds, `otherwise` when it does not.
    pub fn when_else<F, G>(self, condition: bool, then: F, otherwise: G) -> Collection
    where
        F: FnOnce(Collection) -> Collection,
        G: FnOnce(Collection) -> Collection,
    {
        if condition {
            then(self)
        } else {
            otherwise(self)
        }
    }

    pub fn when_empty<F>(self, f: F) -> Collection
    where
        F: FnOnce(Collection) -> Collection,
    {
        let empty = self.is_empty();
        self.when(empty, f)
    }

    pub fn when_not_empty<F>(self, f: F) -> Collection
    where
        F: FnOnce(Collection) -> Collection,
    {
        let not_empty = self.is_not_empty();
        self.when(not_empty, f)
    }

    /// Passes the collection to `f` and returns its result.
    pub fn pipe<R, F>(self, f: F) -> R
    where
        F: FnOnce(Collection) -> R,
    {
        f(self)
    }

    // ---------------------------------------------------------------- mutating

    /// Appends an item in place.
    pub fn push<T: Into<Value>>(&mut self, item: T) -> &mut Self {
        self.items.push(item.into());
        self
    }

    /// Prepends an item in place.
    pub fn unshift<T: Into<Value>>(&mut self, item: T) -> &mut Self {
        self.items.insert(0, item.into());
        self
    }

    /// Removes and returns the last item.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    /// Removes and returns the first item.
    pub fn shift(&mut self) -> Option<Value> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Removes `delete_count` items from `start`, inserts `items` in their
    /// place, and returns the removed items. Bounds are clamped.
    pub fn splice<I, T>(&mut self, start: usize, delete_count: usize, items: I) -> Collection
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let start = start.min(self.items.len());
        let end = start.saturating_add(delete_count).min(self.items.len());
        let removed: Vec<Value> = self
            .items
            .splice(start..end, items.into_iter().map(Into::into))
            .collect();
        self.collect(removed)
    }

    /// Shuffles the items in place.
    pub fn shuffle(&mut self) -> &mut Self {
        let mut rng = rand::thread_rng();
        self.items.shuffle(&mut rng);
        self
    }

    /// Returns up to `count` items picked at random, without repetition.
    pub fn random(&self, count: usize) -> Collection {
        let mut rng = rand::thread_rng();
        self.collect(self.items.choose_multiple(&mut rng, count).cloned())
    }
}

pub(crate) fn sum_values<I>(values: I) -> Value
where
    I: Iterator<Item = Value>,
{
    let mut int_total: i128 = 0;
    let mut float_total: f64 = 0.0;
    let mut all_integers = true;

    for value in values {
        if let Some(int) = value.as_integer() {
            int_total = int_total.saturating_add(int);
            float_total += int as f64;
        } else if let Some(float) = value.as_f64() {
            all_integers = false;
            float_total += float;
        }
    }

    if all_integers {
        if let Ok(total) = i64::try_from(int_total) {
            return Value::I64(total);
        }
        if let Ok(total) = u64::try_from(int_total) {
            return Value::U64(total);
        }
    }
    Value::F64(float_total)
}

impl Debug for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("items", &self.items)
            .field("macros", &self.context.macros().names())
            .finish()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Default for Collection {
    fn default() -> Self {
        Collection::new(Vec::<Value>::new())
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Value::Array(collection.items)
    }
}

impl<T: Into<Value>> FromIterator<T> for Collection {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Collection::new(iter)
    }
}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
