use crate::collection::{Collection, PadDirection, Page, Selector};
use crate::common::{Context, SortOrder, Value};
use crate::config::EloquentConfig;
use crate::errors::EloquentResult;
use crate::query::IntoQuery;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::future::{Future, IntoFuture};
use std::pin::Pin;

/// A pending result of a deferred collection.
pub type Deferred<T> = Pin<Box<dyn Future<Output = EloquentResult<T>> + Send + 'static>>;

/// A collection whose items become available asynchronously.
///
/// `Eloquent` exposes the [Collection] surface, but every method waits for
/// the pending items first. Chainable methods consume the instance and return
/// a new `Eloquent`; methods producing a final value return a [Deferred].
/// Stages run one after the other, each on the completed output of the previous one.
///
/// A failing source or stage fails the whole chain with that same error.
///
/// ```rust
/// use eloquent::eloquent::Eloquent;
/// use eloquent::{doc, val};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let source = async { Ok(vec![val!(doc!{ n: 1 }), val!(doc!{ n: 2 }), val!(doc!{ n: 3 })]) };
/// let total = Eloquent::from_future(source)
///     .where_op("n", ">", 1)
///     .sum("n")
///     .await
///     .unwrap();
/// assert_eq!(total, val!(5));
/// # });
/// ```
pub struct Eloquent {
    source: Deferred<Vec<Value>>,
    context: Context<Collection>,
}

impl Eloquent {
    /// Creates a deferred collection over items that are already available.
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Eloquent::with_context(items, Context::default())
    }

    /// Like [Eloquent::new], on a custom configuration.
    pub fn with_config<I, T>(items: I, config: EloquentConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Eloquent::with_context(items, Context::new(config))
    }

    /// Creates a deferred collection over the items `future` resolves to.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = EloquentResult<Vec<Value>>> + Send + 'static,
    {
        Eloquent {
            source: Box::pin(future),
            context: Context::default(),
        }
    }

    /// Calls `thunk` once, right away, and defers its result.
    pub fn from_fn<F>(thunk: F) -> Self
    where
        F: FnOnce() -> EloquentResult<Vec<Value>>,
    {
        let result = thunk();
        Eloquent {
            source: Box::pin(async move { result }),
            context: Context::default(),
        }
    }

    /// Calls `thunk` once, right away, and defers the future it returns.
    pub fn from_async_fn<F, Fut>(thunk: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EloquentResult<Vec<Value>>> + Send + 'static,
    {
        Eloquent::from_future(thunk())
    }

    fn with_context<I, T>(items: I, context: Context<Collection>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        Eloquent {
            source: Box::pin(async move { Ok(items) }),
            context,
        }
    }

    /// Creates a sibling holding `items`, sharing this instance's
    /// configuration, operators and macros.
    pub fn collect<I, T>(&self, items: I) -> Eloquent
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Eloquent::with_context(items, self.context.clone())
    }

    /// Creates a sibling over the items `future` resolves to, sharing this
    /// instance's configuration, operators and macros.
    pub fn collect_future<F>(&self, future: F) -> Eloquent
    where
        F: Future<Output = EloquentResult<Vec<Value>>> + Send + 'static,
    {
        Eloquent {
            source: Box::pin(future),
            context: self.context.clone(),
        }
    }

    pub fn context(&self) -> &Context<Collection> {
        &self.context
    }

    // chains a stage that produces the next sequence
    fn then<F>(self, stage: &'static str, f: F) -> Eloquent
    where
        F: FnOnce(Collection) -> EloquentResult<Vec<Value>> + Send + 'static,
    {
        let Eloquent { source, context } = self;
        let stage_context = context.clone();
        let future = async move {
            let items = source.await?;
            log::trace!("Running stage {} over {} items", stage, items.len());
            f(Collection::with_context(items, stage_context))
        };
        Eloquent {
            source: Box::pin(future),
            context,
        }
    }

    // ends the chain with a final value
    fn resolve<T, F>(self, stage: &'static str, f: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(Collection) -> EloquentResult<T> + Send + 'static,
    {
        let Eloquent { source, context } = self;
        Box::pin(async move {
            let items = source.await?;
            log::trace!("Resolving {} over {} items", stage, items.len());
            f(Collection::with_context(items, context))
        })
    }

    // ---------------------------------------------------------------- extension

    /// See [Collection::add_operator].
    pub fn add_operator<F>(mut self, name: &str, f: F) -> EloquentResult<Self>
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        let operators = self.context.operators().register(name, f)?;
        self.context = self.context.with_operators(operators);
        Ok(self)
    }

    /// Registers a macro. Macros run on the resolved [Collection], so the
    /// same macro serves both the eager and the deferred surface.
    pub fn add_macro<F>(mut self, name: &str, f: F) -> EloquentResult<Self>
    where
        F: Fn(&Collection, &[Value]) -> EloquentResult<Value> + Send + Sync + 'static,
    {
        let macros = self.context.macros().register(name, f)?;
        self.context = self.context.with_macros(macros);
        Ok(self)
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.context.macros().contains(name)
    }

    /// Invokes a registered macro on the resolved collection.
    pub fn call(self, name: &str, args: Vec<Value>) -> Deferred<Value> {
        let name = name.to_string();
        self.resolve("call", move |c| c.call(&name, &args))
    }

    // ----------------------------------------------------------------- results

    pub fn all(self) -> Deferred<Vec<Value>> {
        self.resolve("all", |c| Ok(c.into_vec()))
    }

    /// Resolves into an eager [Collection] of the same lineage.
    pub fn collection(self) -> Deferred<Collection> {
        self.resolve("collection", Ok)
    }

    pub fn count(self) -> Deferred<usize> {
        self.resolve("count", |c| Ok(c.count()))
    }

    pub fn is_empty(self) -> Deferred<bool> {
        self.resolve("is_empty", |c| Ok(c.is_empty()))
    }

    pub fn is_not_empty(self) -> Deferred<bool> {
        self.resolve("is_not_empty", |c| Ok(c.is_not_empty()))
    }

    pub fn first(self) -> Deferred<Option<Value>> {
        self.resolve("first", |c| Ok(c.first().cloned()))
    }

    pub fn first_where<F>(self, predicate: F) -> Deferred<Option<Value>>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("first_where", |c| Ok(c.first_where(predicate).cloned()))
    }

    pub fn last(self) -> Deferred<Option<Value>> {
        self.resolve("last", |c| Ok(c.last().cloned()))
    }

    pub fn last_where<F>(self, predicate: F) -> Deferred<Option<Value>>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("last_where", |c| Ok(c.last_where(predicate).cloned()))
    }

    pub fn index_of<F>(self, predicate: F) -> Deferred<Option<usize>>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("index_of", |c| Ok(c.index_of(predicate)))
    }

    pub fn every<F>(self, predicate: F) -> Deferred<bool>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("every", |c| Ok(c.every(predicate)))
    }

    pub fn some<F>(self, predicate: F) -> Deferred<bool>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("some", |c| Ok(c.some(predicate)))
    }

    pub fn reduce<T, F>(self, f: F, seed: T) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnMut(T, &Value, usize) -> T + Send + 'static,
    {
        self.resolve("reduce", move |c| Ok(c.reduce(f, seed)))
    }

    pub fn find_one<Q: IntoQuery>(self, query: Q) -> Deferred<Option<Value>> {
        let spec = query.into_query(&self.context.config().operator_marker());
        self.resolve("find_one", move |c| c.find_one(spec?))
    }

    pub fn find_one_by<F>(self, predicate: F) -> Deferred<Option<Value>>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("find_one_by", |c| Ok(c.find_one_by(predicate)))
    }

    pub fn partition<F>(self, predicate: F) -> Deferred<(Collection, Collection)>
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.resolve("partition", |c| Ok(c.partition(predicate)))
    }

    pub fn group_by<S: Into<Selector>>(self, selector: S) -> Deferred<IndexMap<String, Vec<Value>>> {
        let selector = selector.into();
        self.resolve("group_by", move |c| Ok(c.group_by(selector)))
    }

    pub fn count_by<S: Into<Selector>>(self, selector: S) -> Deferred<IndexMap<String, usize>> {
        let selector = selector.into();
        self.resolve("count_by", move |c| Ok(c.count_by(selector)))
    }

    pub fn paginate(self, page: usize, per_page: Option<usize>) -> Deferred<Page> {
        self.resolve("paginate", move |c| Ok(c.paginate(page, per_page)))
    }

    pub fn join<S: Into<Selector>>(self, selector: S, glue: &str, last_glue: &str) -> Deferred<String> {
        let selector = selector.into();
        let glue = glue.to_string();
        let last_glue = last_glue.to_string();
        self.resolve("join", move |c| Ok(c.join(selector, &glue, &last_glue)))
    }

    pub fn sum<S: Into<Selector>>(self, selector: S) -> Deferred<Value> {
        let selector = selector.into();
        self.resolve("sum", move |c| Ok(c.sum(selector)))
    }

    pub fn max<S: Into<Selector>>(self, selector: S) -> Deferred<Option<Value>> {
        let selector = selector.into();
        self.resolve("max", move |c| Ok(c.max(selector)))
    }

    pub fn min<S: Into<Selector>>(self, selector: S) -> Deferred<Option<Value>> {
        let selector = selector.into();
        self.resolve("min", move |c| Ok(c.min(selector)))
    }

    pub fn keys(self) -> Deferred<Vec<String>> {
        self.resolve("keys", |c| Ok(c.keys()))
    }

    /// Passes the resolved collection to `f`.
    pub fn pipe<R, F>(self, f: F) -> Deferred<R>
    where
        R: Send + 'static,
        F: FnOnce(Collection) -> R + Send + 'static,
    {
        self.resolve("pipe", |c| Ok(f(c)))
    }

    /// Removes and returns the last item of the resolved sequence.
    pub fn pop(self) -> Deferred<Option<Value>> {
        self.resolve("pop", |mut c| Ok(c.pop()))
    }

    /// Removes and returns the first item of the resolved sequence.
    pub fn shift(self) -> Deferred<Option<Value>> {
        self.resolve("shift", |mut c| Ok(c.shift()))
    }

    /// Splices the resolved sequence and returns the removed items.
    pub fn splice(self, start: usize, delete_count: usize, items: Vec<Value>) -> Deferred<Collection> {
        self.resolve("splice", move |mut c| Ok(c.splice(start, delete_count, items)))
    }

    // ------------------------------------------------------------------ stages

    pub fn find<Q: IntoQuery>(self, query: Q) -> Eloquent {
        let spec = query.into_query(&self.context.config().operator_marker());
        self.then("find", move |c| Ok(c.find(spec?)?.into_vec()))
    }

    pub fn find_by<F>(self, predicate: F) -> Eloquent
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.then("find_by", |c| Ok(c.find_by(predicate).into_vec()))
    }

    pub fn not<Q: IntoQuery>(self, query: Q) -> Eloquent {
        let spec = query.into_query(&self.context.config().operator_marker());
        self.then("not", move |c| Ok(c.not(spec?)?.into_vec()))
    }

    pub fn not_by<F>(self, predicate: F) -> Eloquent
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.then("not_by", |c| Ok(c.not_by(predicate).into_vec()))
    }

    pub fn where_eq<T: Into<Value>>(self, field: &str, value: T) -> Eloquent {
        self.where_op(field, "eq", value)
    }

    pub fn where_op<T: Into<Value>>(self, field: &str, operator: &str, value: T) -> Eloquent {
        let field = field.to_string();
        let operator = operator.to_string();
        let value = value.into();
        self.then("where", move |c| Ok(c.where_op(&field, &operator, value)?.into_vec()))
    }

    pub fn filter<F>(self, predicate: F) -> Eloquent
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.then("filter", |c| Ok(c.filter(predicate).into_vec()))
    }

    pub fn reject<F>(self, predicate: F) -> Eloquent
    where
        F: FnMut(&Value) -> bool + Send + 'static,
    {
        self.then("reject", |c| Ok(c.reject(predicate).into_vec()))
    }

    pub fn map<F, T>(self, f: F) -> Eloquent
    where
        F: FnMut(&Value, usize) -> T + Send + 'static,
        T: Into<Value>,
    {
        self.then("map", |c| Ok(c.map(f).into_vec()))
    }

    pub fn pluck(self, path: &str) -> Eloquent {
        let path = path.to_string();
        self.then("pluck", move |c| Ok(c.pluck(&path).into_vec()))
    }

    /// Calls `f` on the resolved items until it returns false, passing them on unchanged.
    pub fn each<F>(self, f: F) -> Eloquent
    where
        F: FnMut(&Value, usize) -> bool + Send + 'static,
    {
        self.then("each", |c| {
            c.each(f);
            Ok(c.into_vec())
        })
    }

    pub fn concat<I, T>(self, items: I) -> Eloquent
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        self.then("concat", |c| Ok(c.concat(items).into_vec()))
    }

    pub fn slice(self, start: usize, end: Option<usize>) -> Eloquent {
        self.then("slice", move |c| Ok(c.slice(start, end).into_vec()))
    }

    pub fn pad<T: Into<Value>>(self, size: usize, fill: T, direction: PadDirection) -> Eloquent {
        let fill = fill.into();
        self.then("pad", move |c| Ok(c.pad(size, fill, direction).into_vec()))
    }

    pub fn compact(self) -> Eloquent {
        self.then("compact", |c| Ok(c.compact().into_vec()))
    }

    pub fn only(self, keys: &[&str]) -> Eloquent {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.then("only", move |c| {
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            Ok(c.only(&keys)?.into_vec())
        })
    }

    pub fn forget(self, keys: &[&str]) -> Eloquent {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.then("forget", move |c| {
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            Ok(c.forget(&keys).into_vec())
        })
    }

    pub fn except(self, keys: &[&str]) -> Eloquent {
        self.forget(keys)
    }

    pub fn sort(self) -> Eloquent {
        self.then("sort", |mut c| {
            c.sort();
            Ok(c.into_vec())
        })
    }

    pub fn sort_by_key(self, path: &str, order: SortOrder) -> Eloquent {
        let path = path.to_string();
        self.then("sort_by_key", move |mut c| {
            c.sort_by_key(&path, order);
            Ok(c.into_vec())
        })
    }

    pub fn sort_by<F>(self, compare: F) -> Eloquent
    where
        F: FnMut(&Value, &Value) -> Ordering + Send + 'static,
    {
        self.then("sort_by", |mut c| {
            c.sort_by(compare);
            Ok(c.into_vec())
        })
    }

    pub fn unique(self) -> Eloquent {
        self.then("unique", |c| Ok(c.unique().into_vec()))
    }

    pub fn unique_by<S: Into<Selector>>(self, selector: S) -> Eloquent {
        let selector = selector.into();
        self.then("unique_by", move |c| Ok(c.unique_by(selector).into_vec()))
    }

    pub fn chunk(self, size: usize) -> Eloquent {
        self.then("chunk", move |c| Ok(c.chunk(size).into_vec()))
    }

    pub fn shuffle(self) -> Eloquent {
        self.then("shuffle", |mut c| {
            c.shuffle();
            Ok(c.into_vec())
        })
    }

    pub fn random(self, count: usize) -> Eloquent {
        self.then("random", move |c| Ok(c.random(count).into_vec()))
    }

    pub fn push<T: Into<Value>>(self, item: T) -> Eloquent {
        let item = item.into();
        self.then("push", move |mut c| {
            c.push(item);
            Ok(c.into_vec())
        })
    }

    pub fn unshift<T: Into<Value>>(self, item: T) -> Eloquent {
        let item = item.into();
        self.then("unshift", move |mut c| {
            c.unshift(item);
            Ok(c.into_vec())
        })
    }

    pub fn when<F>(self, condition: bool, f: F) -> Eloquent
    where
        F: FnOnce(Collection) -> Collection + Send + 'static,
    {
        self.then("when", move |c| Ok(c.when(condition, f).into_vec()))
    }

    pub fn when_else<F, G>(self, condition: bool, then: F, otherwise: G) -> Eloquent
    where
        F: FnOnce(Collection) -> Collection + Send + 'static,
        G: FnOnce(Collection) -> Collection + Send + 'static,
    {
        self.then("when_else", move |c| Ok(c.when_else(condition, then, otherwise).into_vec()))
    }

    pub fn when_empty<F>(self, f: F) -> Eloquent
    where
        F: FnOnce(Collection) -> Collection + Send + 'static,
    {
        self.then("when_empty", |c| Ok(c.when_empty(f).into_vec()))
    }

    pub fn when_not_empty<F>(self, f: F) -> Eloquent
    where
        F: FnOnce(Collection) -> Collection + Send + 'static,
    {
        self.then("when_not_empty", |c| Ok(c.when_not_empty(f).into_vec()))
    }

    /// Logs the resolved items at debug level.
    pub fn dump(self) -> Eloquent {
        self.then("dump", |c| {
            c.dump();
            Ok(c.into_vec())
        })
    }
}

impl IntoFuture for Eloquent {
    type Output = EloquentResult<Vec<Value>>;
    type IntoFuture = Deferred<Vec<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        self.source
    }
}

impl From<Collection> for Eloquent {
    fn from(collection: Collection) -> Self {
        let context = collection.context().clone();
        Eloquent::with_context(collection.into_vec(), context)
    }
}

impl Debug for Eloquent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eloquent")
            .field("macros", &self.context.macros().names())
            .finish_non_exhaustive()
    }
}
