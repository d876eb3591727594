use crate::common::{merge_deep, merge_shallow, Context, Value};
use crate::config::EloquentConfig;
use crate::document::{Document, FieldVec, PathAccessor};
use crate::errors::EloquentResult;
use crate::query::IntoQuery;
use serde::{Serialize, Serializer};
use std::fmt::{Debug, Formatter};

/// Wraps one [Document] with path access and document-shaped transforms.
///
/// `set`, `unset` and `pull` change the wrapped document in place. Every
/// other transform (`diff`, `merge`, `merge_deep`, `map`, `map_with_keys`,
/// `except`) returns a new model built with [Model::create], which keeps
/// the configuration, operators and macros of this one.
///
/// ```rust
/// use eloquent::model::Model;
/// use eloquent::{doc, val};
///
/// let mut model = Model::new(doc!{ a: { b: { c: 3 } } });
/// assert_eq!(model.get("a.b.c"), Some(&val!(3)));
/// assert_eq!(model.set("a.b.c", 4).unwrap().get("a.b.c"), Some(&val!(4)));
/// ```
#[derive(Clone)]
pub struct Model {
    document: Document,
    context: Context<Model>,
}

impl Model {
    pub fn new(document: Document) -> Self {
        Model {
            document,
            context: Context::default(),
        }
    }

    pub fn with_config(document: Document, config: EloquentConfig) -> Self {
        Model {
            document,
            context: Context::new(config),
        }
    }

    /// Builds a model from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> EloquentResult<Self> {
        Ok(Model::new(Document::from_json(json)?))
    }

    /// Creates a sibling model sharing this model's configuration, operators and macros.
    pub fn create(&self, document: Document) -> Model {
        Model {
            document,
            context: self.context.clone(),
        }
    }

    pub fn context(&self) -> &Context<Model> {
        &self.context
    }

    fn accessor(&self) -> &PathAccessor {
        self.context.accessor()
    }

    /// Registers a macro on this model and every model created from it afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn add_macro<F>(mut self, name: &str, f: F) -> EloquentResult<Self>
    where
        F: Fn(&Model, &[Value]) -> EloquentResult<Value> + Send + Sync + 'static,
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

    /// Registers an operator used by [Model::matches].
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

    // -------------------------------------------------------------- path access

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.accessor().get(&self.document, path)
    }

    pub fn get_or<T: Into<Value>>(&self, path: &str, default: T) -> Value {
        self.accessor().get_or(&self.document, path, default.into())
    }

    /// Writes `value` at `path`, creating intermediate documents as needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the path is empty or has an empty segment.
    pub fn set<T: Into<Value>>(&mut self, path: &str, value: T) -> EloquentResult<&mut Self> {
        let accessor = self.context.accessor().clone();
        accessor.set(&mut self.document, path, value)?;
        Ok(self)
    }

    pub fn has(&self, path: &str) -> bool {
        self.accessor().has(&self.document, path)
    }

    /// Removes the value at `path`. Returns whether something was removed.
    pub fn unset(&mut self, path: &str) -> bool {
        self.pull(path).is_some()
    }

    /// Removes the value at `path` and returns it.
    pub fn pull(&mut self, path: &str) -> Option<Value> {
        let accessor = self.context.accessor().clone();
        accessor.unset(&mut self.document, path)
    }

    /// Removes the value at `path` and returns it, or `default` when missing.
    pub fn pull_or<T: Into<Value>>(&mut self, path: &str, default: T) -> Value {
        self.pull(path).unwrap_or_else(|| default.into())
    }

    // -------------------------------------------------------------- inspection

    pub fn keys(&self) -> Vec<String> {
        self.document.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.document.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.document.is_empty()
    }

    /// Lists every leaf path of the document.
    pub fn paths(&self) -> FieldVec {
        self.accessor().paths(&self.document)
    }

    /// Tests the document against a query specification.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for a malformed specification and
    /// `UnknownOperator` for an unregistered operator.
    pub fn matches<Q: IntoQuery>(&self, query: Q) -> EloquentResult<bool> {
        let config = self.context.config();
        let spec = query.into_query(&config.operator_marker())?;
        let matcher = crate::query::Matcher::compile(
            &spec,
            &crate::query::QueryBuilder::new(config),
            self.context.operators(),
            self.accessor().clone(),
        )?;
        Ok(matcher.matches_document(&self.document))
    }

    // -------------------------------------------------------------- transforms

    /// Returns the entries of `other` that are missing from, or different
    /// in, this model. Nested documents are compared key by key and only
    /// their differing part is kept.
    ///
    /// ```rust
    /// use eloquent::model::Model;
    /// use eloquent::doc;
    ///
    /// let model = Model::new(doc!{ a: 1, b: { c: 2, d: 3 } });
    /// let diff = model.diff(&doc!{ a: 1, b: { c: 2, d: 4 }, e: 5 });
    /// assert_eq!(diff.to_document(), doc!{ b: { d: 4 }, e: 5 });
    /// ```
    pub fn diff(&self, other: &Document) -> Model {
        self.create(diff_documents(&self.document, other))
    }

    /// Merges the first level of every document, later ones winning.
    pub fn merge(&self, documents: &[Document]) -> Model {
        let mut merged = self.document.clone();
        for doc in documents {
            merge_shallow(&mut merged, doc);
        }
        self.create(merged)
    }

    /// Merges every document recursively, later ones winning.
    pub fn merge_deep(&self, documents: &[Document]) -> Model {
        let mut merged = self.document.clone();
        for doc in documents {
            merge_deep(&mut merged, doc);
        }
        self.create(merged)
    }

    /// Maps every top-level value, keeping its key.
    pub fn map<F, T>(&self, mut f: F) -> Model
    where
        F: FnMut(&Value, &str) -> T,
        T: Into<Value>,
    {
        self.create(
            self.document
                .iter()
                .map(|(key, value)| (key.clone(), f(value, key)))
                .collect(),
        )
    }

    /// Maps every top-level entry. Returning `Some(key)` renames the entry.
    ///
    /// ```rust
    /// use eloquent::model::Model;
    /// use eloquent::{doc, val};
    ///
    /// let model = Model::new(doc!{ first: "Ada", age: 36 });
    /// let renamed = model.map_with_keys(|value, key| {
    ///     if key == "first" { (value.clone(), Some("name".to_string())) } else { (value.clone(), None) }
    /// });
    /// assert_eq!(renamed.to_document(), doc!{ name: "Ada", age: 36 });
    /// ```
    pub fn map_with_keys<F, T>(&self, mut f: F) -> Model
    where
        F: FnMut(&Value, &str) -> (T, Option<String>),
        T: Into<Value>,
    {
        let mut mapped = Document::with_capacity(self.document.len());
        for (key, value) in self.document.iter() {
            let (value, new_key) = f(value, key);
            mapped.insert(new_key.unwrap_or_else(|| key.clone()), value);
        }
        self.create(mapped)
    }

    /// Drops the given field paths.
    pub fn except(&self, keys: &[&str]) -> Model {
        let mut doc = self.document.clone();
        for key in keys {
            self.accessor().unset(&mut doc, key);
        }
        self.create(doc)
    }

    /// Drops the top-level entries for which `predicate` returns true.
    pub fn except_by<F>(&self, mut predicate: F) -> Model
    where
        F: FnMut(&Value, &str) -> bool,
    {
        let mut doc = self.document.clone();
        doc.retain(|key, value| !predicate(value, key));
        self.create(doc)
    }

    /// Visits every leaf depth first with its path, its value and the
    /// document holding it.
    ///
    /// With `max_depth`, nested documents deeper than that many levels are
    /// reported as leaves instead of being walked; `Some(0)` reports only
    /// top-level entries.
    pub fn each_path<F>(&self, mut f: F, max_depth: Option<usize>) -> &Self
    where
        F: FnMut(&str, &Value, &Document),
    {
        self.walk(&self.document, "", 0, max_depth, &mut f);
        self
    }

    fn walk<F>(&self, doc: &Document, prefix: &str, depth: usize, max_depth: Option<usize>, f: &mut F)
    where
        F: FnMut(&str, &Value, &Document),
    {
        for (key, value) in doc.iter() {
            let path = self.accessor().join(prefix, key);
            let descend = max_depth.map_or(true, |max| depth < max);
            match value {
                Value::Document(inner) if descend => self.walk(inner, &path, depth + 1, max_depth, f),
                _ => f(&path, value, doc),
            }
        }
    }

    /// Folds the top-level entries.
    pub fn reduce<T, F>(&self, mut f: F, seed: T) -> T
    where
        F: FnMut(T, &str, &Value) -> T,
    {
        self.document
            .iter()
            .fold(seed, |acc, (key, value)| f(acc, key, value))
    }

    // ------------------------------------------------------------ control flow

    pub fn pipe<R, F>(self, f: F) -> R
    where
        F: FnOnce(Model) -> R,
    {
        f(self)
    }

    pub fn when<F>(self, condition: bool, f: F) -> Model
    where
        F: FnOnce(Model) -> Model,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn when_else<F, G>(self, condition: bool, then: F, otherwise: G) -> Model
    where
        F: FnOnce(Model) -> Model,
        G: FnOnce(Model) -> Model,
    {
        if condition {
            then(self)
        } else {
            otherwise(self)
        }
    }

    pub fn when_empty<F>(self, f: F) -> Model
    where
        F: FnOnce(Model) -> Model,
    {
        let empty = self.is_empty();
        self.when(empty, f)
    }

    pub fn when_not_empty<F>(self, f: F) -> Model
    where
        F: FnOnce(Model) -> Model,
    {
        let not_empty = self.is_not_empty();
        self.when(not_empty, f)
    }

    // ------------------------------------------------------------------ output

    pub fn as_document(&self) -> &Document {
        &self.document
    }

    pub fn to_document(&self) -> Document {
        self.document.clone()
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.document.to_json()
    }

    /// Logs the document at debug level.
    pub fn dump(&self) -> &Self {
        log::debug!("{:?}", self);
        self
    }
}

fn diff_documents(current: &Document, other: &Document) -> Document {
    let mut diff = Document::new();
    for (key, value) in other.iter() {
        match (current.get(key), value) {
            (None, _) => {
                diff.insert(key.clone(), value.clone());
            }
            (Some(Value::Document(mine)), Value::Document(theirs)) => {
                let nested = diff_documents(mine, theirs);
                if !nested.is_empty() {
                    diff.insert(key.clone(), nested);
                }
            }
            (Some(mine), theirs) if mine != theirs => {
                diff.insert(key.clone(), theirs.clone());
            }
            _ => {}
        }
    }
    diff
}

impl Debug for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("document", &self.document)
            .field("macros", &self.context.macros().names())
            .finish()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::new(Document::new())
    }
}

impl From<Document> for Model {
    fn from(document: Document) -> Self {
        Model::new(document)
    }
}

impl From<Model> for Value {
    fn from(model: Model) -> Self {
        Value::Document(model.document)
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}
