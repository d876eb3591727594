//! Configuration shared by every instance of a lineage.

use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub(crate) const DEFAULT_FIELD_SEPARATOR: &str = ".";
pub(crate) const DEFAULT_OPERATOR_MARKER: &str = "$$";
pub(crate) const DEFAULT_PER_PAGE: usize = 20;

/// Immutable configuration for collections, models and deferred collections.
///
/// Cloning is cheap: every clone points to the same settings.
///
/// # Examples
///
/// ```rust
/// use eloquent::config::EloquentConfig;
///
/// let config = EloquentConfig::builder()
///     .field_separator("/")
///     .per_page(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.field_separator(), "/");
/// assert_eq!(config.operator_marker(), "$$");
/// assert_eq!(config.per_page(), 50);
/// ```
#[derive(Clone)]
pub struct EloquentConfig {
    inner: Arc<EloquentConfigInner>,
}

impl EloquentConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        EloquentConfig {
            inner: Arc::new(EloquentConfigInner {
                field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
                operator_marker: DEFAULT_OPERATOR_MARKER.to_string(),
                per_page: DEFAULT_PER_PAGE,
            }),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Separator between the segments of a field path.
    pub fn field_separator(&self) -> String {
        self.inner.field_separator.clone()
    }

    /// Prefix that marks a key of a query specification as operator form.
    pub fn operator_marker(&self) -> String {
        self.inner.operator_marker.clone()
    }

    /// Page size used by `paginate` when none is given.
    pub fn per_page(&self) -> usize {
        self.inner.per_page
    }
}

impl Default for EloquentConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for EloquentConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EloquentConfig")
            .field("field_separator", &self.inner.field_separator)
            .field("operator_marker", &self.inner.operator_marker)
            .field("per_page", &self.inner.per_page)
            .finish()
    }
}

impl PartialEq for EloquentConfig {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

#[derive(PartialEq)]
struct EloquentConfigInner {
    field_separator: String,
    operator_marker: String,
    per_page: usize,
}

/// Builder for [EloquentConfig].
///
/// Settings are validated once, in [ConfigBuilder::build].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    field_separator: String,
    operator_marker: String,
    per_page: usize,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
            operator_marker: DEFAULT_OPERATOR_MARKER.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ConfigBuilder {
    /// Sets the field path separator. Default is `.`.
    pub fn field_separator(mut self, separator: &str) -> Self {
        self.field_separator = separator.to_string();
        self
    }

    /// Sets the operator-form marker. Default is `$$`.
    pub fn operator_marker(mut self, marker: &str) -> Self {
        self.operator_marker = marker.to_string();
        self
    }

    /// Sets the default page size. Default is 20.
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Validates the settings and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the separator or the marker is empty, if the
    /// separator and the marker are the same, or if the page size is zero.
    pub fn build(self) -> EloquentResult<EloquentConfig> {
        if self.field_separator.is_empty() {
            log::error!("Field separator cannot be empty");
            return Err(EloquentError::new(
                "Field separator cannot be empty",
                ErrorKind::ConfigError,
            ));
        }

        if self.operator_marker.is_empty() {
            log::error!("Operator marker cannot be empty");
            return Err(EloquentError::new(
                "Operator marker cannot be empty",
                ErrorKind::ConfigError,
            ));
        }

        if self.field_separator == self.operator_marker {
            log::error!(
                "Field separator and operator marker must differ, both are {}",
                self.field_separator
            );
            return Err(EloquentError::new(
                "Field separator and operator marker must differ",
                ErrorKind::ConfigError,
            ));
        }

        if self.per_page == 0 {
            log::error!("Page size must be at least 1");
            return Err(EloquentError::new(
                "Page size must be at least 1",
                ErrorKind::ConfigError,
            ));
        }

        Ok(EloquentConfig {
            inner: Arc::new(EloquentConfigInner {
                field_separator: self.field_separator,
                operator_marker: self.operator_marker,
                per_page: self.per_page,
            }),
        })
    }
}
