use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, ReadExecutor};

/// Error kinds for eloquent operations.
///
/// Each kind names a category of failure so callers can branch on it without
/// parsing messages.
///
/// # Examples
///
/// ```rust
/// use eloquent::errors::{EloquentError, ErrorKind, EloquentResult};
///
/// fn example() -> EloquentResult<()> {
///     Err(EloquentError::new("operator `between` is not registered", ErrorKind::UnknownOperator))
/// }
/// assert!(example().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A compiled query references an operator missing from the operator table
    UnknownOperator,
    /// A macro was invoked by a name that was never registered
    UnknownMacro,
    /// An argument broke the contract of the called operation
    InvalidArgument,
    /// A query specification could not be parsed or compiled
    InvalidQuery,
    /// The configuration is invalid
    ConfigError,
    /// A deferred source failed before producing its items
    DeferredError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnknownOperator => write!(f, "Unknown operator"),
            ErrorKind::UnknownMacro => write!(f, "Unknown macro"),
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::InvalidQuery => write!(f, "Invalid query"),
            ErrorKind::ConfigError => write!(f, "Configuration error"),
            ErrorKind::DeferredError => write!(f, "Deferred error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type shared by every component of the crate.
///
/// `EloquentError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured at construction.
///
/// ```rust
/// use eloquent::errors::{EloquentError, ErrorKind};
///
/// let cause = EloquentError::new("regex parse error", ErrorKind::InvalidQuery);
/// let err = EloquentError::new_with_cause("invalid pattern for `name`", ErrorKind::InvalidQuery, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct EloquentError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<EloquentError>>,
    backtrace: Atomic<Backtrace>,
}

impl EloquentError {
    /// Creates a new `EloquentError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        EloquentError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `EloquentError` that records `cause` as its source.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: EloquentError) -> Self {
        EloquentError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&EloquentError> {
        self.cause.as_deref()
    }
}

impl Display for EloquentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for EloquentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // message with stack trace, or the cause chain when there is one
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => self.backtrace.read_with(|bt| write!(f, "{}\n{:?}", self.message, bt)),
        }
    }
}

impl Error for EloquentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for eloquent operations.
pub type EloquentResult<T> = Result<T, EloquentError>;

impl From<regex::Error> for EloquentError {
    fn from(err: regex::Error) -> Self {
        EloquentError::new(
            &format!("Invalid regular expression: {}", err),
            ErrorKind::InvalidQuery,
        )
    }
}

impl From<serde_json::Error> for EloquentError {
    fn from(err: serde_json::Error) -> Self {
        EloquentError::new(
            &format!("JSON conversion error: {}", err),
            ErrorKind::InvalidArgument,
        )
    }
}
