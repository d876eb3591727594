use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use regex::Regex;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

/// A compiled regular expression that can live inside a [Value](crate::common::Value).
///
/// Two patterns are equal when their source text is equal.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` into a pattern.
    pub fn new(source: &str) -> EloquentResult<Pattern> {
        match Regex::new(source) {
            Ok(regex) => Ok(Pattern { regex }),
            Err(err) => {
                log::error!("Failed to compile pattern {}: {}", source, err);
                Err(EloquentError::new_with_cause(
                    &format!("Invalid pattern /{}/", source),
                    ErrorKind::InvalidQuery,
                    err.into(),
                ))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl Deref for Pattern {
    type Target = Regex;

    fn deref(&self) -> &Self::Target {
        &self.regex
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern { regex }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Debug for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pattern(/{}/)", self.as_str())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}
