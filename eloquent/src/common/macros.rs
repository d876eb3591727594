use crate::common::Value;
use crate::errors::{EloquentError, EloquentResult, ErrorKind};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A named extension function registered on a lineage of instances.
///
/// The function receives the instance it is invoked on and the call arguments.
pub type MacroFn<S> = Arc<dyn Fn(&S, &[Value]) -> EloquentResult<Value> + Send + Sync>;

/// Persistent registry of macros.
///
/// Registering a macro produces a new registry that shares structure with
/// the previous one, so instances derived before the registration keep the
/// old set while instances derived after it see the new entry.
pub struct MacroRegistry<S> {
    macros: im::HashMap<String, MacroFn<S>>,
}

impl<S> MacroRegistry<S> {
    pub fn new() -> Self {
        MacroRegistry {
            macros: im::HashMap::new(),
        }
    }

    /// Returns a registry containing `name` bound to `f`, replacing any
    /// previous macro of the same name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn register<F>(&self, name: &str, f: F) -> EloquentResult<MacroRegistry<S>>
    where
        F: Fn(&S, &[Value]) -> EloquentResult<Value> + Send + Sync + 'static,
    {
        if name.trim().is_empty() {
            log::error!("Macro name cannot be empty");
            return Err(EloquentError::new(
                "Macro name cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        Ok(MacroRegistry {
            macros: self.macros.update(name.to_string(), Arc::new(f)),
        })
    }

    pub fn get(&self, name: &str) -> Option<MacroFn<S>> {
        self.macros.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Names of all registered macros in ascending order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.macros.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Invokes the macro `name` against `target`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMacro` if nothing is registered under `name`, otherwise
    /// whatever the macro itself returns.
    pub fn invoke(&self, target: &S, name: &str, args: &[Value]) -> EloquentResult<Value> {
        match self.macros.get(name) {
            Some(f) => f(target, args),
            None => {
                log::error!("Macro {} is not registered", name);
                Err(EloquentError::new(
                    &format!("Macro `{}` is not registered", name),
                    ErrorKind::UnknownMacro,
                ))
            }
        }
    }
}

impl<S> Clone for MacroRegistry<S> {
    fn clone(&self) -> Self {
        MacroRegistry {
            macros: self.macros.clone(),
        }
    }
}

impl<S> Default for MacroRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Debug for MacroRegistry<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("macros", &self.names())
            .finish()
    }
}
