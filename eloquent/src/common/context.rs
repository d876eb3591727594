use crate::common::MacroRegistry;
use crate::config::EloquentConfig;
use crate::document::PathAccessor;
use crate::query::OperatorTable;
use std::fmt::{Debug, Formatter};

/// The state a lineage of instances carries from one derived instance to
/// the next: configuration, operator table and macros.
///
/// `S` is the type macros are invoked on.
pub struct Context<S> {
    config: EloquentConfig,
    accessor: PathAccessor,
    operators: OperatorTable,
    macros: MacroRegistry<S>,
}

impl<S> Context<S> {
    pub fn new(config: EloquentConfig) -> Self {
        Context {
            accessor: PathAccessor::new(&config.field_separator()),
            config,
            operators: OperatorTable::new(),
            macros: MacroRegistry::new(),
        }
    }

    pub fn config(&self) -> &EloquentConfig {
        &self.config
    }

    pub fn accessor(&self) -> &PathAccessor {
        &self.accessor
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn macros(&self) -> &MacroRegistry<S> {
        &self.macros
    }

    pub fn with_operators(mut self, operators: OperatorTable) -> Self {
        self.operators = operators;
        self
    }

    pub fn with_macros(mut self, macros: MacroRegistry<S>) -> Self {
        self.macros = macros;
        self
    }
}

impl<S> Clone for Context<S> {
    fn clone(&self) -> Self {
        Context {
            config: self.config.clone(),
            accessor: self.accessor.clone(),
            operators: self.operators.clone(),
            macros: self.macros.clone(),
        }
    }
}

impl<S> Default for Context<S> {
    fn default() -> Self {
        Context::new(EloquentConfig::default())
    }
}

impl<S> Debug for Context<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("operators", &self.operators)
            .field("macros", &self.macros)
            .finish()
    }
}
