use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::ConvertError;
use crate::handler::{Handler, HandlerKey};
use crate::instructions;
use crate::value::Shape;

pub type HandlerTable = BTreeMap<HandlerKey, Arc<Handler>>;

/// Lookup table from (instruction, shape) to handler, built on first lookup
/// and reused until the registered handlers change.
#[derive(Debug, Default)]
pub struct Registry {
    handlers: RwLock<Vec<Arc<Handler>>>,
    table: RwLock<Option<Arc<HandlerTable>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in instruction handler.
    pub fn with_builtins() -> Result<Self, ConvertError> {
        let registry = Self::new();
        for handler in instructions::builtin()? {
            registry.register(handler)?;
        }
        Ok(registry)
    }

    /// Adds a handler after checking its definition. A rejected handler
    /// leaves the registry unchanged.
    pub fn register(&self, handler: Handler) -> Result<(), ConvertError> {
        handler.check_definition()?;
        let key = handler.key();

        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        if handlers.iter().any(|registered| registered.key() == key) {
            return Err(ConvertError::definition(
                &key.instruction,
                format!("more than one handler registered for {key}"),
            ));
        }
        handlers.push(Arc::new(handler));
        drop(handlers);

        debug!(
            instruction = %key.instruction,
            shape = %key.shape,
            "registered instruction handler"
        );
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&self) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_built(&self) -> bool {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current table, building it if needed.
    pub fn table(&self) -> Arc<HandlerTable> {
        if let Some(table) = self
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(table);
        }

        let mut slot = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = slot.as_ref() {
            return Arc::clone(table);
        }
        let table = Arc::new(self.build());
        *slot = Some(Arc::clone(&table));
        table
    }

    /// Builds a fresh table and swaps it in, whatever the current state.
    pub fn rebuild(&self) -> Arc<HandlerTable> {
        let table = Arc::new(self.build());
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&table));
        table
    }

    pub fn lookup(&self, instruction: &str, shape: Shape) -> Result<Arc<Handler>, ConvertError> {
        let key = HandlerKey::new(instruction, shape);
        self.table()
            .get(&key)
            .cloned()
            .ok_or(ConvertError::HandlerNotFound {
                instruction: key.instruction,
                shape,
            })
    }

    /// Every handler in key order.
    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.table().values().cloned().collect()
    }

    fn build(&self) -> HandlerTable {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let table = handlers
            .iter()
            .map(|handler| (handler.key(), Arc::clone(handler)))
            .collect::<HandlerTable>();
        debug!(handlers = table.len(), "built handler table");
        table
    }
}
