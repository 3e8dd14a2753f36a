use crate::error::GraphError;
use crate::formula::Formula;
use crate::model::connection::Connection;
use crate::model::module::{Module, ModuleId};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// The complete live graph: modules plus connections.
///
/// Modules and connections keep their insertion order, which is what makes
/// scheduling and propagation deterministic for a fixed edit history.
///
/// Structure is mutated only through the methods here so the
/// `needs_recalculation` bookkeeping stays consistent; the propagation
/// engine is the only writer of `outputs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    modules: Vec<Module>,
    connections: Vec<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub(crate) fn module_mut(&mut self, id: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    /// Adds a module to the graph. Isolated modules are valid.
    pub fn add_module(&mut self, module: Module) -> Result<(), GraphError> {
        if self.module(&module.id).is_some() {
            return Err(GraphError::DuplicateModule(module.id));
        }
        self.modules.push(module);
        Ok(())
    }

    /// Removes a module along with every connection touching it. Returns
    /// the removed module, or `None` if the id is unknown.
    pub fn remove_module(&mut self, id: &str) -> Option<Module> {
        let index = self.modules.iter().position(|m| m.id == id)?;
        let module = self.modules.remove(index);
        self.connections
            .retain(|c| c.source != module.id && c.target != module.id);
        Some(module)
    }

    /// Adds a connection between two existing modules.
    ///
    /// A target input port accepts at most one incoming connection; binding
    /// a second one is rejected rather than silently shadowing the first.
    pub fn connect(&mut self, connection: Connection) -> Result<(), GraphError> {
        if self.connections.iter().any(|c| c.id == connection.id) {
            return Err(GraphError::DuplicateConnection(connection.id));
        }
        if self.module(&connection.source).is_none() {
            return Err(GraphError::ModuleNotFound(connection.source));
        }
        if self.module(&connection.target).is_none() {
            return Err(GraphError::ModuleNotFound(connection.target));
        }
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.target == connection.target && c.target_port == connection.target_port)
        {
            return Err(GraphError::PortAlreadyBound {
                connection_id: connection.id,
                module_id: connection.target,
                port: connection.target_port,
                existing_id: existing.id.clone(),
            });
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Removes a connection by id. Returns the removed connection, or
    /// `None` if the id is unknown.
    pub fn disconnect(&mut self, id: &str) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Writes a value into a module's input port and marks the module stale.
    pub fn set_input(
        &mut self,
        id: &str,
        port: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), GraphError> {
        let module = self
            .module_mut(id)
            .ok_or_else(|| GraphError::ModuleNotFound(id.to_string()))?;
        module.inputs.insert(port.into(), value.into());
        module.needs_recalculation = true;
        Ok(())
    }

    /// Replaces a module's formula wholesale (`None` makes the module a
    /// passthrough) and marks the module stale.
    pub fn set_formula(&mut self, id: &str, formula: Option<Formula>) -> Result<(), GraphError> {
        let module = self
            .module_mut(id)
            .ok_or_else(|| GraphError::ModuleNotFound(id.to_string()))?;
        module.formula = formula;
        module.needs_recalculation = true;
        Ok(())
    }

    /// Restores a module's inputs from its `default_inputs` snapshot and
    /// marks the module stale.
    pub fn reset_inputs(&mut self, id: &str) -> Result<(), GraphError> {
        let module = self
            .module_mut(id)
            .ok_or_else(|| GraphError::ModuleNotFound(id.to_string()))?;
        module.inputs = module.default_inputs.clone();
        module.needs_recalculation = true;
        Ok(())
    }
}
