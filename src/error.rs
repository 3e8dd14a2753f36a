use thiserror::Error;

/// Errors that can occur when compiling or executing a module formula.
#[derive(Error, Debug, Clone)]
pub enum FormulaError {
    #[error("Failed to parse formula statement '{statement}': {message}")]
    Parse { statement: String, message: String },

    #[error("Formula execution failed: {0}")]
    Execution(String),
}

/// Errors that can occur during structural graph mutations.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Module '{0}' not found in the graph")]
    ModuleNotFound(String),

    #[error("Module '{0}' is already present in the graph")]
    DuplicateModule(String),

    #[error("Connection '{0}' is already present in the graph")]
    DuplicateConnection(String),

    #[error(
        "Connection '{connection_id}' would bind input port '{port}' of module '{module_id}', which is already fed by connection '{existing_id}'"
    )]
    PortAlreadyBound {
        connection_id: String,
        module_id: String,
        port: String,
        existing_id: String,
    },
}

/// Errors that can occur when setting up a sensitivity simulation.
///
/// Failures *inside* the simulated clone are never surfaced here; a broken
/// formula degrades that one module's simulated outputs and the run still
/// returns a result for the rest of the graph.
#[derive(Error, Debug, Clone)]
pub enum SimulationError {
    #[error("Simulation target module '{0}' not found in the graph")]
    TargetNotFound(String),

    #[error("Simulation input module '{0}' not found in the graph")]
    InputNotFound(String),
}

/// Errors that can occur when converting a canvas document into a `Graph`.
#[derive(Error, Debug, Clone)]
pub enum ConvertError {
    #[error("Invalid canvas document: {0}")]
    Validation(String),
}

impl From<GraphError> for ConvertError {
    fn from(err: GraphError) -> Self {
        ConvertError::Validation(err.to_string())
    }
}
