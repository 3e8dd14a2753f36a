use crate::model::module::ModuleId;
use serde::{Deserialize, Serialize};

/// A directed binding from one module's output port to another module's
/// input port.
///
/// Connections carry no data of their own; they are routing directives
/// consulted by the propagation engine when it pipes values downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source: ModuleId,
    pub target: ModuleId,
    /// An output-port name of the source module.
    pub source_port: String,
    /// An input-port name of the target module.
    pub target_port: String,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<ModuleId>,
        source_port: impl Into<String>,
        target: impl Into<ModuleId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_port: source_port.into(),
            target_port: target_port.into(),
        }
    }
}
