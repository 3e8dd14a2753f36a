//! Deserialization of canvas editor documents.
//!
//! The graphical editor exports its graph as JSON with camelCase field
//! names, raw JSON scalars on ports, and formulas as plain strings. This
//! module parses that shape and converts it into the engine's [`Graph`]
//! through the [`IntoGraph`] trait, which is also the extension point for
//! any other document format.

use crate::error::ConvertError;
use crate::formula::Formula;
use crate::model::{Connection, Graph, Module, ModuleId, ModuleKind};
use crate::value::{Record, Value};
use indexmap::IndexMap;
use serde::Deserialize;

/// A module as the canvas editor serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasModule {
    pub id: ModuleId,
    #[serde(rename = "type", alias = "moduleType")]
    pub kind: String,
    #[serde(default)]
    pub inputs: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub outputs: IndexMap<String, serde_json::Value>,
    #[serde(default, alias = "defaultInputs")]
    pub default_inputs: IndexMap<String, serde_json::Value>,
    pub formula: Option<String>,
}

/// A connection as the canvas editor serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConnection {
    pub id: Option<String>,
    pub source: ModuleId,
    pub target: ModuleId,
    #[serde(alias = "sourcePort")]
    pub source_port: String,
    #[serde(alias = "targetPort")]
    pub target_port: String,
}

/// A complete canvas export: node list plus edge list.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasDocument {
    #[serde(default)]
    pub nodes: Vec<CanvasModule>,
    #[serde(default)]
    pub edges: Vec<CanvasConnection>,
}

/// Conversion of an external document format into the engine's [`Graph`].
///
/// Implement this for your own format to feed the engine from a different
/// editor or storage layer.
pub trait IntoGraph {
    fn into_graph(self) -> Result<Graph, ConvertError>;
}

impl IntoGraph for CanvasDocument {
    fn into_graph(self) -> Result<Graph, ConvertError> {
        let mut graph = Graph::new();

        for node in self.nodes {
            let inputs = convert_record(&node.inputs);
            let default_inputs = if node.default_inputs.is_empty() {
                // Older documents predate the reset snapshot; the initial
                // inputs double as the defaults.
                inputs.clone()
            } else {
                convert_record(&node.default_inputs)
            };
            // A formula string that no longer compiles degrades to an
            // identity passthrough that keeps the source text, so the
            // document still round-trips losslessly.
            let formula = node.formula.map(Formula::compile_lenient);

            graph.add_module(Module {
                id: node.id,
                kind: parse_kind(&node.kind),
                inputs,
                outputs: convert_record(&node.outputs),
                default_inputs,
                formula,
                needs_recalculation: true,
            })?;
        }

        for edge in self.edges {
            let id = edge.id.unwrap_or_else(|| {
                format!(
                    "{}:{}->{}:{}",
                    edge.source, edge.source_port, edge.target, edge.target_port
                )
            });
            graph.connect(Connection {
                id,
                source: edge.source,
                target: edge.target,
                source_port: edge.source_port,
                target_port: edge.target_port,
            })?;
        }

        Ok(graph)
    }
}

fn convert_record(raw: &IndexMap<String, serde_json::Value>) -> Record {
    raw.iter()
        .map(|(port, value)| (port.clone(), Value::from_json(value)))
        .collect()
}

fn parse_kind(tag: &str) -> ModuleKind {
    match tag {
        "input" => ModuleKind::Input,
        "math" => ModuleKind::Math,
        "logic" => ModuleKind::Logic,
        "transform" => ModuleKind::Transform,
        "filter" => ModuleKind::Filter,
        "output" => ModuleKind::Output,
        _ => ModuleKind::Custom,
    }
}
