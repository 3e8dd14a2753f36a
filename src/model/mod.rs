//! The engine's data model: modules, connections, and the live graph.

mod connection;
mod graph;
mod module;

pub use connection::Connection;
pub use graph::Graph;
pub use module::{Module, ModuleId, ModuleKind};
