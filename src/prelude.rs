//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions from the denpa
//! crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use denpa::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document_json = std::fs::read_to_string("path/to/graph.json")?;
//! let document: CanvasDocument = serde_json::from_str(&document_json)?;
//!
//! let mut engine = Recalculator::new(document.into_graph()?);
//! let updated = engine.recalculate();
//! println!("{} modules updated", updated.len());
//! # Ok(())
//! # }
//! ```

// The live graph and its controller
pub use crate::engine::Recalculator;
pub use crate::model::{Connection, Graph, Module, ModuleId, ModuleKind};

// Formulas and port values
pub use crate::formula::Formula;
pub use crate::value::{Record, Value};

// Engine operations
pub use crate::propagate::propagate;
pub use crate::simulate::{SimulationResult, simulate};
pub use crate::trace::{MetricSource, trace_sources};

// Editor document boundary
pub use crate::canvas::{CanvasDocument, IntoGraph};

// Error types
pub use crate::error::{ConvertError, FormulaError, GraphError, SimulationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
