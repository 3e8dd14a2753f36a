//! Single-module evaluation, isolated from formula failures.

use crate::model::Module;
use crate::value::{Record, Value};

/// Sentinel message stored under the `error` output port when a formula
/// fails at runtime.
pub const EXECUTION_FAILED: &str = "Execution failed";

/// Executes a module's formula against its current inputs and returns the
/// fresh output record.
///
/// A module without a formula is a passthrough: its last-known outputs are
/// returned unchanged. A formula failure never escapes to the scheduler;
/// it yields the `{ error: "Execution failed" }` sentinel record instead,
/// so propagation continues for the rest of the graph.
pub fn evaluate_module(module: &Module) -> Record {
    match &module.formula {
        None => module.outputs.clone(),
        Some(formula) => match formula.evaluate(&module.inputs) {
            Ok(outputs) => outputs,
            Err(_) => {
                let mut sentinel = Record::new();
                sentinel.insert(
                    "error".to_string(),
                    Value::Text(EXECUTION_FAILED.to_string()),
                );
                sentinel
            }
        },
    }
}

/// True if a module's outputs carry the execution failure sentinel. The UI
/// layer uses this to visually flag broken modules.
pub fn has_execution_error(module: &Module) -> bool {
    matches!(
        module.outputs.get("error"),
        Some(Value::Text(message)) if message == EXECUTION_FAILED
    )
}
