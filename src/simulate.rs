//! What-if sensitivity analysis.
//!
//! A simulation perturbs one input by a percentage on a private deep copy of
//! the graph, re-runs propagation over the copy, and reports the before and
//! after state of everything that moved. The caller's live graph is never
//! touched; applying the change for real is a separate, explicit mutation.

use crate::error::SimulationError;
use crate::model::{Graph, ModuleId, ModuleKind};
use crate::propagate::propagate;
use crate::value::{Record, Value};
use ahash::AHashMap;
use serde::Serialize;

/// The perturbed input: where it lives and what it became.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedInput {
    pub module: ModuleId,
    pub input: String,
    pub original_value: Value,
    pub new_value: Value,
}

/// A module whose outputs differ from the pre-perturbation baseline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedModule {
    pub module: ModuleId,
    pub original_outputs: Record,
    pub new_outputs: Record,
}

/// Before/after reading of the watched metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetMetric {
    pub module: ModuleId,
    pub metric: String,
    pub original_value: Value,
    pub new_value: Value,
    /// `(new - original) / |original| * 100` when the original is a nonzero
    /// number, `0` otherwise.
    pub percent_change: f64,
}

/// The full impact report of one what-if run. Ephemeral: never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub changed_input: ChangedInput,
    pub affected_modules: Vec<AffectedModule>,
    pub target_metric: TargetMetric,
}

/// Perturbs `input_port` on `input_module` by `percent_change` percent and
/// reports the ripple effect on `target_metric` of `target_module`.
///
/// Only numeric inputs are perturbable; a non-numeric original is left
/// unchanged and the run simply measures a no-op. Evaluation failures inside
/// the clone degrade the affected module's simulated outputs but never abort
/// the run.
pub fn simulate(
    graph: &Graph,
    target_module: &str,
    target_metric: &str,
    input_module: &str,
    input_port: &str,
    percent_change: f64,
) -> Result<SimulationResult, SimulationError> {
    if graph.module(target_module).is_none() {
        return Err(SimulationError::TargetNotFound(target_module.to_string()));
    }
    let mut clone = graph.clone();

    // Baseline snapshot before anything moves.
    let baseline: AHashMap<ModuleId, Record> = clone
        .modules()
        .iter()
        .map(|m| (m.id.clone(), m.outputs.clone()))
        .collect();
    let original_metric = read_output(&clone, target_module, target_metric);

    let perturbed = clone
        .module(input_module)
        .ok_or_else(|| SimulationError::InputNotFound(input_module.to_string()))?;
    let original_value = perturbed
        .inputs
        .get(input_port)
        .cloned()
        .unwrap_or(Value::Null);
    let new_value = match original_value.as_number() {
        Some(n) => Value::Number(n * (1.0 + percent_change / 100.0)),
        None => original_value.clone(),
    };

    clone
        .set_input(input_module, input_port, new_value.clone())
        .map_err(|_| SimulationError::InputNotFound(input_module.to_string()))?;

    // An input module's output is definitionally a passthrough of its own
    // input, so the update is mirrored straight into its outputs.
    if let Some(module) = clone.module_mut(input_module) {
        if module.kind == ModuleKind::Input && module.outputs.contains_key(input_port) {
            module.outputs.insert(input_port.to_string(), new_value.clone());
        }
    }

    propagate(&mut clone, Some(input_module));

    let affected_modules = clone
        .modules()
        .iter()
        .filter(|m| baseline.get(&m.id).is_some_and(|before| *before != m.outputs))
        .map(|m| AffectedModule {
            module: m.id.clone(),
            original_outputs: baseline.get(&m.id).cloned().unwrap_or_default(),
            new_outputs: m.outputs.clone(),
        })
        .collect();

    let new_metric = read_output(&clone, target_module, target_metric);
    let percent_change_metric = match (original_metric.as_number(), new_metric.as_number()) {
        (Some(original), Some(new)) if original != 0.0 => {
            (new - original) / original.abs() * 100.0
        }
        _ => 0.0,
    };

    Ok(SimulationResult {
        changed_input: ChangedInput {
            module: input_module.to_string(),
            input: input_port.to_string(),
            original_value,
            new_value,
        },
        affected_modules,
        target_metric: TargetMetric {
            module: target_module.to_string(),
            metric: target_metric.to_string(),
            original_value: original_metric,
            new_value: new_metric,
            percent_change: percent_change_metric,
        },
    })
}

fn read_output(graph: &Graph, module_id: &str, port: &str) -> Value {
    graph
        .module(module_id)
        .and_then(|m| m.outputs.get(port))
        .cloned()
        .unwrap_or(Value::Null)
}
