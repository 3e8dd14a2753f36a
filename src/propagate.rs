//! The propagation engine: pipes values along connections and re-evaluates
//! stale modules in dependency order.

use crate::eval::evaluate_module;
use crate::model::{Connection, Graph, ModuleId};
use crate::schedule::{dependency_map, evaluation_order};
use crate::value::Value;
use ahash::{AHashMap, AHashSet};

/// Runs one propagation pass over the graph.
///
/// Modules are walked in topological order. For each module, every incoming
/// connection pipes the source's current output into the target's input
/// port; if any piped value differs from what the port already holds, the
/// module is re-evaluated. `changed` optionally names the module that
/// triggered this pass, forcing its re-evaluation even when no connection
/// touched it.
///
/// Returns the ids of modules whose outputs actually changed, in evaluation
/// order. An empty list is the caller's signal that nothing changed and any
/// downstream refresh or persistence can be skipped.
///
/// Failure is always module-local: a broken formula degrades that one
/// module's outputs to the error sentinel, and connections whose endpoints
/// no longer resolve are skipped rather than failing the pass.
pub fn propagate(graph: &mut Graph, changed: Option<&str>) -> Vec<ModuleId> {
    let mut seeds = AHashSet::new();
    if let Some(id) = changed {
        seeds.insert(id.to_string());
    }
    propagate_seeded(graph, &seeds)
}

/// Propagation with a set of forced seed modules. The public entry points
/// take a single optional seed; the recalculation controller coalesces
/// several queued requests into one seeded pass.
pub(crate) fn propagate_seeded(graph: &mut Graph, seeds: &AHashSet<ModuleId>) -> Vec<ModuleId> {
    let dependencies = dependency_map(graph);
    let order = evaluation_order(graph, &dependencies);

    // Group connections by target for O(1) lookup of "who feeds me",
    // preserving connection insertion order. If several connections bind the
    // same input port, the last one in insertion order wins.
    let connections = graph.connections().to_vec();
    let mut inbound: AHashMap<&str, Vec<&Connection>> = AHashMap::new();
    for connection in &connections {
        inbound
            .entry(connection.target.as_str())
            .or_default()
            .push(connection);
    }

    let mut updated = Vec::new();
    for id in &order {
        // Read upstream outputs before taking the mutable borrow on the
        // target module.
        let mut incoming: Vec<(String, Value)> = Vec::new();
        if let Some(edges) = inbound.get(id.as_str()) {
            for connection in edges {
                let Some(source) = graph.module(&connection.source) else {
                    continue;
                };
                let Some(value) = source.outputs.get(&connection.source_port) else {
                    continue;
                };
                incoming.push((connection.target_port.clone(), value.clone()));
            }
        }

        let Some(module) = graph.module_mut(id) else {
            continue;
        };
        let mut touched = false;
        for (port, value) in incoming {
            if module.inputs.get(&port) != Some(&value) {
                module.inputs.insert(port, value);
                touched = true;
            }
        }
        if touched {
            module.needs_recalculation = true;
        }

        if module.needs_recalculation || seeds.contains(id) {
            let fresh = evaluate_module(module);
            module.needs_recalculation = false;
            if fresh != module.outputs {
                module.outputs = fresh;
                updated.push(id.clone());
            }
        }
    }
    updated
}
