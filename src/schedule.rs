//! Dependency analysis and topological scheduling.
//!
//! The dependency map answers "which modules must be evaluated before module
//! X"; the evaluation order is a DFS post-order over it, so every
//! predecessor of a module lands earlier in the sequence. Both are agnostic
//! to port-level detail, which the propagation engine resolves later.

use crate::model::{Graph, ModuleId};
use ahash::AHashMap;

/// Derives a `module id -> predecessor ids` adjacency map from the
/// connection list.
///
/// Every module gets an entry, so isolated modules still get scheduled.
/// Multiple connections between the same pair of modules contribute a
/// single dependency, and connections whose endpoints no longer resolve are
/// skipped.
pub fn dependency_map(graph: &Graph) -> AHashMap<ModuleId, Vec<ModuleId>> {
    let mut dependencies: AHashMap<ModuleId, Vec<ModuleId>> = AHashMap::new();
    for module in graph.modules() {
        dependencies.insert(module.id.clone(), Vec::new());
    }
    for connection in graph.connections() {
        if !dependencies.contains_key(&connection.source) {
            continue;
        }
        let Some(predecessors) = dependencies.get_mut(&connection.target) else {
            continue;
        };
        if !predecessors.contains(&connection.source) {
            predecessors.push(connection.source.clone());
        }
    }
    dependencies
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Produces an evaluation order over all modules.
///
/// For an acyclic graph every predecessor of a module appears before it.
/// When a visit reaches a module already in progress, that back-edge is
/// dropped: the cyclic module is still scheduled exactly once after its
/// remaining dependencies, so cycles degrade to a deterministic but
/// formula-dependent ordering instead of crashing the scheduler.
///
/// The order is deterministic for a fixed insertion order of modules and
/// connections: roots are visited in module insertion order and predecessor
/// lists preserve connection insertion order.
pub fn evaluation_order(
    graph: &Graph,
    dependencies: &AHashMap<ModuleId, Vec<ModuleId>>,
) -> Vec<ModuleId> {
    let mut marks: AHashMap<&str, Mark> = AHashMap::new();
    let mut order = Vec::with_capacity(graph.modules().len());
    for module in graph.modules() {
        visit(&module.id, dependencies, &mut marks, &mut order);
    }
    order
}

fn visit<'a>(
    id: &'a str,
    dependencies: &'a AHashMap<ModuleId, Vec<ModuleId>>,
    marks: &mut AHashMap<&'a str, Mark>,
    order: &mut Vec<ModuleId>,
) {
    if marks.contains_key(id) {
        // Done, or in progress: revisiting an in-progress module would mean
        // following a cycle edge, so it is dropped here.
        return;
    }
    marks.insert(id, Mark::InProgress);
    if let Some(predecessors) = dependencies.get(id) {
        for predecessor in predecessors {
            visit(predecessor, dependencies, marks, order);
        }
    }
    marks.insert(id, Mark::Done);
    order.push(id.to_string());
}
