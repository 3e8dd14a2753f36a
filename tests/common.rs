//! Common test utilities for building module graphs.
use denpa::prelude::*;

/// Creates the canonical profit graph used across the test suite.
///
/// `revenue` (50000) and `cost` (35000) are input modules feeding a
/// `profit` module computing `profit = revenue - cost`.
#[allow(dead_code)]
pub fn create_profit_graph() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_module(
            Module::new("revenue", ModuleKind::Input)
                .with_input("revenue", 50_000.0)
                .with_formula(Formula::identity()),
        )
        .unwrap();
    graph
        .add_module(
            Module::new("cost", ModuleKind::Input)
                .with_input("cost", 35_000.0)
                .with_formula(Formula::identity()),
        )
        .unwrap();
    graph
        .add_module(
            Module::new("profit", ModuleKind::Math)
                .with_formula(Formula::compile("profit = revenue - cost").unwrap()),
        )
        .unwrap();
    graph
        .connect(Connection::new("e1", "revenue", "revenue", "profit", "revenue"))
        .unwrap();
    graph
        .connect(Connection::new("e2", "cost", "cost", "profit", "cost"))
        .unwrap();
    graph
}

/// A three-stage chain for depth-sensitive tests:
/// `base` (10) -> `double` (`value = base * 2`) -> `sink` (`result = value`).
#[allow(dead_code)]
pub fn create_chained_graph() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_module(
            Module::new("base", ModuleKind::Input)
                .with_input("base", 10.0)
                .with_formula(Formula::identity()),
        )
        .unwrap();
    graph
        .add_module(
            Module::new("double", ModuleKind::Transform)
                .with_formula(Formula::compile("value = base * 2").unwrap()),
        )
        .unwrap();
    graph
        .add_module(
            Module::new("sink", ModuleKind::Output)
                .with_formula(Formula::compile("result = value").unwrap()),
        )
        .unwrap();
    graph
        .connect(Connection::new("c1", "base", "base", "double", "base"))
        .unwrap();
    graph
        .connect(Connection::new("c2", "double", "value", "sink", "value"))
        .unwrap();
    graph
}

/// A pure two-module cycle: `a -> b -> a`.
#[allow(dead_code)]
pub fn create_cyclic_graph() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_module(
            Module::new("a", ModuleKind::Math)
                .with_input("x", 1.0)
                .with_formula(Formula::compile("y = x + 1").unwrap()),
        )
        .unwrap();
    graph
        .add_module(
            Module::new("b", ModuleKind::Math)
                .with_input("y", 0.0)
                .with_formula(Formula::compile("x = y").unwrap()),
        )
        .unwrap();
    graph
        .connect(Connection::new("ab", "a", "y", "b", "y"))
        .unwrap();
    graph
        .connect(Connection::new("ba", "b", "x", "a", "x"))
        .unwrap();
    graph
}

/// Reads a numeric output port, panicking with context on absence.
#[allow(dead_code)]
pub fn output_number(graph: &Graph, module: &str, port: &str) -> f64 {
    graph
        .module(module)
        .unwrap_or_else(|| panic!("module '{}' missing", module))
        .outputs
        .get(port)
        .unwrap_or_else(|| panic!("output '{}' missing on '{}'", port, module))
        .as_number()
        .unwrap_or_else(|| panic!("output '{}:{}' is not a number", module, port))
}
