//! Tests for the sensitivity simulator: isolation, arithmetic, and the
//! impact report.
mod common;
use common::*;
use denpa::prelude::*;
use denpa::propagate::propagate;

fn number(value: &Value) -> f64 {
    value.as_number().expect("expected a numeric value")
}

#[test]
fn test_simulation_reports_percent_change_on_target() {
    let mut graph = create_profit_graph();
    propagate(&mut graph, None);

    let result = simulate(&graph, "profit", "profit", "revenue", "revenue", 10.0).unwrap();

    assert_eq!(result.changed_input.original_value, Value::Number(50_000.0));
    assert_eq!(result.target_metric.original_value, Value::Number(15_000.0));
    // Perturbed values carry float noise (50000 * 1.1 is not exactly 55000),
    // so they are compared numerically.
    assert!((number(&result.changed_input.new_value) - 55_000.0).abs() < 1e-6);
    assert!((number(&result.target_metric.new_value) - 20_000.0).abs() < 1e-6);
    assert!((result.target_metric.percent_change - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_simulation_never_mutates_the_live_graph() {
    let mut graph = create_profit_graph();
    propagate(&mut graph, None);
    let snapshot = graph.clone();

    simulate(&graph, "profit", "profit", "revenue", "revenue", 25.0).unwrap();

    assert_eq!(graph, snapshot);
    assert_eq!(output_number(&graph, "profit", "profit"), 15_000.0);
}

#[test]
fn test_affected_modules_cover_the_ripple() {
    let mut graph = create_profit_graph();
    propagate(&mut graph, None);

    let result = simulate(&graph, "profit", "profit", "revenue", "revenue", 10.0).unwrap();

    let affected: Vec<&str> = result
        .affected_modules
        .iter()
        .map(|a| a.module.as_str())
        .collect();
    assert_eq!(affected, vec!["revenue", "profit"]);

    let profit = &result.affected_modules[1];
    assert_eq!(profit.original_outputs.get("profit"), Some(&Value::Number(15_000.0)));
    assert!((number(profit.new_outputs.get("profit").unwrap()) - 20_000.0).abs() < 1e-6);
}

#[test]
fn test_input_module_mirrors_perturbed_port_into_outputs() {
    let mut graph = create_profit_graph();
    propagate(&mut graph, None);

    let result = simulate(&graph, "profit", "profit", "revenue", "revenue", 10.0).unwrap();

    let revenue = result
        .affected_modules
        .iter()
        .find(|a| a.module == "revenue")
        .unwrap();
    assert!((number(revenue.new_outputs.get("revenue").unwrap()) - 55_000.0).abs() < 1e-6);
}

#[test]
fn test_negative_percent_change() {
    let mut graph = create_profit_graph();
    propagate(&mut graph, None);

    let result = simulate(&graph, "profit", "profit", "cost", "cost", -20.0).unwrap();

    // cost 35000 -> 28000, profit 15000 -> 22000
    assert!((number(&result.changed_input.new_value) - 28_000.0).abs() < 1e-6);
    assert!((number(&result.target_metric.new_value) - 22_000.0).abs() < 1e-6);
    assert!((result.target_metric.percent_change - 140.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_non_numeric_input_is_not_perturbable() {
    let mut graph = Graph::new();
    graph
        .add_module(
            Module::new("label", ModuleKind::Input)
                .with_input("name", "alpha")
                .with_formula(Formula::identity()),
        )
        .unwrap();
    propagate(&mut graph, None);

    let result = simulate(&graph, "label", "name", "label", "name", 10.0).unwrap();

    assert_eq!(result.changed_input.original_value, Value::Text("alpha".to_string()));
    assert_eq!(result.changed_input.new_value, Value::Text("alpha".to_string()));
    assert!(result.affected_modules.is_empty());
    assert_eq!(result.target_metric.percent_change, 0.0);
}

#[test]
fn test_zero_original_metric_yields_zero_percent_change() {
    let mut graph = Graph::new();
    graph
        .add_module(
            Module::new("zero", ModuleKind::Input)
                .with_input("v", 0.0)
                .with_formula(Formula::identity()),
        )
        .unwrap();
    graph
        .add_module(
            Module::new("echo", ModuleKind::Math)
                .with_formula(Formula::compile("out = v * 2").unwrap()),
        )
        .unwrap();
    graph
        .connect(Connection::new("c", "zero", "v", "echo", "v"))
        .unwrap();
    propagate(&mut graph, None);
    assert_eq!(output_number(&graph, "echo", "out"), 0.0);

    // The original metric is zero, so the division guard reports 0.
    let result = simulate(&graph, "echo", "out", "zero", "v", 50.0).unwrap();
    assert_eq!(result.changed_input.new_value, Value::Number(0.0));
    assert_eq!(result.target_metric.percent_change, 0.0);
}

#[test]
fn test_unknown_modules_are_reported() {
    let graph = create_profit_graph();
    assert!(matches!(
        simulate(&graph, "nope", "profit", "revenue", "revenue", 10.0),
        Err(SimulationError::TargetNotFound(_))
    ));
    assert!(matches!(
        simulate(&graph, "profit", "profit", "nope", "revenue", 10.0),
        Err(SimulationError::InputNotFound(_))
    ));
}

#[test]
fn test_broken_formula_inside_clone_still_returns_a_result() {
    let mut graph = create_profit_graph();
    graph
        .add_module(
            Module::new("broken", ModuleKind::Math)
                .with_formula(Formula::compile("out = missing * 2").unwrap()),
        )
        .unwrap();
    graph
        .connect(Connection::new("cb", "revenue", "revenue", "broken", "other"))
        .unwrap();
    propagate(&mut graph, None);

    let result = simulate(&graph, "profit", "profit", "revenue", "revenue", 10.0).unwrap();
    assert!((number(&result.target_metric.new_value) - 20_000.0).abs() < 1e-6);
}
