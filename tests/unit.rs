//! Unit tests for values, formulas, and the serialization boundary.
mod common;
use denpa::prelude::*;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Number(42.0)), "42");
    assert_eq!(format!("{}", Value::Number(3.5)), "3.5");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Text("alpha".to_string())), "alpha");
    assert_eq!(format!("{}", Value::Null), "null");
}

#[test]
fn test_nan_values_compare_equal_for_change_detection() {
    assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    assert_ne!(Value::Number(f64::NAN), Value::Number(1.0));
    assert_ne!(Value::Number(f64::NAN), Value::Null);
}

#[test]
fn test_record_equality_is_order_insensitive() {
    let mut left = Record::new();
    left.insert("a".to_string(), Value::Number(1.0));
    left.insert("b".to_string(), Value::Number(2.0));
    let mut right = Record::new();
    right.insert("b".to_string(), Value::Number(2.0));
    right.insert("a".to_string(), Value::Number(1.0));
    assert_eq!(left, right);
}

#[test]
fn test_formula_single_statement() {
    let formula = Formula::compile("profit = revenue - cost").unwrap();
    let mut inputs = Record::new();
    inputs.insert("revenue".to_string(), Value::Number(50_000.0));
    inputs.insert("cost".to_string(), Value::Number(35_000.0));

    let outputs = formula.evaluate(&inputs).unwrap();
    assert_eq!(outputs.get("profit"), Some(&Value::Number(15_000.0)));
    assert_eq!(outputs.len(), 1);
}

#[test]
fn test_formula_statements_chain() {
    let formula = Formula::compile("profit = revenue - cost; margin = profit / revenue").unwrap();
    let mut inputs = Record::new();
    inputs.insert("revenue".to_string(), Value::Number(50_000.0));
    inputs.insert("cost".to_string(), Value::Number(35_000.0));

    let outputs = formula.evaluate(&inputs).unwrap();
    assert_eq!(outputs.get("margin"), Some(&Value::Number(0.3)));
}

#[test]
fn test_formula_comparisons_and_booleans() {
    let formula = Formula::compile("profitable = revenue > cost\nbreak_even = revenue == cost")
        .unwrap();
    let mut inputs = Record::new();
    inputs.insert("revenue".to_string(), Value::Number(2.0));
    inputs.insert("cost".to_string(), Value::Number(1.0));

    let outputs = formula.evaluate(&inputs).unwrap();
    assert_eq!(outputs.get("profitable"), Some(&Value::Bool(true)));
    assert_eq!(outputs.get("break_even"), Some(&Value::Bool(false)));
}

#[test]
fn test_formula_comments_and_blank_lines_are_skipped() {
    let formula = Formula::compile("# doubles the input\n\nout = v * 2").unwrap();
    let mut inputs = Record::new();
    inputs.insert("v".to_string(), Value::Number(4.0));
    assert_eq!(
        formula.evaluate(&inputs).unwrap().get("out"),
        Some(&Value::Number(8.0))
    );
}

#[test]
fn test_identity_formula_copies_inputs_through() {
    let formula = Formula::identity();
    let mut inputs = Record::new();
    inputs.insert("v".to_string(), Value::Number(7.0));
    assert_eq!(formula.evaluate(&inputs).unwrap(), inputs);
}

#[test]
fn test_formula_parse_errors() {
    assert!(matches!(
        Formula::compile("profit - revenue"),
        Err(FormulaError::Parse { .. })
    ));
    assert!(matches!(
        Formula::compile("1x = 2"),
        Err(FormulaError::Parse { .. })
    ));
    assert!(matches!(
        Formula::compile("x = )("),
        Err(FormulaError::Parse { .. })
    ));
}

#[test]
fn test_formula_execution_error_on_missing_variable() {
    let formula = Formula::compile("out = missing + 1").unwrap();
    let inputs = Record::new();
    assert!(matches!(
        formula.evaluate(&inputs),
        Err(FormulaError::Execution(_))
    ));
}

#[test]
fn test_graph_round_trips_through_json() {
    let mut graph = common::create_profit_graph();
    denpa::propagate::propagate(&mut graph, None);

    let json = serde_json::to_string(&graph).unwrap();
    let restored: Graph = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, graph);
    let formula = restored.module("profit").unwrap().formula.as_ref().unwrap();
    assert_eq!(formula.source(), "profit = revenue - cost");
}

#[test]
fn test_stored_malformed_formula_falls_back_to_identity() {
    let json = r#"{
        "modules": [
            {"id": "m", "type": "math",
             "inputs": {"v": 3.0},
             "formula": "out = ((("}
        ],
        "connections": []
    }"#;
    let mut graph: Graph = serde_json::from_str(json).unwrap();

    // The broken source survives the round trip...
    let module = graph.module("m").unwrap();
    assert_eq!(module.formula.as_ref().unwrap().source(), "out = (((");

    // ...but evaluation degrades to the identity passthrough.
    denpa::propagate::propagate(&mut graph, None);
    assert_eq!(
        graph.module("m").unwrap().outputs.get("v"),
        Some(&Value::Number(3.0))
    );
}

#[test]
fn test_error_display() {
    let err = GraphError::PortAlreadyBound {
        connection_id: "c2".to_string(),
        module_id: "profit".to_string(),
        port: "revenue".to_string(),
        existing_id: "c1".to_string(),
    };
    assert!(err.to_string().contains("profit"));
    assert!(err.to_string().contains("c1"));

    let err = FormulaError::Parse {
        statement: "a b c".to_string(),
        message: "expected 'output = expression'".to_string(),
    };
    assert!(err.to_string().contains("a b c"));

    let err = SimulationError::TargetNotFound("nope".to_string());
    assert!(err.to_string().contains("nope"));
}
