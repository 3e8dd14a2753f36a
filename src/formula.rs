//! User-supplied module formulas.
//!
//! A formula maps an input record to an output record. It is authored as
//! plain source text, one `output = expression` statement per line (or
//! separated by `;`), and compiled ahead of time into `evalexpr` operator
//! trees so repeated propagation passes pay no parsing cost:
//!
//! ```text
//! profit = revenue - cost
//! margin = profit / revenue * 100
//! ```
//!
//! Statements are evaluated top to bottom against a context seeded from the
//! module's inputs, and each computed output is fed back into the context so
//! later statements can reference earlier ones.
//!
//! Only the source text crosses the persistence boundary: `Formula`
//! serializes as its source string and is recompiled on deserialization. A
//! stored source that no longer compiles falls back to the identity formula
//! (inputs copied through as outputs) while keeping the original text, so a
//! document round-trips losslessly even when it carries a broken formula.

use crate::error::FormulaError;
use crate::value::{Record, Value};
use evalexpr::{
    ContextWithMutableVariables, DefaultNumericTypes, HashMapContext, Node as ExprNode,
    build_operator_tree,
};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;

type ExprValue = evalexpr::Value<DefaultNumericTypes>;

/// A compiled formula: an ordered list of `output port -> expression`
/// assignments, plus the source text it was compiled from.
#[derive(Debug, Clone)]
pub struct Formula {
    source: String,
    program: Vec<(String, ExprNode)>,
}

impl Formula {
    /// Compiles formula source into an executable program.
    ///
    /// Empty statements and `#` comment lines are skipped. Every remaining
    /// statement must have the shape `identifier = expression`.
    pub fn compile(source: &str) -> Result<Self, FormulaError> {
        let mut program = Vec::new();
        for statement in source.split(['\n', ';']) {
            let statement = statement.trim();
            if statement.is_empty() || statement.starts_with('#') {
                continue;
            }
            let (port, expression) =
                split_assignment(statement).ok_or_else(|| FormulaError::Parse {
                    statement: statement.to_string(),
                    message: "expected 'output = expression'".to_string(),
                })?;
            let node: ExprNode =
                build_operator_tree(expression).map_err(|e| FormulaError::Parse {
                    statement: statement.to_string(),
                    message: e.to_string(),
                })?;
            program.push((port.to_string(), node));
        }
        Ok(Self {
            source: source.to_string(),
            program,
        })
    }

    /// The identity formula: evaluation copies the input record through
    /// unchanged.
    pub fn identity() -> Self {
        Self {
            source: String::new(),
            program: Vec::new(),
        }
    }

    /// Compiles the source, degrading to an identity-evaluating formula that
    /// keeps the original text when compilation fails. This is the fallback
    /// at every document boundary, so a broken formula still round-trips
    /// losslessly.
    pub fn compile_lenient(source: impl Into<String>) -> Self {
        let source = source.into();
        match Formula::compile(&source) {
            Ok(formula) => formula,
            Err(_) => Self {
                source,
                program: Vec::new(),
            },
        }
    }

    /// The source text this formula was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Executes the formula against an input record, producing a fresh
    /// output record.
    ///
    /// The context is seeded from a copy of the inputs, so the formula can
    /// never alias or mutate graph state. Referencing a variable that is not
    /// present in the inputs is an execution error.
    pub fn evaluate(&self, inputs: &Record) -> Result<Record, FormulaError> {
        if self.program.is_empty() {
            return Ok(inputs.clone());
        }

        let mut context = HashMapContext::<DefaultNumericTypes>::new();
        for (name, value) in inputs {
            if let Some(expr_value) = to_expr_value(value) {
                context
                    .set_value(name.clone(), expr_value)
                    .map_err(|e| FormulaError::Execution(e.to_string()))?;
            }
        }

        let mut outputs = Record::new();
        for (port, node) in &self.program {
            let result = node
                .eval_with_context(&context)
                .map_err(|e| FormulaError::Execution(e.to_string()))?;
            let value = from_expr_value(result);
            if let Some(expr_value) = to_expr_value(&value) {
                context
                    .set_value(port.clone(), expr_value)
                    .map_err(|e| FormulaError::Execution(e.to_string()))?;
            }
            outputs.insert(port.clone(), value);
        }
        Ok(outputs)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl Serialize for Formula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Ok(Formula::compile_lenient(source))
    }
}

/// Splits a statement at its assignment `=`, skipping comparison operators
/// (`==`, `!=`, `<=`, `>=`). Returns `None` if the statement has no
/// assignment or the left-hand side is not a plain identifier.
fn split_assignment(statement: &str) -> Option<(&str, &str)> {
    let bytes = statement.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'=' {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| bytes[p]);
        let next = bytes.get(i + 1);
        if matches!(prev, Some(b'!' | b'<' | b'>' | b'=')) || next == Some(&b'=') {
            continue;
        }
        let port = statement[..i].trim();
        let expression = statement[i + 1..].trim();
        if is_identifier(port) && !expression.is_empty() {
            return Some((port, expression));
        }
        return None;
    }
    None
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn to_expr_value(value: &Value) -> Option<ExprValue> {
    match value {
        Value::Number(n) => Some(ExprValue::Float(*n)),
        Value::Bool(b) => Some(ExprValue::Boolean(*b)),
        Value::Text(s) => Some(ExprValue::String(s.clone())),
        Value::Null => None,
    }
}

fn from_expr_value(value: ExprValue) -> Value {
    match value {
        ExprValue::Float(f) => Value::Number(f),
        ExprValue::Int(i) => Value::Number(i as f64),
        ExprValue::Boolean(b) => Value::Bool(b),
        ExprValue::String(s) => Value::Text(s),
        _ => Value::Null,
    }
}
