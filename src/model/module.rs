use crate::formula::Formula;
use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};

/// Unique, stable module identifier.
pub type ModuleId = String;

/// Classification tag for a module. The engine never branches on it, with
/// one exception: the sensitivity simulator mirrors a perturbed input into
/// the outputs of an `Input` module, since an input module's output is
/// definitionally a passthrough of its own input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Input,
    Math,
    Logic,
    Transform,
    Filter,
    Output,
    #[serde(other)]
    Custom,
}

/// A unit of computation: named input ports, named output ports, and a
/// formula mapping one to the other.
///
/// Invariant: `outputs` is always the result of applying `formula` to the
/// most recently *evaluated* inputs. Any input mutation leaves the outputs
/// stale and sets `needs_recalculation` until the next propagation pass
/// re-evaluates the module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    #[serde(default)]
    pub inputs: Record,
    /// Derived, never edited directly; written only by the engine.
    #[serde(default)]
    pub outputs: Record,
    /// Snapshot of a "reset" input set, restored by `Graph::reset_inputs`.
    #[serde(default)]
    pub default_inputs: Record,
    /// `None` means the module is a passthrough: evaluation returns the
    /// last-known outputs unchanged.
    #[serde(default)]
    pub formula: Option<Formula>,
    /// True while the cached outputs are stale relative to the current
    /// inputs. Fresh modules start stale: nothing has been evaluated yet.
    #[serde(default = "stale")]
    pub needs_recalculation: bool,
}

fn stale() -> bool {
    true
}

impl Module {
    pub fn new(id: impl Into<ModuleId>, kind: ModuleKind) -> Self {
        Self {
            id: id.into(),
            kind,
            inputs: Record::new(),
            outputs: Record::new(),
            default_inputs: Record::new(),
            formula: None,
            needs_recalculation: true,
        }
    }

    /// Adds an input port with an initial value, also recorded as the
    /// port's default.
    pub fn with_input(mut self, port: impl Into<String>, value: impl Into<Value>) -> Self {
        let port = port.into();
        let value = value.into();
        self.default_inputs.insert(port.clone(), value.clone());
        self.inputs.insert(port, value);
        self
    }

    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }
}
