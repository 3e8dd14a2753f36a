//! The recalculation controller: owns the live graph and coalesces
//! recalculation requests.

use crate::error::{GraphError, SimulationError};
use crate::formula::Formula;
use crate::model::{Connection, Graph, Module, ModuleId};
use crate::propagate::propagate_seeded;
use crate::simulate::{SimulationResult, simulate};
use crate::trace::{MetricSource, trace_sources};
use crate::value::Value;
use ahash::AHashSet;

/// Owns a live graph and serializes recalculation over it.
///
/// Mutations never recalculate inline; they enqueue a request instead.
/// [`Recalculator::recalculate`] drains the queue with a single propagation
/// pass. Requests queued between two passes are coalesced into one, because
/// back-to-back passes with no intervening mutation produce identical
/// results. A pass runs synchronously under `&mut self`, which makes it
/// naturally non-reentrant, so the API is safe to drive from a deferred
/// callback context.
pub struct Recalculator {
    graph: Graph,
    /// Coalesced pending request: the set of modules whose re-evaluation is
    /// forced on the next pass. `None` means no pass is queued.
    pending: Option<AHashSet<ModuleId>>,
}

impl Recalculator {
    /// Wraps a graph. A freshly loaded graph starts with a pass queued,
    /// since its modules have not been evaluated yet.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            pending: Some(AHashSet::new()),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// True if a mutation has queued a pass that has not run yet.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs at most one propagation pass, covering every request queued
    /// since the previous call. Returns the ids of modules whose outputs
    /// changed; an empty list means nothing changed and the caller can skip
    /// its refresh and persistence work.
    pub fn recalculate(&mut self) -> Vec<ModuleId> {
        let seeds = self.pending.take().unwrap_or_default();
        propagate_seeded(&mut self.graph, &seeds)
    }

    pub fn add_module(&mut self, module: Module) -> Result<(), GraphError> {
        self.graph.add_module(module)?;
        self.queue(None);
        Ok(())
    }

    pub fn remove_module(&mut self, id: &str) -> Option<Module> {
        let removed = self.graph.remove_module(id);
        if removed.is_some() {
            self.queue(None);
        }
        removed
    }

    pub fn connect(&mut self, connection: Connection) -> Result<(), GraphError> {
        self.graph.connect(connection)?;
        self.queue(None);
        Ok(())
    }

    pub fn disconnect(&mut self, id: &str) -> Option<Connection> {
        let removed = self.graph.disconnect(id);
        if removed.is_some() {
            self.queue(None);
        }
        removed
    }

    pub fn set_input(
        &mut self,
        id: &str,
        port: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), GraphError> {
        self.graph.set_input(id, port, value)?;
        self.queue(Some(id));
        Ok(())
    }

    pub fn replace_formula(
        &mut self,
        id: &str,
        formula: Option<Formula>,
    ) -> Result<(), GraphError> {
        self.graph.set_formula(id, formula)?;
        self.queue(Some(id));
        Ok(())
    }

    pub fn reset_inputs(&mut self, id: &str) -> Result<(), GraphError> {
        self.graph.reset_inputs(id)?;
        self.queue(Some(id));
        Ok(())
    }

    /// Read-only what-if run against the current graph state. Pending
    /// requests are not flushed first; the simulation sees the graph as-is.
    pub fn simulate(
        &self,
        target_module: &str,
        target_metric: &str,
        input_module: &str,
        input_port: &str,
        percent_change: f64,
    ) -> Result<SimulationResult, SimulationError> {
        simulate(
            &self.graph,
            target_module,
            target_metric,
            input_module,
            input_port,
            percent_change,
        )
    }

    /// Read-only upstream trace against the current graph state.
    pub fn trace_sources(&self, module_id: &str, metric: &str) -> Vec<MetricSource> {
        trace_sources(&self.graph, module_id, metric)
    }

    fn queue(&mut self, seed: Option<&str>) {
        let pending = self.pending.get_or_insert_with(AHashSet::new);
        if let Some(id) = seed {
            pending.insert(id.to_string());
        }
    }
}
