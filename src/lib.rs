//! # Denpa - Graph Recalculation and What-If Simulation Engine
//!
//! **Denpa** is the recalculation engine behind a node-based module editor:
//! it models a directed graph of computational modules (named input/output
//! ports plus a user-supplied formula), propagates value changes through the
//! graph in dependency order, and answers what-if questions without touching
//! live state.
//!
//! ## Core Workflow
//!
//! 1. **Build a graph**: construct [`model::Module`]s and
//!    [`model::Connection`]s directly, or deserialize a canvas editor export
//!    through [`canvas::CanvasDocument`] and the [`canvas::IntoGraph`] trait.
//! 2. **Wrap it in a controller**: [`engine::Recalculator`] owns the live
//!    graph, queues recalculation requests from mutations, and coalesces
//!    them into single propagation passes.
//! 3. **Recalculate**: each pass walks the modules in topological order,
//!    pipes fresh outputs into downstream inputs, and re-evaluates only what
//!    actually changed. Cycles are tolerated, and a broken formula degrades
//!    that one module instead of halting the pass.
//! 4. **Analyze**: [`simulate::simulate`] perturbs one input by a percentage
//!    on a private copy and reports the impact on a target metric;
//!    [`trace::trace_sources`] ranks the upstream contributors of a metric.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use denpa::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = Graph::new();
//!     graph.add_module(
//!         Module::new("revenue", ModuleKind::Input)
//!             .with_input("revenue", 50_000.0)
//!             .with_formula(Formula::identity()),
//!     )?;
//!     graph.add_module(
//!         Module::new("cost", ModuleKind::Input)
//!             .with_input("cost", 35_000.0)
//!             .with_formula(Formula::identity()),
//!     )?;
//!     graph.add_module(
//!         Module::new("profit", ModuleKind::Math)
//!             .with_formula(Formula::compile("profit = revenue - cost")?),
//!     )?;
//!     graph.connect(Connection::new("e1", "revenue", "revenue", "profit", "revenue"))?;
//!     graph.connect(Connection::new("e2", "cost", "cost", "profit", "cost"))?;
//!
//!     let mut engine = Recalculator::new(graph);
//!     engine.recalculate();
//!     // -> profit outputs { profit: 15000 }
//!
//!     // What happens to profit if revenue grows by 10 percent?
//!     let report = engine.simulate("profit", "profit", "revenue", "revenue", 10.0)?;
//!     println!(
//!         "profit: {} -> {} ({:+.1}%)",
//!         report.target_metric.original_value,
//!         report.target_metric.new_value,
//!         report.target_metric.percent_change,
//!     );
//!
//!     // Where does profit come from?
//!     for source in engine.trace_sources("profit", "profit") {
//!         println!("{}:{} impact {}", source.module, source.metric, source.impact_score);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod engine;
pub mod error;
pub mod eval;
pub mod formula;
pub mod model;
pub mod prelude;
pub mod propagate;
pub mod schedule;
pub mod simulate;
pub mod trace;
pub mod value;
