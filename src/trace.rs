//! Upstream metric tracing for the drilldown view.
//!
//! Given a module and one of its metrics, the tracer walks incoming
//! connections backwards and produces a ranked list of upstream
//! contributors. The impact score is a proximity decay heuristic, not a
//! sensitivity measure: immediate neighbors score 100 and the score decays
//! with distance, floored at 10.

use crate::model::{Connection, Graph, ModuleId};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::Serialize;

/// Recursion bound for the backward walk.
pub const MAX_TRACE_DEPTH: usize = 10;

/// One upstream contributor to a traced metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSource {
    pub module: ModuleId,
    pub metric: String,
    /// Proximity heuristic in `[10, 100]`: `max(10, round(100 / (depth + 1)))`.
    pub impact_score: u32,
    /// True only for immediate upstream neighbors of the queried metric.
    pub direct_impact: bool,
    /// `module:metric` chain from the query point down to this source.
    pub path: Vec<String>,
}

/// Traces the upstream sources feeding `metric` on `module_id`, ranked by
/// impact score (descending).
///
/// The walk is bounded by [`MAX_TRACE_DEPTH`] and keeps a per-path visited
/// set keyed by `(module, metric)`, so cyclic graphs terminate while a
/// source reachable through several distinct paths still produces one entry
/// per path. Callers filter and re-sort as needed.
pub fn trace_sources(graph: &Graph, module_id: &str, metric: &str) -> Vec<MetricSource> {
    let mut inbound: AHashMap<&str, Vec<&Connection>> = AHashMap::new();
    for connection in graph.connections() {
        inbound
            .entry(connection.target.as_str())
            .or_default()
            .push(connection);
    }

    let mut visited = AHashSet::new();
    visited.insert((module_id.to_string(), metric.to_string()));
    let path = vec![format!("{}:{}", module_id, metric)];

    let mut sources = Vec::new();
    walk(&inbound, module_id, 0, &visited, &path, &mut sources);
    sources
        .into_iter()
        .sorted_by(|a, b| b.impact_score.cmp(&a.impact_score))
        .collect()
}

fn walk(
    inbound: &AHashMap<&str, Vec<&Connection>>,
    module_id: &str,
    depth: usize,
    visited: &AHashSet<(ModuleId, String)>,
    path: &[String],
    sources: &mut Vec<MetricSource>,
) {
    if depth >= MAX_TRACE_DEPTH {
        return;
    }
    let Some(edges) = inbound.get(module_id) else {
        return;
    };
    for connection in edges {
        let key = (connection.source.clone(), connection.source_port.clone());
        if visited.contains(&key) {
            continue;
        }

        let mut source_path = path.to_vec();
        source_path.push(format!("{}:{}", connection.source, connection.source_port));
        sources.push(MetricSource {
            module: connection.source.clone(),
            metric: connection.source_port.clone(),
            impact_score: impact_at(depth),
            direct_impact: depth == 0,
            path: source_path.clone(),
        });

        let mut branch_visited = visited.clone();
        branch_visited.insert(key);
        walk(
            inbound,
            &connection.source,
            depth + 1,
            &branch_visited,
            &source_path,
            sources,
        );
    }
}

fn impact_at(depth: usize) -> u32 {
    (100.0 / (depth as f64 + 1.0)).round().max(10.0) as u32
}
