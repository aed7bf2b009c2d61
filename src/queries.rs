use std::sync::Arc;

use anyhow::Context;
use pathgrid_navigation::PathResult;
use tracing::{info, warn};

use crate::settings::QuerySettings;
use crate::world::SharedPathfinder;

/// A finished query together with the request that produced it.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: QuerySettings,
    pub result: PathResult,
}

/// Runs every query on the blocking pool, all under the read lock so they
/// proceed in parallel. Outcomes are returned in the order of `queries`.
///
/// If any query fails, the remaining ones still run to completion and the
/// first failure in `queries` order is returned.
pub async fn run_queries(
    pathfinder: &SharedPathfinder,
    queries: &[QuerySettings],
) -> anyhow::Result<Vec<QueryOutcome>> {
    let handles: Vec<_> = queries
        .iter()
        .cloned()
        .map(|query| {
            let pathfinder = Arc::clone(pathfinder);
            tokio::task::spawn_blocking(move || {
                let result = pathfinder
                    .read()
                    .find_path(query.start, query.goal)
                    .with_context(|| format!("Query {} failed", query.label()))?;
                Ok::<_, anyhow::Error>(QueryOutcome { query, result })
            })
        })
        .collect();

    // Every task is awaited before an error is returned, so none is left
    // running detached.
    let mut outcomes = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for handle in handles {
        match handle.await.context("Query task panicked").and_then(|outcome| outcome) {
            Ok(outcome) => {
                log_outcome(&outcome);
                outcomes.push(outcome);
            }
            Err(e) => {
                warn!("{:#}", e);
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}

fn log_outcome(outcome: &QueryOutcome) {
    let label = outcome.query.label();
    match outcome.result.path() {
        Some(path) => info!(
            query = %label,
            waypoints = path.len(),
            length = outcome.result.length,
            explored = outcome.result.nodes_explored,
            "Path found"
        ),
        None => warn!(
            query = %label,
            explored = outcome.result.nodes_explored,
            "No path"
        ),
    }
}
