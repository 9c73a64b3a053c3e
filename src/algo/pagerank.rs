//! Power-iteration engine for one graph
//!
//! Wraps the dense kernel: projects the graph, runs the iteration from the
//! uniform prior (or from the ranks already stored, for the refinement pass
//! after a merge), stores `rank_prev`/`rank_curr` back and reports how the run
//! ended.

use super::build_view;
use crate::error::{RankError, RankResult};
use crate::graph::Graph;
use domainrank_algorithms::{page_rank, page_rank_seeded, Convergence, PageRankConfig};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// What to do when the iteration cap is reached before convergence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonConvergencePolicy {
    /// Keep the best-effort ranks and log a warning
    #[default]
    Warn,
    /// Abort the run with [`RankError::NonConvergence`]
    Fail,
}

/// Outcome of ranking one graph
#[derive(Debug, Clone, Serialize)]
pub struct PartitionReport {
    pub domain: String,
    pub nodes: usize,
    pub links: usize,
    #[serde(flatten)]
    pub status: Convergence,
    /// Wall-clock time spent; diagnostic only
    #[serde(skip)]
    pub elapsed: Duration,
}

impl PartitionReport {
    fn new(graph: &Graph, status: Convergence, elapsed: Duration) -> Self {
        Self {
            domain: graph.domain().to_string(),
            nodes: graph.node_count(),
            links: graph.edge_count(),
            status,
            elapsed,
        }
    }

    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }

    pub fn timed_out(&self) -> bool {
        matches!(self.status, Convergence::TimedOut { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Start {
    Uniform,
    Stored,
}

/// Runs PageRank on a single graph to convergence
#[derive(Debug, Clone, Default)]
pub struct PowerIterationEngine {
    config: PageRankConfig,
    policy: NonConvergencePolicy,
}

impl PowerIterationEngine {
    pub fn new(config: PageRankConfig, policy: NonConvergencePolicy) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &PageRankConfig {
        &self.config
    }

    /// Same engine with a different time budget
    pub fn with_time_budget(&self, time_budget: Option<Duration>) -> Self {
        Self {
            config: PageRankConfig {
                time_budget,
                ..self.config.clone()
            },
            policy: self.policy,
        }
    }

    /// Rank `graph` starting from the uniform prior 1/|nodes|
    pub fn run(&self, graph: &mut Graph) -> RankResult<PartitionReport> {
        self.execute(graph, Start::Uniform)
    }

    /// Rank `graph` starting from the ranks it already holds (renormalized)
    pub fn refine(&self, graph: &mut Graph) -> RankResult<PartitionReport> {
        self.execute(graph, Start::Stored)
    }

    fn execute(&self, graph: &mut Graph, start: Start) -> RankResult<PartitionReport> {
        let started = Instant::now();
        let view = build_view(graph);

        let result = match start {
            Start::Uniform => page_rank(&view, &self.config),
            Start::Stored => page_rank_seeded(&view, &self.config, &graph.rank_vector()),
        };
        graph.store_ranks(result.scores, result.previous);

        let status = result.status;
        let report = PartitionReport::new(graph, status, started.elapsed());
        match status {
            Convergence::Empty => {
                debug!("Partition {:?} is empty, nothing to rank", report.domain);
            }
            Convergence::Converged { iterations, distance } => {
                debug!(
                    "Partition {:?}: {} nodes converged after {} iterations (L1 {}) in {:?}",
                    report.domain, report.nodes, iterations, distance, report.elapsed
                );
            }
            Convergence::IterationCap { iterations, distance } => {
                warn!(
                    "Partition {:?} stopped at the cap of {} iterations (L1 {})",
                    report.domain, iterations, distance
                );
                if self.policy == NonConvergencePolicy::Fail {
                    return Err(RankError::NonConvergence {
                        domain: report.domain,
                        iterations,
                        distance,
                    });
                }
            }
            Convergence::TimedOut { iterations, distance } => {
                warn!(
                    "Partition {:?} timed out after {} iterations (L1 {})",
                    report.domain, iterations, distance
                );
            }
        }

        Ok(report)
    }
}
