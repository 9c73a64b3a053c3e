//! Parallel scheduler
//!
//! Ranks every partition on its own task and joins on all of them before
//! returning. Each task takes ownership of its graph and hands it back, so
//! nothing is shared between tasks and no locks are needed. Results come back
//! in input order whatever order the tasks finish in.

use crate::algo::{PartitionReport, PowerIterationEngine};
use crate::error::{RankError, RankResult};
use crate::graph::Graph;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// A partition after its engine run
#[derive(Debug, Clone)]
pub struct RankedPartition {
    pub graph: Graph,
    pub report: PartitionReport,
}

/// Fan-out/fan-in runner for partition engines
#[derive(Debug, Clone, Default)]
pub struct ParallelScheduler {
    engine: PowerIterationEngine,
    threads: Option<usize>,
}

impl ParallelScheduler {
    /// `threads` sizes a dedicated pool; `None` uses the global rayon pool.
    pub fn new(engine: PowerIterationEngine, threads: Option<usize>) -> Self {
        Self { engine, threads }
    }

    /// Rank all partitions concurrently.
    ///
    /// Fails as soon as one partition fails; no partial results are returned.
    pub fn run(&self, partitions: Vec<Graph>) -> RankResult<Vec<RankedPartition>> {
        let started = Instant::now();
        let count = partitions.len();

        let task = |mut graph: Graph| -> RankResult<RankedPartition> {
            let report = self.engine.run(&mut graph)?;
            Ok(RankedPartition { graph, report })
        };

        let ranked: RankResult<Vec<RankedPartition>> = match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("domainrank-worker-{}", i))
                    .build()
                    .map_err(|e| RankError::ThreadPool(e.to_string()))?;

                pool.install(|| partitions.into_par_iter().map(task).collect())
            }
            None => partitions.into_par_iter().map(task).collect(),
        };
        let ranked = ranked?;

        let timed_out = ranked.iter().filter(|p| p.report.timed_out()).count();
        if timed_out > 0 {
            warn!("{} of {} partitions timed out", timed_out, count);
        }
        info!("Ranked {} partitions in {:?}", count, started.elapsed());

        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{Convergence, NonConvergencePolicy, PageRankConfig};
    use crate::graph::Edge;
    use std::time::Duration;

    fn partitions() -> Vec<Graph> {
        vec![
            Graph::from_edges("a", &[Edge::new("a1", "a2"), Edge::new("a2", "a1")]),
            Graph::new("empty"),
            Graph::from_edges(
                "b",
                &[Edge::new("b1", "b2"), Edge::new("b1", "b3"), Edge::new("b2", "b1"), Edge::new("b3", "b1")],
            ),
        ]
    }

    #[test]
    fn test_results_keep_input_order() {
        for threads in [None, Some(1), Some(4)] {
            let scheduler = ParallelScheduler::new(PowerIterationEngine::default(), threads);
            let ranked = scheduler.run(partitions()).unwrap();

            let domains: Vec<&str> = ranked.iter().map(|p| p.graph.domain()).collect();
            assert_eq!(domains, vec!["a", "empty", "b"]);
            assert!(ranked.iter().all(|p| p.report.is_converged()));
            assert_eq!(ranked[1].report.status, Convergence::Empty);
        }
    }

    #[test]
    fn test_one_failure_fails_the_run() {
        let config = PageRankConfig {
            max_iterations: 1,
            tolerance: 1e-9,
            ..PageRankConfig::default()
        };
        let engine = PowerIterationEngine::new(config, NonConvergencePolicy::Fail);
        let scheduler = ParallelScheduler::new(engine, Some(2));

        // "a" converges in one step, "b" cannot
        let result = scheduler.run(partitions());
        assert!(matches!(result, Err(RankError::NonConvergence { ref domain, .. }) if domain == "b"));
    }

    #[test]
    fn test_timeout_is_not_fatal() {
        let config = PageRankConfig {
            tolerance: 1e-9,
            time_budget: Some(Duration::ZERO),
            ..PageRankConfig::default()
        };
        let engine = PowerIterationEngine::new(config, NonConvergencePolicy::Fail);
        let scheduler = ParallelScheduler::new(engine, None);

        let ranked = scheduler.run(partitions()).unwrap();
        assert!(ranked[2].report.timed_out());
        assert_eq!(ranked[2].graph.ranks().len(), 3);
    }
}
