//! Rank computation
//!
//! The kernel lives in the `domainrank-algorithms` crate and works on dense
//! indices. This module provides the integration layer: it projects a
//! URL-keyed [`Graph`] onto a [`GraphView`] and writes the scores back.

pub mod pagerank;

use crate::graph::Graph;
use domainrank_algorithms::GraphView;

// Re-export algorithms
pub use domainrank_algorithms::{
    l1_distance, normalize, page_rank, page_rank_seeded, power_step, Convergence, PageRankConfig,
    PageRankResult, Score,
};
pub use pagerank::{NonConvergencePolicy, PartitionReport, PowerIterationEngine};

/// Build a GraphView of `graph` for algorithm execution.
///
/// Node `i` of the view is the `i`-th node of `graph` in insertion order.
/// Predecessors that are not nodes of the graph are dropped.
pub fn build_view(graph: &Graph) -> GraphView {
    let nodes = graph.nodes();

    let mut incoming: Vec<Vec<usize>> = Vec::with_capacity(nodes.len());
    let mut out_degrees = Vec::with_capacity(nodes.len());

    for url in nodes {
        incoming.push(
            graph
                .incoming(url)
                .iter()
                .filter_map(|source| nodes.get_index_of(source))
                .collect(),
        );
        out_degrees.push(graph.out_degree(url).unwrap_or(0));
    }

    GraphView::from_incoming(incoming, out_degrees)
}
