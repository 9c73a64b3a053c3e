//! Shared utilities for the rank kernel
//!
//! Provides a read-only, dense view of the link topology for algorithm execution.

/// Probability mass carried by one node.
#[cfg(not(feature = "f64"))]
pub type Score = f32;

/// Probability mass carried by one node.
#[cfg(feature = "f64")]
pub type Score = f64;

/// A dense, integer-indexed view of the reverse adjacency in Compressed Sparse Row form.
///
/// Only what power iteration reads is kept: predecessors and the recorded
/// out-degree of every node. The out-degree is stored rather than derived from
/// the edges because a merged graph may remember links whose targets it no
/// longer contains.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,

    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Recorded out-degree per node; zero for nodes never seen as a source
    pub out_degrees: Vec<usize>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_degrees[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Build a view from per-node predecessor lists and out-degrees.
    ///
    /// `incoming[i]` lists the sources pointing at node `i`, in the order the
    /// links were recorded.
    pub fn from_incoming(incoming: Vec<Vec<usize>>, out_degrees: Vec<usize>) -> Self {
        let node_count = incoming.len();
        debug_assert_eq!(node_count, out_degrees.len());

        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::with_capacity(incoming.iter().map(Vec::len).sum());

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            in_offsets,
            in_sources,
            out_degrees,
        }
    }

    /// Helper to create a view from an arc list over `0..node_count` (test/bench support)
    pub fn from_arcs(node_count: usize, arcs: &[(usize, usize)]) -> Self {
        let mut incoming = vec![Vec::new(); node_count];
        let mut out_degrees = vec![0; node_count];
        for &(src, dst) in arcs {
            incoming[dst].push(src);
            out_degrees[src] += 1;
        }
        Self::from_incoming(incoming, out_degrees)
    }

    /// Number of recorded links
    pub fn arc_count(&self) -> usize {
        self.in_sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_from_arcs() {
        // 0 -> 1, 0 -> 2, 2 -> 1
        let view = GraphView::from_arcs(3, &[(0, 1), (0, 2), (2, 1)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.arc_count(), 3);
        assert_eq!(view.predecessors(1), &[0, 2]);
        assert_eq!(view.predecessors(2), &[0]);
        assert!(view.predecessors(0).is_empty());

        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.out_degree(1), 0);
        assert_eq!(view.in_degree(1), 2);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::from_incoming(Vec::new(), Vec::new());
        assert_eq!(view.node_count, 0);
        assert_eq!(view.in_offsets, vec![0]);
    }
}
