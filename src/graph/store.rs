//! In-memory link graph
//!
//! One `Graph` holds one domain partition (or the merged global graph):
//! - nodes: ordered set of distinct URLs, in first-seen order
//! - incoming: URL -> Vec<URL> (reverse adjacency, in link order)
//! - out_degree: URL -> number of recorded outgoing links
//! - rank_prev / rank_curr: URL -> probability mass

use super::types::{Edge, Url, ROOT_DOMAIN};
use domainrank_algorithms::Score;
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use thiserror::Error;

/// Ordered node set
pub type NodeSet = IndexSet<Url, FxBuildHasher>;

/// Per-node rank vector
pub type RankMap = FxHashMap<Url, Score>;

/// Structural errors found by [`Graph::validate`]
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Link {from} -> {to}: source has no recorded outgoing links")]
    MissingOutDegree { from: Url, to: Url },

    #[error("Node {0} is referenced but not part of the graph")]
    UnknownNode(Url),

    #[error("Node {0} has no rank")]
    MissingRank(Url),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Link graph of one domain partition
#[derive(Debug, Clone, Default)]
pub struct Graph {
    domain: String,
    nodes: NodeSet,
    incoming: FxHashMap<Url, Vec<Url>>,
    out_degree: FxHashMap<Url, usize>,
    rank_prev: RankMap,
    rank_curr: RankMap,
}

impl Graph {
    /// Create an empty graph for `domain`
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Create an empty graph in the root bucket; used for merged and whole-graph runs
    pub fn global() -> Self {
        Self::new(ROOT_DOMAIN)
    }

    /// Build a graph from every edge of the stream, without any domain filter
    pub fn from_edges<'a>(domain: impl Into<String>, edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut graph = Self::new(domain);
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// Record one link.
    ///
    /// Both endpoints join `nodes` on first sight, the source gains an
    /// out-degree entry and the target gains the source as a predecessor.
    pub fn add_edge(&mut self, edge: &Edge) {
        self.nodes.insert(edge.source.clone());
        self.nodes.insert(edge.target.clone());

        *self.out_degree.entry(edge.source.clone()).or_insert(0) += 1;
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.nodes.contains(url)
    }

    /// Number of recorded links
    pub fn edge_count(&self) -> usize {
        self.out_degree.values().sum()
    }

    /// Predecessors of `url`; empty when it has none
    pub fn incoming(&self, url: &str) -> &[Url] {
        self.incoming.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `url` has an entry in the reverse adjacency
    pub fn has_incoming_entry(&self, url: &str) -> bool {
        self.incoming.contains_key(url)
    }

    /// Recorded out-degree; `None` for nodes never seen as a source
    pub fn out_degree(&self, url: &str) -> Option<usize> {
        self.out_degree.get(url).copied()
    }

    pub fn rank(&self, url: &str) -> Option<Score> {
        self.rank_curr.get(url).copied()
    }

    pub fn ranks(&self) -> &RankMap {
        &self.rank_curr
    }

    pub fn previous_ranks(&self) -> &RankMap {
        &self.rank_prev
    }

    /// Total probability mass of the current ranks
    pub fn rank_sum(&self) -> Score {
        self.rank_curr.values().sum()
    }

    /// Replace both rank vectors. Scores are indexed like `nodes`.
    pub(crate) fn store_ranks(&mut self, current: Vec<Score>, previous: Vec<Score>) {
        self.rank_curr = self.nodes.iter().cloned().zip(current).collect();
        self.rank_prev = self.nodes.iter().cloned().zip(previous).collect();
    }

    /// Current ranks as a vector indexed like `nodes`, zero where unset
    pub(crate) fn rank_vector(&self) -> Vec<Score> {
        self.nodes
            .iter()
            .map(|url| self.rank_curr.get(url).copied().unwrap_or(0.0))
            .collect()
    }

    /// Add a node; false when it was already present
    pub(crate) fn insert_node(&mut self, url: Url) -> bool {
        self.nodes.insert(url)
    }

    pub(crate) fn extend_incoming(&mut self, url: &Url, sources: &[Url]) {
        self.incoming
            .entry(url.clone())
            .or_default()
            .extend_from_slice(sources);
    }

    pub(crate) fn set_out_degree(&mut self, url: &Url, degree: usize) {
        self.out_degree.insert(url.clone(), degree);
    }

    pub(crate) fn set_rank(&mut self, url: &Url, rank: Score) {
        self.rank_curr.insert(url.clone(), rank);
    }

    /// Check the structural invariants the rank kernel relies on.
    ///
    /// Every predecessor must be a node with at least one recorded outgoing
    /// link, and every incoming entry must be keyed by a node. Ranks are only
    /// checked once they have been computed.
    pub fn validate(&self) -> GraphResult<()> {
        for (target, sources) in &self.incoming {
            if !self.nodes.contains(target) {
                return Err(GraphError::UnknownNode(target.clone()));
            }
            for source in sources {
                if !self.nodes.contains(source) {
                    return Err(GraphError::UnknownNode(source.clone()));
                }
                if self.out_degree(source).unwrap_or(0) == 0 {
                    return Err(GraphError::MissingOutDegree {
                        from: source.clone(),
                        to: target.clone(),
                    });
                }
            }
        }

        if !self.rank_curr.is_empty() {
            if let Some(url) = self.nodes.iter().find(|url| !self.rank_curr.contains_key(*url)) {
                return Err(GraphError::MissingRank(url.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_tracks_first_seen_order() {
        let mut graph = Graph::new("x");
        graph.add_edge(&Edge::new("a", "b"));
        graph.add_edge(&Edge::new("c", "a"));
        graph.add_edge(&Edge::new("a", "c"));

        let order: Vec<&str> = graph.nodes().iter().map(Url::as_str).collect();
        assert_eq!(order, vec!["a", "b", "c"]);

        assert_eq!(graph.out_degree("a"), Some(2));
        assert_eq!(graph.out_degree("c"), Some(1));
        assert_eq!(graph.out_degree("b"), None);
        assert_eq!(graph.incoming("a"), &[Url::new("c")]);
        assert!(graph.incoming("missing").is_empty());
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_duplicate_links_count_twice() {
        let mut graph = Graph::global();
        graph.add_edge(&Edge::new("a", "b"));
        graph.add_edge(&Edge::new("a", "b"));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.out_degree("a"), Some(2));
        assert_eq!(graph.incoming("b").len(), 2);
    }

    #[test]
    fn test_validate_detects_missing_out_degree() {
        let mut graph = Graph::global();
        let a = Url::new("a");
        let b = Url::new("b");
        graph.insert_node(a.clone());
        graph.insert_node(b.clone());
        graph.extend_incoming(&b, &[a.clone()]);

        assert_eq!(
            graph.validate(),
            Err(GraphError::MissingOutDegree { from: a, to: b })
        );
    }

    #[test]
    fn test_store_ranks_follows_node_order() {
        let mut graph = Graph::from_edges("x", &[Edge::new("a", "b"), Edge::new("b", "a")]);
        graph.store_ranks(vec![0.25, 0.75], vec![0.5, 0.5]);

        assert_eq!(graph.rank("a"), Some(0.25));
        assert_eq!(graph.rank("b"), Some(0.75));
        assert_eq!(graph.previous_ranks().get("b"), Some(&0.5));
        assert_eq!(graph.rank_vector(), vec![0.25, 0.75]);
        assert!((graph.rank_sum() - 1.0).abs() < 1e-6);
    }
}
