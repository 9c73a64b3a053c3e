//! Domain partitioner
//!
//! Splits an edge stream into one graph per domain. A link belongs to the
//! partition of its source; the target's domain never matters.

use crate::graph::{Edge, Graph, ROOT_DOMAIN};
use crate::ingest::DomainExtractor;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Builds per-domain graphs from an edge stream
#[derive(Debug, Clone, Default)]
pub struct DomainPartitioner {
    domains: DomainExtractor,
}

impl DomainPartitioner {
    pub fn new(domains: DomainExtractor) -> Self {
        Self { domains }
    }

    pub fn domains(&self) -> &DomainExtractor {
        &self.domains
    }

    /// Every domain key found among link sources, plus the root bucket.
    ///
    /// The set is ordered, which fixes the order partitions are built,
    /// ranked and merged in.
    pub fn discover_domains(&self, edges: &[Edge]) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        keys.insert(ROOT_DOMAIN.to_string());

        for edge in edges {
            if let Some(domain) = self.domains.domain_of(&edge.source) {
                if !keys.contains(domain) {
                    keys.insert(domain.to_string());
                }
            }
        }

        keys
    }

    /// Scan the whole stream and keep the links whose source `domain` owns
    pub fn build_partition(&self, edges: &[Edge], domain: &str) -> Graph {
        let mut graph = Graph::new(domain);

        for edge in edges {
            if self.domains.owns(domain, &edge.source) {
                graph.add_edge(edge);
            }
        }

        debug!(
            "Partition {:?}: {} nodes, {} links",
            domain,
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Discover the domains and build one partition for each, in key order
    pub fn partition(&self, edges: &[Edge]) -> Vec<Graph> {
        let keys = self.discover_domains(edges);
        info!("Discovered {} domains in {} links", keys.len(), edges.len());

        keys.iter()
            .map(|domain| self.build_partition(edges, domain))
            .collect()
    }
}
