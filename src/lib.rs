//! Domainrank
//!
//! PageRank over a crawled web-link graph, computed by domain partitions.
//!
//! # Architecture
//!
//! - [`ingest`]: edge-stream reader and domain extraction
//! - [`graph`]: URL-keyed link graph with reverse adjacency and rank vectors
//! - [`algo`]: power-iteration engine (kernel in `domainrank-algorithms`)
//! - [`sharding`]: domain partitioner, parallel scheduler, graph merger
//! - [`pipeline`]: partition → rank in parallel → merge → refine
//! - [`report`]: top-K and per-domain leaders
//!
//! ## Example Usage
//!
//! ```rust
//! use domainrank::{parse_edge_line, Pipeline, RankConfig};
//!
//! let lines = [
//!     "digraph {",
//!     "http://a.x.calpoly.edu -> http://b.x.calpoly.edu;",
//!     "http://b.x.calpoly.edu -> http://a.x.calpoly.edu;",
//!     "}",
//! ];
//! let edges: Vec<_> = lines.iter().filter_map(|l| parse_edge_line(l)).collect();
//!
//! let pipeline = Pipeline::new(RankConfig::default()).unwrap();
//! let run = pipeline.run(&edges).unwrap();
//! assert_eq!(run.graph.node_count(), 2);
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod sharding;

// Re-export main types for convenience
pub use algo::{
    Convergence, NonConvergencePolicy, PageRankConfig, PartitionReport, PowerIterationEngine, Score,
};
pub use config::{ConfigError, ConfigResult, RankConfig};
pub use error::{RankError, RankResult};
pub use graph::{Edge, Graph, GraphError, GraphResult, Url, ROOT_DOMAIN};
pub use ingest::{
    parse_edge_line, read_edge_file, read_edges, DomainExtractor, IngestError, IngestResult,
};
pub use pipeline::{Pipeline, RankRun};
pub use report::{format_pairs, top_k, top_per_domain, DomainLeader, RankedUrl};
pub use sharding::{
    ConflictPolicy, DomainPartitioner, GraphMerger, MergeScope, ParallelScheduler, RankedPartition,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
