//! Domain sharding of the link graph
//!
//! Partitions the edge stream by domain, ranks the partitions in parallel
//! and merges them back into one global graph.

pub mod merger;
pub mod partitioner;
pub mod scheduler;

pub use merger::{ConflictPolicy, GraphMerger, MergeScope};
pub use partitioner::DomainPartitioner;
pub use scheduler::{ParallelScheduler, RankedPartition};
