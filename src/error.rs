//! Error types for the ranking pipeline

use crate::algo::Score;
use crate::config::ConfigError;
use crate::graph::{GraphError, Url};
use crate::ingest::IngestError;
use thiserror::Error;

/// Errors that abort a ranking run
#[derive(Error, Debug)]
pub enum RankError {
    /// The edge stream could not be read
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Configuration rejected before the run started
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Iteration cap reached while non-convergence is configured as fatal
    #[error("Partition {domain:?} did not converge after {iterations} iterations (L1 distance {distance})")]
    NonConvergence {
        domain: String,
        iterations: usize,
        distance: Score,
    },

    /// Two partitions own the same node and conflicts are rejected
    #[error("Node {url} is owned by partitions {first:?} and {second:?}")]
    MergeConflict {
        url: Url,
        first: String,
        second: String,
    },

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Merged graph broke a structural invariant
    #[error("Merged graph is inconsistent: {0}")]
    Graph(#[from] GraphError),
}

pub type RankResult<T> = Result<T, RankError>;
