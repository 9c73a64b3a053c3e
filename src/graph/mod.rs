//! Link graph data model
//!
//! A node is a URL taken verbatim, an edge a directed `source -> target`
//! pair. Each [`Graph`] owns its own maps so that partitions can be ranked on
//! different threads without sharing anything.

pub mod store;
pub mod types;

// Re-export main types
pub use store::{Graph, GraphError, GraphResult, NodeSet, RankMap};
pub use types::{Edge, Url, ROOT_DOMAIN};
