//! Edge-stream producers
//!
//! Turns link files into [`Edge`](crate::graph::Edge) streams and maps URLs to
//! the domain that owns them.

pub mod domain;
pub mod edges;

pub use domain::{DomainExtractor, DEFAULT_ROOT_LABEL};
pub use edges::{parse_edge_line, read_edge_file, read_edges, IngestError, IngestResult};
