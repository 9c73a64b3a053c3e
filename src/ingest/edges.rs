//! Edge-stream reader for dot-style link files
//!
//! The crawler writes one `source -> target;` statement per line inside a
//! `digraph { ... }` block. Anything that is not such a statement (the block
//! delimiters, blank lines, stray text) is skipped without complaint.

use crate::graph::Edge;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directed-edge separator
pub const EDGE_SEPARATOR: &str = "->";

/// Errors raised while reading an edge stream
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Parse one line into an edge.
///
/// The line must split on `->` into exactly two tokens that are non-empty
/// after trimming; a trailing `;` on the target is dropped.
pub fn parse_edge_line(line: &str) -> Option<Edge> {
    let mut parts = line.split(EDGE_SEPARATOR);
    let (source, target) = match (parts.next(), parts.next(), parts.next()) {
        (Some(source), Some(target), None) => (source, target),
        _ => return None,
    };

    let source = source.trim();
    let target = target.trim().trim_end_matches(';').trim_end();
    if source.is_empty() || target.is_empty() {
        return None;
    }

    Some(Edge::new(source, target))
}

/// Read every edge from `reader`, skipping lines that are not edges.
///
/// Lines that are not valid UTF-8 are treated like any other malformed line.
/// `origin` names the input in error messages.
pub fn read_edges<R: BufRead>(mut reader: R, origin: &Path) -> IngestResult<Vec<Edge>> {
    let mut edges = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|source| IngestError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }

        if let Some(edge) = std::str::from_utf8(&buf).ok().and_then(parse_edge_line) {
            edges.push(edge);
        }
    }

    debug!("Read {} edges from {}", edges.len(), origin.display());
    Ok(edges)
}

/// Open `path` and read its edges
pub fn read_edge_file(path: impl AsRef<Path>) -> IngestResult<Vec<Edge>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_edges(BufReader::new(file), path)
}
