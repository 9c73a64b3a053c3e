//! Core type definitions for the link graph

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Domain key of the root bucket (the bare root host and every URL without a domain)
pub const ROOT_DOMAIN: &str = "";

/// A node of the link graph
///
/// Identity is the verbatim URL string; no normalization is applied. Cloning
/// is cheap, so the same URL can key every per-node map of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Url(Arc<str>);

impl Url {
    pub fn new(url: impl AsRef<str>) -> Self {
        Url(Arc::from(url.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Url {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Url {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Url {
    fn from(s: &str) -> Self {
        Url::new(s)
    }
}

impl From<String> for Url {
    fn from(s: String) -> Self {
        Url(Arc::from(s))
    }
}

/// A directed link `source -> target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: Url,
    pub target: Url,
}

impl Edge {
    pub fn new(source: impl Into<Url>, target: impl Into<Url>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
