//! Domain extraction
//!
//! The domain of a URL is the dot-separated segment right before a reserved
//! root label. With the label `calpoly`, `http://a.ceng.calpoly.edu/x` belongs
//! to `ceng` and `https://ceng.calpoly.edu/` does too once the scheme is
//! stripped from the segment.

use crate::graph::ROOT_DOMAIN;

/// Label every host of the crawled site ends with
pub const DEFAULT_ROOT_LABEL: &str = "calpoly";

/// Maps URLs to domain keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainExtractor {
    root_label: String,
}

impl DomainExtractor {
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
        }
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    /// Domain key of `url`, if the root label appears after its first segment.
    ///
    /// The label must match a whole segment, case-sensitively. When it shows
    /// up more than once the first usable occurrence wins.
    pub fn domain_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        let mut previous: Option<&'a str> = None;
        for segment in url.split('.') {
            if segment == self.root_label {
                if let Some(domain) = previous {
                    return Some(strip_scheme(domain));
                }
            }
            previous = Some(segment);
        }
        None
    }

    /// Domain that owns `url`: its domain key, or the root bucket when it has none
    pub fn owner_of<'a>(&self, url: &'a str) -> &'a str {
        self.domain_of(url).unwrap_or(ROOT_DOMAIN)
    }

    /// Whether `url` is owned by `domain`
    pub fn owns(&self, domain: &str, url: &str) -> bool {
        self.owner_of(url) == domain
    }
}

impl Default for DomainExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_LABEL)
    }
}

fn strip_scheme(segment: &str) -> &str {
    segment
        .strip_prefix("https://")
        .or_else(|| segment.strip_prefix("http://"))
        .unwrap_or(segment)
}
