//! Rank reports
//!
//! Picks the top entries of a ranked graph and renders them as
//! `(<url>, <score>)` pairs, concatenated without separators.

use crate::algo::Score;
use crate::graph::{Graph, Url};
use crate::ingest::DomainExtractor;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// One ranked URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUrl {
    pub url: Url,
    pub score: Score,
}

/// Best entry of one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainLeader {
    pub domain: String,
    #[serde(flatten)]
    pub leader: RankedUrl,
}

/// All ranked nodes, highest score first; ties break on the URL
pub fn ranked(graph: &Graph) -> Vec<RankedUrl> {
    let mut entries: Vec<RankedUrl> = graph
        .ranks()
        .iter()
        .map(|(url, &score)| RankedUrl {
            url: url.clone(),
            score,
        })
        .collect();

    entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.url.cmp(&b.url)));
    entries
}

/// The `k` highest-ranked nodes (fewer if the graph is smaller)
pub fn top_k(graph: &Graph, k: usize) -> Vec<RankedUrl> {
    let mut entries = ranked(graph);
    entries.truncate(k);
    entries
}

/// Highest-ranked node of every owner domain, ordered by domain key
pub fn top_per_domain(graph: &Graph, domains: &DomainExtractor) -> Vec<DomainLeader> {
    let mut leaders: BTreeMap<String, RankedUrl> = BTreeMap::new();

    for entry in ranked(graph) {
        let owner = domains.owner_of(&entry.url);
        if !leaders.contains_key(owner) {
            leaders.insert(owner.to_string(), entry);
        }
    }

    leaders
        .into_iter()
        .map(|(domain, leader)| DomainLeader { domain, leader })
        .collect()
}

/// Render entries as `(<url>, <score>)` with six decimals, no separators
pub fn format_pairs(entries: &[RankedUrl]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "({}, {:.6})", entry.url, entry.score);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::PowerIterationEngine;
    use crate::graph::Edge;

    fn star() -> Graph {
        let mut graph = Graph::from_edges(
            "",
            &[
                Edge::new("http://hub.x.calpoly.edu", "http://a.y.calpoly.edu"),
                Edge::new("http://hub.x.calpoly.edu", "http://b.y.calpoly.edu"),
                Edge::new("http://a.y.calpoly.edu", "http://hub.x.calpoly.edu"),
                Edge::new("http://b.y.calpoly.edu", "http://hub.x.calpoly.edu"),
            ],
        );
        PowerIterationEngine::default().run(&mut graph).unwrap();
        graph
    }

    #[test]
    fn test_top_k_orders_by_score_then_url() {
        let graph = star();
        let top = top_k(&graph, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].url.as_str(), "http://hub.x.calpoly.edu");
        // a and b tie; URL order decides
        assert_eq!(top[1].url.as_str(), "http://a.y.calpoly.edu");

        assert_eq!(top_k(&graph, 10).len(), 3);
    }

    #[test]
    fn test_top_per_domain() {
        let graph = star();
        let leaders = top_per_domain(&graph, &DomainExtractor::default());

        let domains: Vec<&str> = leaders.iter().map(|l| l.domain.as_str()).collect();
        assert_eq!(domains, vec!["x", "y"]);
        assert_eq!(leaders[1].leader.url.as_str(), "http://a.y.calpoly.edu");
    }

    #[test]
    fn test_format_pairs() {
        let entries = vec![
            RankedUrl {
                url: Url::new("http://a.x.calpoly.edu"),
                score: 0.5,
            },
            RankedUrl {
                url: Url::new("http://b.x.calpoly.edu"),
                score: 0.25,
            },
        ];

        assert_eq!(
            format_pairs(&entries),
            "(http://a.x.calpoly.edu, 0.500000)(http://b.x.calpoly.edu, 0.250000)"
        );
        assert_eq!(format_pairs(&[]), "");
    }
}
