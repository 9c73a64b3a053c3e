//! Graph merger
//!
//! Combines ranked partitions into one global graph. A partition only
//! contributes the nodes its own domain owns; foreign link targets that leaked
//! in as bare destinations are filtered out again. The merged ranks are seeded
//! from the partitions and renormalized, ready for a global refinement pass.

use crate::algo::normalize;
use crate::error::{RankError, RankResult};
use crate::graph::{Graph, Url};
use crate::ingest::DomainExtractor;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Resolution when two partitions both own a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Keep the entry of the first partition, silently drop later ones
    #[default]
    FirstWins,
    /// Fail the merge with [`RankError::MergeConflict`]
    Reject,
}

/// Which links survive the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeScope {
    /// Only entries keyed by nodes the partition owns
    #[default]
    Owned,
    /// Also carry links into foreign targets, and targets nobody owns
    CrossDomain,
}

/// Combines partitions into a global graph
#[derive(Debug, Clone, Default)]
pub struct GraphMerger {
    domains: DomainExtractor,
    conflicts: ConflictPolicy,
    scope: MergeScope,
}

impl GraphMerger {
    pub fn new(domains: DomainExtractor, conflicts: ConflictPolicy, scope: MergeScope) -> Self {
        Self {
            domains,
            conflicts,
            scope,
        }
    }

    /// Merge `partitions`, earlier partitions taking precedence
    pub fn merge(&self, partitions: &[Graph]) -> RankResult<Graph> {
        let mut global = Graph::global();
        // Node -> index of the partition that supplied it
        let mut claimed: FxHashMap<Url, usize> = FxHashMap::default();
        let mut dropped = 0usize;

        for (idx, partition) in partitions.iter().enumerate() {
            for url in partition.nodes() {
                if !self.domains.owns(partition.domain(), url) {
                    continue;
                }

                if let Some(&first) = claimed.get(url) {
                    match self.conflicts {
                        ConflictPolicy::FirstWins => {
                            debug!(
                                "Dropping {} from partition {:?}, already owned by {:?}",
                                url,
                                partition.domain(),
                                partitions[first].domain()
                            );
                            dropped += 1;
                            continue;
                        }
                        ConflictPolicy::Reject => {
                            return Err(RankError::MergeConflict {
                                url: url.clone(),
                                first: partitions[first].domain().to_string(),
                                second: partition.domain().to_string(),
                            });
                        }
                    }
                }

                claimed.insert(url.clone(), idx);
                global.insert_node(url.clone());
                if partition.has_incoming_entry(url) {
                    global.extend_incoming(url, partition.incoming(url));
                }
                if let Some(degree) = partition.out_degree(url) {
                    global.set_out_degree(url, degree);
                }
                if let Some(rank) = partition.rank(url) {
                    global.set_rank(url, rank);
                }
            }
        }

        if self.scope == MergeScope::CrossDomain {
            self.merge_foreign_links(partitions, &mut global);
        }

        let mut seed = global.rank_vector();
        if normalize(&mut seed) {
            global.store_ranks(seed, Vec::new());
        }

        info!(
            "Merged {} partitions into {} nodes ({} duplicates dropped)",
            partitions.len(),
            global.node_count(),
            dropped
        );
        Ok(global)
    }

    /// Append the links each partition recorded into targets it does not own.
    ///
    /// Every link lives in exactly one partition (its source's), so appending
    /// never duplicates a link. Only the first partition of each domain
    /// contributes, matching the owned pass.
    fn merge_foreign_links(&self, partitions: &[Graph], global: &mut Graph) {
        let mut seen_domains: FxHashSet<&str> = FxHashSet::default();
        let mut unowned = 0usize;

        for partition in partitions {
            if !seen_domains.insert(partition.domain()) {
                continue;
            }

            for url in partition.nodes() {
                if self.domains.owns(partition.domain(), url) {
                    continue;
                }
                let sources = partition.incoming(url);
                if sources.is_empty() {
                    continue;
                }

                if global.insert_node(url.clone()) {
                    unowned += 1;
                    if let Some(rank) = partition.rank(url) {
                        global.set_rank(url, rank);
                    }
                }
                global.extend_incoming(url, sources);
            }
        }

        debug!("Cross-domain merge added {} unowned targets", unowned);
    }
}
