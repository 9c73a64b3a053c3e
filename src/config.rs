//! Ranking configuration
//!
//! Every tunable of a run, with the defaults of the reference computation
//! (damping 0.9, epsilon 0.0001). Values can be loaded from a YAML file;
//! missing keys keep their defaults.
//!
//! ```yaml
//! damping_factor: 0.85
//! tolerance: 0.00001
//! partition_time_budget_ms: 2000
//! merge_scope: cross_domain
//! ```

use crate::algo::{NonConvergencePolicy, PageRankConfig, PowerIterationEngine, Score};
use crate::ingest::{DomainExtractor, DEFAULT_ROOT_LABEL};
use crate::sharding::{ConflictPolicy, GraphMerger, MergeScope};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Damping factor must be in [0, 1), got {0}")]
    DampingFactor(Score),

    #[error("Tolerance must be a positive number, got {0}")]
    Tolerance(Score),

    #[error("Iteration cap must be at least 1")]
    ZeroIterations,

    #[error("Thread count must be at least 1")]
    ZeroThreads,

    #[error("Root label must not be empty or contain '.'")]
    RootLabel,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration of a ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankConfig {
    /// Weight of following a link vs. jumping to a random node
    pub damping_factor: Score,
    /// Convergence threshold on the L1 distance between successive vectors
    pub tolerance: Score,
    /// Iteration cap for every engine run
    pub max_iterations: usize,
    /// Optional wall-clock budget per partition task
    pub partition_time_budget_ms: Option<u64>,
    /// Worker threads; `None` uses one per core
    pub threads: Option<usize>,
    /// Host label the domain key sits in front of
    pub root_label: String,
    pub conflict_policy: ConflictPolicy,
    pub merge_scope: MergeScope,
    pub non_convergence: NonConvergencePolicy,
    /// Number of entries in the top-K report
    pub top_k: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping_factor: PageRankConfig::DEFAULT_DAMPING_FACTOR,
            tolerance: PageRankConfig::DEFAULT_TOLERANCE,
            max_iterations: PageRankConfig::DEFAULT_MAX_ITERATIONS,
            partition_time_budget_ms: None,
            threads: None,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            conflict_policy: ConflictPolicy::default(),
            merge_scope: MergeScope::default(),
            non_convergence: NonConvergencePolicy::default(),
            top_k: 20,
        }
    }
}

impl RankConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(ConfigError::DampingFactor(self.damping_factor));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ConfigError::Tolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if self.root_label.is_empty() || self.root_label.contains('.') {
            return Err(ConfigError::RootLabel);
        }
        Ok(())
    }

    /// Kernel settings; the time budget only applies to partition tasks
    pub fn page_rank_config(&self) -> PageRankConfig {
        PageRankConfig {
            damping_factor: self.damping_factor,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            time_budget: None,
        }
    }

    pub fn partition_time_budget(&self) -> Option<Duration> {
        self.partition_time_budget_ms.map(Duration::from_millis)
    }

    pub fn engine(&self) -> PowerIterationEngine {
        PowerIterationEngine::new(self.page_rank_config(), self.non_convergence)
    }

    pub fn domain_extractor(&self) -> DomainExtractor {
        DomainExtractor::new(self.root_label.clone())
    }

    pub fn merger(&self) -> GraphMerger {
        GraphMerger::new(self.domain_extractor(), self.conflict_policy, self.merge_scope)
    }
}
