pub mod common;
pub mod pagerank;

pub use common::{GraphView, Score};
pub use pagerank::{
    l1_distance, normalize, page_rank, page_rank_seeded, power_step, Convergence,
    PageRankConfig, PageRankResult,
};
