//! PageRank by power iteration
//!
//! The rank of node *i* is
//!
//! > p(i) = (1 − d) / |V|  +  d · Σ_{j → i} p(j) / |O(j)|
//!
//! where the first term is the random-click probability and the second the
//! prestige collected from the predecessors of *i*. Every step starts from a
//! snapshot of the previous vector, recomputes all nodes, renormalizes the
//! result to sum to one and measures the L1 distance to the snapshot. The loop
//! ends when that distance drops below the tolerance, when the iteration cap
//! is hit, or when the optional time budget runs out; the last two still
//! return the best vector computed so far.

use super::common::{GraphView, Score};
use std::time::{Duration, Instant};

/// PageRank configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankConfig {
    /// Damping factor (weight of following a link)
    pub damping_factor: Score,
    /// Convergence threshold on the L1 distance between successive vectors
    pub tolerance: Score,
    /// Hard cap on the number of steps
    pub max_iterations: usize,
    /// Wall-clock budget for one run, measured from its first step
    pub time_budget: Option<Duration>,
}

impl PageRankConfig {
    pub const DEFAULT_DAMPING_FACTOR: Score = 0.9;
    pub const DEFAULT_TOLERANCE: Score = 0.0001;
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: Self::DEFAULT_DAMPING_FACTOR,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            time_budget: None,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum Convergence {
    /// The graph had no nodes; nothing was computed
    Empty,
    /// The L1 distance dropped below the tolerance
    Converged { iterations: usize, distance: Score },
    /// The iteration cap was reached first
    IterationCap { iterations: usize, distance: Score },
    /// The time budget ran out first
    TimedOut { iterations: usize, distance: Score },
}

impl Convergence {
    /// Empty graphs count as trivially converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Empty | Convergence::Converged { .. })
    }

    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Empty => 0,
            Convergence::Converged { iterations, .. }
            | Convergence::IterationCap { iterations, .. }
            | Convergence::TimedOut { iterations, .. } => iterations,
        }
    }

    /// Last measured L1 distance, if any step ran.
    pub fn distance(&self) -> Option<Score> {
        match *self {
            Convergence::Empty => None,
            Convergence::Converged { distance, .. }
            | Convergence::IterationCap { distance, .. }
            | Convergence::TimedOut { distance, .. } => Some(distance),
        }
    }
}

/// Scores (indexed like the view) together with the way the run ended
#[derive(Debug, Clone)]
pub struct PageRankResult {
    pub scores: Vec<Score>,
    /// Snapshot the last step started from
    pub previous: Vec<Score>,
    pub status: Convergence,
}

impl PageRankResult {
    fn empty() -> Self {
        PageRankResult {
            scores: Vec::new(),
            previous: Vec::new(),
            status: Convergence::Empty,
        }
    }
}

/// Calculate PageRank starting from the uniform vector 1/|V|
pub fn page_rank(view: &GraphView, config: &PageRankConfig) -> PageRankResult {
    let n = view.node_count;

    if n == 0 {
        return PageRankResult::empty();
    }

    iterate(view, config, uniform(n))
}

/// Calculate PageRank starting from `seed`.
///
/// The seed is renormalized first. A seed of the wrong length, or one without
/// any positive mass, falls back to the uniform start.
pub fn page_rank_seeded(view: &GraphView, config: &PageRankConfig, seed: &[Score]) -> PageRankResult {
    let n = view.node_count;

    if n == 0 {
        return PageRankResult::empty();
    }

    let mut scores = if seed.len() == n { seed.to_vec() } else { uniform(n) };
    if !normalize(&mut scores) {
        scores = uniform(n);
    }

    iterate(view, config, scores)
}

/// Apply one update to `ranks`, returning the new vector and its L1 distance from `ranks`.
pub fn power_step(view: &GraphView, damping_factor: Score, ranks: &[Score]) -> (Vec<Score>, Score) {
    let mut next = vec![0.0; view.node_count];
    let distance = step_into(view, damping_factor, ranks, &mut next);
    (next, distance)
}

/// Scale `scores` so they sum to one. Returns false, leaving the slice
/// untouched, when the sum is not a positive finite number.
pub fn normalize(scores: &mut [Score]) -> bool {
    let sum: Score = scores.iter().sum();
    if !(sum > 0.0 && sum.is_finite()) {
        return false;
    }
    for score in scores.iter_mut() {
        *score /= sum;
    }
    true
}

/// L1 norm of the difference of two vectors; `Score::MAX` when the lengths differ.
pub fn l1_distance(a: &[Score], b: &[Score]) -> Score {
    if a.len() != b.len() {
        return Score::MAX;
    }
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

fn uniform(n: usize) -> Vec<Score> {
    vec![1.0 / n as Score; n]
}

fn iterate(view: &GraphView, config: &PageRankConfig, mut scores: Vec<Score>) -> PageRankResult {
    let started = Instant::now();
    let mut previous = vec![0.0; view.node_count];
    let mut iterations = 0;

    let status = loop {
        previous.copy_from_slice(&scores);
        let distance = step_into(view, config.damping_factor, &previous, &mut scores);
        iterations += 1;

        if distance < config.tolerance {
            break Convergence::Converged { iterations, distance };
        }
        if iterations >= config.max_iterations {
            break Convergence::IterationCap { iterations, distance };
        }
        if let Some(budget) = config.time_budget {
            if started.elapsed() >= budget {
                break Convergence::TimedOut { iterations, distance };
            }
        }
    };

    PageRankResult {
        scores,
        previous,
        status,
    }
}

fn step_into(view: &GraphView, d: Score, previous: &[Score], next: &mut [Score]) -> Score {
    let n = view.node_count;
    let random_click = (1.0 - d) * (1.0 / n as Score);

    for (i, slot) in next.iter_mut().enumerate() {
        let mut prestige: Score = 0.0;
        // Every predecessor recorded at least one outgoing link
        for &source_idx in view.predecessors(i) {
            prestige += previous[source_idx] / view.out_degree(source_idx) as Score;
        }
        *slot = random_click + d * prestige;
    }

    normalize(next);
    l1_distance(previous, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sum(scores: &[Score]) -> Score {
        scores.iter().sum()
    }

    #[test]
    fn test_two_node_cycle() {
        let config = PageRankConfig::default();

        // Same cycle, both node orders
        for arcs in [[(0, 1), (1, 0)], [(1, 0), (0, 1)]] {
            let view = GraphView::from_arcs(2, &arcs);
            let result = page_rank(&view, &config);

            assert!(result.status.is_converged());
            assert!((result.scores[0] - 0.5).abs() < 1e-4);
            assert!((result.scores[1] - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_zero_inbound_gets_random_click() {
        // 0 -> 1, 1 -> 2, 2 -> 1: node 0 has no predecessors and no mass leaks
        let view = GraphView::from_arcs(3, &[(0, 1), (1, 2), (2, 1)]);
        let config = PageRankConfig::default();
        let result = page_rank(&view, &config);

        assert!(result.status.is_converged());
        let expected = (1.0 - config.damping_factor) / 3.0;
        assert!((result.scores[0] - expected).abs() < 1e-6);
        assert!(result.scores[1] > result.scores[0]);
    }

    #[test]
    fn test_star_center_ranks_highest() {
        // Center (0) points to leaves, leaves point back
        let view = GraphView::from_arcs(3, &[(0, 1), (0, 2), (1, 0), (2, 0)]);
        let result = page_rank(&view, &PageRankConfig::default());

        assert!(result.scores[0] > result.scores[1]);
        assert!((result.scores[1] - result.scores[2]).abs() < 1e-6);
        assert!((sum(&result.scores) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_graph() {
        let view = GraphView::from_incoming(Vec::new(), Vec::new());
        let result = page_rank(&view, &PageRankConfig::default());

        assert!(result.scores.is_empty());
        assert_eq!(result.status, Convergence::Empty);
        assert!(result.status.is_converged());
    }

    #[test]
    fn test_iteration_cap_returns_best_effort() {
        let view = GraphView::from_arcs(3, &[(0, 1), (0, 2), (1, 0), (2, 0)]);
        let config = PageRankConfig {
            max_iterations: 1,
            tolerance: 1e-12,
            ..PageRankConfig::default()
        };
        let result = page_rank(&view, &config);

        match result.status {
            Convergence::IterationCap { iterations, .. } => assert_eq!(iterations, 1),
            other => panic!("expected iteration cap, got {:?}", other),
        }
        assert!(!result.status.is_converged());
        assert_eq!(result.scores.len(), 3);
        assert!((sum(&result.scores) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_time_budget_expires() {
        let view = GraphView::from_arcs(3, &[(0, 1), (0, 2), (1, 0), (2, 0)]);
        let config = PageRankConfig {
            tolerance: 1e-12,
            time_budget: Some(Duration::ZERO),
            ..PageRankConfig::default()
        };
        let result = page_rank(&view, &config);

        assert!(matches!(result.status, Convergence::TimedOut { iterations: 1, .. }));
    }

    #[test]
    fn test_fixed_point_and_normalization_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = PageRankConfig::default();

        for _ in 0..10 {
            let n = rng.gen_range(2..40);
            let arcs: Vec<(usize, usize)> = (0..n * 3)
                .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
                .collect();
            let view = GraphView::from_arcs(n, &arcs);
            let result = page_rank(&view, &config);

            assert!(result.status.is_converged());
            assert!((sum(&result.scores) - 1.0).abs() < 1e-4);

            let last = result.status.distance().unwrap();
            let (_, distance) = power_step(&view, config.damping_factor, &result.scores);
            assert!((distance - last).abs() < config.tolerance);
        }
    }

    #[test]
    fn test_seed_is_renormalized() {
        let view = GraphView::from_arcs(2, &[(0, 1), (1, 0)]);
        let config = PageRankConfig::default();

        let result = page_rank_seeded(&view, &config, &[3.0, 1.0]);
        assert!(result.status.is_converged());
        assert!((result.scores[0] - 0.5).abs() < 1e-3);

        // No mass and wrong length both fall back to uniform
        let zero = page_rank_seeded(&view, &config, &[0.0, 0.0]);
        assert_eq!(zero.status.iterations(), 1);
        let short = page_rank_seeded(&view, &config, &[1.0]);
        assert_eq!(short.status.iterations(), 1);
    }

    #[test]
    fn test_l1_distance_length_mismatch() {
        assert_eq!(l1_distance(&[0.5], &[0.25, 0.25]), Score::MAX);
        assert!((l1_distance(&[0.5, 0.5], &[0.25, 0.75]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_rejects_zero_mass() {
        let mut scores = vec![0.0, 0.0];
        assert!(!normalize(&mut scores));
        assert_eq!(scores, vec![0.0, 0.0]);
    }
}
