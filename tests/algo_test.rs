use domainrank::algo::{build_view, Convergence, PageRankConfig};
use domainrank::{Edge, Graph, NonConvergencePolicy, PowerIterationEngine};

fn star() -> Graph {
    // Center -> Bob, Charlie; Bob -> Center; Charlie -> Center
    Graph::from_edges(
        "",
        &[
            Edge::new("center", "bob"),
            Edge::new("center", "charlie"),
            Edge::new("bob", "center"),
            Edge::new("charlie", "center"),
        ],
    )
}

#[test]
fn test_pagerank_star_graph() {
    let mut graph = star();
    let report = PowerIterationEngine::default().run(&mut graph).unwrap();

    assert!(report.is_converged());
    assert_eq!(report.nodes, 3);
    assert_eq!(report.links, 4);

    let center = graph.rank("center").unwrap();
    let bob = graph.rank("bob").unwrap();
    let charlie = graph.rank("charlie").unwrap();

    assert!(center > bob);
    assert!((bob - charlie).abs() < 1e-5);
    assert!((center + bob + charlie - 1.0).abs() < 1e-4);
    // Closed form: c = 0.1/3 + 0.9 * 2b, b = 0.1/3 + 0.9 * c/2
    assert!((center - 0.4912).abs() < 1e-3, "center = {}", center);
}

#[test]
fn test_cycle_is_order_independent() {
    let forward = Graph::from_edges("", &[Edge::new("a", "b"), Edge::new("b", "a")]);
    let backward = Graph::from_edges("", &[Edge::new("b", "a"), Edge::new("a", "b")]);
    let engine = PowerIterationEngine::default();

    for mut graph in [forward, backward] {
        engine.run(&mut graph).unwrap();
        assert!((graph.rank("a").unwrap() - 0.5).abs() < 1e-4);
        assert!((graph.rank("b").unwrap() - 0.5).abs() < 1e-4);
    }
}

#[test]
fn test_previous_vector_is_kept() {
    let mut graph = star();
    PowerIterationEngine::default().run(&mut graph).unwrap();

    assert_eq!(graph.previous_ranks().len(), graph.node_count());
    for (url, &score) in graph.ranks() {
        let previous = graph.previous_ranks()[url];
        assert!((score - previous).abs() < 1e-3);
    }
}

#[test]
fn test_refine_starts_from_stored_ranks() {
    let engine = PowerIterationEngine::default();
    let mut graph = star();
    let first = engine.run(&mut graph).unwrap();
    let second = engine.refine(&mut graph).unwrap();

    // Already at the fixed point: one step is enough
    assert_eq!(second.status.iterations(), 1);
    assert!(first.status.iterations() > 1);
}

#[test]
fn test_iteration_cap_is_reported() {
    let engine = PowerIterationEngine::new(
        PageRankConfig {
            max_iterations: 2,
            ..PageRankConfig::default()
        },
        NonConvergencePolicy::Warn,
    );
    let mut graph = star();
    let report = engine.run(&mut graph).unwrap();

    assert!(matches!(report.status, Convergence::IterationCap { iterations: 2, .. }));
    assert_eq!(graph.ranks().len(), 3);
}

#[test]
fn test_view_matches_graph() {
    let graph = star();
    let view = build_view(&graph);

    assert_eq!(view.node_count, 3);
    assert_eq!(view.arc_count(), 4);
    // "center" was seen first
    assert_eq!(view.out_degree(0), 2);
    assert_eq!(view.in_degree(0), 2);
}
