use brandes_batch::{run_forward, Adjacency, BcConfig, Schedule, Sources};
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;

fn to_petgraph(n: usize, edges: &[(usize, usize)]) -> (DiGraph<(), ()>, Vec<NodeIndex>) {
    let mut g = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..n).map(|_| g.add_node(())).collect();
    for &(u, v) in edges {
        g.add_edge(nodes[u], nodes[v], ());
    }
    (g, nodes)
}

fn check_levels(n: usize, edges: &[(usize, usize)], sources: &[usize], schedule: Schedule) {
    let adjacency = Adjacency::from_edges(n, edges).unwrap();
    let (g, nodes) = to_petgraph(n, edges);
    let config = BcConfig::default().with_schedule(schedule);
    let search = run_forward::<f64>(&adjacency, Sources::Nodes(sources), &config).unwrap();

    let mut deepest = 0;
    for (j, &s) in sources.iter().enumerate() {
        let dist = dijkstra(&g, nodes[s], None, |_| 1usize);
        for v in 0..n {
            let reached = dist.get(&nodes[v]).copied();
            assert_eq!(
                search.paths.column(j).has_path(v),
                reached.is_some(),
                "reachability of {v} from {s}"
            );
            for level in 0..search.history.count() {
                let listed = search.history[level].contains(v, j);
                assert_eq!(listed, reached == Some(level + 1), "{v} at level {level} from {s}");
            }
            deepest = deepest.max(reached.unwrap_or(0));
        }
    }
    assert_eq!(search.history.count(), deepest);
    assert_eq!(search.report.depth, deepest);
}

#[test]
fn levels_of_a_branching_graph() {
    let edges = [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 1), (5, 0)];
    check_levels(6, &edges, &[0, 5, 3], Schedule::Heuristic);
    check_levels(6, &edges, &[0, 5, 3], Schedule::Compare);
}

proptest! {
    #[test]
    fn test_levels_match_bfs_distances(
        (n, edges) in (1usize..16).prop_flat_map(|n| {
            (Just(n), proptest::collection::vec((0..n, 0..n), 0..(3 * n)))
        }),
        stride in 1usize..4,
    ) {
        let sources: Vec<usize> = (0..n).step_by(stride).collect();
        check_levels(n, &edges, &sources, Schedule::Push);
        check_levels(n, &edges, &sources, Schedule::Pull);
    }
}
