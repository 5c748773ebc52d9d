use std::collections::VecDeque;

use brandes_batch::{compute_betweenness, Adjacency, BcConfig, Schedule, Sources};
use proptest::prelude::*;

/// One breadth-first search and dependency sweep per source.
fn reference_betweenness(g: &Adjacency, sources: &[usize]) -> Vec<f64> {
    let n = g.node_count();
    let mut centrality = vec![0.0; n];
    for &s in sources {
        let mut dist = vec![usize::MAX; n];
        let mut sigma = vec![0.0f64; n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::new();
        dist[s] = 0;
        sigma[s] = 1.0;
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in g.out_neighbors(v) {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        for &w in order.iter().rev() {
            for &v in g.in_neighbors(w) {
                if dist[v] != usize::MAX && dist[v] + 1 == dist[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }
    centrality
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let tolerance = 1e-9 * e.abs().max(1.0);
        assert!((a - e).abs() <= tolerance, "node {i}: {a} vs {e}");
    }
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, bool)> {
    (1usize..14).prop_flat_map(|n| {
        (
            Just(n),
            proptest::collection::vec((0..n, 0..n), 0..(3 * n)),
            any::<bool>(),
        )
    })
}

fn build((n, edges, undirected): &(usize, Vec<(usize, usize)>, bool)) -> Adjacency {
    if *undirected {
        Adjacency::undirected(*n, edges).unwrap()
    } else {
        Adjacency::from_edges(*n, edges).unwrap()
    }
}

proptest! {
    #[test]
    fn test_all_sources_matches_reference(spec in graph_strategy()) {
        let g = build(&spec);
        let run = compute_betweenness::<f64>(&g, Sources::All, &BcConfig::default()).unwrap();
        let sources: Vec<usize> = (0..g.node_count()).collect();
        assert_close(&run.centrality, &reference_betweenness(&g, &sources));
        prop_assert!(run.depth <= g.node_count());
    }

    #[test]
    fn test_source_subset_matches_reference(
        spec in graph_strategy(),
        picks in proptest::collection::vec(any::<bool>(), 14),
    ) {
        let g = build(&spec);
        let sources: Vec<usize> = (0..g.node_count()).filter(|&i| picks[i]).collect();
        let run = compute_betweenness::<f64>(&g, Sources::Nodes(&sources), &BcConfig::default())
            .unwrap();
        assert_close(&run.centrality, &reference_betweenness(&g, &sources));
    }

    #[test]
    fn test_schedules_agree_bit_for_bit(spec in graph_strategy(), dense_switch in 0.0f64..=1.0) {
        let g = build(&spec);
        let results: Vec<Vec<f64>> = [Schedule::Push, Schedule::Pull, Schedule::Compare, Schedule::Heuristic]
            .into_iter()
            .map(|schedule| {
                let config = BcConfig::default()
                    .with_schedule(schedule)
                    .with_dense_switch(dense_switch);
                compute_betweenness::<f64>(&g, Sources::All, &config).unwrap().centrality
            })
            .collect();
        for other in &results[1..] {
            prop_assert_eq!(&results[0], other);
        }
    }

    #[test]
    fn test_relabeling_permutes_centrality(
        spec in graph_strategy(),
        seed in any::<u64>(),
    ) {
        let (n, edges, undirected) = &spec;
        let n = *n;

        // Fisher-Yates driven by a small linear congruential sequence.
        let mut perm: Vec<usize> = (0..n).collect();
        let mut state = seed;
        for i in (1..n).rev() {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            #[allow(clippy::cast_possible_truncation)]
            let j = (state >> 33) as usize % (i + 1);
            perm.swap(i, j);
        }

        let relabeled: Vec<(usize, usize)> = edges.iter().map(|&(u, v)| (perm[u], perm[v])).collect();
        let original = build(&spec);
        let permuted = build(&(n, relabeled, *undirected));

        let a = compute_betweenness::<f64>(&original, Sources::All, &BcConfig::default()).unwrap();
        let b = compute_betweenness::<f64>(&permuted, Sources::All, &BcConfig::default()).unwrap();
        let moved: Vec<f64> = (0..n).map(|i| b.centrality[perm[i]]).collect();
        assert_close(&moved, &a.centrality);
        prop_assert_eq!(a.depth, b.depth);
    }

    #[test]
    fn test_single_precision_tracks_double(spec in graph_strategy()) {
        let g = build(&spec);
        let wide = compute_betweenness::<f64>(&g, Sources::All, &BcConfig::default()).unwrap();
        let narrow = compute_betweenness::<f32>(&g, Sources::All, &BcConfig::default()).unwrap();
        for (w, s) in wide.centrality.iter().zip(&narrow.centrality) {
            prop_assert!((w - f64::from(*s)).abs() <= 1e-4 * w.abs().max(1.0));
        }
    }

    #[test]
    fn test_centrality_is_non_negative(spec in graph_strategy()) {
        let g = build(&spec);
        let run = compute_betweenness::<f64>(&g, Sources::All, &BcConfig::default()).unwrap();
        prop_assert!(run.centrality.iter().all(|&c| c >= -1e-12));
    }
}
