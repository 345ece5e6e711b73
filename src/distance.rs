//! Distances derived from the size of the maximum common subgraph.
//!
//! With `(V, E)` the size of a graph, the distance of `g1` and `g2` is
//! `1 - |sub| / max(|g1|, |g2|)` where `|.|` is the L1 or L2 norm of the
//! size pair and `sub` is the first maximum common subgraph found.

use std::time::{Duration, Instant};

use clap::ArgEnum;
use tracing::instrument;

use crate::graph::Multigraph;
use crate::subgraph::{maximum_common_subgraphs, CliqueStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ArgEnum)]
pub enum Norm {
    #[default]
    L1,
    L2,
}

impl Norm {
    /// norm of a (vertices, edges) pair
    pub fn of(self, (nodes, edges): (usize, u64)) -> f64 {
        let (v, e) = (nodes as f64, edges as f64);
        match self {
            Norm::L1 => v + e,
            Norm::L2 => (v * v + e * e).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub value: f64,
    /// wall clock time of the whole common subgraph search
    pub search_time: Duration,
}

/// `None` if no common subgraph exists, i.e. one of the graphs has no edges.
#[instrument(level = "debug", skip(first, second))]
pub fn distance(first: &Multigraph, second: &Multigraph, norm: Norm, strategy: &CliqueStrategy) -> Option<Distance> {
    let start = Instant::now();
    let search = maximum_common_subgraphs(first, second, strategy);
    let search_time = start.elapsed();
    let common = search.first()?;
    let value = 1.0 - norm.of(common.size()) / norm.of(first.size()).max(norm.of(second.size()));
    Some(Distance { value, search_time })
}

pub fn distance_l1(first: &Multigraph, second: &Multigraph) -> Option<Distance> {
    distance(first, second, Norm::L1, &CliqueStrategy::default())
}

pub fn distance_l2(first: &Multigraph, second: &Multigraph) -> Option<Distance> {
    distance(first, second, Norm::L2, &CliqueStrategy::default())
}

pub fn approximate_distance_l1(first: &Multigraph, second: &Multigraph, seed: u64) -> Option<Distance> {
    distance(first, second, Norm::L1, &CliqueStrategy::Approximate { seed })
}

pub fn approximate_distance_l2(first: &Multigraph, second: &Multigraph, seed: u64) -> Option<Distance> {
    distance(first, second, Norm::L2, &CliqueStrategy::Approximate { seed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array2};
    use rstest::rstest;

    fn multigraph(m: Array2<i64>) -> Multigraph {
        Multigraph::new(m.view(), true).unwrap()
    }

    fn g3_1() -> Multigraph {
        multigraph(arr2(&[[0, 1, 0], [1, 0, 2], [1, 0, 0]]))
    }

    fn g3_2() -> Multigraph {
        multigraph(arr2(&[[0, 2, 1], [1, 0, 0], [0, 5, 0]]))
    }

    #[rstest]
    #[case(Norm::L1, (3, 4), 7.0)]
    #[case(Norm::L2, (3, 4), 5.0)]
    #[case(Norm::L2, (0, 0), 0.0)]
    fn norms(#[case] norm: Norm, #[case] size: (usize, u64), #[case] expected: f64) {
        assert_eq!(norm.of(size), expected);
    }

    #[rstest]
    #[case(Norm::L1)]
    #[case(Norm::L2)]
    fn distance_to_self_is_zero(#[case] norm: Norm) {
        let g = g3_1();
        let d = distance(&g, &g, norm, &CliqueStrategy::default()).unwrap();
        assert_eq!(d.value, 0.0);
    }

    #[test]
    fn known_distances() {
        // common subgraph (3, 4), g1 is (3, 5), g2 is (3, 9)
        let l1 = distance_l1(&g3_1(), &g3_2()).unwrap();
        assert!((l1.value - (1.0 - 7.0 / 12.0)).abs() < 1e-12);
        let l2 = distance_l2(&g3_1(), &g3_2()).unwrap();
        assert!((l2.value - (1.0 - 5.0 / 90f64.sqrt())).abs() < 1e-12);
        assert_eq!(distance_l1(&g3_2(), &g3_1()).unwrap().value, l1.value);
    }

    #[test]
    fn no_edges_no_distance() {
        let edgeless = Multigraph::new(Array2::<i64>::zeros((4, 4)).view(), false).unwrap();
        assert_eq!(distance_l1(&g3_1(), &edgeless), None);
        assert_eq!(approximate_distance_l2(&edgeless, &g3_1(), 3), None);
    }

    #[test]
    fn approximate_distance_is_not_smaller() {
        let exact = distance_l1(&g3_1(), &g3_2()).unwrap().value;
        for seed in 0..5 {
            if let Some(d) = approximate_distance_l1(&g3_1(), &g3_2(), seed) {
                assert!(d.value >= exact - 1e-12);
                assert!(d.value <= 1.0);
            }
        }
    }
}
