//! Maximal clique enumeration on undirected graphs and the selection of
//! maximum cliques of a multigraph.
//!
//! Exact enumeration is Bron–Kerbosch backtracking, see
//! <https://en.wikipedia.org/wiki/Bron%E2%80%93Kerbosch_algorithm>.
//! The approximation grows one greedy clique per vertex.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::graph::{DirectedGraph, Multigraph, Multiplicity, Node, UndirectedGraph};
use crate::util::{difference_sorted, intersect_sorted, random_perm_without, with_inserted};

pub type Clique = BTreeSet<Node>;
pub type Cliques = BTreeSet<Clique>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliqueAlgorithm {
    /// BronKerbosch1: every vertex of P is branched on.
    Plain,
    /// BronKerbosch2 with the pivot u in P ∪ X maximizing |P ∩ N(u)|.
    /// Same output as `Plain`, fewer branches.
    #[default]
    Pivot,
}

struct Enumeration {
    /// sorted, without the vertex itself
    neighborhoods: Vec<Vec<Node>>,
    found: Cliques,
}

impl Enumeration {
    fn report(&mut self, r: &[Node]) {
        self.found.insert(r.iter().copied().collect());
    }

    fn adjacent(&self, u: Node, v: Node) -> bool {
        self.neighborhoods[v as usize].binary_search(&u).is_ok()
    }

    // algorithm BronKerbosch1(R, P, X) is
    // if P and X are both empty then
    //     report R as a maximal clique
    // for each vertex v in P do
    //     BronKerbosch1(R ⋃ {v}, P ⋂ N(v), X ⋂ N(v))
    //     P := P \ {v}
    //     X := X ⋃ {v}
    fn bron_kerbosch(&mut self, r: &[Node], p: &[Node], x: &[Node]) {
        if p.is_empty() && x.is_empty() {
            self.report(r);
            return;
        }
        let mut x = x.to_vec();
        for (i, &v) in p.iter().enumerate() {
            // p[..=i] has been moved to X already
            let newp = intersect_sorted(&p[i + 1..], &self.neighborhoods[v as usize]);
            let newx: Vec<Node> = x.iter().copied().filter(|&u| self.adjacent(u, v)).collect();
            self.bron_kerbosch(&with_inserted(r, v), &newp, &newx);
            x.push(v);
        }
    }

    // algorithm BronKerbosch2(R, P, X) is
    // if P and X are both empty then
    //     report R as a maximal clique
    // choose a pivot vertex u in P ⋃ X
    // for each vertex v in P \ N(u) do
    //     BronKerbosch2(R ⋃ {v}, P ⋂ N(v), X ⋂ N(v))
    //     P := P \ {v}
    //     X := X ⋃ {v}
    fn bron_kerbosch_pivot(&mut self, r: &[Node], p: &[Node], x: &[Node]) {
        if p.is_empty() && x.is_empty() {
            self.report(r);
            return;
        }
        let pivot = p
            .iter()
            .chain(x)
            .copied()
            .max_by_key(|&u| (intersect_sorted(p, &self.neighborhoods[u as usize]).len(), Reverse(u)));
        let Some(pivot) = pivot else { return };

        let mut p = p.to_vec();
        let mut x = x.to_vec();
        for v in difference_sorted(&p, &self.neighborhoods[pivot as usize]) {
            let newp = intersect_sorted(&p, &self.neighborhoods[v as usize]);
            let newx: Vec<Node> = x.iter().copied().filter(|&u| self.adjacent(u, v)).collect();
            self.bron_kerbosch_pivot(&with_inserted(r, v), &newp, &newx);
            p.retain(|&u| u != v);
            x.push(v);
        }
    }
}

impl UndirectedGraph {
    /// All maximal cliques. A graph without vertices has none, a graph
    /// without edges has one singleton per vertex.
    ///
    /// ```
    /// use multidigraph_distance::graph::*;
    /// let g = Multigraph::from_rows(&[vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]]).unwrap();
    /// let cliques = g.reciprocal_undirected().maximal_cliques();
    /// assert_eq!(cliques.len(), 2);
    /// ```
    pub fn maximal_cliques(&self) -> Cliques {
        self.maximal_cliques_with(CliqueAlgorithm::default())
    }

    #[instrument(level = "debug", skip(self), fields(nnodes = self.nnodes()))]
    pub fn maximal_cliques_with(&self, algorithm: CliqueAlgorithm) -> Cliques {
        if self.nnodes() == 0 {
            return Cliques::new();
        }
        let mut enumeration = Enumeration {
            neighborhoods: self.iter_nodes().map(|v| self.neighborhood(v).collect()).collect(),
            found: Cliques::new(),
        };
        let p: Vec<Node> = self.iter_nodes().collect();
        match algorithm {
            CliqueAlgorithm::Plain => enumeration.bron_kerbosch(&[], &p, &[]),
            CliqueAlgorithm::Pivot => enumeration.bron_kerbosch_pivot(&[], &p, &[]),
        }
        debug!(cliques = enumeration.found.len(), "maximal cliques enumerated");
        enumeration.found
    }

    /// Grows a maximal clique from `seed`, trying the other vertices in
    /// random order.
    pub fn greedy_maximal_clique<R: Rng + ?Sized>(&self, seed: Node, rng: &mut R) -> Clique {
        let mut clique = vec![seed];
        for u in random_perm_without(self.nnodes(), seed, rng) {
            if clique.iter().all(|&c| self.adjacent(u, c)) {
                clique.push(u);
            }
        }
        clique.into_iter().collect()
    }

    /// One greedy maximal clique per vertex. Not guaranteed to contain a
    /// maximum clique.
    pub fn approximate_maximal_cliques<R: Rng + ?Sized>(&self, rng: &mut R) -> Cliques {
        let cliques: Cliques = self.iter_nodes().map(|v| self.greedy_maximal_clique(v, rng)).collect();
        debug!(nnodes = self.nnodes(), cliques = cliques.len(), "greedy cliques built");
        cliques
    }
}

/// Keeps the cliques with the most vertices, then among those the ones
/// inducing the most edges of `graph` (multiplicities counted).
pub fn select_maximum(cliques: &Cliques, graph: &Multigraph) -> Result<Cliques> {
    let max_order = cliques.iter().map(Clique::len).max().ok_or(Error::EmptyResult)?;

    let mut best = Cliques::new();
    let mut best_count: Option<Multiplicity> = None;
    for clique in cliques.iter().filter(|c| c.len() == max_order) {
        let count = graph.induced_edge_count(clique.iter().copied())?;
        match best_count {
            Some(b) if count < b => continue,
            Some(b) if count == b => {}
            _ => {
                best.clear();
                best_count = Some(count);
            }
        }
        best.insert(clique.clone());
    }
    Ok(best)
}

impl Multigraph {
    /// maximal cliques of the embedded reciprocal undirected graph
    pub fn maximal_cliques(&self) -> Cliques {
        self.reciprocal_undirected().maximal_cliques()
    }

    /// Fails with [`Error::EmptyResult`] on a graph without vertices.
    pub fn maximum_cliques(&self) -> Result<Cliques> {
        select_maximum(&self.maximal_cliques(), self)
    }

    pub fn approximate_maximal_cliques<R: Rng + ?Sized>(&self, rng: &mut R) -> Cliques {
        self.reciprocal_undirected().approximate_maximal_cliques(rng)
    }

    pub fn approximate_maximum_cliques<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Cliques> {
        select_maximum(&self.approximate_maximal_cliques(rng), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array2};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use rstest::rstest;

    fn cliques(cs: &[&[Node]]) -> Cliques {
        cs.iter().map(|c| c.iter().copied().collect()).collect()
    }

    fn undirected(m: Array2<i32>) -> UndirectedGraph {
        UndirectedGraph::from_matrix(&m.mapv(|v| v != 0)).unwrap()
    }

    fn multigraph(m: Array2<i64>) -> Multigraph {
        Multigraph::new(m.view(), true).unwrap()
    }

    /// two 4-cliques {1,2,3,7} and {0,4,5,6}; 2 -- 4 as well when `bridge`
    fn gengraph(bridge: bool, w37: i64) -> Multigraph {
        multigraph(arr2(&[
            [0, 0, 0, 0, 1, 1, 1, 0],
            [0, 0, 1, 1, 0, 0, 0, 1],
            [0, 1, 0, 2, 1, 0, 0, 2],
            [0, 3, 1, 0, 0, 0, 0, w37],
            [1, 0, bridge as i64, 0, 0, 3, 1, 0],
            [1, 0, 0, 0, 1, 0, 1, 0],
            [1, 0, 0, 0, 1, 3, 0, 0],
            [0, 1, 1, 1, 0, 0, 0, 0],
        ]))
    }

    fn sym6() -> UndirectedGraph {
        undirected(arr2(&[
            [0, 1, 0, 0, 1, 0],
            [1, 0, 1, 0, 1, 0],
            [0, 1, 0, 1, 0, 0],
            [0, 0, 1, 0, 1, 1],
            [1, 1, 0, 1, 0, 0],
            [0, 0, 0, 1, 0, 0],
        ]))
    }

    fn disconnected12() -> UndirectedGraph {
        let mut m = Array2::<i32>::zeros((12, 12));
        let edges: [(usize, usize); 20] = [
            (0, 1), (0, 2), (1, 2), (2, 3),
            (3, 4), (3, 5), (3, 6), (4, 5), (4, 6), (5, 6),
            (7, 8), (7, 9), (7, 10), (7, 11), (8, 9), (8, 10), (8, 11), (9, 10), (9, 11), (10, 11),
        ];
        for (a, b) in edges {
            m[(a, b)] = 1;
            m[(b, a)] = 1;
        }
        undirected(m)
    }

    #[rstest]
    #[case::plain(CliqueAlgorithm::Plain)]
    #[case::pivot(CliqueAlgorithm::Pivot)]
    fn find_cliques(#[case] algorithm: CliqueAlgorithm) {
        assert_eq!(
            sym6().maximal_cliques_with(algorithm),
            cliques(&[&[0, 1, 4], &[1, 2], &[2, 3], &[3, 4], &[3, 5]])
        );
        assert_eq!(
            disconnected12().maximal_cliques_with(algorithm),
            cliques(&[&[2, 3], &[0, 1, 2], &[3, 4, 5, 6], &[7, 8, 9, 10, 11]])
        );
    }

    #[test]
    fn multigraph_maximal_cliques() {
        let g = gengraph(true, 2);
        assert_eq!(g.maximal_cliques(), cliques(&[&[1, 2, 3, 7], &[0, 4, 5, 6], &[2, 4]]));
        assert_eq!(g.maximum_cliques().unwrap(), cliques(&[&[1, 2, 3, 7]]));
    }

    #[test]
    fn maximum_cliques_break_ties_by_edges() {
        // 17 edges inside {1,2,3,7} against 16 inside {0,4,5,6}
        let g = gengraph(false, 2);
        assert_eq!(g.maximal_cliques(), cliques(&[&[1, 2, 3, 7], &[0, 4, 5, 6]]));
        assert_eq!(g.maximum_cliques().unwrap(), cliques(&[&[1, 2, 3, 7]]));
    }

    #[test]
    fn maximum_cliques_keep_full_ties() {
        let g = gengraph(false, 1);
        assert_eq!(g.maximum_cliques().unwrap(), cliques(&[&[1, 2, 3, 7], &[0, 4, 5, 6]]));
    }

    #[test]
    fn whole_graph_is_maximum_clique() {
        let g = multigraph(arr2(&[[0, 1, 1, 3], [1, 0, 2, 1], [1, 1, 0, 1], [1, 1, 1, 0]]));
        assert_eq!(g.maximum_cliques().unwrap(), cliques(&[&[0, 1, 2, 3]]));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    #[case(9)]
    fn complete_graph(#[case] n: usize) {
        let g = multigraph(Array2::from_shape_fn((n, n), |(i, j)| (i != j) as i64));
        let all: Clique = (0..n as Node).collect();
        assert_eq!(g.maximum_cliques().unwrap(), Cliques::from([all]));
    }

    #[test]
    fn edgeless_graph_has_singletons() {
        let g = Multigraph::new(Array2::<i64>::zeros((3, 3)).view(), false).unwrap();
        assert_eq!(g.maximal_cliques(), cliques(&[&[0], &[1], &[2]]));
    }

    #[test]
    fn empty_graph() {
        let g = Multigraph::new(Array2::<i64>::zeros((0, 0)).view(), true).unwrap();
        assert!(g.maximal_cliques().is_empty());
        assert_eq!(g.maximum_cliques(), Err(Error::EmptyResult));
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        assert_eq!(g.approximate_maximum_cliques(&mut rng), Err(Error::EmptyResult));
    }

    #[test]
    fn self_loops_do_not_join_cliques() {
        let g = undirected(arr2(&[[1, 1, 0], [1, 0, 0], [0, 0, 1]]));
        assert_eq!(g.maximal_cliques(), cliques(&[&[0, 1], &[2]]));
    }

    #[test]
    fn approximate_on_disjoint_cliques_is_exact() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let g = gengraph(false, 2);
        assert_eq!(g.approximate_maximal_cliques(&mut rng), g.maximal_cliques());
        assert_eq!(g.approximate_maximum_cliques(&mut rng).unwrap(), cliques(&[&[1, 2, 3, 7]]));
    }

    #[test]
    fn approximate_is_reproducible() {
        let g = disconnected12();
        let a = g.approximate_maximal_cliques(&mut Xoshiro256StarStar::seed_from_u64(11));
        let b = g.approximate_maximal_cliques(&mut Xoshiro256StarStar::seed_from_u64(11));
        assert_eq!(a, b);
    }

    fn is_clique(g: &UndirectedGraph, c: &Clique) -> bool {
        c.iter().all(|&u| c.iter().all(|&v| u == v || g.adjacent(u, v)))
    }

    fn is_maximal(g: &UndirectedGraph, c: &Clique) -> bool {
        is_clique(g, c) && g.iter_nodes().filter(|v| !c.contains(v)).all(|v| c.iter().any(|&u| !g.adjacent(u, v)))
    }

    fn arb_graph() -> impl Strategy<Value = UndirectedGraph> {
        (1usize..10, proptest::collection::vec(any::<bool>(), 100)).prop_map(|(n, bits)| {
            let m = Array2::from_shape_fn((n, n), |(i, j)| i != j && bits[i.min(j) * 10 + i.max(j)]);
            UndirectedGraph::from_matrix(&m).unwrap()
        })
    }

    proptest! {
        #[test]
        fn enumerated_cliques_are_maximal(g in arb_graph()) {
            let plain = g.maximal_cliques_with(CliqueAlgorithm::Plain);
            for c in &plain {
                prop_assert!(is_maximal(&g, c));
            }
            prop_assert_eq!(g.maximal_cliques_with(CliqueAlgorithm::Pivot), plain);
        }

        #[test]
        fn greedy_cliques_are_maximal_and_seeded(g in arb_graph(), seed in any::<u64>()) {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            for v in g.iter_nodes() {
                let c = g.greedy_maximal_clique(v, &mut rng);
                prop_assert!(c.contains(&v));
                prop_assert!(is_maximal(&g, &c));
            }
        }

        #[test]
        fn maximum_is_among_maximal(n in 1usize..8, entries in proptest::collection::vec(0i64..3, 64)) {
            let m = Array2::from_shape_fn((n, n), |(i, j)| entries[i * 8 + j]);
            let g = Multigraph::new(m.view(), false).unwrap();
            let maximal = g.maximal_cliques();
            let maximum = g.maximum_cliques().unwrap();
            let order = maximum.iter().next().map(Clique::len).unwrap();
            for c in &maximum {
                prop_assert!(maximal.contains(c));
            }
            prop_assert!(maximal.iter().all(|c| c.len() <= order));
        }
    }
}
