//! Maximum common edge-subgraph of two multigraphs.
//!
//! Every pair (edge of the first graph, edge of the second graph) is a vertex
//! of the edge product graph. Two such pairs are joined when the two edges on
//! the first side sit to each other like the two edges on the second side, so
//! a clique is an edge correspondence between both graphs. The cliques are
//! mapped back, the ones that do not describe the same shape on both sides
//! are dropped, and the largest remaining ones by (vertices, edges) win.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;
use std::time::{Duration, Instant};

use indexmap::IndexSet;
use ndarray::Array2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use seahash::SeaHasher;
use tracing::{debug, info, instrument};

use crate::cliques::{Clique, CliqueAlgorithm, Cliques};
use crate::graph::{DirectedGraph, EdgeRecord, Multigraph, Multiplicity, Node, UndirectedGraph};

/// How the cliques of the edge product graph are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliqueStrategy {
    Exact(CliqueAlgorithm),
    /// one greedy clique per product vertex, vertex order drawn from a
    /// Xoshiro256** generator seeded with `seed`
    Approximate { seed: u64 },
}

impl Default for CliqueStrategy {
    fn default() -> Self {
        CliqueStrategy::Exact(CliqueAlgorithm::default())
    }
}

/// The way two distinct edges share endpoints, read from the first edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    HeadHead,
    TailTail,
    HeadTail,
    TailHead,
}

const JUNCTIONS: [Junction; 4] = [Junction::HeadHead, Junction::TailTail, Junction::HeadTail, Junction::TailHead];

impl Junction {
    /// exactly this endpoint is shared, the other two differ
    fn joins(self, e: &EdgeRecord, f: &EdgeRecord) -> bool {
        match self {
            Junction::HeadHead => e.head == f.head && e.tail != f.tail,
            Junction::TailTail => e.tail == f.tail && e.head != f.head,
            Junction::HeadTail => e.head == f.tail && e.tail != f.head,
            Junction::TailHead => e.tail == f.head && e.head != f.tail,
        }
    }
}

/// True if the edge pair `(e1, f1)` of the first graph looks like the edge
/// pair `(e2, f2)` of the second graph: both disjoint, both a 2-cycle, or
/// both sharing exactly one endpoint in the same orientation.
///
/// ```
/// use multidigraph_distance::graph::EdgeRecord;
/// use multidigraph_distance::subgraph::edge_pairs_compatible;
/// let e = |t, h| EdgeRecord::new(t, h);
/// // a path a -> b -> c against a path x -> y -> z
/// assert!(edge_pairs_compatible(&e(0, 1), &e(1, 2), &e(5, 3), &e(3, 4)));
/// // a path against two edges out of the same vertex
/// assert!(!edge_pairs_compatible(&e(0, 1), &e(1, 2), &e(3, 4), &e(3, 5)));
/// ```
pub fn edge_pairs_compatible(e1: &EdgeRecord, f1: &EdgeRecord, e2: &EdgeRecord, f2: &EdgeRecord) -> bool {
    if e1.is_disjoint(f1) && e2.is_disjoint(f2) {
        return true;
    }
    if e1.is_reverse_of(f1) && e2.is_reverse_of(f2) {
        return true;
    }
    JUNCTIONS.iter().any(|j| j.joins(e1, f1) && j.joins(e2, f2))
}

/// Undirected graph on the pairs of `first` and `second` edges.
/// Product vertex `i * second.len() + j` stands for `(first[i], second[j])`.
/// Isolated product vertices stay, each one is a single edge mapping.
pub struct EdgeProduct {
    first: Vec<EdgeRecord>,
    second: Vec<EdgeRecord>,
    graph: UndirectedGraph,
}

impl EdgeProduct {
    pub fn new(first: Vec<EdgeRecord>, second: Vec<EdgeRecord>) -> Self {
        let n2 = second.len();
        let adjacency_lists: Vec<Vec<Node>> = (0..first.len() * n2)
            .into_par_iter()
            .map(|a| {
                let (i, k) = (a / n2, a % n2);
                let mut row = vec![];
                for j in (0..first.len()).filter(|&j| j != i) {
                    for l in (0..n2).filter(|&l| l != k) {
                        if edge_pairs_compatible(&first[i], &first[j], &second[k], &second[l]) {
                            row.push((j * n2 + l) as Node);
                        }
                    }
                }
                row
            })
            .collect();
        let graph = UndirectedGraph::from_adjacency_lists(adjacency_lists);
        EdgeProduct { first, second, graph }
    }

    pub fn graph(&self) -> &UndirectedGraph {
        &self.graph
    }

    /// (first graph edge, second graph edge) of a product vertex
    pub fn decode(&self, v: Node) -> (EdgeRecord, EdgeRecord) {
        let n2 = self.second.len();
        let v = v as usize;
        (self.first[v / n2], self.second[v % n2])
    }

    pub fn cliques(&self, strategy: &CliqueStrategy) -> Cliques {
        match *strategy {
            CliqueStrategy::Exact(algorithm) => self.graph.maximal_cliques_with(algorithm),
            CliqueStrategy::Approximate { seed } => {
                let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
                self.graph.approximate_maximal_cliques(&mut rng)
            }
        }
    }
}

/// One edge of the common subgraph, as seen in both input graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeMatch {
    pub first: EdgeRecord,
    pub second: EdgeRecord,
    pub multiplicity: Multiplicity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexCorrespondence {
    /// index in the common subgraph
    pub local: Node,
    pub first: Node,
    pub second: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonSubgraph {
    subgraph: Multigraph,
    correspondence: Vec<VertexCorrespondence>,
    first_vertices: Vec<Node>,
    second_vertices: Vec<Node>,
    edge_matches: Vec<EdgeMatch>,
    first_nnodes: usize,
    second_nnodes: usize,
}

impl CommonSubgraph {
    /// The common subgraph, vertices numbered like their counterparts in the
    /// first graph (ascending), multiplicities the smaller of both sides.
    pub fn subgraph(&self) -> &Multigraph {
        &self.subgraph
    }

    pub fn size(&self) -> (usize, Multiplicity) {
        self.subgraph.size()
    }

    /// ordered by local index
    pub fn correspondence(&self) -> &[VertexCorrespondence] {
        &self.correspondence
    }

    /// vertices of the first graph covered by the subgraph, ascending
    pub fn first_vertices(&self) -> &[Node] {
        &self.first_vertices
    }

    /// vertices of the second graph covered by the subgraph, ascending
    pub fn second_vertices(&self) -> &[Node] {
        &self.second_vertices
    }

    pub fn edge_matches(&self) -> &[EdgeMatch] {
        &self.edge_matches
    }

    /// matrix of the size of the first graph with only the matched edges
    pub fn first_embedding(&self) -> Array2<Multiplicity> {
        embedding(self.first_nnodes, self.edge_matches.iter().map(|m| (m.first, m.multiplicity)))
    }

    /// matrix of the size of the second graph with only the matched edges
    pub fn second_embedding(&self) -> Array2<Multiplicity> {
        embedding(self.second_nnodes, self.edge_matches.iter().map(|m| (m.second, m.multiplicity)))
    }
}

fn embedding<I: Iterator<Item = (EdgeRecord, Multiplicity)>>(nnodes: usize, edges: I) -> Array2<Multiplicity> {
    let mut matrix = Array2::zeros((nnodes, nnodes));
    for (e, m) in edges {
        matrix[(e.tail as usize, e.head as usize)] = m;
    }
    matrix
}

/// Result of [`maximum_common_subgraphs`]. `subgraphs` is `None` when one of
/// the graphs has no edges; no cliques were searched then and `clique_time`
/// is zero.
#[derive(Debug, Clone)]
pub struct SubgraphSearch {
    pub clique_time: Duration,
    pub subgraphs: Option<Vec<CommonSubgraph>>,
}

impl SubgraphSearch {
    fn none() -> Self {
        SubgraphSearch { clique_time: Duration::ZERO, subgraphs: None }
    }

    pub fn first(&self) -> Option<&CommonSubgraph> {
        self.subgraphs.as_ref().and_then(|s| s.first())
    }
}

/// sorted distinct endpoints of one side of the correspondence
fn side_vertices<F: Fn(&EdgeMatch) -> EdgeRecord>(matches: &[EdgeMatch], side: F) -> IndexSet<Node> {
    let mut vertices: Vec<Node> = matches.iter().map(&side).flat_map(|e| [e.tail, e.head]).collect();
    vertices.sort_unstable();
    vertices.dedup();
    vertices.into_iter().collect()
}

fn side_matrix<F: Fn(&EdgeMatch) -> EdgeRecord>(matches: &[EdgeMatch], vertices: &IndexSet<Node>, side: F) -> Array2<Multiplicity> {
    let mut matrix = Array2::zeros((vertices.len(), vertices.len()));
    for m in matches {
        let e = side(m);
        // both endpoints are in `vertices` by construction
        if let (Some(t), Some(h)) = (vertices.get_index_of(&e.tail), vertices.get_index_of(&e.head)) {
            matrix[(t, h)] = m.multiplicity;
        }
    }
    matrix
}

/// Pairs tails with tails and heads with heads. `None` if a vertex would be
/// sent to two vertices, or two vertices to the same one.
fn vertex_map(matches: &[EdgeMatch]) -> Option<HashMap<Node, Node>> {
    let mut map = HashMap::new();
    for m in matches {
        for (a, b) in [(m.first.tail, m.second.tail), (m.first.head, m.second.head)] {
            if *map.entry(a).or_insert(b) != b {
                return None;
            }
        }
    }
    let images: HashSet<Node> = map.values().copied().collect();
    (images.len() == map.len()).then_some(map)
}

/// Turns a clique of the product graph into a common subgraph, or `None` if
/// it does not describe the same shape in both graphs.
fn candidate(product: &EdgeProduct, clique: &Clique, first: &Multigraph, second: &Multigraph) -> Option<CommonSubgraph> {
    let mut matches: Vec<EdgeMatch> = clique
        .iter()
        .map(|&v| {
            let (e, f) = product.decode(v);
            EdgeMatch { first: e, second: f, multiplicity: 1 }
        })
        .collect();

    let first_vertices = side_vertices(&matches, |m| m.first);
    let second_vertices = side_vertices(&matches, |m| m.second);
    let first_side = Multigraph::from_multiplicities(side_matrix(&matches, &first_vertices, |m| m.first), false).ok()?;
    let second_side = Multigraph::from_multiplicities(side_matrix(&matches, &second_vertices, |m| m.second), false).ok()?;
    if first_side.size() != second_side.size() {
        debug!(first = ?first_side.size(), second = ?second_side.size(), "candidate rejected, sides differ");
        return None;
    }
    let map = vertex_map(&matches)?;

    for m in &mut matches {
        m.multiplicity = std::cmp::min(
            first.multiplicity(m.first.tail, m.first.head),
            second.multiplicity(m.second.tail, m.second.head),
        );
    }
    matches.sort_unstable();

    let subgraph = Multigraph::from_multiplicities(side_matrix(&matches, &first_vertices, |m| m.first), false).ok()?;
    let correspondence = (0..)
        .zip(&first_vertices)
        .map(|(local, &v)| VertexCorrespondence { local, first: v, second: map[&v] })
        .collect();
    Some(CommonSubgraph {
        subgraph,
        correspondence,
        first_vertices: first_vertices.into_iter().collect(),
        second_vertices: second_vertices.into_iter().collect(),
        edge_matches: matches,
        first_nnodes: first.nnodes(),
        second_nnodes: second.nnodes(),
    })
}

/// Drops results whose edge correspondences (with multiplicities) coincide.
fn dedup(subgraphs: &mut Vec<CommonSubgraph>) {
    let mut seen: HashSet<Vec<EdgeMatch>, BuildHasherDefault<SeaHasher>> = HashSet::default();
    subgraphs.retain(|s| seen.insert(s.edge_matches.clone()));
}

/// The largest common subgraphs of `first` and `second`, by vertex count
/// first and edge count (with multiplicities) second. Ties are all returned.
#[instrument(level = "debug", skip_all, fields(first = ?first.size(), second = ?second.size()))]
pub fn maximum_common_subgraphs(first: &Multigraph, second: &Multigraph, strategy: &CliqueStrategy) -> SubgraphSearch {
    let first_edges = first.simple_digraph().edges();
    let second_edges = second.simple_digraph().edges();
    if first_edges.is_empty() || second_edges.is_empty() {
        info!("a graph without edges has no common subgraph");
        return SubgraphSearch::none();
    }

    let product = EdgeProduct::new(first_edges, second_edges);
    debug!(nnodes = product.graph().nnodes(), nedges = product.graph().nedges(), "edge product built");

    let start = Instant::now();
    let cliques = product.cliques(strategy);
    let clique_time = start.elapsed();
    debug!(cliques = cliques.len(), ?clique_time, "product cliques found");

    let mut best: Vec<CommonSubgraph> = vec![];
    for clique in &cliques {
        let Some(c) = candidate(&product, clique, first, second) else { continue };
        match best.first().map(CommonSubgraph::size) {
            Some(size) if c.size() < size => continue,
            Some(size) if c.size() == size => {}
            _ => best.clear(),
        }
        best.push(c);
    }
    dedup(&mut best);

    info!(results = best.len(), size = ?best.first().map(CommonSubgraph::size), "maximum common subgraphs found");
    SubgraphSearch { clique_time, subgraphs: Some(best) }
}

/// [`maximum_common_subgraphs`] with exact clique enumeration.
pub fn exact_maximum_common_subgraphs(first: &Multigraph, second: &Multigraph) -> SubgraphSearch {
    maximum_common_subgraphs(first, second, &CliqueStrategy::default())
}
