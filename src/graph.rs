use ndarray::{Array2, ArrayView, ArrayView2, Axis, Dimension, Ix2};
use tracing::info;

use crate::error::{Error, Result, ValidationError};

pub type Node = u32;
pub type Multiplicity = u64;

/// One directed edge of a simple digraph, multiplicity collapsed to presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeRecord {
    pub tail: Node,
    pub head: Node,
}

impl EdgeRecord {
    pub fn new(tail: Node, head: Node) -> Self {
        EdgeRecord { tail, head }
    }

    fn touches(&self, v: Node) -> bool {
        self.tail == v || self.head == v
    }

    /// No endpoint of `self` coincides with an endpoint of `other`.
    pub fn is_disjoint(&self, other: &EdgeRecord) -> bool {
        !self.touches(other.tail) && !self.touches(other.head)
    }

    /// `self` and `other` are the two directions between the same vertices.
    pub fn is_reverse_of(&self, other: &EdgeRecord) -> bool {
        self.tail == other.head && self.head == other.tail
    }
}

pub trait DirectedGraph {
    /// # Panics
    /// if `from` or `to` is not a node of the graph.
    fn has_edge(&self, from: Node, to: Node) -> bool;
    fn nnodes(&self) -> usize;

    fn iter_nodes(&self) -> std::ops::Range<Node> {
        0..(self.nnodes() as Node)
    }

    /// all edges in row-major order.
    fn edges(&self) -> Vec<EdgeRecord> {
        let mut edges = vec![];
        for from in self.iter_nodes() {
            for to in self.iter_nodes() {
                if self.has_edge(from, to) {
                    edges.push(EdgeRecord::new(from, to));
                }
            }
        }
        edges
    }

    /// Targets of the edges leaving `from`, ascending.
    /// ```
    /// use multidigraph_distance::graph::*;
    /// let g = Multigraph::from_rows(&[vec![0, 1, 2], vec![0, 0, 0], vec![1, 0, 0]]).unwrap();
    /// assert_eq!(g.neighbors(0).unwrap(), vec![1, 2]);
    /// assert!(g.neighbors(3).is_err());
    /// ```
    fn neighbors(&self, from: Node) -> Result<Vec<Node>> {
        self.check_node(from)?;
        Ok(self.iter_nodes().filter(|&to| self.has_edge(from, to)).collect())
    }

    fn check_node(&self, node: Node) -> Result<()> {
        if node as usize >= self.nnodes() {
            return Err(Error::NodeOutOfRange { node, nnodes: self.nnodes() });
        }
        Ok(())
    }

    fn adjacency_matrix(&self) -> Array2<bool> {
        let n = self.nnodes();
        Array2::from_shape_fn((n, n), |(i, j)| self.has_edge(i as Node, j as Node))
    }
}

/// Directed multigraph, entry (i, j) is the number of parallel edges i -> j.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multigraph {
    adjacency: Array2<Multiplicity>,
    size: (usize, Multiplicity),
}

impl Multigraph {
    /// Validates `matrix` (2-dimensional, square, non-negative, checked in
    /// that order) and optionally drops vertices without any in- or
    /// out-edges. Remaining vertices keep their relative order.
    pub fn new<D: Dimension>(matrix: ArrayView<'_, i64, D>, prune_isolated: bool) -> Result<Self> {
        let ndim = matrix.ndim();
        let matrix = matrix
            .into_dimensionality::<Ix2>()
            .map_err(|_| ValidationError::NotTwoDimensional { ndim })?;
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(ValidationError::NonSquare { rows, cols }.into());
        }
        if let Some(((row, col), &value)) = matrix.indexed_iter().find(|(_, &v)| v < 0) {
            return Err(ValidationError::NegativeEntry { row, col, value }.into());
        }
        Self::from_multiplicities(matrix.mapv(|v| v as Multiplicity), prune_isolated)
    }

    /// Row-wise construction with isolated vertices pruned. Rows of unequal
    /// length do not form a 2-dimensional matrix.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(ValidationError::NotTwoDimensional { ndim: 1 }.into());
        }
        let flat: Vec<i64> = rows.iter().flatten().copied().collect();
        let matrix = Array2::from_shape_vec((rows.len(), ncols), flat)
            .map_err(|_| ValidationError::NotTwoDimensional { ndim: 1 })?;
        Self::new(matrix.view(), true)
    }

    pub fn from_multiplicities(adjacency: Array2<Multiplicity>, prune_isolated: bool) -> Result<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(ValidationError::NonSquare { rows, cols }.into());
        }
        let total = adjacency
            .iter()
            .try_fold(0 as Multiplicity, |acc, &m| acc.checked_add(m))
            .ok_or(ValidationError::EdgeCountOverflow)?;
        let adjacency = if prune_isolated { prune_isolated_vertices(adjacency) } else { adjacency };
        let size = (adjacency.nrows(), total);
        Ok(Multigraph { adjacency, size })
    }

    /// (number of vertices, number of edges counted with multiplicity)
    pub fn size(&self) -> (usize, Multiplicity) {
        self.size
    }

    pub fn adjacency(&self) -> ArrayView2<'_, Multiplicity> {
        self.adjacency.view()
    }

    /// # Panics
    /// if `from` or `to` is not a node of the graph.
    pub fn multiplicity(&self, from: Node, to: Node) -> Multiplicity {
        self.adjacency[(from as usize, to as usize)]
    }

    pub fn simple_digraph(&self) -> SimpleDigraph {
        SimpleDigraph { adjacency: self.adjacency.mapv(|m| m > 0) }
    }

    pub fn reciprocal_undirected(&self) -> UndirectedGraph {
        self.simple_digraph().reciprocal()
    }

    /// Sum of the entries whose row and column both lie in `vertices`.
    /// Order and repetition of `vertices` do not matter. Bounded by the
    /// total multiplicity, which construction checked to fit.
    /// ```
    /// use multidigraph_distance::graph::*;
    /// let g = Multigraph::from_rows(&[vec![0, 3, 1], vec![2, 0, 0], vec![1, 0, 0]]).unwrap();
    /// assert_eq!(g.induced_edge_count([1, 0, 1]).unwrap(), 5);
    /// ```
    pub fn induced_edge_count<I: IntoIterator<Item = Node>>(&self, vertices: I) -> Result<Multiplicity> {
        let mut vertices: Vec<Node> = vertices.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();
        for &v in &vertices {
            self.check_node(v)?;
        }
        let mut count = 0;
        for &from in &vertices {
            for &to in &vertices {
                count += self.multiplicity(from, to);
            }
        }
        Ok(count)
    }

    /// No general distance exists, only the size based metrics in
    /// [`crate::distance`].
    pub fn distance(&self, _other: &Multigraph) -> Result<f64> {
        Err(Error::Unimplemented("general multigraph distance, use distance::distance_l1 or distance::distance_l2"))
    }
}

impl DirectedGraph for Multigraph {
    fn has_edge(&self, from: Node, to: Node) -> bool {
        self.multiplicity(from, to) > 0
    }
    fn nnodes(&self) -> usize {
        self.size.0
    }
}

fn prune_isolated_vertices(adjacency: Array2<Multiplicity>) -> Array2<Multiplicity> {
    let n = adjacency.nrows();
    let keep: Vec<usize> = (0..n)
        .filter(|&v| adjacency.row(v).iter().any(|&m| m > 0) || adjacency.column(v).iter().any(|&m| m > 0))
        .collect();
    if keep.len() == n {
        return adjacency;
    }
    info!(pruned = n - keep.len(), "removing isolated vertices from multigraph");
    adjacency.select(Axis(0), &keep).select(Axis(1), &keep)
}

/// Multigraph with every multiplicity clamped to presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleDigraph {
    adjacency: Array2<bool>,
}

impl SimpleDigraph {
    /// Keeps i -- j only if both i -> j and j -> i exist. The diagonal is
    /// copied as is.
    pub fn reciprocal(&self) -> UndirectedGraph {
        let n = self.adjacency.nrows();
        let mut adjacency = self.adjacency.clone();
        for i in 0..n {
            for j in (i + 1)..n {
                let both = self.adjacency[(i, j)] && self.adjacency[(j, i)];
                adjacency[(i, j)] = both;
                adjacency[(j, i)] = both;
            }
        }
        UndirectedGraph::from_symmetric(&adjacency)
    }
}

impl DirectedGraph for SimpleDigraph {
    fn has_edge(&self, from: Node, to: Node) -> bool {
        self.adjacency[(from as usize, to as usize)]
    }
    fn nnodes(&self) -> usize {
        self.adjacency.nrows()
    }
}

/// Undirected graph stored as sorted adjacency lists.
/// A self-loop shows up as `v` in its own list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndirectedGraph {
    adjacency_lists: Vec<Vec<Node>>,
}

impl UndirectedGraph {
    /// Fails with [`Error::AsymmetricInput`] on the first (row-major) pair
    /// whose two directions disagree.
    pub fn from_matrix(matrix: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(ValidationError::NonSquare { rows, cols }.into());
        }
        for i in 0..rows {
            for j in (i + 1)..rows {
                if matrix[(i, j)] != matrix[(j, i)] {
                    return Err(Error::AsymmetricInput { from: i, to: j });
                }
            }
        }
        Ok(Self::from_symmetric(matrix))
    }

    fn from_symmetric(matrix: &Array2<bool>) -> Self {
        let adjacency_lists = matrix
            .outer_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &e)| e)
                    .map(|(j, _)| j as Node)
                    .collect()
            })
            .collect();
        UndirectedGraph { adjacency_lists }
    }

    /// `adjacency_lists` must be symmetric and each list sorted.
    pub(crate) fn from_adjacency_lists(adjacency_lists: Vec<Vec<Node>>) -> Self {
        debug_assert!(adjacency_lists.iter().all(|l| l.windows(2).all(|w| w[0] < w[1])));
        UndirectedGraph { adjacency_lists }
    }

    /// sorted neighbors of `v` without `v` itself.
    ///
    /// # Panics
    /// if `v` is not a node of the graph.
    pub fn neighborhood(&self, v: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency_lists[v as usize].iter().copied().filter(move |&u| u != v)
    }

    /// distinct vertices joined by an edge.
    pub fn adjacent(&self, u: Node, v: Node) -> bool {
        u != v && self.has_edge(u, v)
    }

    pub fn degree(&self, v: Node) -> usize {
        self.neighborhood(v).count()
    }

    pub fn nedges(&self) -> usize {
        let ends: usize = self.iter_nodes().map(|v| self.degree(v)).sum();
        ends / 2
    }
}

impl DirectedGraph for UndirectedGraph {
    fn has_edge(&self, from: Node, to: Node) -> bool {
        assert!((to as usize) < self.nnodes(), "to out of bounds: {} >= {}", to, self.nnodes());
        self.adjacency_lists[from as usize].binary_search(&to).is_ok()
    }
    fn nnodes(&self) -> usize {
        self.adjacency_lists.len()
    }
    fn edges(&self) -> Vec<EdgeRecord> {
        let mut edges = vec![];
        for (from, list) in (0..).zip(&self.adjacency_lists) {
            edges.extend(list.iter().map(|&to| EdgeRecord::new(from, to)));
        }
        edges
    }
    fn neighbors(&self, from: Node) -> Result<Vec<Node>> {
        self.check_node(from)?;
        Ok(self.adjacency_lists[from as usize].clone())
    }
}
