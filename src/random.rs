//! Random test graphs.

use ndarray::Array2;
use rand::seq::index;
use rand::Rng;

use crate::error::{Error, Result};
use crate::graph::{DirectedGraph, Multigraph, Multiplicity};

/// Simple digraph without self-loops on `nnodes` vertices with exactly
/// `nedges` edges, chosen uniformly. Isolated vertices are kept.
pub fn random_digraph<R: Rng + ?Sized>(nnodes: usize, nedges: usize, rng: &mut R) -> Result<Multigraph> {
    let possible = nnodes * nnodes.saturating_sub(1);
    if nedges > possible {
        return Err(Error::Generator(format!(
            "{nedges} edges do not fit into a digraph on {nnodes} nodes (at most {possible})"
        )));
    }
    let mut adjacency = Array2::zeros((nnodes, nnodes));
    for k in index::sample(rng, possible, nedges) {
        // off-diagonal slot k, row by row
        let (i, j) = (k / (nnodes - 1), k % (nnodes - 1));
        let j = if j >= i { j + 1 } else { j };
        adjacency[(i, j)] = 1;
    }
    Multigraph::from_multiplicities(adjacency, false)
}

/// `graph` with each edge given a multiplicity drawn from
/// `1..=max_multiplicity`.
pub fn random_multigraph<R: Rng + ?Sized>(
    graph: &Multigraph,
    max_multiplicity: Multiplicity,
    rng: &mut R,
) -> Result<Multigraph> {
    if max_multiplicity == 0 {
        return Err(Error::Generator("the maximal multiplicity must be positive".to_owned()));
    }
    let adjacency = graph
        .adjacency()
        .mapv(|m| if m > 0 { rng.gen_range(1..=max_multiplicity) } else { 0 });
    debug_assert_eq!(adjacency.nrows(), graph.nnodes());
    Multigraph::from_multiplicities(adjacency, false)
}
