use thiserror::Error;

use crate::graph::Node;

/// Reasons a matrix is not the adjacency matrix of a directed multigraph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Matrix is not 2-dimensional.")]
    NotTwoDimensional { ndim: usize },
    #[error("Matrix is non-square.")]
    NonSquare { rows: usize, cols: usize },
    #[error("Matrix has negative elements.")]
    NegativeEntry { row: usize, col: usize, value: i64 },
    #[error("Matrix total multiplicity exceeds the edge counter.")]
    EdgeCountOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid matrix for directed multigraph: {0}")]
    Validation(#[from] ValidationError),

    /// Clique search needs an undirected graph; use the reciprocal
    /// derivation instead of passing a directed matrix.
    #[error("matrix is not symmetric: entry ({from}, {to}) differs from ({to}, {from})")]
    AsymmetricInput { from: usize, to: usize },

    #[error("node {node} out of bounds: {node} >= {nnodes}")]
    NodeOutOfRange { node: Node, nnodes: usize },

    #[error("cannot select a maximum from an empty set of cliques")]
    EmptyResult,

    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    #[error("invalid generator parameters: {0}")]
    Generator(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
