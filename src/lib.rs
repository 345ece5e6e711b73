//! Distances between directed multigraphs, measured by the size of their
//! maximum common edge-subgraph.
//!
//! ```
//! use multidigraph_distance::graph::Multigraph;
//! use multidigraph_distance::distance::distance_l1;
//! let cycle = Multigraph::from_rows(&[vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]).unwrap();
//! let path = Multigraph::from_rows(&[vec![0, 1, 0], vec![0, 0, 1], vec![0, 0, 0]]).unwrap();
//! let d = distance_l1(&cycle, &path).unwrap();
//! // common subgraph (3, 2), larger graph (3, 3)
//! assert!((d.value - (1.0 - 5.0 / 6.0)).abs() < 1e-12);
//! ```

pub mod cliques;
pub mod distance;
pub mod error;
pub mod graph;
pub mod io;
pub mod logging;
pub mod random;
pub mod subgraph;

mod util;

pub use cliques::{select_maximum, Clique, CliqueAlgorithm, Cliques};
pub use distance::{Distance, Norm};
pub use error::{Error, Result, ValidationError};
pub use graph::{DirectedGraph, EdgeRecord, Multigraph, Node};
pub use subgraph::{maximum_common_subgraphs, CliqueStrategy, CommonSubgraph, SubgraphSearch};
