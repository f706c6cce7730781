//! Geometric graphs and rotation/permutation invariant summaries of node neighbourhoods.

/// The graph container, coordinates and adjacency.
pub mod graph;

/// Distances and angles invariants.
pub mod invariants;

pub use graph::GeometricGraph;
pub use invariants::{get_invariants, relative_vectors, Invariants};
