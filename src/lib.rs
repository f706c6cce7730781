//! lib target
//!
//! Geometric Weisfeiler-Lehman color refinement on graphs whose nodes have coordinates.
//! See [gwl] for the algorithm, [geometry] for the graph container and invariants,
//! [hashing] for the canonical hash giving colors.

pub mod error;

pub mod hashing;

pub mod geometry;

pub mod gwl;

pub mod prelude;

pub use error::GeowlError;
