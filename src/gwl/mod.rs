//! This module implements the geometric Weisfeiler-Lehman test on graphs whose nodes carry coordinates.
//!
//! Each node gets a color, a digest of what it sees around it. The geometry around a node is summarized by
//! distances and angles to the members of its hop set, so that colors do not change under rotations,
//! reflections and translations of the graph nor under relabeling of nodes.
//!
//! Two variants are provided :
//! - IGWL ([Variant::Immediate]) : one round, only direct neighbours are seen.
//! - GWL ([Variant::MultiHop]) : nb_iter rounds, the hop set of each node grows by one hop before each round.
//!
//! Comparing the multisets of colors of two graphs gives a one sided test of isometry,
//! see [compare::possibly_isometric].
//!
//! Reference :
//! - On the Expressive Power of Geometric Graph Neural Networks. Joshi, Bodnar, Mathis, Cohen, Lio 2023

/// Defines refinement parameters.
pub mod params;

/// Hop sets and their expansion.
pub mod hopset;

/// The refinement loop.
pub mod refine;

/// Comparison of colorings.
pub mod compare;

pub use compare::{possibly_isometric, ColorHistogram};
pub use hopset::{expand_hop_sets_once, init_hop_sets, HopSet, HopSets};
pub use params::{GwlParams, Variant, DEFAULT_NB_ITER};
pub use refine::{gwl, init_base_colors, update_colors_once, GwlRefiner};
