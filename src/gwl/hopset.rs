//! Hop sets : for each node the set of other nodes whose position is taken into account to color it.
//!
//! In the immediate variant the hop set of a node is its set of direct neighbours. In the multi hop variant
//! hop sets start empty and each expansion adds one more layer of neighbours.
//! A node never belongs to its own hop set.
//! Sets are for membership only, a hop set is always consumed as a sorted list of indexes.

use std::collections::HashSet;

use crate::geometry::GeometricGraph;

use super::params::{GwlParams, Variant};

pub type HopSet = HashSet<usize, ahash::RandomState>;

/// one hop set by node, indexed by node rank
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HopSets {
    sets: Vec<HopSet>,
}

impl HopSets {
    /// nb_nodes empty sets
    pub fn empty(nb_nodes: usize) -> Self {
        HopSets { sets: (0..nb_nodes).map(|_| HopSet::default()).collect() }
    }

    /// direct neighbours of each node, the node itself excluded.
    pub fn immediate(graph: &GeometricGraph) -> Self {
        let sets = (0..graph.get_nb_nodes())
            .map(|i| graph.neighbors(i).iter().copied().filter(|j| *j != i).collect::<HopSet>())
            .collect();
        HopSets { sets }
    }

    /// number of nodes
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, node: usize) -> &HopSet {
        &self.sets[node]
    }

    /// members of the hop set of node in ascending order
    pub fn sorted_members(&self, node: usize) -> Vec<usize> {
        let mut members: Vec<usize> = self.sets[node].iter().copied().collect();
        members.sort_unstable();
        members
    }

    /// true if for each node our hop set contains the hop set of other
    pub fn is_superset(&self, other: &HopSets) -> bool {
        self.sets.len() == other.sets.len() && self.sets.iter().zip(other.sets.iter()).all(|(s, o)| s.is_superset(o))
    }
} // end of impl HopSets

/// Initial hop sets and number of rounds to run.
/// Immediate variant : direct neighbours and 1 round. Multi hop variant : empty sets and nb_iter rounds.
pub fn init_hop_sets(graph: &GeometricGraph, params: &GwlParams) -> (HopSets, usize) {
    match params.get_variant() {
        Variant::Immediate => (HopSets::immediate(graph), 1),
        Variant::MultiHop => (HopSets::empty(graph.get_nb_nodes()), params.get_nb_iter()),
    }
} // end of init_hop_sets

/// Grows hop sets by one hop.
/// New hop set of i is its current set, its direct neighbours and the current hop sets of its neighbours, i removed.
/// The input is not modified, all nodes are expanded from the same snapshot.
pub fn expand_hop_sets_once(graph: &GeometricGraph, hop_sets: &HopSets) -> HopSets {
    let sets = (0..graph.get_nb_nodes())
        .map(|i| {
            let mut set = hop_sets.get(i).clone();
            set.extend(graph.neighbors(i).iter().copied());
            for &j in graph.neighbors(i) {
                set.extend(hop_sets.get(j).iter().copied());
            }
            set.remove(&i);
            log::trace!("expand_hop_sets_once node {} : {} -> {}", i, hop_sets.get(i).len(), set.len());
            set
        })
        .collect();
    HopSets { sets }
} // end of expand_hop_sets_once

//=====================================================================================================

// end of mod tests
