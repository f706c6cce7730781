//! The color refinement loop.
//!
//! Initial colors hash the degree of each node. Then at each round every node is recolored by hashing
//! the geometric invariants of its hop set together with the sorted previous colors of its direct neighbours.
//! A round reads only the colors of the previous round, so nodes can be recolored in any order or in parallel,
//! and the color array is replaced once the whole round is done.
//!
//! The loop runs exactly the number of rounds asked for, there is no convergence test unless
//! early stop is required in [GwlParams].

use std::collections::HashSet;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::GeowlError;
use crate::geometry::{get_invariants, relative_vectors, GeometricGraph};
use crate::hashing::{canonical_hash, Value};

use super::hopset::{expand_hop_sets_once, init_hop_sets, HopSets};
use super::params::{GwlParams, Variant};

/// key of the neighbour colors in a node signature
pub const NEIGH_COLOR_KEY: &str = "neigh_color_multiset";

/// Colors of round 0 : hash of {"deg" : degree}.
pub fn init_base_colors(graph: &GeometricGraph) -> Result<Vec<String>, GeowlError> {
    (0..graph.get_nb_nodes())
        .map(|i| canonical_hash(&Value::map(vec![("deg", graph.degree(i))])))
        .collect()
} // end of init_base_colors

// colors and hop sets must cover exactly the nodes of graph
fn check_round_inputs(graph: &GeometricGraph, hop_sets: &HopSets, prev_colors: &[String]) -> Result<(), GeowlError> {
    let nb_nodes = graph.get_nb_nodes();
    if prev_colors.len() != nb_nodes {
        return Err(GeowlError::InvalidParams(format!(
            "got {} previous colors for {} nodes",
            prev_colors.len(),
            nb_nodes
        )));
    }
    if hop_sets.len() != nb_nodes {
        return Err(GeowlError::InvalidParams(format!("got {} hop sets for {} nodes", hop_sets.len(), nb_nodes)));
    }
    Ok(())
} // end of check_round_inputs

/// The signature of a node : {"D" : distances, "A" : angles, "neigh_color_multiset" : sorted colors of neighbours}.
/// Neighbours are the direct neighbours with their multiplicity, not the hop set.
/// Inputs must have been checked by check_round_inputs.
pub(crate) fn node_signature(
    graph: &GeometricGraph,
    node: usize,
    hop_sets: &HopSets,
    prev_colors: &[String],
) -> Value {
    let members = hop_sets.sorted_members(node);
    let rel = relative_vectors(graph, node, &members);
    let invariants = get_invariants(rel.view());
    let mut neigh_colors: Vec<&str> = graph.neighbors(node).iter().map(|j| prev_colors[*j].as_str()).collect();
    neigh_colors.sort_unstable();
    //
    let mut signature = invariants.to_entries();
    signature.push((NEIGH_COLOR_KEY.to_string(), Value::seq(neigh_colors)));
    Value::Map(signature)
} // end of node_signature

/// new color of node
pub fn color_node(
    graph: &GeometricGraph,
    node: usize,
    hop_sets: &HopSets,
    prev_colors: &[String],
) -> Result<String, GeowlError> {
    check_round_inputs(graph, hop_sets, prev_colors)?;
    if node >= graph.get_nb_nodes() {
        return Err(GeowlError::InvalidParams(format!("node {} out of range", node)));
    }
    node_color(graph, node, hop_sets, prev_colors)
} // end of color_node

fn node_color(graph: &GeometricGraph, node: usize, hop_sets: &HopSets, prev_colors: &[String]) -> Result<String, GeowlError> {
    let color = canonical_hash(&node_signature(graph, node, hop_sets, prev_colors))?;
    log::trace!("color_node {} : {}", node, color);
    Ok(color)
}

/// One round : recolors all nodes from the same previous colors.
/// Fails as a whole if one node fails, or if colors or hop sets do not match the graph.
pub fn update_colors_once(
    graph: &GeometricGraph,
    hop_sets: &HopSets,
    prev_colors: &[String],
    parallel: bool,
) -> Result<Vec<String>, GeowlError> {
    check_round_inputs(graph, hop_sets, prev_colors)?;
    if parallel {
        (0..graph.get_nb_nodes())
            .into_par_iter()
            .map(|i| node_color(graph, i, hop_sets, prev_colors))
            .collect()
    } else {
        (0..graph.get_nb_nodes()).map(|i| node_color(graph, i, hop_sets, prev_colors)).collect()
    }
} // end of update_colors_once

/// number of distinct colors
pub fn nb_distinct_colors(colors: &[String]) -> usize {
    colors.iter().map(|c| c.as_str()).collect::<HashSet<&str>>().len()
}

/// Runs the refinement on a graph and keeps the state of the last run.
pub struct GwlRefiner<'a> {
    ///
    graph: &'a GeometricGraph,
    /// refinement parameters
    params: GwlParams,
    /// hop sets used at the last round
    hop_sets: HopSets,
    /// current colors, index is node rank
    colors: Vec<String>,
    /// number of distinct colors after each round, index 0 is for initial colors
    nb_colors_history: Vec<usize>,
    ///
    nb_rounds_done: usize,
} // end of struct GwlRefiner

impl<'a> GwlRefiner<'a> {
    /// checks parameters
    pub fn new(graph: &'a GeometricGraph, params: GwlParams) -> Result<Self, GeowlError> {
        params.validate()?;
        Ok(GwlRefiner {
            graph,
            params,
            hop_sets: HopSets::empty(graph.get_nb_nodes()),
            colors: Vec::new(),
            nb_colors_history: Vec::new(),
            nb_rounds_done: 0,
        })
    } // end of new

    pub fn get_params(&self) -> &GwlParams {
        &self.params
    }

    /// colors of the last run, empty before any run
    pub fn get_colors(&self) -> &[String] {
        &self.colors
    }

    /// hop sets of the last round of the last run
    pub fn get_hop_sets(&self) -> &HopSets {
        &self.hop_sets
    }

    /// number of distinct colors after initialization and after each round
    pub fn get_nb_colors_history(&self) -> &[usize] {
        &self.nb_colors_history
    }

    /// rounds run by the last run, less than asked only with early stop
    pub fn get_nb_rounds_done(&self) -> usize {
        self.nb_rounds_done
    }

    /// Runs the refinement from scratch and returns the final colors, one by node.
    pub fn refine(&mut self) -> Result<Vec<String>, GeowlError> {
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let nb_components = self.graph.nb_connected_components();
        if nb_components > 1 {
            log::warn!("GwlRefiner::refine graph has {} connected components", nb_components);
        }
        let nb_isolated = (0..self.graph.get_nb_nodes()).filter(|i| self.graph.degree(*i) == 0).count();
        if nb_isolated > 0 {
            log::warn!("GwlRefiner::refine {} isolated nodes", nb_isolated);
        }
        let mut colors = init_base_colors(self.graph)?;
        let (mut hop_sets, nb_rounds) = init_hop_sets(self.graph, &self.params);
        self.nb_colors_history = vec![nb_distinct_colors(&colors)];
        self.nb_rounds_done = 0;
        log::debug!(
            "GwlRefiner::refine variant {:?}, nb rounds : {}, initial nb colors : {}",
            self.params.get_variant(),
            nb_rounds,
            self.nb_colors_history[0]
        );
        //
        for round in 0..nb_rounds {
            // hop sets that did not grow at this round
            let mut hop_sets_stable = true;
            if self.params.get_variant() == Variant::MultiHop {
                let expanded = expand_hop_sets_once(self.graph, &hop_sets);
                hop_sets_stable = expanded == hop_sets;
                hop_sets = expanded;
            }
            let new_colors = update_colors_once(self.graph, &hop_sets, &colors, self.params.get_parallel())?;
            let nb_colors = nb_distinct_colors(&new_colors);
            let previous_nb_colors = nb_distinct_colors(&colors);
            log::debug!("round {} nb colors : {}", round, nb_colors);
            colors = new_colors;
            self.nb_colors_history.push(nb_colors);
            self.nb_rounds_done += 1;
            if self.params.get_early_stop()
                && hop_sets_stable
                && nb_colors <= previous_nb_colors
                && round + 1 < nb_rounds
            {
                log::info!("GwlRefiner::refine partition stable after round {}, stopping", round);
                break;
            }
        }
        //
        log::info!(
            "GwlRefiner::refine nb nodes {}, rounds {}, sys time(s) {:.2e} cpu time(s) {:.2e}",
            self.graph.get_nb_nodes(),
            self.nb_rounds_done,
            sys_start.elapsed().map(|d| d.as_secs_f64()).unwrap_or(0.),
            cpu_start.elapsed().as_secs_f64()
        );
        self.hop_sets = hop_sets;
        self.colors = colors.clone();
        Ok(colors)
    } // end of refine
} // end of impl GwlRefiner

/// Computes final colors of graph with params.
pub fn gwl(graph: &GeometricGraph, params: &GwlParams) -> Result<Vec<String>, GeowlError> {
    GwlRefiner::new(graph, *params)?.refine()
} // end of gwl

//=====================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::gwl::compare::possibly_isometric;
    use crate::hashing::DIGEST_LEN;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn path_graph(last: [f64; 2]) -> GeometricGraph {
        let rows = vec![vec![-1., 1.], vec![0., 0.], vec![1., 0.], last.to_vec()];
        GeometricGraph::from_rows(&rows, &[(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn base_colors_by_degree() {
        log_init_test();
        let graph = path_graph([2., 1.]);
        let colors = init_base_colors(&graph).unwrap();
        assert_eq!(colors[0], colors[3]);
        assert_eq!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[1]);
        assert!(colors.iter().all(|c| c.len() == DIGEST_LEN));
        // isolated nodes of different graphs share their color
        let g1 = GeometricGraph::from_rows(&[vec![0.]], &[]).unwrap();
        let g2 = GeometricGraph::from_rows(&[vec![3., 4.], vec![1., 1.], vec![2., 2.]], &[(1, 2)]).unwrap();
        assert_eq!(init_base_colors(&g1).unwrap()[0], init_base_colors(&g2).unwrap()[0]);
    }

    #[test]
    fn signature_layout() {
        log_init_test();
        let graph = path_graph([2., 1.]);
        let colors = init_base_colors(&graph).unwrap();
        let hop_sets = HopSets::immediate(&graph);
        let text = node_signature(&graph, 0, &hop_sets, &colors).to_canonical_string().unwrap();
        let expected = format!("{{\"A\":[],\"D\":[1.414214],\"neigh_color_multiset\":[\"{}\"]}}", colors[1]);
        assert_eq!(text, expected);
    }

    #[test]
    fn igwl_blind_to_endpoint_flip() {
        log_init_test();
        // every node sees the same immediate geometry in both graphs
        let ga = path_graph([2., 1.]);
        let gb = path_graph([2., -1.]);
        let ca = gwl(&ga, &GwlParams::immediate()).unwrap();
        let cb = gwl(&gb, &GwlParams::immediate()).unwrap();
        assert_eq!(ca.len(), 4);
        assert!(possibly_isometric(&ca, &cb));
    }

    #[test]
    fn gwl_separates_endpoint_flip() {
        log_init_test();
        let ga = path_graph([2., 1.]);
        let gb = path_graph([2., -1.]);
        let ca = gwl(&ga, &GwlParams::multi_hop(2)).unwrap();
        let cb = gwl(&gb, &GwlParams::multi_hop(2)).unwrap();
        assert!(!possibly_isometric(&ca, &cb));
        // one round only sees direct neighbours
        let ca = gwl(&ga, &GwlParams::multi_hop(1)).unwrap();
        let cb = gwl(&gb, &GwlParams::multi_hop(1)).unwrap();
        assert!(possibly_isometric(&ca, &cb));
    }

    #[test]
    fn first_multi_hop_round_is_immediate_round() {
        log_init_test();
        let graph = path_graph([2., 1.]);
        assert_eq!(gwl(&graph, &GwlParams::multi_hop(1)).unwrap(), gwl(&graph, &GwlParams::immediate()).unwrap());
    }

    #[test]
    fn deterministic_and_parallel() {
        log_init_test();
        let rows: Vec<Vec<f64>> = (0..12).map(|i| vec![(i as f64).cos() * 3., (i as f64 * 0.7).sin(), i as f64 * 0.1]).collect();
        let edges: Vec<(usize, usize)> = (0..11).map(|i| (i, i + 1)).chain([(0, 5), (3, 9), (2, 7)]).collect();
        let graph = GeometricGraph::from_rows(&rows, &edges).unwrap();
        let mut params = GwlParams::multi_hop(3);
        let serial = gwl(&graph, &params).unwrap();
        assert_eq!(serial, gwl(&graph, &params).unwrap());
        params.set_parallel(true);
        assert_eq!(serial, gwl(&graph, &params).unwrap());
    }

    #[test]
    fn refiner_state() {
        log_init_test();
        let graph = path_graph([2., -1.]);
        let mut refiner = GwlRefiner::new(&graph, GwlParams::multi_hop(3)).unwrap();
        let colors = refiner.refine().unwrap();
        assert_eq!(refiner.get_colors(), colors.as_slice());
        assert_eq!(refiner.get_nb_rounds_done(), 3);
        assert_eq!(refiner.get_nb_colors_history().len(), 4);
        assert_eq!(refiner.get_nb_colors_history()[0], 2);
        // diameter is 3, after 3 expansions every node sees all the others
        assert!((0..4).all(|i| refiner.get_hop_sets().get(i).len() == 3));
        // a second run restarts from scratch
        assert_eq!(refiner.refine().unwrap(), colors);
    }

    #[test]
    fn early_stop() {
        log_init_test();
        // a square : all nodes equivalent at every round, diameter 2
        let rows = vec![vec![0., 0.], vec![1., 0.], vec![1., 1.], vec![0., 1.]];
        let graph = GeometricGraph::from_rows(&rows, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let mut params = GwlParams::multi_hop(5);
        params.set_early_stop(true);
        let mut refiner = GwlRefiner::new(&graph, params).unwrap();
        let colors = refiner.refine().unwrap();
        // hop sets grow at rounds 1 and 2, round 3 changes nothing
        assert_eq!(refiner.get_nb_rounds_done(), 3);
        assert_eq!(refiner.get_nb_colors_history(), &[1, 1, 1, 1]);
        assert_eq!(nb_distinct_colors(&colors), 1);
        // without early stop all rounds are run
        let mut refiner = GwlRefiner::new(&graph, GwlParams::multi_hop(5)).unwrap();
        refiner.refine().unwrap();
        assert_eq!(refiner.get_nb_rounds_done(), 5);
    }

    #[test]
    fn early_stop_waits_for_hop_growth() {
        log_init_test();
        // first round gives as many colors as degrees, but hop sets are still growing
        let ga = path_graph([2., 1.]);
        let gb = path_graph([2., -1.]);
        for nb_iter in [2, 5] {
            let mut params = GwlParams::multi_hop(nb_iter);
            params.set_early_stop(true);
            let mut refiner_a = GwlRefiner::new(&ga, params).unwrap();
            let mut refiner_b = GwlRefiner::new(&gb, params).unwrap();
            let ca = refiner_a.refine().unwrap();
            let cb = refiner_b.refine().unwrap();
            assert!(!possibly_isometric(&ca, &cb), "nb_iter {}", nb_iter);
            // diameter 3 : hop sets grow during 3 rounds
            assert!(refiner_a.get_nb_rounds_done() >= nb_iter.min(3));
        }
    }

    #[test]
    fn overflow_fails_whole_refinement() {
        log_init_test();
        // finite coordinates whose difference overflows to infinity
        let graph = GeometricGraph::from_rows(&[vec![1.0e308, 0.], vec![-1.0e308, 0.]], &[(0, 1)]).unwrap();
        for params in [GwlParams::immediate(), GwlParams::multi_hop(2)] {
            match gwl(&graph, &params) {
                Err(GeowlError::Serialization(msg)) => assert!(msg.contains("inf"), "{}", msg),
                other => panic!("expected serialization error, got {:?}", other),
            }
        }
        let mut params = GwlParams::immediate();
        params.set_parallel(true);
        assert!(matches!(gwl(&graph, &params), Err(GeowlError::Serialization(_))));
    }

    #[test]
    fn mismatched_round_inputs() {
        log_init_test();
        let graph = path_graph([2., 1.]);
        let colors = init_base_colors(&graph).unwrap();
        let hop_sets = HopSets::immediate(&graph);
        let short = vec!["x".to_string()];
        for parallel in [false, true] {
            assert!(matches!(
                update_colors_once(&graph, &hop_sets, &short, parallel),
                Err(GeowlError::InvalidParams(_))
            ));
            assert!(matches!(
                update_colors_once(&graph, &HopSets::empty(2), &colors, parallel),
                Err(GeowlError::InvalidParams(_))
            ));
        }
        assert!(matches!(color_node(&graph, 0, &hop_sets, &short), Err(GeowlError::InvalidParams(_))));
        assert!(matches!(color_node(&graph, 4, &hop_sets, &colors), Err(GeowlError::InvalidParams(_))));
        assert_eq!(color_node(&graph, 2, &hop_sets, &colors).unwrap().len(), DIGEST_LEN);
    }

    #[test]
    fn isolated_node_colored() {
        log_init_test();
        let graph = GeometricGraph::from_rows(&[vec![0., 0.], vec![1., 0.], vec![9., 9.]], &[(0, 1)]).unwrap();
        let colors = gwl(&graph, &GwlParams::default()).unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], colors[1]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn bad_params() {
        log_init_test();
        let graph = path_graph([2., 1.]);
        assert!(matches!(gwl(&graph, &GwlParams::multi_hop(0)), Err(GeowlError::InvalidParams(_))));
    }
} // end of mod tests
