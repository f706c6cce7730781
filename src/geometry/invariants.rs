//! Geometric invariants of a node neighbourhood.
//!
//! Given the relative vectors from a node to the members of its hop set we summarize the geometry
//! by the sorted list of distances (norms of the vectors) and the sorted list of cosines between all
//! pairs of vectors. Both lists are unchanged by a rotation or reflection of the vectors and by a
//! permutation of them.
//! Values are rounded to 6 decimal digits so that floating point noise does not split colors.

use ndarray::{Array2, ArrayView2, Axis};

use super::graph::GeometricGraph;
use crate::hashing::Value;

/// stabilizes normalization of a null vector
pub const NORM_EPS: f64 = 1.0e-12;

/// number of decimal digits kept in distances and angles
pub const ROUNDING_DIGITS: i32 = 6;

/// rounds to [ROUNDING_DIGITS] decimals. A rounded zero is always +0.
pub fn round_digits(x: f64) -> f64 {
    let scale = 10f64.powi(ROUNDING_DIGITS);
    let r = (x * scale).round() / scale;
    if r == 0. {
        0.
    } else {
        r
    }
} // end of round_digits

/// sorted distances and sorted pairwise cosines
#[derive(Clone, Debug, PartialEq)]
pub struct Invariants {
    distances: Vec<f64>,
    angles: Vec<f64>,
}

impl Invariants {
    pub fn get_distances(&self) -> &[f64] {
        &self.distances
    }

    /// cosines of pairs (i,j) with i < j
    pub fn get_angles(&self) -> &[f64] {
        &self.angles
    }

    /// entries ("D", distances) and ("A", angles), to be completed into a node signature
    pub fn to_entries(&self) -> Vec<(String, Value)> {
        vec![
            ("D".to_string(), Value::seq(self.distances.iter().copied())),
            ("A".to_string(), Value::seq(self.angles.iter().copied())),
        ]
    }

    /// mapping {"D" : distances, "A" : angles} to be hashed
    pub fn to_value(&self) -> Value {
        Value::Map(self.to_entries())
    }
} // end of impl Invariants

/// Computes invariants of relative vectors given as rows of rel_vecs.
/// No row or a single row gives an empty list of angles. A null vector is normalized to a null vector
/// so its cosine with anything is 0.
pub fn get_invariants(rel_vecs: ArrayView2<f64>) -> Invariants {
    let nb_vec = rel_vecs.nrows();
    let norms: Vec<f64> = rel_vecs.rows().into_iter().map(|row| row.dot(&row).sqrt()).collect();
    //
    let mut distances: Vec<f64> = norms.iter().map(|d| round_digits(*d)).collect();
    distances.sort_by(f64::total_cmp);
    //
    let mut angles = Vec::<f64>::with_capacity(nb_vec * nb_vec.saturating_sub(1) / 2);
    if nb_vec >= 2 {
        let mut units = rel_vecs.to_owned();
        for (mut row, norm) in units.rows_mut().into_iter().zip(norms.iter()) {
            row.mapv_inplace(|x| x / (norm + NORM_EPS));
        }
        let cosines = units.dot(&units.t());
        for i in 0..nb_vec {
            for j in (i + 1)..nb_vec {
                angles.push(round_digits(cosines[[i, j]].clamp(-1., 1.)));
            }
        }
        angles.sort_by(f64::total_cmp);
    }
    log::trace!("get_invariants nb vectors : {}, distances : {:?}, angles : {:?}", nb_vec, distances, angles);
    Invariants { distances, angles }
} // end of get_invariants

/// Relative vectors position[m] - position[node] for m in members, one row per member in the order given.
pub fn relative_vectors(graph: &GeometricGraph, node: usize, members: &[usize]) -> Array2<f64> {
    let origin = graph.position(node);
    let mut rel = graph.get_coordinates().select(Axis(0), members);
    for mut row in rel.rows_mut() {
        row -= &origin;
    }
    rel
} // end of relative_vectors

//=====================================================================================================

// end of mod tests
