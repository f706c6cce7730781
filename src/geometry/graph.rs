//! The geometric graph container : node coordinates and a symetric adjacency list.
//!
//! Adjacency is built from an edge list, each undirected edge (u,v) pushes v in the list of u and u in the list of v.
//! Duplicate edges give duplicate entries and a self loop (u,u) gives u twice in its own list,
//! nothing is deduplicated here.

use ndarray::{Array2, ArrayView1};

use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;

use crate::error::GeowlError;

/// A graph whose nodes carry coordinates in a space of dimension d.
/// Coordinates are stored as an (n,d) array, row i being the position of node i.
/// The graph is not modified once constructed.
#[derive(Clone, Debug)]
pub struct GeometricGraph {
    /// positions, one row per node
    coordinates: Array2<f64>,
    /// neighbours of each node, in edge list order
    adjacency: Vec<Vec<usize>>,
    /// number of edges given at construction
    nb_edges: usize,
} // end of struct GeometricGraph

impl GeometricGraph {
    /// Checks coordinates and edges and builds the adjacency lists.
    /// Fails with [GeowlError::InvalidGraph] if there are no nodes, a coordinate is not finite
    /// or an edge references a node outside 0..n.
    pub fn new(coordinates: Array2<f64>, edges: &[(usize, usize)]) -> Result<Self, GeowlError> {
        let (nb_nodes, dim) = coordinates.dim();
        if nb_nodes == 0 {
            return Err(GeowlError::graph("empty coordinate table"));
        }
        if dim == 0 {
            return Err(GeowlError::graph("coordinates have dimension 0"));
        }
        if let Some(((i, j), x)) = coordinates.indexed_iter().find(|(_, x)| !x.is_finite()) {
            return Err(GeowlError::graph(format!("coordinate ({},{}) is not finite : {}", i, j, x)));
        }
        let mut adjacency: Vec<Vec<usize>> = (0..nb_nodes).map(|_| Vec::new()).collect();
        for (rank, &(u, v)) in edges.iter().enumerate() {
            if u >= nb_nodes || v >= nb_nodes {
                return Err(GeowlError::graph(format!(
                    "edge {} : ({},{}) out of range, nb nodes is {}",
                    rank, u, v, nb_nodes
                )));
            }
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        log::debug!("GeometricGraph::new nb nodes : {}, dim : {}, nb edges : {}", nb_nodes, dim, edges.len());
        Ok(GeometricGraph { coordinates, adjacency, nb_edges: edges.len() })
    } // end of new

    /// Builds from rows of coordinates. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>], edges: &[(usize, usize)]) -> Result<Self, GeowlError> {
        if rows.is_empty() {
            return Err(GeowlError::graph("empty coordinate table"));
        }
        let dim = rows[0].len();
        if let Some(rank) = rows.iter().position(|r| r.len() != dim) {
            return Err(GeowlError::graph(format!(
                "row {} has length {}, expected {}",
                rank,
                rows[rank].len(),
                dim
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let coordinates =
            Array2::from_shape_vec((rows.len(), dim), flat).map_err(|e| GeowlError::graph(e.to_string()))?;
        GeometricGraph::new(coordinates, edges)
    } // end of from_rows

    /// number of nodes
    pub fn get_nb_nodes(&self) -> usize {
        self.coordinates.nrows()
    }

    /// dimension of the space
    pub fn get_dim(&self) -> usize {
        self.coordinates.ncols()
    }

    /// number of edges given at construction, duplicates included
    pub fn get_nb_edges(&self) -> usize {
        self.nb_edges
    }

    /// neighbours of node, with multiplicity
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    /// length of the neighbour list (so duplicate edges count)
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// position of node
    pub fn position(&self, node: usize) -> ArrayView1<f64> {
        self.coordinates.row(node)
    }

    pub fn get_coordinates(&self) -> &Array2<f64> {
        &self.coordinates
    }

    /// an undirected petgraph view, parallel edges and self loops are kept.
    /// petgraph node index i corresponds to our node i.
    pub fn to_petgraph(&self) -> Graph<(), (), Undirected, u32> {
        let mut graph = Graph::<(), (), Undirected, u32>::with_capacity(self.get_nb_nodes(), self.nb_edges);
        for _ in 0..self.get_nb_nodes() {
            graph.add_node(());
        }
        for (u, neighbours) in self.adjacency.iter().enumerate() {
            // each edge is stored at both ends, keep it once. A self loop is stored twice at the same end.
            let mut nb_self = 0;
            for &v in neighbours {
                if u < v {
                    graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
                } else if u == v {
                    nb_self += 1;
                    if nb_self % 2 == 1 {
                        graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
                    }
                }
            }
        }
        graph
    } // end of to_petgraph

    /// number of connected components
    pub fn nb_connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.to_petgraph())
    }
} // end of impl GeometricGraph

//=====================================================================================================

// end of mod tests
