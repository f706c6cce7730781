//! Comparison of the colorings of two graphs.
//!
//! If the graphs are related by an isometry and a relabeling of nodes, their multisets of colors are equal.
//! The converse does not hold : equal multisets only say the graphs are possibly isometric,
//! different multisets prove they are not.

use indexmap::IndexMap;

/// Count of each color, colors kept in order of first appearance.
#[derive(Clone, Debug, Default)]
pub struct ColorHistogram {
    counts: IndexMap<String, usize>,
}

impl ColorHistogram {
    pub fn new(colors: &[String]) -> Self {
        let mut counts = IndexMap::<String, usize>::new();
        for color in colors {
            *counts.entry(color.clone()).or_insert(0) += 1;
        }
        ColorHistogram { counts }
    }

    /// number of distinct colors
    pub fn get_nb_colors(&self) -> usize {
        self.counts.len()
    }

    /// number of nodes counted
    pub fn get_nb_nodes(&self) -> usize {
        self.counts.values().sum()
    }

    /// count of a color, 0 if absent
    pub fn get_count(&self, color: &str) -> usize {
        self.counts.get(color).copied().unwrap_or(0)
    }

    /// (color, count) in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&String, &usize)> {
        self.counts.iter()
    }

    /// class sizes in decreasing order, a summary independent of the digests
    pub fn class_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.counts.values().copied().collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
} // end of impl ColorHistogram

/// multiset equality, the order of appearance is not taken into account
impl PartialEq for ColorHistogram {
    fn eq(&self, other: &Self) -> bool {
        self.counts.len() == other.counts.len() && self.counts.iter().all(|(c, n)| other.counts.get(c) == Some(n))
    }
}

impl Eq for ColorHistogram {}

/// true if both colorings have the same multiset of colors
pub fn possibly_isometric(colors_a: &[String], colors_b: &[String]) -> bool {
    let equal = ColorHistogram::new(colors_a) == ColorHistogram::new(colors_b);
    log::debug!("possibly_isometric nb nodes {} {} : {}", colors_a.len(), colors_b.len(), equal);
    equal
} // end of possibly_isometric

// end of mod tests
