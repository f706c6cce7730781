//! Refinement Parameters
//!
//!

use serde::{Deserialize, Serialize};

use crate::error::GeowlError;

/// default number of rounds of the multi hop variant
pub const DEFAULT_NB_ITER: usize = 2;

/// The two refinement variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// IGWL : one round, hop sets are the direct neighbours.
    Immediate,
    /// GWL : nb_iter rounds, hop sets grow by one hop before each round.
    MultiHop,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::MultiHop
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GwlParams {
    /// number of rounds (i.e of hops around a node) in the multi hop variant. Not used in the immediate variant.
    pub nb_iter: usize,
    /// immediate or multi hop
    pub variant: Variant,
    /// parallel mode, nodes of a round are recolored in parallel
    pub parallel: bool,
    /// stop before nb_iter rounds if a round does not increase the number of colors.
    pub early_stop: bool,
} // end of GwlParams

impl GwlParams {
    pub fn new(nb_iter: usize, variant: Variant, parallel: bool, early_stop: bool) -> Self {
        GwlParams { nb_iter, variant, parallel, early_stop }
    }

    /// parameters of the immediate variant, otherwise defaults
    pub fn immediate() -> Self {
        GwlParams { variant: Variant::Immediate, ..Default::default() }
    }

    /// parameters of the multi hop variant with nb_iter rounds, otherwise defaults
    pub fn multi_hop(nb_iter: usize) -> Self {
        GwlParams { nb_iter, variant: Variant::MultiHop, ..Default::default() }
    }

    ///
    pub fn get_nb_iter(&self) -> usize {
        self.nb_iter
    }

    ///
    pub fn get_variant(&self) -> Variant {
        self.variant
    }

    ///
    pub fn get_parallel(&self) -> bool {
        self.parallel
    }

    ///
    pub fn get_early_stop(&self) -> bool {
        self.early_stop
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel
    }

    pub fn set_early_stop(&mut self, early_stop: bool) {
        self.early_stop = early_stop
    }

    /// nb_iter must be at least 1 in the multi hop variant
    pub fn validate(&self) -> Result<(), GeowlError> {
        if self.variant == Variant::MultiHop && self.nb_iter == 0 {
            return Err(GeowlError::InvalidParams("nb_iter must be >= 1 with the multi hop variant".into()));
        }
        Ok(())
    }
} // end of impl GwlParams

impl Default for GwlParams {
    fn default() -> Self {
        GwlParams { nb_iter: DEFAULT_NB_ITER, variant: Variant::default(), parallel: false, early_stop: false }
    }
}

// end of mod tests
