//!
//! Null (background) model
//!
use crate::alphabet::Alphabet;
use crate::distribution::Distribution;
use crate::prob::Probability;
use serde::{Deserialize, Serialize};

/// loop probability of the default null model, expected length 1000
pub const DEFAULT_NULL_P1: f64 = 1000.0 / 1001.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullModel {
    /// background residue distribution
    pub residues: Vec<f64>,
    /// loop (continuation) probability of the background state
    pub p1: f64,
}

impl NullModel {
    ///
    /// Uniform residues with expected length 1000
    ///
    pub fn default_for(alphabet: Alphabet) -> Self {
        let n = alphabet.size();
        NullModel {
            residues: vec![1.0 / n as f64; n],
            p1: DEFAULT_NULL_P1,
        }
    }
    ///
    /// Background residues taken from an emission distribution
    ///
    pub fn from_emission<P: Probability>(emission: &Distribution<P>, p1: f64) -> Self {
        NullModel {
            residues: emission.values(),
            p1,
        }
    }
    /// expected length of a background run
    pub fn expected_length(&self) -> f64 {
        1.0 / (1.0 - self.p1)
    }
}

///
/// `p = 1 - 1/length`, the loop probability of a geometric run with
/// expected length `length`
///
pub fn loop_probability_from_length(length: f64) -> f64 {
    1.0 - 1.0 / length
}
