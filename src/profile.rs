//!
//! Linear profile HMM
//!
//! * `Profile`: positions of match emissions, one shared insertion emission
//!   and position-independent global transitions.
//! * `transitions`: the six global transition distributions and their typed
//!   successor states.
//!
pub mod transitions;

use crate::alphabet::Alphabet;
use crate::common::Sequence;
use crate::distribution::Distribution;
use crate::error::{ProfuseError, Result};
use crate::prob::Probability;
use serde::{Deserialize, Serialize};
pub use transitions::{
    FromBegin, FromDeletion, FromInsertion, FromMatch, FromPostAlign, FromPreAlign, Transitions,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Probability")]
pub struct Profile<P> {
    alphabet: Alphabet,
    positions: Vec<Distribution<P>>,
    transitions: Transitions<P>,
    insertion_emission: Distribution<P>,
}

impl<P: Probability> Profile<P> {
    ///
    /// Profile of `length` positions where every distribution is even.
    ///
    pub fn new(alphabet: Alphabet, length: usize) -> Self {
        Profile {
            alphabet,
            positions: (0..length)
                .map(|_| Distribution::new(alphabet.size()))
                .collect(),
            transitions: Transitions::even(),
            insertion_emission: Distribution::new(alphabet.size()),
        }
    }
    ///
    /// Resize to `length` positions and re-even every distribution.
    ///
    pub fn reinitialize(&mut self, length: usize) {
        *self = Profile::new(self.alphabet, length);
    }
    ///
    /// Set every distribution to even, keeping the length.
    ///
    pub fn even(&mut self) {
        for position in self.positions.iter_mut() {
            position.even();
        }
        for d in self.transitions.distributions_mut().iter_mut() {
            d.even();
        }
        self.insertion_emission.even();
    }
    pub fn len(&self) -> usize {
        self.positions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }
    pub fn positions(&self) -> &[Distribution<P>] {
        &self.positions
    }
    /// match emission of the position
    pub fn position(&self, index: usize) -> &Distribution<P> {
        &self.positions[index]
    }
    pub fn position_mut(&mut self, index: usize) -> &mut Distribution<P> {
        &mut self.positions[index]
    }
    pub fn transitions(&self) -> &Transitions<P> {
        &self.transitions
    }
    pub fn transitions_mut(&mut self) -> &mut Transitions<P> {
        &mut self.transitions
    }
    pub fn insertion_emission(&self) -> &Distribution<P> {
        &self.insertion_emission
    }
    pub fn insertion_emission_mut(&mut self) -> &mut Distribution<P> {
        &mut self.insertion_emission
    }
    ///
    /// Most probable residue of each position
    ///
    pub fn consensus(&self) -> Sequence {
        self.positions
            .iter()
            .map(|d| self.alphabet.symbol(d.argmax()))
            .collect()
    }
    ///
    /// Sum of cross entropies over every match emission, the insertion
    /// emission and the global transitions.
    ///
    pub fn cross_entropy(&self, other: &Profile<P>) -> Result<f64> {
        if self.alphabet != other.alphabet {
            return Err(ProfuseError::AlphabetMismatch(
                self.alphabet.to_string(),
                other.alphabet.to_string(),
            ));
        }
        if self.len() != other.len() {
            return Err(ProfuseError::LengthMismatch {
                what: "profile".to_string(),
                expected: self.len(),
                found: other.len(),
            });
        }
        let emissions: f64 = self
            .positions
            .iter()
            .zip(other.positions.iter())
            .map(|(a, b)| a.cross_entropy(b))
            .sum();
        let transitions: f64 = self
            .transitions
            .distributions()
            .iter()
            .zip(other.transitions.distributions().iter())
            .map(|((_, a), (_, b))| a.cross_entropy(b))
            .sum();
        Ok(emissions
            + self.insertion_emission.cross_entropy(&other.insertion_emission)
            + transitions)
    }
    pub fn self_entropy(&self) -> f64 {
        // same shape, cannot fail
        self.cross_entropy(self).unwrap_or(f64::NAN)
    }
    ///
    /// Check that every distribution is a simplex within `eps`.
    ///
    pub fn validate(&self, eps: f64) -> Result<()> {
        if let Some(i) = self.positions.iter().position(|d| !d.is_simplex(eps)) {
            return Err(ProfuseError::InvalidEmission(format!(
                "match emission of position {} is not a distribution: {}",
                i, self.positions[i]
            )));
        }
        if !self.insertion_emission.is_simplex(eps) {
            return Err(ProfuseError::InvalidEmission(format!(
                "insertion emission is not a distribution: {}",
                self.insertion_emission
            )));
        }
        for (name, d) in self.transitions.distributions().iter() {
            if !d.is_simplex(eps) {
                return Err(ProfuseError::InvalidTransition(format!(
                    "transition from {} is not a distribution: {}",
                    name, d
                )));
            }
        }
        Ok(())
    }
    pub fn to_policy<Q: Probability>(&self) -> Profile<Q> {
        Profile {
            alphabet: self.alphabet,
            positions: self.positions.iter().map(|d| d.to_policy()).collect(),
            transitions: self.transitions.to_policy(),
            insertion_emission: self.insertion_emission.to_policy(),
        }
    }
}

impl<P: Probability> std::fmt::Display for Profile<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "alphabet: {}", self.alphabet)?;
        for (i, d) in self.positions.iter().enumerate() {
            writeln!(f, "{}\t{}", i, d)?;
        }
        writeln!(f, "insertion: {}", self.insertion_emission)?;
        write!(f, "{}", self.transitions)
    }
}
