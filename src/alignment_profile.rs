//!
//! Alignment profile: expected sufficient statistics of a profile
//!
//! An alignment profile of a profile of length `L` has `L+1` positions;
//! position 0 is the flanking (initial/terminal) slot. Each position holds
//! expected usage counts of the match emission, the insertion emission and
//! the transitions, accumulated over one or more sequences.
//!
//! Counts are stored divided by `scale`, a factor the DP engine introduces
//! to keep values in range. `unscale()` folds it back into the counts.
//!
use crate::alphabet::Alphabet;
use crate::distribution::Distribution;
use crate::prob::Probability;
use crate::profile::Transitions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Probability")]
pub struct AlignmentProfilePosition<P> {
    pub match_emission: Distribution<P>,
    pub insertion_emission: Distribution<P>,
    pub transitions: Transitions<P>,
}

impl<P: Probability> AlignmentProfilePosition<P> {
    pub fn zeros(alphabet: Alphabet) -> Self {
        AlignmentProfilePosition {
            match_emission: Distribution::zeros(alphabet.size()),
            insertion_emission: Distribution::zeros(alphabet.size()),
            transitions: Transitions::zeros(),
        }
    }
    fn distributions_mut(&mut self) -> impl Iterator<Item = &mut Distribution<P>> {
        let AlignmentProfilePosition {
            match_emission,
            insertion_emission,
            transitions,
        } = self;
        std::iter::once(match_emission)
            .chain(std::iter::once(insertion_emission))
            .chain(transitions.distributions_mut())
    }
    /// multiply every count by `factor`
    pub fn scale(&mut self, factor: P) {
        for d in self.distributions_mut() {
            d.scale(factor);
        }
    }
    /// normalize every distribution of the position
    pub fn normalize(&mut self) {
        for d in self.distributions_mut() {
            d.normalize(0.0);
        }
    }
    /// expected number of match emissions
    pub fn match_count(&self) -> P {
        self.match_emission.total()
    }
}

impl<'a, P: Probability> std::ops::AddAssign<&'a AlignmentProfilePosition<P>>
    for AlignmentProfilePosition<P>
{
    fn add_assign(&mut self, other: &'a AlignmentProfilePosition<P>) {
        self.match_emission += &other.match_emission;
        self.insertion_emission += &other.insertion_emission;
        self.transitions += &other.transitions;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Probability")]
pub struct AlignmentProfile<P> {
    alphabet: Alphabet,
    positions: Vec<AlignmentProfilePosition<P>>,
    scale: P,
}

impl<P: Probability> AlignmentProfile<P> {
    ///
    /// All-zero alignment profile of `length` positions
    /// (`length` is the profile length + 1).
    ///
    pub fn new(alphabet: Alphabet, length: usize) -> Self {
        AlignmentProfile {
            alphabet,
            positions: (0..length)
                .map(|_| AlignmentProfilePosition::zeros(alphabet))
                .collect(),
            scale: P::one(),
        }
    }
    ///
    /// Resize to `length` positions, all zero.
    ///
    pub fn reinitialize(&mut self, length: usize) {
        *self = AlignmentProfile::new(self.alphabet, length);
    }
    ///
    /// Set every count to 0 and the scale to 1.
    ///
    pub fn zero(&mut self) {
        self.reinitialize(self.len());
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
    pub fn scale(&self) -> P {
        self.scale
    }
    pub fn set_scale(&mut self, scale: P) {
        self.scale = scale;
    }
    pub fn positions(&self) -> &[AlignmentProfilePosition<P>] {
        &self.positions
    }
    pub fn position(&self, index: usize) -> &AlignmentProfilePosition<P> {
        &self.positions[index]
    }
    pub fn position_mut(&mut self, index: usize) -> &mut AlignmentProfilePosition<P> {
        &mut self.positions[index]
    }
    ///
    /// Multiply the counts by the scale and reset the scale to 1.
    ///
    pub fn unscale(&mut self) {
        let scale = self.scale;
        for position in self.positions.iter_mut() {
            position.scale(scale);
        }
        self.scale = P::one();
    }
    ///
    /// Turn every count vector into a distribution.
    /// The scale no longer matters after this and is reset to 1.
    ///
    pub fn normalize(&mut self) {
        for position in self.positions.iter_mut() {
            position.normalize();
        }
        self.scale = P::one();
    }
    /// total expected match emissions over all positions
    pub fn total_match_count(&self) -> f64 {
        self.positions
            .iter()
            .map(|p| p.match_count().to_value())
            .sum::<f64>()
            * self.scale.to_value()
    }
    pub fn to_policy<Q: Probability>(&self) -> AlignmentProfile<Q> {
        AlignmentProfile {
            alphabet: self.alphabet,
            positions: self
                .positions
                .iter()
                .map(|p| AlignmentProfilePosition {
                    match_emission: p.match_emission.to_policy(),
                    insertion_emission: p.insertion_emission.to_policy(),
                    transitions: p.transitions.to_policy(),
                })
                .collect(),
            scale: Q::from_value(self.scale.to_value()),
        }
    }
}

///
/// Add the counts of `other` into `self`.
///
/// The other profile's counts are brought to the scale of `self` first.
/// Panics if the lengths or alphabets differ.
///
impl<'a, P: Probability> std::ops::AddAssign<&'a AlignmentProfile<P>> for AlignmentProfile<P> {
    fn add_assign(&mut self, other: &'a AlignmentProfile<P>) {
        assert_eq!(self.len(), other.len(), "adding alignment profiles of different lengths");
        assert_eq!(self.alphabet, other.alphabet);
        if other.scale == self.scale {
            for (a, b) in self.positions.iter_mut().zip(other.positions.iter()) {
                *a += b;
            }
        } else {
            let ratio = other.scale / self.scale;
            for (a, b) in self.positions.iter_mut().zip(other.positions.iter()) {
                let mut b = b.clone();
                b.scale(ratio);
                *a += &b;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FromMatch;

    #[test]
    fn new_is_zero() {
        let a: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 4);
        assert_eq!(a.len(), 4);
        assert_abs_diff_eq!(a.total_match_count(), 0.0);
        assert_abs_diff_eq!(a.scale(), 1.0);
    }
    #[test]
    fn unscale_folds_scale_into_counts() {
        let mut a: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 2);
        a.position_mut(1).match_emission[2] = 0.5;
        a.position_mut(1).transitions.from_match.set(FromMatch::ToMatch, 0.25);
        a.set_scale(4.0);
        assert_abs_diff_eq!(a.total_match_count(), 2.0);
        a.unscale();
        assert_abs_diff_eq!(a.scale(), 1.0);
        assert_abs_diff_eq!(a.position(1).match_emission[2], 2.0);
        assert_abs_diff_eq!(a.position(1).transitions.from_match.get(FromMatch::ToMatch), 1.0);
        assert_abs_diff_eq!(a.total_match_count(), 2.0);
    }
    #[test]
    fn add_with_different_scales() {
        let mut a: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 2);
        a.position_mut(0).match_emission[0] = 1.0;
        a.set_scale(2.0);
        let mut b: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 2);
        b.position_mut(0).match_emission[0] = 1.0;
        b.set_scale(6.0);
        a += &b;
        // 1*2 + 1*6 = 8 = 4 * scale 2
        assert_abs_diff_eq!(a.position(0).match_emission[0], 4.0);
        a.unscale();
        assert_abs_diff_eq!(a.position(0).match_emission[0], 8.0);
    }
    #[test]
    fn zero_and_normalize() {
        let mut a: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 2);
        a.position_mut(1).match_emission[3] = 3.0;
        a.position_mut(1).match_emission[0] = 1.0;
        a.set_scale(10.0);
        let mut n = a.clone();
        n.normalize();
        assert_eq!(n.position(1).match_emission.values(), vec![0.25, 0.0, 0.0, 0.75]);
        assert_eq!(n.position(0).match_emission.values(), vec![0.25; 4]);
        a.zero();
        assert_eq!(a, AlignmentProfile::new(Alphabet::Dna, 2));
    }
    #[test]
    #[should_panic]
    fn add_different_lengths() {
        let mut a: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 2);
        let b: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 3);
        a += &b;
    }
}
