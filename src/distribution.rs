//!
//! Distribution over a small fixed set of outcomes
//!
//! Used both for residue emissions (outcome = residue index) and for
//! transitions (outcome = successor state, see `profile::transitions`).
//! The same structure stores unnormalized expected counts in alignment
//! profiles.
//!
use crate::prob::Probability;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

///
/// Outcome of a distribution that is addressed by name
/// rather than by a bare index.
///
pub trait Outcome: Copy {
    /// index of the outcome in its distribution
    fn index(self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound = "P: Probability")]
pub struct Distribution<P>(Vec<P>);

impl<P: Probability> Distribution<P> {
    ///
    /// Even distribution (`1/n` per outcome) of `n` outcomes
    ///
    pub fn new(n: usize) -> Self {
        let mut d = Distribution(vec![P::zero(); n]);
        d.even();
        d
    }
    ///
    /// All-zero distribution, used as an accumulator
    ///
    pub fn zeros(n: usize) -> Self {
        Distribution(vec![P::zero(); n])
    }
    pub fn from_values(values: &[f64]) -> Self {
        Distribution(values.iter().map(|&v| P::from_value(v)).collect())
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &P> + '_ {
        self.0.iter()
    }
    /// plain (real-space) values
    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.to_value()).collect()
    }
    /// value of a named outcome
    pub fn get<K: Outcome>(&self, outcome: K) -> P {
        self.0[outcome.index()]
    }
    /// set value of a named outcome
    pub fn set<K: Outcome>(&mut self, outcome: K, value: P) {
        self.0[outcome.index()] = value;
    }
    ///
    /// set all mass to 0
    ///
    pub fn zero(&mut self) {
        for x in self.0.iter_mut() {
            *x = P::zero();
        }
    }
    ///
    /// set `1/n` to every outcome
    ///
    pub fn even(&mut self) {
        let n = self.0.len();
        if n == 0 {
            return;
        }
        let v = P::one() / P::from_value(n as f64);
        for x in self.0.iter_mut() {
            *x = v;
        }
    }
    /// total mass
    pub fn total(&self) -> P {
        self.0.iter().fold(P::zero(), |acc, &x| acc + x)
    }
    ///
    /// Rescale to sum to 1.
    /// If the total mass is `<= floor`, the distribution becomes `even()`.
    ///
    pub fn normalize(&mut self, floor: f64) {
        let total = self.total();
        if total.to_value() <= floor {
            self.even();
        } else {
            for x in self.0.iter_mut() {
                *x /= total;
            }
        }
    }
    /// multiply every outcome by `factor`
    pub fn scale(&mut self, factor: P) {
        for x in self.0.iter_mut() {
            *x *= factor;
        }
    }
    ///
    /// weighted sum `self = w_self * self + w_other * other`
    ///
    pub fn combine(&mut self, w_self: P, other: &Distribution<P>, w_other: P) {
        assert_eq!(self.len(), other.len(), "combining distributions of different shapes");
        for (x, &y) in self.0.iter_mut().zip(other.0.iter()) {
            *x = w_self * *x + w_other * y;
        }
    }
    ///
    /// index of the largest outcome (the first one if tied)
    ///
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &x) in self.0.iter().enumerate() {
            if x > self.0[best] {
                best = i;
            }
        }
        best
    }
    ///
    /// non-negative and sums to 1 within `eps`
    ///
    pub fn is_simplex(&self, eps: f64) -> bool {
        let values = self.values();
        values.iter().all(|&v| v >= -eps && v.is_finite())
            && (values.iter().sum::<f64>() - 1.0).abs() <= eps
    }
    ///
    /// Cross entropy `H(self, other) = - sum_i p_i ln q_i` in nats.
    /// Outcomes with `p_i = 0` contribute nothing.
    ///
    pub fn cross_entropy(&self, other: &Distribution<P>) -> f64 {
        assert_eq!(self.len(), other.len(), "cross entropy of different shapes");
        self.values()
            .iter()
            .zip(other.values().iter())
            .filter(|&(&p, _)| p > 0.0)
            .map(|(&p, &q)| -p * q.ln())
            .sum()
    }
    ///
    /// draw an outcome index with probability proportional to its mass
    ///
    pub fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        let values = self.values();
        let indices: Vec<usize> = (0..values.len()).collect();
        match indices.choose_weighted(rng, |&i| values[i].max(0.0)) {
            Ok(&i) => i,
            // no positive mass, fall back to uniform
            Err(_) => rng.gen_range(0..values.len().max(1)),
        }
    }
    ///
    /// convert into another numeric policy
    ///
    pub fn to_policy<Q: Probability>(&self) -> Distribution<Q> {
        Distribution(self.0.iter().map(|p| Q::from_value(p.to_value())).collect())
    }
}

impl<P: Probability> std::ops::Index<usize> for Distribution<P> {
    type Output = P;
    fn index(&self, index: usize) -> &P {
        &self.0[index]
    }
}

impl<P: Probability> std::ops::IndexMut<usize> for Distribution<P> {
    fn index_mut(&mut self, index: usize) -> &mut P {
        &mut self.0[index]
    }
}

impl<'a, P: Probability> std::ops::AddAssign<&'a Distribution<P>> for Distribution<P> {
    fn add_assign(&mut self, other: &'a Distribution<P>) {
        assert_eq!(self.len(), other.len(), "adding distributions of different shapes");
        for (x, &y) in self.0.iter_mut().zip(other.0.iter()) {
            *x += y;
        }
    }
}

impl<P: Probability> std::ops::DivAssign<P> for Distribution<P> {
    fn div_assign(&mut self, rhs: P) {
        for x in self.0.iter_mut() {
            *x /= rhs;
        }
    }
}

impl<P: Probability> std::fmt::Display for Distribution<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", v)?;
        }
        write!(f, ")")
    }
}
