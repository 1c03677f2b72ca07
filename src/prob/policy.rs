//!
//! Numeric policy of probabilities
//!
//! Containers in this crate are generic over `P: Probability`, so that
//! real-space (`f64`) and log-space (`Prob`) representations can be mixed
//! in a single build.
//!
use super::Prob;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

///
/// Arithmetic required from a probability (or expected count) representation.
///
pub trait Probability:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + MulAssign
    + DivAssign
    + num_traits::Zero
    + num_traits::One
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
{
    /// Convert from a plain (real-space) value.
    fn from_value(value: f64) -> Self;
    /// Convert into a plain (real-space) value.
    fn to_value(self) -> f64;
    ///
    /// `1 - p`
    ///
    /// Log-space representations have no subtraction, so this goes through
    /// the real-space value.
    fn complement(self) -> Self {
        Self::from_value(1.0 - self.to_value())
    }
}

impl Probability for f64 {
    #[inline]
    fn from_value(value: f64) -> Self {
        value
    }
    #[inline]
    fn to_value(self) -> f64 {
        self
    }
    #[inline]
    fn complement(self) -> Self {
        1.0 - self
    }
}

impl Probability for Prob {
    #[inline]
    fn from_value(value: f64) -> Self {
        Prob::from_prob(value)
    }
    #[inline]
    fn to_value(self) -> f64 {
        Prob::to_value(self)
    }
}
