///
/// probability calculation
/// implements logaddexp
///
pub mod policy;
pub use policy::Probability;

use approx::AbsDiffEq;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;

///
/// Wrapper of f64 that represents probability `0 <= p` in log space
///
/// Values above 1 are allowed so that expected counts can be stored in
/// the same representation as probabilities.
///
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, SerializeDisplay, DeserializeFromStr)]
pub struct Prob(f64);

///
/// short-hand of `Prob::from_prob`
///
pub fn p(p: f64) -> Prob {
    Prob::from_prob(p)
}

impl Prob {
    ///
    ///
    pub fn from_prob(value: f64) -> Prob {
        Prob(value.ln())
    }
    ///
    ///
    pub fn from_log_prob(log_value: f64) -> Prob {
        Prob(log_value)
    }
    ///
    /// Get the probability (in `[0, 1]` for a probability, `>= 0` for a count)
    pub fn to_value(self) -> f64 {
        self.0.exp()
    }
    ///
    /// Is `p == 0` or not? (log p = -inf)
    ///
    pub fn is_zero(self) -> bool {
        self.0.is_infinite() && self.0.is_sign_negative()
    }
    ///
    /// prob=0.0
    ///
    pub fn zero() -> Prob {
        Prob(f64::NEG_INFINITY)
    }
    ///
    /// prob=1.0
    ///
    pub fn one() -> Prob {
        Prob(0.0)
    }
}

/// p=0 (Prob(-inf)) as a default value
impl Default for Prob {
    fn default() -> Self {
        Prob(f64::NEG_INFINITY)
    }
}

///
/// Prob has multiplicative identity element
/// `num_traits::One`
///
impl num_traits::One for Prob {
    fn one() -> Self {
        Prob::one()
    }
}

///
/// Prob has additive identity element
/// `num_traits::Zero`
///
impl num_traits::Zero for Prob {
    fn zero() -> Self {
        Prob::zero()
    }
    fn is_zero(&self) -> bool {
        Prob::is_zero(*self)
    }
}

// display
impl std::fmt::Display for Prob {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({:.4})", self.0, self.to_value())
    }
}

/// Parses both `"{log}({value})"` (the Display form) and a bare log value.
impl FromStr for Prob {
    type Err = std::num::ParseFloatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let front = match s.split_once('(') {
            Some((front, _)) => front,
            None => s,
        };
        front.trim().parse::<f64>().map(Prob)
    }
}

/// Addition of two probabilities `px + py` in log space
///
/// If `px > py`:
///
/// ```text
/// log(exp(x) + exp(y))
///  = log(exp(x) (1 + exp(y-x)))
///  = log(exp(x)) + log(1 + exp(y-x))
///  = x + log(1 + exp(y-x))
/// ```
impl std::ops::Add for Prob {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let x = self.0;
        let y = other.0;
        let (x, y) = if x >= y { (x, y) } else { (y, x) };
        if y == f64::NEG_INFINITY {
            // x + 0 = x
            Prob(x)
        } else if x == y {
            // x + x = 2x
            Prob(x + 2f64.ln())
        } else {
            Prob(x + (y - x).exp().ln_1p())
        }
    }
}

/// Multiplication of two probabilities `px * py` in log space
///
/// ```text
/// log(px * py) = log(px) + log(py)
/// ```
impl std::ops::Mul for Prob {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Prob(self.0 + other.0)
    }
}

/// Division of two probabilities `px / py` in log space
///
/// ```text
/// log(px / py) = log(px) - log(py)
/// ```
impl std::ops::Div for Prob {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        Prob(self.0 - other.0)
    }
}

// assign
impl std::ops::AddAssign for Prob {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
impl std::ops::MulAssign for Prob {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}
impl std::ops::DivAssign for Prob {
    fn div_assign(&mut self, other: Self) {
        *self = *self / other;
    }
}

/// for approx `assert_abs_diff_eq`
impl AbsDiffEq for Prob {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self.0, &other.0, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id() {
        let x = Prob::from_prob(0.3);
        let e = Prob::from_prob(0.0);
        assert_relative_eq!((x + e).0, x.0);
        assert_relative_eq!((x * e).0, e.0);
    }
    #[test]
    fn prob_add_mul() {
        assert_eq!(p(0.0) + p(1.0), p(1.0));
        assert_eq!(p(0.0) * p(1.0), p(0.0));
        assert_abs_diff_eq!((p(0.3) + p(0.3)).0, p(0.6).0);
        assert_abs_diff_eq!((p(0.3) * p(0.3)).0, p(0.09).0);
        assert_abs_diff_eq!((p(0.5) + p(0.00001)).0, p(0.50001).0);
    }
    #[test]
    fn test_prob_assign() {
        let mut x = p(0.4);
        let y = p(0.2);
        x += y;
        assert_abs_diff_eq!(x, p(0.6), epsilon = 1e-12);
        let z = p(0.5);
        x *= z;
        assert_abs_diff_eq!(x, p(0.3), epsilon = 1e-12);
        x /= z;
        assert_abs_diff_eq!(x, p(0.6), epsilon = 1e-12);
        let z = p(0.0);
        x += z;
        assert_abs_diff_eq!(x, p(0.6), epsilon = 1e-12);
        x *= z;
        assert!(x.is_zero());
    }
    #[test]
    fn prob_counts_above_one() {
        // expected counts are stored in the same representation
        let c = p(3.0) + p(4.5);
        assert_abs_diff_eq!(c.to_value(), 7.5, epsilon = 1e-12);
        assert_abs_diff_eq!((c / p(2.5)).to_value(), 3.0, epsilon = 1e-12);
    }
    #[test]
    fn prob_zero_one() {
        assert_eq!(Prob::one(), Prob::from_prob(1.0));
        assert_eq!(Prob::zero(), Prob::from_prob(0.0));
        assert!(Prob::zero().is_zero());
    }
    #[test]
    fn prob_serialize() {
        // Display and FromStr
        let p1 = Prob::one();
        let p05 = Prob::from_prob(0.5);
        let p0 = Prob::zero();
        assert_eq!(Prob::from_str(&p1.to_string()).unwrap(), p1);
        assert_eq!(Prob::from_str(&p05.to_string()).unwrap(), p05);
        assert_eq!(Prob::from_str(&p0.to_string()).unwrap(), p0);
        assert_eq!(Prob::from_str("-0.5").unwrap(), Prob::from_log_prob(-0.5));
        assert!(Prob::from_str("x(0.1)").is_err());

        let f = |p: Prob| -> Prob {
            let json = serde_json::to_string(&p).unwrap();
            serde_json::from_str(&json).unwrap()
        };
        assert_eq!(p1, f(p1));
        assert_eq!(p05, f(p05));
        assert_eq!(p0, f(p0));
    }
}
