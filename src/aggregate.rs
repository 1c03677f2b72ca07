//!
//! Combining per-sequence alignment profiles
//!
//! - **Individual**: every profile is unscaled and returned in input order.
//! - **Combined**: zero, `+=` every profile in input order, unscale the sum,
//!   and return it as a single-element vector.
//!
//! Normalization is off by default, so that a combined profile keeps the
//! magnitude of its number of contributing sequences.
//!
use crate::alignment_profile::AlignmentProfile;
use crate::error::{ProfuseError, Result};
use crate::prob::Probability;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateMode {
    Individual,
    Combined,
}

impl Default for AggregateMode {
    fn default() -> Self {
        AggregateMode::Combined
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateOptions {
    pub mode: AggregateMode,
    /// normalize the resulting profiles into distributions
    pub normalize: bool,
}

impl AggregateOptions {
    pub fn individual() -> Self {
        AggregateOptions {
            mode: AggregateMode::Individual,
            normalize: false,
        }
    }
    pub fn combined() -> Self {
        AggregateOptions::default()
    }
}

pub fn aggregate_alignment_profiles<P: Probability>(
    mut profiles: Vec<AlignmentProfile<P>>,
    options: &AggregateOptions,
) -> Result<Vec<AlignmentProfile<P>>> {
    let first = match profiles.first() {
        Some(first) => first,
        None => {
            return Err(ProfuseError::EmptyInput(
                "no alignment profiles to aggregate".to_string(),
            ))
        }
    };
    let (length, alphabet) = (first.len(), first.alphabet());
    for a in profiles.iter() {
        if a.len() != length {
            return Err(ProfuseError::LengthMismatch {
                what: "alignment profile".to_string(),
                expected: length,
                found: a.len(),
            });
        }
        if a.alphabet() != alphabet {
            return Err(ProfuseError::AlphabetMismatch(
                alphabet.to_string(),
                a.alphabet().to_string(),
            ));
        }
    }

    match options.mode {
        AggregateMode::Individual => {
            debug!("unscaling {} individual alignment profiles", profiles.len());
            profiles.par_iter_mut().for_each(|a| {
                a.unscale();
                if options.normalize {
                    a.normalize();
                }
            });
            Ok(profiles)
        }
        AggregateMode::Combined => {
            info!("combining {} alignment profiles", profiles.len());
            let mut combined = AlignmentProfile::new(alphabet, length);
            combined.zero();
            for a in profiles.iter() {
                combined += a;
            }
            combined.unscale();
            if options.normalize {
                combined.normalize();
            }
            Ok(vec![combined])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::prob::Prob;
    use crate::profile::FromInsertion;
    use itertools::Itertools;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn random_profile(seed: u64, length: usize) -> AlignmentProfile<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut a = AlignmentProfile::new(Alphabet::Dna, length);
        for i in 0..length {
            let position = a.position_mut(i);
            for k in 0..4 {
                position.match_emission[k] = rng.gen_range(0.0..1.0);
                position.insertion_emission[k] = rng.gen_range(0.0..0.1);
            }
            position
                .transitions
                .from_insertion
                .set(FromInsertion::ToMatch, rng.gen_range(0.0..1.0));
        }
        a.set_scale(rng.gen_range(0.5..2.0));
        a
    }

    fn assert_close(a: &AlignmentProfile<f64>, b: &AlignmentProfile<f64>) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.positions().iter().zip(b.positions().iter()) {
            for k in 0..4 {
                assert_abs_diff_eq!(x.match_emission[k], y.match_emission[k], epsilon = 1e-9);
                assert_abs_diff_eq!(
                    x.insertion_emission[k],
                    y.insertion_emission[k],
                    epsilon = 1e-9
                );
            }
            assert_abs_diff_eq!(
                x.transitions.from_insertion.get(FromInsertion::ToMatch),
                y.transitions.from_insertion.get(FromInsertion::ToMatch),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn combine_single_is_unscale() {
        let a = random_profile(0, 5);
        let combined = aggregate_alignment_profiles(vec![a.clone()], &AggregateOptions::combined())
            .unwrap();
        assert_eq!(combined.len(), 1);
        let mut expected = a;
        expected.unscale();
        assert_close(&combined[0], &expected);
        assert_abs_diff_eq!(combined[0].scale(), 1.0);
    }
    #[test]
    fn combine_is_commutative() {
        let profiles: Vec<_> = (0..3).map(|s| random_profile(s, 6)).collect();
        let reference =
            aggregate_alignment_profiles(profiles.clone(), &AggregateOptions::combined()).unwrap();
        for order in (0..3).permutations(3) {
            let shuffled: Vec<_> = order.iter().map(|&i| profiles[i].clone()).collect();
            let combined =
                aggregate_alignment_profiles(shuffled, &AggregateOptions::combined()).unwrap();
            assert_close(&combined[0], &reference[0]);
        }
    }
    #[test]
    fn combined_keeps_magnitude() {
        let profiles: Vec<_> = (0..4).map(|s| random_profile(s, 3)).collect();
        let expected: f64 = profiles.iter().map(|a| a.total_match_count()).sum();
        let combined =
            aggregate_alignment_profiles(profiles.clone(), &AggregateOptions::combined()).unwrap();
        assert_abs_diff_eq!(combined[0].total_match_count(), expected, epsilon = 1e-9);

        let options = AggregateOptions {
            mode: AggregateMode::Combined,
            normalize: true,
        };
        let normalized = aggregate_alignment_profiles(profiles, &options).unwrap();
        for p in normalized[0].positions().iter() {
            assert!(p.match_emission.is_simplex(1e-9));
        }
    }
    #[test]
    fn individual_returns_all_in_order() {
        let profiles: Vec<_> = (0..4).map(|s| random_profile(s, 3)).collect();
        let out =
            aggregate_alignment_profiles(profiles.clone(), &AggregateOptions::individual()).unwrap();
        assert_eq!(out.len(), 4);
        for (o, p) in out.iter().zip(profiles.into_iter()) {
            let mut p = p;
            p.unscale();
            assert_close(o, &p);
        }
    }
    #[test]
    fn aggregate_log_space() {
        let a: AlignmentProfile<Prob> = random_profile(1, 2).to_policy();
        let b: AlignmentProfile<Prob> = random_profile(2, 2).to_policy();
        let combined =
            aggregate_alignment_profiles(vec![a.clone(), b.clone()], &AggregateOptions::combined())
                .unwrap();
        let expected = a.total_match_count() + b.total_match_count();
        assert_abs_diff_eq!(combined[0].total_match_count(), expected, epsilon = 1e-9);
    }
    #[test]
    fn aggregate_errors() {
        assert!(aggregate_alignment_profiles::<f64>(vec![], &AggregateOptions::combined()).is_err());
        let profiles = vec![random_profile(0, 3), random_profile(1, 4)];
        assert!(matches!(
            aggregate_alignment_profiles(profiles, &AggregateOptions::combined()),
            Err(ProfuseError::LengthMismatch { .. })
        ));
        let mixed = vec![
            AlignmentProfile::<f64>::new(Alphabet::Dna, 2),
            AlignmentProfile::<f64>::new(Alphabet::AminoAcid, 2),
        ];
        assert!(aggregate_alignment_profiles(mixed, &AggregateOptions::individual()).is_err());
    }
}
