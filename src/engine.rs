//!
//! Boundary to the dynamic-programming engine
//!
//! The forward/Viterbi engine that scores sequences against a profile is an
//! external collaborator. `AlignmentEngine` is the interface it implements;
//! `gen_alignment_profiles` drives it and aggregates its output.
//!
use crate::aggregate::{aggregate_alignment_profiles, AggregateOptions};
use crate::alignment_profile::AlignmentProfile;
use crate::common::Sequences;
use crate::error::{ProfuseError, Result};
use crate::prob::Probability;
use crate::profile::Profile;
use log::info;
use rayon::prelude::*;

pub trait AlignmentEngine<P: Probability> {
    ///
    /// Score of `sequences` given `profile`;
    /// the best-path score if `viterbi` is set, the total probability otherwise.
    ///
    fn score(&self, profile: &Profile<P>, sequences: &Sequences, viterbi: bool) -> Result<f64>;
    ///
    /// Fill `alignment_profiles[i]` with the expected counts of `sequences[i]`.
    /// Each alignment profile is pre-allocated to `profile.len() + 1` positions.
    ///
    fn align_and_populate(
        &self,
        profile: &Profile<P>,
        sequences: &Sequences,
        alignment_profiles: &mut [AlignmentProfile<P>],
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenOptions {
    /// use at most this many sequences (`None` or 0 for all)
    pub sequence_count: Option<usize>,
    /// score with Viterbi instead of forward
    pub viterbi: bool,
    pub aggregate: AggregateOptions,
}

///
/// Score the sequences, compute one alignment profile per sequence and
/// aggregate them.
///
pub fn gen_alignment_profiles<P, E>(
    engine: &E,
    profile: &Profile<P>,
    sequences: &Sequences,
    options: &GenOptions,
) -> Result<Vec<AlignmentProfile<P>>>
where
    P: Probability,
    E: AlignmentEngine<P>,
{
    if sequences.is_empty() {
        return Err(ProfuseError::EmptyInput("sequence set".to_string()));
    }
    let n = match options.sequence_count {
        None | Some(0) => sequences.len(),
        Some(n) => n.min(sequences.len()),
    };
    let sequences = sequences.truncated(n);

    let alphabet = profile.alphabet();
    let invalid = sequences.par_iter().find_map_first(|r| {
        r.seq
            .iter()
            .position(|&c| alphabet.index_of(c).is_none())
            .map(|i| (i, r.seq[i]))
    });
    if let Some((position, c)) = invalid {
        return Err(ProfuseError::InvalidResidue {
            symbol: c as char,
            position,
        });
    }

    let score = engine.score(profile, &sequences, options.viterbi)?;
    if options.viterbi {
        info!("total viterbi score of {} sequences: {}", n, score);
    } else {
        info!("total probability of {} sequences: {}", n, score);
    }

    let mut alignment_profiles: Vec<AlignmentProfile<P>> = (0..n)
        .map(|_| AlignmentProfile::new(profile.alphabet(), profile.len() + 1))
        .collect();
    engine.align_and_populate(profile, &sequences, &mut alignment_profiles)?;
    aggregate_alignment_profiles(alignment_profiles, &options.aggregate)
}

#[cfg(test)]
pub mod mocks {
    //! Engine stand-in that counts residues on the diagonal.
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    pub struct DiagonalEngine {
        pub scored: Cell<usize>,
    }

    impl<P: Probability> AlignmentEngine<P> for DiagonalEngine {
        fn score(&self, _profile: &Profile<P>, sequences: &Sequences, _viterbi: bool) -> Result<f64> {
            self.scored.set(sequences.len());
            Ok(-(sequences.len() as f64))
        }
        fn align_and_populate(
            &self,
            profile: &Profile<P>,
            sequences: &Sequences,
            alignment_profiles: &mut [AlignmentProfile<P>],
        ) -> Result<()> {
            for (record, a) in sequences.iter().zip(alignment_profiles.iter_mut()) {
                for (i, &c) in record.seq.iter().take(profile.len()).enumerate() {
                    let k = profile
                        .alphabet()
                        .index_of(c)
                        .ok_or(ProfuseError::InvalidResidue {
                            symbol: c as char,
                            position: i,
                        })?;
                    a.position_mut(i + 1).match_emission[k] += P::one();
                }
                a.set_scale(P::from_value(2.0));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::DiagonalEngine;
    use super::*;
    use crate::aggregate::AggregateMode;
    use crate::alphabet::Alphabet;

    fn setup() -> (Profile<f64>, Sequences) {
        let profile = Profile::new(Alphabet::Dna, 3);
        let sequences = Sequences::from_seqs(vec![
            b"ACG".to_vec(),
            b"ACT".to_vec(),
            b"TCG".to_vec(),
        ]);
        (profile, sequences)
    }

    #[test]
    fn gen_combined() {
        let (profile, sequences) = setup();
        let engine = DiagonalEngine::default();
        let out =
            gen_alignment_profiles(&engine, &profile, &sequences, &GenOptions::default()).unwrap();
        assert_eq!(engine.scored.get(), 3);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 4);
        // A, A, T at the first position, scale 2 folded in
        assert_eq!(out[0].position(1).match_emission.values(), vec![4.0, 0.0, 0.0, 2.0]);
        assert_abs_diff_eq!(out[0].total_match_count(), 18.0);
    }
    #[test]
    fn gen_individual_limited() {
        let (profile, sequences) = setup();
        let engine = DiagonalEngine::default();
        let options = GenOptions {
            sequence_count: Some(2),
            viterbi: true,
            aggregate: AggregateOptions {
                mode: AggregateMode::Individual,
                normalize: false,
            },
        };
        let out = gen_alignment_profiles(&engine, &profile, &sequences, &options).unwrap();
        assert_eq!(engine.scored.get(), 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].position(3).match_emission.values(), vec![0.0, 0.0, 0.0, 2.0]);
    }
    #[test]
    fn gen_errors() {
        let (profile, _) = setup();
        let engine = DiagonalEngine::default();
        let empty = Sequences::default();
        assert!(gen_alignment_profiles(&engine, &profile, &empty, &GenOptions::default()).is_err());
        let bad = Sequences::from_seqs(vec![b"ACG".to_vec(), b"AXG".to_vec()]);
        assert!(matches!(
            gen_alignment_profiles(&engine, &profile, &bad, &GenOptions::default()),
            Err(ProfuseError::InvalidResidue {
                symbol: 'X',
                position: 1
            })
        ));
        // rejected before the engine is asked to score
        assert_eq!(engine.scored.get(), 0);
        // residues beyond the used sequences are not checked
        let options = GenOptions {
            sequence_count: Some(1),
            ..GenOptions::default()
        };
        assert!(gen_alignment_profiles(&engine, &profile, &bad, &options).is_ok());
    }
}
