//!
//! test of the profile -> alignment profile -> plan7 pipeline
//!
#[macro_use]
extern crate approx;

use profuse::aggregate::AggregateOptions;
use profuse::alignment_profile::AlignmentProfile;
use profuse::alphabet::Alphabet;
use profuse::builder::{consensus_to_profile, gapped_alignment_to_profile};
use profuse::common::Sequences;
use profuse::engine::{gen_alignment_profiles, AlignmentEngine, GenOptions};
use profuse::error::{ProfuseError, Result};
use profuse::io::json;
use profuse::params::ProfileParams;
use profuse::plan7::{profile_to_plan7, EntryExitPolicy, TranscodeOptions};
use profuse::prob::{Prob, Probability};
use profuse::profile::Profile;
use profuse::sample::draw_sequences;

/// counts the i-th residue of each sequence as a match at position i + 1
struct ColumnEngine;

impl<P: Probability> AlignmentEngine<P> for ColumnEngine {
    fn score(&self, _profile: &Profile<P>, sequences: &Sequences, _viterbi: bool) -> Result<f64> {
        Ok(sequences.len() as f64)
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
                let e = &mut a.position_mut(i + 1).match_emission;
                e[k] = e[k] + P::one();
            }
        }
        Ok(())
    }
}

fn conserved_params() -> ProfileParams {
    let mut params = ProfileParams::uniform(0.0, 0.1);
    params.pre_align_insertion = 0.0;
    params.post_align_insertion = 0.0;
    params
}

#[test]
fn drawn_sequences_recover_the_consensus() {
    let consensus = b"ACGTTGCATG";
    let params = conserved_params();
    let profile: Profile<f64> = consensus_to_profile(consensus, Alphabet::Dna, 1.0, &params).unwrap();
    let (sequences, _) = draw_sequences(&profile, 6, 0, "s");

    let options = GenOptions {
        sequence_count: Some(4),
        viterbi: false,
        aggregate: AggregateOptions {
            normalize: true,
            ..AggregateOptions::combined()
        },
    };
    let aggregated = gen_alignment_profiles(&ColumnEngine, &profile, &sequences, &options).unwrap();
    assert_eq!(aggregated.len(), 1);
    let a = &aggregated[0];
    assert_eq!(a.len(), consensus.len() + 1);
    for (i, &c) in consensus.iter().enumerate() {
        let k = Alphabet::Dna.index_of(c).unwrap();
        assert_abs_diff_eq!(a.position(i + 1).match_emission[k], 1.0, epsilon = 1e-12);
    }

    let individual = gen_alignment_profiles(
        &ColumnEngine,
        &profile,
        &sequences,
        &GenOptions {
            aggregate: AggregateOptions::individual(),
            ..GenOptions::default()
        },
    )
    .unwrap();
    assert_eq!(individual.len(), 6);
}

#[test]
fn alignment_profile_to_plan7_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let profile_path = dir.path().join("profile.json");
    let profile_path = profile_path.to_str().unwrap();

    let alignment: Vec<Vec<u8>> = ["ACG-TA", "ACGGTA", "A-G-TT", "ACG-TA"]
        .iter()
        .map(|s| s.as_bytes().to_vec())
        .collect();
    let profile: Profile<f64> = gapped_alignment_to_profile(
        &alignment,
        b"ACG-TA",
        Alphabet::Dna,
        &ProfileParams::default(),
    )
    .unwrap();
    assert_eq!(profile.len(), 5);
    assert_eq!(profile.consensus(), b"ACGTA".to_vec());
    profile.validate(1e-9).unwrap();
    json::save_profile(&profile, profile_path).unwrap();

    let loaded: Profile<f64> = json::load_profile(profile_path).unwrap();
    assert_eq!(loaded, profile);
    for policy in [EntryExitPolicy::Geometric, EntryExitPolicy::Uniform].iter() {
        let options = TranscodeOptions {
            entry_exit: *policy,
            ..TranscodeOptions::default()
        };
        let hmm = profile_to_plan7(&loaded, &options).unwrap();
        assert_eq!(hmm.len(), 5);
        assert_eq!(hmm.name, "profuse");
        for row in hmm.match_emissions.iter() {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
        let entry: f64 = hmm.tbd1 + hmm.begin.iter().sum::<f64>();
        assert_abs_diff_eq!(entry, 1.0, epsilon = 1e-9);
    }
    // transcoding a copy leaves the stored profile as it was
    assert_eq!(loaded, profile);
}

#[test]
fn policies_agree_on_the_transcoded_model() {
    let params = ProfileParams::default();
    let real: Profile<f64> = consensus_to_profile(b"ACGTACGTAC", Alphabet::Dna, 0.85, &params).unwrap();
    let log: Profile<Prob> = real.to_policy();
    let options = TranscodeOptions::default();
    let a = profile_to_plan7(&real, &options).unwrap();
    let b = profile_to_plan7(&log, &options).unwrap();
    for (x, y) in a.match_emissions.iter().zip(b.match_emissions.iter()) {
        for (p, q) in x.iter().zip(y.iter()) {
            assert_abs_diff_eq!(p, q, epsilon = 1e-9);
        }
    }
    for (x, y) in a.transitions.iter().zip(b.transitions.iter()) {
        for (p, q) in x.iter().zip(y.iter()) {
            assert_abs_diff_eq!(p, q, epsilon = 1e-9);
        }
    }
    assert_abs_diff_eq!(real.self_entropy(), log.self_entropy(), epsilon = 1e-9);
}
