//!
//! Drivers of the `profuse` subcommands
//!
//! Each driver reads its inputs, runs one library operation and writes the
//! result to the output file (or stdout if it is `None`).
//!
use crate::aggregate::{aggregate_alignment_profiles, AggregateOptions};
use crate::alignment_profile::AlignmentProfile;
use crate::alphabet::Alphabet;
use crate::builder::{consensus_to_profile, gapped_alignment_to_profile};
use crate::common::{sequence_to_string, Record, Sequence, Sequences};
use crate::distribution::Distribution;
use crate::io;
use crate::params::ProfileParams;
use crate::plan7::{transcode, TranscodeOptions};
use crate::profile::Profile;
use crate::sample::{draw_sequences, random_sequence};
use anyhow::{bail, Context, Result};
use log::{debug, info};

/// FASTA id of the consensus written by `profile_to_consensus`
pub const CONSENSUS_ID: &str = "Consensus";

/// Output format of the transcoded model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan7Format {
    /// HMMER2-like text
    Text,
    Json,
}

///
/// Load the parameter config if given, otherwise use the defaults.
///
pub fn load_params(filename: Option<&str>) -> Result<ProfileParams> {
    match filename {
        Some(filename) => {
            let params = io::json::load_params(filename)
                .with_context(|| format!("failed to load parameters from `{}`", filename))?;
            info!("parameters: {}", params);
            Ok(params)
        }
        None => Ok(ProfileParams::default()),
    }
}

fn load_profile(filename: &str) -> Result<Profile<f64>> {
    let profile: Profile<f64> = io::json::load_profile(filename)
        .with_context(|| format!("failed to load profile from `{}`", filename))?;
    debug!("loaded profile of length {} from {}", profile.len(), filename);
    Ok(profile)
}

fn write_profile(profile: &Profile<f64>, output: Option<&str>) -> Result<()> {
    match output {
        Some(filename) => io::json::save_profile(profile, filename)
            .with_context(|| format!("failed to write profile to `{}`", filename))?,
        None => io::write_string(None, &io::json::to_string(profile)?)?,
    }
    Ok(())
}

fn write_sequences(sequences: &Sequences, output: Option<&str>) -> Result<()> {
    match output {
        Some(filename) => {
            let file = std::fs::File::create(filename)
                .with_context(|| format!("failed to create `{}`", filename))?;
            io::fasta::write_sequences(file, sequences)?;
        }
        None => io::fasta::write_sequences(std::io::stdout(), sequences)?,
    }
    Ok(())
}

///
/// Profile from the first sequence of a FASTA file
///
pub fn sequence_to_profile(
    input: &str,
    alphabet: Alphabet,
    conservation_rate: f64,
    params: &ProfileParams,
    output: Option<&str>,
) -> Result<()> {
    info!("reading consensus sequence from {}", input);
    let record = io::fasta::read_first_sequence(input, alphabet)?;
    let profile: Profile<f64> =
        consensus_to_profile(&record.seq, alphabet, conservation_rate, params)
            .with_context(|| format!("failed to build a profile from `{}`", record.id))?;
    info!(
        "built profile of length {} with conservation rate {}",
        profile.len(),
        conservation_rate
    );
    write_profile(&profile, output)
}

///
/// Profile from a multiple alignment. Only the gaps of the first sequence
/// in the consensus file matter: they select the profile columns.
///
pub fn aligned_fasta_to_profile(
    alignment: &str,
    consensus: &str,
    alphabet: Alphabet,
    params: &ProfileParams,
    output: Option<&str>,
) -> Result<()> {
    info!("reading multiple alignment from {}", alignment);
    let rows: Vec<Sequence> = io::fasta::read_alignment(alignment, alphabet)?
        .records
        .into_iter()
        .map(|r| r.seq)
        .collect();
    info!("reading consensus from {}", consensus);
    let mask = io::fasta::read_first_sequence(consensus, alphabet)?;
    debug!("consensus mask: {}", sequence_to_string(&mask.seq));
    let profile: Profile<f64> = gapped_alignment_to_profile(&rows, &mask.seq, alphabet, params)
        .context("failed to build a profile from the alignment")?;
    info!(
        "built profile of length {} from {} aligned sequences",
        profile.len(),
        rows.len()
    );
    write_profile(&profile, output)
}

pub fn profile_to_plan7(
    input: &str,
    options: &TranscodeOptions,
    format: Plan7Format,
    output: Option<&str>,
) -> Result<()> {
    let mut profile = load_profile(input)?;
    let hmm = transcode(&mut profile, options)
        .with_context(|| format!("failed to transcode `{}`", input))?;
    match (format, output) {
        (Plan7Format::Json, Some(filename)) => io::json::save_plan7(&hmm, filename)?,
        (Plan7Format::Json, None) => io::write_string(None, &io::json::to_string(&hmm)?)?,
        (Plan7Format::Text, _) => io::write_string(output, &hmm.to_string())?,
    }
    Ok(())
}

pub fn profile_to_consensus(input: &str, output: Option<&str>) -> Result<()> {
    let profile = load_profile(input)?;
    let consensus = profile.consensus();
    info!("consensus: {}", sequence_to_string(&consensus));
    let sequences = Sequences::from(vec![Record::new(CONSENSUS_ID, consensus)]);
    write_sequences(&sequences, output)
}

///
/// Cross entropy of two profiles, or the self entropy of one
///
pub fn cross_entropy(input: &str, other: Option<&str>) -> Result<f64> {
    let profile = load_profile(input)?;
    let value = match other {
        Some(other) => {
            let profile2 = load_profile(other)?;
            let value = profile.cross_entropy(&profile2)?;
            println!("Cross Entropy: {}", value);
            value
        }
        None => {
            let value = profile.self_entropy();
            println!("Self Entropy: {}", value);
            value
        }
    };
    Ok(value)
}

///
/// `length` i.i.d. residues with the given (unnormalized) residue weights
///
pub fn random_sequence_fasta(
    length: usize,
    alphabet: Alphabet,
    weights: &[f64],
    name: &str,
    seed: u64,
    output: Option<&str>,
) -> Result<()> {
    if weights.len() != alphabet.size() {
        bail!(
            "{} residue weights were given but the {} alphabet has {} residues",
            weights.len(),
            alphabet,
            alphabet.size()
        );
    }
    if weights.iter().any(|&w| w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
        bail!("residue weights must be non-negative and not all zero");
    }
    let distribution: Distribution<f64> = Distribution::from_values(weights);
    let seq = random_sequence(&distribution, alphabet, length, seed);
    write_sequences(&Sequences::from(vec![Record::new(name, seq)]), output)
}

pub fn draw_sequences_fasta(
    input: &str,
    count: usize,
    seed: u64,
    prefix: &str,
    output: Option<&str>,
) -> Result<()> {
    let profile = load_profile(input)?;
    let (sequences, histories) = draw_sequences(&profile, count, seed, prefix);
    for (record, history) in sequences.iter().zip(histories.iter()) {
        debug!("{}: {}", record.id, history.to_path_string());
    }
    info!("drew {} sequences from {}", sequences.len(), input);
    write_sequences(&sequences, output)
}

///
/// Aggregate the alignment profiles stored in `inputs` (in order).
///
pub fn combine_alignment_profiles(
    inputs: &[String],
    options: &AggregateOptions,
    output: Option<&str>,
) -> Result<()> {
    let mut profiles: Vec<AlignmentProfile<f64>> = Vec::new();
    for input in inputs {
        let mut loaded = io::json::load_alignment_profiles(input)
            .with_context(|| format!("failed to load alignment profiles from `{}`", input))?;
        profiles.append(&mut loaded);
    }
    info!(
        "aggregating {} alignment profiles ({:?})",
        profiles.len(),
        options.mode
    );
    let aggregated = aggregate_alignment_profiles(profiles, options)?;
    match output {
        Some(filename) => io::json::save_alignment_profiles(&aggregated, filename)?,
        None => io::write_string(None, &io::json::to_string(&aggregated)?)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateMode;

    fn path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn consensus_file_to_profile_to_consensus() {
        let dir = tempfile::tempdir().unwrap();
        let fasta = path(&dir, "seq.fa");
        let profile = path(&dir, "profile.json");
        let consensus = path(&dir, "consensus.fa");
        std::fs::write(&fasta, ">c\nACGTTGCAAC\n").unwrap();
        sequence_to_profile(
            &fasta,
            Alphabet::Dna,
            0.8,
            &ProfileParams::default(),
            Some(&profile),
        )
        .unwrap();
        profile_to_consensus(&profile, Some(&consensus)).unwrap();
        let written = io::fasta::read_sequences(&consensus, Alphabet::Dna).unwrap();
        assert_eq!(written[0].id, CONSENSUS_ID);
        assert_eq!(written[0].seq, b"ACGTTGCAAC".to_vec());

        let h = cross_entropy(&profile, Some(&profile)).unwrap();
        assert_abs_diff_eq!(h, cross_entropy(&profile, None).unwrap(), epsilon = 1e-12);
    }
    #[test]
    fn alignment_to_profile_and_plan7() {
        let dir = tempfile::tempdir().unwrap();
        let alignment = path(&dir, "aln.fa");
        let consensus = path(&dir, "cons.fa");
        let profile = path(&dir, "profile.json");
        let hmm = path(&dir, "model.hmm");
        std::fs::write(&alignment, ">a\nAC-G\n>b\nA--G\n>c\nACTG\n").unwrap();
        std::fs::write(&consensus, ">mask\nAC-G\n").unwrap();
        aligned_fasta_to_profile(
            &alignment,
            &consensus,
            Alphabet::Dna,
            &ProfileParams::default(),
            Some(&profile),
        )
        .unwrap();
        let p: Profile<f64> = io::json::load_profile(&profile).unwrap();
        assert_eq!(p.len(), 3);

        profile_to_plan7(
            &profile,
            &TranscodeOptions::default(),
            Plan7Format::Text,
            Some(&hmm),
        )
        .unwrap();
        let text = std::fs::read_to_string(&hmm).unwrap();
        assert!(text.trim_end().ends_with("//"));
    }
    #[test]
    fn random_and_drawn_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let random = path(&dir, "random.fa");
        random_sequence_fasta(
            30,
            Alphabet::Dna,
            &[1.0, 0.0, 0.0, 1.0],
            "r",
            4,
            Some(&random),
        )
        .unwrap();
        let seqs = io::fasta::read_sequences(&random, Alphabet::Dna).unwrap();
        assert_eq!(seqs[0].seq.len(), 30);
        assert!(seqs[0].seq.iter().all(|&c| c == b'A' || c == b'T'));
        assert!(
            random_sequence_fasta(30, Alphabet::Dna, &[1.0, 1.0], "r", 4, None).is_err()
        );

        let profile = path(&dir, "profile.json");
        let p: Profile<f64> =
            consensus_to_profile(b"ACGTACGT", Alphabet::Dna, 0.9, &ProfileParams::default())
                .unwrap();
        io::json::save_profile(&p, &profile).unwrap();
        let drawn = path(&dir, "drawn.fa");
        draw_sequences_fasta(&profile, 4, 1, "d", Some(&drawn)).unwrap();
        let seqs = io::fasta::read_sequences(&drawn, Alphabet::Dna).unwrap();
        assert_eq!(seqs.len(), 4);
        assert_eq!(seqs[3].id, "d3");
    }
    #[test]
    fn combine_alignment_profile_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = path(&dir, "a.json");
        let b = path(&dir, "b.json");
        let out = path(&dir, "out.json");
        let mut ap: AlignmentProfile<f64> = AlignmentProfile::new(Alphabet::Dna, 2);
        ap.position_mut(1).match_emission[0] = 1.0;
        io::json::save_alignment_profiles(&[ap.clone()], &a).unwrap();
        io::json::save_alignment_profiles(&[ap.clone(), ap], &b).unwrap();
        let options = AggregateOptions {
            mode: AggregateMode::Combined,
            normalize: false,
        };
        combine_alignment_profiles(&[a, b], &options, Some(&out)).unwrap();
        let combined: Vec<AlignmentProfile<f64>> = io::json::load_alignment_profiles(&out).unwrap();
        assert_eq!(combined.len(), 1);
        assert_abs_diff_eq!(combined[0].position(1).match_emission[0], 3.0);
    }
}
