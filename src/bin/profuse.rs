use clap::{ErrorKind, Parser, Subcommand};
use profuse::{
    aggregate::{AggregateMode, AggregateOptions},
    alphabet::Alphabet,
    cli::{self, Plan7Format},
    plan7::{EntryExitPolicy, IndelPolicy, TranscodeOptions},
};

#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Opts {
    /// Show debug messages
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a profile around the first sequence of a FASTA file
    SequenceToProfile {
        /// Input FASTA filename
        input: String,
        /// Probability of the consensus residue at each position
        #[clap(short = 'r', default_value_t = 0.75, parse(try_from_str = parse_probability))]
        conservation_rate: f64,
        #[clap(short, long, default_value = "dna")]
        alphabet: Alphabet,
        /// JSON config of profile parameters
        #[clap(short, long)]
        params: Option<String>,
        /// Output profile (JSON) filename
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Build a profile from a multiple alignment
    AlignedFastaToProfile {
        /// Aligned FASTA filename
        alignment: String,
        /// Aligned FASTA whose first sequence gaps select the columns
        consensus: String,
        #[clap(short, long, default_value = "dna")]
        alphabet: Alphabet,
        /// JSON config of profile parameters
        #[clap(short, long)]
        params: Option<String>,
        /// Output profile (JSON) filename
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Transcode a profile into a Plan7 model
    ProfileToPlan7 {
        /// Input profile (JSON) filename
        input: String,
        /// Aggregate local entry probability
        #[clap(long, default_value_t = 0.5, parse(try_from_str = parse_probability))]
        entry: f64,
        /// Aggregate local exit probability
        #[clap(long, default_value_t = 0.5, parse(try_from_str = parse_probability))]
        exit: f64,
        /// Expected distance between hits. Derived from I->I if not specified.
        #[clap(long, parse(try_from_str = parse_length))]
        hit_distance: Option<f64>,
        /// Expected null model length. Derived from I->I if not specified.
        #[clap(long, parse(try_from_str = parse_length))]
        null_length: Option<f64>,
        /// Indel harmonization: keep, balanced, min or max
        #[clap(long, default_value = "keep")]
        indel_policy: IndelPolicy,
        /// Force M->I and M->D to this value
        #[clap(long, parse(try_from_str = parse_open))]
        indel_open: Option<f64>,
        /// Force the expected insertion and deletion length
        #[clap(long, parse(try_from_str = parse_length))]
        indel_length: Option<f64>,
        /// Use even insertion emissions and null model residues
        #[clap(long)]
        even_insertion: bool,
        /// Spread entry and exit mass evenly instead of geometrically
        #[clap(long)]
        uniform_entry_exit: bool,
        /// Model name
        #[clap(long, default_value = profuse::plan7::transcode::DEFAULT_MODEL_NAME)]
        name: String,
        /// Write the model as JSON instead of text
        #[clap(long)]
        json: bool,
        /// Output model filename
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Write the consensus sequence of a profile as FASTA
    ProfileToConsensus {
        /// Input profile (JSON) filename
        input: String,
        /// Output FASTA filename
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Cross entropy of two profiles, or self entropy of one
    CrossEntropy {
        /// Input profile (JSON) filename
        input: String,
        /// Second profile (JSON) filename
        other: Option<String>,
    },
    /// Generate a random sequence from residue weights
    RandomSequence {
        /// Sequence length
        #[clap(short = 'L')]
        length: usize,
        /// Weight of each residue in alphabet order
        #[clap(required = true)]
        weights: Vec<f64>,
        #[clap(short, long, default_value = "dna")]
        alphabet: Alphabet,
        /// FASTA id of the sequence
        #[clap(long, default_value = "random")]
        name: String,
        #[clap(short, long, default_value_t = 0)]
        seed: u64,
        /// Output FASTA filename
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Draw sequences from a profile
    DrawSequences {
        /// Input profile (JSON) filename
        input: String,
        /// Number of sequences
        #[clap(short = 'n')]
        count: usize,
        #[clap(short, long, default_value_t = 0)]
        seed: u64,
        /// Prefix of FASTA ids
        #[clap(long, default_value = "draw")]
        prefix: String,
        /// Output FASTA filename
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Aggregate per-sequence alignment profiles
    CombineAlignmentProfiles {
        /// Alignment profile (JSON) filenames
        #[clap(required = true)]
        inputs: Vec<String>,
        /// Keep one profile per sequence instead of summing them
        #[clap(long)]
        individual: bool,
        /// Normalize the resulting profiles
        #[clap(long)]
        normalize: bool,
        /// Output filename
        #[clap(short, long)]
        output: Option<String>,
    },
}

fn parse_f64(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("`{}` is not a number", s))
}

/// value in (0, 1]
fn parse_probability(s: &str) -> Result<f64, String> {
    let v = parse_f64(s)?;
    if v > 0.0 && v <= 1.0 {
        Ok(v)
    } else {
        Err(format!("{} is not in (0, 1]", v))
    }
}

/// expected length, at least 1
fn parse_length(s: &str) -> Result<f64, String> {
    let v = parse_f64(s)?;
    if v >= 1.0 {
        Ok(v)
    } else {
        Err(format!("{} is shorter than 1", v))
    }
}

/// gap open probability in (0, 0.5]
fn parse_open(s: &str) -> Result<f64, String> {
    let v = parse_f64(s)?;
    if v > 0.0 && v <= 0.5 {
        Ok(v)
    } else {
        Err(format!("{} is not in (0, 0.5]", v))
    }
}

fn run(opts: Opts) -> anyhow::Result<()> {
    match opts.command {
        Commands::SequenceToProfile {
            input,
            conservation_rate,
            alphabet,
            params,
            output,
        } => {
            let params = cli::load_params(params.as_deref())?;
            cli::sequence_to_profile(
                &input,
                alphabet,
                conservation_rate,
                &params,
                output.as_deref(),
            )
        }
        Commands::AlignedFastaToProfile {
            alignment,
            consensus,
            alphabet,
            params,
            output,
        } => {
            let params = cli::load_params(params.as_deref())?;
            cli::aligned_fasta_to_profile(
                &alignment,
                &consensus,
                alphabet,
                &params,
                output.as_deref(),
            )
        }
        Commands::ProfileToPlan7 {
            input,
            entry,
            exit,
            hit_distance,
            null_length,
            indel_policy,
            indel_open,
            indel_length,
            even_insertion,
            uniform_entry_exit,
            name,
            json,
            output,
        } => {
            let options = TranscodeOptions {
                entry,
                exit,
                expected_distance_between_hits: hit_distance,
                null_model_expected_length: null_length,
                indel_policy,
                indel_open_override: indel_open,
                indel_length_override: indel_length,
                even_insertion,
                entry_exit: if uniform_entry_exit {
                    EntryExitPolicy::Uniform
                } else {
                    EntryExitPolicy::Geometric
                },
                name,
                verbose: opts.verbose,
            };
            let format = if json {
                Plan7Format::Json
            } else {
                Plan7Format::Text
            };
            cli::profile_to_plan7(&input, &options, format, output.as_deref())
        }
        Commands::ProfileToConsensus { input, output } => {
            cli::profile_to_consensus(&input, output.as_deref())
        }
        Commands::CrossEntropy { input, other } => {
            cli::cross_entropy(&input, other.as_deref()).map(|_| ())
        }
        Commands::RandomSequence {
            length,
            weights,
            alphabet,
            name,
            seed,
            output,
        } => cli::random_sequence_fasta(length, alphabet, &weights, &name, seed, output.as_deref()),
        Commands::DrawSequences {
            input,
            count,
            seed,
            prefix,
            output,
        } => cli::draw_sequences_fasta(&input, count, seed, &prefix, output.as_deref()),
        Commands::CombineAlignmentProfiles {
            inputs,
            individual,
            normalize,
            output,
        } => {
            let options = AggregateOptions {
                mode: if individual {
                    AggregateMode::Individual
                } else {
                    AggregateMode::Combined
                },
                normalize,
            };
            cli::combine_alignment_profiles(&inputs, &options, output.as_deref())
        }
    }
}

fn main() {
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };
    let level = if opts.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    eprintln!("# started_at={}", chrono::Local::now());
    eprintln!("# opts={:?}", opts);
    let result = run(opts);
    eprintln!("# finished_at={}", chrono::Local::now());
    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
