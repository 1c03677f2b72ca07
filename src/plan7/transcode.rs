//!
//! Transcoding a linear profile into a Plan7 model
//!
//! 1. fixed overrides and indel harmonization (in place on the profile)
//! 2. emissions and per-position transitions
//! 3. `tbd1`, special states, local entry/exit
//! 4. null model
//! 5. renormalization and metadata
//!
use super::harmonize::{harmonize_indels, override_indel_length, override_indel_open, IndelPolicy};
use super::model::{Plan7Hmm, SpecialTransitions, TDD, TDM, TII, TIM, TMD, TMI, TMM};
use super::null::{loop_probability_from_length, NullModel};
use crate::distribution::Distribution;
use crate::error::{ProfuseError, Result};
use crate::prob::Probability;
use crate::profile::{FromDeletion, FromInsertion, FromMatch, Profile};
use log::{log, Level};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_NAME: &str = "profuse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryExitPolicy {
    /// entry and exit runs are geometric with expected length `M/4`
    Geometric,
    /// entry and exit mass spread evenly over the inner positions
    Uniform,
}

impl Default for EntryExitPolicy {
    fn default() -> Self {
        EntryExitPolicy::Geometric
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeOptions {
    /// aggregate local entry probability
    pub entry: f64,
    /// aggregate local exit probability
    pub exit: f64,
    /// expected distance between hits; `None` derives it from `I->I`
    pub expected_distance_between_hits: Option<f64>,
    /// expected null model length; `None` derives it from `I->I`
    pub null_model_expected_length: Option<f64>,
    pub indel_policy: IndelPolicy,
    /// force `M->I = M->D` to this value
    pub indel_open_override: Option<f64>,
    /// force the expected insertion and deletion length to this value
    pub indel_length_override: Option<f64>,
    /// uniform insert emissions and null residues
    pub even_insertion: bool,
    pub entry_exit: EntryExitPolicy,
    pub name: String,
    /// report the parameters at info level
    pub verbose: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        TranscodeOptions {
            entry: 0.5,
            exit: 0.5,
            expected_distance_between_hits: None,
            null_model_expected_length: None,
            indel_policy: IndelPolicy::Keep,
            indel_open_override: None,
            indel_length_override: None,
            even_insertion: false,
            entry_exit: EntryExitPolicy::Geometric,
            name: DEFAULT_MODEL_NAME.to_string(),
            verbose: false,
        }
    }
}

impl TranscodeOptions {
    /// log level of the parameter report; `info` only if verbose
    pub fn report_level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }
    pub fn validate(&self) -> Result<()> {
        let probs = [("entry", self.entry), ("exit", self.exit)];
        for &(name, x) in probs.iter() {
            if !(x > 0.0 && x <= 1.0) {
                return Err(ProfuseError::invalid_parameter(name, x, "must be in (0, 1]"));
            }
        }
        let lengths = [
            (
                "expected_distance_between_hits",
                self.expected_distance_between_hits,
            ),
            ("null_model_expected_length", self.null_model_expected_length),
            ("indel_length_override", self.indel_length_override),
        ];
        for &(name, x) in lengths.iter() {
            if let Some(x) = x {
                if !(x >= 1.0 && x.is_finite()) {
                    return Err(ProfuseError::invalid_parameter(name, x, "must be >= 1"));
                }
            }
        }
        if let Some(x) = self.indel_open_override {
            if !(x > 0.0 && x <= 0.5) {
                return Err(ProfuseError::invalid_parameter(
                    "indel_open_override",
                    x,
                    "must be in (0, 0.5]",
                ));
            }
        }
        Ok(())
    }
}

fn fnorm(v: &mut [f64]) {
    let sum: f64 = v.iter().sum();
    if sum > 0.0 {
        for x in v.iter_mut() {
            *x /= sum;
        }
    } else {
        let n = v.len() as f64;
        for x in v.iter_mut() {
            *x = 1.0 / n;
        }
    }
}

fn fscale(v: &mut [f64], factor: f64) {
    for x in v.iter_mut() {
        *x *= factor;
    }
}

///
/// Scale the match-out transitions of every non-final position by
/// `1 / (d + d * end[k])` where `d` is their sum.
///
pub fn renormalize_exits(hmm: &mut Plan7Hmm) {
    for (t, &end) in hmm.transitions.iter_mut().zip(hmm.end.iter()) {
        let d: f64 = t[..3].iter().sum();
        if d > 0.0 {
            fscale(&mut t[..3], 1.0 / (d + d * end));
        }
    }
}

///
/// Normalize every distribution of the model.
///
/// * emission rows
/// * transition groups `M->*`, `I->*` and `D->*`
/// * `begin` together with `tbd1`
/// * `M->*` together with `end[k]`
/// * null residues and each special pair
///
/// All-zero vectors become uniform.
///
pub fn renormalize(hmm: &mut Plan7Hmm) {
    for row in hmm.match_emissions.iter_mut() {
        fnorm(row);
    }
    for row in hmm.insert_emissions.iter_mut() {
        fnorm(row);
    }
    for t in hmm.transitions.iter_mut() {
        fnorm(&mut t[..3]);
        fnorm(&mut t[3..5]);
        fnorm(&mut t[5..7]);
    }
    let d: f64 = hmm.begin.iter().sum::<f64>() + hmm.tbd1;
    if d > 0.0 {
        fscale(&mut hmm.begin, 1.0 / d);
        hmm.tbd1 /= d;
    }
    for (t, end) in hmm.transitions.iter_mut().zip(hmm.end.iter_mut()) {
        let d: f64 = t[..3].iter().sum::<f64>() + *end;
        fscale(&mut t[..3], 1.0 / d);
        *end /= d;
    }
    if let Some(last) = hmm.end.last_mut() {
        *last = 1.0;
    }
    fnorm(&mut hmm.null.residues);
    for row in hmm.special.rows_mut().iter_mut() {
        fnorm(&mut row[..]);
    }
}

///
/// Flat local configuration; entry mass `entry` spread over positions
/// `1..M`, exit mass `exit` spread over positions `0..M-1`.
///
fn configure_uniform(hmm: &mut Plan7Hmm, entry: f64, exit: f64) {
    let m = hmm.len();
    let inner = (m - 1) as f64;
    hmm.begin[0] = (1.0 - entry) * (1.0 - hmm.tbd1);
    for k in 1..m {
        hmm.begin[k] = (1.0 - hmm.tbd1) * entry / inner;
    }
    hmm.end[m - 1] = 1.0;
    for k in 0..(m - 1) {
        hmm.end[k] = exit / inner;
    }
    renormalize_exits(hmm);
}

///
/// Geometric entry and exit runs with expected length `M/4`.
/// The entry run always stops at or before the last position.
///
fn configure_geometric(hmm: &mut Plan7Hmm, entry: f64, exit: f64) {
    let m = hmm.len();
    let mf = m as f64;
    let extend = (1.0 - 1.0 / (mf / 4.0)).max(0.0);

    hmm.begin[0] = (1.0 - entry) * (1.0 - hmm.tbd1);
    let mut cum = (1.0 - hmm.tbd1) * (entry / mf);
    for k in 1..(m - 1) {
        hmm.begin[k] = cum * (1.0 - extend);
        cum *= extend;
    }
    hmm.begin[m - 1] = cum;

    hmm.end[m - 1] = 1.0;
    let mut cum = exit / mf;
    for k in (0..(m - 1)).rev() {
        hmm.end[k] = cum;
        cum *= extend;
    }
    renormalize_exits(hmm);
}

///
/// Transcode `profile` into a Plan7 model.
///
/// The overrides and the indel policy of `options` are applied to the
/// profile's transitions in place; use `profile_to_plan7` to keep the
/// profile unchanged.
///
pub fn transcode<P: Probability>(
    profile: &mut Profile<P>,
    options: &TranscodeOptions,
) -> Result<Plan7Hmm> {
    let m = profile.len();
    if m <= 1 {
        return Err(ProfuseError::ProfileTooShort(m));
    }
    options.validate()?;
    let level = options.report_level();

    // (1) overrides and harmonization
    {
        let t = profile.transitions_mut();
        if let Some(open) = options.indel_open_override {
            override_indel_open(t, open, level);
        }
        if let Some(length) = options.indel_length_override {
            override_indel_length(t, length, level);
        }
        harmonize_indels(t, options.indel_policy, level);
    }

    let alphabet = profile.alphabet();
    let t = profile.transitions();
    let mm = t.from_match.get(FromMatch::ToMatch).to_value();
    let mi = t.from_match.get(FromMatch::ToInsertion).to_value();
    let md = t.from_match.get(FromMatch::ToDeletion).to_value();
    let im = t.from_insertion.get(FromInsertion::ToMatch).to_value();
    let ii = t.from_insertion.get(FromInsertion::ToInsertion).to_value();
    let dm = t.from_deletion.get(FromDeletion::ToMatch).to_value();
    let dd = t.from_deletion.get(FromDeletion::ToDeletion).to_value();

    // expected lengths implied by I->I
    let p1_hits = match options.expected_distance_between_hits {
        Some(d) => loop_probability_from_length(d),
        None => ii,
    };
    let p1_null = match options.null_model_expected_length {
        Some(l) => loop_probability_from_length(l),
        None => ii,
    };
    log!(level, "local entry probability: {}", options.entry);
    log!(level, "local exit probability: {}", options.exit);
    log!(level, "expected distance between hits: {}", 1.0 / (1.0 - p1_hits));
    log!(level, "null model expected length: {}", 1.0 / (1.0 - p1_null));

    // (2) emissions and transitions
    let mut hmm = Plan7Hmm::alloc(alphabet, m);
    let null = if options.even_insertion {
        let even: Distribution<f64> = Distribution::new(alphabet.size());
        NullModel::from_emission(&even, p1_null)
    } else {
        NullModel::from_emission(profile.insertion_emission(), p1_null)
    };
    for k in 0..m {
        hmm.match_emissions[k] = profile.position(k).values();
        hmm.insert_emissions[k] = null.residues.clone();
    }
    for row in hmm.transitions.iter_mut() {
        row[TMM] = mm;
        row[TMI] = mi;
        row[TMD] = md;
        row[TIM] = im;
        row[TII] = ii;
        row[TDM] = dm;
        row[TDD] = dd;
    }

    // (3) begin -> delete, special states, entry and exit
    hmm.tbd1 = md / (1.0 - mi);
    hmm.special = SpecialTransitions::multihit(p1_hits);
    configure_uniform(&mut hmm, options.entry, options.exit);
    if options.entry_exit == EntryExitPolicy::Geometric {
        configure_geometric(&mut hmm, options.entry, options.exit);
    }

    // (4) null model
    hmm.set_null_model(null);

    // (5) finalize
    renormalize(&mut hmm);
    hmm.set_name(options.name.clone());
    hmm.set_ctime();
    log!(level, "transcoded profile of length {} into plan7", m);
    Ok(hmm)
}

///
/// Transcode a copy of `profile`, leaving it untouched.
///
pub fn profile_to_plan7<P: Probability>(
    profile: &Profile<P>,
    options: &TranscodeOptions,
) -> Result<Plan7Hmm> {
    let mut copy = profile.clone();
    transcode(&mut copy, options)
}
