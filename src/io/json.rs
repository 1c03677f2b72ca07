//!
//! JSON storage of profiles, alignment profiles and plan7 models
//!
use crate::alignment_profile::AlignmentProfile;
use crate::error::Result;
use crate::params::{ProfileParams, ProfileParamsOverride};
use crate::plan7::Plan7Hmm;
use crate::prob::Probability;
use crate::profile::Profile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

pub fn load<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let file = File::open(filename)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

pub fn save<T: Serialize>(value: &T, filename: &str) -> Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn load_profile<P: Probability>(filename: &str) -> Result<Profile<P>> {
    load(filename)
}

pub fn save_profile<P: Probability>(profile: &Profile<P>, filename: &str) -> Result<()> {
    save(profile, filename)
}

pub fn load_alignment_profiles<P: Probability>(filename: &str) -> Result<Vec<AlignmentProfile<P>>> {
    load(filename)
}

pub fn save_alignment_profiles<P: Probability>(
    profiles: &[AlignmentProfile<P>],
    filename: &str,
) -> Result<()> {
    save(&profiles, filename)
}

pub fn save_plan7(hmm: &Plan7Hmm, filename: &str) -> Result<()> {
    save(hmm, filename)
}

///
/// Load a sparse parameter config and overlay it on the defaults
///
pub fn load_params(filename: &str) -> Result<ProfileParams> {
    let o: ProfileParamsOverride = load(filename)?;
    let params = ProfileParams::default().with_override(&o);
    params.validate()?;
    Ok(params)
}
