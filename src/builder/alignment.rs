//!
//! Profile from a gapped multiple alignment
//!
//! Columns where the gapped consensus mask has a gap are insertion columns
//! and are dropped. Each retained column becomes one profile position whose
//! match emission is the residue frequency over the non-gap rows.
//!
use super::transitions::set_transitions_from_params;
use crate::alphabet::Alphabet;
use crate::common::Sequence;
use crate::error::{ProfuseError, Result};
use crate::params::ProfileParams;
use crate::prob::Probability;
use crate::profile::Profile;
use log::{debug, warn};

///
/// Build a profile from `alignment` rows and a gapped `consensus` mask of the
/// same width. The insertion emission stays even.
///
pub fn gapped_alignment_to_profile<P: Probability>(
    alignment: &[Sequence],
    consensus: &[u8],
    alphabet: Alphabet,
    params: &ProfileParams,
) -> Result<Profile<P>> {
    if alignment.is_empty() {
        return Err(ProfuseError::EmptyInput("alignment".to_string()));
    }
    if consensus.is_empty() {
        return Err(ProfuseError::EmptyInput("consensus mask".to_string()));
    }
    for row in alignment.iter() {
        if row.len() != consensus.len() {
            return Err(ProfuseError::LengthMismatch {
                what: "aligned sequence".to_string(),
                expected: consensus.len(),
                found: row.len(),
            });
        }
    }
    let columns: Vec<usize> = consensus
        .iter()
        .enumerate()
        .filter(|&(_, &c)| !Alphabet::is_gap(c))
        .map(|(i, _)| i)
        .collect();
    if columns.is_empty() {
        return Err(ProfuseError::EmptyInput(
            "consensus mask has no residue columns".to_string(),
        ));
    }

    let mut profile = Profile::new(alphabet, columns.len());
    set_transitions_from_params(params, &mut profile)?;

    let n = alignment.len();
    for (i, &column) in columns.iter().enumerate() {
        let position = profile.position_mut(i);
        position.zero();
        let mut gaps = 0;
        for row in alignment.iter() {
            let c = row[column];
            match alphabet.index_of(c) {
                Some(k) => position[k] += P::one(),
                None => {
                    if !Alphabet::is_gap(c) {
                        warn!(
                            "residue `{}` in column {} is not in the {} alphabet, counted as a gap",
                            c as char, column, alphabet
                        );
                    }
                    gaps += 1;
                }
            }
        }
        if gaps == n {
            debug!("column {} is all gaps, position {} set to even", column, i);
            position.even();
        } else {
            *position /= P::from_value((n - gaps) as f64);
        }
    }
    Ok(profile)
}
