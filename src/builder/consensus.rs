//!
//! Profile from a single consensus sequence
//!
//! Every position starts even (`1/N` per residue). The consensus residue is
//! then set to
//!
//! ```text
//! x = (1 - 1/N) * r / (1 - r)
//! ```
//!
//! so that it gets exactly the conservation rate `r` after normalization.
//! When `r = 1` the position is the indicator of the consensus residue.
//!
use super::transitions::set_transitions_from_params;
use crate::alphabet::Alphabet;
use crate::error::{ProfuseError, Result};
use crate::params::ProfileParams;
use crate::prob::Probability;
use crate::profile::Profile;

pub fn consensus_to_profile<P: Probability>(
    sequence: &[u8],
    alphabet: Alphabet,
    conservation_rate: f64,
    params: &ProfileParams,
) -> Result<Profile<P>> {
    if sequence.is_empty() {
        return Err(ProfuseError::EmptyInput("consensus sequence".to_string()));
    }
    if !(conservation_rate > 0.0 && conservation_rate <= 1.0) {
        return Err(ProfuseError::invalid_parameter(
            "conservation_rate",
            conservation_rate,
            "must be in (0, 1]",
        ));
    }
    let indices = sequence
        .iter()
        .enumerate()
        .map(|(position, &c)| {
            alphabet.index_of(c).ok_or(ProfuseError::InvalidResidue {
                symbol: c as char,
                position,
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut profile = Profile::new(alphabet, sequence.len());
    set_transitions_from_params(params, &mut profile)?;

    let n = alphabet.size() as f64;
    let trick = (1.0 - 1.0 / n) * conservation_rate / (1.0 - conservation_rate);
    for (i, &k) in indices.iter().enumerate() {
        let position = profile.position_mut(i);
        if conservation_rate >= 1.0 {
            position.zero();
            position[k] = P::one();
        } else {
            position[k] = P::from_value(trick);
            position.normalize(0.0);
        }
    }
    Ok(profile)
}
