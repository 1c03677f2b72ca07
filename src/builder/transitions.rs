//!
//! Deriving global transitions from expected indel counts and lengths
//!
//! An indel run of geometric length has stop probability `1/E[len]`, so
//!
//! ```text
//! open      = count / L
//! extension = 1 - min(1 / (fraction * L), 1 / min_length)
//! ```
//!
use crate::error::{ProfuseError, Result};
use crate::params::ProfileParams;
use crate::prob::Probability;
use crate::profile::{
    FromBegin, FromDeletion, FromInsertion, FromMatch, FromPostAlign, FromPreAlign, Profile,
};
use log::debug;

///
/// Open and extension probabilities of insertions and deletions
/// for a profile of a given length.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndelRates {
    pub deletion_open: f64,
    pub insertion_open: f64,
    pub deletion_extension: f64,
    pub insertion_extension: f64,
}

fn extension(fraction: f64, length: usize, min_length: f64) -> f64 {
    let stop = (1.0 / (fraction * length as f64)).min(1.0 / min_length);
    1.0 - stop
}

impl IndelRates {
    pub fn from_params(params: &ProfileParams, length: usize) -> Result<IndelRates> {
        if length == 0 {
            return Err(ProfuseError::EmptyInput("profile of length 0".to_string()));
        }
        params.validate()?;
        let l = length as f64;
        let deletion_open = params.expected_deletions_count() / l;
        let insertion_open = if params.use_deletions_for_insertions {
            deletion_open
        } else {
            params.expected_insertions_count() / l
        };
        let deletion_extension = extension(
            params.deletion_length_fraction(),
            length,
            params.min_expected_deletion_length,
        );
        let insertion_extension = if params.use_deletions_for_insertions {
            deletion_extension
        } else {
            extension(
                params.insertion_length_fraction(),
                length,
                params.min_insertion_length(),
            )
        };
        if insertion_open + deletion_open > 1.0 {
            return Err(ProfuseError::InvalidTransition(format!(
                "insertion open ({}) + deletion open ({}) exceeds 1 for profile length {}",
                insertion_open, deletion_open, length
            )));
        }
        Ok(IndelRates {
            deletion_open,
            insertion_open,
            deletion_extension,
            insertion_extension,
        })
    }
}

///
/// Overwrite the global transitions of `profile` with values derived from
/// `params` and the profile length. The derived rates are returned.
///
pub fn set_transitions_from_params<P: Probability>(
    params: &ProfileParams,
    profile: &mut Profile<P>,
) -> Result<IndelRates> {
    let rates = IndelRates::from_params(params, profile.len())?;
    debug!("indel rates for L={}: {:?}", profile.len(), rates);
    let v = P::from_value;
    let t = profile.transitions_mut();

    let pre = v(params.pre_align_insertion);
    t.from_pre_align.set(FromPreAlign::ToPreAlign, pre);
    t.from_pre_align.set(FromPreAlign::ToBegin, pre.complement());

    let deletion_open = v(rates.deletion_open);
    t.from_begin.set(FromBegin::ToDeletion, deletion_open);
    t.from_begin.set(FromBegin::ToMatch, deletion_open.complement());

    t.from_match
        .set(FromMatch::ToInsertion, v(rates.insertion_open));
    t.from_match.set(FromMatch::ToDeletion, deletion_open);
    t.from_match.set(
        FromMatch::ToMatch,
        v(rates.insertion_open + rates.deletion_open).complement(),
    );

    let insertion_extension = v(rates.insertion_extension);
    t.from_insertion
        .set(FromInsertion::ToInsertion, insertion_extension);
    t.from_insertion
        .set(FromInsertion::ToMatch, insertion_extension.complement());

    let deletion_extension = v(rates.deletion_extension);
    t.from_deletion
        .set(FromDeletion::ToDeletion, deletion_extension);
    t.from_deletion
        .set(FromDeletion::ToMatch, deletion_extension.complement());

    let post = v(params.post_align_insertion);
    t.from_post_align.set(FromPostAlign::ToPostAlign, post);
    t.from_post_align
        .set(FromPostAlign::ToTerminal, post.complement());

    Ok(rates)
}
