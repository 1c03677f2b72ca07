//!
//! Construction of profiles
//!
//! * `transitions`: global transitions from `ProfileParams`
//! * `consensus`: profile from a single sequence and a conservation rate
//! * `alignment`: profile from a gapped alignment and a gapped consensus mask
//!
pub mod alignment;
pub mod consensus;
pub mod transitions;

pub use alignment::gapped_alignment_to_profile;
pub use consensus::consensus_to_profile;
pub use transitions::{set_transitions_from_params, IndelRates};
