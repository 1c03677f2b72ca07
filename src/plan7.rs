//!
//! Plan7 local-alignment topology
//!
//! * `model`: the transcoded model (`Plan7Hmm`) and its special states
//! * `null`: background model
//! * `harmonize`: indel policies rewriting the source profile in place
//! * `transcode`: linear profile -> Plan7 mapping
//!
pub mod harmonize;
pub mod model;
pub mod null;
pub mod transcode;

pub use harmonize::{harmonize_indels, IndelPolicy};
pub use model::{Plan7Hmm, SpecialTransitions};
pub use null::NullModel;
pub use transcode::{
    profile_to_plan7, renormalize, transcode, EntryExitPolicy, TranscodeOptions,
};
