//! Error type shared by the library.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfuseError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a stored profile, alignment profile or config
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed FASTA record
    #[error("FASTA error: {0}")]
    Fasta(String),

    /// A sequence, alignment or profile set that must be non-empty was empty
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Sequences or profiles that must agree in length do not
    #[error("length mismatch: {what} has length {found}, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A residue symbol outside the alphabet
    #[error("invalid residue '{symbol}' at position {position}")]
    InvalidResidue { symbol: char, position: usize },

    /// A parameter outside its valid range
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Derived transition probabilities do not form a distribution
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// An emission of a profile is not a distribution
    #[error("invalid emission: {0}")]
    InvalidEmission(String),

    /// Profile too short to define transitions
    #[error("profile of length {0} is too short (need at least 2 positions)")]
    ProfileTooShort(usize),

    /// Two models that must share an alphabet do not
    #[error("alphabet mismatch: {0} vs {1}")]
    AlphabetMismatch(String, String),
}

pub type Result<T> = std::result::Result<T, ProfuseError>;

impl ProfuseError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: f64,
        reason: &'static str,
    ) -> ProfuseError {
        ProfuseError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
