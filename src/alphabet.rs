//!
//! Residue alphabets
//!
//! * `Dna`: `ACGT`
//! * `AminoAcid`: the 20 standard amino acids
//!
use crate::common::Sequence;
use log::warn;
use serde::{Deserialize, Serialize};

const DNA_SYMBOLS: &[u8] = b"ACGT";
const AMINO_ACID_SYMBOLS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

///
/// Gap symbol used in aligned FASTA
///
pub const GAP: u8 = b'-';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    Dna,
    AminoAcid,
}

impl Alphabet {
    /// number of residues
    pub fn size(&self) -> usize {
        self.symbols().len()
    }
    /// residue symbols in index order
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Alphabet::Dna => DNA_SYMBOLS,
            Alphabet::AminoAcid => AMINO_ACID_SYMBOLS,
        }
    }
    ///
    /// index of a residue symbol (case-insensitive),
    /// or `None` if it is not in this alphabet.
    ///
    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        let upper = symbol.to_ascii_uppercase();
        self.symbols().iter().position(|&s| s == upper)
    }
    /// residue symbol of the index
    pub fn symbol(&self, index: usize) -> u8 {
        self.symbols()[index]
    }
    ///
    /// `-` and `.` are gaps in aligned sequences
    ///
    pub fn is_gap(symbol: u8) -> bool {
        symbol == GAP || symbol == b'.'
    }
    ///
    /// Upper-case the residues, warning about symbols outside the alphabet.
    /// Gaps are kept as is.
    ///
    pub fn sanitize(&self, seq: &[u8]) -> Sequence {
        seq.iter()
            .enumerate()
            .map(|(i, &c)| {
                if !Alphabet::is_gap(c) && self.index_of(c).is_none() {
                    warn!("informal residue `{}` detected in residues[{}]", c as char, i);
                }
                c.to_ascii_uppercase()
            })
            .collect()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Alphabet::Dna => write!(f, "dna"),
            Alphabet::AminoAcid => write!(f, "amino"),
        }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" | "nucleotide" => Ok(Alphabet::Dna),
            "amino" | "aa" | "protein" => Ok(Alphabet::AminoAcid),
            _ => Err(format!("unknown alphabet `{}`", s)),
        }
    }
}
