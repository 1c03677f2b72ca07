//!
//! Plan7 local-alignment HMM
//!
//! Positions are 0-based here: `begin[k]` is the probability of entering at
//! match `k`, `end[k]` of leaving from match `k`, and `transitions[k]` holds
//! the seven transitions from position `k` to `k+1` (`k < M-1`).
//!
use super::null::NullModel;
use crate::alphabet::Alphabet;
use serde::{Deserialize, Serialize};

// slots of a per-position transition row
pub const TMM: usize = 0;
pub const TMI: usize = 1;
pub const TMD: usize = 2;
pub const TIM: usize = 3;
pub const TII: usize = 4;
pub const TDM: usize = 5;
pub const TDD: usize = 6;

/// loop and move slots of a special state
pub const LOOP: usize = 0;
pub const MOVE: usize = 1;

///
/// Transitions of the special states flanking the model
///
/// * `n`: N-terminal unaligned residues
/// * `e`: end state, to C (`MOVE`) or to J (`LOOP`)
/// * `c`: C-terminal unaligned residues
/// * `j`: residues between hits
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialTransitions {
    pub n: [f64; 2],
    pub e: [f64; 2],
    pub c: [f64; 2],
    pub j: [f64; 2],
}

impl SpecialTransitions {
    ///
    /// Multi-hit local configuration: N, C and J loop with `p1`, E picks
    /// C or J evenly.
    ///
    pub fn multihit(p1: f64) -> Self {
        let flank = [p1, 1.0 - p1];
        SpecialTransitions {
            n: flank,
            e: [0.5, 0.5],
            c: flank,
            j: flank,
        }
    }
    pub fn rows_mut(&mut self) -> [&mut [f64; 2]; 4] {
        [&mut self.n, &mut self.e, &mut self.c, &mut self.j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan7Hmm {
    pub name: String,
    /// creation time
    pub ctime: String,
    pub alphabet: Alphabet,
    pub match_emissions: Vec<Vec<f64>>,
    pub insert_emissions: Vec<Vec<f64>>,
    pub transitions: Vec<[f64; 7]>,
    /// begin -> delete at the first position
    pub tbd1: f64,
    pub begin: Vec<f64>,
    pub end: Vec<f64>,
    pub special: SpecialTransitions,
    pub null: NullModel,
}

impl Plan7Hmm {
    ///
    /// Empty body of `length` positions, with the default null model
    ///
    pub fn alloc(alphabet: Alphabet, length: usize) -> Self {
        let n = alphabet.size();
        Plan7Hmm {
            name: String::new(),
            ctime: String::new(),
            alphabet,
            match_emissions: vec![vec![0.0; n]; length],
            insert_emissions: vec![vec![0.0; n]; length],
            transitions: vec![[0.0; 7]; length.saturating_sub(1)],
            tbd1: 0.0,
            begin: vec![0.0; length],
            end: vec![0.0; length],
            special: SpecialTransitions::multihit(0.0),
            null: NullModel::default_for(alphabet),
        }
    }
    /// number of match positions `M`
    pub fn len(&self) -> usize {
        self.match_emissions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.match_emissions.is_empty()
    }
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }
    pub fn set_ctime(&mut self) {
        self.ctime = chrono::Local::now().to_rfc2822();
    }
    pub fn set_null_model(&mut self, null: NullModel) {
        self.null = null;
    }
}

impl std::fmt::Display for Plan7Hmm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "NAME  {}", self.name)?;
        writeln!(f, "LENG  {}", self.len())?;
        writeln!(f, "ALPH  {}", self.alphabet)?;
        writeln!(f, "DATE  {}", self.ctime)?;
        writeln!(f, "NULE  {:?} p1={:.6}", self.null.residues, self.null.p1)?;
        writeln!(f, "XT    {:?}", self.special)?;
        writeln!(f, "TBD1  {:.6}", self.tbd1)?;
        for k in 0..self.len() {
            write!(f, "{:>5}", k + 1)?;
            for v in self.match_emissions[k].iter() {
                write!(f, " {:.4}", v)?;
            }
            writeln!(f)?;
            write!(f, "     ")?;
            for v in self.insert_emissions[k].iter() {
                write!(f, " {:.4}", v)?;
            }
            writeln!(f)?;
            write!(f, "     ")?;
            if let Some(t) = self.transitions.get(k) {
                for v in t.iter() {
                    write!(f, " {:.4}", v)?;
                }
            }
            writeln!(f, " begin={:.6} end={:.6}", self.begin[k], self.end[k])?;
        }
        write!(f, "//")
    }
}
