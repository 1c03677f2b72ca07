//!
//! Sequence and its collections
//!
//! * `Sequence`: residues of a single (possibly gapped) sequence
//! * `Sequences`: named sequence collections read from FASTA
//!
use rayon::prelude::*;

/// Type of residue sequence
pub type Sequence = Vec<u8>;

/// Type of residues as array
///
/// It is used in `AsRef<Bases>` or `&Bases`
pub type Bases = [u8];

/// Seq trait
/// It can be converted into &Bases with `as_ref()`.
///
pub trait Seq: AsRef<Bases> {
    fn to_str(&self) -> String {
        sequence_to_string(self.as_ref())
    }
}
impl<T: AsRef<Bases>> Seq for T {}

/// Convert residues into String
/// useful in displaying
pub fn sequence_to_string(seq: &Bases) -> String {
    String::from_utf8_lossy(seq).into_owned()
}

///
/// Sequence with its FASTA id
///
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub seq: Sequence,
}

impl Record {
    pub fn new<S: Into<String>>(id: S, seq: Sequence) -> Self {
        Record { id: id.into(), seq }
    }
}

impl AsRef<Bases> for Record {
    fn as_ref(&self) -> &Bases {
        &self.seq
    }
}

/// Struct for storing multiple sequences.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequences {
    pub records: Vec<Record>,
}

impl Sequences {
    /// Constructor of sequences
    pub fn from(records: Vec<Record>) -> Self {
        Sequences { records }
    }
    /// Constructor from bare sequences, named by their index
    pub fn from_seqs(seqs: Vec<Sequence>) -> Self {
        Sequences {
            records: seqs
                .into_iter()
                .enumerate()
                .map(|(i, seq)| Record::new(format!("seq{}", i), seq))
                .collect(),
        }
    }
    /// get an iterator over the records
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter()
    }
    /// the number of sequences.
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// first `n` sequences (all of them if `n` exceeds the count)
    pub fn truncated(&self, n: usize) -> Sequences {
        Sequences::from(self.records.iter().take(n).cloned().collect())
    }
}

impl std::ops::Index<usize> for Sequences {
    type Output = Record;
    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Sequences {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;
    fn into_iter(self) -> std::slice::Iter<'a, Record> {
        self.records.iter()
    }
}

impl<'a> IntoParallelIterator for &'a Sequences {
    type Item = &'a Record;
    type Iter = rayon::slice::Iter<'a, Record>;
    fn into_par_iter(self) -> rayon::slice::Iter<'a, Record> {
        self.records.par_iter()
    }
}
