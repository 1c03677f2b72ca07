use crate::alphabet::Alphabet;
use crate::common::{Record, Sequences};
use crate::error::{ProfuseError, Result};
use bio::io::fasta;
use log::{debug, warn};
use std::io::{Read, Write};

fn to_fasta_error<E: std::fmt::Display>(e: E) -> ProfuseError {
    ProfuseError::Fasta(e.to_string())
}

///
/// Parse FASTA records from a reader, upper-casing residues and
/// warning about symbols outside the alphabet.
///
pub fn parse_sequences<R: Read>(reader: R, alphabet: Alphabet) -> Result<Sequences> {
    let reader = fasta::Reader::new(reader);
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(to_fasta_error)?;
        record.check().map_err(to_fasta_error)?;
        records.push(Record::new(record.id(), alphabet.sanitize(record.seq())));
    }
    debug!("parsed {} fasta records", records.len());
    Ok(Sequences::from(records))
}

///
/// Read the sequences of a FASTA file. Empty files are an error.
///
pub fn read_sequences(filename: &str, alphabet: Alphabet) -> Result<Sequences> {
    let file = std::fs::File::open(filename)?;
    let sequences = parse_sequences(file, alphabet)?;
    if sequences.is_empty() {
        return Err(ProfuseError::EmptyInput(format!(
            "no sequences were found in the fasta file `{}`",
            filename
        )));
    }
    Ok(sequences)
}

///
/// Read an aligned FASTA file; every row must have the width of the first.
///
pub fn read_alignment(filename: &str, alphabet: Alphabet) -> Result<Sequences> {
    let sequences = read_sequences(filename, alphabet)?;
    let width = sequences[0].seq.len();
    if let Some(row) = sequences.iter().find(|r| r.seq.len() != width) {
        return Err(ProfuseError::LengthMismatch {
            what: format!("aligned sequence `{}`", row.id),
            expected: width,
            found: row.seq.len(),
        });
    }
    Ok(sequences)
}

///
/// Read the first record of a FASTA file, used as a gapped consensus mask.
///
pub fn read_first_sequence(filename: &str, alphabet: Alphabet) -> Result<Record> {
    let sequences = read_sequences(filename, alphabet)?;
    if sequences.len() > 1 {
        warn!(
            "using only the first of {} sequences in `{}`",
            sequences.len(),
            filename
        );
    }
    Ok(sequences[0].clone())
}

pub fn write_sequences<W: Write>(writer: W, sequences: &Sequences) -> Result<()> {
    let mut writer = fasta::Writer::new(writer);
    for record in sequences.iter() {
        writer.write(&record.id, None, &record.seq)?;
    }
    writer.flush()?;
    Ok(())
}
