//!
//! Reading and writing of sequences, profiles and models
//!
//! * `fasta`: (aligned) sequences via `bio::io::fasta`
//! * `json`: profiles, alignment profiles, plan7 models and configs
//!
pub mod fasta;
pub mod json;

use std::fs::File;
use std::io::prelude::*;

///
/// write string into a file, or into stdout if `filename` is `None`
///
pub fn write_string(filename: Option<&str>, string: &str) -> std::io::Result<()> {
    match filename {
        Some(filename) => {
            let mut file = File::create(filename)?;
            file.write_all(string.as_bytes())?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(string.as_bytes())?;
            if !string.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
