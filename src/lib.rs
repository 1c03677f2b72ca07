pub mod aggregate;
pub mod alignment_profile;
pub mod alphabet;
pub mod builder;
pub mod cli;
pub mod common;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod io;
pub mod params;
pub mod plan7;
pub mod prob;
pub mod profile;
pub mod sample;

#[macro_use]
extern crate approx;
