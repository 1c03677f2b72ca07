//!
//! Sampling sequences
//!
//! * `random_sequence`: i.i.d. residues from a residue distribution
//! * `draw_sequences`: sequences emitted by running a profile HMM
//!
use crate::alphabet::Alphabet;
use crate::common::{Record, Sequence, Sequences};
use crate::distribution::{Distribution, Outcome};
use crate::prob::Probability;
use crate::profile::{
    FromBegin, FromDeletion, FromInsertion, FromMatch, FromPostAlign, FromPreAlign, Profile,
};
use itertools::Itertools;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// generate random residues of given length from seed
///
/// The distribution is normalized first, so it may hold unnormalized weights.
///
pub fn random_sequence<P: Probability>(
    distribution: &Distribution<P>,
    alphabet: Alphabet,
    length: usize,
    seed: u64,
) -> Sequence {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut d = distribution.clone();
    d.normalize(0.0);
    (0..length).map(|_| alphabet.symbol(d.draw(&mut rng))).collect()
}

///
/// Hidden state of the linear profile HMM
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    PreAlign,
    Match(usize),
    Insertion(usize),
    Deletion(usize),
    PostAlign,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            State::PreAlign => write!(f, "N"),
            State::Match(i) => write!(f, "M{}", i),
            State::Insertion(i) => write!(f, "I{}", i),
            State::Deletion(i) => write!(f, "D{}", i),
            State::PostAlign => write!(f, "C"),
        }
    }
}

///
/// Struct for storing sampling results from the profile HMM
///
/// Each element is a visited state and its emitted residue (if any).
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History(pub Vec<(State, Option<u8>)>);

impl History {
    pub fn new() -> Self {
        History(Vec::new())
    }
    ///
    /// Total history length
    /// This can be different from the length of emitted residues
    ///
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn push(&mut self, state: State, emission: Option<u8>) {
        self.0.push((state, emission));
    }
    ///
    /// Create residue sequence from sampling history
    ///
    pub fn to_sequence(&self) -> Sequence {
        self.0.iter().filter_map(|(_, emission)| *emission).collect()
    }
    /// space separated state path
    pub fn to_path_string(&self) -> String {
        self.0
            .iter()
            .map(|(state, _)| state.to_string())
            .join(" ")
    }
}

impl std::fmt::Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (state, emission) in self.0.iter() {
            match emission {
                Some(c) => writeln!(f, "{} -> {}", state, *c as char)?,
                None => writeln!(f, "{} -> -", state)?,
            }
        }
        Ok(())
    }
}

///
/// Walk the profile once, from pre-align to termination.
///
pub fn sample_rng<P: Probability, R: Rng>(profile: &Profile<P>, rng: &mut R) -> History {
    let alphabet = profile.alphabet();
    let t = profile.transitions();
    let insertion = profile.insertion_emission();
    let last = profile.len().saturating_sub(1);
    let mut history = History::new();
    if profile.is_empty() {
        return history;
    }

    // (1) pre-align insertions
    while t.from_pre_align.draw(rng) == FromPreAlign::ToPreAlign.index() {
        history.push(State::PreAlign, Some(alphabet.symbol(insertion.draw(rng))));
    }

    // (2) the match chain
    let mut state = if t.from_begin.draw(rng) == FromBegin::ToDeletion.index() {
        State::Deletion(0)
    } else {
        State::Match(0)
    };
    loop {
        match state {
            State::Match(i) => {
                let residue = alphabet.symbol(profile.position(i).draw(rng));
                history.push(state, Some(residue));
                if i == last {
                    break;
                }
                let next = t.from_match.draw(rng);
                state = if next == FromMatch::ToInsertion.index() {
                    State::Insertion(i)
                } else if next == FromMatch::ToDeletion.index() {
                    State::Deletion(i + 1)
                } else {
                    State::Match(i + 1)
                };
            }
            State::Insertion(i) => {
                history.push(state, Some(alphabet.symbol(insertion.draw(rng))));
                if t.from_insertion.draw(rng) == FromInsertion::ToMatch.index() {
                    state = State::Match(i + 1);
                }
            }
            State::Deletion(i) => {
                history.push(state, None);
                if i == last {
                    break;
                }
                state = if t.from_deletion.draw(rng) == FromDeletion::ToDeletion.index() {
                    State::Deletion(i + 1)
                } else {
                    State::Match(i + 1)
                };
            }
            State::PreAlign | State::PostAlign => break,
        }
    }

    // (3) post-align insertions
    while t.from_post_align.draw(rng) == FromPostAlign::ToPostAlign.index() {
        history.push(State::PostAlign, Some(alphabet.symbol(insertion.draw(rng))));
    }
    history
}

///
/// Draw `count` sequences from the profile with a seeded rng.
/// Sequences are named `{prefix}{i}`.
///
pub fn draw_sequences<P: Probability>(
    profile: &Profile<P>,
    count: usize,
    seed: u64,
    prefix: &str,
) -> (Sequences, Vec<History>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let histories: Vec<History> = (0..count).map(|_| sample_rng(profile, &mut rng)).collect();
    let records = histories
        .iter()
        .enumerate()
        .map(|(i, h)| Record::new(format!("{}{}", prefix, i), h.to_sequence()))
        .collect();
    (Sequences::from(records), histories)
}
