//!
//! Global transition distributions of the linear profile HMM
//!
//! ```text
//! PreAlign -> {PreAlign, Begin}
//! Begin    -> {Deletion, Match}
//! Match    -> {Match, Insertion, Deletion}
//! Insertion-> {Insertion, Match}
//! Deletion -> {Deletion, Match}
//! PostAlign-> {PostAlign, Terminal}
//! ```
//!
use crate::distribution::{Distribution, Outcome};
use crate::prob::Probability;
use serde::{Deserialize, Serialize};

macro_rules! outcome_enum {
    ($name:ident { $($variant:ident = $index:expr),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }
        impl $name {
            /// number of successor states
            pub const COUNT: usize = [$($index),+].len();
        }
        impl Outcome for $name {
            fn index(self) -> usize {
                match self {
                    $($name::$variant => $index),+
                }
            }
        }
    };
}

outcome_enum!(FromPreAlign { ToPreAlign = 0, ToBegin = 1 });
outcome_enum!(FromBegin { ToDeletion = 0, ToMatch = 1 });
outcome_enum!(FromMatch { ToMatch = 0, ToInsertion = 1, ToDeletion = 2 });
outcome_enum!(FromInsertion { ToInsertion = 0, ToMatch = 1 });
outcome_enum!(FromDeletion { ToDeletion = 0, ToMatch = 1 });
outcome_enum!(FromPostAlign { ToPostAlign = 0, ToTerminal = 1 });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Probability")]
pub struct Transitions<P> {
    pub from_pre_align: Distribution<P>,
    pub from_begin: Distribution<P>,
    pub from_match: Distribution<P>,
    pub from_insertion: Distribution<P>,
    pub from_deletion: Distribution<P>,
    pub from_post_align: Distribution<P>,
}

impl<P: Probability> Transitions<P> {
    /// every distribution is even
    pub fn even() -> Self {
        Transitions {
            from_pre_align: Distribution::new(FromPreAlign::COUNT),
            from_begin: Distribution::new(FromBegin::COUNT),
            from_match: Distribution::new(FromMatch::COUNT),
            from_insertion: Distribution::new(FromInsertion::COUNT),
            from_deletion: Distribution::new(FromDeletion::COUNT),
            from_post_align: Distribution::new(FromPostAlign::COUNT),
        }
    }
    /// every distribution is zero (accumulator of expected counts)
    pub fn zeros() -> Self {
        Transitions {
            from_pre_align: Distribution::zeros(FromPreAlign::COUNT),
            from_begin: Distribution::zeros(FromBegin::COUNT),
            from_match: Distribution::zeros(FromMatch::COUNT),
            from_insertion: Distribution::zeros(FromInsertion::COUNT),
            from_deletion: Distribution::zeros(FromDeletion::COUNT),
            from_post_align: Distribution::zeros(FromPostAlign::COUNT),
        }
    }
    ///
    /// (name, distribution) pairs in a fixed order
    ///
    pub fn distributions(&self) -> [(&'static str, &Distribution<P>); 6] {
        [
            ("pre_align", &self.from_pre_align),
            ("begin", &self.from_begin),
            ("match", &self.from_match),
            ("insertion", &self.from_insertion),
            ("deletion", &self.from_deletion),
            ("post_align", &self.from_post_align),
        ]
    }
    pub fn distributions_mut(&mut self) -> [&mut Distribution<P>; 6] {
        [
            &mut self.from_pre_align,
            &mut self.from_begin,
            &mut self.from_match,
            &mut self.from_insertion,
            &mut self.from_deletion,
            &mut self.from_post_align,
        ]
    }
    pub fn to_policy<Q: Probability>(&self) -> Transitions<Q> {
        Transitions {
            from_pre_align: self.from_pre_align.to_policy(),
            from_begin: self.from_begin.to_policy(),
            from_match: self.from_match.to_policy(),
            from_insertion: self.from_insertion.to_policy(),
            from_deletion: self.from_deletion.to_policy(),
            from_post_align: self.from_post_align.to_policy(),
        }
    }
}

impl<'a, P: Probability> std::ops::AddAssign<&'a Transitions<P>> for Transitions<P> {
    fn add_assign(&mut self, other: &'a Transitions<P>) {
        self.from_pre_align += &other.from_pre_align;
        self.from_begin += &other.from_begin;
        self.from_match += &other.from_match;
        self.from_insertion += &other.from_insertion;
        self.from_deletion += &other.from_deletion;
        self.from_post_align += &other.from_post_align;
    }
}

impl<P: Probability> std::fmt::Display for Transitions<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (name, d) in self.distributions().iter() {
            writeln!(f, "{}: {}", name, d)?;
        }
        Ok(())
    }
}
