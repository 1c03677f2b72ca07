//!
//! Harmonizing insertion and deletion rates before transcoding
//!
//! These functions rewrite the global transitions of the source profile in
//! place. Copy the profile beforehand to keep the original values.
//!
use crate::prob::Probability;
use crate::profile::{FromDeletion, FromInsertion, FromMatch, Transitions};
use log::{log, Level};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndelPolicy {
    /// keep the profile values
    Keep,
    /// average the open rates and the extension rates
    Balanced,
    /// both pathways take the smaller open rate (and its extension)
    Minimum,
    /// both pathways take the larger open rate (and its extension)
    Maximum,
}

impl Default for IndelPolicy {
    fn default() -> Self {
        IndelPolicy::Keep
    }
}

impl std::str::FromStr for IndelPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" | "none" => Ok(IndelPolicy::Keep),
            "balanced" | "avg" => Ok(IndelPolicy::Balanced),
            "min" | "minimum" => Ok(IndelPolicy::Minimum),
            "max" | "maximum" => Ok(IndelPolicy::Maximum),
            _ => Err(format!("unknown indel policy `{}`", s)),
        }
    }
}

struct Rates {
    mm: f64,
    mi: f64,
    md: f64,
    im: f64,
    ii: f64,
    dm: f64,
    dd: f64,
}

fn read<P: Probability>(t: &Transitions<P>) -> Rates {
    Rates {
        mm: t.from_match.get(FromMatch::ToMatch).to_value(),
        mi: t.from_match.get(FromMatch::ToInsertion).to_value(),
        md: t.from_match.get(FromMatch::ToDeletion).to_value(),
        im: t.from_insertion.get(FromInsertion::ToMatch).to_value(),
        ii: t.from_insertion.get(FromInsertion::ToInsertion).to_value(),
        dm: t.from_deletion.get(FromDeletion::ToMatch).to_value(),
        dd: t.from_deletion.get(FromDeletion::ToDeletion).to_value(),
    }
}

fn write<P: Probability>(t: &mut Transitions<P>, r: &Rates) {
    let v = P::from_value;
    t.from_match.set(FromMatch::ToMatch, v(r.mm));
    t.from_match.set(FromMatch::ToInsertion, v(r.mi));
    t.from_match.set(FromMatch::ToDeletion, v(r.md));
    t.from_insertion.set(FromInsertion::ToMatch, v(r.im));
    t.from_insertion.set(FromInsertion::ToInsertion, v(r.ii));
    t.from_deletion.set(FromDeletion::ToMatch, v(r.dm));
    t.from_deletion.set(FromDeletion::ToDeletion, v(r.dd));
}

///
/// `M->I = M->D = open`, `M->M = 1 - 2 open`
///
pub fn override_indel_open<P: Probability>(t: &mut Transitions<P>, open: f64, level: Level) {
    let mut r = read(t);
    r.mi = open;
    r.md = open;
    r.mm = 1.0 - 2.0 * open;
    write(t, &r);
    log!(level, "overriding indel open: M->I and M->D are {}", open);
}

///
/// `I->I = D->D = 1 - 1/length`, `I->M = D->M = 1/length`
///
pub fn override_indel_length<P: Probability>(t: &mut Transitions<P>, length: f64, level: Level) {
    let mut r = read(t);
    r.ii = 1.0 - 1.0 / length;
    r.dd = r.ii;
    r.im = 1.0 - r.ii;
    r.dm = r.im;
    write(t, &r);
    log!(level, "overriding indel extension: I->I and D->D are {}", r.ii);
}

///
/// Apply the policy to the match, insertion and deletion transitions.
///
///
/// The applied rates are reported at `level`.
///
pub fn harmonize_indels<P: Probability>(t: &mut Transitions<P>, policy: IndelPolicy, level: Level) {
    let mut r = read(t);
    match policy {
        IndelPolicy::Keep => return,
        IndelPolicy::Balanced => {
            let open = (r.mi + r.md) / 2.0;
            r.mi = open;
            r.md = open;
            let ext = (r.ii + r.dd) / 2.0;
            r.ii = ext;
            r.im = 1.0 - ext;
            r.dd = r.ii;
            r.dm = r.im;
        }
        IndelPolicy::Minimum | IndelPolicy::Maximum => {
            let use_insertion = if policy == IndelPolicy::Minimum {
                r.mi < r.md
            } else {
                r.mi > r.md
            };
            if use_insertion {
                r.md = r.mi;
                r.mm = 1.0 - 2.0 * r.mi;
                r.dm = r.im;
                r.dd = r.ii;
            } else {
                r.mi = r.md;
                r.mm = 1.0 - 2.0 * r.md;
                r.im = r.dm;
                r.ii = r.dd;
            }
        }
    }
    write(t, &r);
    log!(
        level,
        "{:?} indel probabilities: M->I and M->D are {}; I->I and D->D are {}",
        policy, r.mi, r.ii
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transitions(mi: f64, md: f64, ii: f64, dd: f64) -> Transitions<f64> {
        let mut t = Transitions::even();
        t.from_match.set(FromMatch::ToInsertion, mi);
        t.from_match.set(FromMatch::ToDeletion, md);
        t.from_match.set(FromMatch::ToMatch, 1.0 - mi - md);
        t.from_insertion.set(FromInsertion::ToInsertion, ii);
        t.from_insertion.set(FromInsertion::ToMatch, 1.0 - ii);
        t.from_deletion.set(FromDeletion::ToDeletion, dd);
        t.from_deletion.set(FromDeletion::ToMatch, 1.0 - dd);
        t
    }

    fn assert_simplices(t: &Transitions<f64>) {
        for (_, d) in t.distributions().iter() {
            assert!(d.is_simplex(1e-12));
        }
    }

    #[test]
    fn keep_is_noop() {
        let mut t = transitions(0.02, 0.04, 0.5, 0.7);
        let before = t.clone();
        harmonize_indels(&mut t, IndelPolicy::Keep, Level::Debug);
        assert_eq!(t, before);
    }
    #[test]
    fn balanced_averages() {
        let mut t = transitions(0.02, 0.04, 0.5, 0.7);
        harmonize_indels(&mut t, IndelPolicy::Balanced, Level::Debug);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToInsertion), 0.03, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToDeletion), 0.03, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToMatch), 0.94, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_insertion.get(FromInsertion::ToInsertion), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_deletion.get(FromDeletion::ToMatch), 0.4, epsilon = 1e-12);
        assert_simplices(&t);
    }
    #[test]
    fn minimum_takes_smaller_pathway() {
        let mut t = transitions(0.02, 0.04, 0.5, 0.7);
        harmonize_indels(&mut t, IndelPolicy::Minimum, Level::Debug);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToDeletion), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToMatch), 0.96, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_deletion.get(FromDeletion::ToDeletion), 0.5, epsilon = 1e-12);
        assert_simplices(&t);

        let mut t = transitions(0.05, 0.01, 0.5, 0.7);
        harmonize_indels(&mut t, IndelPolicy::Minimum, Level::Debug);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToInsertion), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_insertion.get(FromInsertion::ToInsertion), 0.7, epsilon = 1e-12);
        assert_simplices(&t);
    }
    #[test]
    fn maximum_takes_larger_pathway() {
        let mut t = transitions(0.02, 0.04, 0.5, 0.7);
        harmonize_indels(&mut t, IndelPolicy::Maximum, Level::Debug);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToInsertion), 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToMatch), 0.92, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_insertion.get(FromInsertion::ToMatch), 0.3, epsilon = 1e-12);
        assert_simplices(&t);
    }
    #[test]
    fn overrides() {
        let mut t = transitions(0.02, 0.04, 0.5, 0.7);
        override_indel_open(&mut t, 0.1, Level::Debug);
        override_indel_length(&mut t, 4.0, Level::Debug);
        assert_abs_diff_eq!(t.from_match.get(FromMatch::ToMatch), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_deletion.get(FromDeletion::ToDeletion), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(t.from_insertion.get(FromInsertion::ToMatch), 0.25, epsilon = 1e-12);
        assert_simplices(&t);
    }
    #[test]
    fn policy_from_str() {
        assert_eq!("balanced".parse::<IndelPolicy>().unwrap(), IndelPolicy::Balanced);
        assert_eq!("max".parse::<IndelPolicy>().unwrap(), IndelPolicy::Maximum);
        assert!("median".parse::<IndelPolicy>().is_err());
    }
}
