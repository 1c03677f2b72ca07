//!
//! ProfileParams: summary statistics controlling transition derivation
//!
//! * `ProfileParams`: the complete parameter bundle with defaults
//! * `ProfileParamsOverride`: sparse overlay (every field optional), read
//!   from a JSON config file and applied with `ProfileParams::with_override`
//!
use crate::error::{ProfuseError, Result};
use serde::{Deserialize, Serialize};

///
/// Parameters for deriving the global transitions of a profile.
///
/// Counts and fractions are vectors, as a config may list several values
/// (one per generated profile); derivation uses the first element.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileParams {
    ///
    /// Use the deletion parameters for insertions too.
    /// `expected_insertions_counts`,
    /// `expected_insertion_length_as_profile_length_fractions` and
    /// `min_expected_insertion_length` are unused when this is set.
    pub use_deletions_for_insertions: bool,
    /// expected number of deletions per sequence (default `[1.0]`)
    pub expected_deletions_counts: Option<Vec<f64>>,
    /// expected number of insertions per sequence (default `[1.0]`)
    pub expected_insertions_counts: Option<Vec<f64>>,
    /// expected deletion length relative to the profile length (default `[0.1]`)
    pub expected_deletion_length_as_profile_length_fractions: Option<Vec<f64>>,
    /// expected insertion length relative to the profile length (default `[0.1]`)
    pub expected_insertion_length_as_profile_length_fractions: Option<Vec<f64>>,
    /// floor of the expected deletion length
    pub min_expected_deletion_length: f64,
    /// floor of the expected insertion length
    pub min_expected_insertion_length: f64,
    /// self-loop probability of the pre-align insertion state
    pub pre_align_insertion: f64,
    /// self-loop probability of the post-align insertion state
    pub post_align_insertion: f64,
}

pub const DEFAULT_EXPECTED_COUNT: f64 = 1.0;
pub const DEFAULT_LENGTH_FRACTION: f64 = 0.1;

impl Default for ProfileParams {
    fn default() -> Self {
        ProfileParams {
            use_deletions_for_insertions: true,
            expected_deletions_counts: None,
            expected_insertions_counts: None,
            expected_deletion_length_as_profile_length_fractions: None,
            expected_insertion_length_as_profile_length_fractions: None,
            min_expected_deletion_length: 1.25,
            min_expected_insertion_length: 1.25,
            pre_align_insertion: 0.01,
            post_align_insertion: 0.01,
        }
    }
}

fn first_or(values: &Option<Vec<f64>>, default: f64) -> f64 {
    values
        .as_ref()
        .and_then(|v| v.first().copied())
        .unwrap_or(default)
}

impl ProfileParams {
    ///
    /// Default parameters with `count` expected indels and expected indel
    /// length `fraction * L`
    ///
    pub fn uniform(count: f64, fraction: f64) -> ProfileParams {
        ProfileParams {
            expected_deletions_counts: Some(vec![count]),
            expected_deletion_length_as_profile_length_fractions: Some(vec![fraction]),
            ..ProfileParams::default()
        }
    }
    /// Profile expecting no more than a single short indel per sequence
    pub fn low_indel() -> ProfileParams {
        ProfileParams::uniform(0.1, 0.01)
    }
    /// Profile expecting several indels per sequence
    pub fn high_indel() -> ProfileParams {
        ProfileParams::uniform(5.0, 0.1)
    }
    pub fn expected_deletions_count(&self) -> f64 {
        first_or(&self.expected_deletions_counts, DEFAULT_EXPECTED_COUNT)
    }
    pub fn expected_insertions_count(&self) -> f64 {
        if self.use_deletions_for_insertions {
            self.expected_deletions_count()
        } else {
            first_or(&self.expected_insertions_counts, DEFAULT_EXPECTED_COUNT)
        }
    }
    pub fn deletion_length_fraction(&self) -> f64 {
        first_or(
            &self.expected_deletion_length_as_profile_length_fractions,
            DEFAULT_LENGTH_FRACTION,
        )
    }
    pub fn insertion_length_fraction(&self) -> f64 {
        if self.use_deletions_for_insertions {
            self.deletion_length_fraction()
        } else {
            first_or(
                &self.expected_insertion_length_as_profile_length_fractions,
                DEFAULT_LENGTH_FRACTION,
            )
        }
    }
    pub fn min_insertion_length(&self) -> f64 {
        if self.use_deletions_for_insertions {
            self.min_expected_deletion_length
        } else {
            self.min_expected_insertion_length
        }
    }
    ///
    /// Overlay the fields set in `o` onto a copy of `self`.
    ///
    pub fn with_override(&self, o: &ProfileParamsOverride) -> ProfileParams {
        let mut p = self.clone();
        if let Some(v) = o.use_deletions_for_insertions {
            p.use_deletions_for_insertions = v;
        }
        if let Some(v) = &o.expected_deletions_counts {
            p.expected_deletions_counts = Some(v.clone());
        }
        if let Some(v) = &o.expected_insertions_counts {
            p.expected_insertions_counts = Some(v.clone());
        }
        if let Some(v) = &o.expected_deletion_length_as_profile_length_fractions {
            p.expected_deletion_length_as_profile_length_fractions = Some(v.clone());
        }
        if let Some(v) = &o.expected_insertion_length_as_profile_length_fractions {
            p.expected_insertion_length_as_profile_length_fractions = Some(v.clone());
        }
        if let Some(v) = o.min_expected_deletion_length {
            p.min_expected_deletion_length = v;
        }
        if let Some(v) = o.min_expected_insertion_length {
            p.min_expected_insertion_length = v;
        }
        if let Some(v) = o.pre_align_insertion {
            p.pre_align_insertion = v;
        }
        if let Some(v) = o.post_align_insertion {
            p.post_align_insertion = v;
        }
        p
    }
    ///
    /// Range check of every field.
    ///
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("expected_deletions_counts", &self.expected_deletions_counts),
            ("expected_insertions_counts", &self.expected_insertions_counts),
        ];
        for (name, values) in counts.iter() {
            if let Some(v) = values {
                if let Some(&x) = v.iter().find(|&&x| !(x >= 0.0 && x.is_finite())) {
                    return Err(ProfuseError::invalid_parameter(
                        name,
                        x,
                        "must be a non-negative number",
                    ));
                }
            }
        }
        let fractions = [
            (
                "expected_deletion_length_as_profile_length_fractions",
                &self.expected_deletion_length_as_profile_length_fractions,
            ),
            (
                "expected_insertion_length_as_profile_length_fractions",
                &self.expected_insertion_length_as_profile_length_fractions,
            ),
        ];
        for (name, values) in fractions.iter() {
            if let Some(v) = values {
                if let Some(&x) = v.iter().find(|&&x| !(x > 0.0 && x.is_finite())) {
                    return Err(ProfuseError::invalid_parameter(
                        name,
                        x,
                        "must be a positive number",
                    ));
                }
            }
        }
        let lengths = [
            ("min_expected_deletion_length", self.min_expected_deletion_length),
            ("min_expected_insertion_length", self.min_expected_insertion_length),
        ];
        for &(name, x) in lengths.iter() {
            if !(x >= 1.0 && x.is_finite()) {
                return Err(ProfuseError::invalid_parameter(name, x, "must be >= 1"));
            }
        }
        let probs = [
            ("pre_align_insertion", self.pre_align_insertion),
            ("post_align_insertion", self.post_align_insertion),
        ];
        for &(name, x) in probs.iter() {
            if !(0.0..=1.0).contains(&x) {
                return Err(ProfuseError::invalid_parameter(
                    name,
                    x,
                    "must be a probability in [0, 1]",
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ProfileParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "use_deletions_for_insertions: {}",
            self.use_deletions_for_insertions
        )?;
        writeln!(f, "expected_deletions_count: {}", self.expected_deletions_count())?;
        writeln!(f, "expected_insertions_count: {}", self.expected_insertions_count())?;
        writeln!(f, "deletion_length_fraction: {}", self.deletion_length_fraction())?;
        writeln!(f, "insertion_length_fraction: {}", self.insertion_length_fraction())?;
        writeln!(f, "min_expected_deletion_length: {}", self.min_expected_deletion_length)?;
        writeln!(f, "min_expected_insertion_length: {}", self.min_insertion_length())?;
        writeln!(f, "pre_align_insertion: {}", self.pre_align_insertion)?;
        writeln!(f, "post_align_insertion: {}", self.post_align_insertion)
    }
}

///
/// Sparse overlay of `ProfileParams`. Unset fields keep the base value.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileParamsOverride {
    pub use_deletions_for_insertions: Option<bool>,
    pub expected_deletions_counts: Option<Vec<f64>>,
    pub expected_insertions_counts: Option<Vec<f64>>,
    pub expected_deletion_length_as_profile_length_fractions: Option<Vec<f64>>,
    pub expected_insertion_length_as_profile_length_fractions: Option<Vec<f64>>,
    pub min_expected_deletion_length: Option<f64>,
    pub min_expected_insertion_length: Option<f64>,
    pub pre_align_insertion: Option<f64>,
    pub post_align_insertion: Option<f64>,
}

impl ProfileParamsOverride {
    pub fn is_empty(&self) -> bool {
        *self == ProfileParamsOverride::default()
    }
}
