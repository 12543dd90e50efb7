use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    fuzzy::best_score_from_needle,
};

/// Results shown by `search` unless `-n` says otherwise.
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Results returned by the HTTP endpoint per query.
pub const DEFAULT_HTTP_RESULT_LIMIT: usize = 100;

/// Default port of the HTTP front end.
pub const DEFAULT_PORT: u16 = 8080;

/// Minimum fuzzy score a vocabulary term needs before it joins the query
/// vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuzzyThreshold {
    /// Accept `score >= floor(ratio * best possible score)`.
    ///
    /// The bound is truncated to an integer before comparing, so a score
    /// just below the real-valued `ratio * best` still passes: with the
    /// default 0.8, `"abcd"` (best 16) accepts 12 although 0.8 * 16 is
    /// 12.8.
    Ratio(f64),
    /// Accept `score >= best possible score - penalty * needle length`.
    LengthPenalty(f64),
}

impl Default for FuzzyThreshold {
    fn default() -> Self {
        Self::Ratio(0.8)
    }
}

impl FuzzyThreshold {
    /// Whether `score` is good enough for `needle`.
    pub fn accepts(&self, score: u64, needle: &str) -> bool {
        let best = best_score_from_needle(needle);
        match *self {
            Self::Ratio(ratio) => score >= (best as f64 * ratio) as u64,
            Self::LengthPenalty(penalty) => {
                let len = needle.chars().count() as f64;
                score as f64 >= best as f64 - penalty * len
            }
        }
    }
}

impl fmt::Display for FuzzyThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(ratio) => write!(f, "ratio:{ratio}"),
            Self::LengthPenalty(penalty) => write!(f, "length:{penalty}"),
        }
    }
}

impl FromStr for FuzzyThreshold {
    type Err = Error;

    /// Parse `ratio:<f64>` or `length:<f64>`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::Config(format!(
                "invalid fuzzy threshold '{s}' (expected ratio:<n> or length:<n>)"
            ))
        };

        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        let value: f64 = value.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }

        match kind.trim() {
            "ratio" => Ok(Self::Ratio(value)),
            "length" => Ok(Self::LengthPenalty(value)),
            _ => Err(invalid()),
        }
    }
}
