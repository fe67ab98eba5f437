//! Ordered threshold tables mapping a continuous measurement to a rubric score.
//!
//! Every tiered scorer (speech rate, vocabulary, filler rate, grammar index,
//! positivity) is described by a [`TierTable`]: an ascending list of
//! half-open or closed intervals, each carrying a score.  A single lookup
//! helper, [`TierTable::score`], resolves a value for all of them, and
//! [`TierTable::validate`] checks at startup that the intervals partition the
//! whole real line with no gaps or overlaps.

use std::fmt;
use std::ops::{Bound, RangeBounds};

use thiserror::Error;

/// One interval of a [`TierTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
    pub score: u32,
}

impl Tier {
    pub const fn new(lower: Bound<f64>, upper: Bound<f64>, score: u32) -> Self {
        Self { lower, upper, score }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower, self.upper).contains(&value)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Bound::Included(v) => write!(f, "[{v}")?,
            Bound::Excluded(v) => write!(f, "({v}")?,
            Bound::Unbounded => f.write_str("(-∞")?,
        }
        f.write_str(", ")?;
        match self.upper {
            Bound::Included(v) => write!(f, "{v}]"),
            Bound::Excluded(v) => write!(f, "{v})"),
            Bound::Unbounded => f.write_str("∞)"),
        }
    }
}

/// Named, ascending list of tiers plus the category maximum.
#[derive(Debug, Clone, Copy)]
pub struct TierTable {
    pub name: &'static str,
    pub max: u32,
    pub tiers: &'static [Tier],
}

impl TierTable {
    /// Score for `value`.  Values no tier contains (only NaN, once the table
    /// validates) get the lowest score in the table.
    pub fn score(&self, value: f64) -> u32 {
        self.tiers
            .iter()
            .find(|t| t.contains(value))
            .map(|t| t.score)
            .unwrap_or_else(|| self.floor())
    }

    /// Lowest score any tier awards.
    pub fn floor(&self) -> u32 {
        self.tiers.iter().map(|t| t.score).min().unwrap_or(0)
    }

    /// Check that the tiers cover the real line exactly once, in ascending
    /// order, and that no score exceeds `max`.
    pub fn validate(&self) -> Result<(), TierError> {
        let name = self.name;
        let (first, last) = match (self.tiers.first(), self.tiers.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(TierError::Empty { table: name }),
        };
        if first.lower != Bound::Unbounded {
            return Err(TierError::OpenBelow { table: name });
        }
        if last.upper != Bound::Unbounded {
            return Err(TierError::OpenAbove { table: name });
        }

        for tier in self.tiers {
            if tier.score > self.max {
                return Err(TierError::ScoreAboveMax {
                    table: name,
                    score: tier.score,
                    max: self.max,
                });
            }
        }

        for pair in self.tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let joined = match (prev.upper, next.lower) {
                (Bound::Included(a), Bound::Excluded(b)) => a == b,
                (Bound::Excluded(a), Bound::Included(b)) => a == b,
                _ => false,
            };
            if !joined {
                return Err(TierError::Seam {
                    table: name,
                    left: prev.to_string(),
                    right: next.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    #[error("tier table `{table}` has no tiers")]
    Empty { table: &'static str },
    #[error("tier table `{table}` does not extend to -∞")]
    OpenBelow { table: &'static str },
    #[error("tier table `{table}` does not extend to +∞")]
    OpenAbove { table: &'static str },
    #[error("tier table `{table}` awards {score}, above its maximum of {max}")]
    ScoreAboveMax { table: &'static str, score: u32, max: u32 },
    #[error("tier table `{table}` has a gap or overlap between {left} and {right}")]
    Seam {
        table: &'static str,
        left: String,
        right: String,
    },
}

use std::ops::Bound::{Excluded as Ex, Included as In, Unbounded as Inf};

/// Words per minute → score (max 10).  Penalizes both slow and fast pacing.
pub static SPEECH_RATE: TierTable = TierTable {
    name: "speech_rate",
    max: 10,
    tiers: &[
        Tier::new(Inf, In(80.0), 2),
        Tier::new(Ex(80.0), Ex(111.0), 6),
        Tier::new(In(111.0), In(140.0), 10),
        Tier::new(Ex(140.0), In(160.0), 6),
        Tier::new(Ex(160.0), Inf, 2),
    ],
};

/// Type-token ratio → score (max 10).
pub static VOCABULARY: TierTable = TierTable {
    name: "vocabulary",
    max: 10,
    tiers: &[
        Tier::new(Inf, Ex(0.3), 2),
        Tier::new(In(0.3), Ex(0.5), 4),
        Tier::new(In(0.5), Ex(0.7), 6),
        Tier::new(In(0.7), Ex(0.9), 8),
        Tier::new(In(0.9), Inf, 10),
    ],
};

/// Fillers per hundred words → score (max 15).
pub static FILLER_RATE: TierTable = TierTable {
    name: "clarity",
    max: 15,
    tiers: &[
        Tier::new(Inf, In(3.0), 15),
        Tier::new(Ex(3.0), In(6.0), 12),
        Tier::new(Ex(6.0), In(9.0), 9),
        Tier::new(Ex(9.0), In(12.0), 6),
        Tier::new(Ex(12.0), Inf, 3),
    ],
};

/// Grammar index in `[0, 1]` → score (max 10).
pub static GRAMMAR_INDEX: TierTable = TierTable {
    name: "grammar",
    max: 10,
    tiers: &[
        Tier::new(Inf, Ex(0.3), 2),
        Tier::new(In(0.3), Ex(0.5), 4),
        Tier::new(In(0.5), Ex(0.7), 6),
        Tier::new(In(0.7), In(0.9), 8),
        Tier::new(Ex(0.9), Inf, 10),
    ],
};

/// Positivity in `[0, 1]` → score (max 15).
pub static POSITIVITY: TierTable = TierTable {
    name: "sentiment",
    max: 15,
    tiers: &[
        Tier::new(Inf, Ex(0.3), 3),
        Tier::new(In(0.3), Ex(0.5), 6),
        Tier::new(In(0.5), Ex(0.7), 9),
        Tier::new(In(0.7), Ex(0.9), 12),
        Tier::new(In(0.9), Inf, 15),
    ],
};

/// Every built-in table, in rubric order.
pub fn all_tables() -> [&'static TierTable; 5] {
    [&SPEECH_RATE, &GRAMMAR_INDEX, &VOCABULARY, &FILLER_RATE, &POSITIVITY]
}
