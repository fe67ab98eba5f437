//! Seams for the external services the scoring engine consumes.
//!
//! The engine never performs grammar checking, sentiment detection or
//! embedding itself; it only consumes their output shape.  Each service is a
//! trait the [`Pipeline`](crate::pipeline::Pipeline) holds by `Box<dyn _>` (or
//! by `&'static dyn _` for the shared similarity model), so callers can plug in
//! a real checker or model without touching the scorers.
//!
//! Built-in implementations:
//! - [`NoGrammarChecker`] reports zero issues.
//! - [`LexiconPolarity`] is a small valence lexicon with negation handling.
//! - [`FixedPolarity`] returns a caller-measured value.
//! - [`LexicalSimilarity`] is a stemmed bag-of-words cosine, reached through
//!   the process-wide [`shared_similarity_model`] handle.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::tokenize;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{service} is unavailable: {reason}")]
    Unavailable { service: String, reason: String },
    #[error("{service} returned an invalid result: {reason}")]
    InvalidOutput { service: String, reason: String },
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

/// One issue reported by a grammar checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarIssue {
    /// Checker rule identifier, e.g. `"MORFOLOGIK_RULE_EN_US"`.
    pub rule_id: String,
    pub message: String,
    /// Byte offset into the cleaned text.
    pub offset: usize,
    pub length: usize,
}

pub trait GrammarChecker: Send + Sync {
    fn name(&self) -> &str;

    /// Check the whitespace-cleaned text and return every issue found.
    fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, CollaboratorError>;
}

/// Stand-in checker that never reports an issue.
pub struct NoGrammarChecker;

impl GrammarChecker for NoGrammarChecker {
    fn name(&self) -> &str {
        "none"
    }

    fn check(&self, _text: &str) -> Result<Vec<GrammarIssue>, CollaboratorError> {
        Ok(vec![])
    }
}

/// Grammar errors for one submission: the count that is scored, and the
/// checker's issues behind it when a checker produced them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GrammarFindings {
    pub count: usize,
    pub issues: Vec<GrammarIssue>,
}

impl GrammarFindings {
    /// A count measured elsewhere, with no issue detail.
    pub fn counted(count: usize) -> Self {
        Self {
            count,
            issues: Vec::new(),
        }
    }

    /// Keep the issues whose rule the rubric does not ignore.
    pub fn from_issues(issues: Vec<GrammarIssue>, ignored_rules: &[String]) -> Self {
        let issues: Vec<GrammarIssue> = issues
            .into_iter()
            .filter(|i| !ignored_rules.iter().any(|r| *r == i.rule_id))
            .collect();
        Self {
            count: issues.len(),
            issues,
        }
    }
}

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

pub trait PolarityProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Overall polarity of `text` in `[-1, 1]`.
    fn polarity(&self, text: &str) -> Result<f64, CollaboratorError>;
}

/// Returns a polarity measured elsewhere.
pub struct FixedPolarity(pub f64);

impl PolarityProvider for FixedPolarity {
    fn name(&self) -> &str {
        "fixed"
    }

    fn polarity(&self, _text: &str) -> Result<f64, CollaboratorError> {
        Ok(self.0)
    }
}

/// Reject a polarity no provider should return.
pub fn ensure_finite_polarity(service: &str, polarity: f64) -> Result<f64, CollaboratorError> {
    if polarity.is_finite() {
        Ok(polarity)
    } else {
        Err(CollaboratorError::InvalidOutput {
            service: service.to_string(),
            reason: format!("polarity {polarity} is not finite"),
        })
    }
}

/// Normalization constant for the compound score; approaches ±1 as the raw
/// valence sum grows.
const COMPOUND_ALPHA: f64 = 15.0;
/// Valence multiplier for a word preceded by a negator.
const NEGATION_SCALAR: f64 = -0.74;
/// How many preceding tokens a negator reaches.
const NEGATION_WINDOW: usize = 3;

static VALENCE: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("love", 3.2), ("loves", 2.7), ("loved", 2.9), ("amazing", 2.8), ("awesome", 3.1),
        ("excellent", 2.7), ("great", 3.1), ("wonderful", 2.7), ("fantastic", 2.6),
        ("happy", 2.7), ("excited", 1.4), ("exciting", 2.2), ("enjoy", 2.2), ("enjoying", 2.4),
        ("fun", 2.3), ("good", 1.9), ("nice", 1.8), ("best", 3.2), ("proud", 2.1),
        ("passionate", 2.4), ("glad", 2.0), ("grateful", 2.3), ("thank", 1.5), ("thanks", 1.9),
        ("like", 1.5), ("kind", 2.4), ("friendly", 2.2), ("helpful", 1.8), ("interesting", 1.7),
        ("beautiful", 2.9), ("favorite", 2.0), ("favourite", 2.0), ("win", 2.8), ("won", 2.7),
        ("success", 2.7), ("talented", 2.3), ("special", 1.7), ("dream", 1.0), ("hope", 1.9),
        ("bad", -2.5), ("sad", -2.1), ("angry", -2.3), ("hate", -2.7), ("boring", -1.3),
        ("terrible", -2.1), ("awful", -2.0), ("worst", -3.1), ("poor", -2.1), ("difficult", -0.6),
        ("hard", -0.4), ("afraid", -2.2), ("scared", -1.9), ("tired", -1.9), ("lonely", -1.8),
        ("upset", -1.6), ("annoying", -1.7), ("problem", -1.7), ("fail", -2.5), ("failed", -2.3),
    ]
    .into_iter()
    .collect()
});

static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["not", "no", "never", "nothing", "nobody", "neither", "nor", "t", "cannot"]
        .into_iter()
        .collect()
});

/// Valence-lexicon polarity: sums word valences (flipped and damped after a
/// negator) and squashes the sum into `(-1, 1)`.
pub struct LexiconPolarity;

impl LexiconPolarity {
    pub fn compound(text: &str) -> f64 {
        let tokens = tokenize(text);
        let sum: f64 = tokens
            .iter()
            .enumerate()
            .filter_map(|(i, tok)| {
                let valence = *VALENCE.get(tok.as_str())?;
                let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                    .iter()
                    .any(|t| NEGATORS.contains(t.as_str()));
                Some(if negated { valence * NEGATION_SCALAR } else { valence })
            })
            .sum();

        if sum == 0.0 {
            0.0
        } else {
            (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
        }
    }
}

impl PolarityProvider for LexiconPolarity {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn polarity(&self, text: &str) -> Result<f64, CollaboratorError> {
        Ok(Self::compound(text))
    }
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

/// Sentence-to-topic similarity, typically backed by an embedding model.
pub trait SimilarityModel: Send + Sync {
    fn name(&self) -> &str;

    /// Highest similarity between `sentence` and any of `topics`, in `[0, 1]`.
    fn similarity(&self, sentence: &str, topics: &[&str]) -> f64;
}

const STEM_LEN: usize = 5;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "the", "of", "to", "in", "on", "at", "for", "with", "is", "am",
        "are", "was", "i", "my", "me", "it", "this", "that",
    ]
    .into_iter()
    .collect()
});

/// Bag-of-stems cosine similarity.  Cheap to build; used when no embedding
/// model is plugged in.
pub struct LexicalSimilarity {
    stem_len: usize,
}

impl LexicalSimilarity {
    fn new() -> Self {
        Self { stem_len: STEM_LEN }
    }

    fn stems(&self, text: &str) -> HashSet<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| !STOP_WORDS.contains(t.as_str()))
            .map(|t| t.chars().take(self.stem_len).collect())
            .collect()
    }
}

impl SimilarityModel for LexicalSimilarity {
    fn name(&self) -> &str {
        "lexical"
    }

    fn similarity(&self, sentence: &str, topics: &[&str]) -> f64 {
        let s = self.stems(sentence);
        if s.is_empty() {
            return 0.0;
        }
        topics
            .iter()
            .map(|topic| {
                let t = self.stems(topic);
                if t.is_empty() {
                    return 0.0;
                }
                let shared = s.intersection(&t).count() as f64;
                shared / ((s.len() * t.len()) as f64).sqrt()
            })
            .fold(0.0, f64::max)
            .clamp(0.0, 1.0)
    }
}

static MODEL: Lazy<LexicalSimilarity> = Lazy::new(|| {
    log::debug!("initialising lexical similarity model");
    LexicalSimilarity::new()
});

/// Process-wide similarity model, built on first use and reused afterwards.
pub fn shared_similarity_model() -> &'static LexicalSimilarity {
    &MODEL
}
