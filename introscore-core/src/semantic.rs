//! Sentence-level topical relevance.
//!
//! Informational only: relevance never feeds the composite score.  Each
//! sentence is compared against a fixed set of reference topics through a
//! [`SimilarityModel`] and labelled by its best match.

use serde::{Deserialize, Serialize};

use crate::collaborators::SimilarityModel;
use crate::text::sentences;

/// What a well-formed self-introduction talks about.
pub const REFERENCE_TOPICS: &[&str] = &[
    "greeting and introduction",
    "personal name and identity",
    "age and school information",
    "family background and members",
    "hobbies interests and activities",
    "goals dreams and aspirations",
    "unique qualities and strengths",
];

const HIGH: f64 = 0.5;
const MEDIUM: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    Medium,
    Low,
}

impl Relevance {
    pub fn from_similarity(score: f64) -> Self {
        if score >= HIGH {
            Relevance::High
        } else if score >= MEDIUM {
            Relevance::Medium
        } else {
            Relevance::Low
        }
    }
}

impl std::fmt::Display for Relevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relevance::High => write!(f, "high"),
            Relevance::Medium => write!(f, "medium"),
            Relevance::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRelevance {
    pub sentence: String,
    pub score: f64,
    pub relevance: Relevance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceReport {
    pub sentences: Vec<SentenceRelevance>,
    /// Mean sentence score, 0 when there are no sentences.
    pub overall: f64,
    /// Name of the similarity model that produced the scores.
    pub model: String,
}

pub fn analyze_relevance(text: &str, model: &dyn SimilarityModel) -> RelevanceReport {
    let scored: Vec<SentenceRelevance> = sentences(text)
        .into_iter()
        .map(|sentence| {
            let score = model.similarity(&sentence, REFERENCE_TOPICS).clamp(0.0, 1.0);
            SentenceRelevance {
                relevance: Relevance::from_similarity(score),
                sentence,
                score,
            }
        })
        .collect();

    let overall = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|s| s.score).sum::<f64>() / scored.len() as f64
    };

    RelevanceReport {
        sentences: scored,
        overall,
        model: model.name().to_string(),
    }
}
