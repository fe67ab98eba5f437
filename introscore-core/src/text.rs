//! Text cleaning and tokenization shared by every analyzer.
//!
//! A transcript is normalized exactly once per evaluation.  Every length- and
//! rate-based scorer reads the same [`NormalizedText::tokens`], so their word
//! counts always agree with each other.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Immutable view of a transcript, derived once and shared by all scorers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedText {
    raw: String,
    cleaned: String,
    lowered: String,
    tokens: Vec<String>,
}

impl NormalizedText {
    /// The input exactly as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whitespace-collapsed, trimmed text with original casing.
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    /// Lowercased form of [`cleaned`](Self::cleaned); phrase matching runs on this.
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Lowercased word tokens in reading order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Collapse whitespace, trim, lowercase and tokenize `raw`.
///
/// Never fails: empty or whitespace-only input produces empty strings and no
/// tokens.
pub fn normalize(raw: &str) -> NormalizedText {
    let cleaned = clean(raw);
    let lowered = cleaned.to_lowercase();
    let tokens = tokenize(&lowered);
    NormalizedText {
        raw: raw.to_string(),
        cleaned,
        lowered,
        tokens,
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn clean(raw: &str) -> String {
    WHITESPACE.replace_all(raw, " ").trim().to_string()
}

/// Maximal runs of word characters, lowercased.  Punctuation and apostrophes
/// act as boundaries, so `"don't"` yields `["don", "t"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Split on runs of `.`, `!` or `?`, dropping empty pieces.
pub fn sentences(text: &str) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
