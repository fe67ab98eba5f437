use std::collections::HashSet;

use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, Scored, SubScoreResult, VocabularyDetail};
use crate::tiers::VOCABULARY;

/// Lexical diversity measured by type-token ratio.
pub struct VocabularyAnalyzer;

pub fn score(tokens: &[String]) -> Scored<VocabularyDetail> {
    let unique_words = tokens.iter().collect::<HashSet<_>>().len();
    let total_words = tokens.len();
    let ttr = if total_words == 0 {
        0.0
    } else {
        unique_words as f64 / total_words as f64
    };

    Scored {
        score: VOCABULARY.score(ttr),
        detail: VocabularyDetail {
            unique_words,
            total_words,
            ttr,
        },
    }
}

impl Analyzer for VocabularyAnalyzer {
    fn category(&self) -> Category {
        Category::Vocabulary
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        let scored = score(input.text.tokens());
        log::debug!("vocabulary: ttr {:.2}", scored.detail.ttr);
        scored.into_sub_score(self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn all_unique_scores_ten() {
        let result = score(&tokenize("my name is asha and i love chess"));
        assert_eq!(result.detail.ttr, 1.0);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn repetition_lowers_the_ratio() {
        // 2 unique of 4
        let result = score(&tokenize("go go Go stop"));
        assert_eq!(result.detail.unique_words, 2);
        assert_eq!(result.detail.ttr, 0.5);
        assert_eq!(result.score, 6);
    }

    #[test]
    fn heavy_repetition_is_floor() {
        let result = score(&tokenize(&"the ".repeat(10)));
        assert_eq!(result.detail.ttr, 0.1);
        assert_eq!(result.score, 2);
    }

    #[test]
    fn empty_is_zero_ratio_and_floor_score() {
        let result = score(&[]);
        assert_eq!(result.detail.ttr, 0.0);
        assert_eq!(result.score, 2);
    }
}
