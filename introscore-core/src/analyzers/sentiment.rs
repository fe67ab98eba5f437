use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, Scored, SentimentDetail, SubScoreResult};
use crate::tiers::POSITIVITY;

pub struct SentimentAnalyzer;

/// Negative polarity floors to zero positivity; it never scores below neutral.
pub fn score(raw_polarity: f64) -> Scored<SentimentDetail> {
    let positivity = if raw_polarity.is_nan() {
        0.0
    } else {
        raw_polarity.clamp(-1.0, 1.0).max(0.0)
    };

    Scored {
        score: POSITIVITY.score(positivity),
        detail: SentimentDetail {
            raw_polarity,
            positivity,
        },
    }
}

impl Analyzer for SentimentAnalyzer {
    fn category(&self) -> Category {
        Category::Sentiment
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        match &input.signals.polarity {
            Ok(polarity) => {
                let scored = score(*polarity);
                log::debug!("sentiment: polarity {polarity:.2}");
                scored.into_sub_score(self.category())
            }
            Err(e) => SubScoreResult::unavailable(self.category(), e.to_string()),
        }
    }
}
