use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, Scored, SpeechRateDetail, SubScoreResult};
use crate::tiers::SPEECH_RATE;

pub struct SpeechRateAnalyzer;

/// Words per minute, or 0 for a non-positive (or non-finite) duration.
pub fn words_per_minute(word_count: usize, duration_minutes: f64) -> f64 {
    if duration_minutes > 0.0 && duration_minutes.is_finite() {
        word_count as f64 / duration_minutes
    } else {
        0.0
    }
}

pub fn score(word_count: usize, duration_minutes: f64) -> Scored<SpeechRateDetail> {
    let wpm = words_per_minute(word_count, duration_minutes);
    Scored {
        score: SPEECH_RATE.score(wpm),
        detail: SpeechRateDetail {
            word_count,
            duration_minutes,
            wpm,
        },
    }
}

impl Analyzer for SpeechRateAnalyzer {
    fn category(&self) -> Category {
        Category::SpeechRate
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        let scored = score(input.text.word_count(), input.signals.duration_minutes);
        log::debug!("speech rate: {:.1} wpm", scored.detail.wpm);
        scored.into_sub_score(self.category())
    }
}
