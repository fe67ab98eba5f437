pub mod filler;
pub mod flow;
pub mod grammar;
pub mod keywords;
pub mod rate;
pub mod salutation;
pub mod sentiment;
pub mod vocabulary;

use crate::collaborators::{CollaboratorError, GrammarFindings};
use crate::report::{Category, SubScoreResult};
use crate::rubric::Rubric;
use crate::text::NormalizedText;

/// Signals measured outside the engine, already resolved by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalSignals {
    pub duration_minutes: f64,
    /// Grammar errors after ignored rules are filtered out.
    pub grammar: Result<GrammarFindings, CollaboratorError>,
    /// Raw polarity in `[-1, 1]`.
    pub polarity: Result<f64, CollaboratorError>,
}

impl Default for ExternalSignals {
    fn default() -> Self {
        Self {
            duration_minutes: 1.0,
            grammar: Ok(GrammarFindings::default()),
            polarity: Ok(0.0),
        }
    }
}

/// Everything an analyzer may read.  Shared immutably by all analyzers.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub text: &'a NormalizedText,
    pub rubric: &'a Rubric,
    pub signals: &'a ExternalSignals,
}

/// One rubric category's scorer.
pub trait Analyzer: Send + Sync {
    /// The category this analyzer produces.
    fn category(&self) -> Category;

    /// Score the submission.  Must never panic on any text, including empty
    /// text, and must return a result for [`category`](Self::category).
    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult;
}

/// Returns one analyzer per rubric category, in report order.
pub fn default_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(salutation::SalutationAnalyzer),
        Box::new(keywords::KeywordAnalyzer),
        Box::new(flow::FlowAnalyzer),
        Box::new(rate::SpeechRateAnalyzer),
        Box::new(grammar::GrammarAnalyzer),
        Box::new(vocabulary::VocabularyAnalyzer),
        Box::new(filler::FillerAnalyzer),
        Box::new(sentiment::SentimentAnalyzer),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;

    #[test]
    fn default_analyzers_cover_every_category_once() {
        let categories: Vec<Category> = default_analyzers().iter().map(|a| a.category()).collect();
        assert_eq!(categories, Category::all());
    }

    #[test]
    fn every_analyzer_stays_within_bounds_on_degenerate_input() {
        let rubric = Rubric::default();
        let signals = ExternalSignals {
            duration_minutes: 0.0,
            ..ExternalSignals::default()
        };
        for raw in ["", "   ", "!!! ...", "um um um um"] {
            let text = normalize(raw);
            let input = ScoringInput { text: &text, rubric: &rubric, signals: &signals };
            for analyzer in default_analyzers() {
                let result = analyzer.analyze(&input);
                assert_eq!(result.category, analyzer.category());
                assert!(
                    result.score <= result.max,
                    "{:?} scored {} > {} on {raw:?}",
                    result.category,
                    result.score,
                    result.max
                );
            }
        }
    }
}
