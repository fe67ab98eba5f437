use crate::analyzers::{Analyzer, ScoringInput};
use crate::collaborators::GrammarFindings;
use crate::report::{Category, GrammarDetail, Scored, SubScoreResult};
use crate::tiers::GRAMMAR_INDEX;

/// Maps an externally measured error count to a score.  When the grammar
/// checker failed the category is reported unavailable.
pub struct GrammarAnalyzer;

/// Errors per hundred words at which the index bottoms out.
const SATURATION: f64 = 10.0;

pub fn score(error_count: usize, total_words: usize) -> Scored<GrammarDetail> {
    let errors_per_100 = if total_words == 0 {
        0.0
    } else {
        error_count as f64 * 100.0 / total_words as f64
    };
    let g_index = 1.0 - (errors_per_100 / SATURATION).min(1.0);

    Scored {
        score: GRAMMAR_INDEX.score(g_index),
        detail: GrammarDetail {
            count: error_count,
            total_words,
            errors_per_100,
            g_index,
            issues: Vec::new(),
        },
    }
}

/// Score `findings` and keep its issues on the detail.
pub fn score_findings(findings: &GrammarFindings, total_words: usize) -> Scored<GrammarDetail> {
    let mut scored = score(findings.count, total_words);
    scored.detail.issues = findings.issues.clone();
    scored
}

impl Analyzer for GrammarAnalyzer {
    fn category(&self) -> Category {
        Category::Grammar
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        match &input.signals.grammar {
            Ok(findings) => {
                let scored = score_findings(findings, input.text.word_count());
                log::debug!("grammar: {} errors, index {:.2}", findings.count, scored.detail.g_index);
                scored.into_sub_score(self.category())
            }
            Err(e) => SubScoreResult::unavailable(self.category(), e.to_string()),
        }
    }
}
