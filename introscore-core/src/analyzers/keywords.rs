use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, KeywordDetail, Scored, SubScoreResult, TopicPresence};
use crate::rubric::PhraseTable;
use crate::text::NormalizedText;

/// Topic coverage: 4 points per Must Have topic, 2 per Good to Have topic.
pub struct KeywordAnalyzer;

/// A topic counts as found when any of its phrases is a substring of the
/// lowercased text.  Matching is not word-boundary aware, so `"aim"` also
/// matches inside `"claim"`.
pub fn score(text: &NormalizedText, table: &PhraseTable) -> Scored<KeywordDetail> {
    let haystack = text.lowered();
    let topics: Vec<TopicPresence> = table
        .iter()
        .map(|(tier, topic)| {
            let matched = topic
                .phrases
                .iter()
                .find(|p| haystack.contains(p.as_str()))
                .cloned();
            TopicPresence {
                topic: topic.name.clone(),
                tier,
                found: matched.is_some(),
                matched,
            }
        })
        .collect();

    let score = topics
        .iter()
        .filter(|t| t.found)
        .map(|t| t.tier.weight())
        .sum();

    Scored {
        score,
        detail: KeywordDetail { topics },
    }
}

impl Analyzer for KeywordAnalyzer {
    fn category(&self) -> Category {
        Category::Keywords
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        let scored = score(input.text, &input.rubric.keywords);
        log::debug!("keywords: {} topics found, score {}", scored.detail.topics.iter().filter(|t| t.found).count(), scored.score);
        scored.into_sub_score(self.category())
    }
}
