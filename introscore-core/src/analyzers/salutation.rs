use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, SalutationDetail, SalutationLevel, Scored, SubScoreResult};
use crate::rubric::SalutationTiers;
use crate::text::NormalizedText;

pub struct SalutationAnalyzer;

/// Levels are tried best first.  Within a level the first configured phrase
/// present anywhere in the text wins, regardless of where it appears.
pub fn score(text: &NormalizedText, tiers: &SalutationTiers) -> Scored<SalutationDetail> {
    let haystack = text.lowered();
    for (level, phrases) in tiers.in_priority_order() {
        if let Some(phrase) = phrases.iter().find(|p| haystack.contains(p.as_str())) {
            return Scored {
                score: level.score(),
                detail: SalutationDetail {
                    present: true,
                    level,
                    phrase: Some(phrase.clone()),
                },
            };
        }
    }

    Scored {
        score: 0,
        detail: SalutationDetail {
            present: false,
            level: SalutationLevel::None,
            phrase: None,
        },
    }
}

impl Analyzer for SalutationAnalyzer {
    fn category(&self) -> Category {
        Category::Salutation
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        let scored = score(input.text, &input.rubric.salutations);
        log::debug!("salutation: {} ({})", scored.detail.level, scored.score);
        scored.into_sub_score(self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Rubric;
    use crate::text::normalize;

    fn run(text: &str) -> Scored<SalutationDetail> {
        score(&normalize(text), &Rubric::default().salutations)
    }

    #[test]
    fn excellent_beats_earlier_normal_greeting() {
        let result = run("Hello! I am excited to introduce myself.");
        assert_eq!(result.score, 5);
        assert_eq!(result.detail.level, SalutationLevel::Excellent);
        assert_eq!(result.detail.phrase.as_deref(), Some("i am excited to introduce"));
    }

    #[test]
    fn good_greeting() {
        let result = run("Good morning everyone, my name is Ravi");
        assert_eq!(result.score, 4);
        assert_eq!(result.detail.level, SalutationLevel::Good);
    }

    #[test]
    fn tie_within_tier_goes_to_configured_order_not_position() {
        // "good evening" appears first in the text, but "good morning" is
        // earlier in the configured list.
        let result = run("good evening... or rather, good morning!");
        assert_eq!(result.detail.phrase.as_deref(), Some("good morning"));
    }

    #[test]
    fn normal_greeting() {
        let result = run("Hi, I am Sam");
        assert_eq!(result.score, 2);
        assert_eq!(result.detail.level, SalutationLevel::Normal);
        assert_eq!(result.detail.phrase.as_deref(), Some("hi"));
    }

    #[test]
    fn substring_false_positive_is_preserved() {
        // "hi" inside "this"
        let result = run("This is Sam");
        assert_eq!(result.detail.level, SalutationLevel::Normal);
    }

    #[test]
    fn no_greeting() {
        let result = run("My name is Sam");
        assert_eq!(result.score, 0);
        assert!(!result.detail.present);
        assert_eq!(result.detail.level, SalutationLevel::None);
        assert_eq!(result.detail.phrase, None);
    }
}
