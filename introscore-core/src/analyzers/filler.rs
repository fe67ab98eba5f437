use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, FillerDetail, Scored, SubScoreResult};
use crate::text::tokenize;
use crate::tiers::FILLER_RATE;

/// Clarity, scored by how many words are fillers.
pub struct FillerAnalyzer;

/// Count filler occurrences.
///
/// Fillers that are exactly one token are matched against whole tokens.
/// Anything else (`"you know"`, `"that's"`) is counted as non-overlapping
/// substrings of `lowered`, so two phrases sharing words may both count the
/// same stretch of text.
///
/// Returns the total and each occurrence, single-word fillers in token order
/// followed by phrases in configured order.
pub fn count_fillers(tokens: &[String], lowered: &str, fillers: &[String]) -> (usize, Vec<String>) {
    let (words, phrases): (Vec<&String>, Vec<&String>) = fillers.iter().partition(|f| is_single_token(f));

    let mut found: Vec<String> = tokens
        .iter()
        .filter(|t| words.iter().any(|w| *w == *t))
        .cloned()
        .collect();

    for phrase in phrases {
        let n = lowered.matches(phrase.as_str()).count();
        found.extend(std::iter::repeat(phrase.clone()).take(n));
    }

    (found.len(), found)
}

fn is_single_token(filler: &str) -> bool {
    matches!(tokenize(filler).as_slice(), [only] if only == filler)
}

pub fn score(tokens: &[String], lowered: &str, fillers: &[String]) -> Scored<FillerDetail> {
    let (count, found) = count_fillers(tokens, lowered, fillers);
    let rate = if tokens.is_empty() {
        0.0
    } else {
        count as f64 * 100.0 / tokens.len() as f64
    };

    Scored {
        score: FILLER_RATE.score(rate),
        detail: FillerDetail {
            count,
            rate,
            fillers: found,
        },
    }
}

impl Analyzer for FillerAnalyzer {
    fn category(&self) -> Category {
        Category::Clarity
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        let text = input.text;
        let scored = score(text.tokens(), text.lowered(), &input.rubric.fillers);
        log::debug!("clarity: {} fillers, {:.1}%", scored.detail.count, scored.detail.rate);
        scored.into_sub_score(self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Rubric;
    use crate::text::normalize;

    fn run(text: &str) -> Scored<FillerDetail> {
        let text = normalize(text);
        score(text.tokens(), text.lowered(), &Rubric::default().fillers)
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn clean_speech_scores_full() {
        let result = run("My name is Asha and I study in class seven");
        assert_eq!(result.detail.count, 0);
        assert_eq!(result.score, 15);
    }

    #[test]
    fn single_word_fillers_match_whole_tokens_only() {
        // "um" inside "museum" and "so" inside "some" do not count
        let result = run("um I visited some museum");
        assert_eq!(result.detail.count, 1);
        assert_eq!(result.detail.fillers, vec!["um"]);
    }

    #[test]
    fn multi_word_fillers_count_substrings() {
        let result = run("you know I mean it, you know");
        assert_eq!(result.detail.count, 3);
        assert_eq!(result.detail.fillers, vec!["you know", "you know", "i mean"]);
    }

    #[test]
    fn overlapping_phrases_both_count() {
        let fillers = vec!["you know".to_string(), "you know what".to_string()];
        let text = normalize("you know what, you know");
        let result = score(text.tokens(), text.lowered(), &fillers);
        assert_eq!(result.detail.count, 3);
        assert_eq!(result.detail.fillers, vec!["you know", "you know", "you know what"]);
    }

    #[test]
    fn fillers_with_punctuation_match_as_substrings() {
        let fillers = vec!["that's".to_string(), "ok-ish".to_string(), "um".to_string()];
        let text = normalize("That's it, um, it was ok-ish. That's all");
        let result = score(text.tokens(), text.lowered(), &fillers);
        assert_eq!(result.detail.count, 4);
        assert_eq!(result.detail.fillers, vec!["um", "that's", "that's", "ok-ish"]);
    }

    #[test]
    fn three_percent_is_still_top_tier() {
        // 3 fillers in 100 tokens
        let text = format!("um uh hmm {}", words(97));
        let result = run(&text);
        assert_eq!(result.detail.rate, 3.0);
        assert_eq!(result.score, 15);
    }

    #[test]
    fn just_above_three_percent_drops_a_tier() {
        // 4 fillers in 100 tokens
        let text = format!("um uh hmm ah {}", words(96));
        let result = run(&text);
        assert_eq!(result.detail.rate, 4.0);
        assert_eq!(result.score, 12);
    }

    #[test]
    fn heavy_filler_use_is_floor() {
        let result = run("um uh like so basically w1 w2 w3 w4 w5");
        assert_eq!(result.detail.rate, 50.0);
        assert_eq!(result.score, 3);
    }

    #[test]
    fn empty_text_is_zero_rate() {
        let result = run("");
        assert_eq!(result.detail.rate, 0.0);
        assert_eq!(result.score, 15);
    }
}
