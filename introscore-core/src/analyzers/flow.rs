use crate::analyzers::{Analyzer, ScoringInput};
use crate::report::{Category, FlowDetail, Scored, Section, SectionIndex, SubScoreResult};
use crate::rubric::{Rubric, DETAIL_TOPICS, NAME_TOPIC};
use crate::text::NormalizedText;

/// Checks that greeting, name, personal details and closing appear in that
/// order.  All or nothing: 5 points or 0.
pub struct FlowAnalyzer;

const FULL_SCORE: u32 = 5;

fn earliest<'a>(haystack: &str, phrases: impl IntoIterator<Item = &'a String>) -> Option<usize> {
    phrases.into_iter().filter_map(|p| haystack.find(p.as_str())).min()
}

/// Latest of each phrase's first occurrence.
fn latest<'a>(haystack: &str, phrases: impl IntoIterator<Item = &'a String>) -> Option<usize> {
    phrases.into_iter().filter_map(|p| haystack.find(p.as_str())).max()
}

pub fn locate(text: &NormalizedText, rubric: &Rubric) -> Vec<SectionIndex> {
    let haystack = text.lowered();
    let details = DETAIL_TOPICS
        .iter()
        .flat_map(|topic| rubric.keywords.phrases(topic));

    vec![
        SectionIndex {
            section: Section::Salutation,
            index: earliest(haystack, rubric.salutations.all_phrases()),
        },
        SectionIndex {
            section: Section::Name,
            index: earliest(haystack, rubric.keywords.phrases(NAME_TOPIC)),
        },
        SectionIndex {
            section: Section::Details,
            index: earliest(haystack, details),
        },
        SectionIndex {
            section: Section::Closing,
            index: latest(haystack, &rubric.closings),
        },
    ]
}

pub fn score(text: &NormalizedText, rubric: &Rubric) -> Scored<FlowDetail> {
    let indices = locate(text, rubric);

    let mut feedback = Vec::new();
    let mut valid_order = true;
    let mut previous: Option<usize> = None;
    for entry in &indices {
        match entry.index {
            Some(idx) => {
                if previous.is_some_and(|prev| idx < prev) {
                    valid_order = false;
                    feedback.push(format!("{} appears before previous section.", entry.section));
                }
                previous = Some(idx);
            }
            None => feedback.push(format!("{} not found.", entry.section)),
        }
    }

    let complete = indices.iter().all(|s| s.index.is_some());
    let score = if valid_order && complete { FULL_SCORE } else { 0 };

    Scored {
        score,
        detail: FlowDetail {
            valid_order,
            indices,
            feedback,
        },
    }
}

impl Analyzer for FlowAnalyzer {
    fn category(&self) -> Category {
        Category::Flow
    }

    fn analyze(&self, input: &ScoringInput<'_>) -> SubScoreResult {
        let scored = score(input.text, input.rubric);
        if !scored.detail.feedback.is_empty() {
            log::debug!("flow: {}", scored.detail.feedback.join(" "));
        }
        scored.into_sub_score(self.category())
    }
}
