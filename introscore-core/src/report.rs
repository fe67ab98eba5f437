use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collaborators::GrammarIssue;
use crate::feedback::FeedbackItem;
use crate::rubric::KeywordTier;
use crate::semantic::RelevanceReport;

/// The eight rubric categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Salutation,
    Keywords,
    Flow,
    SpeechRate,
    Grammar,
    Vocabulary,
    Clarity,
    Sentiment,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Salutation,
            Category::Keywords,
            Category::Flow,
            Category::SpeechRate,
            Category::Grammar,
            Category::Vocabulary,
            Category::Clarity,
            Category::Sentiment,
        ]
    }

    /// Points available in this category.  The maxima sum to 100.
    pub fn points(self) -> u32 {
        match self {
            Category::Salutation => 5,
            Category::Keywords   => 30,
            Category::Flow       => 5,
            Category::SpeechRate => 10,
            Category::Grammar    => 10,
            Category::Vocabulary => 10,
            Category::Clarity    => 15,
            Category::Sentiment  => 15,
        }
    }

    /// Stable machine key, identical to the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Category::Salutation => "salutation",
            Category::Keywords   => "keywords",
            Category::Flow       => "flow",
            Category::SpeechRate => "speech_rate",
            Category::Grammar    => "grammar",
            Category::Vocabulary => "vocabulary",
            Category::Clarity    => "clarity",
            Category::Sentiment  => "sentiment",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Salutation => write!(f, "Salutation"),
            Category::Keywords => write!(f, "Keywords"),
            Category::Flow => write!(f, "Flow"),
            Category::SpeechRate => write!(f, "Speech Rate"),
            Category::Grammar => write!(f, "Grammar"),
            Category::Vocabulary => write!(f, "Vocabulary"),
            Category::Clarity => write!(f, "Clarity"),
            Category::Sentiment => write!(f, "Sentiment"),
        }
    }
}

/// Greeting quality tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalutationLevel {
    Excellent,
    Good,
    Normal,
    None,
}

impl SalutationLevel {
    pub fn score(self) -> u32 {
        match self {
            SalutationLevel::Excellent => 5,
            SalutationLevel::Good => 4,
            SalutationLevel::Normal => 2,
            SalutationLevel::None => 0,
        }
    }
}

impl std::fmt::Display for SalutationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SalutationLevel::Excellent => write!(f, "Excellent"),
            SalutationLevel::Good => write!(f, "Good"),
            SalutationLevel::Normal => write!(f, "Normal"),
            SalutationLevel::None => write!(f, "None"),
        }
    }
}

/// Structural sections checked for ordering by the flow scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Salutation,
    Name,
    Details,
    Closing,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[Section::Salutation, Section::Name, Section::Details, Section::Closing]
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Salutation => write!(f, "Salutation"),
            Section::Name => write!(f, "Name"),
            Section::Details => write!(f, "Details"),
            Section::Closing => write!(f, "Closing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalutationDetail {
    pub present: bool,
    pub level: SalutationLevel,
    pub phrase: Option<String>,
}

/// Whether one keyword topic was found, and by which phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPresence {
    pub topic: String,
    pub tier: KeywordTier,
    pub found: bool,
    pub matched: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDetail {
    pub topics: Vec<TopicPresence>,
}

impl KeywordDetail {
    /// Names of topics in `tier` that were not found, in configured order.
    pub fn missing(&self, tier: KeywordTier) -> Vec<&str> {
        self.topics
            .iter()
            .filter(|t| t.tier == tier && !t.found)
            .map(|t| t.topic.as_str())
            .collect()
    }

    pub fn is_found(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t.topic == topic && t.found)
    }
}

/// Byte offset of a section in the lowercased text, `None` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionIndex {
    pub section: Section,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDetail {
    pub valid_order: bool,
    pub indices: Vec<SectionIndex>,
    pub feedback: Vec<String>,
}

impl FlowDetail {
    pub fn index_of(&self, section: Section) -> Option<usize> {
        self.indices
            .iter()
            .find(|s| s.section == section)
            .and_then(|s| s.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRateDetail {
    pub word_count: usize,
    pub duration_minutes: f64,
    pub wpm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarDetail {
    pub count: usize,
    pub total_words: usize,
    pub errors_per_100: f64,
    pub g_index: f64,
    /// Checker issues behind `count`; empty when the count was supplied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<GrammarIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyDetail {
    pub unique_words: usize,
    pub total_words: usize,
    pub ttr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillerDetail {
    pub count: usize,
    pub rate: f64,
    pub fillers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDetail {
    pub raw_polarity: f64,
    pub positivity: f64,
}

/// Category-specific evidence behind a sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubScoreDetail {
    Salutation(SalutationDetail),
    Keywords(KeywordDetail),
    Flow(FlowDetail),
    SpeechRate(SpeechRateDetail),
    Grammar(GrammarDetail),
    Vocabulary(VocabularyDetail),
    Clarity(FillerDetail),
    Sentiment(SentimentDetail),
    /// The analyzer could not run; the category scored zero.
    Unavailable { reason: String },
}

macro_rules! detail_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SubScoreDetail {
                fn from(detail: $ty) -> Self {
                    SubScoreDetail::$variant(detail)
                }
            }
        )*
    };
}

detail_from! {
    SalutationDetail => Salutation,
    KeywordDetail    => Keywords,
    FlowDetail       => Flow,
    SpeechRateDetail => SpeechRate,
    GrammarDetail    => Grammar,
    VocabularyDetail => Vocabulary,
    FillerDetail     => Clarity,
    SentimentDetail  => Sentiment,
}

/// A scorer's raw output before it is tagged with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<D> {
    pub score: u32,
    pub detail: D,
}

impl<D: Into<SubScoreDetail>> Scored<D> {
    pub fn into_sub_score(self, category: Category) -> SubScoreResult {
        SubScoreResult {
            category,
            score: self.score.min(category.points()),
            max: category.points(),
            detail: self.detail.into(),
        }
    }
}

/// One category's score, its maximum, and the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScoreResult {
    pub category: Category,
    pub score: u32,
    pub max: u32,
    pub detail: SubScoreDetail,
}

impl SubScoreResult {
    /// Zero-score placeholder for a category whose analyzer could not run.
    pub fn unavailable(category: Category, reason: impl Into<String>) -> Self {
        SubScoreResult {
            category,
            score: 0,
            max: category.points(),
            detail: SubScoreDetail::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Share of the category maximum earned, in percent.
    pub fn percentage(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.score as f64 / self.max as f64 * 100.0
        }
    }
}

/// Qualitative label for the composite total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Band {
    pub fn from_total(total: u32) -> Self {
        match total {
            85.. => Band::Excellent,
            70..=84 => Band::Good,
            50..=69 => Band::Average,
            _ => Band::Poor,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Excellent => write!(f, "excellent"),
            Band::Good => write!(f, "good"),
            Band::Average => write!(f, "average"),
            Band::Poor => write!(f, "poor"),
        }
    }
}

/// A category that was scored from a fallback because a collaborator failed
/// or no analyzer produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degradation {
    pub category: Category,
    pub reason: String,
}

/// All eight sub-scores, their exact sum, and the resulting band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub scores: Vec<SubScoreResult>,
    pub total: u32,
    pub band: Band,
    pub degraded: Vec<Degradation>,
}

impl CompositeResult {
    pub fn get(&self, category: Category) -> Option<&SubScoreResult> {
        self.scores.iter().find(|s| s.category == category)
    }

    pub fn max_total(&self) -> u32 {
        self.scores.iter().map(|s| s.max).sum()
    }
}

/// Metadata about the evaluated submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source: Option<PathBuf>,
    pub word_count: usize,
    pub duration_minutes: f64,
}

/// The full evaluation of one self-introduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub composite: CompositeResult,
    pub feedback: Vec<FeedbackItem>,
    pub relevance: Option<RelevanceReport>,
    pub metadata: ReportMetadata,
}
