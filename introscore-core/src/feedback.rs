//! Actionable feedback derived from a scored introduction.
//!
//! [`generate`] turns the composite into remediation items ranked by
//! severity; [`explain`] gives a one-sentence "why" for a single sub-score.
//! Neither changes any score.

use serde::{Deserialize, Serialize};

use crate::report::{
    Category, CompositeResult, FillerDetail, FlowDetail, GrammarDetail, KeywordDetail,
    SentimentDetail, SpeechRateDetail, SubScoreDetail, SubScoreResult, VocabularyDetail,
};
use crate::rubric::KeywordTier;

/// Ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
        }
    }
}

/// Reader-facing grouping of feedback items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackArea {
    Content,
    ContentEnhancement,
    Grammar,
    Tone,
    Structure,
    Delivery,
    Clarity,
    Vocabulary,
}

impl FeedbackArea {
    pub fn label(self) -> &'static str {
        match self {
            FeedbackArea::Content => "Content",
            FeedbackArea::ContentEnhancement => "Content Enhancement",
            FeedbackArea::Grammar => "Grammar",
            FeedbackArea::Tone => "Tone & Engagement",
            FeedbackArea::Structure => "Structure",
            FeedbackArea::Delivery => "Delivery",
            FeedbackArea::Clarity => "Clarity",
            FeedbackArea::Vocabulary => "Vocabulary",
        }
    }
}

impl std::fmt::Display for FeedbackArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub area: FeedbackArea,
    pub severity: Severity,
    pub issue: String,
    pub suggestion: String,
}

impl FeedbackItem {
    fn new(area: FeedbackArea, severity: Severity, issue: String, suggestion: impl Into<String>) -> Self {
        Self {
            area,
            severity,
            issue,
            suggestion: suggestion.into(),
        }
    }
}

/// Remediation items for every category that needs work, most severe first.
/// Items of equal severity keep category order.  Categories that could not
/// be scored produce no items.
pub fn generate(composite: &CompositeResult) -> Vec<FeedbackItem> {
    let mut items = Vec::new();

    for category in [
        Category::Keywords,
        Category::Grammar,
        Category::Sentiment,
        Category::Flow,
        Category::SpeechRate,
        Category::Clarity,
        Category::Vocabulary,
    ] {
        let Some(result) = composite.get(category) else {
            continue;
        };
        match &result.detail {
            SubScoreDetail::Keywords(d) => items.extend(keyword_items(d)),
            SubScoreDetail::Grammar(d) => items.extend(grammar_item(d)),
            SubScoreDetail::Sentiment(d) => items.extend(tone_item(d)),
            SubScoreDetail::Flow(d) => items.extend(structure_item(d)),
            SubScoreDetail::SpeechRate(d) => items.extend(delivery_item(d)),
            SubScoreDetail::Clarity(d) => items.extend(clarity_item(d)),
            SubScoreDetail::Vocabulary(d) => items.extend(vocabulary_item(d)),
            _ => {}
        }
    }

    items.sort_by_key(|item| item.severity);
    items
}

fn keyword_items(detail: &KeywordDetail) -> Vec<FeedbackItem> {
    let mut items = Vec::new();

    let must = detail.missing(KeywordTier::MustHave);
    if !must.is_empty() {
        let readable: Vec<String> = must.iter().map(|t| t.to_lowercase().replace('_', "/")).collect();
        items.push(FeedbackItem::new(
            FeedbackArea::Content,
            Severity::High,
            format!("Missing essential topics: {}", must.join(", ")),
            format!(
                "Add clear statements about your {}. For example: 'My name is...', \
                 'I am X years old', 'I study at...'",
                readable.join(", ")
            ),
        ));
    }

    let good = detail.missing(KeywordTier::GoodToHave);
    if let Some(first) = good.first() {
        items.push(FeedbackItem::new(
            FeedbackArea::ContentEnhancement,
            Severity::Medium,
            format!("Could include: {}", good.join(", ")),
            format!(
                "Consider adding 1-2 sentences about {}. This adds personality and helps you stand out.",
                first.to_lowercase()
            ),
        ));
    }

    items
}

fn grammar_item(detail: &GrammarDetail) -> Option<FeedbackItem> {
    let (severity, suggestion) = match detail.count {
        0 => return None,
        5.. => (
            Severity::High,
            "Review your text carefully. Consider using a grammar checker or asking someone \
             to proofread before finalizing.",
        ),
        3..=4 => (
            Severity::Medium,
            "Fix the highlighted grammar errors. Pay attention to punctuation, subject-verb \
             agreement, and spelling.",
        ),
        _ => (
            Severity::Low,
            "Just a few minor fixes needed. Review the specific errors highlighted below.",
        ),
    };
    let plural = if detail.count > 1 { "s" } else { "" };
    Some(FeedbackItem::new(
        FeedbackArea::Grammar,
        severity,
        format!("{} grammar error{plural} detected", detail.count),
        suggestion,
    ))
}

fn tone_item(detail: &SentimentDetail) -> Option<FeedbackItem> {
    if detail.positivity < 0.5 {
        Some(FeedbackItem::new(
            FeedbackArea::Tone,
            Severity::Medium,
            "Your introduction sounds neutral or negative".into(),
            "Use more positive and enthusiastic language. Words like 'enjoy', 'love', 'excited', \
             'passionate' help create engagement. Example: Instead of 'I do sports', try \
             'I really enjoy playing sports!'",
        ))
    } else if detail.positivity < 0.7 {
        Some(FeedbackItem::new(
            FeedbackArea::Tone,
            Severity::Low,
            "Good tone, but could be more enthusiastic".into(),
            "Add a bit more energy! Show your personality and what makes you unique.",
        ))
    } else {
        None
    }
}

fn structure_item(detail: &FlowDetail) -> Option<FeedbackItem> {
    if detail.valid_order {
        return None;
    }
    Some(FeedbackItem::new(
        FeedbackArea::Structure,
        Severity::High,
        "Your introduction doesn't follow the ideal structure".into(),
        "Reorganize to follow this order: 1) Greeting, 2) Name, 3) Basic details (age, school), \
         4) Family/hobbies, 5) Closing. This creates a natural flow that's easy to follow.",
    ))
}

fn delivery_item(detail: &SpeechRateDetail) -> Option<FeedbackItem> {
    let wpm = detail.wpm;
    if wpm < 100.0 {
        Some(FeedbackItem::new(
            FeedbackArea::Delivery,
            Severity::Medium,
            format!("Speaking too slowly ({wpm:.0} WPM)"),
            "Your pace is quite slow. Practice speaking a bit faster to maintain audience \
             engagement. Aim for 111-140 words per minute.",
        ))
    } else if wpm > 160.0 {
        Some(FeedbackItem::new(
            FeedbackArea::Delivery,
            Severity::Medium,
            format!("Speaking too fast ({wpm:.0} WPM)"),
            "You're speaking very quickly. Slow down to ensure clarity. Take breaths between \
             sentences. Aim for 111-140 words per minute.",
        ))
    } else if wpm > 140.0 {
        Some(FeedbackItem::new(
            FeedbackArea::Delivery,
            Severity::Low,
            format!("Slightly fast pace ({wpm:.0} WPM)"),
            "Good pace, but slightly fast. Slowing down just a bit will improve clarity.",
        ))
    } else {
        None
    }
}

fn clarity_item(detail: &FillerDetail) -> Option<FeedbackItem> {
    if detail.count > 5 {
        let examples: Vec<&str> = detail.fillers.iter().take(5).map(String::as_str).collect();
        Some(FeedbackItem::new(
            FeedbackArea::Clarity,
            Severity::High,
            format!("{} filler words detected ({:.1}%)", detail.count, detail.rate),
            format!(
                "You're using too many filler words: {}. Practice pausing instead of saying 'um' \
                 or 'like'. Record yourself and listen back to identify patterns.",
                examples.join(", ")
            ),
        ))
    } else if detail.count > 2 {
        Some(FeedbackItem::new(
            FeedbackArea::Clarity,
            Severity::Medium,
            format!("{} filler words found", detail.count),
            "Try to eliminate filler words by practicing your introduction. Pause briefly \
             instead of saying 'um' or 'like'.",
        ))
    } else {
        None
    }
}

fn vocabulary_item(detail: &VocabularyDetail) -> Option<FeedbackItem> {
    let ttr = detail.ttr;
    if ttr < 0.4 {
        Some(FeedbackItem::new(
            FeedbackArea::Vocabulary,
            Severity::Medium,
            format!("Limited vocabulary variety (TTR: {ttr:.2})"),
            "You're repeating words too often. Try using synonyms and more varied vocabulary. \
             Example: Instead of repeating 'like', use 'enjoy', 'love', 'prefer', 'appreciate'.",
        ))
    } else if ttr < 0.5 {
        Some(FeedbackItem::new(
            FeedbackArea::Vocabulary,
            Severity::Low,
            format!("Vocabulary could be more diverse (TTR: {ttr:.2})"),
            "Good variety, but you can improve. Use a thesaurus to find more expressive \
             alternatives for common words.",
        ))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    High,
    Medium,
    Low,
    None,
}

impl Level {
    fn of(result: &SubScoreResult) -> Self {
        let pct = result.percentage();
        if pct >= 80.0 {
            Level::High
        } else if pct >= 50.0 {
            Level::Medium
        } else if pct > 0.0 {
            Level::Low
        } else {
            Level::None
        }
    }
}

/// One sentence explaining why a category scored what it did.
pub fn explain(result: &SubScoreResult) -> String {
    let level = Level::of(result);
    match &result.detail {
        SubScoreDetail::Unavailable { reason } => {
            format!("{} could not be scored: {reason}.", result.category)
        }
        SubScoreDetail::Salutation(d) => match level {
            Level::High => format!(
                "Your greeting is rated {}, which shows professionalism and friendliness.",
                d.level.to_string().to_lowercase()
            ),
            Level::Medium => "You have a basic greeting, but it could be more enthusiastic or \
                              formal depending on context."
                .into(),
            Level::Low => "Your introduction lacks a clear greeting. Start with 'Hello', \
                           'Good morning', or 'Hi everyone' to engage your audience."
                .into(),
            Level::None => "No greeting detected. Always start your introduction with a \
                            salutation to create a welcoming tone."
                .into(),
        },
        SubScoreDetail::Keywords(d) => {
            let missing: Vec<&str> = d.topics.iter().filter(|t| !t.found).map(|t| t.topic.as_str()).collect();
            match level {
                Level::High => "You covered all essential topics! Your introduction is \
                                comprehensive and informative."
                    .into(),
                Level::Medium => format!(
                    "You mentioned most key topics, but you're missing: {}.",
                    missing.iter().take(3).copied().collect::<Vec<_>>().join(", ")
                ),
                Level::Low | Level::None => format!(
                    "Several important topics are missing: {}. Make sure to cover the basics.",
                    missing.iter().take(5).copied().collect::<Vec<_>>().join(", ")
                ),
            }
        }
        SubScoreDetail::Flow(_) => {
            if result.score == result.max {
                "Your introduction follows a logical structure: greeting → name → details → \
                 closing. Well organized!"
                    .into()
            } else {
                "Your introduction jumps around. Try this order: greeting → name → age/school → \
                 family/hobbies → unique facts → closing."
                    .into()
            }
        }
        SubScoreDetail::SpeechRate(d) => match level {
            Level::High => format!(
                "Your speech rate of {:.0} WPM is excellent - within the ideal 111-140 range. \
                 Perfect pacing!",
                d.wpm
            ),
            Level::Medium => format!(
                "Your speech rate is {:.0} WPM. Try to aim for 111-140 WPM for better clarity \
                 and engagement.",
                d.wpm
            ),
            Level::Low | Level::None => format!(
                "Your speech rate is {:.0} WPM, which is outside the ideal range. Adjust your \
                 pacing for better comprehension.",
                d.wpm
            ),
        },
        SubScoreDetail::Grammar(d) => match level {
            Level::High => "Excellent grammar! Your writing is clean and professional.".into(),
            Level::Medium => format!(
                "{} grammar errors found. These are minor issues that can be easily fixed.",
                d.count
            ),
            Level::Low | Level::None => format!(
                "{} grammar errors detected. Review spelling, punctuation, and sentence structure.",
                d.count
            ),
        },
        SubScoreDetail::Vocabulary(d) => match level {
            Level::High => format!(
                "Excellent vocabulary richness (TTR: {:.2})! You use varied and diverse words.",
                d.ttr
            ),
            Level::Medium => format!(
                "Your vocabulary is decent (TTR: {:.2}), but try using more varied words to \
                 avoid repetition.",
                d.ttr
            ),
            Level::Low | Level::None => format!(
                "Limited vocabulary diversity (TTR: {:.2}). Use synonyms and more descriptive \
                 words to enrich your introduction.",
                d.ttr
            ),
        },
        SubScoreDetail::Clarity(d) => match level {
            Level::High => format!(
                "Excellent clarity! Only {} filler words detected ({:.1}%). Your speech is \
                 confident and clear.",
                d.count, d.rate
            ),
            Level::Medium => format!(
                "You used {} filler words ({:.1}%). Reduce words like 'um', 'like', 'you know' \
                 for better clarity.",
                d.count, d.rate
            ),
            Level::Low | Level::None => format!(
                "Too many filler words: {} ({:.1}%). Practice speaking more confidently without \
                 fillers.",
                d.count, d.rate
            ),
        },
        SubScoreDetail::Sentiment(d) => match level {
            Level::High => format!(
                "Your positivity score is {:.2}! You sound enthusiastic and engaged.",
                d.positivity
            ),
            Level::Medium => "Your tone is somewhat positive, but adding more enthusiastic \
                              language would increase engagement."
                .into(),
            Level::Low | Level::None => "Your introduction sounds neutral or negative. Use words \
                                         like 'enjoy', 'excited', 'passionate' to sound more \
                                         positive."
                .into(),
        },
    }
}
