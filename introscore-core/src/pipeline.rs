use std::path::PathBuf;

use crate::analyzers::{default_analyzers, Analyzer, ExternalSignals, ScoringInput};
use crate::collaborators::{
    ensure_finite_polarity, shared_similarity_model, CollaboratorError, FixedPolarity,
    GrammarChecker, GrammarFindings, LexiconPolarity, NoGrammarChecker, PolarityProvider,
    SimilarityModel,
};
use crate::feedback;
use crate::report::{
    Band, Category, CompositeResult, Degradation, Report, ReportMetadata, SubScoreResult,
};
use crate::rubric::Rubric;
use crate::semantic::analyze_relevance;
use crate::text::normalize;

/// Minutes assumed when the caller does not measure the speech.
pub const DEFAULT_DURATION_MINUTES: f64 = 1.0;

/// One self-introduction and any signals measured outside the engine.
///
/// Signals left unset are resolved by the pipeline's collaborators.
#[derive(Debug, Clone, Default)]
pub struct Submission<'a> {
    pub text: &'a str,
    pub duration_minutes: Option<f64>,
    /// Error count from an external checker, already filtered.
    pub grammar_errors: Option<usize>,
    /// Raw polarity in `[-1, 1]` from an external sentiment service.
    pub polarity: Option<f64>,
    pub source: Option<PathBuf>,
}

impl<'a> Submission<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn duration(mut self, minutes: f64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn grammar_errors(mut self, count: usize) -> Self {
        self.grammar_errors = Some(count);
        self
    }

    pub fn polarity(mut self, polarity: f64) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }
}

/// Runs every analyzer over one submission and aggregates the results.
pub struct Pipeline {
    rubric: Rubric,
    analyzers: Vec<Box<dyn Analyzer>>,
    grammar: Box<dyn GrammarChecker>,
    polarity: Box<dyn PolarityProvider>,
    similarity: Option<&'static dyn SimilarityModel>,
}

impl Pipeline {
    /// Construct with explicit collaborators.
    ///
    /// Production code plugs a real grammar checker and sentiment service in
    /// here; tests use it to inject failing collaborators.
    pub fn with_collaborators(
        rubric: Rubric,
        analyzers: Vec<Box<dyn Analyzer>>,
        grammar: Box<dyn GrammarChecker>,
        polarity: Box<dyn PolarityProvider>,
    ) -> Self {
        Self {
            rubric,
            analyzers,
            grammar,
            polarity,
            similarity: None,
        }
    }

    /// Default rubric, all eight analyzers, the no-op grammar checker, the
    /// lexicon polarity provider and the shared similarity model.
    pub fn with_defaults() -> Self {
        Self::with_rubric(Rubric::default())
    }

    pub fn with_rubric(rubric: Rubric) -> Self {
        Self::with_collaborators(
            rubric,
            default_analyzers(),
            Box::new(NoGrammarChecker),
            Box::new(LexiconPolarity),
        )
        .with_similarity(shared_similarity_model())
    }

    /// Enable per-sentence relevance using `model`.
    pub fn with_similarity(mut self, model: &'static dyn SimilarityModel) -> Self {
        self.similarity = Some(model);
        self
    }

    /// Disable per-sentence relevance.
    pub fn without_similarity(mut self) -> Self {
        self.similarity = None;
        self
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn run(&self, submission: &Submission<'_>) -> Report {
        let text = normalize(submission.text);
        let (signals, degraded) = self.resolve_signals(submission, text.cleaned());

        let input = ScoringInput {
            text: &text,
            rubric: &self.rubric,
            signals: &signals,
        };
        let results: Vec<SubScoreResult> = self.analyzers.iter().map(|a| a.analyze(&input)).collect();

        let composite = aggregate(results, degraded);
        let feedback = feedback::generate(&composite);
        let relevance = self
            .similarity
            .map(|model| analyze_relevance(text.cleaned(), model));

        Report {
            composite,
            feedback,
            relevance,
            metadata: ReportMetadata {
                source: submission.source.clone(),
                word_count: text.word_count(),
                duration_minutes: signals.duration_minutes,
            },
        }
    }

    /// Fill in every external signal the caller did not supply.  A failing
    /// collaborator becomes a recorded degradation, never an error.
    fn resolve_signals(
        &self,
        submission: &Submission<'_>,
        cleaned: &str,
    ) -> (ExternalSignals, Vec<Degradation>) {
        let mut degraded = Vec::new();

        let grammar = match submission.grammar_errors {
            Some(count) => Ok(GrammarFindings::counted(count)),
            None => self
                .grammar
                .check(cleaned)
                .map(|issues| GrammarFindings::from_issues(issues, &self.rubric.ignored_grammar_rules)),
        };
        note_failure(&grammar, Category::Grammar, &mut degraded);

        let fixed;
        let provider: &dyn PolarityProvider = match submission.polarity {
            Some(value) => {
                fixed = FixedPolarity(value);
                &fixed
            }
            None => self.polarity.as_ref(),
        };
        let polarity = provider
            .polarity(cleaned)
            .and_then(|p| ensure_finite_polarity(provider.name(), p));
        note_failure(&polarity, Category::Sentiment, &mut degraded);

        let signals = ExternalSignals {
            duration_minutes: submission.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            grammar,
            polarity,
        };
        (signals, degraded)
    }
}

fn note_failure<T>(
    signal: &Result<T, CollaboratorError>,
    category: Category,
    degraded: &mut Vec<Degradation>,
) {
    if let Err(e) = signal {
        log::warn!("{category} scored as 0: {e}");
        degraded.push(Degradation {
            category,
            reason: e.to_string(),
        });
    }
}

/// Combine sub-scores into the composite.
///
/// Results are placed in report order.  A category with no result is scored
/// 0 and recorded as degraded, so the maximum stays 100.  A duplicate result
/// for a category is ignored.  The total is the exact sum of the sub-scores.
pub fn aggregate(mut results: Vec<SubScoreResult>, mut degraded: Vec<Degradation>) -> CompositeResult {
    let scores: Vec<SubScoreResult> = Category::all()
        .iter()
        .map(|&category| match results.iter().position(|r| r.category == category) {
            Some(i) => results.swap_remove(i),
            None => {
                let reason = format!("no analyzer produced a {category} score");
                log::warn!("{reason}");
                degraded.push(Degradation {
                    category,
                    reason: reason.clone(),
                });
                SubScoreResult::unavailable(category, reason)
            }
        })
        .collect();

    let total: u32 = scores.iter().map(|s| s.score).sum();
    degraded.sort_by_key(|d| d.category);

    CompositeResult {
        band: Band::from_total(total),
        total,
        scores,
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::GrammarIssue;
    use crate::report::SubScoreDetail;

    const SAMPLE: &str = "Good morning everyone. Myself Asha, I am 12 years old and I study in \
                          class 7 at Green Valley School. I live with my family, my parents and \
                          my brother. I am from Pune. My hobby is painting and I love reading. \
                          My goal is to become a doctor. A fun fact about me: I won a medal in \
                          chess. Thank you.";

    struct BrokenChecker;

    impl GrammarChecker for BrokenChecker {
        fn name(&self) -> &str {
            "broken"
        }

        fn check(&self, _text: &str) -> Result<Vec<GrammarIssue>, CollaboratorError> {
            Err(CollaboratorError::Unavailable {
                service: "broken".into(),
                reason: "connection refused".into(),
            })
        }
    }

    struct NanPolarity;

    impl PolarityProvider for NanPolarity {
        fn name(&self) -> &str {
            "nan"
        }

        fn polarity(&self, _text: &str) -> Result<f64, CollaboratorError> {
            Ok(f64::NAN)
        }
    }

    struct SpellingOnlyChecker;

    impl GrammarChecker for SpellingOnlyChecker {
        fn name(&self) -> &str {
            "spelling"
        }

        fn check(&self, _text: &str) -> Result<Vec<GrammarIssue>, CollaboratorError> {
            Ok(vec![
                GrammarIssue {
                    rule_id: "MORFOLOGIK_RULE_EN_US".into(),
                    message: "Possible spelling mistake".into(),
                    offset: 0,
                    length: 4,
                },
                GrammarIssue {
                    rule_id: "HE_VERB_AGR".into(),
                    message: "Agreement".into(),
                    offset: 10,
                    length: 2,
                },
            ])
        }
    }

    #[test]
    fn report_has_eight_scores_in_order() {
        let report = Pipeline::with_defaults().run(&Submission::new(SAMPLE));
        let categories: Vec<Category> = report.composite.scores.iter().map(|s| s.category).collect();
        assert_eq!(categories, Category::all());
        assert_eq!(report.composite.max_total(), 100);
    }

    #[test]
    fn total_is_exact_sum() {
        let report = Pipeline::with_defaults().run(&Submission::new(SAMPLE).duration(0.6));
        let sum: u32 = report.composite.scores.iter().map(|s| s.score).sum();
        assert_eq!(report.composite.total, sum);
        assert_eq!(report.composite.band, Band::from_total(sum));
    }

    #[test]
    fn running_twice_is_identical() {
        let pipeline = Pipeline::with_defaults();
        let submission = Submission::new(SAMPLE).duration(0.5).grammar_errors(2);
        assert_eq!(pipeline.run(&submission), pipeline.run(&submission));
    }

    #[test]
    fn empty_text_completes() {
        let report = Pipeline::with_defaults().run(&Submission::new(""));
        assert!(report.composite.total <= 100);
        assert!(report.composite.degraded.is_empty());
        assert_eq!(report.metadata.word_count, 0);
    }

    #[test]
    fn broken_grammar_checker_degrades_to_zero() {
        let pipeline = Pipeline::with_collaborators(
            Rubric::default(),
            default_analyzers(),
            Box::new(BrokenChecker),
            Box::new(LexiconPolarity),
        );
        let report = pipeline.run(&Submission::new(SAMPLE));
        let grammar = report.composite.get(Category::Grammar).unwrap();
        assert_eq!(grammar.score, 0);
        assert_eq!(grammar.max, 10);
        assert!(matches!(grammar.detail, SubScoreDetail::Unavailable { .. }));
        assert_eq!(report.composite.degraded.len(), 1);
        assert_eq!(report.composite.degraded[0].category, Category::Grammar);
        assert_eq!(report.composite.max_total(), 100);
    }

    #[test]
    fn supplied_error_count_bypasses_the_checker() {
        let pipeline = Pipeline::with_collaborators(
            Rubric::default(),
            default_analyzers(),
            Box::new(BrokenChecker),
            Box::new(LexiconPolarity),
        );
        let report = pipeline.run(&Submission::new(SAMPLE).grammar_errors(0));
        assert_eq!(report.composite.get(Category::Grammar).unwrap().score, 10);
        assert!(report.composite.degraded.is_empty());
    }

    #[test]
    fn ignored_rules_are_filtered_before_scoring() {
        let pipeline = Pipeline::with_collaborators(
            Rubric::default(),
            default_analyzers(),
            Box::new(SpellingOnlyChecker),
            Box::new(LexiconPolarity),
        );
        let report = pipeline.run(&Submission::new(SAMPLE));
        match &report.composite.get(Category::Grammar).unwrap().detail {
            SubScoreDetail::Grammar(d) => {
                assert_eq!(d.count, 1);
                assert_eq!(d.issues.len(), 1);
                assert_eq!(d.issues[0].rule_id, "HE_VERB_AGR");
                assert_eq!(d.issues[0].message, "Agreement");
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn nan_polarity_is_a_degradation() {
        let report = Pipeline::with_defaults().run(&Submission::new(SAMPLE).polarity(f64::NAN));
        assert_eq!(report.composite.get(Category::Sentiment).unwrap().score, 0);
        assert_eq!(report.composite.degraded[0].category, Category::Sentiment);
    }

    #[test]
    fn provider_nan_is_a_degradation_like_caller_nan() {
        let pipeline = Pipeline::with_collaborators(
            Rubric::default(),
            default_analyzers(),
            Box::new(NoGrammarChecker),
            Box::new(NanPolarity),
        );
        let from_provider = pipeline.run(&Submission::new(SAMPLE));
        let from_caller = Pipeline::with_defaults().run(&Submission::new(SAMPLE).polarity(f64::NAN));

        for report in [&from_provider, &from_caller] {
            let sentiment = report.composite.get(Category::Sentiment).unwrap();
            assert_eq!(sentiment.score, 0);
            assert!(matches!(sentiment.detail, SubScoreDetail::Unavailable { .. }));
            assert_eq!(report.composite.degraded.len(), 1);
            assert_eq!(report.composite.degraded[0].category, Category::Sentiment);
        }
        assert!(from_provider.composite.degraded[0].reason.contains("nan"));
    }

    #[test]
    fn missing_analyzer_is_filled_and_recorded() {
        let analyzers: Vec<Box<dyn Analyzer>> = default_analyzers()
            .into_iter()
            .filter(|a| a.category() != Category::Vocabulary)
            .collect();
        let pipeline = Pipeline::with_collaborators(
            Rubric::default(),
            analyzers,
            Box::new(NoGrammarChecker),
            Box::new(LexiconPolarity),
        );
        let report = pipeline.run(&Submission::new(SAMPLE));
        assert_eq!(report.composite.scores.len(), 8);
        assert_eq!(report.composite.get(Category::Vocabulary).unwrap().score, 0);
        assert_eq!(report.composite.degraded[0].category, Category::Vocabulary);
        assert_eq!(report.composite.max_total(), 100);
    }

    #[test]
    fn relevance_is_informational() {
        let with = Pipeline::with_defaults().run(&Submission::new(SAMPLE));
        let without = Pipeline::with_defaults()
            .without_similarity()
            .run(&Submission::new(SAMPLE));
        assert!(with.relevance.is_some());
        assert!(without.relevance.is_none());
        assert_eq!(with.composite, without.composite);
    }

    #[test]
    fn duration_defaults_to_one_minute() {
        let report = Pipeline::with_defaults().run(&Submission::new(SAMPLE));
        assert_eq!(report.metadata.duration_minutes, DEFAULT_DURATION_MINUTES);
    }
}
