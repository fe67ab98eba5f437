use std::path::{Path, PathBuf};

use introscore_core::feedback::{FeedbackArea, Severity};
use introscore_core::pipeline::{Pipeline, Submission};
use introscore_core::report::{Band, Category, Report, Section, SubScoreDetail};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/intros")
        .join(name)
}

fn score_fixture(name: &str, duration: f64) -> Report {
    let path = fixture(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"));
    Pipeline::with_defaults().run(&Submission::new(&text).duration(duration).source(path))
}

fn sub_score(report: &Report, category: Category) -> u32 {
    report
        .composite
        .get(category)
        .unwrap_or_else(|| panic!("missing {category}"))
        .score
}

// ── polished ───────────────────────────────────────────────────────────

#[test]
fn polished_intro_scores_per_category() {
    let report = score_fixture("polished.txt", 0.8);
    let expected = [
        (Category::Salutation, 5),
        (Category::Keywords, 30),
        (Category::Flow, 5),
        (Category::SpeechRate, 10),
        (Category::Grammar, 10),
        (Category::Vocabulary, 8),
        (Category::Clarity, 15),
        (Category::Sentiment, 15),
    ];
    for (category, score) in expected {
        assert_eq!(sub_score(&report, category), score, "{category}");
    }
    assert_eq!(report.composite.total, 98);
    assert_eq!(report.composite.band, Band::Excellent);
    assert_eq!(report.metadata.word_count, 106);
}

#[test]
fn polished_intro_gets_no_feedback() {
    let report = score_fixture("polished.txt", 0.8);
    assert!(report.feedback.is_empty(), "{:#?}", report.feedback);
}

#[test]
fn pacing_changes_only_the_rate_score() {
    let fast = score_fixture("polished.txt", 0.8);
    let slow = score_fixture("polished.txt", 1.0);
    assert_eq!(sub_score(&slow, Category::SpeechRate), 6);
    assert_eq!(fast.composite.total - slow.composite.total, 4);
    let slow_delivery = slow
        .feedback
        .iter()
        .find(|f| f.area == FeedbackArea::Delivery);
    assert!(slow_delivery.is_none(), "106 wpm is not below 100");
}

// ── rambling ───────────────────────────────────────────────────────────

#[test]
fn rambling_intro_is_penalized_for_fillers() {
    let report = score_fixture("rambling.txt", 1.0);
    match &report.composite.get(Category::Clarity).unwrap().detail {
        SubScoreDetail::Clarity(d) => {
            assert_eq!(d.count, 19);
            assert_eq!(&d.fillers[..5], ["um", "so", "like", "um", "like"]);
        }
        other => panic!("unexpected detail {other:?}"),
    }
    assert_eq!(sub_score(&report, Category::Clarity), 3);
    assert_eq!(sub_score(&report, Category::Salutation), 2);

    let top = &report.feedback[0];
    assert_eq!(top.severity, Severity::High);
    assert!(report
        .feedback
        .iter()
        .any(|f| f.area == FeedbackArea::Clarity && f.suggestion.contains("um, so, like, um, like")));
}

#[test]
fn rambling_intro_still_flows_in_order() {
    let report = score_fixture("rambling.txt", 1.0);
    assert_eq!(sub_score(&report, Category::Flow), 5);
}

// ── inverted ───────────────────────────────────────────────────────────

#[test]
fn closing_first_and_greeting_last_breaks_flow() {
    let report = score_fixture("inverted.txt", 0.25);
    let flow = report.composite.get(Category::Flow).unwrap();
    assert_eq!(flow.score, 0);
    match &flow.detail {
        SubScoreDetail::Flow(d) => {
            assert!(!d.valid_order);
            assert_eq!(d.index_of(Section::Closing), Some(0));
            assert_eq!(
                d.feedback,
                vec![
                    "Name appears before previous section.",
                    "Closing appears before previous section.",
                ]
            );
        }
        other => panic!("unexpected detail {other:?}"),
    }
    assert!(report
        .feedback
        .iter()
        .any(|f| f.area == FeedbackArea::Structure && f.severity == Severity::High));
}

// ── whole-pipeline properties ──────────────────────────────────────────

#[test]
fn every_fixture_obeys_bounds_and_exact_sum() {
    for name in ["polished.txt", "rambling.txt", "inverted.txt"] {
        for duration in [0.0, 0.5, 1.0, 3.0] {
            let report = score_fixture(name, duration);
            let c = &report.composite;
            for s in &c.scores {
                assert!(s.score <= s.max, "{name}: {} {} > {}", s.category, s.score, s.max);
            }
            assert_eq!(c.total, c.scores.iter().map(|s| s.score).sum::<u32>());
            assert!(c.total <= 100);
            assert_eq!(c.band, Band::from_total(c.total));
        }
    }
}

#[test]
fn scoring_is_idempotent() {
    let a = score_fixture("rambling.txt", 0.7);
    let b = score_fixture("rambling.txt", 0.7);
    assert_eq!(a, b);
}
