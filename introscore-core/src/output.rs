use std::fmt::Write as _;

use crate::collaborators::GrammarIssue;
use crate::feedback::explain;
use crate::report::{Category, Report, SubScoreDetail};

/// Grammar issues shown per report.
pub const LISTED_GRAMMAR_ISSUES: usize = 10;

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}

/// The first [`LISTED_GRAMMAR_ISSUES`] checker issues, with the total.
pub fn grammar_issues(report: &Report) -> (&[GrammarIssue], usize) {
    match report.composite.get(Category::Grammar).map(|s| &s.detail) {
        Some(SubScoreDetail::Grammar(d)) => {
            let shown = d.issues.len().min(LISTED_GRAMMAR_ISSUES);
            (&d.issues[..shown], d.issues.len())
        }
        _ => (Default::default(), 0),
    }
}

/// Format a report as JSON.
pub fn format_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Format a report as plain text (no colors).  With `feedback`, each score is
/// followed by its explanation and the remediation items are listed.
pub fn format_text(report: &Report, feedback: bool) -> String {
    let mut out = String::new();
    let composite = &report.composite;

    if let Some(ref path) = report.metadata.source {
        let _ = writeln!(out, "File: {}", path.display());
    }
    let _ = writeln!(
        out,
        "Score: {}/{} ({})",
        composite.total,
        composite.max_total(),
        composite.band
    );
    let _ = writeln!(
        out,
        "Words: {} | Duration: {:.2} min",
        report.metadata.word_count, report.metadata.duration_minutes
    );

    out.push_str("\nCategories:\n");
    for s in &composite.scores {
        let _ = writeln!(out, "  {:<12} {:>2}/{:<2}", s.category.to_string(), s.score, s.max);
        if feedback {
            let _ = writeln!(out, "      {}", explain(s));
        }
    }

    if !composite.degraded.is_empty() {
        out.push_str("\nDegraded:\n");
        for d in &composite.degraded {
            let _ = writeln!(out, "  {}: {}", d.category, d.reason);
        }
    }

    if feedback && !report.feedback.is_empty() {
        out.push_str("\nFeedback:\n");
        for item in &report.feedback {
            let _ = writeln!(out, "  [{:<6}] {}: {}", item.severity, item.area, item.issue);
            let _ = writeln!(out, "           {}", item.suggestion);
        }
    }

    let (issues, total) = grammar_issues(report);
    if feedback && !issues.is_empty() {
        let _ = writeln!(out, "\nGrammar issues ({} of {}):", issues.len(), total);
        for (i, issue) in issues.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {} [{}] at {}..{}",
                i + 1,
                issue.message,
                issue.rule_id,
                issue.offset,
                issue.offset + issue.length
            );
        }
    }

    if let Some(ref relevance) = report.relevance {
        let _ = writeln!(
            out,
            "\nRelevance: {:.2} over {} sentences ({})",
            relevance.overall,
            relevance.sentences.len(),
            relevance.model
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Pipeline, Submission};

    const SAMPLE: &str = "Hello everyone, myself Ravi. I am 11 years old. um um um. Thank you.";

    fn make_report(with_path: bool) -> Report {
        let mut submission = Submission::new(SAMPLE).grammar_errors(3);
        if with_path {
            submission = submission.source("intros/ravi.txt");
        }
        Pipeline::with_defaults().run(&submission)
    }

    #[test]
    fn format_text_contains_total_and_band() {
        let report = make_report(false);
        let out = format_text(&report, false);
        assert!(out.contains(&format!("Score: {}/100 ({})", report.composite.total, report.composite.band)));
        assert!(out.contains("Speech Rate"));
        assert!(!out.contains("File:"));
    }

    #[test]
    fn format_text_with_file_path() {
        let out = format_text(&make_report(true), false);
        assert!(out.contains("File: intros/ravi.txt"));
    }

    #[test]
    fn feedback_flag_adds_explanations_and_items() {
        let report = make_report(false);
        let plain = format_text(&report, false);
        let full = format_text(&report, true);
        assert!(!plain.contains("Feedback:"));
        assert!(full.contains("Feedback:"));
        assert!(full.contains("3 grammar errors detected"));
    }

    #[test]
    fn format_json_is_valid() {
        let report = make_report(false);
        let json = format_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["composite"]["total"], report.composite.total);
        assert_eq!(value["composite"]["scores"][3]["category"], "speech_rate");
        assert_eq!(value["composite"]["scores"][6]["detail"]["kind"], "clarity");
    }

    #[test]
    fn grammar_issues_are_listed_up_to_ten() {
        use crate::analyzers::default_analyzers;
        use crate::collaborators::{CollaboratorError, GrammarChecker, LexiconPolarity};
        use crate::rubric::Rubric;

        struct TwelveIssues;

        impl GrammarChecker for TwelveIssues {
            fn name(&self) -> &str {
                "twelve"
            }

            fn check(&self, _text: &str) -> Result<Vec<GrammarIssue>, CollaboratorError> {
                Ok((0..12)
                    .map(|i| GrammarIssue {
                        rule_id: format!("RULE_{i}"),
                        message: format!("issue number {i}"),
                        offset: i * 4,
                        length: 3,
                    })
                    .collect())
            }
        }

        let pipeline = Pipeline::with_collaborators(
            Rubric::default(),
            default_analyzers(),
            Box::new(TwelveIssues),
            Box::new(LexiconPolarity),
        );
        let report = pipeline.run(&Submission::new(SAMPLE));
        let (shown, total) = grammar_issues(&report);
        assert_eq!(shown.len(), LISTED_GRAMMAR_ISSUES);
        assert_eq!(total, 12);

        let out = format_text(&report, true);
        assert!(out.contains("Grammar issues (10 of 12):"), "{out}");
        assert!(out.contains("issue number 0 [RULE_0] at 0..3"));
        assert!(out.contains("issue number 9 [RULE_9]"));
        assert!(!out.contains("issue number 10"));
        assert!(!format_text(&report, false).contains("Grammar issues"));
    }

    #[test]
    fn supplied_error_count_lists_no_issues() {
        let out = format_text(&make_report(false), true);
        assert!(!out.contains("Grammar issues"));
    }
}
