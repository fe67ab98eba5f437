use colored::{Color, Colorize};
use introscore_core::feedback::{explain, Severity};
use introscore_core::output::grammar_issues;
use introscore_core::report::{Band, Report, SubScoreResult};

const BAR_WIDTH: usize = 20;

fn band_color(band: Band) -> Color {
    match band {
        Band::Excellent => Color::Green,
        Band::Good => Color::Cyan,
        Band::Average => Color::Yellow,
        Band::Poor => Color::Red,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

fn score_color(s: &SubScoreResult) -> Color {
    let pct = s.percentage();
    if pct >= 80.0 {
        Color::Green
    } else if pct >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Format a report with terminal colors.
pub fn format_pretty(report: &Report, feedback: bool) -> String {
    let mut out = String::new();
    let composite = &report.composite;

    if let Some(ref path) = report.metadata.source {
        out.push_str(&format!("{} {}\n", "File:".bold(), path.display()));
    }

    let verdict = format!("{}/{} ({})", composite.total, composite.max_total(), composite.band);
    out.push_str(&format!(
        "{} {}\n",
        "Score:".bold(),
        verdict.color(band_color(composite.band)).bold()
    ));
    out.push_str(&format!(
        "{} {} | {} {:.2} min\n",
        "Words:".dimmed(),
        report.metadata.word_count,
        "Duration:".dimmed(),
        report.metadata.duration_minutes,
    ));

    out.push_str(&format!("\n{}\n", "Categories:".bold()));
    for s in &composite.scores {
        let filled = (s.percentage() / 100.0 * BAR_WIDTH as f64).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));
        out.push_str(&format!(
            "  {:<12} {} {:>2}/{:<2}\n",
            s.category.to_string(),
            bar.color(score_color(s)),
            s.score,
            s.max
        ));
        if feedback {
            out.push_str(&format!("      {}\n", explain(s).dimmed()));
        }
    }

    if !composite.degraded.is_empty() {
        out.push_str(&format!("\n{}\n", "Degraded:".bold().yellow()));
        for d in &composite.degraded {
            out.push_str(&format!("  {} {}\n", format!("{}:", d.category).yellow(), d.reason));
        }
    }

    if feedback && !report.feedback.is_empty() {
        out.push_str(&format!("\n{}\n", "Feedback:".bold()));
        for item in &report.feedback {
            out.push_str(&format!(
                "  {} {} {}\n",
                format!("[{}]", item.severity).color(severity_color(item.severity)),
                format!("{}:", item.area).bold(),
                item.issue,
            ));
            out.push_str(&format!("      {}\n", item.suggestion));
        }
    }

    let (issues, total) = grammar_issues(report);
    if feedback && !issues.is_empty() {
        out.push_str(&format!(
            "\n{} {}\n",
            "Grammar issues:".bold(),
            format!("({} of {})", issues.len(), total).dimmed()
        ));
        for (i, issue) in issues.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {} {}\n",
                i + 1,
                issue.message,
                format!("[{}]", issue.rule_id).red()
            ));
        }
    }

    if let Some(ref relevance) = report.relevance {
        out.push_str(&format!(
            "\n{} {:.2} {}\n",
            "Relevance:".dimmed(),
            relevance.overall,
            format!("({} sentences, {})", relevance.sentences.len(), relevance.model).dimmed(),
        ));
    }

    out
}

pub use introscore_core::output::{format_json, format_text};
