use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use introscore_core::output::OutputFormat;
use introscore_core::pipeline::{Pipeline, Submission};
use introscore_core::report::Report;
use introscore_core::rubric::Rubric;

use crate::output;
use crate::ScoreOptions;

/// Transcript extensions picked up when scoring a directory.
const TRANSCRIPT_EXTS: &[&str] = &["txt"];

pub fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        anyhow::bail!("{} does not exist", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let p = entry.path();
        if p.extension()
            .and_then(|e| e.to_str())
            .map(|e| TRANSCRIPT_EXTS.contains(&e))
            .unwrap_or(false)
        {
            files.push(p.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

pub fn parse_format(s: &str) -> Result<OutputFormat> {
    match s {
        "pretty" => Ok(OutputFormat::Pretty),
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => anyhow::bail!("unknown format: {other} (expected pretty, text, or json)"),
    }
}

pub fn format_report(report: &Report, fmt: OutputFormat, feedback: bool) -> Result<String> {
    Ok(match fmt {
        OutputFormat::Json => output::format_json(report)?,
        OutputFormat::Text => output::format_text(report, feedback),
        OutputFormat::Pretty => output::format_pretty(report, feedback),
    })
}

/// An explicit `--rubric` file must load cleanly; otherwise the nearest
/// `.introscore` is used, falling back to the built-in tables.
pub fn resolve_rubric(path: &Path, explicit: Option<&Path>) -> Result<Rubric> {
    match explicit {
        Some(file) => Rubric::from_file(file).with_context(|| format!("invalid rubric {}", file.display())),
        None => Ok(Rubric::load(path)),
    }
}

pub fn score_files(files: &[PathBuf], pipeline: &Pipeline, options: &ScoreOptions) -> Result<Vec<Report>> {
    files
        .iter()
        .map(|f| -> Result<Report> {
            let text = std::fs::read_to_string(f)
                .with_context(|| format!("cannot read {}", f.display()))?;
            let mut submission = Submission::new(&text).source(f.clone());
            submission.duration_minutes = options.duration;
            submission.grammar_errors = options.grammar_errors;
            submission.polarity = options.polarity;
            Ok(pipeline.run(&submission))
        })
        .collect()
}

/// Reports whose total falls below `min`.
pub fn below_threshold(reports: &[Report], min: u32) -> Vec<&Report> {
    reports.iter().filter(|r| r.composite.total < min).collect()
}

pub fn run(path: &Path, options: &ScoreOptions) -> Result<()> {
    let fmt = parse_format(&options.format)?;
    let files = collect_files(path).context("failed to collect transcripts")?;
    if files.is_empty() {
        anyhow::bail!("no .txt transcripts found in {}", path.display());
    }

    let rubric = resolve_rubric(path, options.rubric.as_deref())?;
    rubric.validate().context("rubric failed validation")?;
    let pipeline = Pipeline::with_rubric(rubric);
    log::info!("scoring {} transcript(s) under {}", files.len(), path.display());

    let reports = score_files(&files, &pipeline, options)?;

    if fmt == OutputFormat::Json && reports.len() > 1 {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", format_report(report, fmt, options.feedback)?);
        }
    }

    if let Some(min) = options.min_score {
        let failures = below_threshold(&reports, min);
        if !failures.is_empty() {
            eprintln!("\n--- BELOW MINIMUM SCORE ({min}) ---");
            for report in &failures {
                let path = report
                    .metadata
                    .source
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<stdin>".into());
                eprintln!("  {} scored {} ({})", path, report.composite.total, report.composite.band);
            }
            std::process::exit(2);
        }
        eprintln!("\nAll transcripts scored at least {min}.");
    }

    Ok(())
}
