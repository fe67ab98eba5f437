#![deny(dead_code)]

pub mod analyzers;
pub mod collaborators;
pub mod feedback;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod rubric;
pub mod semantic;
pub mod text;
pub mod tiers;

use std::path::Path;

use pipeline::{Pipeline, Submission};
use report::Report;
use rubric::Rubric;

/// Score a self-introduction with the default rubric and collaborators.
pub fn evaluate(text: &str) -> Report {
    let pipeline = Pipeline::with_defaults();
    pipeline.run(&Submission::new(text))
}

/// Score a transcript file, using the nearest `.introscore` rubric above it.
pub fn evaluate_file(path: &Path) -> std::io::Result<Report> {
    let text = std::fs::read_to_string(path)?;
    let pipeline = Pipeline::with_rubric(Rubric::load(path));
    Ok(pipeline.run(&Submission::new(&text).source(path)))
}
