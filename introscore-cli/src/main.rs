#![deny(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod output;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "introscore",
    about = "Score self-introduction transcripts against a speaking rubric",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Transcript file or directory (shorthand for `introscore score <path>`).
    path: Option<PathBuf>,

    #[command(flatten)]
    score: ScoreOptions,

    /// Log more detail (-v for debug, -vv for trace).  `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Score a transcript file or every `.txt` under a directory.
    Score(ScoreArgs),

    /// Print the active rubric: phrase tables and score tiers.
    Rubric(RubricArgs),
}

#[derive(Args)]
struct ScoreArgs {
    /// Transcript file or directory.
    path: PathBuf,

    #[command(flatten)]
    options: ScoreOptions,
}

#[derive(Args, Clone)]
pub struct ScoreOptions {
    /// Output format: pretty, text, or json.
    #[arg(long, default_value = "pretty")]
    pub format: String,

    /// Speaking time in minutes (default 1.0).
    #[arg(long)]
    pub duration: Option<f64>,

    /// Grammar error count measured by an external checker.
    #[arg(long)]
    pub grammar_errors: Option<usize>,

    /// Sentiment polarity in [-1, 1] measured by an external service.
    #[arg(long, allow_hyphen_values = true)]
    pub polarity: Option<f64>,

    /// Rubric TOML file; by default the nearest `.introscore` is used.
    #[arg(long)]
    pub rubric: Option<PathBuf>,

    /// Exit 2 if any transcript totals below this score.
    #[arg(long)]
    pub min_score: Option<u32>,

    /// Show per-category explanations and remediation feedback.
    #[arg(long)]
    pub feedback: bool,
}

#[derive(Args)]
struct RubricArgs {
    /// Directory to discover `.introscore` from (default: current directory).
    path: Option<PathBuf>,

    /// Explicit rubric TOML file.
    #[arg(long)]
    rubric: Option<PathBuf>,

    /// Output format: table or toml.
    #[arg(long, default_value = "table")]
    format: String,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Command::Score(a)) => commands::score::run(&a.path, &a.options),

        Some(Command::Rubric(a)) => {
            let start = match a.path {
                Some(p) => p,
                None => std::env::current_dir()?,
            };
            commands::rubric::run(&start, a.rubric.as_deref(), &a.format)
        }

        None => match cli.path {
            Some(path) => commands::score::run(&path, &cli.score),
            None => {
                use clap::CommandFactory;
                Cli::command().print_help()?;
                Ok(())
            }
        },
    }
}
