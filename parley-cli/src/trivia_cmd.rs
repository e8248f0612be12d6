//! Trivia command - run a trivia duel between scripted agents

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use parley_core::{Task, TriviaTask};
use parley_match::{play_series, MatchOptions, SeriesOptions};

use crate::logging::MatchLogger;
use crate::report::{report_match, report_series};
use crate::roster::{scripted_roster, SeatScript};

#[derive(Args)]
pub struct TriviaArgs {
    /// Questions JSON file (defaults to the built-in sample set)
    #[arg(long, value_name = "FILE")]
    pub questions: Option<PathBuf>,

    /// Replies for the first seat, semicolon-separated
    #[arg(long, value_name = "LIST")]
    pub first: String,

    /// Replies for the second seat, semicolon-separated
    #[arg(long, value_name = "LIST")]
    pub second: String,

    /// Name of the first agent
    #[arg(long, default_value = "first")]
    pub first_name: String,

    /// Name of the second agent
    #[arg(long, default_value = "second")]
    pub second_name: String,

    /// Model identifier recorded for the first agent
    #[arg(long, value_name = "MODEL")]
    pub first_model: Option<String>,

    /// Model identifier recorded for the second agent
    #[arg(long, value_name = "MODEL")]
    pub second_model: Option<String>,

    /// Seed for the first match
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of matches to play
    #[arg(long, default_value = "1")]
    pub series: usize,

    /// Directory to write match logs into
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Output reports as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run trivia command
pub fn run(args: TriviaArgs) -> Result<()> {
    let task = match &args.questions {
        Some(path) => TriviaTask::load(path)?,
        None => TriviaTask::sample(),
    };

    tracing::info!(
        questions = task.questions().len(),
        matches = args.series,
        "starting trivia"
    );

    let first = SeatScript::new(&args.first_name, args.first_model.as_deref(), &args.first);
    let second = SeatScript::new(&args.second_name, args.second_model.as_deref(), &args.second);
    let roster = || scripted_roster(&first, &second);

    let options = SeriesOptions {
        matches: args.series,
        base_seed: args.seed,
        match_options: MatchOptions::default(),
    };
    let result = play_series(&task, roster, &options)?;

    for report in &result.reports {
        if let Some(dir) = &args.log_dir {
            let (json_path, _) =
                MatchLogger::new(dir).write(report, &task.render(&report.final_state))?;
            tracing::info!(path = %json_path.display(), "match log written");
        }
        report_match(report, args.json)?;
    }

    if args.series > 1 {
        report_series(&result);
    }
    Ok(())
}
