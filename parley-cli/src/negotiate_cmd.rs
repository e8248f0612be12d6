//! Negotiate command - run a negotiation game between scripted agents

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use parley_core::{NegotiationTask, Task};
use parley_match::{play_series, MatchOptions, SeriesOptions};

use crate::logging::MatchLogger;
use crate::report::{report_match, report_series};
use crate::roster::{scripted_roster, SeatScript};

#[derive(Args)]
pub struct NegotiateArgs {
    /// Items dealt to each seat at init
    #[arg(long, default_value = "3")]
    pub items_per_agent: usize,

    /// Hard round cap before forced termination
    #[arg(long, default_value = "10")]
    pub max_rounds: u32,

    /// Hide the opponent's inventory from observations
    #[arg(long)]
    pub hidden: bool,

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

/// Run negotiate command
pub fn run(args: NegotiateArgs) -> Result<()> {
    let mut task = NegotiationTask::new(args.items_per_agent, args.max_rounds);
    if args.hidden {
        task = task.with_hidden_inventory();
    }

    tracing::info!(
        items_per_agent = args.items_per_agent,
        max_rounds = args.max_rounds,
        hidden = args.hidden,
        matches = args.series,
        "starting negotiation"
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
