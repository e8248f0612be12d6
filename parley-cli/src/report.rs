//! Result reporting - text and JSON output for matches and series

use anyhow::Result;
use parley_core::Seat;
use parley_match::{MatchReport, SeriesResult};
use serde::Serialize;
use std::fmt::Debug;

/// Print one match report to stdout
pub fn report_match<St, Sc>(report: &MatchReport<St, Sc>, json: bool) -> Result<()>
where
    St: Serialize + Debug,
    Sc: Serialize + Debug,
{
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "\n=== Match: {} ({} vs {}) ===",
        report.task,
        report.agents[Seat::First],
        report.agents[Seat::Second]
    );
    println!("Seed:    {}", report.seed);
    println!("Rounds:  {}", report.rounds);
    println!(
        "Scores:  {:?} vs {:?}",
        report.scores[Seat::First],
        report.scores[Seat::Second]
    );
    Ok(())
}

/// Print the aggregate line for a finished series
pub fn report_series<St, Sc>(result: &SeriesResult<St, Sc>) {
    let total = result.matches_played();

    println!("\n=== Series Results ===");
    println!("Matches:     {total}");
    println!(
        "Seat 0 wins: {} ({:.1}%)",
        result.wins[Seat::First],
        result.win_rate(Seat::First) * 100.0
    );
    println!(
        "Seat 1 wins: {} ({:.1}%)",
        result.wins[Seat::Second],
        result.win_rate(Seat::Second) * 100.0
    );
    println!("Draws:       {}", result.draws);
    println!("Avg rounds:  {:.1}", result.avg_rounds);
}
