//! Series play - several matches between the same roster
//!
//! Strictly sequential: each match owns its own state and its own
//! agents, so nothing leaks between runs. Seeds derive from the base
//! seed by match index, keeping the whole series reproducible.

use crate::engine::{run_match, MatchError, MatchOptions, MatchReport};
use parley_core::{Agent, Score, Seat, SeatPair, Task};

/// Options for a series of matches
#[derive(Clone, Debug)]
pub struct SeriesOptions {
    /// Number of matches to play
    pub matches: usize,
    /// Seed for the first match; match `i` uses `base_seed + i`
    pub base_seed: u64,
    pub match_options: MatchOptions,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            matches: 1,
            base_seed: 42,
            match_options: MatchOptions::default(),
        }
    }
}

/// Aggregated outcome of a series
#[derive(Debug)]
pub struct SeriesResult<St, Sc> {
    /// Matches won per seat, by headline score
    pub wins: SeatPair<u32>,
    /// Matches with equal headline scores
    pub draws: u32,
    /// Average rounds per match
    pub avg_rounds: f32,
    /// Every match report, in play order
    pub reports: Vec<MatchReport<St, Sc>>,
}

impl<St, Sc> SeriesResult<St, Sc> {
    pub fn matches_played(&self) -> usize {
        self.reports.len()
    }

    pub fn win_rate(&self, seat: Seat) -> f32 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.wins[seat] as f32 / self.reports.len() as f32
        }
    }
}

/// Play `matches` sequential matches, building a fresh roster per match.
///
/// `roster` is called once per match so agents carry no state across
/// runs; the first match error aborts the series.
pub fn play_series<T, F>(
    task: &T,
    mut roster: F,
    options: &SeriesOptions,
) -> Result<SeriesResult<T::State, T::Score>, MatchError>
where
    T: Task,
    F: FnMut() -> Vec<Box<dyn Agent>>,
{
    let mut reports = Vec::with_capacity(options.matches);
    let mut wins = SeatPair::new(0u32, 0u32);
    let mut draws = 0u32;
    let mut total_rounds = 0u32;

    for index in 0..options.matches {
        let seed = options.base_seed.wrapping_add(index as u64);
        let mut agents = roster();
        let report = run_match(task, &mut agents, seed, &options.match_options)?;

        tracing::info!(index, seed, rounds = report.rounds, "series match finished");

        total_rounds += report.rounds;
        match winner(&report.scores) {
            Some(seat) => wins[seat] += 1,
            None => draws += 1,
        }
        reports.push(report);
    }

    let avg_rounds = if reports.is_empty() {
        0.0
    } else {
        total_rounds as f32 / reports.len() as f32
    };

    Ok(SeriesResult {
        wins,
        draws,
        avg_rounds,
        reports,
    })
}

/// Seat with the higher headline score, or None on a tie
fn winner<Sc: Score>(scores: &SeatPair<Sc>) -> Option<Seat> {
    let first = scores[Seat::First].headline();
    let second = scores[Seat::Second].headline();
    if first > second {
        Some(Seat::First)
    } else if second > first {
        Some(Seat::Second)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{Question, ScriptedAgent, TriviaTask};

    fn trivia_task() -> TriviaTask {
        TriviaTask::new(vec![
            Question::new("What is 2+2?", "4"),
            Question::new("Capital of France?", "Paris"),
        ])
    }

    fn roster_with(first: &'static [&'static str], second: &'static [&'static str]) -> impl FnMut() -> Vec<Box<dyn Agent>> {
        move || {
            vec![
                Box::new(ScriptedAgent::new(
                    "first",
                    first.iter().map(|r| r.to_string()).collect(),
                )) as Box<dyn Agent>,
                Box::new(ScriptedAgent::new(
                    "second",
                    second.iter().map(|r| r.to_string()).collect(),
                )),
            ]
        }
    }

    #[test]
    fn test_series_counts_wins() {
        let task = trivia_task();
        let options = SeriesOptions {
            matches: 3,
            ..Default::default()
        };

        let result =
            play_series(&task, roster_with(&["4", "Paris"], &["5", "London"]), &options).unwrap();

        assert_eq!(result.matches_played(), 3);
        assert_eq!(result.wins[Seat::First], 3);
        assert_eq!(result.wins[Seat::Second], 0);
        assert_eq!(result.draws, 0);
        assert_eq!(result.avg_rounds, 2.0);
        assert_eq!(result.win_rate(Seat::First), 1.0);
    }

    #[test]
    fn test_series_counts_draws() {
        let task = trivia_task();
        let options = SeriesOptions {
            matches: 2,
            ..Default::default()
        };

        let result =
            play_series(&task, roster_with(&["4", "Paris"], &["4", "Paris"]), &options).unwrap();

        assert_eq!(result.draws, 2);
        assert_eq!(result.wins, SeatPair::new(0, 0));
    }

    #[test]
    fn test_series_derives_seeds_from_base() {
        let task = trivia_task();
        let options = SeriesOptions {
            matches: 3,
            base_seed: 100,
            ..Default::default()
        };

        let result =
            play_series(&task, roster_with(&["4", "Paris"], &["5", "London"]), &options).unwrap();

        let seeds: Vec<u64> = result.reports.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102]);
    }

    #[test]
    fn test_empty_series() {
        let task = trivia_task();
        let options = SeriesOptions {
            matches: 0,
            ..Default::default()
        };

        let result =
            play_series(&task, roster_with(&["4"], &["5"]), &options).unwrap();

        assert_eq!(result.matches_played(), 0);
        assert_eq!(result.avg_rounds, 0.0);
        assert_eq!(result.win_rate(Seat::First), 0.0);
    }
}
