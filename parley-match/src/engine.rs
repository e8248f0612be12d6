//! Match engine - drives one task and two agents to completion
//!
//! Within a round, every agent is invoked one at a time in seat order;
//! each invocation may block. In-game text never fails the match; only
//! boundary violations (roster size, agent failure, a task that never
//! terminates) do, as typed errors.

use chrono::{DateTime, Utc};
use parley_core::{Agent, Seat, SeatPair, Task, TaskState};
use serde::Serialize;

// ============================================================================
// TYPES
// ============================================================================

/// Engine-boundary failures
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("roster must contain exactly {expected} agents, got {actual}")]
    Roster { expected: usize, actual: usize },

    #[error("agent '{name}' failed to act in round {round}")]
    Agent {
        name: String,
        round: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("task '{task}' did not terminate within {limit} rounds")]
    Stalled { task: String, limit: u32 },
}

/// One observation/action exchange
#[derive(Clone, Debug, Serialize)]
pub struct TranscriptEntry {
    pub round: u32,
    pub seat: Seat,
    pub observation: String,
    pub action: String,
}

/// Engine options
#[derive(Clone, Debug)]
pub struct MatchOptions {
    /// Hard cap on engine rounds. A task still running past it is
    /// treated as stalled rather than looping forever.
    pub round_limit: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { round_limit: 1000 }
    }
}

/// Everything one finished match produced. Serializable so the external
/// logging collaborator can persist it; the engine itself performs no I/O.
#[derive(Clone, Debug, Serialize)]
pub struct MatchReport<St, Sc> {
    pub task: String,
    pub agents: SeatPair<String>,
    pub models: SeatPair<Option<String>>,
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub rounds: u32,
    pub scores: SeatPair<Sc>,
    pub transcript: Vec<TranscriptEntry>,
    pub final_state: St,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Drive `task` to completion with a two-agent roster.
///
/// The state is owned by this match alone and is mutated only through
/// `Task::step`; the transcript records one entry per agent action per
/// round.
pub fn run_match<T: Task>(
    task: &T,
    agents: &mut [Box<dyn Agent>],
    seed: u64,
    options: &MatchOptions,
) -> Result<MatchReport<T::State, T::Score>, MatchError> {
    if agents.len() != 2 {
        return Err(MatchError::Roster {
            expected: 2,
            actual: agents.len(),
        });
    }

    let started_at = Utc::now();
    let agent_names = SeatPair::new(
        agents[0].name().to_string(),
        agents[1].name().to_string(),
    );
    let agent_models = SeatPair::new(
        agents[0].model().map(str::to_string),
        agents[1].model().map(str::to_string),
    );

    tracing::info!(
        task = task.name(),
        first = %agent_names[Seat::First],
        second = %agent_names[Seat::Second],
        seed,
        "starting match"
    );

    let mut state = task.init(seed);
    let mut transcript = Vec::new();
    let mut engine_rounds = 0u32;

    while !state.is_done() {
        if engine_rounds >= options.round_limit {
            return Err(MatchError::Stalled {
                task: task.name().to_string(),
                limit: options.round_limit,
            });
        }

        let round = state.round();
        let mut actions = SeatPair::new(String::new(), String::new());

        for seat in Seat::BOTH {
            let observation = task.observe(&state, seat);
            let name = agents[seat.index()].name().to_string();
            let action = agents[seat.index()]
                .act(&observation)
                .map_err(|source| MatchError::Agent { name, round, source })?;

            transcript.push(TranscriptEntry {
                round,
                seat,
                observation,
                action: action.clone(),
            });
            actions[seat] = action;
        }

        state = task.step(state, &actions);
        engine_rounds += 1;
        tracing::debug!(round, done = state.is_done(), "round complete");
    }

    let scores = task.score(&state);

    tracing::info!(task = task.name(), rounds = state.round(), "match finished");

    Ok(MatchReport {
        task: task.name().to_string(),
        agents: agent_names,
        models: agent_models,
        seed,
        started_at,
        rounds: state.round(),
        scores,
        transcript,
        final_state: state,
    })
}

// ============================================================================
// TESTS
// ============================================================================
