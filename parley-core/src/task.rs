//! Task protocol - the contract every game variant satisfies

use crate::seat::{Seat, SeatPair};
use serde::Serialize;
use std::fmt::Debug;

/// Common fields every task state exposes to the match engine
pub trait TaskState {
    /// Current round; monotonically non-decreasing within a match
    fn round(&self) -> u32;

    /// True exactly once the task has terminated; irreversible
    fn is_done(&self) -> bool;
}

/// Per-seat result of a finished (or in-flight) match
pub trait Score: Clone + Debug + Serialize {
    /// Single number used to compare the two sides of the table
    fn headline(&self) -> f64;
}

impl Score for u32 {
    fn headline(&self) -> f64 {
        f64::from(*self)
    }
}

/// Turn-based game contract consumed by the match engine.
///
/// State is created once by `init`, advanced only by `step` (passed in by
/// value, next state returned), and read everywhere else. No method
/// performs I/O.
pub trait Task {
    /// Full game state for this variant
    type State: TaskState + Clone + Debug + Serialize;

    /// Per-seat scoring record
    type Score: Score;

    /// Short name used in reports and log filenames
    fn name(&self) -> &str;

    /// Create the starting state. Deterministic given `seed`: the same
    /// seed produces an identical state, including any randomized
    /// item or question selection. `round` is 0 and the state is not done.
    fn init(&self, seed: u64) -> Self::State;

    /// Prompt text for one seat this round, honoring any seat-specific
    /// information hiding. Must not mutate state.
    fn observe(&self, state: &Self::State, seat: Seat) -> String;

    /// Advance one round given one action per seat. Must set the done
    /// flag once the variant's termination condition is met, and must be
    /// defined for partial or malformed action text.
    fn step(&self, state: Self::State, actions: &SeatPair<String>) -> Self::State;

    /// Score any state; pure read, terminal or not
    fn score(&self, state: &Self::State) -> SeatPair<Self::Score>;

    /// Human-readable summary for auditing
    fn render(&self, state: &Self::State) -> String {
        format!("{:?}", state)
    }
}
