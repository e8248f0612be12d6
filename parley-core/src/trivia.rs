//! Trivia duel - independent scored rounds
//!
//! Each round asks both seats the same question; a trimmed,
//! case-insensitive exact match earns one point. No retries, no partial
//! credit, ties reported as-is.

use crate::seat::{Seat, SeatPair};
use crate::task::{Task, TaskState};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One question/answer pair
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

impl Question {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Trivia duel task
#[derive(Clone, Debug)]
pub struct TriviaTask {
    questions: Vec<Question>,
}

impl TriviaTask {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Load questions from a JSON array file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read questions file: {}", path.display()))?;
        let questions: Vec<Question> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse questions file: {}", path.display()))?;
        Ok(Self::new(questions))
    }

    /// Built-in sample question set
    pub fn sample() -> Self {
        Self::new(vec![
            Question::new("What is 2+2?", "4"),
            Question::new("What is the capital of France?", "Paris"),
            Question::new("Who wrote Romeo and Juliet?", "Shakespeare"),
        ])
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// Trivia match state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriviaState {
    pub round: u32,
    pub done: bool,
    pub scores: SeatPair<u32>,
}

impl TaskState for TriviaState {
    fn round(&self) -> u32 {
        self.round
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

impl Task for TriviaTask {
    type State = TriviaState;
    type Score = u32;

    fn name(&self) -> &str {
        "trivia"
    }

    fn init(&self, _seed: u64) -> TriviaState {
        // Question order is the constructor's order; nothing is drawn
        // from the seed.
        TriviaState {
            round: 0,
            done: false,
            scores: SeatPair::default(),
        }
    }

    fn observe(&self, state: &TriviaState, seat: Seat) -> String {
        let question = &self.questions[state.round as usize].question;

        let mut obs = format!(
            "=== TRIVIA ROUND {} / {} ===\n\n",
            state.round + 1,
            self.questions.len()
        );
        obs.push_str(&format!(
            "Current score - You: {} | Opponent: {}\n\n",
            state.scores[seat],
            state.scores[seat.opponent()]
        ));
        obs.push_str(&format!("Question: {question}\n\n"));
        obs.push_str("Your answer:");
        obs
    }

    fn step(&self, mut state: TriviaState, actions: &SeatPair<String>) -> TriviaState {
        let correct = self.questions[state.round as usize].answer.trim().to_lowercase();

        for (seat, action) in actions.iter() {
            if action.trim().to_lowercase() == correct {
                state.scores[seat] += 1;
            }
        }

        state.round += 1;
        if state.round as usize >= self.questions.len() {
            state.done = true;
        }
        state
    }

    fn score(&self, state: &TriviaState) -> SeatPair<u32> {
        state.scores.clone()
    }

    fn render(&self, state: &TriviaState) -> String {
        let mut out = format!(
            "=== Trivia Duel - Round {} / {} ===\n\n",
            state.round,
            self.questions.len()
        );
        for (seat, score) in state.scores.iter() {
            out.push_str(&format!("Seat {seat} score: {score}\n"));
        }

        if state.done {
            let first = state.scores[Seat::First];
            let second = state.scores[Seat::Second];
            if first > second {
                out.push_str("\nWinner: seat 0\n");
            } else if second > first {
                out.push_str("\nWinner: seat 1\n");
            } else {
                out.push_str("\nResult: TIE\n");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_question_task() -> TriviaTask {
        TriviaTask::new(vec![
            Question::new("What is 2+2?", "4"),
            Question::new("Capital of France?", "Paris"),
        ])
    }

    fn answers(first: &str, second: &str) -> SeatPair<String> {
        SeatPair::new(first.to_string(), second.to_string())
    }

    #[test]
    fn test_init() {
        let task = two_question_task();
        let state = task.init(42);
        assert_eq!(state.round, 0);
        assert!(!state.done);
        assert_eq!(state.scores, SeatPair::new(0, 0));
    }

    #[test]
    fn test_observe_contains_question_and_score() {
        let task = two_question_task();
        let state = task.init(42);
        let obs = task.observe(&state, Seat::First);
        assert!(obs.contains("What is 2+2?"));
        assert!(obs.contains("You: 0 | Opponent: 0"));
        assert!(obs.contains("ROUND 1 / 2"));
    }

    #[test]
    fn test_exact_match_scores_one_point() {
        let task = two_question_task();
        let state = task.init(42);
        let state = task.step(state, &answers("4", "5"));
        assert_eq!(state.scores[Seat::First], 1);
        assert_eq!(state.scores[Seat::Second], 0);
        assert_eq!(state.round, 1);
        assert!(!state.done);
    }

    #[test]
    fn test_match_is_trimmed_and_case_insensitive() {
        let task = two_question_task();
        let mut state = task.init(42);
        state = task.step(state, &answers("  4  ", "4!"));
        assert_eq!(state.scores[Seat::First], 1);
        assert_eq!(state.scores[Seat::Second], 0);

        state = task.step(state, &answers("PARIS", "paris is nice"));
        assert_eq!(state.scores[Seat::First], 2);
        assert_eq!(state.scores[Seat::Second], 0);
    }

    #[test]
    fn test_done_exactly_at_last_question() {
        let task = two_question_task();
        let state = task.init(42);
        let state = task.step(state, &answers("4", "5"));
        assert!(!state.done);
        let state = task.step(state, &answers("Paris", "London"));
        assert!(state.done);
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let task = two_question_task();
        let mut state = task.init(42);
        state = task.step(state, &answers("4", "5"));
        state = task.step(state, &answers("Paris", "London"));

        assert!(state.done);
        let scores = task.score(&state);
        assert_eq!(scores[Seat::First], 2);
        assert_eq!(scores[Seat::Second], 0);
    }

    #[test]
    fn test_render_reports_winner() {
        let task = two_question_task();
        let mut state = task.init(42);
        state = task.step(state, &answers("4", "5"));
        state = task.step(state, &answers("Paris", "London"));

        let rendered = task.render(&state);
        assert!(rendered.contains("Winner: seat 0"));
    }

    #[test]
    fn test_render_reports_tie() {
        let task = two_question_task();
        let mut state = task.init(42);
        state = task.step(state, &answers("4", "4"));
        state = task.step(state, &answers("Paris", "Paris"));

        let rendered = task.render(&state);
        assert!(rendered.contains("Result: TIE"));
    }
}
