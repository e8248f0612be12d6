//! Parley Core - Task protocol and game state machines
//!
//! This crate provides the core logic for parley matches:
//! - Seat identity and per-seat containers
//! - The Task contract every game variant implements
//! - The Agent capability and deterministic stand-ins
//! - Trivia duel (independent scored rounds)
//! - Negotiation game (free-text bargaining with proposal extraction)

pub mod seat;
pub mod task;
pub mod agent;
pub mod trivia;
pub mod proposal;
pub mod negotiation;

// Re-exports for convenient access
pub use seat::{Seat, SeatPair};
pub use task::{Score, Task, TaskState};
pub use agent::{Agent, ErrorMarking, ScriptedAgent};
pub use trivia::{Question, TriviaState, TriviaTask};
pub use proposal::{parse_proposal, ParsedOffer};
pub use negotiation::{
    Message, NegotiationScore, NegotiationState, NegotiationTask, Proposal,
};
