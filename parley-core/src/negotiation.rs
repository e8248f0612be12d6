//! Negotiation game - free-text bargaining over private valuations
//!
//! Two seats hold seeded inventories and negotiate in free text. The
//! protocol recognizes PROPOSE and ACCEPT tokens; an accepted proposal
//! settles by best-effort item movement. Malformed in-game text never
//! raises: it simply stays ordinary conversation.

use crate::proposal::parse_proposal;
use crate::seat::{Seat, SeatPair};
use crate::task::{Score, Task, TaskState};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default item pool drawn from at init
const ITEM_POOL: [&str; 15] = [
    "Apple", "Banana", "Orange", "Grape", "Mango",
    "Carrot", "Broccoli", "Corn", "Potato", "Tomato",
    "Bread", "Cheese", "Milk", "Eggs", "Butter",
];

/// Per-item valuation bounds, inclusive
const MIN_VALUE: u32 = 3;
const MAX_VALUE: u32 = 10;

// ============================================================================
// STATE TYPES
// ============================================================================

/// One conversation entry; the conversation is append-only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub round: u32,
    pub seat: Seat,
    pub text: String,
}

/// A pending or settled trade offer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: Seat,
    /// Items the proposer hands over at settlement
    pub gives: Vec<String>,
    /// Items the proposer receives at settlement
    pub gets: Vec<String>,
}

/// Negotiation match state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiationState {
    pub round: u32,
    pub done: bool,
    /// Items currently held, per seat; trade only moves items between
    /// the two sides, so the total count is invariant
    pub inventories: SeatPair<Vec<String>>,
    /// Snapshot taken at init, read only for scoring deltas
    pub initial_inventories: SeatPair<Vec<String>>,
    /// Per-seat price of every drawn item, fixed for the match
    pub valuations: SeatPair<FxHashMap<String, u32>>,
    pub conversation: Vec<Message>,
    /// At most one pending offer; replaced whole, never merged
    pub current_proposal: Option<Proposal>,
    pub deal_completed: bool,
    /// The proposal executed at settlement, if a deal closed
    pub final_trade: Option<Proposal>,
}

impl TaskState for NegotiationState {
    fn round(&self) -> u32 {
        self.round
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// Per-seat utility outcome
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiationScore {
    pub initial_value: u32,
    pub final_value: u32,
    pub gain: i64,
    pub deal_completed: bool,
}

impl Score for NegotiationScore {
    fn headline(&self) -> f64 {
        self.gain as f64
    }
}

// ============================================================================
// TASK
// ============================================================================

/// Negotiation task configuration
#[derive(Clone, Debug)]
pub struct NegotiationTask {
    items_per_agent: usize,
    max_rounds: u32,
    hidden_inventory: bool,
    item_pool: Vec<String>,
}

impl Default for NegotiationTask {
    fn default() -> Self {
        Self {
            items_per_agent: 3,
            max_rounds: 10,
            hidden_inventory: false,
            item_pool: ITEM_POOL.iter().map(|item| item.to_string()).collect(),
        }
    }
}

impl NegotiationTask {
    pub fn new(items_per_agent: usize, max_rounds: u32) -> Self {
        Self {
            items_per_agent,
            max_rounds,
            ..Default::default()
        }
    }

    /// Omit the opponent's items and values from observations, so they
    /// must be learned through conversation
    pub fn with_hidden_inventory(mut self) -> Self {
        self.hidden_inventory = true;
        self
    }

    /// Replace the default item pool
    pub fn with_item_pool(mut self, item_pool: Vec<String>) -> Self {
        self.item_pool = item_pool;
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }
}

impl Task for NegotiationTask {
    type State = NegotiationState;
    type Score = NegotiationScore;

    fn name(&self) -> &str {
        "negotiation"
    }

    fn init(&self, seed: u64) -> NegotiationState {
        assert!(
            self.items_per_agent * 2 <= self.item_pool.len(),
            "item pool too small: need {}, have {}",
            self.items_per_agent * 2,
            self.item_pool.len()
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // Draw 2 x items_per_agent distinct items, split evenly
        let mut drawn = self.item_pool.clone();
        drawn.shuffle(&mut rng);
        drawn.truncate(self.items_per_agent * 2);

        let inventories = SeatPair::new(
            drawn[..self.items_per_agent].to_vec(),
            drawn[self.items_per_agent..].to_vec(),
        );

        // Every drawn item gets a price from each seat's perspective, so
        // both own items and the opponent's can be valued
        let valuations = SeatPair::from_fn(|_| {
            drawn
                .iter()
                .map(|item| (item.clone(), rng.gen_range(MIN_VALUE..=MAX_VALUE)))
                .collect::<FxHashMap<_, _>>()
        });

        NegotiationState {
            round: 0,
            done: false,
            initial_inventories: inventories.clone(),
            inventories,
            valuations,
            conversation: Vec::new(),
            current_proposal: None,
            deal_completed: false,
            final_trade: None,
        }
    }

    fn observe(&self, state: &NegotiationState, seat: Seat) -> String {
        let opponent = seat.opponent();
        let mine = &state.inventories[seat];
        let theirs = &state.inventories[opponent];
        let values = &state.valuations[seat];

        let mut obs = format!(
            "=== NEGOTIATION ROUND {} / {} ===\n\n",
            state.round, self.max_rounds
        );
        obs.push_str("You are a trader negotiating with another party.\n\n");

        obs.push_str("YOUR INVENTORY:\n");
        for item in mine {
            obs.push_str(&format!("- {}: worth ${} to you\n", item, item_value(values, item)));
        }
        obs.push_str(&format!("Total value: ${}\n\n", inventory_value(mine, values)));

        if self.hidden_inventory {
            obs.push_str("OPPONENT'S INVENTORY: Unknown (discover through conversation)\n\n");
        } else {
            obs.push_str("OPPONENT'S INVENTORY:\n");
            for item in theirs {
                obs.push_str(&format!(
                    "- {}: worth ${} to you (they value it differently)\n",
                    item,
                    item_value(values, item)
                ));
            }
            obs.push_str(&format!(
                "Potential value: ${}\n\n",
                inventory_value(theirs, values)
            ));
        }

        if state.conversation.is_empty() {
            obs.push_str("No messages yet. Start the negotiation.\n\n");
        } else {
            obs.push_str("CONVERSATION SO FAR:\n");
            for msg in &state.conversation {
                let speaker = if msg.seat == seat { "You" } else { "Opponent" };
                obs.push_str(&format!("{}: {}\n", speaker, msg.text));
            }
            obs.push('\n');
        }

        obs.push_str("INSTRUCTIONS:\n");
        obs.push_str("1. Trade proposal: 'PROPOSE: I give [items] for your [items]'\n");
        obs.push_str("2. Accept their proposal: 'ACCEPT'\n");
        obs.push_str("3. Reject: 'REJECT'\n");
        obs.push_str("4. General message/question: Any other text\n");
        obs.push_str("\nYour response:");
        obs
    }

    fn step(&self, mut state: NegotiationState, actions: &SeatPair<String>) -> NegotiationState {
        // Record every message before interpreting any of them
        for (seat, text) in actions.iter() {
            state.conversation.push(Message {
                round: state.round,
                seat,
                text: text.clone(),
            });
        }

        // An acceptance against a pending proposal ends the match now;
        // with nothing pending it stays ordinary conversation
        if let Some(accepter) = find_acceptance(actions) {
            if let Some(proposal) = state.current_proposal.clone() {
                execute_trade(&mut state.inventories, &proposal, accepter);
                state.final_trade = Some(proposal);
                state.deal_completed = true;
                state.done = true;
                return state;
            }
        }

        // Parse proposals in seat order; the later seat wins when both
        // propose, replacing (never merging) the pending offer
        for (seat, text) in actions.iter() {
            if contains_token(text, "PROPOSE") {
                if let Some(offer) = parse_proposal(text) {
                    state.current_proposal = Some(Proposal {
                        proposer: seat,
                        gives: offer.gives,
                        gets: offer.gets,
                    });
                }
            }
        }

        state.round += 1;
        if state.round >= self.max_rounds {
            state.done = true;
        }
        state
    }

    fn score(&self, state: &NegotiationState) -> SeatPair<NegotiationScore> {
        SeatPair::from_fn(|seat| {
            let values = &state.valuations[seat];
            let initial_value = inventory_value(&state.initial_inventories[seat], values);
            let final_value = inventory_value(&state.inventories[seat], values);
            NegotiationScore {
                initial_value,
                final_value,
                gain: i64::from(final_value) - i64::from(initial_value),
                deal_completed: state.deal_completed,
            }
        })
    }

    fn render(&self, state: &NegotiationState) -> String {
        let mut out = String::new();
        for (seat, inventory) in state.inventories.iter() {
            out.push_str(&format!(
                "Seat {}: holds [{}], deal completed: {}\n",
                seat,
                inventory.join(", "),
                state.deal_completed
            ));
        }
        out.push_str("Conversation:\n");
        for msg in &state.conversation {
            out.push_str(&format!(
                "  [round {}] seat {}: {}\n",
                msg.round, msg.seat, msg.text
            ));
        }
        out
    }
}

// ============================================================================
// STEP HELPERS
// ============================================================================

/// First seat (in seat order) whose action contains the ACCEPT token
fn find_acceptance(actions: &SeatPair<String>) -> Option<Seat> {
    actions
        .iter()
        .find(|(_, text)| contains_token(text, "ACCEPT"))
        .map(|(seat, _)| seat)
}

/// Case-insensitive literal token search
fn contains_token(text: &str, token: &str) -> bool {
    text.to_uppercase().contains(token)
}

/// Apply an accepted proposal to the inventories.
///
/// Possession is checked here, at acceptance time, not when the proposal
/// was parsed: a stale offer naming items traded away in the interim
/// settles partially, skipping whatever the expected side no longer
/// holds. Every move pairs a removal with an insertion, so the total
/// item count is conserved.
fn execute_trade(inventories: &mut SeatPair<Vec<String>>, proposal: &Proposal, accepter: Seat) {
    for item in &proposal.gives {
        move_item(inventories, proposal.proposer, accepter, item);
    }
    for item in &proposal.gets {
        move_item(inventories, accepter, proposal.proposer, item);
    }
}

/// Move one item between seats if the source currently holds it
fn move_item(inventories: &mut SeatPair<Vec<String>>, from: Seat, to: Seat, item: &str) {
    let source = &mut inventories[from];
    if let Some(pos) = source.iter().position(|held| held == item) {
        let item = source.remove(pos);
        inventories[to].push(item);
    }
}

/// Sum one seat's valuations over a list of items
fn inventory_value(items: &[String], values: &FxHashMap<String, u32>) -> u32 {
    items.iter().map(|item| item_value(values, item)).sum()
}

fn item_value(values: &FxHashMap<String, u32>, item: &str) -> u32 {
    values.get(item).copied().unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn actions(first: &str, second: &str) -> SeatPair<String> {
        SeatPair::new(first.to_string(), second.to_string())
    }

    /// Multiset of all held items, for conservation checks
    fn all_items(state: &NegotiationState) -> Vec<String> {
        let mut items: Vec<String> = state
            .inventories
            .iter()
            .flat_map(|(_, inv)| inv.iter().cloned())
            .collect();
        items.sort();
        items
    }

    #[test]
    fn test_init_draws_distinct_items() {
        let task = NegotiationTask::new(3, 10);
        let state = task.init(42);

        assert_eq!(state.round, 0);
        assert!(!state.done);
        assert_eq!(state.inventories[Seat::First].len(), 3);
        assert_eq!(state.inventories[Seat::Second].len(), 3);

        let distinct: BTreeSet<_> = all_items(&state).into_iter().collect();
        assert_eq!(distinct.len(), 6, "drawn items must be distinct");
    }

    #[test]
    fn test_init_is_deterministic() {
        let task = NegotiationTask::new(3, 10);
        let a = task.init(7);
        let b = task.init(7);

        let a_json = serde_json::to_value(&a).unwrap();
        let b_json = serde_json::to_value(&b).unwrap();
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_init_valuations_cover_all_drawn_items() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(3);

        for (_, values) in state.valuations.iter() {
            for item in all_items(&state) {
                let value = values[&item];
                assert!((MIN_VALUE..=MAX_VALUE).contains(&value));
            }
        }
    }

    #[test]
    fn test_observe_shows_both_inventories() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let obs = task.observe(&state, Seat::First);

        assert!(obs.contains("YOUR INVENTORY:"));
        assert!(obs.contains("OPPONENT'S INVENTORY:"));
        assert!(obs.contains("No messages yet."));
        for item in &state.inventories[Seat::First] {
            assert!(obs.contains(item.as_str()));
        }
    }

    #[test]
    fn test_observe_hidden_inventory() {
        let task = NegotiationTask::new(2, 5).with_hidden_inventory();
        let state = task.init(1);
        let obs = task.observe(&state, Seat::First);

        assert!(obs.contains("Unknown (discover through conversation)"));
        for item in &state.inventories[Seat::Second] {
            assert!(!obs.contains(item.as_str()));
        }
    }

    #[test]
    fn test_observe_labels_conversation_per_seat() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(state, &actions("Hello there", "Hi back"));

        let obs = task.observe(&state, Seat::Second);
        assert!(obs.contains("Opponent: Hello there"));
        assert!(obs.contains("You: Hi back"));
    }

    #[test]
    fn test_step_appends_conversation() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(state, &actions("Hello", "Hi"));

        assert_eq!(state.conversation.len(), 2);
        assert_eq!(state.conversation[0].seat, Seat::First);
        assert_eq!(state.conversation[0].round, 0);
        assert_eq!(state.conversation[1].text, "Hi");
        assert_eq!(state.round, 1);
    }

    #[test]
    fn test_accept_without_proposal_is_conversation() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(state, &actions("ACCEPT", "Hello"));

        assert!(!state.done);
        assert!(!state.deal_completed);
        assert_eq!(state.conversation.len(), 2);
        assert_eq!(state.round, 1);
    }

    #[test]
    fn test_proposal_sets_current_proposal() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let give = state.inventories[Seat::First][0].clone();
        let get = state.inventories[Seat::Second][0].clone();

        let state = task.step(
            state,
            &actions(&format!("PROPOSE: I give {give} for your {get}"), "Hmm"),
        );

        let proposal = state.current_proposal.as_ref().unwrap();
        assert_eq!(proposal.proposer, Seat::First);
        assert_eq!(proposal.gives, vec![give]);
        assert_eq!(proposal.gets, vec![get]);
    }

    #[test]
    fn test_unparseable_propose_is_conversation() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(state, &actions("PROPOSE: best deal ever", "Ok?"));

        assert!(state.current_proposal.is_none());
        assert_eq!(state.conversation.len(), 2);
    }

    #[test]
    fn test_later_proposal_wins() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(
            state,
            &actions(
                "PROPOSE: I give Apple for your Carrot",
                "PROPOSE: I give Carrot for your Apple",
            ),
        );

        let proposal = state.current_proposal.as_ref().unwrap();
        assert_eq!(proposal.proposer, Seat::Second);
        assert_eq!(proposal.gives, vec!["Carrot".to_string()]);
    }

    #[test]
    fn test_accept_settles_pending_proposal() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let give = state.inventories[Seat::First][0].clone();
        let get = state.inventories[Seat::Second][0].clone();
        let before = all_items(&state);

        let state = task.step(
            state,
            &actions(&format!("PROPOSE: I give {give} for your {get}"), "Thinking..."),
        );
        let state = task.step(state, &actions("Waiting...", "ACCEPT"));

        assert!(state.done);
        assert!(state.deal_completed);
        assert!(state.inventories[Seat::Second].contains(&give));
        assert!(state.inventories[Seat::First].contains(&get));
        assert_eq!(state.final_trade.as_ref().unwrap().proposer, Seat::First);
        assert_eq!(all_items(&state), before, "trade must conserve items");
        // No round increment on the settling call
        assert_eq!(state.round, 1);
    }

    #[test]
    fn test_accept_is_case_insensitive_substring() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let give = state.inventories[Seat::First][0].clone();
        let get = state.inventories[Seat::Second][0].clone();

        let state = task.step(
            state,
            &actions(&format!("PROPOSE: I give {give} for your {get}"), "Hmm"),
        );
        let state = task.step(state, &actions("...", "Fine, I accept your offer."));

        assert!(state.deal_completed);
    }

    #[test]
    fn test_same_round_propose_then_accept_does_not_settle() {
        // The acceptance check runs against the proposal pending when the
        // round began, not one parsed from the same round's messages.
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(
            state,
            &actions("PROPOSE: I give Apple for your Carrot", "ACCEPT"),
        );

        assert!(!state.deal_completed);
        assert!(!state.done);
        assert!(state.current_proposal.is_some());
    }

    #[test]
    fn test_stale_proposal_settles_partially() {
        let task = NegotiationTask::new(2, 5);
        let mut state = task.init(1);

        // Pending proposal names an item the proposer does not hold
        state.current_proposal = Some(Proposal {
            proposer: Seat::First,
            gives: vec!["Unicorn".to_string(), state.inventories[Seat::First][0].clone()],
            gets: vec![state.inventories[Seat::Second][0].clone()],
        });
        let held = state.inventories[Seat::First][0].clone();
        let wanted = state.inventories[Seat::Second][0].clone();
        let before = all_items(&state);

        let state = task.step(state, &actions("ACCEPT", "ok"));

        assert!(state.deal_completed);
        assert!(state.inventories[Seat::Second].contains(&held));
        assert!(state.inventories[Seat::First].contains(&wanted));
        assert_eq!(all_items(&state), before, "missing items are skipped, not created");
    }

    #[test]
    fn test_round_cap_forces_done_without_deal() {
        let task = NegotiationTask::new(2, 3);
        let mut state = task.init(1);

        for round in 0..3 {
            assert!(!state.done, "not done before round {round} cap");
            state = task.step(state, &actions("blah", "blah"));
        }

        assert!(state.done);
        assert_eq!(state.round, 3);
        assert!(!state.deal_completed);
        assert!(state.final_trade.is_none());
    }

    #[test]
    fn test_conservation_across_arbitrary_steps() {
        let task = NegotiationTask::new(3, 10);
        let mut state = task.init(9);
        let before = all_items(&state);

        let scripts = [
            ("Hello!", "Hi!"),
            ("PROPOSE: I give junk for your stuff", "No thanks"),
            ("PROPOSE: I give Apple, Banana for your Carrot and Corn", "Hmm"),
            ("Waiting...", "ACCEPT"),
        ];
        for (first, second) in scripts {
            if state.done {
                break;
            }
            state = task.step(state, &actions(first, second));
        }

        assert_eq!(all_items(&state), before);
    }

    #[test]
    fn test_score_without_deal_is_zero_gain() {
        let task = NegotiationTask::new(2, 3);
        let mut state = task.init(5);
        for _ in 0..3 {
            state = task.step(state, &actions("blah", "blah"));
        }

        let scores = task.score(&state);
        for (_, score) in scores.iter() {
            assert_eq!(score.gain, 0);
            assert_eq!(score.initial_value, score.final_value);
            assert!(!score.deal_completed);
        }
    }

    #[test]
    fn test_score_reflects_settled_trade() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let give = state.inventories[Seat::First][0].clone();
        let get = state.inventories[Seat::Second][0].clone();

        let state = task.step(
            state,
            &actions(&format!("PROPOSE: I give {give} for your {get}"), "Hmm"),
        );
        let state = task.step(state, &actions("...", "ACCEPT"));

        let scores = task.score(&state);
        let first = &scores[Seat::First];
        let values = &state.valuations[Seat::First];
        let expected = i64::from(values[&get]) - i64::from(values[&give]);
        assert_eq!(first.gain, expected);
        assert!(first.deal_completed);
    }

    #[test]
    fn test_render_lists_inventories_and_conversation() {
        let task = NegotiationTask::new(2, 5);
        let state = task.init(1);
        let state = task.step(state, &actions("Hello", "Hi"));

        let rendered = task.render(&state);
        assert!(rendered.contains("Seat 0: holds ["));
        assert!(rendered.contains("deal completed: false"));
        assert!(rendered.contains("seat 0: Hello"));
        assert!(rendered.contains("seat 1: Hi"));
    }
}
