//! Proposal extraction from free negotiation text
//!
//! Best-effort parsing against a bounded grammar: "give X for [your] Y",
//! with item lists split on commas or the word "and". Kept free of any
//! state access so it can be fuzzed independently. Parsing failure is
//! never an error at this layer; callers treat it as ordinary
//! conversation.

use regex::Regex;
use std::sync::OnceLock;

/// Structured offer extracted from a proposal message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedOffer {
    /// Items the speaker offers to hand over
    pub gives: Vec<String>,
    /// Items the speaker asks for in return
    pub gets: Vec<String>,
}

fn offer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Item lists stop at sentence or line ends; "your" before the
        // second list is optional.
        Regex::new(r"(?i)\bgive\s+([^.\n]+?)\s+for\s+(?:your\s+)?([^.\n]+)")
            .expect("offer pattern compiles")
    })
}

/// Extract a structured offer from free text, if one is present
pub fn parse_proposal(text: &str) -> Option<ParsedOffer> {
    let caps = offer_regex().captures(text)?;
    let gives = split_items(caps.get(1)?.as_str());
    let gets = split_items(caps.get(2)?.as_str());

    if gives.is_empty() || gets.is_empty() {
        return None;
    }
    Some(ParsedOffer { gives, gets })
}

/// Split an item list on commas or the word "and", title-casing each entry
fn split_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .flat_map(|part| part.split(" and "))
        .map(|part| part.trim().trim_end_matches(['.', '!', '?']))
        .filter(|part| !part.is_empty())
        .map(title_case)
        .collect()
}

/// Capitalize the first letter of each word, lowercasing the rest
fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(head) => head.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
