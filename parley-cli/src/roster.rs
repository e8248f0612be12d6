//! Scripted roster construction from command-line reply lists

use parley_core::{Agent, ScriptedAgent};

/// One seat's scripted definition, parsed from the command line
pub struct SeatScript {
    pub name: String,
    pub model: Option<String>,
    pub replies: Vec<String>,
}

impl SeatScript {
    pub fn new(name: &str, model: Option<&str>, replies: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.map(str::to_string),
            replies: split_replies(replies),
        }
    }

    fn agent(&self) -> Box<dyn Agent> {
        let mut agent = ScriptedAgent::new(&self.name, self.replies.clone());
        if let Some(model) = &self.model {
            agent = agent.with_model(model);
        }
        Box::new(agent)
    }
}

/// Build the two-seat roster for one match
pub fn scripted_roster(first: &SeatScript, second: &SeatScript) -> Vec<Box<dyn Agent>> {
    vec![first.agent(), second.agent()]
}

/// Split a semicolon-separated reply list. Semicolons, not commas:
/// proposal replies legitimately contain commas.
pub fn split_replies(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
