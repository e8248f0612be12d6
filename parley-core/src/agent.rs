//! Agent capability - observation text in, action text out

use anyhow::Result;

/// A match participant: maps an observation to an action.
///
/// Implementations may consult a remote model or be fully scripted. `act`
/// is synchronous and may block; a failure propagates as a generic error
/// unless the agent is wrapped in [`ErrorMarking`]. Agents must not share
/// mutable per-match fields across concurrently running matches.
pub trait Agent {
    fn name(&self) -> &str;

    /// Backing model identifier, if any; recorded in match reports
    fn model(&self) -> Option<&str> {
        None
    }

    fn act(&mut self, observation: &str) -> Result<String>;
}

/// Deterministic agent with canned replies, cycling by call count
pub struct ScriptedAgent {
    name: String,
    model: Option<String>,
    replies: Vec<String>,
    calls: usize,
}

impl ScriptedAgent {
    pub fn new(name: impl Into<String>, replies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
            replies,
            calls: 0,
        }
    }

    /// Record a backing model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn act(&mut self, _observation: &str) -> Result<String> {
        anyhow::ensure!(
            !self.replies.is_empty(),
            "scripted agent '{}' has no replies",
            self.name
        );
        let reply = self.replies[self.calls % self.replies.len()].clone();
        self.calls += 1;
        Ok(reply)
    }
}

/// Wrapper that converts an inner agent failure into a distinguishable
/// error-marked action string, so the turn loop keeps moving instead of
/// aborting the match. Retry policy, if any, belongs in a wrapper like
/// this one, never in the engine.
pub struct ErrorMarking<A> {
    inner: A,
}

impl<A: Agent> ErrorMarking<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

impl<A: Agent> Agent for ErrorMarking<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> Option<&str> {
        self.inner.model()
    }

    fn act(&mut self, observation: &str) -> Result<String> {
        Ok(match self.inner.act(observation) {
            Ok(action) => action,
            Err(err) => format!("[agent-error: {err}]"),
        })
    }
}
