//! Match log writer - one JSON record and one readable text file per match
//!
//! This is the persistence collaborator: the engine returns data, and
//! this module turns a finished report into
//! `{stamp}_{task}_{first}_vs_{second}.json` plus a `_readable.txt`
//! sibling in the log directory.

use anyhow::{Context, Result};
use parley_core::Seat;
use parley_match::MatchReport;
use serde::Serialize;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes finished-match artifacts into a log directory
pub struct MatchLogger {
    dir: PathBuf,
}

impl MatchLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write both artifacts, returning their paths
    pub fn write<St, Sc>(
        &self,
        report: &MatchReport<St, Sc>,
        rendered_state: &str,
    ) -> Result<(PathBuf, PathBuf)>
    where
        St: Serialize + Debug,
        Sc: Serialize + Debug,
    {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create log directory {}", self.dir.display()))?;

        let stamp = report.started_at.format("%Y%m%d_%H%M%S");
        let base = format!(
            "{}_{}_{}_vs_{}",
            stamp,
            report.task,
            sanitize(&report.agents[Seat::First]),
            sanitize(&report.agents[Seat::Second])
        );

        let json_path = self.dir.join(format!("{base}.json"));
        let json = serde_json::to_string_pretty(report)?;
        write_file(&json_path, &json)?;

        let text_path = self.dir.join(format!("{base}_readable.txt"));
        write_file(&text_path, &readable(report, rendered_state))?;

        Ok((json_path, text_path))
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Keep log filenames filesystem-safe
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Human-readable rendering of a full match record
fn readable<St, Sc>(report: &MatchReport<St, Sc>, rendered_state: &str) -> String
where
    St: Debug,
    Sc: Debug,
{
    let mut out = String::new();
    out.push_str(&format!("Match:   {}\n", report.task));
    out.push_str(&format!(
        "Agents:  {} vs {}\n",
        report.agents[Seat::First],
        report.agents[Seat::Second]
    ));
    if report.models.iter().any(|(_, model)| model.is_some()) {
        out.push_str(&format!(
            "Models:  {} vs {}\n",
            report.models[Seat::First].as_deref().unwrap_or("-"),
            report.models[Seat::Second].as_deref().unwrap_or("-")
        ));
    }
    out.push_str(&format!("Seed:    {}\n", report.seed));
    out.push_str(&format!("Started: {}\n", report.started_at.to_rfc3339()));
    out.push_str(&format!("Rounds:  {}\n", report.rounds));

    for entry in &report.transcript {
        out.push_str(&format!(
            "\n--- round {} | {} ---\n",
            entry.round,
            report.agents[entry.seat]
        ));
        out.push_str(&format!("OBSERVATION:\n{}\n", entry.observation));
        out.push_str(&format!("ACTION:\n{}\n", entry.action));
    }

    out.push_str("\nFINAL STATE:\n");
    out.push_str(rendered_state);
    out.push_str(&format!(
        "\nScores: {:?} vs {:?}\n",
        report.scores[Seat::First],
        report.scores[Seat::Second]
    ));
    out
}
