//! Parley CLI - run matches from the command line
//!
//! Commands:
//! - trivia: run a trivia duel between two scripted agents
//! - negotiate: run a negotiation game between two scripted agents

use clap::{Parser, Subcommand};

mod logging;
mod negotiate_cmd;
mod report;
mod roster;
mod trivia_cmd;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Turn-based match engine for language-model agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a trivia duel
    Trivia(trivia_cmd::TriviaArgs),
    /// Run a negotiation game
    Negotiate(negotiate_cmd::NegotiateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Trivia(args) => trivia_cmd::run(args),
        Commands::Negotiate(args) => negotiate_cmd::run(args),
    }
}
