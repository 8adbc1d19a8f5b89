//! Codenames Arena - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use codenames_arena::{
    Agent, ArenaConfig, ChannelSink, EventSink, Orchestrator, PromptBuilder, Roster, SimpleAgent,
    StandardPrompts,
};
use codenames_rules::Game;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            words,
            seed,
        } => run_match(config, words, seed).await,
    }
}

/// Deals a board, plays it out with heuristic agents and prints each event as a JSON line.
#[instrument]
async fn run_match(
    config: Option<PathBuf>,
    words: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let config = match config {
        Some(path) => ArenaConfig::from_file(&path)?,
        None => ArenaConfig::default(),
    }
    .with_seed(seed)
    .with_words_path(words);

    let pool = config.word_pool().context("Failed to prepare word list")?;
    let seed = (*config.seed()).unwrap_or_else(rand::random);
    info!(seed, words = pool.len(), "Dealing board");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let game = Game::new_standard(&pool, &mut rng).context("Failed to deal board")?;

    let sampling = config.sampling();
    let roster = Roster::from_factory(*sampling.spymaster(), *sampling.operative(), |_, role| {
        Arc::new(SimpleAgent::new(role)) as Arc<dyn Agent>
    });

    let sink = Arc::new(ChannelSink::new(*config.event_buffer()));
    let mut events = sink.subscribe();
    let prompts: Arc<dyn PromptBuilder> = Arc::new(StandardPrompts);
    let mut orchestrator = Orchestrator::new(
        game,
        roster,
        sink.clone() as Arc<dyn EventSink>,
        prompts,
        *config.limits(),
    );

    let handle = tokio::spawn(async move { orchestrator.play().await });
    drop(sink);

    loop {
        match events.recv().await {
            Ok(event) => println!("{}", serde_json::to_string(&event)?),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event printer fell behind"),
            Err(RecvError::Closed) => break,
        }
    }

    let result = handle.await.context("Match task failed")?;
    info!(winner = ?result.winner, outcome = %result.outcome, turns = result.turns, "Finished");
    Ok(())
}
