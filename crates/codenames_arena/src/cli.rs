//! Command-line interface for codenames_arena.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Codenames Arena - runs Codenames matches between agents
#[derive(Parser, Debug)]
#[command(name = "codenames_arena")]
#[command(about = "Runs Codenames matches between automated players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one match between offline heuristic agents and print its events
    Play {
        /// Path to arena config file (TOML). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Word list file, one word per line
        #[arg(short, long)]
        words: Option<PathBuf>,

        /// Seed for dealing the board
        #[arg(short, long)]
        seed: Option<u64>,
    },
}
