//! Match configuration loaded from TOML.

use crate::agent::SamplingParams;
use codenames_rules::{WordPool, WordPoolError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Words used when no list file is configured, one per line.
pub const DEFAULT_WORD_LIST: &str = include_str!("../words.txt");

/// Safety limits and retry budgets for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchLimits {
    /// Turns started before a tie-break is forced.
    #[serde(default = "default_max_turns")]
    max_turns: u32,

    /// Consecutive turns with unchanged counts before a tie-break.
    #[serde(default = "default_stall_turns")]
    stall_turns: u32,

    /// Spymaster calls per turn before the match is aborted.
    #[serde(default = "default_clue_attempts")]
    clue_attempts: u32,

    /// Operative calls per turn.
    #[serde(default = "default_guess_attempts")]
    guess_attempts: u32,

    /// Consecutive invalid answers after which feedback lists every hidden word.
    #[serde(default = "default_enrich_feedback_after")]
    enrich_feedback_after: u32,

    /// Consecutive invalid answers that force the turn to end.
    #[serde(default = "default_force_end_after")]
    force_end_after: u32,

    /// Highest clue number an agent may give.
    #[serde(default = "default_max_clue_number")]
    max_clue_number: i64,
}

fn default_max_turns() -> u32 {
    50
}

fn default_stall_turns() -> u32 {
    10
}

fn default_clue_attempts() -> u32 {
    3
}

fn default_guess_attempts() -> u32 {
    15
}

fn default_enrich_feedback_after() -> u32 {
    3
}

fn default_force_end_after() -> u32 {
    8
}

fn default_max_clue_number() -> i64 {
    4
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            stall_turns: default_stall_turns(),
            clue_attempts: default_clue_attempts(),
            guess_attempts: default_guess_attempts(),
            enrich_feedback_after: default_enrich_feedback_after(),
            force_end_after: default_force_end_after(),
            max_clue_number: default_max_clue_number(),
        }
    }
}

impl MatchLimits {
    /// Overrides the turn ceiling.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Overrides the stall threshold.
    pub fn with_stall_turns(mut self, stall_turns: u32) -> Self {
        self.stall_turns = stall_turns;
        self
    }

    /// Overrides how many consecutive invalid answers end a turn.
    pub fn with_force_end_after(mut self, force_end_after: u32) -> Self {
        self.force_end_after = force_end_after;
        self
    }

    /// Overrides the operative attempt budget.
    pub fn with_guess_attempts(mut self, guess_attempts: u32) -> Self {
        self.guess_attempts = guess_attempts;
        self
    }
}

/// Where board words come from.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct WordsConfig {
    /// Word list file, one word per line. `None` uses the built-in list.
    #[serde(default)]
    path: Option<PathBuf>,

    /// Fewest distinct words a list must hold.
    #[serde(default = "default_minimum_words")]
    minimum: usize,
}

fn default_minimum_words() -> usize {
    25
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            path: None,
            minimum: default_minimum_words(),
        }
    }
}

/// Sampling settings per role.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Spymaster settings.
    #[serde(default = "SamplingParams::spymaster")]
    spymaster: SamplingParams,

    /// Operative settings.
    #[serde(default = "SamplingParams::operative")]
    operative: SamplingParams,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            spymaster: SamplingParams::spymaster(),
            operative: SamplingParams::operative(),
        }
    }
}

/// Everything needed to set up and run a match.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// RNG seed for dealing the board. `None` draws one from the OS.
    #[serde(default)]
    seed: Option<u64>,

    /// Word source.
    #[serde(default)]
    words: WordsConfig,

    /// Match limits.
    #[serde(default)]
    limits: MatchLimits,

    /// Agent sampling settings.
    #[serde(default)]
    sampling: SamplingConfig,

    /// Events buffered per subscriber before the oldest are dropped.
    #[serde(default = "default_event_buffer")]
    event_buffer: usize,
}

fn default_event_buffer() -> usize {
    256
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: None,
            words: WordsConfig::default(),
            limits: MatchLimits::default(),
            sampling: SamplingConfig::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(seed = ?config.seed, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the seed, e.g. from a command-line flag.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Replaces the word list path, e.g. from a command-line flag.
    pub fn with_words_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.words.path = path;
        }
        self
    }

    /// Loads the configured word list, or the built-in one, and checks its size.
    #[instrument(skip(self))]
    pub fn word_pool(&self) -> Result<WordPool, WordPoolError> {
        let pool = match &self.words.path {
            Some(path) => WordPool::load(path)?,
            None => WordPool::from_words(DEFAULT_WORD_LIST.lines()),
        };
        pool.ensure_minimum(self.words.minimum)?;
        debug!(words = pool.len(), "Word pool ready");
        Ok(pool)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.clue_attempts == 0 || limits.guess_attempts == 0 {
            return Err(ConfigError::new("Attempt budgets must be at least 1".to_string()));
        }
        for (name, value) in [
            ("max_turns", limits.max_turns),
            ("stall_turns", limits.stall_turns),
            ("enrich_feedback_after", limits.enrich_feedback_after),
            ("force_end_after", limits.force_end_after),
        ] {
            if value == 0 {
                return Err(ConfigError::new(format!("{name} must be at least 1")));
            }
        }
        if limits.max_clue_number < 0 {
            return Err(ConfigError::new("max_clue_number must not be negative".to_string()));
        }
        if self.words.minimum < codenames_rules::BOARD_WORD_COUNT {
            return Err(ConfigError::new(format!(
                "words.minimum must be at least {}",
                codenames_rules::BOARD_WORD_COUNT
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
