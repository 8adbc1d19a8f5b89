//! Codenames Arena - agent-driven match orchestration.
//!
//! Sits on top of [`codenames_rules`] and runs a full match between two
//! teams of [`Agent`]s:
//!
//! - **Agents**: a provider-agnostic `invoke` capability bound to team and role
//! - **Parsing**: tolerant JSON extraction from free-form responses
//! - **Decisions**: clue and guess extraction with feedback on rejection
//! - **Events**: lifecycle events fanned out through an [`EventSink`]
//! - **Orchestrator**: the turn loop with retry budgets and safety limits

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod agent;
mod config;
mod decision;
mod events;
mod orchestrator;
mod parse;
mod prompts;
mod resolve;
mod simple_agent;

pub use agent::{
    Agent, AgentError, INTERACTION_TARGET, Persona, Role, Roster, SamplingParams, TeamAgents,
};
pub use config::{
    ArenaConfig, ConfigError, DEFAULT_WORD_LIST, MatchLimits, SamplingConfig, WordsConfig,
};
pub use decision::{
    ClueDecision, DecisionError, GuessAction, GuessDecision, clue_decision, guess_decision,
};
pub use events::{ChannelSink, EventSink, MatchEvent, MatchOutcome, NullSink, TurnEndReason};
pub use orchestrator::{MatchResult, MatchStatus, Orchestrator};
pub use parse::{JsonObject, ParseStrategy, parse_response};
pub use prompts::{PromptBuilder, StandardPrompts, TurnContext};
pub use resolve::resolve_guess;
pub use simple_agent::SimpleAgent;
