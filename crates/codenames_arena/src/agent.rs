//! Agent capability and the per-team personas built on it.

use crate::parse::parse_response;
use async_trait::async_trait;
use codenames_rules::Team;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Tracing target of the per-call interaction record.
pub const INTERACTION_TARGET: &str = "codenames_arena::interaction";

/// Sampling settings passed through to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on response length, in tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_output_tokens() -> u32 {
    320
}

impl SamplingParams {
    /// Settings for spymasters.
    pub fn spymaster() -> Self {
        Self {
            temperature: 0.6,
            max_output_tokens: default_max_output_tokens(),
        }
    }

    /// Settings for operatives.
    pub fn operative() -> Self {
        Self {
            temperature: 0.5,
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Which job an agent does for its team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Gives clues.
    Spymaster,
    /// Guesses words.
    Operative,
}

/// Something that turns a prompt into response text, usually a language model.
///
/// Implementations decide which provider and model to call. Any error is
/// retried by the orchestrator with the error text as feedback.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Produces a response for `user_prompt` under `system_prompt`.
    async fn invoke(
        &self,
        user_prompt: &str,
        system_prompt: &str,
        sampling: &SamplingParams,
    ) -> Result<String, AgentError>;
}

/// Failure reported by an agent.
#[derive(Debug, Clone, Display, Error)]
#[display("Agent error: {} at {}:{}", message, file, line)]
pub struct AgentError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AgentError {
    /// Creates a new agent error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Agent error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// An agent bound to a team and role.
#[derive(Clone, Getters)]
pub struct Persona {
    /// The backing agent.
    agent: Arc<dyn Agent>,
    /// Team served.
    team: Team,
    /// Job done.
    role: Role,
    /// Sampling settings for every call.
    sampling: SamplingParams,
}

impl fmt::Debug for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persona")
            .field("team", &self.team)
            .field("role", &self.role)
            .field("sampling", &self.sampling)
            .finish_non_exhaustive()
    }
}

impl Persona {
    /// Binds an agent to a team and role.
    pub fn new(agent: Arc<dyn Agent>, team: Team, role: Role, sampling: SamplingParams) -> Self {
        Self {
            agent,
            team,
            role,
            sampling,
        }
    }

    /// Calls the agent with this persona's sampling settings.
    ///
    /// Every call emits one interaction record on [`INTERACTION_TARGET`]
    /// carrying team, role, attempt number, the feedback shown, elapsed time
    /// and either the raw response with whether it parsed, or the error.
    #[instrument(
        skip(self, user_prompt, system_prompt, feedback),
        fields(team = %self.team, role = %self.role)
    )]
    pub async fn invoke(
        &self,
        user_prompt: &str,
        system_prompt: &str,
        attempt: u32,
        feedback: Option<&str>,
    ) -> Result<String, AgentError> {
        let started = Instant::now();
        let result = self
            .agent
            .invoke(user_prompt, system_prompt, &self.sampling)
            .await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let feedback = feedback.unwrap_or_default();

        match &result {
            Ok(response) => info!(
                target: INTERACTION_TARGET,
                team = %self.team,
                role = %self.role,
                attempt,
                feedback,
                elapsed_ms,
                parsed = parse_response(response).is_some(),
                response = %response,
                "Agent interaction"
            ),
            Err(e) => warn!(
                target: INTERACTION_TARGET,
                team = %self.team,
                role = %self.role,
                attempt,
                feedback,
                elapsed_ms,
                error = %e.message,
                "Agent interaction failed"
            ),
        }
        result
    }
}

/// A team's spymaster and operatives.
#[derive(Debug, Clone, Getters)]
pub struct TeamAgents {
    /// Clue giver.
    spymaster: Persona,
    /// Guessers.
    operative: Persona,
}

impl TeamAgents {
    /// Pairs a spymaster with operatives.
    pub fn new(spymaster: Persona, operative: Persona) -> Self {
        Self {
            spymaster,
            operative,
        }
    }
}

/// Both teams' agents.
#[derive(Debug, Clone)]
pub struct Roster {
    red: TeamAgents,
    blue: TeamAgents,
}

impl Roster {
    /// Builds a roster from explicit team agents.
    pub fn new(red: TeamAgents, blue: TeamAgents) -> Self {
        Self { red, blue }
    }

    /// Builds a roster by asking `factory` for each team and role.
    pub fn from_factory<F>(
        spymaster: SamplingParams,
        operative: SamplingParams,
        mut factory: F,
    ) -> Self
    where
        F: FnMut(Team, Role) -> Arc<dyn Agent>,
    {
        let mut build = |team: Team| {
            TeamAgents::new(
                Persona::new(factory(team, Role::Spymaster), team, Role::Spymaster, spymaster),
                Persona::new(factory(team, Role::Operative), team, Role::Operative, operative),
            )
        };
        let red = build(Team::Red);
        let blue = build(Team::Blue);
        Self { red, blue }
    }

    /// The agents playing for `team`.
    pub fn team(&self, team: Team) -> &TeamAgents {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}
