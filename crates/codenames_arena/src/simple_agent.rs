//! Offline agent that plays without a language model.

use crate::agent::{Agent, AgentError, Role, SamplingParams};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, instrument};

/// Clue words tried in order by the heuristic spymaster.
const CLUE_VOCABULARY: &[&str] = &[
    "orbit", "harbor", "meadow", "lantern", "voyage", "thunder", "crystal", "garden", "signal",
    "puzzle", "canyon", "velvet", "compass", "glacier", "timber", "saddle", "anchor", "marble",
];

/// Deterministic agent reading the [`StandardPrompts`](crate::StandardPrompts) layout.
///
/// As spymaster it gives the first vocabulary word absent from the prompt,
/// covering one card. As operative it guesses the first hidden card on the
/// board, or ends the turn when it cannot find one.
#[derive(Debug, Clone, Copy)]
pub struct SimpleAgent {
    role: Role,
}

impl SimpleAgent {
    /// Creates an agent for `role`.
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    fn clue(&self, prompt: &str) -> Result<String, AgentError> {
        let upper = prompt.to_uppercase();
        let word = CLUE_VOCABULARY
            .iter()
            .find(|w| !upper.contains(&w.to_uppercase()))
            .ok_or_else(|| AgentError::new("Every clue word already appears on the table"))?;
        debug!(clue = word, "Simple spymaster chose clue");
        let reply = json!({"clue": word, "number": 1, "reasoning": "first unused vocabulary word"});
        Ok(reply.to_string())
    }

    fn guess(&self, prompt: &str) -> String {
        let reply = match first_hidden_word(prompt) {
            Some(word) => {
                debug!(%word, "Simple operative chose word");
                json!({"action": "guess", "word": word, "reasoning": "first hidden card"})
            }
            None => json!({"action": "end", "word": null, "reasoning": "no hidden card found"}),
        };
        reply.to_string()
    }
}

/// First `LABEL WORD` entry without a revealed category, between
/// `Current board:` and the clue line.
fn first_hidden_word(prompt: &str) -> Option<String> {
    prompt
        .lines()
        .skip_while(|line| line.trim() != "Current board:")
        .skip(1)
        .take_while(|line| !line.starts_with("Last clue:"))
        .flat_map(|row| row.split(", "))
        .filter(|entry| !entry.contains('('))
        .find_map(|entry| entry.split_whitespace().nth(1).map(str::to_string))
}

#[async_trait]
impl Agent for SimpleAgent {
    #[instrument(skip(self, user_prompt, _system_prompt, _sampling), fields(role = %self.role))]
    async fn invoke(
        &self,
        user_prompt: &str,
        _system_prompt: &str,
        _sampling: &SamplingParams,
    ) -> Result<String, AgentError> {
        match self.role {
            Role::Spymaster => self.clue(user_prompt),
            Role::Operative => Ok(self.guess(user_prompt)),
        }
    }
}
