//! Runs one match between two teams of agents.
//!
//! The orchestrator owns the [`Game`] and drives it turn by turn: the
//! spymaster gets a bounded number of attempts to produce a legal clue, then
//! the operatives get a bounded number of attempts to guess or stop. Agent
//! output that cannot be used is turned into feedback for the next attempt;
//! only budget exhaustion ends a phase early.

use crate::agent::Roster;
use crate::config::MatchLimits;
use crate::decision::{GuessAction, clue_decision, guess_decision};
use crate::events::{EventSink, MatchEvent, MatchOutcome, TurnEndReason};
use crate::parse::parse_response;
use crate::prompts::{PromptBuilder, TurnContext};
use crate::resolve::resolve_guess;
use codenames_rules::{CellView, Clue, Game, GameStatus, GuessOutcome, Phase, Remaining, Team};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const CLUE_NOT_JSON: &str = "Response was not valid JSON. Only return the JSON object.";
const GUESS_NOT_JSON: &str = "Response was not valid JSON. Reply only with the JSON payload.";

/// How a finished `play` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Winning team, if any.
    pub winner: Option<Team>,
    /// Won, drawn or aborted.
    pub outcome: MatchOutcome,
    /// Turns started.
    pub turns: u32,
}

/// Snapshot of a match for observers.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchStatus {
    /// Engine state.
    game: GameStatus,
    /// Turns started so far.
    turn_number: u32,
    /// Outcome so far.
    outcome: MatchOutcome,
    /// Public board, categories shown only for revealed cards.
    board: Vec<Vec<CellView>>,
}

/// Result of handling one operative response.
enum GuessStep {
    /// A card was revealed and the team keeps guessing.
    Continue,
    /// The turn or the match is over.
    Over,
    /// Unusable answer; counts toward forcing the turn to end.
    Invalid(String),
    /// The game refused a guess that passed every local check.
    Rejected(String),
}

/// Drives a [`Game`] to completion with agent players.
pub struct Orchestrator {
    game: Game,
    roster: Roster,
    sink: Arc<dyn EventSink>,
    prompts: Arc<dyn PromptBuilder>,
    limits: MatchLimits,
    history: Vec<String>,
    turn_number: u32,
    outcome: MatchOutcome,
    last_remaining: Option<Remaining>,
    stall_count: u32,
}

impl Orchestrator {
    /// Creates an orchestrator for a fresh game.
    pub fn new(
        game: Game,
        roster: Roster,
        sink: Arc<dyn EventSink>,
        prompts: Arc<dyn PromptBuilder>,
        limits: MatchLimits,
    ) -> Self {
        Self {
            game,
            roster,
            sink,
            prompts,
            limits,
            history: Vec::new(),
            turn_number: 0,
            outcome: MatchOutcome::InProgress,
            last_remaining: None,
            stall_count: 0,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Turn summaries recorded so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Current snapshot for observers.
    pub fn status(&self) -> MatchStatus {
        MatchStatus {
            game: self.game.status(),
            turn_number: self.turn_number,
            outcome: self.outcome,
            board: self.game.board_view(false),
        }
    }

    /// Plays until the game finishes, a safety limit triggers, or a spymaster
    /// exhausts its attempts.
    ///
    /// Emits exactly one `MatchEnded`. Calling again after the match ended
    /// returns the same result without emitting anything.
    #[instrument(skip(self), fields(starting_team = %self.game.starting_team()))]
    pub async fn play(&mut self) -> MatchResult {
        if self.outcome != MatchOutcome::InProgress {
            return self.result();
        }
        info!("Starting match");

        loop {
            if self.game.phase() == Phase::Finished {
                self.outcome = match self.game.winner() {
                    Some(_) => MatchOutcome::Won,
                    None => MatchOutcome::Draw,
                };
                break;
            }

            if self.turn_number >= *self.limits.max_turns() {
                warn!(turns = self.turn_number, "Turn ceiling reached, applying tie-break");
                self.game.finish_by_tiebreak();
                continue;
            }

            if self.stalled() {
                warn!(
                    turns = self.stall_count,
                    "No progress for too many turns, applying tie-break"
                );
                self.game.finish_by_tiebreak();
                continue;
            }

            self.turn_number += 1;
            let team = self.game.current_team();
            let remaining = self.game.remaining();
            self.sink.emit(&MatchEvent::TurnStarted {
                turn_number: self.turn_number,
                team,
                red_remaining: remaining.get(Team::Red),
                blue_remaining: remaining.get(Team::Blue),
            });

            if !self.clue_phase(team).await {
                warn!(%team, "Spymaster never produced a valid clue, aborting match");
                self.outcome = MatchOutcome::Aborted;
                break;
            }
            self.guess_phase(team).await;
        }

        let remaining = self.game.remaining();
        self.sink.emit(&MatchEvent::MatchEnded {
            winner: self.game.winner(),
            outcome: self.outcome,
            assassin_revealed: self.game.assassin_revealed(),
            total_turns: self.turn_number,
            red_remaining: remaining.get(Team::Red),
            blue_remaining: remaining.get(Team::Blue),
        });

        let result = self.result();
        info!(
            winner = ?result.winner,
            outcome = %result.outcome,
            turns = result.turns,
            "Match over"
        );
        result
    }

    fn result(&self) -> MatchResult {
        MatchResult {
            winner: self.game.winner(),
            outcome: self.outcome,
            turns: self.turn_number,
        }
    }

    /// Records the counts seen at the start of a turn and reports whether
    /// they have sat still for `stall_turns` observations.
    fn stalled(&mut self) -> bool {
        let remaining = self.game.remaining();
        if self.last_remaining == Some(remaining) {
            self.stall_count += 1;
        } else {
            self.last_remaining = Some(remaining);
            self.stall_count = 1;
        }
        self.stall_count >= *self.limits.stall_turns()
    }

    /// Returns `false` when every attempt failed.
    #[instrument(skip(self), fields(turn = self.turn_number))]
    async fn clue_phase(&mut self, team: Team) -> bool {
        let spymaster = self.roster.team(team).spymaster().clone();
        let system = self.prompts.spymaster_system(team);
        let mut feedback: Option<String> = None;

        for attempt in 1..=*self.limits.clue_attempts() {
            let user = self.prompts.spymaster_context(&TurnContext {
                game: &self.game,
                team,
                history: &self.history,
                feedback: feedback.as_deref(),
            });

            let response = match spymaster
                .invoke(&user, &system, attempt, feedback.as_deref())
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(attempt, error = %e, "Spymaster call failed");
                    feedback = Some(format!("Error calling language model: {}", e.message));
                    continue;
                }
            };

            let Some(object) = parse_response(&response) else {
                warn!(attempt, "Spymaster response was not JSON");
                feedback = Some(CLUE_NOT_JSON.to_string());
                continue;
            };

            let decision = match clue_decision(&object, *self.limits.max_clue_number()) {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(attempt, reason = %e, "Spymaster decision unusable");
                    feedback = Some(e.to_string());
                    continue;
                }
            };

            let clue = Clue::new(decision.word.clone(), decision.number);
            if let Err(e) = self.game.submit_clue(clue) {
                warn!(attempt, reason = %e, "Clue rejected by the game");
                feedback = Some(format!("Clue rejected: {}. Try again with a different clue.", e));
                continue;
            }

            info!(clue = %decision.word, number = decision.number, "Clue given");
            self.history.push(format!(
                "Turn {}: {} clue {} {}",
                self.turn_number, team, decision.word, decision.number
            ));
            self.sink.emit(&MatchEvent::ClueGiven {
                turn_number: self.turn_number,
                team,
                clue: decision.word,
                number: decision.number,
                reasoning: decision.reasoning,
            });
            return true;
        }
        false
    }

    #[instrument(skip(self), fields(turn = self.turn_number))]
    async fn guess_phase(&mut self, team: Team) {
        let operative = self.roster.team(team).operative().clone();
        let system = self.prompts.operative_system(team);
        let mut feedback: Option<String> = None;
        let mut consecutive_invalid = 0u32;
        let mut failed = HashSet::new();
        let mut attempts = 0u32;

        while self.game.phase() == Phase::AwaitGuess
            && self.game.current_team() == team
            && attempts < *self.limits.guess_attempts()
        {
            attempts += 1;
            let shown = self.shown_feedback(feedback.as_deref(), consecutive_invalid);
            let user = self.prompts.operative_context(&TurnContext {
                game: &self.game,
                team,
                history: &self.history,
                feedback: shown.as_deref(),
            });

            let response = match operative
                .invoke(&user, &system, attempts, shown.as_deref())
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(attempts, error = %e, "Operative call failed");
                    feedback = Some(format!("Error calling language model: {}", e.message));
                    continue;
                }
            };

            match self.apply_guess_response(team, &response, &mut failed) {
                GuessStep::Continue => {
                    consecutive_invalid = 0;
                    feedback = None;
                }
                GuessStep::Over => return,
                GuessStep::Rejected(message) => {
                    consecutive_invalid = 0;
                    feedback = Some(message);
                }
                GuessStep::Invalid(message) => {
                    consecutive_invalid += 1;
                    warn!(
                        attempts,
                        consecutive_invalid,
                        reason = %message,
                        "Operative answer unusable"
                    );
                    if consecutive_invalid >= *self.limits.force_end_after() {
                        warn!("Too many consecutive invalid answers, forcing end of turn");
                        self.close_turn(team, TurnEndReason::Forced, String::new());
                        return;
                    }
                    feedback = Some(message);
                }
            }
        }

        if self.game.phase() == Phase::AwaitGuess && self.game.current_team() == team {
            warn!(attempts, "Operative attempts exhausted, ending turn");
            self.close_turn(team, TurnEndReason::AttemptsExhausted, String::new());
        }
    }

    /// Feedback as shown to operatives, listing every hidden word once they keep failing.
    fn shown_feedback(&self, feedback: Option<&str>, consecutive_invalid: u32) -> Option<String> {
        if consecutive_invalid < *self.limits.enrich_feedback_after() {
            return feedback.map(str::to_string);
        }
        Some(format!(
            "{}\n\nAVAILABLE UNREVEALED WORDS: {}\nDO NOT guess words that have already been revealed or are not on this list.",
            feedback.unwrap_or_default(),
            self.available_words().join(", ")
        ))
    }

    fn available_words(&self) -> Vec<String> {
        self.game
            .board()
            .unrevealed_words()
            .map(str::to_uppercase)
            .collect()
    }

    fn apply_guess_response(
        &mut self,
        team: Team,
        response: &str,
        failed: &mut HashSet<String>,
    ) -> GuessStep {
        let Some(object) = parse_response(response) else {
            return GuessStep::Invalid(GUESS_NOT_JSON.to_string());
        };
        let decision = match guess_decision(&object) {
            Ok(decision) => decision,
            Err(e) => return GuessStep::Invalid(e.to_string()),
        };

        let raw = match decision.action {
            GuessAction::End => {
                info!(%team, "Operatives ended the turn");
                self.history
                    .push(format!("Turn {}: {} ended their guesses", self.turn_number, team));
                self.close_turn(team, TurnEndReason::Voluntary, decision.reasoning);
                return GuessStep::Over;
            }
            GuessAction::Guess(raw) => raw,
        };

        let available = self.available_words();
        let Some(word) = resolve_guess(self.game.board(), &raw) else {
            return GuessStep::Invalid(format!(
                "Could not parse '{}' as a valid board word. Available words: {}",
                raw,
                preview(&available, 10)
            ));
        };
        if failed.contains(&word) {
            return GuessStep::Invalid(format!(
                "You already tried '{}' and it was invalid. Choose a different word from the available options.",
                word
            ));
        }
        if !available.contains(&word) {
            let message = format!(
                "'{}' is not available for guessing (already revealed or not on board). Available words: {}",
                word,
                preview(&available, 8)
            );
            failed.insert(word);
            return GuessStep::Invalid(message);
        }

        let outcome = match self.game.guess_word(&word) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(%word, reason = %e, "Guess rejected by the game");
                failed.insert(word);
                return GuessStep::Rejected(format!("Guess rejected: {}", e));
            }
        };
        self.report_guess(team, &outcome, decision.reasoning);

        if self.game.phase() == Phase::Finished {
            return GuessStep::Over;
        }
        if outcome.ended_turn() {
            let reason = if outcome.card().category().is_owned_by(team) {
                TurnEndReason::BudgetExhausted
            } else {
                TurnEndReason::WrongGuess
            };
            self.emit_turn_ended(team, reason, String::new());
            return GuessStep::Over;
        }
        GuessStep::Continue
    }

    fn report_guess(&mut self, team: Team, outcome: &GuessOutcome, reasoning: String) {
        let label = outcome.position().label();
        let word = outcome.card().word().to_uppercase();
        let category = outcome.card().category();
        debug!(%label, %word, %category, "Card revealed");

        self.history
            .push(format!("{} guessed {} {} -> {}", team, label, word, category));
        let remaining = self.game.remaining();
        self.sink.emit(&MatchEvent::GuessMade {
            turn_number: self.turn_number,
            team,
            word,
            label,
            category,
            reasoning,
            ended_turn: outcome.ended_turn(),
            assassin_hit: outcome.assassin_hit(),
            team_won: outcome.team_won(),
            guesses_left: self.game.guesses_left(),
            red_remaining: remaining.get(Team::Red),
            blue_remaining: remaining.get(Team::Blue),
        });
    }

    /// Ends the turn in the engine, then announces it.
    fn close_turn(&mut self, team: Team, reason: TurnEndReason, reasoning: String) {
        if let Err(e) = self.game.end_turn() {
            warn!(error = %e, "Could not end turn");
            return;
        }
        self.emit_turn_ended(team, reason, reasoning);
    }

    fn emit_turn_ended(&self, team: Team, reason: TurnEndReason, reasoning: String) {
        debug!(%team, %reason, "Turn ended");
        self.sink.emit(&MatchEvent::TurnEnded {
            turn_number: self.turn_number,
            team,
            reason,
            reasoning,
        });
    }
}

/// The first `limit` words, with an ellipsis when more exist.
fn preview(words: &[String], limit: usize) -> String {
    let shown = words.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if words.len() > limit {
        format!("{shown}...")
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_marks_truncation() {
        let words: Vec<String> = ["A", "B", "C"].iter().map(|w| w.to_string()).collect();
        assert_eq!(preview(&words, 2), "A, B...");
        assert_eq!(preview(&words, 3), "A, B, C");
    }
}
