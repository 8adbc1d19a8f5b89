//! Match lifecycle events and the sinks that receive them.
//!
//! For one match, events arrive in this order: `turn_started`,
//! `clue_given`, any number of `guess_made`, then one `turn_ended` or
//! `match_ended`.

use codenames_rules::{CardCategory, Team};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Why a turn stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnEndReason {
    /// The operatives chose to stop.
    Voluntary,
    /// A neutral or opponent card was revealed.
    WrongGuess,
    /// The last allowed guess was used.
    BudgetExhausted,
    /// Too many consecutive unusable answers.
    Forced,
    /// The guess phase ran out of attempts.
    AttemptsExhausted,
}

/// How a match concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchOutcome {
    /// Still being played.
    InProgress,
    /// A team won, by play or by tie-break.
    Won,
    /// A safety limit ended the match with equal counts.
    Draw,
    /// A spymaster never produced a valid clue; the game never finished.
    Aborted,
}

/// Something that happened during a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "event_type", content = "data", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchEvent {
    /// A team is about to give a clue.
    TurnStarted {
        /// One-based turn number.
        turn_number: u32,
        /// Team to play.
        team: Team,
        /// Red cards left.
        red_remaining: usize,
        /// Blue cards left.
        blue_remaining: usize,
    },
    /// The spymaster's clue was accepted.
    ClueGiven {
        /// One-based turn number.
        turn_number: u32,
        /// Team that gave the clue.
        team: Team,
        /// Clue word.
        clue: String,
        /// Clue count.
        number: i64,
        /// Spymaster's explanation.
        reasoning: String,
    },
    /// A card was revealed.
    GuessMade {
        /// One-based turn number.
        turn_number: u32,
        /// Team that guessed.
        team: Team,
        /// Revealed word.
        word: String,
        /// Board label of the card.
        label: String,
        /// What the card was.
        category: CardCategory,
        /// Operatives' explanation.
        reasoning: String,
        /// Whether the turn ended.
        ended_turn: bool,
        /// Whether it was the assassin.
        assassin_hit: bool,
        /// Winner decided by this guess.
        team_won: Option<Team>,
        /// Guesses still allowed.
        guesses_left: i64,
        /// Red cards left.
        red_remaining: usize,
        /// Blue cards left.
        blue_remaining: usize,
    },
    /// The turn passed to the other team.
    TurnEnded {
        /// One-based turn number.
        turn_number: u32,
        /// Team whose turn ended.
        team: Team,
        /// Why it ended.
        reason: TurnEndReason,
        /// Operatives' explanation, for voluntary ends.
        reasoning: String,
    },
    /// The match is over.
    MatchEnded {
        /// Winner, if any.
        winner: Option<Team>,
        /// How it ended.
        outcome: MatchOutcome,
        /// Whether the assassin was revealed.
        assassin_revealed: bool,
        /// Turns started.
        total_turns: u32,
        /// Red cards left.
        red_remaining: usize,
        /// Blue cards left.
        blue_remaining: usize,
    },
}

impl MatchEvent {
    /// The snake_case tag, e.g. `guess_made`.
    pub fn event_type(&self) -> &'static str {
        self.into()
    }
}

/// Receives events from a running match.
///
/// `emit` must return promptly and must not fail; the match never waits on
/// or reacts to a sink.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: &MatchEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &MatchEvent) {}
}

/// Fans events out over a bounded broadcast channel.
///
/// Back-pressure policy: drop-oldest. When a subscriber falls `capacity`
/// events behind, the oldest undelivered events are overwritten and the
/// subscriber's next `recv` returns [`broadcast::error::RecvError::Lagged`]
/// with the number skipped. Delivered events stay in emission order.
/// Emitting with no subscribers discards the event.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: broadcast::Sender<MatchEvent>,
}

impl ChannelSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    ///
    /// A capacity of zero is raised to one; the channel rounds up to a power of two.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        debug!(capacity, "Created event channel");
        Self { sender }
    }

    /// Opens a new subscription that sees events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &MatchEvent) {
        if self.sender.send(event.clone()).is_err() {
            trace!(event_type = event.event_type(), "No subscribers, event dropped");
        }
    }
}
