//! Core domain types for Codenames.

use crate::position::Position;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One of the two competing teams.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Team {
    /// The red team.
    Red,
    /// The blue team.
    Blue,
}

impl Team {
    /// Returns the opposing team.
    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

/// What a card turns out to be once revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(tag = "kind", content = "team", rename_all = "snake_case")]
pub enum CardCategory {
    /// A card belonging to one of the teams.
    #[display("{_0}")]
    Agent(Team),
    /// A bystander card owned by nobody.
    #[display("NEUTRAL")]
    Neutral,
    /// The card that loses the game for whoever reveals it.
    #[display("ASSASSIN")]
    Assassin,
}

impl CardCategory {
    /// Returns the owning team, if any.
    pub fn owner(self) -> Option<Team> {
        match self {
            CardCategory::Agent(team) => Some(team),
            CardCategory::Neutral | CardCategory::Assassin => None,
        }
    }

    /// Checks whether this category belongs to `team`.
    pub fn is_owned_by(self, team: Team) -> bool {
        self.owner() == Some(team)
    }
}

/// Where a game currently is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// The current team's spymaster must give a clue.
    AwaitClue,
    /// The current team's operatives are guessing.
    AwaitGuess,
    /// The game is over.
    Finished,
}

/// A word card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// The word printed on the card.
    word: String,
    /// The hidden category.
    category: CardCategory,
    /// Whether the card has been turned over.
    revealed: bool,
}

impl Card {
    /// Creates a hidden card.
    pub fn new(word: impl Into<String>, category: CardCategory) -> Self {
        Self {
            word: word.into(),
            category,
            revealed: false,
        }
    }

    /// The word printed on the card.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The hidden category.
    pub fn category(&self) -> CardCategory {
        self.category
    }

    /// Whether the card has been turned over.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Turns the card over. There is no way back.
    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }
}

/// A spymaster's clue: one word and how many cards it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    /// The clue word.
    word: String,
    /// Number of related cards. Signed so that negative input can be rejected by validation.
    number: i64,
}

impl Clue {
    /// Creates a clue.
    pub fn new(word: impl Into<String>, number: i64) -> Self {
        Self {
            word: word.into(),
            number,
        }
    }

    /// The clue word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Number of related cards.
    pub fn number(&self) -> i64 {
        self.number
    }
}

/// The result of a single accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessOutcome {
    /// Where the guess landed.
    position: Position,
    /// The card as it looks after being revealed.
    card: Card,
    /// Whether the guessing team's turn is over.
    ended_turn: bool,
    /// The team that won with this guess, if any.
    team_won: Option<Team>,
    /// Whether the assassin was revealed.
    assassin_hit: bool,
}

impl GuessOutcome {
    pub(crate) fn new(
        position: Position,
        card: Card,
        ended_turn: bool,
        team_won: Option<Team>,
        assassin_hit: bool,
    ) -> Self {
        Self {
            position,
            card,
            ended_turn,
            team_won,
            assassin_hit,
        }
    }

    /// Where the guess landed.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The revealed card.
    pub fn card(&self) -> &Card {
        &self.card
    }

    /// Whether the guessing team's turn is over.
    pub fn ended_turn(&self) -> bool {
        self.ended_turn
    }

    /// The team that won with this guess, if any.
    pub fn team_won(&self) -> Option<Team> {
        self.team_won
    }

    /// Whether the assassin was revealed.
    pub fn assassin_hit(&self) -> bool {
        self.assassin_hit
    }
}
