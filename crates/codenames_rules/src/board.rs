//! The 5×5 grid of word cards.

use crate::position::{BOARD_SIZE, Position};
use crate::types::{Card, CardCategory, Team};
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Number of cards on a board.
pub const BOARD_WORD_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Cards owned by the team that moves first.
pub const STARTING_TEAM_CARDS: usize = 9;
/// Cards owned by the team that moves second.
pub const SECOND_TEAM_CARDS: usize = 8;
/// Neutral bystander cards.
pub const NEUTRAL_CARDS: usize = 7;

/// Errors from building a board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Word list is not exactly 25 long.
    #[display("Expected 25 words for the board, got {_0}")]
    WrongWordCount(#[error(not(source))] usize),
    /// Category list is not exactly 25 long.
    #[display("Expected 25 assignments for the board, got {_0}")]
    WrongCategoryCount(#[error(not(source))] usize),
    /// Two words collide case-insensitively.
    #[display("Duplicate board word: {_0}")]
    DuplicateWord(#[error(not(source))] String),
}

/// Fixed 5×5 grid with a case-insensitive word index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cards in row-major order.
    cards: Vec<Card>,
    /// Lower-cased word to cell.
    index: HashMap<String, Position>,
}

impl Board {
    /// Lays out 25 words with their categories, row by row.
    #[instrument(skip_all, fields(words = words.len()))]
    pub fn from_words(
        words: Vec<String>,
        categories: Vec<CardCategory>,
    ) -> Result<Self, BoardError> {
        if words.len() != BOARD_WORD_COUNT {
            return Err(BoardError::WrongWordCount(words.len()));
        }
        if categories.len() != BOARD_WORD_COUNT {
            return Err(BoardError::WrongCategoryCount(categories.len()));
        }

        let mut index = HashMap::with_capacity(BOARD_WORD_COUNT);
        let mut cards = Vec::with_capacity(BOARD_WORD_COUNT);
        for (i, (word, category)) in words.into_iter().zip(categories).enumerate() {
            let key = normalize(&word);
            if index.insert(key, Position::from_index(i)).is_some() {
                return Err(BoardError::DuplicateWord(word));
            }
            cards.push(Card::new(word, category));
        }

        debug!("Board laid out");
        Ok(Self { cards, index })
    }

    /// Returns the card at `position`.
    pub fn card(&self, position: Position) -> &Card {
        &self.cards[position.index()]
    }

    /// Turns over the card at `position` and returns it.
    ///
    /// Revealing twice is harmless here; refusing a second guess is the game's job.
    pub fn reveal(&mut self, position: Position) -> &Card {
        let card = &mut self.cards[position.index()];
        card.reveal();
        card
    }

    /// Looks a word up ignoring case and surrounding whitespace.
    pub fn find_word(&self, word: &str) -> Option<Position> {
        self.index.get(&normalize(word)).copied()
    }

    /// Every word, row by row.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.word())
    }

    /// Words still face down, row by row.
    pub fn unrevealed_words(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().filter(|c| !c.is_revealed()).map(|c| c.word())
    }

    /// Cells already turned over.
    pub fn revealed_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(|p| self.card(*p).is_revealed())
    }

    /// Every cell paired with its card, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Card)> {
        Position::all().zip(self.cards.iter())
    }

    /// How many cards carry `category`.
    pub fn count(&self, category: CardCategory) -> usize {
        self.cards.iter().filter(|c| c.category() == category).count()
    }

    /// How many of `team`'s cards are still face down.
    pub fn hidden_for(&self, team: Team) -> usize {
        self.cards
            .iter()
            .filter(|c| !c.is_revealed() && c.category().is_owned_by(team))
            .count()
    }
}

/// Builds the 9/8/7/1 category deck for `starting_team` and shuffles it.
#[instrument(skip(rng))]
pub fn assign_categories<R: Rng + ?Sized>(starting_team: Team, rng: &mut R) -> Vec<CardCategory> {
    let mut deck = Vec::with_capacity(BOARD_WORD_COUNT);
    deck.extend(std::iter::repeat_n(CardCategory::Agent(starting_team), STARTING_TEAM_CARDS));
    deck.extend(std::iter::repeat_n(
        CardCategory::Agent(starting_team.opponent()),
        SECOND_TEAM_CARDS,
    ));
    deck.extend(std::iter::repeat_n(CardCategory::Neutral, NEUTRAL_CARDS));
    deck.push(CardCategory::Assassin);
    deck.shuffle(rng);
    deck
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}
