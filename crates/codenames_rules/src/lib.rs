//! Codenames rules engine.
//!
//! Pure game logic with no I/O beyond reading a word list:
//!
//! - **Board**: 25 word cards with a case-insensitive word index
//! - **Rules**: clue legality checks
//! - **Game**: the `AwaitClue -> AwaitGuess -> Finished` state machine
//! - **Words**: de-duplicated candidate pools for dealing boards
//!
//! # Example
//!
//! ```
//! use codenames_rules::{Board, CardCategory, Clue, Game, Phase, Team};
//!
//! let words: Vec<String> = (0..25).map(|i| format!("word{i}")).collect();
//! let mut categories = vec![CardCategory::Agent(Team::Red); 9];
//! categories.extend([CardCategory::Agent(Team::Blue); 8]);
//! categories.extend([CardCategory::Neutral; 7]);
//! categories.push(CardCategory::Assassin);
//!
//! let board = Board::from_words(words, categories)?;
//! let mut game = Game::new(board, Team::Red);
//! game.submit_clue(Clue::new("number", 1))?;
//! assert_eq!(game.phase(), Phase::AwaitGuess);
//! assert_eq!(game.guesses_left(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod game;
mod position;
mod rules;
mod types;
mod words;

pub use board::{
    BOARD_WORD_COUNT, Board, BoardError, NEUTRAL_CARDS, SECOND_TEAM_CARDS, STARTING_TEAM_CARDS,
    assign_categories,
};
pub use game::{CellView, Game, GameError, GameStatus, Remaining, SetupError};
pub use position::{BOARD_SIZE, COLUMN_LABELS, Position, PositionError};
pub use rules::{ClueError, validate_clue};
pub use types::{Card, CardCategory, Clue, GuessOutcome, Phase, Team};
pub use words::{WordPool, WordPoolError};
