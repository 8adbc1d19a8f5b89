//! Clue legality.

use crate::types::Clue;
use derive_more::{Display, Error};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Why a clue was refused.
///
/// The display text is shown to whoever gave the clue, so it reads as an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ClueError {
    /// Nothing but whitespace.
    #[display("Clue word cannot be empty")]
    Empty,
    /// Contains a space.
    #[display("Clue must be a single word")]
    MultipleWords,
    /// Contains a hyphen.
    #[display("Hyphenated clues are not allowed")]
    Hyphenated,
    /// Contains digits, punctuation or non-ASCII letters.
    #[display("Clue must contain only alphabetic characters")]
    NotAlphabetic,
    /// The count is below zero.
    #[display("Clue number must be a non-negative integer")]
    NegativeNumber,
    /// The word is one of the cards.
    #[display("Clue cannot match a word on the board")]
    OnBoard,
}

/// Checks a clue against the board's words.
///
/// The count has no upper bound at this layer; callers impose their own.
#[instrument(skip(board_words), fields(word = %clue.word(), number = clue.number()))]
pub fn validate_clue<'a>(
    clue: &Clue,
    board_words: impl IntoIterator<Item = &'a str>,
) -> Result<(), ClueError> {
    let word = clue.word().trim();
    if word.is_empty() {
        return Err(ClueError::Empty);
    }
    if word.contains(' ') {
        return Err(ClueError::MultipleWords);
    }
    if word.contains('-') {
        return Err(ClueError::Hyphenated);
    }
    if !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ClueError::NotAlphabetic);
    }
    if clue.number() < 0 {
        return Err(ClueError::NegativeNumber);
    }

    let board: HashSet<String> = board_words.into_iter().map(str::to_lowercase).collect();
    if board.contains(&word.to_lowercase()) {
        return Err(ClueError::OnBoard);
    }

    debug!("Clue accepted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: [&str; 3] = ["Apple", "river", "MOON"];

    fn check(word: &str, number: i64) -> Result<(), ClueError> {
        validate_clue(&Clue::new(word, number), BOARD)
    }

    #[test]
    fn accepts_plain_word() {
        assert_eq!(check("fruit", 2), Ok(()));
        assert_eq!(check("  Tide ", 0), Ok(()));
    }

    #[test]
    fn rejects_each_malformed_shape() {
        assert_eq!(check("   ", 1), Err(ClueError::Empty));
        assert_eq!(check("two words", 1), Err(ClueError::MultipleWords));
        assert_eq!(check("half-moon", 1), Err(ClueError::Hyphenated));
        assert_eq!(check("r2d2", 1), Err(ClueError::NotAlphabetic));
        assert_eq!(check("café", 1), Err(ClueError::NotAlphabetic));
        assert_eq!(check("fruit", -1), Err(ClueError::NegativeNumber));
    }

    #[test]
    fn rejects_board_words_in_any_case() {
        assert_eq!(check("apple", 1), Err(ClueError::OnBoard));
        assert_eq!(check("RIVER", 1), Err(ClueError::OnBoard));
    }

    #[test]
    fn count_has_no_upper_bound() {
        assert_eq!(check("fruit", 9), Ok(()));
    }
}
