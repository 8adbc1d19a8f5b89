//! Mapping an operative's free-text answer to a board word.

use codenames_rules::{Board, Position};
use tracing::{debug, instrument};

/// Finds the board word an answer most plausibly names.
///
/// Candidates, in order: the whole answer, a bare board label such as `B2`,
/// each token of an answer split on spaces or colons (labels become their
/// cell's word), and finally the answer with everything but letters removed.
/// The first candidate present on the board is returned upper-cased. The
/// revealed state is not checked here.
#[instrument(skip(board))]
pub fn resolve_guess(board: &Board, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut candidates: Vec<String> = vec![raw.to_string()];

    if let Some(word) = label_word(board, raw) {
        candidates.push(word);
    }

    if raw.contains(' ') || raw.contains(':') {
        for part in raw.replace(':', " ").split_whitespace() {
            match label_word(board, part) {
                Some(word) => candidates.push(word),
                None => candidates.push(part.to_string()),
            }
        }
    }

    let letters: String = raw.chars().filter(|c| c.is_alphabetic()).collect();
    if !letters.is_empty() {
        candidates.push(letters);
    }

    let resolved = candidates
        .iter()
        .find_map(|candidate| board.find_word(candidate))
        .map(|position| board.card(position).word().to_uppercase());
    debug!(?resolved, "Resolved guess");
    resolved
}

/// The word under a two-character label like `c4`.
fn label_word(board: &Board, token: &str) -> Option<String> {
    let mut chars = token.chars();
    let looks_like_label = matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some(r), None) if c.is_alphabetic() && r.is_ascii_digit()
    );
    if !looks_like_label {
        return None;
    }
    Position::from_label(token)
        .ok()
        .map(|position| board.card(position).word().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenames_rules::{CardCategory, Team};

    fn board() -> Board {
        let mut words: Vec<String> = (0..25).map(|i| format!("Word{i}")).collect();
        words[0] = "Battery".to_string();
        words[7] = "Computer".to_string();
        let mut categories = vec![CardCategory::Agent(Team::Red); 9];
        categories.extend([CardCategory::Agent(Team::Blue); 8]);
        categories.extend([CardCategory::Neutral; 7]);
        categories.push(CardCategory::Assassin);
        Board::from_words(words, categories).unwrap()
    }

    #[test]
    fn exact_word_in_any_case() {
        let board = board();
        assert_eq!(resolve_guess(&board, "battery").as_deref(), Some("BATTERY"));
        assert_eq!(resolve_guess(&board, "  BATTERY ").as_deref(), Some("BATTERY"));
    }

    #[test]
    fn bare_label() {
        let board = board();
        assert_eq!(resolve_guess(&board, "A1").as_deref(), Some("BATTERY"));
        assert_eq!(resolve_guess(&board, "c2").as_deref(), Some("COMPUTER"));
    }

    #[test]
    fn combined_label_and_word() {
        let board = board();
        assert_eq!(resolve_guess(&board, "C2: Computer").as_deref(), Some("COMPUTER"));
        assert_eq!(resolve_guess(&board, "A1 BATTERY").as_deref(), Some("BATTERY"));
        assert_eq!(resolve_guess(&board, "my guess is battery").as_deref(), Some("BATTERY"));
    }

    #[test]
    fn punctuation_is_stripped() {
        let board = board();
        assert_eq!(resolve_guess(&board, "\"Battery!\"").as_deref(), Some("BATTERY"));
    }

    #[test]
    fn unknown_input_resolves_to_nothing() {
        let board = board();
        assert_eq!(resolve_guess(&board, "BANANA"), None);
        assert_eq!(resolve_guess(&board, "F9"), None);
        assert_eq!(resolve_guess(&board, "   "), None);
    }
}
