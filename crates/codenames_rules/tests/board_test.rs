//! Tests for board construction and lookup.

use codenames_rules::{
    BOARD_WORD_COUNT, Board, BoardError, CardCategory, Position, Team, assign_categories,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn words() -> Vec<String> {
    (0..BOARD_WORD_COUNT).map(|i| format!("word{i}")).collect()
}

fn counts(categories: &[CardCategory], team: Team) -> (usize, usize, usize, usize) {
    let own = categories.iter().filter(|c| **c == CardCategory::Agent(team)).count();
    let other = categories
        .iter()
        .filter(|c| **c == CardCategory::Agent(team.opponent()))
        .count();
    let neutral = categories.iter().filter(|c| **c == CardCategory::Neutral).count();
    let assassin = categories.iter().filter(|c| **c == CardCategory::Assassin).count();
    (own, other, neutral, assassin)
}

#[test]
fn test_distribution_holds_for_many_seeds() {
    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for team in [Team::Red, Team::Blue] {
            let categories = assign_categories(team, &mut rng);
            assert_eq!(categories.len(), 25);
            assert_eq!(counts(&categories, team), (9, 8, 7, 1));
        }
    }
}

#[test]
fn test_shuffle_actually_varies_layout() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let first = assign_categories(Team::Red, &mut rng);
    let second = assign_categories(Team::Red, &mut rng);
    assert_ne!(first, second);
}

#[test]
fn test_rejects_wrong_lengths() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let categories = assign_categories(Team::Red, &mut rng);

    let short: Vec<String> = words().into_iter().take(24).collect();
    assert_eq!(
        Board::from_words(short, categories.clone()),
        Err(BoardError::WrongWordCount(24))
    );
    assert_eq!(
        Board::from_words(words(), categories[..20].to_vec()),
        Err(BoardError::WrongCategoryCount(20))
    );
}

#[test]
fn test_rejects_case_insensitive_duplicates() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut list = words();
    list[3] = "WORD0".to_string();
    let result = Board::from_words(list, assign_categories(Team::Red, &mut rng));
    assert_eq!(result, Err(BoardError::DuplicateWord("WORD0".to_string())));
}

#[test]
fn test_find_word_is_case_insensitive() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let board = Board::from_words(words(), assign_categories(Team::Blue, &mut rng)).unwrap();

    let lower = board.find_word("word0");
    let upper = board.find_word("WORD0");
    assert_eq!(lower, Some(Position::new(0, 0).unwrap()));
    assert_eq!(lower, upper);
    assert_eq!(board.find_word(" Word7 "), Some(Position::new(1, 2).unwrap()));
    assert_eq!(board.find_word("missing"), None);
}

#[test]
fn test_reveal_flips_flag_and_shrinks_unrevealed_words() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut board = Board::from_words(words(), assign_categories(Team::Red, &mut rng)).unwrap();
    let cell = Position::new(2, 3).unwrap();

    let card = board.reveal(cell);
    assert!(card.is_revealed());
    assert_eq!(card.word(), "word13");

    let hidden: Vec<&str> = board.unrevealed_words().collect();
    assert_eq!(hidden.len(), 24);
    assert!(!hidden.contains(&"word13"));
    assert_eq!(board.revealed_positions().collect::<Vec<_>>(), vec![cell]);
}

#[test]
fn test_count_matches_assignment() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let board = Board::from_words(words(), assign_categories(Team::Blue, &mut rng)).unwrap();
    assert_eq!(board.count(CardCategory::Agent(Team::Blue)), 9);
    assert_eq!(board.count(CardCategory::Agent(Team::Red)), 8);
    assert_eq!(board.count(CardCategory::Neutral), 7);
    assert_eq!(board.count(CardCategory::Assassin), 1);
    assert_eq!(board.hidden_for(Team::Blue), 9);
}

#[test]
fn test_position_deserialization_checks_bounds() {
    let inside: Position = serde_json::from_str(r#"{"row":4,"col":2}"#).unwrap();
    assert_eq!(inside, Position::new(4, 2).unwrap());

    let err = serde_json::from_str::<Position>(r#"{"row":9,"col":9}"#).unwrap_err();
    assert!(err.to_string().contains("outside the 5x5 board"));
    assert!(serde_json::from_str::<Position>(r#"{"row":0,"col":5}"#).is_err());
}
