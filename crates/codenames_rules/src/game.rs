//! The Codenames turn state machine.
//!
//! A game moves `AwaitClue -> AwaitGuess -> (AwaitClue | Finished)`. Every
//! operation checks its preconditions before touching any field, so a
//! rejected call leaves the game exactly as it was.

use crate::board::{BOARD_WORD_COUNT, Board, BoardError, assign_categories};
use crate::position::Position;
use crate::rules::{ClueError, validate_clue};
use crate::types::{Card, CardCategory, Clue, GuessOutcome, Phase, Team};
use crate::words::{WordPool, WordPoolError};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// An operation the current phase does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A clue arrived while operatives were guessing.
    #[display("Cannot give a clue right now")]
    ClueNotExpected,
    /// Any action after the game ended.
    #[display("Game is already finished")]
    AlreadyFinished,
    /// A guess arrived before a clue.
    #[display("No active clue to guess on")]
    NoActiveClue,
    /// The card was turned over earlier.
    #[display("Card is already revealed")]
    AlreadyRevealed,
    /// A guessed word is not on the board.
    #[display("Word is not on the board")]
    UnknownWord,
    /// End of turn requested outside the guessing phase.
    #[display("No active turn to end")]
    NoActiveTurn,
    /// The clue failed validation.
    #[display("{_0}")]
    InvalidClue(ClueError),
}

impl From<ClueError> for GameError {
    fn from(err: ClueError) -> Self {
        GameError::InvalidClue(err)
    }
}

/// Failure to set up a standard game.
#[derive(Debug, Display, Error, From)]
pub enum SetupError {
    /// Not enough words to draw from.
    #[display("{_0}")]
    Words(WordPoolError),
    /// The drawn words did not form a valid board.
    #[display("{_0}")]
    Board(BoardError),
}

/// Unrevealed card counts per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    red: usize,
    blue: usize,
}

impl Remaining {
    fn from_board(board: &Board) -> Self {
        Self {
            red: board.hidden_for(Team::Red),
            blue: board.hidden_for(Team::Blue),
        }
    }

    /// Cards `team` still has to find.
    pub fn get(self, team: Team) -> usize {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    fn slot(&mut self, team: Team) -> &mut usize {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    /// The team with strictly fewer cards left, or `None` on a tie.
    pub fn leader(self) -> Option<Team> {
        match self.red.cmp(&self.blue) {
            std::cmp::Ordering::Less => Some(Team::Red),
            std::cmp::Ordering::Greater => Some(Team::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Snapshot of the public game state.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameStatus {
    /// Team to act.
    current_team: Team,
    /// Turn phase.
    phase: Phase,
    /// Unrevealed cards per team.
    remaining: Remaining,
    /// Most recent accepted clue.
    last_clue: Option<Clue>,
    /// Guesses still allowed this turn.
    guesses_left: i64,
    /// The winner, once there is one.
    winner: Option<Team>,
    /// Whether the assassin has been revealed.
    assassin_revealed: bool,
}

/// One cell of a board projection.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CellView {
    /// The card's word.
    word: String,
    /// Whether it has been turned over.
    revealed: bool,
    /// The category, when the viewer is allowed to see it.
    category: Option<CardCategory>,
}

/// A single Codenames game.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    starting_team: Team,
    current_team: Team,
    phase: Phase,
    last_clue: Option<Clue>,
    current_clue: Option<Clue>,
    guess_limit: i64,
    guesses_made: i64,
    remaining: Remaining,
    winner: Option<Team>,
    assassin_revealed: bool,
}

impl Game {
    /// Starts a game on `board` with `starting_team` to give the first clue.
    #[instrument(skip(board))]
    pub fn new(board: Board, starting_team: Team) -> Self {
        let remaining = Remaining::from_board(&board);
        info!(red = remaining.red, blue = remaining.blue, "New game");
        Self {
            board,
            starting_team,
            current_team: starting_team,
            phase: Phase::AwaitClue,
            last_clue: None,
            current_clue: None,
            guess_limit: 0,
            guesses_made: 0,
            remaining,
            winner: None,
            assassin_revealed: false,
        }
    }

    /// Draws 25 words, picks a starting team and deals the categories.
    #[instrument(skip(pool, rng), fields(pool = pool.len()))]
    pub fn new_standard<R: Rng + ?Sized>(
        pool: &WordPool,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let starting_team = if rng.gen_bool(0.5) { Team::Red } else { Team::Blue };
        let words = pool.sample(BOARD_WORD_COUNT, rng)?;
        let categories = assign_categories(starting_team, rng);
        let board = Board::from_words(words, categories)?;
        Ok(Self::new(board, starting_team))
    }

    /// Accepts a clue from the current team's spymaster.
    ///
    /// # Errors
    ///
    /// Fails outside `AwaitClue`, or with [`GameError::InvalidClue`] when the
    /// clue breaks the rules.
    #[instrument(skip(self), fields(team = %self.current_team))]
    pub fn submit_clue(&mut self, clue: Clue) -> Result<(), GameError> {
        match self.phase {
            Phase::AwaitClue => {}
            Phase::AwaitGuess => return Err(GameError::ClueNotExpected),
            Phase::Finished => return Err(GameError::AlreadyFinished),
        }
        if self.winner.is_some() {
            return Err(GameError::AlreadyFinished);
        }

        let candidate = Clue::new(clue.word().trim(), clue.number());
        validate_clue(&candidate, self.board.words()).map_err(|e| {
            warn!(reason = %e, "Clue rejected");
            GameError::from(e)
        })?;

        let accepted = Clue::new(candidate.word().to_uppercase(), candidate.number());
        self.guess_limit = accepted.number().saturating_add(1);
        self.guesses_made = 0;
        self.last_clue = Some(accepted.clone());
        self.current_clue = Some(accepted);
        self.phase = Phase::AwaitGuess;

        debug!(guess_limit = self.guess_limit, "Clue accepted");
        Ok(())
    }

    /// Reveals the card at `position` for the current team.
    ///
    /// # Errors
    ///
    /// Fails outside `AwaitGuess` or when the card is already face up.
    #[instrument(skip(self), fields(team = %self.current_team, cell = %position))]
    pub fn make_guess(&mut self, position: Position) -> Result<GuessOutcome, GameError> {
        match self.phase {
            Phase::AwaitGuess => {}
            Phase::AwaitClue => return Err(GameError::NoActiveClue),
            Phase::Finished => return Err(GameError::AlreadyFinished),
        }
        if self.board.card(position).is_revealed() {
            return Err(GameError::AlreadyRevealed);
        }

        self.guesses_made += 1;
        let card: Card = self.board.reveal(position).clone();
        let category = card.category();

        let mut ended_turn = false;
        let mut team_won = None;
        let mut assassin_hit = false;

        match category {
            CardCategory::Assassin => {
                assassin_hit = true;
                team_won = Some(self.current_team.opponent());
                ended_turn = true;
            }
            CardCategory::Agent(owner) => {
                let left = self.remaining.slot(owner);
                *left -= 1;
                if *left == 0 {
                    team_won = Some(owner);
                    ended_turn = true;
                } else if owner != self.current_team || self.guesses_made >= self.guess_limit {
                    ended_turn = true;
                }
            }
            CardCategory::Neutral => ended_turn = true,
        }

        if let Some(winner) = team_won {
            info!(%winner, assassin = assassin_hit, "Game won");
            self.winner = Some(winner);
            self.assassin_revealed |= assassin_hit;
            self.phase = Phase::Finished;
            self.current_clue = None;
        } else if ended_turn {
            self.advance_turn();
        }

        debug!(%category, ended_turn, "Guess resolved");
        Ok(GuessOutcome::new(position, card, ended_turn, team_won, assassin_hit))
    }

    /// Guesses by word instead of by cell.
    pub fn guess_word(&mut self, word: &str) -> Result<GuessOutcome, GameError> {
        let position = self.board.find_word(word).ok_or(GameError::UnknownWord)?;
        self.make_guess(position)
    }

    /// Stops guessing and hands the turn to the other team.
    #[instrument(skip(self), fields(team = %self.current_team))]
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::AwaitGuess => {
                self.advance_turn();
                Ok(())
            }
            Phase::AwaitClue => Err(GameError::NoActiveTurn),
            Phase::Finished => Err(GameError::AlreadyFinished),
        }
    }

    /// Ends the game early: the team with fewer cards left wins, equal counts draw.
    ///
    /// Already finished games keep their result.
    #[instrument(skip(self))]
    pub fn finish_by_tiebreak(&mut self) -> Option<Team> {
        if self.phase == Phase::Finished {
            return self.winner;
        }
        self.winner = self.remaining.leader();
        self.phase = Phase::Finished;
        self.current_clue = None;
        self.guess_limit = 0;
        self.guesses_made = 0;
        info!(winner = ?self.winner, "Game ended by tie-break");
        self.winner
    }

    fn advance_turn(&mut self) {
        self.current_team = self.current_team.opponent();
        self.phase = Phase::AwaitClue;
        self.current_clue = None;
        self.guess_limit = 0;
        self.guesses_made = 0;
        debug!(next = %self.current_team, "Turn passed");
    }

    /// Guesses still allowed this turn.
    pub fn guesses_left(&self) -> i64 {
        if self.phase != Phase::AwaitGuess || self.current_clue.is_none() {
            return 0;
        }
        (self.guess_limit - self.guesses_made).max(0)
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Team that gave the first clue.
    pub fn starting_team(&self) -> Team {
        self.starting_team
    }

    /// Team to act.
    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// Turn phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The clue the operatives are working on, if any.
    pub fn current_clue(&self) -> Option<&Clue> {
        self.current_clue.as_ref()
    }

    /// Most recent accepted clue, kept across turns.
    pub fn last_clue(&self) -> Option<&Clue> {
        self.last_clue.as_ref()
    }

    /// Guess budget for this turn.
    pub fn guess_limit(&self) -> i64 {
        self.guess_limit
    }

    /// Guesses made this turn.
    pub fn guesses_made(&self) -> i64 {
        self.guesses_made
    }

    /// Unrevealed cards per team.
    pub fn remaining(&self) -> Remaining {
        self.remaining
    }

    /// The winner, once there is one.
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Whether the assassin has been revealed.
    pub fn assassin_revealed(&self) -> bool {
        self.assassin_revealed
    }

    /// Public status snapshot.
    pub fn status(&self) -> GameStatus {
        GameStatus {
            current_team: self.current_team,
            phase: self.phase,
            remaining: self.remaining,
            last_clue: self.last_clue.clone(),
            guesses_left: self.guesses_left(),
            winner: self.winner,
            assassin_revealed: self.assassin_revealed,
        }
    }

    /// The board as rows of cells. Categories of hidden cards show only in spymaster view.
    pub fn board_view(&self, spymaster: bool) -> Vec<Vec<CellView>> {
        let cells: Vec<CellView> = self
            .board
            .cells()
            .map(|(_, card)| CellView {
                word: card.word().to_string(),
                revealed: card.is_revealed(),
                category: (card.is_revealed() || spymaster).then_some(card.category()),
            })
            .collect();
        cells
            .chunks(crate::position::BOARD_SIZE)
            .map(<[CellView]>::to_vec)
            .collect()
    }
}
