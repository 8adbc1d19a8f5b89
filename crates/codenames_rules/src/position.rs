//! Grid coordinates and human-readable board labels.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 5;

/// Column letters used in board labels, left to right.
pub const COLUMN_LABELS: [char; BOARD_SIZE] = ['A', 'B', 'C', 'D', 'E'];

/// A zero-based `(row, col)` cell on the 5×5 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: usize,
    col: usize,
}

/// Unchecked wire form; deserialization goes through [`Position::new`].
#[derive(Deserialize)]
struct RawPosition {
    row: usize,
    col: usize,
}

impl TryFrom<RawPosition> for Position {
    type Error = PositionError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.col)
    }
}

/// Errors from building a position.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PositionError {
    /// Row or column lies outside the grid.
    #[display("Position ({row}, {col}) is outside the 5x5 board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
    /// The label is not a column letter followed by a row digit.
    #[display("Cell label must include column letter and row number")]
    MalformedLabel,
    /// Column letter outside A-E.
    #[display("Column must be between A and E")]
    BadColumn,
    /// Row digit outside 1-5.
    #[display("Row must be between 1 and 5")]
    BadRow,
}

impl Position {
    /// Creates a position, rejecting coordinates off the board.
    pub fn new(row: usize, col: usize) -> Result<Self, PositionError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(PositionError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// Zero-based row.
    pub fn row(self) -> usize {
        self.row
    }

    /// Zero-based column.
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major index into a flat 25-cell array.
    pub fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// Inverse of [`Position::index`]. Callers guarantee `index < 25`.
    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        }
    }

    /// Every cell, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).map(Self::from_index)
    }

    /// The column letter and one-based row, e.g. `A3` for row 2, column 0.
    pub fn label(self) -> String {
        format!("{}{}", COLUMN_LABELS[self.col], self.row + 1)
    }

    /// Parses a board label such as `c4` or ` B2 `.
    #[instrument]
    pub fn from_label(label: &str) -> Result<Self, PositionError> {
        let label = label.trim().to_ascii_uppercase();
        let mut chars = label.chars();
        let (Some(column), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(PositionError::MalformedLabel);
        };

        let col = COLUMN_LABELS
            .iter()
            .position(|c| *c == column)
            .ok_or(PositionError::BadColumn)?;
        let row = row
            .to_digit(10)
            .map(|d| d as usize)
            .filter(|d| (1..=BOARD_SIZE).contains(d))
            .ok_or(PositionError::BadRow)?;

        Ok(Self { row: row - 1, col })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_for_corners() {
        assert_eq!(Position::new(0, 0).unwrap().label(), "A1");
        assert_eq!(Position::new(4, 4).unwrap().label(), "E5");
        assert_eq!(Position::from_label("a3").unwrap(), Position::new(2, 0).unwrap());
    }

    #[test]
    fn rejects_bad_labels() {
        assert_eq!(Position::from_label("F1"), Err(PositionError::BadColumn));
        assert_eq!(Position::from_label("A6"), Err(PositionError::BadRow));
        assert_eq!(Position::from_label("A0"), Err(PositionError::BadRow));
        assert_eq!(Position::from_label("A"), Err(PositionError::MalformedLabel));
        assert_eq!(Position::from_label("A10"), Err(PositionError::MalformedLabel));
    }

    #[test]
    fn all_is_row_major() {
        let cells: Vec<_> = Position::all().collect();
        assert_eq!(cells.len(), 25);
        assert_eq!(cells[1], Position::new(0, 1).unwrap());
        assert_eq!(cells[5], Position::new(1, 0).unwrap());
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        assert!(Position::new(5, 0).is_err());
        assert!(Position::new(0, 5).is_err());
    }
}
