// Core types for the pursuit game

use serde::{Deserialize, Serialize};

/// 2D grid position (row-major, row 0 at the bottom of the loaded board)
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// Identifies one of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Index into per-player arrays and ledgers
    pub fn index(&self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The opposing player
    pub fn rival(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerId::One => "one",
            PlayerId::Two => "two",
        }
    }
}

/// Represents the four possible movement directions.
///
/// Enumeration order is +row, +col, -row, -col and is a documented contract:
/// the move generator emits candidates in this order, and equal-scored moves
/// are tie-broken by keeping the first one seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Right,
    Up,
    Left,
}

impl Direction {
    /// Returns all directions in the fixed enumeration order
    pub fn all() -> [Direction; 4] {
        [
            Direction::Down,
            Direction::Right,
            Direction::Up,
            Direction::Left,
        ]
    }

    /// The (row, col) offset of one step in this direction
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Converts direction to string representation for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Left => "left",
        }
    }

    /// Calculates the position one step away in this direction
    pub fn apply(&self, pos: Position) -> Position {
        let (dr, dc) = self.offset();
        Position::new(pos.row + dr, pos.col + dc)
    }

    /// The direction of a single orthogonal step from `from` to `to`,
    /// or `None` if the positions are not exactly one step apart
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::all()
            .iter()
            .find(|d| d.apply(from) == to)
            .copied()
    }
}

/// Backed-up search value: a finite heuristic score or one of the sentinels below
pub type Score = f64;

/// Proven win for the maximizing player
pub const WIN: Score = f64::INFINITY;
/// Proven loss for the maximizing player
pub const LOSS: Score = f64::NEG_INFINITY;
/// Drawn terminal state. Folds into the continuous score range rather than
/// using an out-of-band sentinel.
pub const DRAW: Score = 0.0;
