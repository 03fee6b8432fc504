// Board and cell model
//
// The board is a row-major grid of cells. Integer cell codes from the CSV
// format are normalized into the `Cell` enum at construction time:
//   0 -> Empty, -1 -> Blocked, 1/2 -> Player, >2 -> Fruit (raw value encoding,
//   i.e. the code itself is the fruit's value).

use std::collections::HashMap;

use crate::types::{Direction, PlayerId, Position};

/// One cell of the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Plain passable cell
    Empty,
    /// Impassable cell: an initial wall or a visited-and-vacated trail cell.
    /// Trail cells are re-enterable only through the applier's retreat path,
    /// never proposed by the move generator.
    Blocked,
    /// Occupied by a player
    Player(PlayerId),
    /// Unconsumed fruit and its value
    Fruit(f64),
}

/// Rectangular grid of cells
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from raw numeric cell codes (one inner Vec per row,
    /// row 0 first). Validates that every row has the same width and that
    /// exactly one cell holds each player code.
    ///
    /// Returns the board, the initial fruit mapping, and the two start
    /// positions.
    pub fn from_codes(
        rows: &[Vec<f64>],
    ) -> Result<(Board, HashMap<Position, f64>, [Position; 2]), String> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err("board must have at least one row and one column".to_string());
        }

        let height = rows.len() as i32;
        let width = rows[0].len() as i32;

        let mut cells = Vec::with_capacity((width * height) as usize);
        let mut fruits = HashMap::new();
        let mut starts: [Option<Position>; 2] = [None, None];

        for (r, row) in rows.iter().enumerate() {
            if row.len() as i32 != width {
                return Err(format!(
                    "ragged board: row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    width
                ));
            }

            for (c, &code) in row.iter().enumerate() {
                let pos = Position::new(r as i32, c as i32);
                let cell = if code == 0.0 {
                    Cell::Empty
                } else if code == -1.0 {
                    Cell::Blocked
                } else if code == 1.0 {
                    if starts[0].replace(pos).is_some() {
                        return Err("illegal board: more than one start for player one".to_string());
                    }
                    Cell::Player(PlayerId::One)
                } else if code == 2.0 {
                    if starts[1].replace(pos).is_some() {
                        return Err("illegal board: more than one start for player two".to_string());
                    }
                    Cell::Player(PlayerId::Two)
                } else if code > 2.0 {
                    fruits.insert(pos, code);
                    Cell::Fruit(code)
                } else {
                    return Err(format!("unknown cell code {} at ({}, {})", code, r, c));
                };
                cells.push(cell);
            }
        }

        let starts = match starts {
            [Some(a), Some(b)] => [a, b],
            _ => return Err("illegal board: missing a player start location".to_string()),
        };

        let board = Board {
            width,
            height,
            cells,
        };
        Ok((board, fruits, starts))
    }

    /// Builds an all-empty board with players at the given positions.
    /// Convenience for tests and programmatic setups.
    pub fn empty(width: i32, height: i32, starts: [Position; 2]) -> Board {
        let mut board = Board {
            width,
            height,
            cells: vec![Cell::Empty; (width * height) as usize],
        };
        board.set(starts[0], Cell::Player(PlayerId::One));
        board.set(starts[1], Cell::Player(PlayerId::Two));
        board
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total cell count
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    /// Flat index of an in-bounds position
    fn idx(&self, pos: Position) -> usize {
        (pos.row * self.width + pos.col) as usize
    }

    pub fn get(&self, pos: Position) -> Cell {
        debug_assert!(self.in_bounds(pos), "position {:?} out of bounds", pos);
        self.cells[self.idx(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        debug_assert!(self.in_bounds(pos), "position {:?} out of bounds", pos);
        let i = self.idx(pos);
        self.cells[i] = cell;
    }

    /// Enumerates the legal one-step destinations from `pos` in the fixed
    /// direction order: in bounds, not blocked, not occupied by a player.
    /// Fruit and empty cells are both passable.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::all()
            .iter()
            .filter_map(|dir| {
                let next = dir.apply(pos);
                if !self.in_bounds(next) {
                    return None;
                }
                match self.get(next) {
                    Cell::Blocked | Cell::Player(_) => None,
                    Cell::Empty | Cell::Fruit(_) => Some(next),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rows: &[&[f64]]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_from_codes_builds_board_and_fruit_map() {
        let rows = codes(&[
            &[1.0, 0.0, 5.0],
            &[0.0, -1.0, 0.0],
            &[7.5, 0.0, 2.0],
        ]);
        let (board, fruits, starts) = Board::from_codes(&rows).unwrap();

        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 3);
        assert_eq!(starts[0], Position::new(0, 0));
        assert_eq!(starts[1], Position::new(2, 2));
        assert_eq!(board.get(Position::new(1, 1)), Cell::Blocked);
        assert_eq!(board.get(Position::new(0, 2)), Cell::Fruit(5.0));
        assert_eq!(fruits.get(&Position::new(2, 0)), Some(&7.5));
        assert_eq!(fruits.len(), 2);
    }

    #[test]
    fn test_from_codes_rejects_duplicate_starts() {
        let rows = codes(&[&[1.0, 1.0], &[0.0, 2.0]]);
        let err = Board::from_codes(&rows).unwrap_err();
        assert!(err.contains("more than one start"), "got: {}", err);
    }

    #[test]
    fn test_from_codes_rejects_missing_start() {
        let rows = codes(&[&[1.0, 0.0], &[0.0, 0.0]]);
        let err = Board::from_codes(&rows).unwrap_err();
        assert!(err.contains("missing a player start"), "got: {}", err);
    }

    #[test]
    fn test_from_codes_rejects_ragged_rows() {
        let rows = codes(&[&[1.0, 0.0], &[2.0]]);
        assert!(Board::from_codes(&rows).is_err());
    }

    #[test]
    fn test_neighbors_are_in_bounds_and_passable() {
        let rows = codes(&[
            &[1.0, -1.0, 0.0],
            &[0.0, 3.0, 0.0],
            &[0.0, 0.0, 2.0],
        ]);
        let (board, _, _) = Board::from_codes(&rows).unwrap();

        // Corner start: (0,1) is blocked, so only +row remains
        assert_eq!(board.neighbors(Position::new(0, 0)), vec![Position::new(1, 0)]);

        // Fruit cells are passable; players and blocked cells are not
        let from_center = board.neighbors(Position::new(1, 1));
        assert_eq!(
            from_center,
            vec![
                Position::new(2, 1),
                Position::new(1, 2),
                Position::new(1, 0),
            ],
            "neighbors follow the +row, +col, -row, -col order"
        );
    }

    #[test]
    fn test_neighbors_order_is_deterministic() {
        let board = Board::empty(5, 5, [Position::new(2, 2), Position::new(4, 4)]);
        let n = board.neighbors(Position::new(2, 2));
        assert_eq!(
            n,
            vec![
                Position::new(3, 2),
                Position::new(2, 3),
                Position::new(1, 2),
                Position::new(2, 1),
            ]
        );
    }
}
