// Shared game state: board, player positions, fruit ledger
//
// A single `Game` is threaded mutably through the entire search recursion.
// `apply_move` is exactly invertible (calling it with the arguments swapped
// restores the prior state bit-for-bit), which is what lets the search
// explore a move and back it out without copying the board per node.

use std::collections::HashMap;

use crate::board::{Board, Cell};
use crate::types::{PlayerId, Position};

/// Tracks fruit values: unconsumed fruits on the board plus one consumed
/// ledger per player. A position appears in at most one of the three maps;
/// the multiset of values across them is invariant under apply/undo.
#[derive(Debug, Clone, Default)]
pub struct FruitLedger {
    on_board: HashMap<Position, f64>,
    eaten: [HashMap<Position, f64>; 2],
}

impl FruitLedger {
    pub fn new(on_board: HashMap<Position, f64>) -> Self {
        FruitLedger {
            on_board,
            eaten: [HashMap::new(), HashMap::new()],
        }
    }

    /// Unconsumed fruit value at a position, if any
    pub fn on_board(&self, pos: Position) -> Option<f64> {
        self.on_board.get(&pos).copied()
    }

    pub fn unconsumed(&self) -> &HashMap<Position, f64> {
        &self.on_board
    }

    /// Total value consumed by a player so far
    pub fn score(&self, player: PlayerId) -> f64 {
        self.eaten[player.index()].values().sum()
    }

    /// Sum of every tracked fruit value, consumed or not. Constant across
    /// any sequence of moves and undos.
    pub fn total_value(&self) -> f64 {
        self.on_board.values().sum::<f64>()
            + self.eaten[0].values().sum::<f64>()
            + self.eaten[1].values().sum::<f64>()
    }

    fn consume(&mut self, pos: Position, player: PlayerId) {
        if let Some(value) = self.on_board.remove(&pos) {
            self.eaten[player.index()].insert(pos, value);
        }
    }

    /// Moves the record for a vacated cell back to the board, whichever
    /// player's ledger holds it. Returns the restored value, if any.
    fn restore(&mut self, pos: Position) -> Option<f64> {
        let value = self.eaten[0]
            .remove(&pos)
            .or_else(|| self.eaten[1].remove(&pos))?;
        self.on_board.insert(pos, value);
        Some(value)
    }
}

/// The full two-player game state from one player's point of view.
///
/// `me` names the side this instance plays (the maximizer during search);
/// both players' moves are applied through the same `apply_move`.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    positions: [Position; 2],
    fruits: FruitLedger,
    me: PlayerId,
    penalty: f64,
}

impl Game {
    pub fn new(
        board: Board,
        starts: [Position; 2],
        fruits: HashMap<Position, f64>,
        me: PlayerId,
        penalty: f64,
    ) -> Self {
        Game {
            board,
            positions: starts,
            fruits: FruitLedger::new(fruits),
            me,
            penalty,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn me(&self) -> PlayerId {
        self.me
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn position_of(&self, player: PlayerId) -> Position {
        self.positions[player.index()]
    }

    pub fn my_position(&self) -> Position {
        self.position_of(self.me)
    }

    pub fn rival_position(&self) -> Position {
        self.position_of(self.me.rival())
    }

    pub fn fruits(&self) -> &FruitLedger {
        &self.fruits
    }

    /// Consumed-fruit total for a player
    pub fn score_of(&self, player: PlayerId) -> f64 {
        self.fruits.score(player)
    }

    /// Legal one-step destinations from an arbitrary position, in the
    /// fixed direction order
    pub fn legal_moves_from(&self, pos: Position) -> Vec<Position> {
        self.board.neighbors(pos)
    }

    /// Legal one-step destinations for a player's current position
    pub fn legal_moves(&self, player: PlayerId) -> Vec<Position> {
        self.legal_moves_from(self.position_of(player))
    }

    /// Number of immediately available moves for a player
    pub fn mobility(&self, player: PlayerId) -> usize {
        self.legal_moves(player).len()
    }

    /// Applies one move on the shared board.
    ///
    /// `from` must hold a player and `to` must not hold a player; violating
    /// either is a caller bug and fails fatally. A destination that is not
    /// blocked is a forward move: the vacated cell becomes blocked trail and
    /// a fruit at the destination is credited to the mover. A blocked
    /// destination is a retreat: the vacated cell is restored to whatever the
    /// ledgers record for it (fruit back on the board, or plain empty).
    ///
    /// Calling `apply_move(to, from)` immediately afterwards undoes the move
    /// exactly.
    pub fn apply_move(&mut self, from: Position, to: Position) {
        let mover = match self.board.get(from) {
            Cell::Player(p) => p,
            other => panic!(
                "illegal move: {:?} holds {:?}, not a player",
                from, other
            ),
        };
        assert!(
            !matches!(self.board.get(to), Cell::Player(_)),
            "illegal move: destination {:?} is occupied",
            to
        );

        if self.board.get(to) == Cell::Blocked {
            // Retreating along the trail: restore whatever was under `from`
            let restored = match self.fruits.restore(from) {
                Some(value) => Cell::Fruit(value),
                None => Cell::Empty,
            };
            self.board.set(from, restored);
        } else {
            // Moving forward: leave trail behind, credit any fruit eaten
            self.board.set(from, Cell::Blocked);
            self.fruits.consume(to, mover);
        }

        self.board.set(to, Cell::Player(mover));
        self.positions[mover.index()] = to;
    }

    /// Replaces the unconsumed fruit mapping (the turn loop announces the
    /// authoritative set each round, e.g. after fruits expire) and resyncs
    /// the grid: stale fruit cells revert to empty, new fruits appear on
    /// empty cells.
    pub fn update_fruits(&mut self, fruits: HashMap<Position, f64>) {
        for (pos, _) in self.fruits.on_board.clone() {
            if !fruits.contains_key(&pos) {
                if let Cell::Fruit(_) = self.board.get(pos) {
                    self.board.set(pos, Cell::Empty);
                }
            }
        }
        for (&pos, &value) in &fruits {
            if self.board.get(pos) == Cell::Empty {
                self.board.set(pos, Cell::Fruit(value));
            }
        }
        self.fruits.on_board = fruits;
    }
}

#[cfg(test)]
impl Game {
    /// Direct board access for staging test positions
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Credits a fruit value straight into a player's consumed ledger,
    /// bypassing movement. Test staging only.
    pub(crate) fn credit_fruit(&mut self, player: PlayerId, pos: Position, value: f64) {
        self.fruits.eaten[player.index()].insert(pos, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::types::PlayerId::{One, Two};

    fn small_game() -> Game {
        // 3x3, player one at (0,0), player two at (2,2), fruit 10 at (0,1)
        let board = Board::empty(3, 3, [Position::new(0, 0), Position::new(2, 2)]);
        let mut fruits = HashMap::new();
        fruits.insert(Position::new(0, 1), 10.0);
        let mut game = Game::new(
            board,
            [Position::new(0, 0), Position::new(2, 2)],
            fruits.clone(),
            One,
            300.0,
        );
        game.update_fruits(fruits);
        game
    }

    #[test]
    fn test_forward_move_leaves_trail_and_credits_fruit() {
        let mut game = small_game();
        let from = Position::new(0, 0);
        let to = Position::new(0, 1);

        game.apply_move(from, to);

        assert_eq!(game.board().get(from), Cell::Blocked);
        assert_eq!(game.board().get(to), Cell::Player(One));
        assert_eq!(game.position_of(One), to);
        assert_eq!(game.score_of(One), 10.0);
        assert_eq!(game.fruits().on_board(to), None);
    }

    #[test]
    fn test_retreat_restores_fruit() {
        let mut game = small_game();
        let start = Position::new(0, 0);
        let fruit = Position::new(0, 1);
        let beyond = Position::new(0, 2);

        game.apply_move(start, fruit);
        game.apply_move(fruit, beyond);
        assert_eq!(game.score_of(One), 10.0);

        // Step back over the eaten fruit cell: value returns to the board
        game.apply_move(beyond, fruit);
        assert_eq!(game.score_of(One), 10.0, "still standing on the fruit cell");
        game.apply_move(fruit, start);
        assert_eq!(game.score_of(One), 0.0);
        assert_eq!(game.board().get(fruit), Cell::Fruit(10.0));
        assert_eq!(game.fruits().on_board(fruit), Some(10.0));
    }

    #[test]
    fn test_apply_then_reverse_restores_state() {
        let mut game = small_game();
        let before_board: Vec<Cell> = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| game.board().get(Position::new(r, c)))
            .collect();
        let before_total = game.fruits().total_value();

        let from = Position::new(0, 0);
        let to = Position::new(0, 1);
        game.apply_move(from, to);
        game.apply_move(to, from);

        let after_board: Vec<Cell> = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| game.board().get(Position::new(r, c)))
            .collect();

        assert_eq!(before_board, after_board, "undo must restore every cell");
        assert_eq!(game.fruits().total_value(), before_total);
        assert_eq!(game.position_of(One), from);
        assert_eq!(game.score_of(One), 0.0);
    }

    #[test]
    fn test_fruit_conservation_across_moves() {
        let mut game = small_game();
        let total = game.fruits().total_value();

        game.apply_move(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(game.fruits().total_value(), total);
        game.apply_move(Position::new(2, 2), Position::new(2, 1));
        assert_eq!(game.fruits().total_value(), total);
        game.apply_move(Position::new(0, 1), Position::new(1, 1));
        assert_eq!(game.fruits().total_value(), total);
    }

    #[test]
    #[should_panic(expected = "illegal move")]
    fn test_moving_from_unowned_cell_panics() {
        let mut game = small_game();
        game.apply_move(Position::new(1, 1), Position::new(1, 2));
    }

    #[test]
    #[should_panic(expected = "destination")]
    fn test_moving_onto_player_panics() {
        let board = Board::empty(2, 2, [Position::new(0, 0), Position::new(0, 1)]);
        let mut game = Game::new(
            board,
            [Position::new(0, 0), Position::new(0, 1)],
            HashMap::new(),
            One,
            300.0,
        );
        game.apply_move(Position::new(0, 0), Position::new(0, 1));
    }

    #[test]
    fn test_update_fruits_resyncs_cells() {
        let mut game = small_game();

        // Fruit expires: cell reverts to empty
        game.update_fruits(HashMap::new());
        assert_eq!(game.board().get(Position::new(0, 1)), Cell::Empty);
        assert!(game.fruits().unconsumed().is_empty());

        // New fruit appears on an empty cell
        let mut fresh = HashMap::new();
        fresh.insert(Position::new(1, 1), 4.0);
        game.update_fruits(fresh);
        assert_eq!(game.board().get(Position::new(1, 1)), Cell::Fruit(4.0));
    }

    #[test]
    fn test_mobility_counts_open_neighbors() {
        let game = small_game();
        assert_eq!(game.mobility(One), 2, "corner start has two open neighbors");
        assert_eq!(game.mobility(Two), 2);
    }
}
