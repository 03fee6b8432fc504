// Heuristic evaluation of non-terminal states and exact scoring of
// terminal ones.
//
// All values are oriented so that higher is better for `game.me()`; the
// search's maximizing player is always the owning side of the `Game`.

use std::collections::VecDeque;

use crate::config::WeightsConfig;
use crate::game::Game;
use crate::types::{PlayerId, Position, Score, DRAW, LOSS, WIN};

/// Scores a two-player state for the maximizing side
pub trait Evaluator {
    fn evaluate(&self, game: &Game) -> Score;
}

/// Exact outcome when at least one player is immobilized, `None` otherwise.
///
/// A player who runs out of moves before the opponent pays the forfeit
/// penalty: it is subtracted from that player's consumed-fruit total before
/// the totals are compared. When both players are stuck the totals are
/// compared as-is. Draws score exactly `DRAW` (0.0) inside the continuous
/// range.
pub fn terminal_utility(game: &Game) -> Option<Score> {
    let me = game.me();
    let rival = me.rival();
    let my_moves = game.mobility(me);
    let rival_moves = game.mobility(rival);

    if my_moves > 0 && rival_moves > 0 {
        return None;
    }

    let mut my_total = game.score_of(me);
    let mut rival_total = game.score_of(rival);
    if my_moves == 0 && rival_moves > 0 {
        my_total -= game.penalty();
    } else if rival_moves == 0 && my_moves > 0 {
        rival_total -= game.penalty();
    }

    Some(if my_total > rival_total {
        WIN
    } else if my_total < rival_total {
        LOSS
    } else {
        DRAW
    })
}

/// Counts cells reachable from `pos` by breadth-first expansion, stopping
/// after `cap` cells have been expanded. The bound keeps evaluation cheap on
/// large boards; the visited set is a local buffer, so the board is never
/// mutated by evaluation.
pub fn reachable_cells(game: &Game, pos: Position, cap: usize) -> usize {
    let board = game.board();
    let mut visited = vec![false; board.size()];
    let flat = |p: Position| (p.row * board.width() + p.col) as usize;

    let mut queue = VecDeque::new();
    queue.push_back(pos);
    visited[flat(pos)] = true;

    let mut count = 0;
    while let Some(current) = queue.pop_front() {
        count += 1;
        if count >= cap {
            break;
        }
        for next in game.legal_moves_from(current) {
            if !visited[flat(next)] {
                visited[flat(next)] = true;
                queue.push_back(next);
            }
        }
    }

    count
}

/// Whether the rival can be reached from a player's position, ignoring the
/// rival's own cell as an obstacle. Used for estimating how many turns the
/// game can last (a shared region is split between the two players).
pub fn rival_reachable(game: &Game, player: PlayerId) -> bool {
    let board = game.board();
    let rival_pos = game.position_of(player.rival());
    let mut visited = vec![false; board.size()];
    let flat = |p: Position| (p.row * board.width() + p.col) as usize;

    let mut queue = VecDeque::new();
    let start = game.position_of(player);
    queue.push_back(start);
    visited[flat(start)] = true;

    while let Some(current) = queue.pop_front() {
        for dir in crate::types::Direction::all().iter() {
            let next = dir.apply(current);
            if !board.in_bounds(next) || visited[flat(next)] {
                continue;
            }
            if next == rival_pos {
                return true;
            }
            match board.get(next) {
                crate::board::Cell::Blocked | crate::board::Cell::Player(_) => {}
                _ => {
                    visited[flat(next)] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    false
}

/// The configurable composite evaluator. The former per-variant heuristics
/// (light, heavy, global-time) collapse into one weight set.
#[derive(Debug, Clone)]
pub struct WeightedEvaluator {
    weights: WeightsConfig,
}

impl WeightedEvaluator {
    pub fn new(weights: WeightsConfig) -> Self {
        WeightedEvaluator { weights }
    }
}

impl Evaluator for WeightedEvaluator {
    fn evaluate(&self, game: &Game) -> Score {
        if let Some(outcome) = terminal_utility(game) {
            return outcome;
        }

        let me = game.me();
        let rival = me.rival();
        let board = game.board();

        let bfs_cap = ((board.width().min(board.height()) as f64
            / self.weights.bfs_cap_divisor)
            .floor() as usize)
            .max(1);
        let reachable = reachable_cells(game, game.my_position(), bfs_cap) as f64;

        let rival_distance = game.my_position().manhattan_distance(game.rival_position()) as f64
            / board.size() as f64;

        let mobility_gap = (game.mobility(me) as f64 - game.mobility(rival) as f64) / 3.0;

        let fruit_gap = (game.score_of(me) - game.score_of(rival)) / game.penalty();

        self.weights.reachable * reachable - self.weights.rival_distance * rival_distance
            + self.weights.mobility * mobility_gap
            + self.weights.fruit_gap * fruit_gap
    }
}
