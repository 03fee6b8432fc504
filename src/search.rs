// Adversarial search: plain MiniMax and AlphaBeta pruning
//
// Both engines walk the same tree: children in generator order, each child
// scored as its own evaluation plus the backed-up value of the subtree below
// it, applied and undone in place on the shared `Game`. Every recursive
// descent is paired with exactly one undo on every exit path; the board
// would permanently desync from the real game otherwise.

use std::time::{Duration, Instant};

use crate::game::Game;
use crate::heuristics::Evaluator;
use crate::types::{Direction, Score, LOSS, WIN};

/// Wall-clock cutoff for a single decision, checked at every node entry.
/// Constructed fresh per `make_move` call and threaded by reference through
/// the recursion.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    start: Instant,
    limit: Duration,
    safety_buffer: Duration,
}

impl Budget {
    pub fn new(start: Instant, limit: Duration, safety_buffer: Duration) -> Self {
        Budget {
            start,
            limit,
            safety_buffer,
        }
    }

    /// True once elapsed time plus the safety buffer reaches the limit.
    /// Expired nodes become leaves regardless of depth, which is what makes
    /// the search an anytime algorithm.
    pub fn expired(&self) -> bool {
        self.start.elapsed() + self.safety_buffer >= self.limit
    }

    /// Time left before `expired` starts returning true
    pub fn remaining(&self) -> Duration {
        self.limit
            .saturating_sub(self.safety_buffer)
            .saturating_sub(self.start.elapsed())
    }
}

/// Backed-up result of a search call. The direction is present only when
/// the node was a maximizing ply with at least one candidate; minimizing
/// plies and cutoffs carry `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub score: Score,
    pub direction: Option<Direction>,
}

impl SearchOutcome {
    /// Depth cutoff, exhausted budget, or an immobilized mover: a neutral
    /// leaf. True win/loss detection happens in the evaluator when the
    /// position is scored as a child, not here.
    fn leaf() -> Self {
        SearchOutcome {
            score: 0.0,
            direction: None,
        }
    }
}

/// A depth-bounded adversarial search over a mutable shared game
pub trait SearchAlgo {
    /// Searches `depth` plies ahead. The maximizing ply moves `game.me()`,
    /// the minimizing ply moves the rival. Returns the backed-up score and,
    /// for maximizing roots, the best first move.
    fn search(
        &self,
        game: &mut Game,
        depth: u32,
        maximizing: bool,
        budget: Option<&Budget>,
    ) -> SearchOutcome;
}

/// Edge scores are summed along the path, except that a terminal verdict
/// (an infinite edge) dominates whatever the subtree below it reports.
fn add_scores(edge: Score, child: Score) -> Score {
    if edge.is_infinite() {
        edge
    } else {
        edge + child
    }
}

/// Keeps `current` unless `candidate` strictly improves on it. Equal scores
/// keep the first-seen candidate; together with the fixed generator order
/// this is the deterministic tie-break contract.
fn pick(
    current: Option<SearchOutcome>,
    candidate: SearchOutcome,
    maximizing: bool,
) -> Option<SearchOutcome> {
    match current {
        None => Some(candidate),
        Some(best) => {
            let improves = if maximizing {
                candidate.score > best.score
            } else {
                candidate.score < best.score
            };
            Some(if improves { candidate } else { best })
        }
    }
}

/// Plain depth-bounded MiniMax
pub struct Minimax<'e, E: Evaluator + ?Sized> {
    evaluator: &'e E,
}

impl<'e, E: Evaluator + ?Sized> Minimax<'e, E> {
    pub fn new(evaluator: &'e E) -> Self {
        Minimax { evaluator }
    }
}

impl<'e, E: Evaluator + ?Sized> SearchAlgo for Minimax<'e, E> {
    fn search(
        &self,
        game: &mut Game,
        depth: u32,
        maximizing: bool,
        budget: Option<&Budget>,
    ) -> SearchOutcome {
        if budget.map_or(false, |b| b.expired()) {
            return SearchOutcome::leaf();
        }

        let mover = if maximizing {
            game.me()
        } else {
            game.me().rival()
        };
        let pos = game.position_of(mover);
        let moves = game.legal_moves_from(pos);

        if depth == 0 || moves.is_empty() {
            return SearchOutcome::leaf();
        }

        let mut best: Option<SearchOutcome> = None;
        for next in moves {
            let direction = Direction::between(pos, next)
                .expect("move generator produced a non-adjacent destination");

            game.apply_move(pos, next);
            let edge = self.evaluator.evaluate(game);
            let child = self.search(game, depth - 1, !maximizing, budget);
            game.apply_move(next, pos);

            let candidate = SearchOutcome {
                score: add_scores(edge, child.score),
                direction: if maximizing { Some(direction) } else { None },
            };
            best = pick(best, candidate, maximizing);
        }

        best.expect("internal search node produced no candidates")
    }
}

/// MiniMax with alpha-beta pruning. Visits fewer nodes than `Minimax` but
/// backs up the same root score for any state and depth.
pub struct AlphaBeta<'e, E: Evaluator + ?Sized> {
    evaluator: &'e E,
}

impl<'e, E: Evaluator + ?Sized> AlphaBeta<'e, E> {
    pub fn new(evaluator: &'e E) -> Self {
        AlphaBeta { evaluator }
    }

    /// Rebases a bound into the child's score scale by subtracting the edge
    /// score just paid. Infinite bounds and terminal edges pass through
    /// untouched; pruning on an unshifted bound would not be
    /// score-preserving under edge accumulation.
    fn shift(bound: Score, edge: Score) -> Score {
        if bound.is_infinite() || edge.is_infinite() {
            bound
        } else {
            bound - edge
        }
    }

    fn search_bounded(
        &self,
        game: &mut Game,
        depth: u32,
        maximizing: bool,
        alpha: Score,
        beta: Score,
        budget: Option<&Budget>,
    ) -> SearchOutcome {
        if budget.map_or(false, |b| b.expired()) {
            return SearchOutcome::leaf();
        }

        let mover = if maximizing {
            game.me()
        } else {
            game.me().rival()
        };
        let pos = game.position_of(mover);
        let moves = game.legal_moves_from(pos);

        if depth == 0 || moves.is_empty() {
            return SearchOutcome::leaf();
        }

        let mut alpha = alpha;
        let mut beta = beta;
        let mut best: Option<SearchOutcome> = None;

        for next in moves {
            let direction = Direction::between(pos, next)
                .expect("move generator produced a non-adjacent destination");

            game.apply_move(pos, next);
            let edge = self.evaluator.evaluate(game);
            let child = self.search_bounded(
                game,
                depth - 1,
                !maximizing,
                Self::shift(alpha, edge),
                Self::shift(beta, edge),
                budget,
            );
            game.apply_move(next, pos);

            let candidate = SearchOutcome {
                score: add_scores(edge, child.score),
                direction: if maximizing { Some(direction) } else { None },
            };
            best = pick(best, candidate, maximizing);
            let running = best.as_ref().expect("just set").score;

            if maximizing {
                if running >= beta {
                    // Opponent already has a better alternative: the rest of
                    // the siblings cannot matter
                    return SearchOutcome {
                        score: WIN,
                        direction: best.and_then(|b| b.direction),
                    };
                }
                alpha = alpha.max(running);
            } else {
                if running <= alpha {
                    return SearchOutcome {
                        score: LOSS,
                        direction: None,
                    };
                }
                beta = beta.min(running);
            }
        }

        best.expect("internal search node produced no candidates")
    }
}

impl<'e, E: Evaluator + ?Sized> SearchAlgo for AlphaBeta<'e, E> {
    fn search(
        &self,
        game: &mut Game,
        depth: u32,
        maximizing: bool,
        budget: Option<&Budget>,
    ) -> SearchOutcome {
        self.search_bounded(game, depth, maximizing, LOSS, WIN, budget)
    }
}
