//! Move selection: adaptive iterative-deepening minimax with alpha-beta pruning.
//!
//! # How It Works
//!
//! [`SearchEngine::best_move`] searches from the current position:
//!
//! 1. **Generate** - Legal moves for the side to move (none means pass)
//! 2. **Depth** - `max_depth = scale / empty_cells + base` ([`AdaptiveDepth`]),
//!    deeper as the board fills and branching shrinks
//! 3. **Static Ordering** - Corners first, then other edge cells, then interior
//!    (stable, so scan order breaks ties)
//! 4. **Iterative Deepening** - For each depth `1..=max_depth`, score every root
//!    move with a `depth - 1` ply alpha-beta search and re-sort the moves by
//!    score; that order seeds the next depth
//! 5. **Select** - The first move after the last depth
//!
//! # Transposition Cache
//!
//! Each engine owns a cache keyed by `(board, remaining depth, side to move)`.
//! It lives as long as the engine, i.e. one side of one game, and is never
//! shared across sides or games. Values are stored as searched, without
//! alpha-beta bound information.
//!
//! # Pass Handling
//!
//! When the side to move at an inner node has no legal move, the node recurses
//! one ply shallower with the maximizing flag flipped and the same position.
//! A pass therefore consumes one ply of depth.

use std::{cmp::Ordering, collections::HashMap};

use arrayvec::ArrayVec;
use oxello_engine::{BitBoard, CELL_COUNT, Color, GameState, Move, MoveList};

use crate::position_evaluator::PositionEvaluator;

/// Search depth as a function of the number of empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveDepth {
    pub scale: u32,
    pub base: u32,
}

impl Default for AdaptiveDepth {
    fn default() -> Self {
        Self { scale: 50, base: 5 }
    }
}

impl AdaptiveDepth {
    /// Same depth for every position.
    #[must_use]
    pub const fn fixed(depth: u32) -> Self {
        Self {
            scale: 0,
            base: depth,
        }
    }

    /// Returns `floor(scale / empty_count) + base`.
    #[must_use]
    pub const fn max_depth(self, empty_count: u32) -> u32 {
        // a position with a legal move always has an empty cell
        let empty_count = if empty_count == 0 { 1 } else { empty_count };
        self.scale / empty_count + self.base
    }
}

/// Cheap static move score used for ordering: corner 100, edge 10, interior 0.
#[must_use]
pub const fn quick_heuristic(mv: Move) -> i32 {
    if mv.is_corner() {
        100
    } else if mv.is_edge() {
        10
    } else {
        0
    }
}

/// Sorts moves by [`quick_heuristic`], highest first, keeping scan order on ties.
pub fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|&mv| -quick_heuristic(mv));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    board: BitBoard,
    depth: u32,
    to_move: Color,
}

type ScoredMoves = ArrayVec<(Move, f32), CELL_COUNT>;

/// Plays moves for one side of one game.
///
/// # Example
///
/// ```
/// use oxello_engine::{Color, GameState};
/// use oxello_evaluator::{
///     position_evaluator::WeightedEvaluator,
///     search::{AdaptiveDepth, SearchEngine},
///     weight_set::{WeightSet, WeightVector},
/// };
///
/// let weights = WeightSet::uniform(WeightVector::new([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]));
/// let mut engine = SearchEngine::with_depth(WeightedEvaluator::new(weights), AdaptiveDepth::fixed(2));
///
/// let state = GameState::new();
/// let mv = engine.best_move(&state, Color::Black).unwrap();
/// assert!(state.can_place(mv, Color::Black));
/// ```
#[derive(Debug)]
pub struct SearchEngine<E> {
    evaluator: E,
    depth: AdaptiveDepth,
    cache: HashMap<CacheKey, f32>,
}

impl<E> SearchEngine<E>
where
    E: PositionEvaluator,
{
    /// Creates an engine with the default [`AdaptiveDepth`] and an empty cache.
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self::with_depth(evaluator, AdaptiveDepth::default())
    }

    #[must_use]
    pub fn with_depth(evaluator: E, depth: AdaptiveDepth) -> Self {
        Self {
            evaluator,
            depth,
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Number of positions stored in the transposition cache.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Selects the move for `color` in `state`, or `None` if `color` must pass.
    pub fn best_move(&mut self, state: &GameState, color: Color) -> Option<Move> {
        let mut order = state.legal_moves(color);
        if order.is_empty() {
            return None;
        }

        let max_depth = self.depth.max_depth(state.empty_count());
        order_moves(&mut order);

        for depth in 1..=max_depth {
            order = self.rank_root_moves(state, color, depth, &order);
        }

        let best = order.first().copied();
        log::debug!(
            "{color} best move {} (depth {max_depth}, {} cached positions)",
            best.map_or_else(|| "-".to_owned(), |mv| mv.to_string()),
            self.cache.len()
        );
        best
    }

    /// Scores every move of `order` at `depth` and returns them best first.
    ///
    /// Ties keep their position in `order`, so the ranking from the previous
    /// depth breaks ties at this one.
    fn rank_root_moves(
        &mut self,
        state: &GameState,
        color: Color,
        depth: u32,
        order: &[Move],
    ) -> MoveList {
        let mut scored: ScoredMoves = order
            .iter()
            .map(|&mv| {
                let mut next = *state;
                let placed = next.place(mv, color);
                debug_assert!(placed, "root move {mv} must be legal");
                let score = self.minimax(&next, depth - 1, f32::MIN, f32::MAX, false, color);
                (mv, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        log::trace!("depth {depth}: {scored:?}");
        scored.into_iter().map(|(mv, _)| mv).collect()
    }

    /// Alpha-beta minimax from `home`'s point of view.
    ///
    /// The side to move is `home` on maximizing nodes and its opponent otherwise.
    fn minimax(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: f32,
        mut beta: f32,
        maximizing: bool,
        home: Color,
    ) -> f32 {
        let to_move = if maximizing { home } else { home.opponent() };
        let key = CacheKey {
            board: *state.board(),
            depth,
            to_move,
        };
        if let Some(&value) = self.cache.get(&key) {
            return value;
        }

        let mut moves = state.legal_moves(to_move);
        let terminal = moves.is_empty() && !state.has_legal_move(to_move.opponent());
        if depth == 0 || terminal {
            let value = self.evaluator.evaluate(state, home);
            self.cache.insert(key, value);
            return value;
        }

        if moves.is_empty() {
            let value = self.minimax(state, depth - 1, alpha, beta, !maximizing, home);
            self.cache.insert(key, value);
            return value;
        }

        order_moves(&mut moves);
        let mut value = if maximizing { f32::MIN } else { f32::MAX };
        for mv in moves {
            let mut next = *state;
            let placed = next.place(mv, to_move);
            debug_assert!(placed, "generated move {mv} must be legal");
            let score = self.minimax(&next, depth - 1, alpha, beta, !maximizing, home);
            if maximizing {
                value = value.max(score);
                alpha = alpha.max(score);
            } else {
                value = value.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        self.cache.insert(key, value);
        value
    }
}
