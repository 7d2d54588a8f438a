//! Full games between two weight sets, and the fitness derived from them.
//!
//! A match always starts from the standard initial position with Black to move.
//! Each side gets its own freshly built [`SearchEngine`], so transposition caches
//! never outlive the match. A side with no legal move passes; the match ends
//! as soon as neither side can move.
//!
//! # Fitness
//!
//! ```text
//! margin  = own_stones - opponent_stones
//! fitness = margin              if margin >= 0
//!         = margin - empty      if margin <  0
//! ```
//!
//! Losing with cells still empty (an early wipeout) is penalized further.

use oxello_engine::{Color, GameState, Move};

use crate::{
    position_evaluator::WeightedEvaluator,
    search::{AdaptiveDepth, SearchEngine},
    weight_set::WeightSet,
};

/// One ply of a match, reported to observers after it is applied.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    /// Zero-based ply number. Passes count as plies.
    pub ply: usize,
    pub color: Color,
    /// `None` when `color` passed.
    pub mv: Option<Move>,
    /// Position after the ply.
    pub state: &'a GameState,
}

/// Final state of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub final_state: GameState,
    pub plies: usize,
    pub passes: usize,
}

impl MatchOutcome {
    /// Stones of `color` minus stones of its opponent.
    #[must_use]
    pub fn margin(&self, color: Color) -> i32 {
        let (own, opp) = self.counts(color);
        signed(own) - signed(opp)
    }

    /// Fitness of the match from `color`'s point of view. See [`game_fitness`].
    #[must_use]
    pub fn fitness(&self, color: Color) -> f32 {
        let (own, opp) = self.counts(color);
        game_fitness(own, opp, self.final_state.empty_count())
    }

    /// The side with more stones, or `None` on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        match self.margin(Color::Black) {
            0 => None,
            m if m > 0 => Some(Color::Black),
            _ => Some(Color::White),
        }
    }

    fn counts(&self, color: Color) -> (u32, u32) {
        let board = self.final_state.board();
        (board.count(color), board.count(color.opponent()))
    }
}

/// Stone margin, minus the remaining empty cells when the margin is negative.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn game_fitness(own: u32, opponent: u32, empty: u32) -> f32 {
    let margin = signed(own) - signed(opponent);
    let fitness = if margin < 0 {
        margin - signed(empty)
    } else {
        margin
    };
    fitness as f32
}

#[expect(clippy::cast_possible_wrap)]
const fn signed(n: u32) -> i32 {
    n as i32
}

/// Plays complete games between two weight sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchRunner {
    depth: AdaptiveDepth,
}

impl MatchRunner {
    #[must_use]
    pub const fn new(depth: AdaptiveDepth) -> Self {
        Self { depth }
    }

    #[must_use]
    pub const fn depth(&self) -> AdaptiveDepth {
        self.depth
    }

    /// Plays a game with `black` moving first.
    #[must_use]
    pub fn play(&self, black: &WeightSet, white: &WeightSet) -> MatchOutcome {
        self.play_observed(black, white, |_| {})
    }

    /// Like [`play`](Self::play), calling `observe` after every ply.
    pub fn play_observed<F>(&self, black: &WeightSet, white: &WeightSet, mut observe: F) -> MatchOutcome
    where
        F: FnMut(&Turn<'_>),
    {
        let mut black_engine = SearchEngine::with_depth(WeightedEvaluator::new(*black), self.depth);
        let mut white_engine = SearchEngine::with_depth(WeightedEvaluator::new(*white), self.depth);

        let mut state = GameState::new();
        let mut color = Color::Black;
        let mut plies = 0;
        let mut passes = 0;

        while !state.is_terminal() {
            let engine = match color {
                Color::Black => &mut black_engine,
                Color::White => &mut white_engine,
            };
            let mv = engine.best_move(&state, color);
            match mv {
                Some(mv) => {
                    let placed = state.place(mv, color);
                    debug_assert!(placed, "search returned illegal move {mv}");
                }
                None => passes += 1,
            }
            observe(&Turn {
                ply: plies,
                color,
                mv,
                state: &state,
            });
            plies += 1;
            color = color.opponent();
        }

        let (black_count, white_count) = state.score();
        log::debug!(
            "match finished after {plies} plies ({passes} passes): black {black_count}, white {white_count}"
        );
        MatchOutcome {
            final_state: state,
            plies,
            passes,
        }
    }
}
