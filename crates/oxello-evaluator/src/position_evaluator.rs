//! Position evaluation: how desirable a position is for one color.
//!
//! The score is a linear combination of eight hand-written heuristics, each
//! computed from `color`'s point of view (positive is good for `color`):
//!
//! ```text
//! score = Σ wᵢ·fᵢ    (w = weights of the phase selected by the empty-cell count)
//! ```
//!
//! | # | Feature | Raw value |
//! |---|---|---|
//! | 1 | Stone difference | own discs − opponent discs |
//! | 2 | Position weight | Σ table over own discs − Σ table over opponent discs |
//! | 3 | Stable stones | corners occupied by `color` |
//! | 4 | Mobility | own legal moves − opponent legal moves |
//! | 5 | Corner risk | −30 per own X-square, −15 per own C-square, next to an empty corner |
//! | 6 | Edge control | own edge discs, doubled on edges without opponent discs |
//! | 7 | Frontier discs | −(own discs with an empty neighbor) |
//! | 8 | Parity | +10 when the empty-cell count is even, else −10 |
//!
//! The constants are tuning targets: evolved weights are only meaningful
//! against exactly these feature scales.

use std::fmt;

use oxello_engine::{BitBoard, Color, GameState, Move};

use crate::weight_set::{FEATURE_COUNT, Feature, WeightSet};

/// Static positional value of each cell, indexed `[y][x]`.
pub const POSITION_TABLE: [[i32; 8]; 8] = [
    [100, -20, 10, 5, 5, 10, -20, 100],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [10, -2, 0, 0, 0, 0, -2, 10],
    [5, -2, 0, 0, 0, 0, -2, 5],
    [5, -2, 0, 0, 0, 0, -2, 5],
    [10, -2, 0, 0, 0, 0, -2, 10],
    [-20, -50, -2, -2, -2, -2, -50, -20],
    [100, -20, 10, 5, 5, 10, -20, 100],
];

const CORNERS: [Move; 4] = [
    Move::new(0, 0),
    Move::new(0, 7),
    Move::new(7, 0),
    Move::new(7, 7),
];

// Diagonal neighbor of each corner in `CORNERS`.
const X_SQUARES: [Move; 4] = [
    Move::new(1, 1),
    Move::new(1, 6),
    Move::new(6, 1),
    Move::new(6, 6),
];

// Edge neighbors of each corner in `CORNERS`.
const C_SQUARES: [[Move; 2]; 4] = [
    [Move::new(0, 1), Move::new(1, 0)],
    [Move::new(0, 6), Move::new(1, 7)],
    [Move::new(6, 0), Move::new(7, 1)],
    [Move::new(6, 7), Move::new(7, 6)],
];

const X_SQUARE_RISK: i32 = -30;
const C_SQUARE_RISK: i32 = -15;

// Edge cells between the corners: left, top, right and bottom.
const EDGE_RUNS: [u64; 4] = [
    0x0001_0101_0101_0100,
    0x0000_0000_0000_007e,
    0x0080_8080_8080_8000,
    0x7e00_0000_0000_0000,
];

const PARITY_BONUS: i32 = 10;

/// Scores positions from the point of view of one color (higher is better).
pub trait PositionEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, state: &GameState, color: Color) -> f32;
}

/// The weighted linear evaluation, using the [`WeightSet`] phase vector
/// selected by the position's empty-cell count.
///
/// # Example
///
/// ```
/// use oxello_engine::{Color, GameState};
/// use oxello_evaluator::{
///     position_evaluator::{PositionEvaluator, WeightedEvaluator},
///     weight_set::{WeightSet, WeightVector},
/// };
///
/// // Stone difference only
/// let weights = WeightSet::uniform(WeightVector::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
/// let evaluator = WeightedEvaluator::new(weights);
/// assert_eq!(evaluator.evaluate(&GameState::new(), Color::Black), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedEvaluator {
    weights: WeightSet,
}

impl WeightedEvaluator {
    #[must_use]
    pub fn new(weights: WeightSet) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }
}

impl PositionEvaluator for WeightedEvaluator {
    #[inline]
    fn evaluate(&self, state: &GameState, color: Color) -> f32 {
        evaluate(state, color, &self.weights)
    }
}

/// Evaluates `state` for `color` with the phase weights taken from `weights`.
#[must_use]
pub fn evaluate(state: &GameState, color: Color, weights: &WeightSet) -> f32 {
    weights
        .for_empty_count(state.empty_count())
        .dot(&feature_values(state, color))
}

/// Computes the raw value of every feature, in [`Feature::ALL`] order.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn feature_values(state: &GameState, color: Color) -> [f32; FEATURE_COUNT] {
    Feature::ALL.map(|feature| feature_value(state, color, feature) as f32)
}

#[must_use]
pub fn feature_value(state: &GameState, color: Color, feature: Feature) -> i32 {
    let board = state.board();
    match feature {
        Feature::StoneDifference => stone_difference(board, color),
        Feature::PositionWeight => position_weight(board, color),
        Feature::StableStones => stable_stones(board, color),
        Feature::Mobility => mobility(state, color),
        Feature::CornerRisk => corner_risk(board, color),
        Feature::EdgeControl => edge_control(board, color),
        Feature::FrontierDiscs => frontier_discs(board, color),
        Feature::Parity => parity(board),
    }
}

#[expect(clippy::cast_possible_wrap)]
fn signed(n: u32) -> i32 {
    n as i32
}

fn count(mask: u64) -> i32 {
    signed(mask.count_ones())
}

fn stone_difference(board: &BitBoard, color: Color) -> i32 {
    count(board.stones(color)) - count(board.stones(color.opponent()))
}

fn position_weight(board: &BitBoard, color: Color) -> i32 {
    let table_sum = |mut mask: u64| {
        let mut sum = 0;
        while mask != 0 {
            let mv = Move::from_index(mask.trailing_zeros() as usize);
            sum += POSITION_TABLE[mv.y()][mv.x()];
            mask &= mask - 1;
        }
        sum
    };
    table_sum(board.stones(color)) - table_sum(board.stones(color.opponent()))
}

/// Corners held by `color`: a cheap stand-in for full stability analysis.
fn stable_stones(board: &BitBoard, color: Color) -> i32 {
    let corners = CORNERS.iter().fold(0, |acc, mv| acc | mv.bit());
    count(board.stones(color) & corners)
}

fn mobility(state: &GameState, color: Color) -> i32 {
    signed(state.legal_move_count(color)) - signed(state.legal_move_count(color.opponent()))
}

fn corner_risk(board: &BitBoard, color: Color) -> i32 {
    let own = board.stones(color);
    let empties = board.empties();
    let mut risk = 0;
    for ((corner, x_square), c_squares) in CORNERS.iter().zip(X_SQUARES).zip(C_SQUARES) {
        if empties & corner.bit() == 0 {
            continue;
        }
        if own & x_square.bit() != 0 {
            risk += X_SQUARE_RISK;
        }
        for c_square in c_squares {
            if own & c_square.bit() != 0 {
                risk += C_SQUARE_RISK;
            }
        }
    }
    risk
}

fn edge_control(board: &BitBoard, color: Color) -> i32 {
    let own = board.stones(color);
    let opp = board.stones(color.opponent());
    EDGE_RUNS
        .iter()
        .map(|&run| {
            let own_count = count(own & run);
            if opp & run == 0 {
                own_count * 2
            } else {
                own_count
            }
        })
        .sum()
}

fn frontier_discs(board: &BitBoard, color: Color) -> i32 {
    let exposed = board.stones(color) & BitBoard::adjacent_cells(board.empties());
    -count(exposed)
}

fn parity(board: &BitBoard) -> i32 {
    if board.empty_count() % 2 == 0 {
        PARITY_BONUS
    } else {
        -PARITY_BONUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight_set::WeightVector;

    fn state(art: &str) -> GameState {
        GameState::from_board(BitBoard::from_ascii(art))
    }

    fn only(feature: Feature) -> WeightSet {
        let mut raw = [0.0; FEATURE_COUNT];
        raw[feature.index()] = 1.0;
        WeightSet::uniform(WeightVector::new(raw))
    }

    #[test]
    fn test_edge_run_masks() {
        let cells = |run: u64| {
            (0..64)
                .filter(|i| run & (1 << i) != 0)
                .map(|i| (i % 8, i / 8))
                .collect::<Vec<_>>()
        };
        assert_eq!(cells(EDGE_RUNS[0]), (1..7).map(|y| (0, y)).collect::<Vec<_>>());
        assert_eq!(cells(EDGE_RUNS[1]), (1..7).map(|x| (x, 0)).collect::<Vec<_>>());
        assert_eq!(cells(EDGE_RUNS[2]), (1..7).map(|y| (7, y)).collect::<Vec<_>>());
        assert_eq!(cells(EDGE_RUNS[3]), (1..7).map(|x| (x, 7)).collect::<Vec<_>>());
    }

    #[test]
    fn test_initial_position_features() {
        let state = GameState::new();
        let values = feature_values(&state, Color::Black);
        // stone diff, position, stable, mobility, corner risk, edge, frontier, parity
        assert_eq!(values, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -2.0, 10.0]);
    }

    #[test]
    fn test_stone_difference_and_position_weight() {
        let s = state(
            r"
            X.......
            .O......
            ........
            ...XX...
            ........
            ........
            ........
            .......O
            ",
        );
        assert_eq!(feature_value(&s, Color::Black, Feature::StoneDifference), 1);
        assert_eq!(feature_value(&s, Color::White, Feature::StoneDifference), -1);
        // black: 100 + 0 + 0; white: -50 + 100
        assert_eq!(feature_value(&s, Color::Black, Feature::PositionWeight), 50);
        assert_eq!(feature_value(&s, Color::White, Feature::PositionWeight), -50);
        assert_eq!(feature_value(&s, Color::Black, Feature::StableStones), 1);
        assert_eq!(feature_value(&s, Color::White, Feature::StableStones), 1);
    }

    #[test]
    fn test_corner_risk() {
        let s = state(
            r"
            .XO....X
            XX......
            ........
            ........
            ........
            ........
            ......X.
            X......O
            ",
        );
        // (0,0) empty: X-square (1,1) -30, C-squares (1,0) and (0,1) -30.
        // (7,0), (0,7) and (7,7) are occupied.
        assert_eq!(feature_value(&s, Color::Black, Feature::CornerRisk), -60);
        assert_eq!(feature_value(&s, Color::White, Feature::CornerRisk), 0);
    }

    #[test]
    fn test_edge_control() {
        let s = state(
            r"
            .XXX.O..
            X.......
            X.......
            ........
            ........
            .......O
            ........
            ..XX....
            ",
        );
        // top: 3 own with an opponent -> 3; left: 2 own clean -> 4;
        // right: 0; bottom: 2 own clean -> 4
        assert_eq!(feature_value(&s, Color::Black, Feature::EdgeControl), 11);
        // top: 1 own with opponents -> 1; right: 1 own clean -> 2
        assert_eq!(feature_value(&s, Color::White, Feature::EdgeControl), 3);
    }

    #[test]
    fn test_frontier_discs() {
        let s = state(
            r"
            XXX.....
            XXX.....
            XXX.....
            ........
            ........
            ........
            ........
            .......O
            ",
        );
        // every black disc except (0,0), (1,0), (0,1), (1,1) touches an empty cell
        assert_eq!(feature_value(&s, Color::Black, Feature::FrontierDiscs), -5);
        assert_eq!(feature_value(&s, Color::White, Feature::FrontierDiscs), -1);
    }

    #[test]
    fn test_parity_and_mobility() {
        let s = GameState::new();
        assert_eq!(feature_value(&s, Color::Black, Feature::Parity), 10);
        let mut odd = s;
        odd.try_place(Move::new(3, 2), Color::Black).unwrap();
        assert_eq!(feature_value(&odd, Color::White, Feature::Parity), -10);
        assert_eq!(
            feature_value(&odd, Color::Black, Feature::Mobility),
            signed(odd.legal_move_count(Color::Black)) - signed(odd.legal_move_count(Color::White))
        );
        assert_eq!(feature_value(&s, Color::White, Feature::Mobility), 0);
    }

    #[test]
    fn test_evaluate_uses_phase_weights() {
        let s = state(
            r"
            X.......
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        // 63 empties -> opening
        let weights = WeightSet::new(
            WeightVector::new([0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            WeightVector::ZERO,
            WeightVector::ZERO,
        );
        assert_eq!(evaluate(&s, Color::Black, &weights), 100.0);
        assert_eq!(evaluate(&s, Color::White, &weights), -100.0);

        let weights = WeightSet::new(
            WeightVector::ZERO,
            only(Feature::Parity).opening,
            WeightVector::ZERO,
        );
        assert_eq!(evaluate(&s, Color::Black, &weights), 0.0);
    }

    #[test]
    fn test_evaluate_is_linear_in_features() {
        let mut s = GameState::new();
        s.try_place(Move::new(3, 2), Color::Black).unwrap();
        s.try_place(Move::new(2, 2), Color::White).unwrap();
        let raw = [0.3, -0.2, 0.1, 0.4, -0.1, 0.25, 0.05, -0.35];
        let weights = WeightSet::uniform(WeightVector::new(raw));
        let expected: f32 = std::iter::zip(
            weights.opening.coefficients(),
            feature_values(&s, Color::White),
        )
        .map(|(w, f)| w * f)
        .sum();
        assert!((evaluate(&s, Color::White, &weights) - expected).abs() < 1e-4);

        let evaluator = WeightedEvaluator::new(weights);
        assert_eq!(
            evaluator.evaluate(&s, Color::White),
            evaluate(&s, Color::White, &weights)
        );
        assert_eq!(
            evaluate(&s, Color::Black, &only(Feature::StoneDifference)),
            feature_value(&s, Color::Black, Feature::StoneDifference) as f32
        );
    }
}
