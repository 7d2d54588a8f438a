//! Othello/Reversi rules: bit-packed board, move generation and move application.
//!
//! - [`BitBoard`] - two 64-bit occupancy masks (black, white)
//! - [`GameState`] - legal moves, placement with flipping, terminal detection
//! - [`Move`] / [`MoveList`] - board coordinates produced by move generation
//!
//! # Example
//!
//! ```
//! use oxello_engine::{Color, GameState};
//!
//! let mut state = GameState::new();
//! let moves = state.legal_moves(Color::Black);
//! assert_eq!(moves.len(), 4);
//!
//! state.try_place(moves[0], Color::Black).unwrap();
//! assert_eq!(state.score(), (4, 1));
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("illegal move {mv} for {color}")]
pub struct IllegalMoveError {
    pub mv: Move,
    pub color: Color,
}
