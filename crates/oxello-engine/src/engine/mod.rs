//! Game rules on top of the [`BitBoard`](crate::BitBoard) representation.
//!
//! - [`GameState`] - legal moves, placement with flipping, terminal detection
//!
//! # Game Flow
//!
//! 1. Start from [`GameState::new`] (standard 4-disc center setup)
//! 2. The side to move picks one of [`GameState::legal_moves`]
//! 3. [`GameState::try_place`] puts the stone and flips every sandwiched run
//! 4. A side without legal moves passes
//! 5. The game ends when neither side can move ([`GameState::is_terminal`])

pub use self::game_state::*;

mod game_state;
