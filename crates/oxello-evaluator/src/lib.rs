//! Move selection and game evaluation for Othello.
//!
//! The evaluator is layered:
//!
//! - [`weight_set`] - Phase-dependent feature weights ([`weight_set::WeightSet`])
//! - [`position_evaluator`] - Static scoring of a single position
//! - [`search`] - Alpha-beta move selection on top of a position evaluator
//! - [`match_runner`] - Complete games between two weight sets and their fitness
//!
//! Weight sets are what the training crate evolves; everything above them is
//! deterministic for a given pair of weight sets.

pub mod match_runner;
pub mod position_evaluator;
pub mod search;
pub mod weight_set;
