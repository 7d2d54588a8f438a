//! Summary statistics for training progress reports.
//!
//! - [`descriptive`] - Min, max, mean, median and spread of an `f32` sample

pub mod descriptive;
