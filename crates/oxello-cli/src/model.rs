use std::path::Path;

use chrono::{DateTime, Utc};
use oxello_evaluator::weight_set::WeightSet;
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained weight set as saved by `oxello train --output`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeightModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    pub generations: usize,
    pub weights: WeightSet,
}

/// Either a saved [`WeightModel`] or a bare weight set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WeightsEntry {
    Model(WeightModel),
    Weights(WeightSet),
}

impl WeightsEntry {
    pub fn weights(&self) -> &WeightSet {
        match self {
            Self::Model(model) => &model.weights,
            Self::Weights(weights) => weights,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Model(model) => Some(&model.name),
            Self::Weights(_) => None,
        }
    }

    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("weights", path)
    }
}

/// Predefined opponents for training.
///
/// Missing fields default to no enemies; `enemy_count` is the roster size after
/// padding with random weight sets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Roster {
    pub enemy_count: usize,
    pub enemies: Vec<WeightsEntry>,
}

impl Roster {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("roster", path)
    }

    pub fn weight_sets(&self) -> Vec<WeightSet> {
        self.enemies.iter().map(|e| *e.weights()).collect()
    }
}

/// A played game as saved by `oxello play --record`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub black: String,
    pub white: String,
    pub played_at: DateTime<Utc>,
    /// `"(x, y)"` per ply, `"pass"` for passes.
    pub moves: Vec<String>,
    pub final_board: oxello_engine::BitBoard,
    pub black_count: u32,
    pub white_count: u32,
}
