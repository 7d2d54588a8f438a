//! Feature weights: one [`WeightVector`] per game [`Phase`], grouped in a [`WeightSet`].
//!
//! # Normalization
//!
//! Every [`WeightVector`] is L2-normalized when it is constructed, whatever the
//! source of its raw coefficients (random initialization, crossover, mutation,
//! or a roster file). This keeps weight magnitudes comparable across phases and
//! individuals and prevents the scale from drifting during evolution.
//!
//! A raw vector of all zeros cannot be normalized and stays the zero vector, which
//! makes every evaluation tie.
//!
//! # Phase Selection
//!
//! Phases are selected, never blended, by the number of empty cells:
//!
//! | Empty cells | Phase |
//! |---|---|
//! | 41..=64 | [`Phase::Opening`] |
//! | 21..=40 | [`Phase::Midgame`] |
//! | 0..=20 | [`Phase::Endgame`] |

use std::{fmt, iter};

use serde::{Deserialize, Serialize};

/// Number of evaluation features (coefficients per [`WeightVector`]).
pub const FEATURE_COUNT: usize = 8;

/// Number of genes in a [`WeightSet`] (3 phases x 8 features).
pub const GENE_COUNT: usize = Phase::ALL.len() * FEATURE_COUNT;

/// The evaluation features, in coefficient order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    StoneDifference,
    PositionWeight,
    StableStones,
    Mobility,
    CornerRisk,
    EdgeControl,
    FrontierDiscs,
    Parity,
}

impl Feature {
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::StoneDifference,
        Self::PositionWeight,
        Self::StableStones,
        Self::Mobility,
        Self::CornerRisk,
        Self::EdgeControl,
        Self::FrontierDiscs,
        Self::Parity,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StoneDifference => "Stone Difference",
            Self::PositionWeight => "Position Weight",
            Self::StableStones => "Stable Stone",
            Self::Mobility => "Mobility",
            Self::CornerRisk => "Corner Risk",
            Self::EdgeControl => "Edge Control",
            Self::FrontierDiscs => "Frontier Discs",
            Self::Parity => "Parity",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Game phase, selected by the number of remaining empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Opening,
    Midgame,
    Endgame,
}

impl Phase {
    pub const ALL: [Self; 3] = [Self::Opening, Self::Midgame, Self::Endgame];

    #[must_use]
    pub const fn from_empty_count(empty_count: u32) -> Self {
        match empty_count {
            41.. => Self::Opening,
            21..=40 => Self::Midgame,
            _ => Self::Endgame,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Midgame => "midgame",
            Self::Endgame => "endgame",
        }
    }
}

/// Eight unit-length (L2) evaluation coefficients for one phase.
///
/// # Example
///
/// ```
/// use oxello_evaluator::weight_set::{Feature, WeightVector};
///
/// let weights = WeightVector::new([3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
/// assert!((weights.length() - 1.0).abs() < 1e-6);
/// assert!((weights.get(Feature::PositionWeight) - 0.8).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; FEATURE_COUNT]", into = "[f32; FEATURE_COUNT]")]
pub struct WeightVector {
    coefficients: [f32; FEATURE_COUNT],
}

impl WeightVector {
    pub const ZERO: Self = Self {
        coefficients: [0.0; FEATURE_COUNT],
    };

    /// Creates a weight vector by dividing `raw` by its Euclidean norm.
    #[must_use]
    pub fn new(raw: [f32; FEATURE_COUNT]) -> Self {
        let length = l2_norm(&raw);
        if length == 0.0 {
            return Self::ZERO;
        }
        Self {
            coefficients: raw.map(|w| w / length),
        }
    }

    #[must_use]
    pub const fn coefficients(&self) -> &[f32; FEATURE_COUNT] {
        &self.coefficients
    }

    #[must_use]
    pub const fn get(&self, feature: Feature) -> f32 {
        self.coefficients[feature.index()]
    }

    /// Returns the Euclidean norm (1.0 except for the zero vector).
    #[must_use]
    pub fn length(&self) -> f32 {
        l2_norm(&self.coefficients)
    }

    /// Computes the weighted sum `Σ wᵢ·fᵢ` in feature order.
    #[must_use]
    pub fn dot(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        iter::zip(&self.coefficients, features)
            .map(|(w, f)| w * f)
            .sum()
    }
}

impl From<[f32; FEATURE_COUNT]> for WeightVector {
    fn from(raw: [f32; FEATURE_COUNT]) -> Self {
        Self::new(raw)
    }
}

impl From<WeightVector> for [f32; FEATURE_COUNT] {
    fn from(weights: WeightVector) -> Self {
        weights.coefficients
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.coefficients.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{w}")?;
        }
        Ok(())
    }
}

fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|w| w * w).sum::<f32>().sqrt()
}

/// One [`WeightVector`] per [`Phase`]: the genome evolved by training.
///
/// Serialized as `{ "opening": [8 floats], "midgame": [...], "endgame": [...] }`;
/// raw coefficients are normalized on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub opening: WeightVector,
    pub midgame: WeightVector,
    pub endgame: WeightVector,
}

impl WeightSet {
    pub const ZERO: Self = Self {
        opening: WeightVector::ZERO,
        midgame: WeightVector::ZERO,
        endgame: WeightVector::ZERO,
    };

    #[must_use]
    pub const fn new(opening: WeightVector, midgame: WeightVector, endgame: WeightVector) -> Self {
        Self {
            opening,
            midgame,
            endgame,
        }
    }

    /// Uses the same weights in every phase.
    #[must_use]
    pub const fn uniform(weights: WeightVector) -> Self {
        Self::new(weights, weights, weights)
    }

    #[must_use]
    pub const fn for_phase(&self, phase: Phase) -> &WeightVector {
        match phase {
            Phase::Opening => &self.opening,
            Phase::Midgame => &self.midgame,
            Phase::Endgame => &self.endgame,
        }
    }

    #[must_use]
    pub const fn for_empty_count(&self, empty_count: u32) -> &WeightVector {
        self.for_phase(Phase::from_empty_count(empty_count))
    }

    /// Flattens the set into phase-major genes (opening, midgame, endgame).
    #[must_use]
    pub fn to_genes(&self) -> [f32; GENE_COUNT] {
        let mut genes = [0.0; GENE_COUNT];
        for (chunk, phase) in iter::zip(genes.chunks_exact_mut(FEATURE_COUNT), Phase::ALL) {
            chunk.copy_from_slice(self.for_phase(phase).coefficients());
        }
        genes
    }

    /// Builds a set from phase-major genes, re-normalizing each phase vector.
    #[must_use]
    pub fn from_genes(genes: &[f32; GENE_COUNT]) -> Self {
        let phase = |i: usize| {
            let mut raw = [0.0; FEATURE_COUNT];
            raw.copy_from_slice(&genes[i * FEATURE_COUNT..][..FEATURE_COUNT]);
            WeightVector::new(raw)
        };
        Self::new(phase(0), phase(1), phase(2))
    }
}

impl fmt::Display for WeightSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phase) in Phase::ALL.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{},{}", phase.name(), self.for_phase(phase))?;
        }
        Ok(())
    }
}
