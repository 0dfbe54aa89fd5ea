//! # Weight Model
//!
//! The four-category scoring-weight vector and its sum-to-100 invariant.
//!
//! - `Category` is the closed set of scoring categories; `Category::ALL`
//!   is the single iteration table every aggregation loops over, so a
//!   category can never be skipped or misspelled.
//! - `WeightSet` holds one weight per category. It is immutable by
//!   convention: every transformation returns a new value.
//! - `normalize` rescales an arbitrary non-negative weight set so the
//!   categories sum to 100, rounded to one decimal place.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Target sum of a valid weight set.
pub const TARGET_SUM: f32 = 100.0;

/// Absolute tolerance on the sum invariant.
pub const SUM_TOLERANCE: f32 = 0.01;

/// Scoring categories used by the document-analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Structural,
    Legal,
    Clarity,
    Abnt,
}

impl Category {
    /// Explicit iteration table: every per-category loop goes through this.
    pub const ALL: [Category; 4] = [
        Category::Structural,
        Category::Legal,
        Category::Clarity,
        Category::Abnt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structural => "structural",
            Category::Legal => "legal",
            Category::Clarity => "clarity",
            Category::Abnt => "abnt",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category scoring weights. Invariant: the four fields sum to 100
/// within [`SUM_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub structural: f32,
    pub legal: f32,
    pub clarity: f32,
    pub abnt: f32,
}

impl WeightSet {
    pub fn new(structural: f32, legal: f32, clarity: f32, abnt: f32) -> Self {
        Self {
            structural,
            legal,
            clarity,
            abnt,
        }
    }

    pub fn get(&self, category: Category) -> f32 {
        match category {
            Category::Structural => self.structural,
            Category::Legal => self.legal,
            Category::Clarity => self.clarity,
            Category::Abnt => self.abnt,
        }
    }

    /// Copy with one category's weight replaced.
    pub fn with_weight(&self, category: Category, value: f32) -> Self {
        let mut next = *self;
        match category {
            Category::Structural => next.structural = value,
            Category::Legal => next.legal = value,
            Category::Clarity => next.clarity = value,
            Category::Abnt => next.abnt = value,
        }
        next
    }

    pub fn sum(&self) -> f32 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Whether the sum invariant holds.
    pub fn is_valid(&self) -> bool {
        (self.sum() - TARGET_SUM).abs() < SUM_TOLERANCE
    }
}

/// Rescale a non-negative weight set proportionally so it sums to 100,
/// with each weight rounded to one decimal place.
///
/// Inputs already within tolerance are returned unchanged to avoid
/// needless rounding drift. A zero-sum input is rejected with
/// [`EngineError::ZeroWeightSum`] rather than dividing by zero.
///
/// The last category absorbs the rounding residue of the first three, so
/// the output sum lands on 100 exactly (up to float epsilon) and
/// `normalize` is idempotent.
pub fn normalize(weights: &WeightSet) -> Result<WeightSet, EngineError> {
    let sum = weights.sum();
    if sum <= f32::EPSILON {
        return Err(EngineError::ZeroWeightSum);
    }
    if (sum - TARGET_SUM).abs() < SUM_TOLERANCE {
        return Ok(*weights);
    }

    let factor = TARGET_SUM / sum;
    let structural = round1(weights.structural * factor);
    let legal = round1(weights.legal * factor);
    let clarity = round1(weights.clarity * factor);
    let abnt = round1(TARGET_SUM - structural - legal - clarity);

    Ok(WeightSet {
        structural,
        legal,
        clarity,
        abnt,
    })
}

/// Round to one decimal place.
fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
