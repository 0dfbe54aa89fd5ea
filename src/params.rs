//! The parameter bundle returned to callers, plus its metadata and the
//! adaptive-adjustment block. Bundles are created fresh on every cache
//! miss and superseded, never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presets::Preset;
use crate::rules::CustomRule;
use crate::weights::{Category, WeightSet};

/// Per-category delta between the base and the adaptively adjusted
/// weight set. Deltas sum to ~0 because both sets sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryDeltas {
    pub structural: f32,
    pub legal: f32,
    pub clarity: f32,
    pub abnt: f32,
}

impl CategoryDeltas {
    /// Deltas taking `base` to `adjusted`.
    pub fn between(base: &WeightSet, adjusted: &WeightSet) -> Self {
        Self {
            structural: adjusted.structural - base.structural,
            legal: adjusted.legal - base.legal,
            clarity: adjusted.clarity - base.clarity,
            abnt: adjusted.abnt - base.abnt,
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
}

/// Accepted adaptive adjustment. Present on a bundle only when the
/// optimizer acted and its confidence cleared the acceptance bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveAdjustments {
    pub deltas: CategoryDeltas,
    /// Confidence in `[0, 0.95]`.
    pub confidence: f32,
    /// Number of historical analyses the adjustment was based on.
    pub based_on_analyses: usize,
    pub adjusted_at: DateTime<Utc>,
}

/// Versioning and lifetime metadata stamped onto every bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMetadata {
    /// Max of the override config versions seen, or 1.
    pub config_version: u32,
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// The engine's output: everything a document-analysis run needs for one
/// tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParameters {
    pub tenant_id: String,
    pub weights: WeightSet,
    pub custom_rules: Vec<CustomRule>,
    pub preset: Preset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive_adjustments: Option<AdaptiveAdjustments>,
    pub metadata: ParameterMetadata,
}
