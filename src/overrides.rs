//! Tenant custom overrides: stored weight sets and rule definitions, plus
//! the primary-override selection and wholesale weight merge.
//!
//! Merge policy: exactly one "primary" override applies. The one flagged
//! as default wins; otherwise the most recently updated one does. Ties on
//! the update timestamp fall back to the identifier so the choice stays
//! stable across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presets::Preset;
use crate::rules::{PatternKind, Severity};
use crate::weights::{Category, WeightSet};

/// Lifecycle status of a stored override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverrideStatus {
    Active,
    Inactive,
    Archived,
}

/// Raw rule definition as stored inside an override. Optional fields are
/// filled with defaults by the rule compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pattern: String,
    #[serde(default)]
    pub pattern_kind: Option<PatternKind>,
    pub category: Category,
    pub severity: Severity,
    /// Document-type applicability filter; empty means "all types".
    #[serde(default)]
    pub applies_to: Vec<String>,
    #[serde(default)]
    pub active: Option<bool>,
    /// Rule weight in `0..=10`.
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One stored custom-configuration record for a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOverride {
    pub id: String,
    pub status: OverrideStatus,
    #[serde(default)]
    pub is_default: bool,
    /// Replacement weight set; absent overrides contribute rules only.
    #[serde(default)]
    pub weights: Option<WeightSet>,
    #[serde(default)]
    pub rules: Vec<StoredRule>,
    /// Declared preset kind, if any. `CUSTOM` forces preset resolution.
    #[serde(default)]
    pub preset_hint: Option<Preset>,
    /// Monotonic configuration version; the bundle metadata carries the
    /// max across all overrides seen.
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    pub updated_at: DateTime<Utc>,
}

fn default_config_version() -> u32 {
    1
}

impl CustomOverride {
    pub fn is_active(&self) -> bool {
        self.status == OverrideStatus::Active
    }
}

/// Select the primary override among the active ones.
///
/// Default-flagged beats non-default; within a group, most recent
/// `updated_at` wins; identifier breaks remaining ties.
pub fn primary_override(overrides: &[CustomOverride]) -> Option<&CustomOverride> {
    overrides
        .iter()
        .filter(|o| o.is_active())
        .max_by(|a, b| {
            a.is_default
                .cmp(&b.is_default)
                .then(a.updated_at.cmp(&b.updated_at))
                .then(a.id.cmp(&b.id))
        })
}

/// Apply the primary override's weights, if any, on top of `base`.
/// Replacement is wholesale, never blended.
pub fn merge_custom_weights(base: &WeightSet, overrides: &[CustomOverride]) -> WeightSet {
    match primary_override(overrides).and_then(|o| o.weights) {
        Some(weights) => weights,
        None => *base,
    }
}
