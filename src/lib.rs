// src/lib.rs
// Public library surface for integration tests (and embedding callers).

pub mod cache;
pub mod engine;
pub mod error;
pub mod history;
pub mod optimizer;
pub mod overrides;
pub mod params;
pub mod performance;
pub mod presets;
pub mod repos;
pub mod rules;
pub mod weights;

// ---- Re-exports for stable public API ----
pub use crate::engine::{EngineConfig, EngineStats, ParameterEngine, ENGINE_VERSION};
pub use crate::error::EngineError;
pub use crate::optimizer::ParameterOptimization;
pub use crate::params::{AdaptiveAdjustments, AnalysisParameters};
pub use crate::presets::Preset;
pub use crate::repos::{
    CustomOverrideReader, HistoryReader, OrgCategory, TenantProfile, TenantProfileReader,
};
pub use crate::weights::{normalize, Category, WeightSet};
