//! # Parameter Engine
//!
//! Façade sequencing the whole derivation: resolve preset → merge custom
//! weights → validate/fallback → compile rules → optionally run adaptive
//! optimization → stamp metadata → cache.
//!
//! Degradation policy: adaptive optimization is best-effort. Any failure
//! in it, or a confidence below the acceptance bar, silently falls back
//! to the base weights; callers only ever see a valid bundle or a
//! tenant-not-found / repository error.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ParameterCache};
use crate::error::EngineError;
use crate::history::HistoricalAnalysis;
use crate::optimizer::{optimize, ParameterOptimization};
use crate::overrides::{merge_custom_weights, CustomOverride};
use crate::params::{
    AdaptiveAdjustments, AnalysisParameters, CategoryDeltas, ParameterMetadata,
};
use crate::presets::{resolve_preset, Preset};
use crate::repos::{CustomOverrideReader, HistoryReader, TenantProfile, TenantProfileReader};
use crate::rules::compile_rules;
use crate::weights::WeightSet;

/// Stamped into every bundle's metadata.
pub const ENGINE_VERSION: &str = "1.0.0";

/// Adaptive suggestions below this confidence are discarded.
const ADAPTIVE_CONFIDENCE_FLOOR: f32 = 0.7;

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Master switch for the adaptive step.
    pub enable_adaptive_weights: bool,
    /// Minimum history size before the adaptive step runs.
    pub adaptation_threshold: usize,
    /// Cache entry lifetime.
    pub cache_ttl: Duration,
    /// Hard cap on any single per-category weight adjustment.
    pub max_weight_adjustment: f32,
    /// How many recent analyses to fetch per generation.
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_adaptive_weights: true,
            adaptation_threshold: 10,
            cache_ttl: Duration::from_secs(30 * 60),
            max_weight_adjustment: 15.0,
            history_limit: 50,
        }
    }
}

/// Snapshot returned by [`ParameterEngine::engine_stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub engine_version: String,
    pub config: EngineConfig,
    /// Entries currently held, fresh or not.
    pub cached_tenants: usize,
    /// Fresh/expired breakdown of those entries.
    pub cache: CacheStats,
}

/// Derives, caches, and adaptively tunes per-tenant analysis parameters.
pub struct ParameterEngine {
    tenants: Arc<dyn TenantProfileReader>,
    overrides: Arc<dyn CustomOverrideReader>,
    history: Arc<dyn HistoryReader>,
    cache: ParameterCache,
    config: EngineConfig,
}

impl ParameterEngine {
    /// Build an engine with its own cache. The cache lives and dies with
    /// the engine instance; there is no ambient global state.
    pub fn new(
        tenants: Arc<dyn TenantProfileReader>,
        overrides: Arc<dyn CustomOverrideReader>,
        history: Arc<dyn HistoryReader>,
        config: EngineConfig,
    ) -> Self {
        let cache = ParameterCache::new(config.cache_ttl);
        Self {
            tenants,
            overrides,
            history,
            cache,
            config,
        }
    }

    /// Return the parameter bundle for a tenant, generating and caching
    /// it on miss or expiry. `force_refresh` bypasses the cache read
    /// unconditionally.
    pub async fn generate_parameters(
        &self,
        tenant_id: &str,
        force_refresh: bool,
    ) -> Result<AnalysisParameters, EngineError> {
        if !force_refresh {
            if let Some(hit) = self.cache.get(tenant_id) {
                debug!(tenant = tenant_id, "parameter cache hit");
                return Ok(hit);
            }
        }
        debug!(tenant = tenant_id, force_refresh, "generating parameters");

        // The three sources are independent; fetch them concurrently.
        let (profile_res, overrides_res, history_res) = tokio::join!(
            self.tenants.find_by_id(tenant_id),
            self.overrides.find_by_tenant(tenant_id),
            self.history.find_recent(tenant_id, self.config.history_limit),
        );

        let profile = profile_res
            .map_err(EngineError::Repository)?
            .ok_or_else(|| EngineError::TenantNotFound(tenant_id.to_string()))?;
        let overrides = overrides_res.map_err(EngineError::Repository)?;
        let history = history_res.unwrap_or_else(|err| {
            // A missing history window only disables the adaptive step;
            // it must not fail the whole request.
            warn!(
                tenant = tenant_id,
                error = %err,
                "history fetch failed; proceeding with empty window"
            );
            Vec::new()
        });

        let parameters = self.build_parameters(&profile, &overrides, &history);
        self.cache.store(tenant_id, parameters.clone());
        Ok(parameters)
    }

    /// Compute a diagnostic optimization report for a tenant against the
    /// current weights: the cached bundle's if one is fresh, otherwise
    /// the base weights derived from preset and overrides. Never writes
    /// to the cache. A supplied `history` window is used as-is with no
    /// repository round-trip; otherwise the recent window is fetched.
    pub async fn optimize_parameters(
        &self,
        tenant_id: &str,
        history: Option<Vec<HistoricalAnalysis>>,
    ) -> Result<ParameterOptimization, EngineError> {
        let current = match self.cache.get(tenant_id) {
            Some(parameters) => parameters.weights,
            None => {
                let (profile_res, overrides_res) = tokio::join!(
                    self.tenants.find_by_id(tenant_id),
                    self.overrides.find_by_tenant(tenant_id),
                );
                let profile = profile_res
                    .map_err(EngineError::Repository)?
                    .ok_or_else(|| EngineError::TenantNotFound(tenant_id.to_string()))?;
                let overrides = overrides_res.map_err(EngineError::Repository)?;
                let (_, base_weights) = self.resolve_base(&profile, &overrides);
                base_weights
            }
        };

        let history = match history {
            Some(h) => h,
            None => self
                .history
                .find_recent(tenant_id, self.config.history_limit)
                .await
                .unwrap_or_else(|err| {
                    warn!(
                        tenant = tenant_id,
                        error = %err,
                        "history fetch failed for optimization report; using empty window"
                    );
                    Vec::new()
                }),
        };

        optimize(&history, &current, &self.config)
    }

    /// Flush one tenant's cache entry, or the whole cache.
    pub fn clear_cache(&self, tenant_id: Option<&str>) {
        self.cache.clear(tenant_id);
    }

    pub fn engine_stats(&self) -> EngineStats {
        let cache = self.cache.stats();
        EngineStats {
            engine_version: ENGINE_VERSION.to_string(),
            config: self.config.clone(),
            cached_tenants: cache.total_entries,
            cache,
        }
    }

    /// Synchronous core of a generation: everything after the fetches.
    fn build_parameters(
        &self,
        profile: &TenantProfile,
        overrides: &[CustomOverride],
        history: &[HistoricalAnalysis],
    ) -> AnalysisParameters {
        let (preset, base_weights) = self.resolve_base(profile, overrides);
        let custom_rules = compile_rules(overrides);
        let (weights, adaptive_adjustments) = self.maybe_adapt(profile, &base_weights, history);

        let config_version = overrides
            .iter()
            .map(|o| o.config_version)
            .max()
            .unwrap_or(1);

        let generated_at = Utc::now();
        let expires_at = generated_at
            + chrono::Duration::from_std(self.config.cache_ttl)
                .unwrap_or_else(|_| chrono::Duration::minutes(30));

        AnalysisParameters {
            tenant_id: profile.id.clone(),
            weights,
            custom_rules,
            preset,
            adaptive_adjustments,
            metadata: ParameterMetadata {
                config_version,
                engine_version: ENGINE_VERSION.to_string(),
                generated_at,
                expires_at,
            },
        }
    }

    /// Resolve the preset and the validated base weights: custom merge
    /// applied, falling back to the preset reference when the merged set
    /// breaks the sum invariant.
    fn resolve_base(
        &self,
        profile: &TenantProfile,
        overrides: &[CustomOverride],
    ) -> (Preset, WeightSet) {
        let preset = resolve_preset(profile, overrides);
        let reference = preset.reference_weights();

        let merged = merge_custom_weights(&reference, overrides);
        if merged.is_valid() {
            (preset, merged)
        } else {
            warn!(
                tenant = %profile.id,
                preset = %preset,
                sum = merged.sum(),
                "merged custom weights violate the sum invariant; falling back to preset weights"
            );
            (preset, reference)
        }
    }

    /// Run the adaptive step when enabled and the history volume clears
    /// the threshold. Best-effort: errors and low-confidence suggestions
    /// both degrade to the base weights.
    fn maybe_adapt(
        &self,
        profile: &TenantProfile,
        base_weights: &WeightSet,
        history: &[HistoricalAnalysis],
    ) -> (WeightSet, Option<AdaptiveAdjustments>) {
        if !self.config.enable_adaptive_weights || history.len() < self.config.adaptation_threshold
        {
            return (*base_weights, None);
        }

        match optimize(history, base_weights, &self.config) {
            Ok(opt) if opt.confidence >= ADAPTIVE_CONFIDENCE_FLOOR => {
                info!(
                    tenant = %profile.id,
                    confidence = opt.confidence,
                    analyses = opt.analysis_count,
                    "adaptive weight adjustment accepted"
                );
                let adjustments = AdaptiveAdjustments {
                    deltas: CategoryDeltas::between(base_weights, &opt.suggested_weights),
                    confidence: opt.confidence,
                    based_on_analyses: opt.analysis_count,
                    adjusted_at: Utc::now(),
                };
                (opt.suggested_weights, Some(adjustments))
            }
            Ok(opt) => {
                debug!(
                    tenant = %profile.id,
                    confidence = opt.confidence,
                    "adaptive suggestion below acceptance floor; keeping base weights"
                );
                (*base_weights, None)
            }
            Err(err) => {
                warn!(
                    tenant = %profile.id,
                    error = %err,
                    "adaptive optimization failed; keeping base weights"
                );
                (*base_weights, None)
            }
        }
    }
}
