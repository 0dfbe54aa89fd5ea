//! Shared fixtures for the engine integration tests: in-memory
//! repository fakes with call counters, plus history/override builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;

use adaptive_params::history::{CategoryScores, HistoricalAnalysis};
use adaptive_params::overrides::{CustomOverride, OverrideStatus};
use adaptive_params::repos::{
    CustomOverrideReader, HistoryReader, OrgCategory, TenantProfile, TenantProfileReader,
};
use adaptive_params::weights::WeightSet;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
});

/// Install the test tracing subscriber once per test binary.
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

pub fn profile(id: &str, category: OrgCategory) -> TenantProfile {
    TenantProfile {
        id: id.into(),
        name: format!("Tenant {id}"),
        category,
    }
}

/// Override with a wholesale replacement weight set.
pub fn weight_override(id: &str, weights: WeightSet, config_version: u32) -> CustomOverride {
    CustomOverride {
        id: id.into(),
        status: OverrideStatus::Active,
        is_default: true,
        weights: Some(weights),
        rules: Vec::new(),
        preset_hint: None,
        config_version,
        updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

/// Uniform history window: every entry carries the same per-category and
/// overall scores.
pub fn uniform_window(n: usize, legal: f32, overall: f32) -> Vec<HistoricalAnalysis> {
    (0..n)
        .map(|i| HistoricalAnalysis {
            id: format!("run-{i}"),
            category_scores: CategoryScores {
                structural: Some(85.0),
                legal: Some(legal),
                clarity: Some(80.0),
                abnt: Some(90.0),
            },
            overall_score: Some(overall),
            finished_at: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
        })
        .collect()
}

/// Window whose overall scores alternate between `low` and `high`,
/// giving a controlled dispersion for confidence tests.
pub fn alternating_window(n: usize, legal: f32, low: f32, high: f32) -> Vec<HistoricalAnalysis> {
    let mut window = uniform_window(n, legal, 0.0);
    for (i, entry) in window.iter_mut().enumerate() {
        entry.overall_score = Some(if i % 2 == 0 { low } else { high });
    }
    window
}

// --- In-memory repository fakes ---

pub struct InMemoryTenants {
    profiles: HashMap<String, TenantProfile>,
    pub calls: AtomicUsize,
}

impl InMemoryTenants {
    pub fn with(profiles: Vec<TenantProfile>) -> Arc<Self> {
        Arc::new(Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TenantProfileReader for InMemoryTenants {
    async fn find_by_id(&self, tenant_id: &str) -> anyhow::Result<Option<TenantProfile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profiles.get(tenant_id).cloned())
    }
}

pub struct InMemoryOverrides {
    by_tenant: HashMap<String, Vec<CustomOverride>>,
    pub calls: AtomicUsize,
}

impl InMemoryOverrides {
    pub fn empty() -> Arc<Self> {
        Self::with(HashMap::new())
    }

    pub fn with(by_tenant: HashMap<String, Vec<CustomOverride>>) -> Arc<Self> {
        Arc::new(Self {
            by_tenant,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn single(tenant_id: &str, overrides: Vec<CustomOverride>) -> Arc<Self> {
        Self::with(HashMap::from([(tenant_id.to_string(), overrides)]))
    }
}

#[async_trait]
impl CustomOverrideReader for InMemoryOverrides {
    async fn find_by_tenant(&self, tenant_id: &str) -> anyhow::Result<Vec<CustomOverride>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_tenant.get(tenant_id).cloned().unwrap_or_default())
    }
}

pub struct InMemoryHistory {
    by_tenant: HashMap<String, Vec<HistoricalAnalysis>>,
    pub calls: AtomicUsize,
}

impl InMemoryHistory {
    pub fn empty() -> Arc<Self> {
        Self::with(HashMap::new())
    }

    pub fn with(by_tenant: HashMap<String, Vec<HistoricalAnalysis>>) -> Arc<Self> {
        Arc::new(Self {
            by_tenant,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn single(tenant_id: &str, window: Vec<HistoricalAnalysis>) -> Arc<Self> {
        Self::with(HashMap::from([(tenant_id.to_string(), window)]))
    }
}

#[async_trait]
impl HistoryReader for InMemoryHistory {
    async fn find_recent(
        &self,
        tenant_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<HistoricalAnalysis>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut window = self.by_tenant.get(tenant_id).cloned().unwrap_or_default();
        window.truncate(limit);
        Ok(window)
    }
}

/// Override reader that always fails, for the non-recoverable path.
pub struct FailingOverrides;

#[async_trait]
impl CustomOverrideReader for FailingOverrides {
    async fn find_by_tenant(&self, _tenant_id: &str) -> anyhow::Result<Vec<CustomOverride>> {
        bail!("override store unreachable")
    }
}

/// History reader that always fails, for the recoverable path.
pub struct FailingHistory;

#[async_trait]
impl HistoryReader for FailingHistory {
    async fn find_recent(
        &self,
        _tenant_id: &str,
        _limit: usize,
    ) -> anyhow::Result<Vec<HistoricalAnalysis>> {
        bail!("history store unreachable")
    }
}
