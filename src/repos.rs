//! Collaborator interfaces: the three read-only repositories the engine
//! pulls from when generating parameters.
//!
//! Implementations live outside this crate (persistent store, HTTP
//! services, ...). Tests use in-memory fakes. All three traits are
//! object-safe and held as `Arc<dyn _>` by the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::history::HistoricalAnalysis;
use crate::overrides::CustomOverride;

/// Organizational classification of a tenant, used by the preset resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgCategory {
    /// Oversight/control bodies (comptrollers, inspectorates).
    OversightBody,
    /// Courts of accounts / audit institutions.
    AuditCourt,
    /// General government entities (ministries, secretariats).
    GovernmentAgency,
    /// Municipal administrations.
    Municipality,
    /// State-owned or mixed-capital enterprises.
    PublicEnterprise,
    /// Technical institutes and regulatory agencies.
    TechnicalInstitute,
    Other,
}

/// Minimal tenant profile as exposed by the profile repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantProfile {
    pub id: String,
    pub name: String,
    pub category: OrgCategory,
}

/// Read access to tenant profiles. `None` means the tenant does not
/// exist, which is fatal for parameter generation.
#[async_trait]
pub trait TenantProfileReader: Send + Sync {
    async fn find_by_id(&self, tenant_id: &str) -> anyhow::Result<Option<TenantProfile>>;
}

/// Read access to a tenant's stored custom overrides.
#[async_trait]
pub trait CustomOverrideReader: Send + Sync {
    async fn find_by_tenant(&self, tenant_id: &str) -> anyhow::Result<Vec<CustomOverride>>;
}

/// Read access to recent analysis outcomes, most-recent-first.
#[async_trait]
pub trait HistoryReader: Send + Sync {
    async fn find_recent(
        &self,
        tenant_id: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<HistoricalAnalysis>>;
}
