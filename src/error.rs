//! Typed errors for the parameter engine.
//!
//! Callers only ever see two failure shapes: a missing tenant or an
//! infrastructure failure in one of the collaborator repositories.
//! Adaptive-optimization problems are recovered internally and never
//! surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The tenant profile lookup returned nothing. Fatal for the request;
    /// there is no preset to fall back to without a profile.
    #[error("tenant not found: {0}")]
    TenantNotFound(String),

    /// A collaborator repository failed (tenant profile or custom
    /// overrides). History-fetch failures are recovered to an empty
    /// window instead and never reach this variant.
    #[error("repository failure: {0}")]
    Repository(anyhow::Error),

    /// A weight set summed to zero, so proportional rescaling is
    /// undefined. Raised instead of silently propagating NaN/inf.
    #[error("weight set sums to zero and cannot be normalized")]
    ZeroWeightSum,
}
