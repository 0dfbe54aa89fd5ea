//! # Custom Rule Compiler
//!
//! Expands the rule definitions stored inside active overrides into
//! executable rule descriptors for the analysis pipeline.
//!
//! - Output order follows input order (stable, for deterministic
//!   downstream consumption).
//! - Missing fields get defaults: pattern kind `regex`, weight `1`,
//!   active `true`.
//! - Regex patterns are validated up front; a rule whose pattern does
//!   not compile is skipped with a warning instead of poisoning the
//!   whole bundle.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::overrides::CustomOverride;
use crate::weights::Category;

/// How a rule's pattern is matched against document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Regex,
    Keyword,
    Phrase,
}

/// Severity assigned to findings produced by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Executable rule descriptor handed to the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pattern: String,
    pub pattern_kind: PatternKind,
    pub category: Category,
    pub severity: Severity,
    /// Document-type applicability; empty means "all types".
    pub applies_to: Vec<String>,
    pub active: bool,
    /// Contribution weight in `0..=10`.
    pub weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Maximum rule weight; stored values are clamped into `0..=MAX_RULE_WEIGHT`.
pub const MAX_RULE_WEIGHT: f32 = 10.0;

const DEFAULT_RULE_WEIGHT: f32 = 1.0;

/// Compile the rules of all active overrides, in input order.
pub fn compile_rules(overrides: &[CustomOverride]) -> Vec<CustomRule> {
    let mut compiled = Vec::new();

    for over in overrides.iter().filter(|o| o.is_active()) {
        for stored in &over.rules {
            let pattern_kind = stored.pattern_kind.unwrap_or(PatternKind::Regex);

            if pattern_kind == PatternKind::Regex {
                if let Err(err) = Regex::new(&stored.pattern) {
                    warn!(
                        rule = %stored.id,
                        override_id = %over.id,
                        error = %err,
                        "skipping custom rule with invalid regex pattern"
                    );
                    continue;
                }
            }

            compiled.push(CustomRule {
                id: stored.id.clone(),
                name: stored.name.clone(),
                description: stored.description.clone(),
                pattern: stored.pattern.clone(),
                pattern_kind,
                category: stored.category,
                severity: stored.severity,
                applies_to: stored.applies_to.clone(),
                active: stored.active.unwrap_or(true),
                weight: stored
                    .weight
                    .unwrap_or(DEFAULT_RULE_WEIGHT)
                    .clamp(0.0, MAX_RULE_WEIGHT),
                created_at: stored.created_at,
                updated_at: stored.updated_at,
            });
        }
    }

    compiled
}
