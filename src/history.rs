//! Historical analysis outcomes consumed by the performance analyzer.
//!
//! Scores are explicitly optional: older runs may predate a category or
//! have skipped the overall roll-up, and the "missing sample" case is a
//! first-class branch downstream, not an implicit fallthrough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::weights::Category;

/// Per-category scores of one past analysis run, each in `[0, 100]`
/// when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub structural: Option<f32>,
    pub legal: Option<f32>,
    pub clarity: Option<f32>,
    pub abnt: Option<f32>,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> Option<f32> {
        match category {
            Category::Structural => self.structural,
            Category::Legal => self.legal,
            Category::Clarity => self.clarity,
            Category::Abnt => self.abnt,
        }
    }
}

/// One completed document-analysis run, as handed back by the history
/// repository (most-recent-first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAnalysis {
    pub id: String,
    pub category_scores: CategoryScores,
    pub overall_score: Option<f32>,
    pub finished_at: DateTime<Utc>,
}
