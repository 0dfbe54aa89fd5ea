//! # Performance Analyzer
//!
//! Per-category aggregation over a window of historical analysis
//! outcomes. Pure and deterministic; operates only on the in-memory
//! slice handed to it. Analyses without a score for a category simply
//! do not contribute a sample to it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::history::HistoricalAnalysis;
use crate::weights::Category;

/// Aggregated outcome of one category over the analyzed window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    /// Arithmetic mean of the available scores; 0 when there are none.
    pub average_score: f32,
    /// Number of analyses that reported a score for this category.
    pub count: usize,
}

/// Compute the mean score and sample count for each requested category.
pub fn analyze_performance(
    analyses: &[HistoricalAnalysis],
    categories: &[Category],
) -> HashMap<Category, CategoryPerformance> {
    let mut result = HashMap::with_capacity(categories.len());

    for &category in categories {
        let samples: Vec<f32> = analyses
            .iter()
            .filter_map(|a| a.category_scores.get(category))
            .collect();

        let count = samples.len();
        let average_score = if count > 0 {
            samples.iter().sum::<f32>() / count as f32
        } else {
            0.0
        };

        result.insert(
            category,
            CategoryPerformance {
                average_score,
                count,
            },
        );
    }

    result
}
