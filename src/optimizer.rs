//! # Adaptive Optimizer
//!
//! Proposes bounded weight adjustments from historical outcomes.
//!
//! A category averaging below 70 is underperforming and gets its weight
//! raised by `(70 − avg) * 0.3`, capped at the configured maximum, after
//! which the whole set is renormalized so weight mass stays conserved.
//! The damping keeps a single noisy window from swinging the weights.
//! Categories with no samples at all in the window are exempt: their
//! zero-sample average reads as 0, but absence of evidence is not a
//! score and never drives an adjustment.
//!
//! Confidence decays both with small sample size (`n / 50`, saturating at
//! 0.95) and with high dispersion of the overall scores (population
//! standard deviation, treated as a proxy for unreliable history).

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::error::EngineError;
use crate::history::HistoricalAnalysis;
use crate::performance::analyze_performance;
use crate::weights::{normalize, Category, WeightSet};

/// Score below which a category counts as underperforming.
pub const UNDERPERFORMANCE_FLOOR: f32 = 70.0;

/// Upper bound on any confidence score.
pub const MAX_CONFIDENCE: f32 = 0.95;

/// Damping applied to the score deficit when deriving an adjustment.
const ADJUSTMENT_DAMPING: f32 = 0.3;

/// Fraction of an adjustment reported as expected score improvement.
const IMPROVEMENT_YIELD: f32 = 0.5;

/// Window size at which the sample-size term of confidence saturates.
const CONFIDENCE_SAMPLE_TARGET: f32 = 50.0;

/// Per-category record of a proposed adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryImprovement {
    pub category: Category,
    pub current_weight: f32,
    pub suggested_weight: f32,
    pub expected_improvement: f32,
}

/// Diagnostic optimization report. Computed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOptimization {
    pub suggested_weights: WeightSet,
    pub reasoning: String,
    pub confidence: f32,
    pub analysis_count: usize,
    pub improvements: Vec<CategoryImprovement>,
}

/// Propose adjusted weights for `current` given a window of historical
/// outcomes. A category no analysis in the window scored is left
/// untouched rather than treated as scoring 0.
pub fn optimize(
    analyses: &[HistoricalAnalysis],
    current: &WeightSet,
    config: &EngineConfig,
) -> Result<ParameterOptimization, EngineError> {
    let performance = analyze_performance(analyses, &Category::ALL);

    let mut suggested = *current;
    let mut improvements = Vec::new();
    let mut underperforming = Vec::new();

    for category in Category::ALL {
        let Some(perf) = performance.get(&category) else {
            continue;
        };
        // count == 0: never-measured category, no evidence to act on.
        if perf.count == 0 || perf.average_score >= UNDERPERFORMANCE_FLOOR {
            continue;
        }

        let deficit = UNDERPERFORMANCE_FLOOR - perf.average_score;
        let adjustment = (deficit * ADJUSTMENT_DAMPING).min(config.max_weight_adjustment);
        let current_weight = current.get(category);
        let suggested_weight = (current_weight + adjustment).min(100.0);

        improvements.push(CategoryImprovement {
            category,
            current_weight,
            suggested_weight,
            expected_improvement: adjustment * IMPROVEMENT_YIELD,
        });
        suggested = suggested.with_weight(category, suggested_weight);
        underperforming.push(category);
    }

    let suggested_weights = normalize(&suggested)?;
    let confidence = confidence_for(analyses);
    let reasoning = reasoning_for(analyses.len(), &underperforming);

    Ok(ParameterOptimization {
        suggested_weights,
        reasoning,
        confidence,
        analysis_count: analyses.len(),
        improvements,
    })
}

/// Confidence in `[0, 0.95]`: sample-size term times a dispersion
/// penalty over the overall scores. A window with no overall scores is
/// degenerate and yields 0.
fn confidence_for(analyses: &[HistoricalAnalysis]) -> f32 {
    let overall: Vec<f32> = analyses.iter().filter_map(|a| a.overall_score).collect();
    if analyses.is_empty() || overall.is_empty() {
        return 0.0;
    }

    let sample_term = (analyses.len() as f32 / CONFIDENCE_SAMPLE_TARGET).min(MAX_CONFIDENCE);

    let mean = overall.iter().sum::<f32>() / overall.len() as f32;
    let variance =
        overall.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / overall.len() as f32;
    let std_dev = variance.sqrt();

    (sample_term * (1.0 - std_dev / 100.0)).clamp(0.0, MAX_CONFIDENCE)
}

/// Human-readable summary for diagnostics; not machine-consumed.
fn reasoning_for(analysis_count: usize, underperforming: &[Category]) -> String {
    if underperforming.is_empty() {
        format!(
            "Based on {analysis_count} analyses; no category averaged below \
             {UNDERPERFORMANCE_FLOOR}, weights left unchanged."
        )
    } else {
        let names: Vec<&str> = underperforming.iter().map(|c| c.as_str()).collect();
        format!(
            "Based on {analysis_count} analyses; raised weight of underperforming \
             categories (avg < {UNDERPERFORMANCE_FLOOR}): {}.",
            names.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::CategoryScores;
    use crate::weights::{SUM_TOLERANCE, TARGET_SUM};
    use chrono::Utc;

    fn analysis(legal: f32, overall: f32) -> HistoricalAnalysis {
        HistoricalAnalysis {
            id: "a".into(),
            category_scores: CategoryScores {
                structural: Some(85.0),
                legal: Some(legal),
                clarity: Some(80.0),
                abnt: Some(90.0),
            },
            overall_score: Some(overall),
            finished_at: Utc::now(),
        }
    }

    fn window(n: usize, legal: f32, overall: f32) -> Vec<HistoricalAnalysis> {
        (0..n).map(|_| analysis(legal, overall)).collect()
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn damped_adjustment_for_underperforming_category() {
        // legal avg 50 -> deficit 20 -> adjustment min(15, 6) = 6.
        let analyses = window(60, 50.0, 75.0);
        let current = WeightSet::new(30.0, 30.0, 25.0, 15.0);
        let opt = optimize(&analyses, &current, &config()).unwrap();

        assert_eq!(opt.improvements.len(), 1);
        let imp = &opt.improvements[0];
        assert_eq!(imp.category, Category::Legal);
        assert!((imp.current_weight - 30.0).abs() < 1e-4);
        assert!((imp.suggested_weight - 36.0).abs() < 1e-4);
        assert!((imp.expected_improvement - 3.0).abs() < 1e-4);

        // Mass conserved after renormalization.
        assert!((opt.suggested_weights.sum() - TARGET_SUM).abs() < SUM_TOLERANCE);
        assert!(opt.suggested_weights.legal > current.legal);
    }

    #[test]
    fn adjustment_never_exceeds_configured_cap() {
        // Deficit 70 * 0.3 = 21 would exceed the cap of 15.
        let analyses = window(60, 0.0, 75.0);
        let current = WeightSet::new(30.0, 30.0, 25.0, 15.0);
        let cfg = config();
        let opt = optimize(&analyses, &current, &cfg).unwrap();

        let imp = &opt.improvements[0];
        let magnitude = imp.suggested_weight - imp.current_weight;
        assert!(magnitude <= cfg.max_weight_adjustment + 1e-4);
        assert!((magnitude - 15.0).abs() < 1e-4);
    }

    #[test]
    fn healthy_window_proposes_nothing() {
        let analyses = window(30, 85.0, 85.0);
        let current = WeightSet::new(30.0, 30.0, 25.0, 15.0);
        let opt = optimize(&analyses, &current, &config()).unwrap();

        assert!(opt.improvements.is_empty());
        assert_eq!(opt.suggested_weights, current);
        assert!(opt.reasoning.contains("no category"));
    }

    #[test]
    fn never_measured_category_is_not_adjusted() {
        // 60 entries that never score abnt. Its zero-sample average
        // reads as 0, but with every sampled category healthy nothing
        // is proposed and abnt keeps its weight.
        let mut analyses = window(60, 80.0, 80.0);
        for a in &mut analyses {
            a.category_scores.abnt = None;
        }
        let current = WeightSet::new(30.0, 30.0, 25.0, 15.0);
        let opt = optimize(&analyses, &current, &config()).unwrap();

        assert!(opt.improvements.is_empty());
        assert_eq!(opt.suggested_weights, current);
    }

    #[test]
    fn confidence_saturates_and_stays_clamped() {
        // Uniform scores -> zero dispersion; 60 >= 50 saturates sample term.
        let analyses = window(60, 80.0, 80.0);
        let opt = optimize(&analyses, &WeightSet::new(30.0, 30.0, 25.0, 15.0), &config()).unwrap();
        assert!((opt.confidence - MAX_CONFIDENCE).abs() < 1e-4);
    }

    #[test]
    fn confidence_decays_with_dispersion() {
        // Alternating 20/80 overall scores: mean 50, population stddev 30.
        let mut analyses = Vec::new();
        for i in 0..50 {
            let overall = if i % 2 == 0 { 20.0 } else { 80.0 };
            analyses.push(analysis(75.0, overall));
        }
        let opt = optimize(&analyses, &WeightSet::new(30.0, 30.0, 25.0, 15.0), &config()).unwrap();
        // 0.95 * (1 - 30/100) = 0.665
        assert!((opt.confidence - 0.665).abs() < 1e-3);
    }

    #[test]
    fn confidence_grows_with_sample_size() {
        let small = optimize(
            &window(10, 80.0, 80.0),
            &WeightSet::new(30.0, 30.0, 25.0, 15.0),
            &config(),
        )
        .unwrap();
        let large = optimize(
            &window(40, 80.0, 80.0),
            &WeightSet::new(30.0, 30.0, 25.0, 15.0),
            &config(),
        )
        .unwrap();
        assert!(small.confidence < large.confidence);
        assert!((small.confidence - 0.2).abs() < 1e-4);
        assert!((large.confidence - 0.8).abs() < 1e-4);
    }

    #[test]
    fn empty_window_is_degenerate() {
        let opt = optimize(&[], &WeightSet::new(30.0, 30.0, 25.0, 15.0), &config()).unwrap();
        assert_eq!(opt.confidence, 0.0);
        assert_eq!(opt.analysis_count, 0);
        assert!(opt.improvements.is_empty());
    }

    #[test]
    fn window_without_overall_scores_has_zero_confidence() {
        let mut analyses = window(20, 50.0, 0.0);
        for a in &mut analyses {
            a.overall_score = None;
        }
        let opt = optimize(&analyses, &WeightSet::new(30.0, 30.0, 25.0, 15.0), &config()).unwrap();
        assert_eq!(opt.confidence, 0.0);
        // Adjustments are still proposed; confidence gating is the
        // engine's call, not the optimizer's.
        assert!(!opt.improvements.is_empty());
    }
}
