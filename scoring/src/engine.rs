//! Weighted score computation.

use crate::catalog::CATEGORIES;
use crate::location::{LocationSnapshot, MetricMap};
use crate::metric::Metric;
use serde::Serialize;
use std::fmt;

/// Overall Quality-of-Life score in `[0, 100]`.
///
/// Categories missing from the snapshot contribute nothing; a snapshot with no
/// catalog metrics at all scores 0.
pub fn score_location(location: &LocationSnapshot) -> u32 {
    let mut total = 0.0;
    let mut scored_any = false;

    for category in CATEGORIES {
        let Some(metrics) = location.metrics.get(category.id) else {
            continue;
        };
        let Some(avg) = average(metrics, Metric::scored_value) else {
            continue;
        };
        total += avg * category.weight;
        scored_any = true;
    }

    if !scored_any {
        return 0;
    }
    (total * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Unweighted category score in `[0, 100]`, without the verification bonus.
pub fn category_score(metrics: &MetricMap) -> Option<u32> {
    average(metrics, Metric::normalized).map(|avg| (avg * 100.0).round().clamp(0.0, 100.0) as u32)
}

fn average(metrics: &MetricMap, value: fn(&Metric) -> f64) -> Option<f64> {
    if metrics.is_empty() {
        return None;
    }
    let sum: f64 = metrics.values().map(value).sum();
    Some(sum / metrics.len() as f64)
}

/// Display band for a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Self::Excellent
        } else if score >= 60 {
            Self::Good
        } else if score >= 40 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(s)
    }
}

/// Per-category line of a [`ScoreReport`].
#[derive(Clone, Debug, Serialize)]
pub struct CategoryBreakdown {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: f64,
    /// `None` when the location reports no metrics for this category.
    pub score: Option<u32>,
    pub metric_count: usize,
}

/// Overall score plus the per-category breakdown shown next to it.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreReport {
    pub location_id: String,
    pub location_name: String,
    pub overall: u32,
    pub band: ScoreBand,
    pub categories: Vec<CategoryBreakdown>,
}

impl ScoreReport {
    pub fn for_location(location: &LocationSnapshot) -> Self {
        let overall = score_location(location);
        let categories = CATEGORIES
            .iter()
            .map(|c| {
                let metrics = location.metrics.get(c.id);
                CategoryBreakdown {
                    id: c.id,
                    name: c.name,
                    weight: c.weight,
                    score: metrics.and_then(category_score),
                    metric_count: metrics.map_or(0, MetricMap::len),
                }
            })
            .collect();
        Self {
            location_id: location.id.clone(),
            location_name: location.name.clone(),
            overall,
            band: ScoreBand::from_score(overall),
            categories,
        }
    }
}
