//! Metric values as reported for a location.

use crate::catalog::MetricSpec;
use crate::ScoringError;
use qol_types::WalletAddress;
use serde::{Deserialize, Serialize};

/// Multiplier applied to verified-type metrics that reached quorum.
pub const VERIFIED_BONUS: f64 = 1.1;

/// How a metric's value is sourced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricDataType {
    /// Official or published statistics.
    Factual,
    /// Crowd-sourced observations confirmed by on-site verifiers.
    Verified,
    /// Official figures mixed with user reviews.
    Blended,
}

/// A single metric observation for a location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub category: String,
    pub data_type: MetricDataType,
    #[serde(default)]
    pub verification_required: bool,
    pub value: f64,
    pub max_value: f64,
    pub unit: String,
    #[serde(default)]
    pub verified_by: Vec<WalletAddress>,
    #[serde(default)]
    pub verification_count: u32,
    #[serde(default)]
    pub is_verified: bool,
}

impl Metric {
    /// Build an observation for a catalog metric.
    pub fn from_spec(spec: &MetricSpec, category: &str, value: f64) -> Result<Self, ScoringError> {
        let metric = Self {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            category: category.to_string(),
            data_type: spec.data_type,
            verification_required: spec.verification_required,
            value,
            max_value: spec.max_value,
            unit: spec.unit.to_string(),
            verified_by: Vec::new(),
            verification_count: 0,
            is_verified: false,
        };
        metric.validate()?;
        Ok(metric)
    }

    /// Attach verification state.
    pub fn with_verifications(mut self, verified_by: Vec<WalletAddress>, quorum: u32) -> Self {
        self.verification_count = verified_by.len() as u32;
        self.is_verified = self.verification_count >= quorum;
        self.verified_by = verified_by;
        self
    }

    /// Enforce `max_value > 0` and `0 <= value <= max_value`.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.max_value.is_finite() || self.max_value <= 0.0 {
            return Err(ScoringError::InvalidMaxValue {
                metric: self.id.clone(),
                max_value: self.max_value,
            });
        }
        if !self.value.is_finite() || self.value < 0.0 || self.value > self.max_value {
            return Err(ScoringError::ValueOutOfRange {
                metric: self.id.clone(),
                value: self.value,
                max_value: self.max_value,
            });
        }
        Ok(())
    }

    /// `value / max_value`, clamped to `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        if self.max_value <= 0.0 {
            return 0.0;
        }
        (self.value / self.max_value).clamp(0.0, 1.0)
    }

    /// Normalized value including the verification bonus, still within `[0, 1]`.
    pub fn scored_value(&self) -> f64 {
        let normalized = self.normalized();
        if self.data_type == MetricDataType::Verified && self.is_verified {
            (normalized * VERIFIED_BONUS).min(1.0)
        } else {
            normalized
        }
    }
}
