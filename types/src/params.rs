//! Reward and verification parameters.
//!
//! Defaults reproduce the live reward schedule; every field can be overridden
//! from the `[rewards]` table of the service configuration.

use crate::{QolAmount, QolError};
use serde::{Deserialize, Serialize};

/// One rung of the quality-bonus ladder: ratings whose standard deviation is
/// strictly below `max_std_dev` earn `bonus`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityTier {
    pub max_std_dev: f64,
    pub bonus: QolAmount,
}

/// All tunable reward parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardParams {
    // ── Submission ───────────────────────────────────────────────────────
    /// Flat reward for submitting an audit.
    pub submission_reward: QolAmount,

    // ── Verification ─────────────────────────────────────────────────────
    /// Base reward for verifying someone else's audit.
    pub verification_base_reward: QolAmount,

    /// Multiplier (basis points) for the first and the quorum-closing verification.
    pub first_last_multiplier_bps: u32,

    /// Number of independent verifications that finalizes an audit.
    pub quorum: u32,

    /// Maximum verifier distance from the audit's coordinates, inclusive.
    pub on_site_radius_m: f64,

    // ── Quality bonus ────────────────────────────────────────────────────
    /// Bonus when the dispersion is above every tier.
    pub quality_floor_bonus: QolAmount,

    /// Bonus ladder, ordered by ascending `max_std_dev`.
    pub quality_tiers: Vec<QualityTier>,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            submission_reward: QolAmount::from_whole(10),
            verification_base_reward: QolAmount::from_whole(5),
            first_last_multiplier_bps: 15_000,
            quorum: 3,
            on_site_radius_m: 200.0,
            quality_floor_bonus: QolAmount::from_whole(5),
            quality_tiers: vec![
                QualityTier {
                    max_std_dev: 0.3,
                    bonus: QolAmount::from_whole(15),
                },
                QualityTier {
                    max_std_dev: 0.7,
                    bonus: QolAmount::from_whole(10),
                },
            ],
        }
    }
}

impl RewardParams {
    /// Check internal consistency after loading from configuration.
    pub fn validate(&self) -> Result<(), QolError> {
        if self.quorum == 0 {
            return Err(QolError::Other("quorum must be at least 1".into()));
        }
        if !self.on_site_radius_m.is_finite() || self.on_site_radius_m <= 0.0 {
            return Err(QolError::Other(format!(
                "on-site radius must be positive, got {}",
                self.on_site_radius_m
            )));
        }
        let ascending = self
            .quality_tiers
            .windows(2)
            .all(|w| w[0].max_std_dev < w[1].max_std_dev);
        if !ascending {
            return Err(QolError::Other(
                "quality tiers must be ordered by ascending max_std_dev".into(),
            ));
        }
        Ok(())
    }
}
