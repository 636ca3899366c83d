//! Prometheus metrics for the QoL service.
//!
//! [`ServiceMetrics`] owns a dedicated [`Registry`]; [`ServiceMetrics::encode`]
//! renders it in the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

/// Central collection of all service-level Prometheus metrics.
pub struct ServiceMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub audits_submitted: IntCounter,
    pub verifications_accepted: IntCounter,
    /// Verifications refused by a guard (self, duplicate, off-site, ...).
    pub verifications_rejected: IntCounter,
    pub quorums_reached: IntCounter,
    /// Reward records created, of any kind.
    pub rewards_issued: IntCounter,
    pub transfer_failures: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Rewards currently awaiting settlement.
    pub pending_rewards: IntGauge,
}

impl ServiceMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let audits_submitted = register_int_counter_with_registry!(
            Opts::new("qol_audits_submitted_total", "Total audits submitted"),
            registry
        )
        .expect("failed to register audits_submitted counter");

        let verifications_accepted = register_int_counter_with_registry!(
            Opts::new(
                "qol_verifications_accepted_total",
                "Total verifications accepted"
            ),
            registry
        )
        .expect("failed to register verifications_accepted counter");

        let verifications_rejected = register_int_counter_with_registry!(
            Opts::new(
                "qol_verifications_rejected_total",
                "Total verifications rejected by a guard"
            ),
            registry
        )
        .expect("failed to register verifications_rejected counter");

        let quorums_reached = register_int_counter_with_registry!(
            Opts::new(
                "qol_quorums_reached_total",
                "Total audits that reached the verification quorum"
            ),
            registry
        )
        .expect("failed to register quorums_reached counter");

        let rewards_issued = register_int_counter_with_registry!(
            Opts::new("qol_rewards_issued_total", "Total reward records issued"),
            registry
        )
        .expect("failed to register rewards_issued counter");

        let transfer_failures = register_int_counter_with_registry!(
            Opts::new(
                "qol_transfer_failures_total",
                "Total token transfers that failed"
            ),
            registry
        )
        .expect("failed to register transfer_failures counter");

        let pending_rewards = register_int_gauge_with_registry!(
            Opts::new(
                "qol_pending_rewards",
                "Current number of rewards awaiting settlement"
            ),
            registry
        )
        .expect("failed to register pending_rewards gauge");

        Self {
            registry,
            audits_submitted,
            verifications_accepted,
            verifications_rejected,
            quorums_reached,
            rewards_issued,
            transfer_failures,
            pending_rewards,
        }
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
