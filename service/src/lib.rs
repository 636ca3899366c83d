//! QoL index service: wires scoring, verification and rewards together.
//!
//! The service is the single entry point for user actions:
//! - Submits photo-backed audits and pays the submission reward
//! - Verifies audits (one at a time per audit) and pays verifiers
//! - Pays the submitter's quality bonus when an audit reaches quorum
//! - Serves balances, reward history, the leaderboard and location scores
//!
//! It also owns the ambient pieces: TOML configuration, logging setup,
//! Prometheus metrics and a synchronous event bus.

pub mod audit_lock;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod metrics;
pub mod service;

pub use audit_lock::AuditLocks;
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use events::{EventBus, ServiceEvent};
pub use logging::{init_logging, LogFormat};
pub use metrics::ServiceMetrics;
pub use service::{AuditSubmission, QolService, SubmissionReceipt, VerificationReceipt};
