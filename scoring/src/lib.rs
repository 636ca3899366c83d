//! Quality-of-Life scoring engine.
//!
//! A location's score is a weighted sum over five fixed categories:
//! 1. Each metric is normalized to `value / max_value` in `[0, 1]`.
//! 2. Verified-type metrics that have reached quorum get a 10% bonus, capped at 1.0.
//! 3. Normalized values are averaged per category and multiplied by the category weight.
//! 4. The weighted sum is scaled to `[0, 100]` and rounded.
//!
//! The category catalog and a static location source live alongside the engine so
//! the CLI and tests can score the built-in dataset without any external collaborator.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod location;
pub mod metric;

pub use catalog::{category, metric_spec, CategorySpec, MetricSpec, CATEGORIES};
pub use engine::{category_score, score_location, CategoryBreakdown, ScoreBand, ScoreReport};
pub use error::ScoringError;
pub use location::{LocationSnapshot, LocationSource, StaticLocations};
pub use metric::{Metric, MetricDataType};
