use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("metric {metric}: value {value} outside [0, {max_value}]")]
    ValueOutOfRange {
        metric: String,
        value: f64,
        max_value: f64,
    },

    #[error("metric {metric}: max value must be positive, got {max_value}")]
    InvalidMaxValue { metric: String, max_value: f64 },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown metric {metric} in category {category}")]
    UnknownMetric { category: String, metric: String },

    #[error("unknown location: {0}")]
    UnknownLocation(String),
}
