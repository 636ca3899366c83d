//! Location snapshots and the read-only location data source.

use crate::catalog::{metric_spec, CATEGORIES};
use crate::metric::Metric;
use crate::ScoringError;
use qol_types::{GeoPoint, WalletAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metrics keyed by metric id.
pub type MetricMap = BTreeMap<String, Metric>;

/// A point-in-time view of one location's metrics, keyed by category id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub id: String,
    pub name: String,
    pub coordinates: GeoPoint,
    pub metrics: BTreeMap<String, MetricMap>,
}

impl LocationSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinates: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            metrics: BTreeMap::new(),
        }
    }

    /// Insert a metric under its category.
    pub fn insert(&mut self, metric: Metric) {
        self.metrics
            .entry(metric.category.clone())
            .or_default()
            .insert(metric.id.clone(), metric);
    }

    pub fn metric(&self, category: &str, metric: &str) -> Option<&Metric> {
        self.metrics.get(category).and_then(|m| m.get(metric))
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.values().map(BTreeMap::len).sum()
    }

    /// Check every metric's range invariant.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.metrics
            .values()
            .flat_map(BTreeMap::values)
            .try_for_each(Metric::validate)
    }
}

/// Supplies location snapshots to the core. Read-only.
pub trait LocationSource: Send + Sync {
    fn locations(&self) -> Vec<LocationSnapshot>;

    fn location(&self, id: &str) -> Option<LocationSnapshot> {
        self.locations().into_iter().find(|l| l.id == id)
    }
}

/// An in-memory, immutable set of locations.
#[derive(Clone, Debug, Default)]
pub struct StaticLocations {
    locations: Vec<LocationSnapshot>,
}

impl StaticLocations {
    /// Wrap a set of snapshots, validating every metric.
    pub fn new(locations: Vec<LocationSnapshot>) -> Result<Self, ScoringError> {
        for location in &locations {
            location.validate()?;
        }
        Ok(Self { locations })
    }

    /// The built-in dataset for Mohali, Punjab, India (140307).
    pub fn mohali() -> Self {
        Self {
            locations: vec![mohali_snapshot()],
        }
    }
}

impl LocationSource for StaticLocations {
    fn locations(&self) -> Vec<LocationSnapshot> {
        self.locations.clone()
    }

    fn location(&self, id: &str) -> Option<LocationSnapshot> {
        self.locations.iter().find(|l| l.id == id).cloned()
    }
}

/// Observed values for the Mohali dataset: (category, metric, value).
const MOHALI_VALUES: &[(&str, &str, f64)] = &[
    ("core-social", "health-capacity", 1.8),
    ("core-social", "health-quality", 35.0),
    ("core-social", "education-quality", 7.5),
    ("core-social", "crime-safety", 8.0),
    ("core-social", "local-corruption", 1.0),
    ("mobility-infrastructure", "road-conditions", 3.0),
    ("mobility-infrastructure", "pothole-fix-speed", 7.0),
    ("mobility-infrastructure", "traffic-congestion", 20.0),
    ("mobility-infrastructure", "rain-drainage", 4.0),
    ("mobility-infrastructure", "construction-standards", 75.0),
    ("mobility-infrastructure", "road-safety-kids", 5.0),
    ("mobility-infrastructure", "transit-proximity", 500.0),
    ("economic-affordability", "affordability-ratio", 0.65),
    ("economic-affordability", "job-proximity", 2.5),
    ("economic-affordability", "tourism-impact", 0.8),
    ("economic-affordability", "hazardous-distance", 8.0),
    ("environmental-utility", "aqi-water-quality", 65.0),
    ("environmental-utility", "energy-sufficiency", 4.0),
    ("environmental-utility", "sustainability-index", 55.0),
    ("environmental-utility", "weather-impact", 6.0),
    ("amenities-lifestyle", "green-space-access", 4.0),
    ("amenities-lifestyle", "grocery-food-access", 6.0),
    ("amenities-lifestyle", "leisure-entertainment", 3.8),
    ("amenities-lifestyle", "noise-pollution", 68.0),
];

/// Id of the built-in Mohali location.
pub const MOHALI_ID: &str = "Mohali-India";

fn mohali_snapshot() -> LocationSnapshot {
    let coordinates = GeoPoint {
        latitude: 30.7046,
        longitude: 76.7179,
    };
    let mut snapshot =
        LocationSnapshot::new(MOHALI_ID, "Mohali, Punjab, India (140307)", coordinates);
    for &(category, metric, value) in MOHALI_VALUES {
        // The table only names catalog metrics with in-range values.
        let Ok(spec) = metric_spec(category, metric) else {
            continue;
        };
        let Ok(mut m) = Metric::from_spec(spec, category, value) else {
            continue;
        };
        if metric == "education-quality" {
            m = m.with_verifications(vec![WalletAddress::new("verifier-1")], 3);
        }
        snapshot.insert(m);
    }
    snapshot
}

/// Number of metrics defined across the whole catalog.
pub fn catalog_metric_count() -> usize {
    CATEGORIES.iter().map(|c| c.metrics.len()).sum()
}
