//! The fixed category and metric catalog.
//!
//! Category weights sum to 1.0; the scoring engine relies on that so the overall
//! score stays within `[0, 100]`.

use crate::metric::MetricDataType;
use crate::ScoringError;

/// A category definition with its weight and owned metrics.
#[derive(Debug)]
pub struct CategorySpec {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: f64,
    pub description: &'static str,
    pub metrics: &'static [MetricSpec],
}

/// A metric definition: how it is sourced and the scale it is reported on.
#[derive(Debug)]
pub struct MetricSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub data_type: MetricDataType,
    pub verification_required: bool,
    pub unit: &'static str,
    pub max_value: f64,
    pub description: &'static str,
}

impl CategorySpec {
    pub fn metric(&self, id: &str) -> Option<&'static MetricSpec> {
        self.metrics.iter().find(|m| m.id == id)
    }

    /// Weight as a whole percentage for display.
    pub fn weight_percent(&self) -> u32 {
        (self.weight * 100.0).round() as u32
    }
}

/// Look up a category by id.
pub fn category(id: &str) -> Result<&'static CategorySpec, ScoringError> {
    CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| ScoringError::UnknownCategory(id.to_string()))
}

/// Look up a metric definition by category and metric id.
pub fn metric_spec(category_id: &str, metric_id: &str) -> Result<&'static MetricSpec, ScoringError> {
    category(category_id)?
        .metric(metric_id)
        .ok_or_else(|| ScoringError::UnknownMetric {
            category: category_id.to_string(),
            metric: metric_id.to_string(),
        })
}

/// Sum of all category weights.
pub fn total_weight() -> f64 {
    CATEGORIES.iter().map(|c| c.weight).sum()
}

const CORE_SOCIAL_METRICS: &[MetricSpec] = &[
    MetricSpec {
        id: "health-capacity",
        name: "Health Capacity",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "beds/1000 pop",
        max_value: 5.0,
        description: "Hospital beds per 1000 population",
    },
    MetricSpec {
        id: "health-quality",
        name: "Health Quality",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "minutes",
        max_value: 120.0,
        description: "Average wait time at healthcare facilities",
    },
    MetricSpec {
        id: "education-quality",
        name: "Education Quality",
        data_type: MetricDataType::Blended,
        verification_required: true,
        unit: "rating",
        max_value: 10.0,
        description: "School ratings combined with user reviews",
    },
    MetricSpec {
        id: "crime-safety",
        name: "Crime & Safety",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "cases/month",
        max_value: 50.0,
        description: "Verified reports of localized crime",
    },
    MetricSpec {
        id: "local-corruption",
        name: "Local Corruption",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "reports/month",
        max_value: 10.0,
        description: "Verified reports of bribery or official misconduct",
    },
];

const MOBILITY_INFRASTRUCTURE_METRICS: &[MetricSpec] = &[
    MetricSpec {
        id: "road-conditions",
        name: "Road Conditions",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "stars",
        max_value: 5.0,
        description: "General rating of road surface quality",
    },
    MetricSpec {
        id: "pothole-fix-speed",
        name: "Pothole Fix Speed",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "days",
        max_value: 30.0,
        description: "Average time to fix reported potholes",
    },
    MetricSpec {
        id: "traffic-congestion",
        name: "Traffic Congestion",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "minutes",
        max_value: 60.0,
        description: "Rush hour traffic delay",
    },
    MetricSpec {
        id: "rain-drainage",
        name: "Rain Drainage",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "reports/month",
        max_value: 20.0,
        description: "Flood reports during normal rain",
    },
    MetricSpec {
        id: "construction-standards",
        name: "Construction Standards",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "%",
        max_value: 100.0,
        description: "Construction site compliance rate",
    },
    MetricSpec {
        id: "road-safety-kids",
        name: "Road Safety for Kids",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "rating",
        max_value: 10.0,
        description: "Pedestrian safety for children",
    },
    MetricSpec {
        id: "transit-proximity",
        name: "Transit Proximity",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "meters",
        max_value: 2000.0,
        description: "Distance to nearest transit stop",
    },
];

const ECONOMIC_AFFORDABILITY_METRICS: &[MetricSpec] = &[
    MetricSpec {
        id: "affordability-ratio",
        name: "Affordability Ratio",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "ratio",
        max_value: 1.0,
        description: "Wage vs rent affordability ratio",
    },
    MetricSpec {
        id: "job-proximity",
        name: "Job Proximity",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "km",
        max_value: 10.0,
        description: "Distance to major employment centers",
    },
    MetricSpec {
        id: "tourism-impact",
        name: "Tourism Impact",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "M$/year",
        max_value: 10.0,
        description: "Annual tourism income",
    },
    MetricSpec {
        id: "hazardous-distance",
        name: "Hazardous Distance",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "km",
        max_value: 20.0,
        description: "Distance to industrial facilities",
    },
];

const ENVIRONMENTAL_UTILITY_METRICS: &[MetricSpec] = &[
    MetricSpec {
        id: "aqi-water-quality",
        name: "AQI & Water Quality",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "AQI",
        max_value: 200.0,
        description: "Air Quality Index",
    },
    MetricSpec {
        id: "energy-sufficiency",
        name: "Energy Sufficiency",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "cuts/month",
        max_value: 10.0,
        description: "Power cut frequency",
    },
    MetricSpec {
        id: "sustainability-index",
        name: "Sustainability Index",
        data_type: MetricDataType::Blended,
        verification_required: true,
        unit: "%",
        max_value: 100.0,
        description: "Recycling rate and green initiatives",
    },
    MetricSpec {
        id: "weather-impact",
        name: "Weather Impact",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "events/year",
        max_value: 20.0,
        description: "Extreme weather disruption events",
    },
];

const AMENITIES_LIFESTYLE_METRICS: &[MetricSpec] = &[
    MetricSpec {
        id: "green-space-access",
        name: "Green Space Access",
        data_type: MetricDataType::Factual,
        verification_required: false,
        unit: "parks/1km",
        max_value: 10.0,
        description: "Number of parks within 1km radius",
    },
    MetricSpec {
        id: "grocery-food-access",
        name: "Grocery/Food Access",
        data_type: MetricDataType::Blended,
        verification_required: true,
        unit: "markets/500m",
        max_value: 20.0,
        description: "Food markets within 500m with quality ratings",
    },
    MetricSpec {
        id: "leisure-entertainment",
        name: "Leisure & Entertainment",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "rating",
        max_value: 5.0,
        description: "Restaurant and entertainment ratings",
    },
    MetricSpec {
        id: "noise-pollution",
        name: "Noise Pollution",
        data_type: MetricDataType::Verified,
        verification_required: true,
        unit: "dB",
        max_value: 100.0,
        description: "Residential noise levels",
    },
];

/// The five scoring categories, in display order.
pub const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "core-social",
        name: "Core Social Infrastructure",
        weight: 0.40,
        description: "Essential, non-negotiable public services",
        metrics: CORE_SOCIAL_METRICS,
    },
    CategorySpec {
        id: "mobility-infrastructure",
        name: "Mobility & Urban Infrastructure",
        weight: 0.35,
        description: "Daily life transportation and infrastructure",
        metrics: MOBILITY_INFRASTRUCTURE_METRICS,
    },
    CategorySpec {
        id: "economic-affordability",
        name: "Economic & Affordability",
        weight: 0.15,
        description: "Economic factors affecting cost of living",
        metrics: ECONOMIC_AFFORDABILITY_METRICS,
    },
    CategorySpec {
        id: "environmental-utility",
        name: "Environmental & Utility",
        weight: 0.07,
        description: "Environmental factors and utility reliability",
        metrics: ENVIRONMENTAL_UTILITY_METRICS,
    },
    CategorySpec {
        id: "amenities-lifestyle",
        name: "Amenities & Lifestyle",
        weight: 0.03,
        description: "Quality of life amenities and lifestyle factors",
        metrics: AMENITIES_LIFESTYLE_METRICS,
    },
];
