use proptest::prelude::*;

use qol_scoring::{score_location, LocationSnapshot, Metric, CATEGORIES};
use qol_types::{GeoPoint, WalletAddress};

/// Fractions in [0, 1] for each catalog metric, plus a verified flag.
fn metric_fractions() -> impl Strategy<Value = Vec<(f64, bool)>> {
    let n: usize = CATEGORIES.iter().map(|c| c.metrics.len()).sum();
    prop::collection::vec((0.0f64..=1.0, any::<bool>()), n)
}

fn build_location(fractions: &[(f64, bool)]) -> LocationSnapshot {
    let mut loc = LocationSnapshot::new("prop", "Prop", GeoPoint::new(0.0, 0.0).unwrap());
    let specs = CATEGORIES
        .iter()
        .flat_map(|c| c.metrics.iter().map(move |m| (c.id, m)));
    for ((category, spec), &(fraction, verified)) in specs.zip(fractions) {
        let mut metric = Metric::from_spec(spec, category, fraction * spec.max_value).unwrap();
        if verified {
            let verifiers = (0..3).map(|i| WalletAddress::new(format!("v{i}"))).collect();
            metric = metric.with_verifications(verifiers, 3);
        }
        loc.insert(metric);
    }
    loc
}

proptest! {
    /// Normalized value, with or without the verification bonus, stays in [0, 1].
    #[test]
    fn scored_value_within_unit_interval(fractions in metric_fractions()) {
        let loc = build_location(&fractions);
        for metric in loc.metrics.values().flat_map(|m| m.values()) {
            let v = metric.scored_value();
            prop_assert!((0.0..=1.0).contains(&v), "{} scored {}", metric.id, v);
        }
    }

    /// The overall score is always within [0, 100].
    #[test]
    fn score_within_bounds(fractions in metric_fractions()) {
        let score = score_location(&build_location(&fractions));
        prop_assert!(score <= 100);
    }

    /// Marking metrics verified never lowers the score.
    #[test]
    fn verification_never_lowers_score(fractions in metric_fractions()) {
        let unverified: Vec<_> = fractions.iter().map(|&(f, _)| (f, false)).collect();
        let before = score_location(&build_location(&unverified));
        let after = score_location(&build_location(&fractions));
        prop_assert!(after >= before);
    }
}
