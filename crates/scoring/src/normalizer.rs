//! Raw insight → canonical metrics.
//!
//! The lookup tables below are ordered: the first action type found wins,
//! so the order is part of the contract.

use campaign_core::config::ScoringConfig;
use campaign_core::types::{ActionEntry, CanonicalMetrics, RawInsight};

/// Conversion action types, most authoritative first.
pub const CONVERSION_ACTION_TYPES: &[&str] = &[
    "purchase",
    "omni_purchase",
    "lead",
    "onsite_conversion.lead_grouped",
    "complete_registration",
    "contact",
    "submit_application",
];

/// Cost-per-action types consulted for a platform-reported CPA.
pub const COST_ACTION_TYPES: &[&str] = &[
    "purchase",
    "omni_purchase",
    "lead",
    "complete_registration",
    "contact",
];

/// Action-value types that carry revenue.
pub const REVENUE_ACTION_TYPES: &[&str] = &["purchase", "omni_purchase"];

/// Scan `priority` in order and return the first entry whose type matches.
pub fn first_by_priority<'a>(
    entries: &'a [ActionEntry],
    priority: &[&str],
) -> Option<&'a ActionEntry> {
    priority
        .iter()
        .find_map(|wanted| entries.iter().find(|e| e.action_type == *wanted))
}

/// Absent, NaN, infinite, and negative inputs all collapse to zero.
pub fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Counts are integral on the platform; fractional parts are truncated.
pub fn count(value: Option<f64>) -> u64 {
    non_negative(value).trunc() as u64
}

/// Conversions from the first matching action in priority order, else 0.
pub fn extract_conversions(actions: &[ActionEntry], priority: &[&str]) -> u64 {
    first_by_priority(actions, priority)
        .map(|a| count(a.value))
        .unwrap_or(0)
}

/// Build canonical metrics from a raw insight. Derived ratios are computed
/// only when their denominator is positive and are 0 otherwise.
pub fn normalize(raw: &RawInsight, config: &ScoringConfig) -> CanonicalMetrics {
    let spend = non_negative(raw.spend);
    let conversions = extract_conversions(&raw.actions, CONVERSION_ACTION_TYPES);

    let mut cpa = first_by_priority(&raw.cost_per_action_type, COST_ACTION_TYPES)
        .map(|a| non_negative(a.value))
        .unwrap_or(0.0);
    if cpa == 0.0 && conversions > 0 && spend > 0.0 {
        cpa = spend / conversions as f64;
    }

    let mut revenue = raw
        .action_values
        .iter()
        .find(|a| REVENUE_ACTION_TYPES.contains(&a.action_type.as_str()))
        .map(|a| non_negative(a.value))
        .unwrap_or(0.0);
    if revenue == 0.0 && conversions > 0 {
        revenue = conversions as f64 * config.average_order_value;
    }

    let roas = if spend > 0.0 { revenue / spend } else { 0.0 };

    CanonicalMetrics {
        impressions: count(raw.impressions),
        clicks: count(raw.clicks),
        spend,
        ctr: non_negative(raw.ctr),
        cpm: non_negative(raw.cpm),
        frequency: non_negative(raw.frequency),
        reach: count(raw.reach),
        conversions,
        cpa,
        revenue,
        roas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn test_empty_insight_is_all_zero() {
        let metrics = normalize(&RawInsight::default(), &config());
        assert_eq!(metrics, CanonicalMetrics::default());
    }

    #[test]
    fn test_conversion_priority_order() {
        // "lead" appears first in the list, but "purchase" has priority.
        let raw = RawInsight {
            actions: vec![
                ActionEntry::new("lead", 40.0),
                ActionEntry::new("link_click", 900.0),
                ActionEntry::new("purchase", 7.0),
            ],
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &config()).conversions, 7);
    }

    #[test]
    fn test_unknown_action_types_contribute_nothing() {
        let raw = RawInsight {
            spend: Some(80.0),
            actions: vec![ActionEntry::new("video_view", 300.0)],
            ..Default::default()
        };
        let metrics = normalize(&raw, &config());
        assert_eq!(metrics.conversions, 0);
        assert_eq!(metrics.cpa, 0.0);
        assert_eq!(metrics.revenue, 0.0);
        assert_eq!(metrics.roas, 0.0);
    }

    #[test]
    fn test_reported_cpa_wins_over_derived() {
        let raw = RawInsight {
            spend: Some(1000.0),
            actions: vec![ActionEntry::new("lead", 10.0)],
            cost_per_action_type: vec![ActionEntry::new("lead", 95.5)],
            ..Default::default()
        };
        assert!((normalize(&raw, &config()).cpa - 95.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cpa_falls_back_to_spend_over_conversions() {
        let raw = RawInsight {
            spend: Some(1000.0),
            actions: vec![ActionEntry::new("purchase", 4.0)],
            cost_per_action_type: vec![ActionEntry::new("link_click", 0.3)],
            ..Default::default()
        };
        assert!((normalize(&raw, &config()).cpa - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_revenue_synthesized_from_average_order_value() {
        let raw = RawInsight {
            spend: Some(2600.0),
            actions: vec![ActionEntry::new("purchase", 3.0)],
            ..Default::default()
        };
        let metrics = normalize(&raw, &config());
        assert!((metrics.revenue - 7800.0).abs() < f64::EPSILON);
        assert!((metrics.roas - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reported_revenue_used_when_present() {
        let raw = RawInsight {
            spend: Some(500.0),
            actions: vec![ActionEntry::new("purchase", 2.0)],
            action_values: vec![
                ActionEntry::new("add_to_cart", 9000.0),
                ActionEntry::new("omni_purchase", 1500.0),
            ],
            ..Default::default()
        };
        let metrics = normalize(&raw, &config());
        assert!((metrics.revenue - 1500.0).abs() < f64::EPSILON);
        assert!((metrics.roas - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roas_zero_without_spend() {
        let raw = RawInsight {
            actions: vec![ActionEntry::new("purchase", 2.0)],
            ..Default::default()
        };
        let metrics = normalize(&raw, &config());
        assert!(metrics.revenue > 0.0);
        assert_eq!(metrics.roas, 0.0);
        assert_eq!(metrics.cpa, 0.0);
    }

    #[test]
    fn test_negative_and_nan_inputs_clamp_to_zero() {
        let raw = RawInsight {
            spend: Some(-50.0),
            ctr: Some(f64::NAN),
            frequency: Some(f64::INFINITY),
            reach: Some(-3.0),
            ..Default::default()
        };
        let metrics = normalize(&raw, &config());
        assert_eq!(metrics.spend, 0.0);
        assert_eq!(metrics.ctr, 0.0);
        assert_eq!(metrics.frequency, 0.0);
        assert_eq!(metrics.reach, 0);
    }
}
