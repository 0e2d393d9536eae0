//! Recommendation rules. Each rule fires at most once per entity and reads
//! only the metrics and score it is given, so the wording always matches
//! the numbers that triggered it.

use campaign_core::config::ScoringConfig;
use campaign_core::types::{
    CanonicalMetrics, Recommendation, RecommendationAction, RecommendationType,
};

/// Fixed attributes of a rule; description and impact are filled per entity.
struct RuleSpec {
    rule: &'static str,
    kind: RecommendationType,
    priority: u8,
    action: RecommendationAction,
    title: &'static str,
    confidence: u8,
}

const CPA_CRITICAL: RuleSpec = RuleSpec {
    rule: "cpa-critical",
    kind: RecommendationType::Critical,
    priority: 1,
    action: RecommendationAction::Pause,
    title: "Critical CPA - urgent action",
    confidence: 95,
};

const CPA_HIGH: RuleSpec = RuleSpec {
    rule: "cpa-high",
    kind: RecommendationType::Warning,
    priority: 2,
    action: RecommendationAction::Optimize,
    title: "CPA above target",
    confidence: 85,
};

const FREQUENCY_HIGH: RuleSpec = RuleSpec {
    rule: "freq-high",
    kind: RecommendationType::Warning,
    priority: 2,
    action: RecommendationAction::ExpandAudience,
    title: "Audience saturated",
    confidence: 88,
};

const SCALE: RuleSpec = RuleSpec {
    rule: "scale",
    kind: RecommendationType::Opportunity,
    priority: 1,
    action: RecommendationAction::Scale,
    title: "Scaling opportunity",
    confidence: 90,
};

const CTR_LOW: RuleSpec = RuleSpec {
    rule: "ctr-low",
    kind: RecommendationType::Warning,
    priority: 3,
    action: RecommendationAction::ReviewCreatives,
    title: "Very low CTR",
    confidence: 82,
};

const NO_CONVERSIONS: RuleSpec = RuleSpec {
    rule: "no-conv",
    kind: RecommendationType::Critical,
    priority: 1,
    action: RecommendationAction::Pause,
    title: "No conversions",
    confidence: 92,
};

/// Spend above which a zero-conversion entity should be paused.
pub const NO_CONVERSION_SPEND: f64 = 200.0;
/// Minimum spend before a cheap CPA is trusted enough to scale.
pub const SCALE_MIN_SPEND: f64 = 50.0;
/// Minimum health score for a scale recommendation.
pub const SCALE_MIN_SCORE: u8 = 80;
/// Impressions needed before a low CTR is meaningful.
pub const CTR_MIN_IMPRESSIONS: u64 = 1000;

fn build(spec: &RuleSpec, entity_id: &str, description: String, impact: String) -> Recommendation {
    Recommendation {
        id: format!("{}-{}", spec.rule, entity_id),
        entity_id: entity_id.to_string(),
        kind: spec.kind,
        priority: spec.priority,
        title: spec.title.to_string(),
        description,
        action: spec.action,
        action_label: spec.action.label().to_string(),
        impact_estimate: impact,
        confidence: spec.confidence,
    }
}

fn percent_above(value: f64, target: f64) -> f64 {
    (value / target - 1.0) * 100.0
}

/// Evaluate every rule against one entity and return the firing
/// recommendations ordered by ascending priority (stable).
pub fn generate_recommendations(
    entity_id: &str,
    metrics: &CanonicalMetrics,
    score: u8,
    config: &ScoringConfig,
) -> Vec<Recommendation> {
    let m = metrics;
    let mut recommendations = Vec::new();

    if m.cpa > config.target_cpa * 2.0 {
        recommendations.push(build(
            &CPA_CRITICAL,
            entity_id,
            format!(
                "CPA of {:.2} is {:.0}% above target. Consider pausing and reviewing targeting.",
                m.cpa,
                percent_above(m.cpa, config.target_cpa)
            ),
            format!("Potential savings: {:.2}/day", m.spend * 0.5),
        ));
    } else if m.cpa > config.target_cpa {
        recommendations.push(build(
            &CPA_HIGH,
            entity_id,
            format!(
                "CPA of {:.2} is {:.0}% above the target of {}.",
                m.cpa,
                percent_above(m.cpa, config.target_cpa),
                config.target_cpa
            ),
            "Potential 15-25% CPA reduction".to_string(),
        ));
    }

    if m.frequency > config.max_frequency {
        recommendations.push(build(
            &FREQUENCY_HIGH,
            entity_id,
            format!(
                "Frequency of {:.1}x means the audience is seeing the ads too often. Time to expand or refresh it.",
                m.frequency
            ),
            "Avoid a 20-30% CPA increase".to_string(),
        ));
    }

    if m.cpa > 0.0
        && m.cpa < config.target_cpa * 0.7
        && m.spend > SCALE_MIN_SPEND
        && score >= SCALE_MIN_SCORE
    {
        recommendations.push(build(
            &SCALE,
            entity_id,
            format!(
                "Excellent CPA of {:.2}. This campaign is ready to scale.",
                m.cpa
            ),
            format!(
                "+{} potential conversions",
                (m.conversions as f64 * 0.25).ceil() as u64
            ),
        ));
    }

    if m.ctr < config.min_ctr * 0.5 && m.impressions > CTR_MIN_IMPRESSIONS {
        recommendations.push(build(
            &CTR_LOW,
            entity_id,
            format!(
                "CTR of {:.2}% is below expectations. The creatives may not be resonating with the audience.",
                m.ctr
            ),
            "Potential 50-100% CTR increase".to_string(),
        ));
    }

    if m.spend > NO_CONVERSION_SPEND && m.conversions == 0 {
        recommendations.push(build(
            &NO_CONVERSIONS,
            entity_id,
            format!(
                "Spent {:.2} without a single conversion. Pause and review the whole strategy.",
                m.spend
            ),
            format!("Avoid another {:.2} in waste", m.spend),
        ));
    }

    // sort_by_key is stable: equal priorities keep rule order.
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}
