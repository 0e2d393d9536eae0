//! Health score: additive rules on top of a base of 100, clamped to [0, 100].

use campaign_core::config::ScoringConfig;
use campaign_core::types::CanonicalMetrics;

const BASE_SCORE: i32 = 100;

/// Spend above which an entity with zero conversions is penalized.
pub const ZERO_CONVERSION_SPEND: f64 = 100.0;

/// Compute the 0–100 health score. Each metric's rules are an if/else
/// chain; chains for different metrics fire independently, so a CPA bonus
/// and the zero-conversion penalty can both apply.
pub fn calculate_health_score(metrics: &CanonicalMetrics, config: &ScoringConfig) -> u8 {
    let adjustment = cpa_adjustment(metrics, config)
        + frequency_adjustment(metrics, config)
        + ctr_adjustment(metrics, config)
        + roas_adjustment(metrics, config)
        + zero_conversion_adjustment(metrics);

    (BASE_SCORE + adjustment).clamp(0, 100) as u8
}

fn cpa_adjustment(m: &CanonicalMetrics, config: &ScoringConfig) -> i32 {
    if m.cpa <= 0.0 {
        return 0;
    }
    let target = config.target_cpa;
    if m.cpa > target * 2.0 {
        -40
    } else if m.cpa > target * 1.5 {
        -25
    } else if m.cpa > target {
        -10
    } else {
        10
    }
}

fn frequency_adjustment(m: &CanonicalMetrics, config: &ScoringConfig) -> i32 {
    if m.frequency > config.max_frequency {
        -20
    } else if m.frequency > config.max_frequency * 0.8 {
        -10
    } else {
        0
    }
}

fn ctr_adjustment(m: &CanonicalMetrics, config: &ScoringConfig) -> i32 {
    if m.ctr < config.min_ctr * 0.5 {
        -20
    } else if m.ctr < config.min_ctr {
        -10
    } else if m.ctr > config.min_ctr * 2.0 {
        10
    } else {
        0
    }
}

fn roas_adjustment(m: &CanonicalMetrics, config: &ScoringConfig) -> i32 {
    let target = config.target_roas;
    if m.roas >= target * 2.0 {
        15
    } else if m.roas >= target {
        5
    } else if m.roas > 0.0 && m.roas < target * 0.5 {
        -15
    } else {
        0
    }
}

fn zero_conversion_adjustment(m: &CanonicalMetrics) -> i32 {
    if m.spend > ZERO_CONVERSION_SPEND && m.conversions == 0 {
        -30
    } else {
        0
    }
}
