//! Portfolio-level totals and derived KPIs.

use campaign_core::types::ScoredEntity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
    pub reach: u64,
    /// `clicks / impressions * 100` (0.0 when impressions is zero).
    pub ctr: f64,
    /// `spend / impressions * 1000` (0.0 when impressions is zero).
    pub cpm: f64,
    /// `spend / conversions` (0.0 when conversions is zero).
    pub cpa: f64,
    /// `revenue / spend` (0.0 when spend is zero).
    pub roas: f64,
    /// `revenue - spend`; negative when the portfolio loses money.
    pub profit: f64,
    /// Mean health score rounded to the nearest integer; 0 when empty.
    pub avg_health_score: u8,
}

/// Counts saturate at `u64::MAX` instead of overflowing.
fn saturating_total(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// Sum base metrics across entities and derive the KPIs. Never divides by
/// zero: every ratio falls back to 0.0.
pub fn aggregate(entities: &[ScoredEntity]) -> AggregatedMetrics {
    let spend: f64 = entities.iter().map(|e| e.metrics.spend).sum();
    let impressions = saturating_total(entities.iter().map(|e| e.metrics.impressions));
    let clicks = saturating_total(entities.iter().map(|e| e.metrics.clicks));
    let conversions = saturating_total(entities.iter().map(|e| e.metrics.conversions));
    let revenue: f64 = entities.iter().map(|e| e.metrics.revenue).sum();
    let reach = saturating_total(entities.iter().map(|e| e.metrics.reach));
    let score_total: u64 = entities.iter().map(|e| u64::from(e.health_score)).sum();

    AggregatedMetrics {
        spend,
        impressions,
        clicks,
        conversions,
        revenue,
        reach,
        ctr: if impressions > 0 {
            clicks as f64 / impressions as f64 * 100.0
        } else {
            0.0
        },
        cpm: if impressions > 0 {
            spend / impressions as f64 * 1000.0
        } else {
            0.0
        },
        cpa: if conversions > 0 {
            spend / conversions as f64
        } else {
            0.0
        },
        roas: if spend > 0.0 { revenue / spend } else { 0.0 },
        profit: revenue - spend,
        avg_health_score: if entities.is_empty() {
            0
        } else {
            (score_total as f64 / entities.len() as f64).round() as u8
        },
    }
}
