//! Portfolio assembly: the join point after every entity has been scored.

use crate::aggregation::{aggregate, AggregatedMetrics};
use crate::funnel::{analyze_funnel, FunnelReport};
use campaign_core::config::ScoringConfig;
use campaign_core::error::CampaignResult;
use campaign_core::types::{EntityInput, Recommendation, ScoredEntity};
use campaign_scoring::evaluate_batch;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// Worst health score first.
    pub entities: Vec<ScoredEntity>,
    pub total: usize,
    pub metrics: AggregatedMetrics,
    pub funnel: FunnelReport,
    /// Most urgent recommendations across all entities.
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsReport {
    /// Best creative score first.
    pub ads: Vec<ScoredEntity>,
    pub total: usize,
}

/// Gather every entity's recommendations in entity order, then keep the
/// `top_n` most urgent. Equal priorities keep entity order.
pub fn top_recommendations(entities: &[ScoredEntity], top_n: usize) -> Vec<Recommendation> {
    let mut all: Vec<Recommendation> = entities
        .iter()
        .flat_map(|e| e.recommendations.iter().cloned())
        .collect();
    all.sort_by_key(|r| r.priority);
    all.truncate(top_n);
    all
}

/// Score every entity, then aggregate, analyze the funnel, and pick the
/// top recommendations. Identical input always yields an identical report.
pub fn build_portfolio(
    inputs: &[EntityInput],
    config: &ScoringConfig,
    top_n: usize,
) -> CampaignResult<PortfolioReport> {
    let mut entities = evaluate_batch(inputs, config)?;
    entities.sort_by_key(|e| e.health_score);

    let metrics = aggregate(&entities);
    let funnel = analyze_funnel(&entities);
    let recommendations = top_recommendations(&entities, top_n);

    info!(
        entities = entities.len(),
        avg_health_score = metrics.avg_health_score,
        recommendations = recommendations.len(),
        "Portfolio analyzed"
    );

    Ok(PortfolioReport {
        total: entities.len(),
        entities,
        metrics,
        funnel,
        recommendations,
    })
}

/// Score ads and rank them by creative score, best first.
pub fn build_ads_report(
    inputs: &[EntityInput],
    config: &ScoringConfig,
) -> CampaignResult<AdsReport> {
    let mut ads = evaluate_batch(inputs, config)?;
    ads.sort_by(|a, b| b.creative_score.cmp(&a.creative_score));

    info!(ads = ads.len(), "Ads analyzed");

    Ok(AdsReport {
        total: ads.len(),
        ads,
    })
}
