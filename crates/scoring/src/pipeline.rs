//! Per-entity evaluation: normalize → score → classify → recommend.
//!
//! Entities are independent of each other, so batches are evaluated on the
//! rayon pool. Output order always matches input order.

use crate::creative::{creative_score, resolve_creative};
use crate::health::calculate_health_score;
use crate::normalizer::normalize;
use crate::recommendations::generate_recommendations;
use crate::status::classify;
use campaign_core::config::ScoringConfig;
use campaign_core::error::CampaignResult;
use campaign_core::types::{EntityInput, EntityKind, RawInsight, ScoredEntity};
use rayon::prelude::*;
use tracing::debug;

/// Platform budgets are reported in cents.
fn major_units(minor: Option<f64>) -> Option<f64> {
    minor.filter(|v| v.is_finite()).map(|v| v / 100.0)
}

/// Evaluate a single entity. The configuration must already be validated.
pub fn evaluate_entity(input: &EntityInput, config: &ScoringConfig) -> ScoredEntity {
    let empty = RawInsight::default();
    let metrics = normalize(input.insights.as_ref().unwrap_or(&empty), config);
    let health_score = calculate_health_score(&metrics, config);
    let status_classification = classify(health_score);
    let recommendations = generate_recommendations(&input.id, &metrics, health_score, config);

    let (creative_score, creative_classification, creative) = match input.kind {
        EntityKind::Ad => {
            let score = creative_score(&metrics);
            (
                Some(score),
                Some(classify(score)),
                input.creative.as_ref().map(resolve_creative),
            )
        }
        EntityKind::Campaign => (None, None, None),
    };

    debug!(
        entity_id = %input.id,
        health_score,
        status = ?status_classification.status,
        recommendations = recommendations.len(),
        "Entity evaluated"
    );

    ScoredEntity {
        id: input.id.clone(),
        name: input.name.clone(),
        kind: input.kind,
        objective: input.objective.clone(),
        status: input.status.clone(),
        effective_status: input.effective_status.clone(),
        campaign_id: input.campaign_id.clone(),
        daily_budget: major_units(input.daily_budget),
        lifetime_budget: major_units(input.lifetime_budget),
        budget_remaining: major_units(input.budget_remaining),
        metrics,
        health_score,
        status_classification,
        recommendations,
        creative_score,
        creative_classification,
        creative,
    }
}

/// Validate the configuration once, then evaluate every entity in parallel.
pub fn evaluate_batch(
    inputs: &[EntityInput],
    config: &ScoringConfig,
) -> CampaignResult<Vec<ScoredEntity>> {
    config.validate()?;

    let scored: Vec<ScoredEntity> = inputs
        .par_iter()
        .map(|input| evaluate_entity(input, config))
        .collect();

    let recommendations: usize = scored.iter().map(|e| e.recommendations.len()).sum();
    metrics::counter!("scoring.entities_evaluated").increment(scored.len() as u64);
    metrics::counter!("scoring.recommendations_generated").increment(recommendations as u64);

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{ActionEntry, CreativeInput, RecommendationAction, StatusTier};

    fn campaign(id: &str, raw: RawInsight) -> EntityInput {
        EntityInput {
            id: id.to_string(),
            name: format!("Campaign {id}"),
            insights: Some(raw),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_insights_evaluate_as_zero_metrics() {
        let input = EntityInput {
            id: "c-empty".to_string(),
            ..Default::default()
        };
        let scored = evaluate_entity(&input, &ScoringConfig::default());
        assert_eq!(scored.metrics.spend, 0.0);
        // ctr 0 is below half the minimum: -20
        assert_eq!(scored.health_score, 80);
        assert_eq!(scored.status_tier(), StatusTier::Excellent);
        assert!(scored.recommendations.is_empty());
        assert!(scored.creative_score.is_none());
        assert!(scored.creative_classification.is_none());
    }

    #[test]
    fn test_spend_without_conversions() {
        let input = campaign(
            "c-1",
            RawInsight {
                spend: Some(1000.0),
                ctr: Some(1.5),
                ..Default::default()
            },
        );
        let scored = evaluate_entity(&input, &ScoringConfig::default());
        assert_eq!(scored.health_score, 70);
        assert_eq!(scored.metrics.cpa, 0.0);
        assert_eq!(scored.recommendations.len(), 1);
        assert_eq!(scored.recommendations[0].id, "no-conv-c-1");
    }

    #[test]
    fn test_efficient_campaign_gets_scale_opportunity() {
        let input = campaign(
            "c-2",
            RawInsight {
                spend: Some(60.0),
                ctr: Some(1.5),
                actions: vec![ActionEntry::new("lead", 1.0)],
                cost_per_action_type: vec![ActionEntry::new("lead", 100.0)],
                ..Default::default()
            },
        );
        let scored = evaluate_entity(&input, &ScoringConfig::default());
        assert!(scored.health_score >= 80);
        let scale = &scored.recommendations[0];
        assert_eq!(scale.action, RecommendationAction::Scale);
        assert_eq!(scale.priority, 1);
    }

    #[test]
    fn test_budgets_converted_from_cents() {
        let input = EntityInput {
            id: "c-3".to_string(),
            daily_budget: Some(15_000.0),
            ..Default::default()
        };
        let scored = evaluate_entity(&input, &ScoringConfig::default());
        assert_eq!(scored.daily_budget, Some(150.0));
        assert_eq!(scored.lifetime_budget, None);
    }

    #[test]
    fn test_ads_carry_creative_score_and_summary() {
        let input = EntityInput {
            id: "ad-1".to_string(),
            kind: EntityKind::Ad,
            creative: Some(CreativeInput {
                image_url: Some("https://cdn/ad.jpg".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let scored = evaluate_entity(&input, &ScoringConfig::default());
        assert_eq!(scored.creative_score, Some(50));
        let classification = scored.creative_classification.clone().unwrap();
        assert_eq!(classification.status, StatusTier::Attention);
        assert_eq!(classification.label, "Attention");
        assert_eq!(
            scored.creative.and_then(|c| c.image_url).as_deref(),
            Some("https://cdn/ad.jpg")
        );
    }

    #[test]
    fn test_batch_preserves_order_and_is_deterministic() {
        let inputs: Vec<EntityInput> = (0..50)
            .map(|i| {
                campaign(
                    &format!("c-{i}"),
                    RawInsight {
                        spend: Some(i as f64 * 25.0),
                        frequency: Some(i as f64 / 10.0),
                        ..Default::default()
                    },
                )
            })
            .collect();
        let config = ScoringConfig::default();
        let first = evaluate_batch(&inputs, &config).unwrap();
        let second = evaluate_batch(&inputs, &config).unwrap();
        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|e| e.id.clone()).collect();
        let expected: Vec<_> = inputs.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_batch_rejects_invalid_config() {
        let config = ScoringConfig {
            target_cpa: 0.0,
            ..Default::default()
        };
        assert!(evaluate_batch(&[], &config).is_err());
    }
}
