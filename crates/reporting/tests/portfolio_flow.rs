//! End-to-end flow: platform-shaped JSON → scored portfolio report.

use campaign_core::config::ScoringConfig;
use campaign_core::types::{EntityInput, RecommendationAction, StatusTier};
use campaign_reporting::{build_portfolio, FunnelStage};

fn sample_entities() -> Vec<EntityInput> {
    let json = r#"[
        {
            "id": "120001",
            "name": "[Fundo] Remarketing Checkout",
            "objective": "OUTCOME_SALES",
            "status": "ACTIVE",
            "daily_budget": "25000",
            "insights": {
                "impressions": "48000",
                "clicks": "960",
                "spend": "1200.50",
                "ctr": "2.0",
                "cpm": "25.01",
                "frequency": "1.8",
                "reach": "26000",
                "actions": [
                    {"action_type": "link_click", "value": "960"},
                    {"action_type": "purchase", "value": "6"}
                ],
                "cost_per_action_type": [
                    {"action_type": "purchase", "value": "200.08"}
                ],
                "action_values": [
                    {"action_type": "purchase", "value": "15600"}
                ]
            }
        },
        {
            "id": "120002",
            "name": "Brand video",
            "objective": "AWARENESS",
            "insights": {
                "impressions": "90000",
                "clicks": "90",
                "spend": "1000",
                "ctr": "0.1",
                "frequency": "5",
                "reach": "18000"
            }
        },
        {
            "id": "120003",
            "name": "Trafego blog",
            "objective": "LINK_CLICKS",
            "insights": null
        }
    ]"#;
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_full_portfolio_flow() {
    let inputs = sample_entities();
    let report = build_portfolio(&inputs, &ScoringConfig::default(), 10).unwrap();

    assert_eq!(report.total, 3);

    // Brand video: -20 frequency, -20 ctr, -30 zero conversions
    let brand = &report.entities[0];
    assert_eq!(brand.id, "120002");
    assert_eq!(brand.health_score, 30);
    assert_eq!(brand.status_tier(), StatusTier::Warning);
    let actions: Vec<_> = brand.recommendations.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![
            RecommendationAction::Pause,
            RecommendationAction::ExpandAudience,
            RecommendationAction::ReviewCreatives,
        ]
    );

    let checkout = report.entities.iter().find(|e| e.id == "120001").unwrap();
    assert_eq!(checkout.metrics.conversions, 6);
    assert!((checkout.metrics.cpa - 200.08).abs() < 1e-9);
    assert_eq!(checkout.daily_budget, Some(250.0));
    assert_eq!(checkout.health_score, 100);

    assert_eq!(report.funnel.bucket(FunnelStage::Top).entity_ids, vec!["120002"]);
    assert_eq!(report.funnel.bucket(FunnelStage::Middle).entity_ids, vec!["120003"]);
    assert_eq!(report.funnel.bucket(FunnelStage::Bottom).entity_ids, vec!["120001"]);
    assert_eq!(report.funnel.bucket(FunnelStage::Bottom).results, 6);

    assert_eq!(report.metrics.impressions, 138_000);
    assert_eq!(report.metrics.conversions, 6);
    assert!((report.metrics.revenue - 15_600.0).abs() < 1e-9);
    assert!(report
        .recommendations
        .windows(2)
        .all(|w| w[0].priority <= w[1].priority));
}

#[test]
fn test_tenant_config_changes_outcome() {
    let inputs = sample_entities();
    let strict = ScoringConfig {
        target_cpa: 90.0,
        ..Default::default()
    };
    let report = build_portfolio(&inputs, &strict, 10).unwrap();
    let checkout = report.entities.iter().find(|e| e.id == "120001").unwrap();
    assert!(checkout
        .recommendations
        .iter()
        .any(|r| r.id == "cpa-critical-120001"));
}

#[test]
fn test_report_serializes_for_transport() {
    let report = build_portfolio(&sample_entities(), &ScoringConfig::default(), 10).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["total"], 3);
    assert_eq!(value["entities"][0]["status_classification"]["status"], "warning");
    assert_eq!(value["recommendations"][0]["type"], "critical");
}
