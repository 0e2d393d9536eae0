//! REST API handlers for portfolio, ads, and breakdown analysis plus
//! operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use campaign_core::config::ScoringConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::EntityInput;
use campaign_reporting::breakdown::BreakdownRequest;
use campaign_reporting::{
    analyze_breakdown, build_ads_report, build_portfolio, AdsReport, BreakdownReport,
    PortfolioReport,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, warn};
use uuid::Uuid;

/// Maximum number of entities accepted in one analysis request.
const MAX_ENTITIES: usize = 5_000;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub node_id: String,
    pub scoring: ScoringConfig,
    pub top_recommendations: usize,
    pub start_time: Instant,
}

/// Body of the campaign and ad analysis endpoints. `config` overrides the
/// server's scoring thresholds for this request only.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub entities: Vec<EntityInput>,
    pub config: Option<ScoringConfig>,
    pub top_recommendations: Option<usize>,
}

/// Every analysis response carries a request id and generation time.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse<T> {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: T,
}

impl<T> AnalysisResponse<T> {
    fn new(report: T) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            report,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: &str, message: String) -> ApiError {
    metrics::counter!("api.validation_errors").increment(1);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

fn internal_error() -> ApiError {
    metrics::counter!("api.errors").increment(1);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "analysis_failed".to_string(),
            message: "Internal processing error".to_string(),
        }),
    )
}

fn map_error(err: CampaignError) -> ApiError {
    match err {
        CampaignError::Config(msg) => {
            warn!(error = %msg, "Rejected scoring configuration");
            bad_request("invalid_config", msg)
        }
        CampaignError::Validation(msg) => bad_request("invalid_request", msg),
    }
}

/// Validate an analysis request at the API boundary and resolve the
/// effective scoring configuration.
fn resolve_request(state: &AppState, request: &AnalyzeRequest) -> CampaignResult<ScoringConfig> {
    if request.entities.len() > MAX_ENTITIES {
        return Err(CampaignError::Validation(format!(
            "at most {MAX_ENTITIES} entities per request"
        )));
    }
    if request.entities.iter().any(|e| e.id.is_empty()) {
        return Err(CampaignError::Validation(
            "entity 'id' must not be empty".to_string(),
        ));
    }
    let config = request.config.unwrap_or(state.scoring);
    config.validate()?;
    Ok(config)
}

/// Run a synchronous analysis off the async executor.
async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CampaignError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(map_error),
        Err(e) => {
            error!(error = %e, "Analysis task panicked");
            Err(internal_error())
        }
    }
}

/// POST /v1/campaigns/analyze: Score, aggregate, and rank a portfolio.
pub async fn analyze_campaigns(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse<PortfolioReport>>, ApiError> {
    metrics::counter!("api.requests", "endpoint" => "campaigns").increment(1);
    let config = resolve_request(&state, &request).map_err(map_error)?;
    let top_n = request
        .top_recommendations
        .unwrap_or(state.top_recommendations);
    let entities = request.entities;

    let report = run_blocking(move || build_portfolio(&entities, &config, top_n)).await?;
    Ok(Json(AnalysisResponse::new(report)))
}

/// POST /v1/ads/analyze: Score ads and rank them by creative score.
pub async fn analyze_ads(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse<AdsReport>>, ApiError> {
    metrics::counter!("api.requests", "endpoint" => "ads").increment(1);
    let config = resolve_request(&state, &request).map_err(map_error)?;
    let ads = request.entities;

    let report = run_blocking(move || build_ads_report(&ads, &config)).await?;
    Ok(Json(AnalysisResponse::new(report)))
}

/// POST /v1/breakdown/analyze: Audience breakdown by age/gender, device,
/// and placement.
pub async fn analyze_audience_breakdown(
    Json(request): Json<BreakdownRequest>,
) -> Json<AnalysisResponse<BreakdownReport>> {
    metrics::counter!("api.requests", "endpoint" => "breakdown").increment(1);
    Json(AnalysisResponse::new(analyze_breakdown(&request)))
}

/// GET /health: Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /live: Liveness probe for Kubernetes.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Routes without middleware; the server adds its layers on top.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/campaigns/analyze", post(analyze_campaigns))
        .route("/v1/ads/analyze", post(analyze_ads))
        .route("/v1/breakdown/analyze", post(analyze_audience_breakdown))
        .route("/health", get(health_check))
        .route("/live", get(liveness))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            node_id: "test-node".to_string(),
            scoring: ScoringConfig::default(),
            top_recommendations: 10,
            start_time: Instant::now(),
        }
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = routes(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analyze_campaigns() {
        let body = json!({
            "entities": [
                {"id": "c1", "name": "Topo video", "insights": {"spend": "1000", "frequency": "5"}},
                {"id": "c2", "name": "Checkout", "insights": {"spend": "300", "ctr": "2.5",
                    "actions": [{"action_type": "purchase", "value": "3"}]}}
            ]
        });
        let (status, value) = post_json("/v1/campaigns/analyze", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["total"], 2);
        assert_eq!(value["entities"][0]["id"], "c1");
        assert_eq!(value["funnel"]["top"]["entity_ids"][0], "c1");
        assert!(value["request_id"].is_string());
        assert_eq!(value["recommendations"][0]["id"], "no-conv-c1");
    }

    #[tokio::test]
    async fn test_invalid_tenant_config_rejected() {
        let body = json!({
            "entities": [{"id": "c1"}],
            "config": {"target_cpa": -5}
        });
        let (status, value) = post_json("/v1/campaigns/analyze", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "invalid_config");
    }

    #[tokio::test]
    async fn test_empty_entity_id_rejected() {
        let body = json!({"entities": [{"id": ""}]});
        let (status, value) = post_json("/v1/ads/analyze", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "invalid_request");
    }

    #[test]
    fn test_oversized_request_is_a_validation_error() {
        let entity = EntityInput {
            id: "c".to_string(),
            ..Default::default()
        };
        let request = AnalyzeRequest {
            entities: vec![entity; MAX_ENTITIES + 1],
            config: None,
            top_recommendations: None,
        };
        assert!(matches!(
            resolve_request(&state(), &request),
            Err(CampaignError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_analyze_ads() {
        let body = json!({
            "entities": [
                {"id": "a1", "kind": "ad", "insights": {"ctr": "0.2", "impressions": "5000"}},
                {"id": "a2", "kind": "ad", "insights": {"ctr": "3.4"},
                 "creative": {"thumbnail_url": "https://cdn/a2.jpg"}}
            ]
        });
        let (status, value) = post_json("/v1/ads/analyze", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["ads"][0]["id"], "a2");
        assert_eq!(value["ads"][0]["creative_score"], 75);
        assert_eq!(value["ads"][0]["creative_classification"]["status"], "good");
        assert_eq!(value["ads"][0]["creative"]["image_url"], "https://cdn/a2.jpg");
    }

    #[tokio::test]
    async fn test_analyze_breakdown() {
        let body = json!({
            "devices": [{"device_platform": "desktop", "spend": "50",
                         "actions": [{"action_type": "lead", "value": "2"}]}]
        });
        let (status, value) = post_json("/v1/breakdown/analyze", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["devices"][0]["device_label"], "Desktop");
        assert_eq!(value["devices"][0]["cpa"], 25.0);
    }

    #[tokio::test]
    async fn test_health() {
        let response = routes(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
