use crate::error::{CampaignError, CampaignResult};
use serde::{Deserialize, Serialize};

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `CAMPAIGN_PULSE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Business thresholds used by the scoring rules. Supplied per tenant or
/// defaulted; every field must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Revenue attributed to each conversion when the platform reports none.
    #[serde(default = "default_average_order_value")]
    pub average_order_value: f64,
    #[serde(default = "default_target_cpa")]
    pub target_cpa: f64,
    #[serde(default = "default_target_roas")]
    pub target_roas: f64,
    #[serde(default = "default_max_frequency")]
    pub max_frequency: f64,
    /// Minimum acceptable CTR, in percent.
    #[serde(default = "default_min_ctr")]
    pub min_ctr: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Cap on the cross-entity recommendation list.
    #[serde(default = "default_top_recommendations")]
    pub top_recommendations: usize,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_average_order_value() -> f64 {
    2600.0
}
fn default_target_cpa() -> f64 {
    400.0
}
fn default_target_roas() -> f64 {
    3.0
}
fn default_max_frequency() -> f64 {
    3.0
}
fn default_min_ctr() -> f64 {
    1.0
}
fn default_top_recommendations() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            average_order_value: default_average_order_value(),
            target_cpa: default_target_cpa(),
            target_roas: default_target_roas(),
            max_frequency: default_max_frequency(),
            min_ctr: default_min_ctr(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_recommendations: default_top_recommendations(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            scoring: ScoringConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Reject thresholds that are zero, negative, or not finite.
    pub fn validate(&self) -> CampaignResult<()> {
        let fields = [
            ("average_order_value", self.average_order_value),
            ("target_cpa", self.target_cpa),
            ("target_roas", self.target_roas),
            ("max_frequency", self.max_frequency),
            ("min_ctr", self.min_ctr),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(CampaignError::Config(format!(
                    "scoring.{name} must be strictly positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment variables.
    /// Environment variables take precedence over the file.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_PULSE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
