use serde::{Deserialize, Deserializer, Serialize};

// ─── Raw platform input ─────────────────────────────────────────────────────

/// A single `{action_type, value}` pair as reported by the ads platform.
/// Used for conversion counts, cost-per-action, and action values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action_type: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
}

impl ActionEntry {
    pub fn new(action_type: &str, value: f64) -> Self {
        Self {
            action_type: action_type.to_string(),
            value: Some(value),
        }
    }
}

/// Per-entity insight record exactly as fetched upstream. Absent fields mean
/// "unknown"; the normalizer decides how each one defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInsight {
    #[serde(default, deserialize_with = "lenient_number")]
    pub impressions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub clicks: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub spend: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub ctr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cpm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub frequency: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub reach: Option<f64>,
    /// Conversion-like events.
    #[serde(default, deserialize_with = "nullable_list")]
    pub actions: Vec<ActionEntry>,
    /// Platform-computed cost per conversion event.
    #[serde(default, deserialize_with = "nullable_list")]
    pub cost_per_action_type: Vec<ActionEntry>,
    /// Monetary value of conversion events.
    #[serde(default, deserialize_with = "nullable_list")]
    pub action_values: Vec<ActionEntry>,
}

/// Metrics arrive as JSON numbers or numeric strings. Anything else is
/// treated as absent rather than rejected.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Lenient::Other(_)) | None => None,
    })
}

pub fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Creative input (ads only) ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreativeInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub body: Option<String>,
    pub title: Option<String>,
    pub call_to_action_type: Option<String>,
    pub object_type: Option<String>,
    pub instagram_permalink_url: Option<String>,
    pub object_story_spec: Option<ObjectStorySpec>,
    pub asset_feed_spec: Option<AssetFeedSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectStorySpec {
    pub link_data: Option<LinkData>,
    pub video_data: Option<VideoData>,
    pub photo_data: Option<PhotoData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    pub message: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub picture: Option<String>,
    pub call_to_action: Option<CallToAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallToAction {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoData {
    pub message: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoData {
    pub caption: Option<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetFeedSpec {
    #[serde(default, deserialize_with = "nullable_list")]
    pub images: Vec<FeedImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub videos: Vec<FeedVideo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedImage {
    pub url: Option<String>,
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedVideo {
    pub thumbnail_url: Option<String>,
    pub video_id: Option<String>,
}

/// Display-ready creative details resolved from a [`CreativeInput`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreativeSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub body: String,
    pub title: String,
    pub cta_type: String,
    pub object_type: Option<String>,
    pub instagram_url: Option<String>,
}

// ─── Entities ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Campaign,
    Ad,
}

/// A campaign or ad as handed to the engine by the upstream fetcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInput {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: EntityKind,
    pub objective: Option<String>,
    pub status: Option<String>,
    pub effective_status: Option<String>,
    pub campaign_id: Option<String>,
    /// Budgets in minor currency units (cents).
    #[serde(default, deserialize_with = "lenient_number")]
    pub daily_budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lifetime_budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub budget_remaining: Option<f64>,
    pub insights: Option<RawInsight>,
    pub creative: Option<CreativeInput>,
}

/// Metrics after normalization. Every field is finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    /// Percent.
    pub ctr: f64,
    pub cpm: f64,
    pub frequency: f64,
    pub reach: u64,
    pub conversions: u64,
    pub cpa: f64,
    pub revenue: f64,
    pub roas: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Excellent,
    Good,
    Attention,
    Warning,
    Critical,
}

impl StatusTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Attention => "Attention",
            Self::Warning => "Alert",
            Self::Critical => "Critical",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Excellent => "#10b981",
            Self::Good => "#22c55e",
            Self::Attention => "#f59e0b",
            Self::Warning => "#f97316",
            Self::Critical => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusClassification {
    pub status: StatusTier,
    pub label: String,
    pub color: String,
}

impl From<StatusTier> for StatusClassification {
    fn from(tier: StatusTier) -> Self {
        Self {
            status: tier,
            label: tier.label().to_string(),
            color: tier.color().to_string(),
        }
    }
}

// ─── Recommendations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Critical,
    Warning,
    Opportunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    Pause,
    Optimize,
    ExpandAudience,
    Scale,
    ReviewCreatives,
}

impl RecommendationAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pause => "Pause campaign",
            Self::Optimize => "View optimizations",
            Self::ExpandAudience => "Expand audience",
            Self::Scale => "Scale budget 25%",
            Self::ReviewCreatives => "Review creatives",
        }
    }
}

/// A single actionable suggestion. Derived fresh on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// `{rule}-{entity_id}`; unique per entity and rule.
    pub id: String,
    pub entity_id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    /// 1 is most urgent.
    pub priority: u8,
    pub title: String,
    pub description: String,
    pub action: RecommendationAction,
    pub action_label: String,
    pub impact_estimate: String,
    pub confidence: u8,
}

/// An entity after normalize → score → classify → recommend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
    pub objective: Option<String>,
    pub status: Option<String>,
    pub effective_status: Option<String>,
    pub campaign_id: Option<String>,
    /// Budgets in major currency units.
    pub daily_budget: Option<f64>,
    pub lifetime_budget: Option<f64>,
    pub budget_remaining: Option<f64>,
    pub metrics: CanonicalMetrics,
    pub health_score: u8,
    pub status_classification: StatusClassification,
    pub recommendations: Vec<Recommendation>,
    /// Creative performance score, ads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative_score: Option<u8>,
    /// Tier of the creative score, ads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative_classification: Option<StatusClassification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative: Option<CreativeSummary>,
}

impl ScoredEntity {
    pub fn status_tier(&self) -> StatusTier {
        self.status_classification.status
    }
}
