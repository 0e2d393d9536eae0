//! Audience breakdowns: spend and conversions by age/gender, device, and
//! placement, with CPA per segment.

use campaign_core::types::{lenient_number, nullable_list, ActionEntry};
use campaign_scoring::normalizer::{count, extract_conversions, non_negative};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Breakdown rows only count the primary conversion events.
pub const BREAKDOWN_CONVERSION_TYPES: &[&str] = &[
    "purchase",
    "omni_purchase",
    "lead",
    "onsite_conversion.lead_grouped",
];

/// Cap on the combined age × gender list.
const MAX_COMBINED_SEGMENTS: usize = 20;

/// One row of a platform breakdown query. Which dimension fields are set
/// depends on the breakdown requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub device_platform: Option<String>,
    pub publisher_platform: Option<String>,
    pub platform_position: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub impressions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub clicks: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub spend: Option<f64>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub actions: Vec<ActionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRequest {
    #[serde(default, deserialize_with = "nullable_list")]
    pub age_gender: Vec<BreakdownRow>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub devices: Vec<BreakdownRow>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub placements: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeSegment {
    pub age: String,
    pub spend: f64,
    pub conversions: u64,
    pub cpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderSegment {
    pub gender: String,
    pub label: String,
    pub spend: f64,
    pub conversions: u64,
    pub cpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGenderSegment {
    pub age: String,
    pub gender: String,
    pub gender_label: String,
    pub spend: f64,
    pub conversions: u64,
    pub cpa: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeGenderBreakdown {
    /// Sorted by age bracket.
    pub by_age: Vec<AgeSegment>,
    /// Male and female only.
    pub by_gender: Vec<GenderSegment>,
    /// Cheapest CPA first, capped at 20.
    pub combined: Vec<AgeGenderSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSegment {
    pub device: String,
    pub device_label: String,
    pub spend: f64,
    pub conversions: u64,
    pub cpa: f64,
    pub impressions: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSegment {
    pub platform: String,
    pub position: String,
    pub label: String,
    pub spend: f64,
    pub conversions: u64,
    pub cpa: f64,
    pub impressions: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownReport {
    pub age_gender: AgeGenderBreakdown,
    pub devices: Vec<DeviceSegment>,
    pub placements: Vec<PlacementSegment>,
}

// ─── Label tables ───────────────────────────────────────────────────────────

fn gender_label(gender: &str) -> &'static str {
    match gender {
        "male" => "Male",
        "female" => "Female",
        _ => "Other",
    }
}

fn device_label(device: &str) -> String {
    match device {
        "mobile_app" => "App Mobile",
        "mobile_web" => "Mobile Web",
        "desktop" => "Desktop",
        "mobile" => "Mobile",
        "tablet" => "Tablet",
        other => other,
    }
    .to_string()
}

fn platform_label(platform: &str) -> &str {
    match platform {
        "facebook" => "Facebook",
        "instagram" => "Instagram",
        "messenger" => "Messenger",
        "audience_network" => "Audience Network",
        other => other,
    }
}

fn position_label(position: &str) -> &str {
    match position {
        "feed" => "Feed",
        "story" => "Stories",
        "reels" => "Reels",
        "explore" => "Explore",
        "search" => "Search",
        "marketplace" => "Marketplace",
        "video_feeds" => "Video Feeds",
        "right_hand_column" => "Right Column",
        "instant_article" => "Instant Articles",
        "instream_video" => "In-Stream",
        "an_classic" => "Audience Network",
        other => other,
    }
}

// ─── Analysis ───────────────────────────────────────────────────────────────

fn cpa(spend: f64, conversions: u64) -> f64 {
    if conversions > 0 {
        spend / conversions as f64
    } else {
        0.0
    }
}

struct RowTotals {
    spend: f64,
    conversions: u64,
    impressions: u64,
    clicks: u64,
}

impl From<&BreakdownRow> for RowTotals {
    fn from(row: &BreakdownRow) -> Self {
        Self {
            spend: non_negative(row.spend),
            conversions: extract_conversions(&row.actions, BREAKDOWN_CONVERSION_TYPES),
            impressions: count(row.impressions),
            clicks: count(row.clicks),
        }
    }
}

pub fn analyze_age_gender(rows: &[BreakdownRow]) -> AgeGenderBreakdown {
    let mut by_age: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    let mut male = (0.0, 0u64);
    let mut female = (0.0, 0u64);
    let mut combined = Vec::with_capacity(rows.len());

    for row in rows {
        let totals = RowTotals::from(row);
        let age = row.age.clone().unwrap_or_else(|| "unknown".to_string());
        let gender = row.gender.clone().unwrap_or_else(|| "unknown".to_string());

        let entry = by_age.entry(age.clone()).or_default();
        entry.0 += totals.spend;
        entry.1 = entry.1.saturating_add(totals.conversions);

        // Rows with other genders still count toward age and combined totals.
        let bucket = match gender.as_str() {
            "male" => Some(&mut male),
            "female" => Some(&mut female),
            _ => None,
        };
        if let Some(bucket) = bucket {
            bucket.0 += totals.spend;
            bucket.1 = bucket.1.saturating_add(totals.conversions);
        }

        combined.push(AgeGenderSegment {
            gender_label: gender_label(&gender).to_string(),
            age,
            gender,
            spend: totals.spend,
            conversions: totals.conversions,
            cpa: cpa(totals.spend, totals.conversions),
        });
    }

    combined.sort_by(|a, b| a.cpa.total_cmp(&b.cpa));
    combined.truncate(MAX_COMBINED_SEGMENTS);

    let by_gender = [("male", male), ("female", female)]
        .into_iter()
        .map(|(gender, (spend, conversions))| GenderSegment {
            gender: gender.to_string(),
            label: gender_label(gender).to_string(),
            spend,
            conversions,
            cpa: cpa(spend, conversions),
        })
        .collect();

    AgeGenderBreakdown {
        by_age: by_age
            .into_iter()
            .map(|(age, (spend, conversions))| AgeSegment {
                age,
                spend,
                conversions,
                cpa: cpa(spend, conversions),
            })
            .collect(),
        by_gender,
        combined,
    }
}

/// One segment per row, most conversions first.
pub fn analyze_devices(rows: &[BreakdownRow]) -> Vec<DeviceSegment> {
    let mut segments: Vec<DeviceSegment> = rows
        .iter()
        .map(|row| {
            let totals = RowTotals::from(row);
            let device = row.device_platform.clone().unwrap_or_default();
            DeviceSegment {
                device_label: device_label(&device),
                device,
                spend: totals.spend,
                conversions: totals.conversions,
                cpa: cpa(totals.spend, totals.conversions),
                impressions: totals.impressions,
                clicks: totals.clicks,
            }
        })
        .collect();
    segments.sort_by(|a, b| b.conversions.cmp(&a.conversions));
    segments
}

/// One segment per platform/position row, most conversions first.
pub fn analyze_placements(rows: &[BreakdownRow]) -> Vec<PlacementSegment> {
    let mut segments: Vec<PlacementSegment> = rows
        .iter()
        .map(|row| {
            let totals = RowTotals::from(row);
            let platform = row.publisher_platform.clone().unwrap_or_default();
            let position = row.platform_position.clone().unwrap_or_default();
            PlacementSegment {
                label: format!("{} - {}", platform_label(&platform), position_label(&position)),
                platform,
                position,
                spend: totals.spend,
                conversions: totals.conversions,
                cpa: cpa(totals.spend, totals.conversions),
                impressions: totals.impressions,
                clicks: totals.clicks,
            }
        })
        .collect();
    segments.sort_by(|a, b| b.conversions.cmp(&a.conversions));
    segments
}

pub fn analyze_breakdown(request: &BreakdownRequest) -> BreakdownReport {
    BreakdownReport {
        age_gender: analyze_age_gender(&request.age_gender),
        devices: analyze_devices(&request.devices),
        placements: analyze_placements(&request.placements),
    }
}
