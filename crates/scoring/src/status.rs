use campaign_core::types::{StatusClassification, StatusTier};

/// Lower bound of each tier, checked top-down.
const TIER_THRESHOLDS: &[(u8, StatusTier)] = &[
    (80, StatusTier::Excellent),
    (60, StatusTier::Good),
    (40, StatusTier::Attention),
    (20, StatusTier::Warning),
];

pub fn tier_for(score: u8) -> StatusTier {
    TIER_THRESHOLDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(StatusTier::Critical)
}

/// Map a health score to its tier with display label and color.
pub fn classify(score: u8) -> StatusClassification {
    tier_for(score).into()
}
