//! Funnel analysis: classifies entities into top/middle/bottom stages and
//! compares observed spend distribution against the ideal split.

use campaign_core::types::ScoredEntity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    /// Awareness / reach.
    Top,
    /// Consideration: traffic and engagement.
    Middle,
    /// Conversion; also the catch-all for unclassifiable entities.
    Bottom,
}

/// Keyword sets checked per stage: `(objective keywords, name keywords)`.
const TOP_KEYWORDS: (&[&str], &[&str]) = (&["awareness", "reach"], &["topo", "alcance"]);
const MIDDLE_KEYWORDS: (&[&str], &[&str]) = (&["traffic", "engagement"], &["meio", "trafego"]);

impl FunnelStage {
    /// Target share of total spend, in percent. A baseline only.
    pub fn ideal_percentage(&self) -> f64 {
        match self {
            Self::Top => 20.0,
            Self::Middle => 30.0,
            Self::Bottom => 50.0,
        }
    }

    /// The metric that counts as a "result" at this stage.
    fn result_of(&self, entity: &ScoredEntity) -> u64 {
        match self {
            Self::Top => entity.metrics.reach,
            Self::Middle => entity.metrics.clicks,
            Self::Bottom => entity.metrics.conversions,
        }
    }

    /// First match wins: top, then middle, then bottom as the fallback.
    pub fn classify(objective: Option<&str>, name: &str) -> Self {
        let objective = objective.unwrap_or_default().to_lowercase();
        let name = name.to_lowercase();
        let matches = |(objective_words, name_words): (&[&str], &[&str])| {
            objective_words.iter().any(|w| objective.contains(w))
                || name_words.iter().any(|w| name.contains(w))
        };

        if matches(TOP_KEYWORDS) {
            Self::Top
        } else if matches(MIDDLE_KEYWORDS) {
            Self::Middle
        } else {
            Self::Bottom
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelBucket {
    pub stage: FunnelStage,
    pub entity_ids: Vec<String>,
    pub spend: f64,
    /// Reach for top, clicks for middle, conversions for bottom.
    pub results: u64,
    /// Share of total spend (0.0 when total spend is zero).
    pub observed_percentage: f64,
    pub ideal_percentage: f64,
}

impl FunnelBucket {
    fn new(stage: FunnelStage) -> Self {
        Self {
            stage,
            entity_ids: Vec::new(),
            spend: 0.0,
            results: 0,
            observed_percentage: 0.0,
            ideal_percentage: stage.ideal_percentage(),
        }
    }

    fn add(&mut self, entity: &ScoredEntity) {
        self.entity_ids.push(entity.id.clone());
        self.spend += entity.metrics.spend;
        self.results = self.results.saturating_add(self.stage.result_of(entity));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelReport {
    pub top: FunnelBucket,
    pub middle: FunnelBucket,
    pub bottom: FunnelBucket,
    pub total_spend: f64,
}

impl FunnelReport {
    pub fn bucket(&self, stage: FunnelStage) -> &FunnelBucket {
        match stage {
            FunnelStage::Top => &self.top,
            FunnelStage::Middle => &self.middle,
            FunnelStage::Bottom => &self.bottom,
        }
    }

    fn bucket_mut(&mut self, stage: FunnelStage) -> &mut FunnelBucket {
        match stage {
            FunnelStage::Top => &mut self.top,
            FunnelStage::Middle => &mut self.middle,
            FunnelStage::Bottom => &mut self.bottom,
        }
    }
}

pub fn analyze_funnel(entities: &[ScoredEntity]) -> FunnelReport {
    let mut report = FunnelReport {
        top: FunnelBucket::new(FunnelStage::Top),
        middle: FunnelBucket::new(FunnelStage::Middle),
        bottom: FunnelBucket::new(FunnelStage::Bottom),
        total_spend: 0.0,
    };

    for entity in entities {
        let stage = FunnelStage::classify(entity.objective.as_deref(), &entity.name);
        report.bucket_mut(stage).add(entity);
    }

    let total_spend = report.top.spend + report.middle.spend + report.bottom.spend;
    report.total_spend = total_spend;
    for bucket in [&mut report.top, &mut report.middle, &mut report.bottom] {
        bucket.observed_percentage = if total_spend > 0.0 {
            bucket.spend / total_spend * 100.0
        } else {
            0.0
        };
    }

    report
}
