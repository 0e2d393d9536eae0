//! Ad-level creative scoring and creative detail resolution.
//!
//! The creative score uses fixed absolute bands rather than the tenant
//! targets; it ranks ads against each other, while the health score judges
//! them against the account's goals.

use campaign_core::types::{CanonicalMetrics, CreativeInput, CreativeSummary};

const BASE_CREATIVE_SCORE: i32 = 50;

pub fn creative_score(m: &CanonicalMetrics) -> u8 {
    let mut score = BASE_CREATIVE_SCORE;

    score += if m.ctr > 3.0 {
        25
    } else if m.ctr > 2.0 {
        20
    } else if m.ctr > 1.5 {
        15
    } else if m.ctr > 1.0 {
        10
    } else if m.ctr < 0.5 && m.impressions > 100 {
        -15
    } else {
        0
    };

    let has_cpa = m.cpa > 0.0;
    score += if has_cpa && m.cpa < 200.0 {
        30
    } else if has_cpa && m.cpa < 300.0 {
        20
    } else if has_cpa && m.cpa < 400.0 {
        10
    } else if m.cpa > 500.0 {
        -20
    } else {
        0
    };

    score += match m.conversions {
        10.. => 15,
        5..=9 => 10,
        1..=4 => 5,
        0 => 0,
    };

    score += if m.roas >= 5.0 {
        15
    } else if m.roas >= 3.0 {
        10
    } else if m.roas > 0.0 && m.roas < 1.0 {
        -10
    } else {
        0
    };

    score += if m.frequency > 4.0 {
        -15
    } else if m.frequency > 3.0 {
        -10
    } else {
        0
    };

    score.clamp(0, 100) as u8
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Resolve the image, copy, and call-to-action of a creative. Direct
/// thumbnails win; otherwise the object story spec is consulted (link,
/// then video, then photo data, later ones overriding copy), and finally
/// the asset feed.
pub fn resolve_creative(creative: &CreativeInput) -> CreativeSummary {
    let mut image_url =
        non_empty(&creative.thumbnail_url).or_else(|| non_empty(&creative.image_url));
    let mut body = creative.body.clone().unwrap_or_default();
    let mut title = creative.title.clone().unwrap_or_default();
    let mut cta_type = creative.call_to_action_type.clone().unwrap_or_default();

    if image_url.is_none() {
        if let Some(spec) = &creative.object_story_spec {
            if let Some(link) = &spec.link_data {
                body = non_empty(&link.message).unwrap_or(body);
                title = non_empty(&link.name).unwrap_or(title);
                image_url = non_empty(&link.image_url)
                    .or_else(|| non_empty(&link.picture))
                    .or(image_url);
                if let Some(kind) = link.call_to_action.as_ref().and_then(|c| non_empty(&c.kind)) {
                    cta_type = kind;
                }
            }
            if let Some(video) = &spec.video_data {
                body = non_empty(&video.message).unwrap_or(body);
                title = non_empty(&video.title).unwrap_or(title);
                image_url = non_empty(&video.image_url)
                    .or_else(|| non_empty(&video.video_id))
                    .or(image_url);
            }
            if let Some(photo) = &spec.photo_data {
                body = non_empty(&photo.caption).unwrap_or(body);
                image_url = non_empty(&photo.image_url)
                    .or_else(|| non_empty(&photo.url))
                    .or(image_url);
            }
        }
    }

    if image_url.is_none() {
        if let Some(feed) = &creative.asset_feed_spec {
            if let Some(image) = feed.images.first() {
                image_url = non_empty(&image.url).or_else(|| non_empty(&image.hash));
            }
            if let Some(video) = feed.videos.first() {
                image_url = non_empty(&video.thumbnail_url).or_else(|| non_empty(&video.video_id));
            }
        }
    }

    CreativeSummary {
        id: creative.id.clone(),
        name: creative.name.clone(),
        image_url,
        body,
        title,
        cta_type,
        object_type: creative.object_type.clone(),
        instagram_url: non_empty(&creative.instagram_permalink_url),
    }
}
