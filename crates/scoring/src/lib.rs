//! Rule-based performance scoring for campaigns and ads: metric
//! normalization, health scoring, status tiers, and recommendations.

pub mod creative;
pub mod health;
pub mod normalizer;
pub mod pipeline;
pub mod recommendations;
pub mod status;

pub use creative::{creative_score, resolve_creative};
pub use health::calculate_health_score;
pub use normalizer::normalize;
pub use pipeline::{evaluate_batch, evaluate_entity};
pub use recommendations::generate_recommendations;
pub use status::classify;
