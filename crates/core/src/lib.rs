//! Shared data model, configuration, and error types for Campaign Pulse.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ScoringConfig};
pub use error::{CampaignError, CampaignResult};
