//! Portfolio reporting: aggregated KPIs, funnel distribution, audience
//! breakdowns, and the assembled portfolio report.

pub mod aggregation;
pub mod breakdown;
pub mod funnel;
pub mod portfolio;

pub use aggregation::{aggregate, AggregatedMetrics};
pub use breakdown::{analyze_breakdown, BreakdownReport};
pub use funnel::{analyze_funnel, FunnelReport, FunnelStage};
pub use portfolio::{build_ads_report, build_portfolio, AdsReport, PortfolioReport};
