//! Campaign performance reporting: per-channel metric derivation, blended
//! totals at campaign, customer and global scope, and goal tracking.

pub mod budget;
pub mod dashboard;
pub mod goals;
pub mod metrics;

pub use budget::{
    budget_utilization, campaign_summary, customer_summary, global_summary, global_totals,
    CampaignSummary, CustomerSummary, GlobalSummary,
};
pub use dashboard::{list_channels, ChannelRow, ChannelSort};
pub use goals::{goal_progress, refresh_overdue, sync_goals};
pub use metrics::{
    aggregate, derive_metrics, reprice, ChannelInput, ChannelTotals, DerivedMetrics, RevenueSource,
};
