//! Spend, revenue and ROAS roll-ups for campaigns, customers and the whole
//! book of business.
//!
//! Summaries are computed from the live channel records on every call and
//! are never stored.

use crate::metrics::{aggregate, ChannelTotals};
use adalloc_core::{Campaign, CampaignStatus, Customer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub campaign_id: String,
    pub total_spend: f64,
    pub total_revenue: f64,
    /// `revenue / spend` (0.0 when spend is zero).
    pub blended_roas: f64,
    /// `spend / budget * 100` (0.0 when the budget is zero).
    pub budget_utilization: f64,
    pub channel_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub blended_roas: f64,
    pub active_campaigns: usize,
    pub campaign_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub blended_roas: f64,
    pub total_customers: usize,
    pub total_campaigns: usize,
}

// ---------------------------------------------------------------------------
// Roll-ups
// ---------------------------------------------------------------------------

/// Share of `budget` consumed by `spend`, as a percentage.
pub fn budget_utilization(spend: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        spend / budget * 100.0
    } else {
        0.0
    }
}

pub fn campaign_summary(campaign: &Campaign) -> CampaignSummary {
    let totals = aggregate(&campaign.channels);
    CampaignSummary {
        campaign_id: campaign.id.clone(),
        total_spend: totals.total_spend,
        total_revenue: totals.total_revenue,
        blended_roas: totals.blended_roas(),
        budget_utilization: budget_utilization(totals.total_spend, campaign.budget),
        channel_count: campaign.channels.len(),
    }
}

pub fn customer_summary(customer: &Customer) -> CustomerSummary {
    let totals = aggregate(customer.channels());
    CustomerSummary {
        customer_id: customer.id.clone(),
        total_spend: totals.total_spend,
        total_revenue: totals.total_revenue,
        blended_roas: totals.blended_roas(),
        active_campaigns: customer
            .campaigns
            .iter()
            .filter(|c| c.status == CampaignStatus::Active)
            .count(),
        campaign_count: customer.campaigns.len(),
    }
}

/// Totals across every channel of every customer.
pub fn global_totals(customers: &[Customer]) -> ChannelTotals {
    aggregate(customers.iter().flat_map(|c| c.channels()))
}

pub fn global_summary(customers: &[Customer]) -> GlobalSummary {
    let totals = global_totals(customers);
    GlobalSummary {
        total_spend: totals.total_spend,
        total_revenue: totals.total_revenue,
        blended_roas: totals.blended_roas(),
        total_customers: customers.len(),
        total_campaigns: customers.iter().map(|c| c.campaigns.len()).sum(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
