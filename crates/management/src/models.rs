//! Management request types, i.e. what a user supplies when adding entities.

use adalloc_core::{CampaignStatus, CustomerStatus, GoalType};
use adalloc_reporting::RevenueSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CUSTOMER_COLORS: [&str; 6] = ["#6366f1", "#0ea5e9", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6"];
pub const CHANNEL_COLORS: [&str; 8] = [
    "#4285F4", "#0668E1", "#000000", "#0a66c2", "#FF0000", "#1DA1F2", "#E60023", "#FFFC00",
];

// ─── Customer ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_customer_status")]
    pub status: CustomerStatus,
    #[serde(default = "default_total_budget")]
    pub total_budget: f64,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_customer_status() -> CustomerStatus {
    CustomerStatus::Active
}
fn default_total_budget() -> f64 {
    50_000.0
}

impl NewCustomer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: None,
            contact_person: None,
            email: None,
            status: default_customer_status(),
            total_budget: default_total_budget(),
            color: None,
        }
    }
}

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_campaign_status")]
    pub status: CampaignStatus,
    /// Defaults to today.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Defaults to the settings' default campaign budget.
    #[serde(default)]
    pub budget: Option<f64>,
}

fn default_campaign_status() -> CampaignStatus {
    CampaignStatus::Active
}

impl NewCampaign {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: default_campaign_status(),
            start_date: None,
            end_date: None,
            budget: None,
        }
    }
}

// ─── Channel ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChannel {
    pub name: String,
    pub spend: f64,
    /// Whether revenue or ROAS was entered; the other is derived.
    pub source: RevenueSource,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub allocation: f64,
    #[serde(default)]
    pub color: Option<String>,
}

// ─── Goal ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_value: f64,
    pub deadline: NaiveDate,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
}
