//! Domain tree: customers own campaigns, campaigns own channels.
//!
//! Field names serialize in camelCase so persisted documents and exports keep
//! the dashboard's original JSON shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate an identifier of the form `<prefix>-<uuid>`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

// ─── Channel ───────────────────────────────────────────────────────────────

/// A single advertising line item inside a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelData {
    pub id: String,
    pub name: String,
    pub spend: f64,
    pub revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
    /// Return on ad spend, `revenue / spend`.
    pub roas: f64,
    /// Cost per click, `spend / clicks`.
    pub cpc: f64,
    /// Click-through rate as a percentage.
    pub ctr: f64,
    /// Share of the campaign budget in percent. Informational only.
    #[serde(default)]
    pub allocation: f64,
    pub color: String,
}

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Budget ceiling for the campaign's channels.
    pub budget: f64,
    #[serde(default)]
    pub channels: Vec<ChannelData>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn channel(&self, channel_id: &str) -> Option<&ChannelData> {
        self.channels.iter().find(|c| c.id == channel_id)
    }

    pub fn channel_mut(&mut self, channel_id: &str) -> Option<&mut ChannelData> {
        self.channels.iter_mut().find(|c| c.id == channel_id)
    }
}

// ─── Customer ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: CustomerStatus,
    pub total_budget: f64,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    pub created_at: DateTime<Utc>,
    pub color: String,
}

impl Customer {
    pub fn campaign(&self, campaign_id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == campaign_id)
    }

    pub fn campaign_mut(&mut self, campaign_id: &str) -> Option<&mut Campaign> {
        self.campaigns.iter_mut().find(|c| c.id == campaign_id)
    }

    /// Every channel under this customer, across all campaigns.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelData> {
        self.campaigns.iter().flat_map(|c| c.channels.iter())
    }
}

// ─── Goal ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Overdue,
}

/// Which global aggregate a goal tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Revenue,
    Roas,
    Spend,
    Customers,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Revenue => "revenue",
            GoalType::Roas => "roas",
            GoalType::Spend => "spend",
            GoalType::Customers => "customers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_value: f64,
    /// Overwritten from the live global aggregate; never user-edited.
    pub current_value: f64,
    pub deadline: NaiveDate,
    pub status: GoalStatus,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub created_at: DateTime<Utc>,
}

// ─── Recommendation ────────────────────────────────────────────────────────

/// One channel's suggested spend from the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub channel_id: String,
    pub suggested_spend: f64,
    pub reasoning: String,
}

/// Reply contract of the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendations: Vec<OptimizationResult>,
    pub global_strategy: String,
}

impl RecommendationResponse {
    /// An empty recommendation set carrying an explanation instead.
    pub fn fallback(explanation: impl Into<String>) -> Self {
        Self {
            recommendations: Vec::new(),
            global_strategy: explanation.into(),
        }
    }

    pub fn total_suggested_spend(&self) -> f64 {
        self.recommendations.iter().map(|r| r.suggested_spend).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_keeps_prefix() {
        let a = new_id("cust");
        let b = new_id("cust");
        assert!(a.starts_with("cust-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_channel_serializes_camel_case() {
        let ch = ChannelData {
            id: "google".into(),
            name: "Google Ads".into(),
            spend: 15000.0,
            revenue: 67500.0,
            impressions: 450_000,
            clicks: 12_500,
            roas: 4.5,
            cpc: 1.2,
            ctr: 2.78,
            allocation: 30.0,
            color: "#4285F4".into(),
        };
        let json = serde_json::to_value(&ch).unwrap();
        assert_eq!(json["roas"], 4.5);
        assert_eq!(json["impressions"], 450_000);
        assert!(json.get("allocation").is_some());
    }

    #[test]
    fn test_recommendation_wire_shape() {
        let raw = r#"{
            "recommendations": [
                {"channelId": "google", "suggestedSpend": 20000, "reasoning": "Highest ROAS"}
            ],
            "globalStrategy": "Shift budget to search."
        }"#;
        let parsed: RecommendationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.recommendations[0].channel_id, "google");
        assert!((parsed.total_suggested_spend() - 20000.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_type_field_is_named_type() {
        let goal = Goal {
            id: "goal-1".into(),
            name: "Q4 revenue".into(),
            target_value: 100_000.0,
            current_value: 0.0,
            deadline: NaiveDate::from_ymd_opt(2030, 12, 31).unwrap(),
            status: GoalStatus::Active,
            goal_type: GoalType::Revenue,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "revenue");
        assert_eq!(json["status"], "active");
        assert_eq!(json["targetValue"], 100_000.0);
    }

    #[test]
    fn test_customer_channels_flatten_campaigns() {
        let now = Utc::now();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let channel = |id: &str| ChannelData {
            id: id.into(),
            name: id.into(),
            spend: 1.0,
            revenue: 2.0,
            impressions: 0,
            clicks: 0,
            roas: 2.0,
            cpc: 0.0,
            ctr: 0.0,
            allocation: 0.0,
            color: "#000000".into(),
        };
        let campaign = |id: &str, chans: Vec<ChannelData>| Campaign {
            id: id.into(),
            name: id.into(),
            customer_id: "cust-1".into(),
            description: None,
            status: CampaignStatus::Active,
            start_date: start,
            end_date: None,
            budget: 10.0,
            channels: chans,
            created_at: now,
        };
        let customer = Customer {
            id: "cust-1".into(),
            name: "Acme".into(),
            industry: None,
            contact_person: None,
            email: None,
            status: CustomerStatus::Active,
            total_budget: 100.0,
            campaigns: vec![
                campaign("camp-a", vec![channel("a1"), channel("a2")]),
                campaign("camp-b", vec![channel("b1")]),
            ],
            created_at: now,
            color: "#6366f1".into(),
        };
        let ids: Vec<&str> = customer.channels().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert!(customer.campaign("camp-b").unwrap().channel("b1").is_some());
    }
}
