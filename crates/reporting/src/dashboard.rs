//! Cross-campaign channel listing for the channels overview.

use adalloc_core::Customer;
use serde::{Deserialize, Serialize};

/// A channel flattened out of the tree together with its owners' names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRow {
    pub channel_id: String,
    pub channel_name: String,
    pub customer_name: String,
    pub campaign_name: String,
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSort {
    #[default]
    Spend,
    Revenue,
    Roas,
}

impl ChannelSort {
    fn key(&self, row: &ChannelRow) -> f64 {
        match self {
            ChannelSort::Spend => row.spend,
            ChannelSort::Revenue => row.revenue,
            ChannelSort::Roas => row.roas,
        }
    }
}

/// Every channel under `customers`, filtered by a case-insensitive `query`
/// over channel, customer and campaign names, sorted descending by `sort`.
pub fn list_channels(customers: &[Customer], query: &str, sort: ChannelSort) -> Vec<ChannelRow> {
    let needle = query.trim().to_lowercase();

    let mut rows: Vec<ChannelRow> = customers
        .iter()
        .flat_map(|customer| {
            customer.campaigns.iter().flat_map(move |campaign| {
                campaign.channels.iter().map(move |channel| ChannelRow {
                    channel_id: channel.id.clone(),
                    channel_name: channel.name.clone(),
                    customer_name: customer.name.clone(),
                    campaign_name: campaign.name.clone(),
                    spend: channel.spend,
                    revenue: channel.revenue,
                    roas: channel.roas,
                    impressions: channel.impressions,
                    clicks: channel.clicks,
                    ctr: channel.ctr,
                    color: channel.color.clone(),
                })
            })
        })
        .filter(|row| {
            needle.is_empty()
                || row.channel_name.to_lowercase().contains(&needle)
                || row.customer_name.to_lowercase().contains(&needle)
                || row.campaign_name.to_lowercase().contains(&needle)
        })
        .collect();

    rows.sort_by(|a, b| sort.key(b).total_cmp(&sort.key(a)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use adalloc_core::{Campaign, CampaignStatus, ChannelData, CustomerStatus};
    use chrono::{NaiveDate, Utc};

    fn channel(name: &str, spend: f64, roas: f64) -> ChannelData {
        ChannelData {
            id: format!("ch-{}", name.to_lowercase()),
            name: name.into(),
            spend,
            revenue: spend * roas,
            impressions: 1_000,
            clicks: 10,
            roas,
            cpc: 0.0,
            ctr: 1.0,
            allocation: 0.0,
            color: "#000000".into(),
        }
    }

    fn book() -> Vec<Customer> {
        let campaign = |name: &str, channels: Vec<ChannelData>| Campaign {
            id: format!("camp-{}", name),
            name: name.into(),
            customer_id: String::new(),
            description: None,
            status: CampaignStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            budget: 50_000.0,
            channels,
            created_at: Utc::now(),
        };
        let customer = |name: &str, industry: &str, campaigns: Vec<Campaign>| Customer {
            id: format!("cust-{}", name),
            name: name.into(),
            industry: Some(industry.into()),
            contact_person: None,
            email: None,
            status: CustomerStatus::Active,
            total_budget: 100_000.0,
            campaigns,
            created_at: Utc::now(),
            color: "#000000".into(),
        };
        vec![
            customer(
                "Acme Retail",
                "Retail",
                vec![campaign("Spring Sale", vec![channel("Google Ads", 15_000.0, 4.5), channel("TikTok Ads", 10_000.0, 1.8)])],
            ),
            customer(
                "Nova Fintech",
                "Finance",
                vec![campaign("Launch", vec![channel("LinkedIn Ads", 5_000.0, 3.0)])],
            ),
        ]
    }

    #[test]
    fn test_list_all_sorted_by_spend() {
        let rows = list_channels(&book(), "", ChannelSort::Spend);
        let names: Vec<&str> = rows.iter().map(|r| r.channel_name.as_str()).collect();
        assert_eq!(names, vec!["Google Ads", "TikTok Ads", "LinkedIn Ads"]);
        assert_eq!(rows[2].customer_name, "Nova Fintech");
    }

    #[test]
    fn test_sort_by_roas() {
        let rows = list_channels(&book(), "", ChannelSort::Roas);
        assert_eq!(rows[0].channel_name, "Google Ads");
        assert_eq!(rows[1].channel_name, "LinkedIn Ads");
    }

    #[test]
    fn test_query_matches_customer_and_campaign() {
        assert_eq!(list_channels(&book(), "nova", ChannelSort::Spend).len(), 1);
        assert_eq!(list_channels(&book(), "SPRING", ChannelSort::Spend).len(), 2);
        assert_eq!(list_channels(&book(), "tiktok", ChannelSort::Revenue).len(), 1);
        assert!(list_channels(&book(), "bing", ChannelSort::Spend).is_empty());
    }
}
