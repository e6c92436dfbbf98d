//! Built-in demo dataset used when no customers have been stored yet.

use adalloc_core::{Campaign, CampaignStatus, ChannelData, Customer, CustomerStatus};
use adalloc_reporting::{derive_metrics, ChannelInput, RevenueSource};
use chrono::{Duration, Utc};

/// Spend available to the flagship demo campaign.
pub const DEMO_TOTAL_BUDGET: f64 = 50_000.0;

#[allow(clippy::too_many_arguments)]
fn channel(
    id: &str,
    name: &str,
    spend: f64,
    revenue: f64,
    impressions: u64,
    clicks: u64,
    allocation: f64,
    color: &str,
) -> ChannelData {
    let m = derive_metrics(&ChannelInput {
        spend,
        source: RevenueSource::Revenue(revenue),
        clicks,
        impressions,
    });
    ChannelData {
        id: id.to_string(),
        name: name.to_string(),
        spend,
        revenue: m.revenue,
        impressions,
        clicks,
        roas: m.roas,
        cpc: m.cpc,
        ctr: m.ctr,
        allocation,
        color: color.to_string(),
    }
}

pub fn seed_customers() -> Vec<Customer> {
    let now = Utc::now();
    let today = now.date_naive();

    let flagship = vec![
        channel("google", "Google Ads", 15_000.0, 67_500.0, 450_000, 12_500, 30.0, "#4285F4"),
        channel("meta", "Meta (FB/Insta)", 20_000.0, 52_000.0, 1_200_000, 18_000, 40.0, "#0668E1"),
        channel("tiktok", "TikTok Ads", 10_000.0, 18_000.0, 2_500_000, 25_000, 20.0, "#000000"),
        channel("linkedin", "LinkedIn Ads", 5_000.0, 15_000.0, 150_000, 800, 10.0, "#0a66c2"),
    ];

    let leads = vec![
        channel("nova-search", "Google Search", 6_000.0, 21_000.0, 180_000, 4_200, 50.0, "#4285F4"),
        channel("nova-linkedin", "LinkedIn Ads", 4_000.0, 10_000.0, 90_000, 600, 33.0, "#0a66c2"),
        channel("nova-meta", "Meta (FB/Insta)", 2_000.0, 3_000.0, 400_000, 3_100, 17.0, "#0668E1"),
    ];

    vec![
        Customer {
            id: "cust-acme".to_string(),
            name: "Acme Retail".to_string(),
            industry: Some("E-commerce".to_string()),
            contact_person: Some("Jordan Lee".to_string()),
            email: Some("marketing@acme.example".to_string()),
            status: CustomerStatus::Active,
            total_budget: 120_000.0,
            campaigns: vec![Campaign {
                id: "camp-acme-q4".to_string(),
                name: "Q4 Performance Push".to_string(),
                customer_id: "cust-acme".to_string(),
                description: Some("Holiday season multi-channel acquisition".to_string()),
                status: CampaignStatus::Active,
                start_date: today - Duration::days(30),
                end_date: Some(today + Duration::days(60)),
                budget: DEMO_TOTAL_BUDGET,
                channels: flagship,
                created_at: now - Duration::days(30),
            }],
            created_at: now - Duration::days(45),
            color: "#6366f1".to_string(),
        },
        Customer {
            id: "cust-nova".to_string(),
            name: "Nova Fintech".to_string(),
            industry: Some("Finance".to_string()),
            contact_person: None,
            email: None,
            status: CustomerStatus::Active,
            total_budget: 30_000.0,
            campaigns: vec![Campaign {
                id: "camp-nova-leads".to_string(),
                name: "Lead Gen Sprint".to_string(),
                customer_id: "cust-nova".to_string(),
                description: None,
                status: CampaignStatus::Paused,
                start_date: today - Duration::days(10),
                end_date: None,
                budget: 12_000.0,
                channels: leads,
                created_at: now - Duration::days(10),
            }],
            created_at: now - Duration::days(12),
            color: "#0ea5e9".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_channels_are_consistent() {
        for customer in seed_customers() {
            for campaign in &customer.campaigns {
                assert_eq!(campaign.customer_id, customer.id);
                for ch in &campaign.channels {
                    assert!((ch.revenue - ch.spend * ch.roas).abs() < 1e-6);
                    assert!(ch.clicks <= ch.impressions);
                }
            }
        }
    }

    #[test]
    fn test_flagship_spends_its_budget() {
        let customers = seed_customers();
        let campaign = &customers[0].campaigns[0];
        let spend: f64 = campaign.channels.iter().map(|c| c.spend).sum();
        assert!((spend - DEMO_TOTAL_BUDGET).abs() < 1e-9);
        assert!((campaign.channel("google").unwrap().roas - 4.5).abs() < 1e-9);
    }
}
