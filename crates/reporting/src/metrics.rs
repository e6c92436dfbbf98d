//! Channel metric derivation and blended totals.
//!
//! Every division is guarded: a zero denominator yields 0 rather than an
//! error. Inputs are not validated here.

use adalloc_core::ChannelData;
use serde::{Deserialize, Serialize};

/// Which of revenue / ROAS the caller entered; the other one is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RevenueSource {
    /// ROAS entered manually, revenue = spend × roas.
    Roas(f64),
    /// Revenue entered, roas = revenue / spend.
    Revenue(f64),
}

/// Raw figures entered for a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelInput {
    pub spend: f64,
    pub source: RevenueSource,
    pub clicks: u64,
    pub impressions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub revenue: f64,
    pub roas: f64,
    pub cpc: f64,
    pub ctr: f64,
}

/// `revenue / spend`, 0 when spend is zero.
pub fn roas(revenue: f64, spend: f64) -> f64 {
    if spend > 0.0 {
        revenue / spend
    } else {
        0.0
    }
}

/// `spend / clicks`, 0 when there are no clicks.
pub fn cpc(spend: f64, clicks: u64) -> f64 {
    if clicks > 0 {
        spend / clicks as f64
    } else {
        0.0
    }
}

/// `clicks / impressions × 100`, 0 when there are no impressions.
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions > 0 {
        clicks as f64 / impressions as f64 * 100.0
    } else {
        0.0
    }
}

/// Fill in the missing revenue/ROAS counterpart plus CPC and CTR.
pub fn derive_metrics(input: &ChannelInput) -> DerivedMetrics {
    let (revenue, roas) = match input.source {
        RevenueSource::Roas(r) => (input.spend * r, r),
        RevenueSource::Revenue(v) => (v, roas(v, input.spend)),
    };
    DerivedMetrics {
        revenue,
        roas,
        cpc: cpc(input.spend, input.clicks),
        ctr: ctr(input.clicks, input.impressions),
    }
}

/// Move a channel to a new spend level holding its ROAS constant.
///
/// Revenue becomes `spend × roas`; CPC follows the new spend. ROAS and CTR
/// are left as they are.
pub fn reprice(channel: &mut ChannelData, spend: f64) {
    channel.spend = spend;
    channel.revenue = spend * channel.roas;
    channel.cpc = cpc(spend, channel.clicks);
}

/// Summed figures over a set of channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelTotals {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
}

impl ChannelTotals {
    /// Summed revenue over summed spend. Not an average of channel ROAS values.
    pub fn blended_roas(&self) -> f64 {
        roas(self.total_revenue, self.total_spend)
    }

    pub fn blended_ctr(&self) -> f64 {
        ctr(self.clicks, self.impressions)
    }

    fn add(&mut self, channel: &ChannelData) {
        self.total_spend += channel.spend;
        self.total_revenue += channel.revenue;
        self.impressions += channel.impressions;
        self.clicks += channel.clicks;
    }
}

/// Aggregate any collection of channels. The same rule applies at campaign,
/// customer and global scope.
pub fn aggregate<'a, I>(channels: I) -> ChannelTotals
where
    I: IntoIterator<Item = &'a ChannelData>,
{
    channels
        .into_iter()
        .fold(ChannelTotals::default(), |mut acc, ch| {
            acc.add(ch);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(spend: f64, roas: f64, clicks: u64, impressions: u64) -> ChannelData {
        ChannelData {
            id: "ch-1".into(),
            name: "Search".into(),
            spend,
            revenue: spend * roas,
            impressions,
            clicks,
            roas,
            cpc: cpc(spend, clicks),
            ctr: ctr(clicks, impressions),
            allocation: 0.0,
            color: "#4285F4".into(),
        }
    }

    #[test]
    fn test_revenue_from_roas() {
        for (s, r) in [(0.0, 3.0), (10_000.0, 4.5), (123.45, 0.0), (7.0, 1.25)] {
            let m = derive_metrics(&ChannelInput {
                spend: s,
                source: RevenueSource::Roas(r),
                clicks: 0,
                impressions: 0,
            });
            assert!((m.revenue - s * r).abs() < 1e-9);
            assert!((m.roas - r).abs() < 1e-12);
        }
    }

    #[test]
    fn test_roas_from_revenue() {
        let m = derive_metrics(&ChannelInput {
            spend: 20_000.0,
            source: RevenueSource::Revenue(52_000.0),
            clicks: 18_000,
            impressions: 1_200_000,
        });
        assert!((m.roas - 2.6).abs() < 1e-9);
        assert!((m.revenue - 52_000.0).abs() < 1e-9);
        assert!((m.cpc - 20_000.0 / 18_000.0).abs() < 1e-9);
        assert!((m.ctr - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_spend_gives_zero_roas() {
        for revenue in [0.0, 1.0, 99_999.0] {
            let m = derive_metrics(&ChannelInput {
                spend: 0.0,
                source: RevenueSource::Revenue(revenue),
                clicks: 10,
                impressions: 100,
            });
            assert_eq!(m.roas, 0.0);
            assert_eq!(m.cpc, 0.0);
        }
    }

    #[test]
    fn test_zero_clicks_and_impressions() {
        let m = derive_metrics(&ChannelInput {
            spend: 500.0,
            source: RevenueSource::Roas(2.0),
            clicks: 0,
            impressions: 0,
        });
        assert_eq!(m.cpc, 0.0);
        assert_eq!(m.ctr, 0.0);
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(std::iter::empty::<&ChannelData>());
        assert_eq!(totals.total_spend, 0.0);
        assert_eq!(totals.total_revenue, 0.0);
        assert_eq!(totals.blended_roas(), 0.0);
        assert_eq!(totals.blended_ctr(), 0.0);
    }

    #[test]
    fn test_blended_roas_is_ratio_of_sums() {
        // 1000 @ 5x and 9000 @ 1x: mean of ROAS is 3.0, blended is 1.4
        let chans = vec![channel(1_000.0, 5.0, 10, 1_000), channel(9_000.0, 1.0, 90, 9_000)];
        let totals = aggregate(&chans);
        assert!((totals.total_spend - 10_000.0).abs() < 1e-9);
        assert!((totals.total_revenue - 14_000.0).abs() < 1e-9);
        assert!((totals.blended_roas() - 1.4).abs() < 1e-9);
        assert!((totals.blended_ctr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reprice_holds_roas() {
        let mut ch = channel(10_000.0, 4.5, 5_000, 100_000);
        reprice(&mut ch, 20_000.0);
        assert!((ch.spend - 20_000.0).abs() < 1e-9);
        assert!((ch.revenue - 90_000.0).abs() < 1e-9);
        assert!((ch.roas - 4.5).abs() < 1e-12);
        assert!((ch.cpc - 4.0).abs() < 1e-9);
    }
}
