//! Applying a spend reallocation onto a campaign's channels.
//!
//! ROAS is held constant under reallocation: each addressed channel's revenue
//! becomes `new spend × roas`. Ids that match no channel are ignored.

use adalloc_core::{Campaign, Customer, RecommendationResponse};
use adalloc_reporting::reprice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Proposed spend per channel id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationMap(BTreeMap<String, f64>);

impl AllocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel_id: impl Into<String>, spend: f64) {
        self.0.insert(channel_id.into(), spend);
    }

    pub fn get(&self, channel_id: &str) -> Option<f64> {
        self.0.get(channel_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, spend)| (id.as_str(), *spend))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AllocationMap {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&RecommendationResponse> for AllocationMap {
    fn from(response: &RecommendationResponse) -> Self {
        response
            .recommendations
            .iter()
            .map(|r| (r.channel_id.clone(), r.suggested_spend))
            .collect()
    }
}

/// What a merge touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeOutcome {
    /// Channel ids whose spend was rewritten, in campaign order.
    pub applied: Vec<String>,
    /// Mapping keys that matched no channel in the campaign.
    pub ignored: Vec<String>,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Rewrite the addressed channels of one campaign.
pub fn merge_into_campaign(campaign: &mut Campaign, allocations: &AllocationMap) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for channel in campaign.channels.iter_mut() {
        if let Some(spend) = allocations.get(&channel.id) {
            debug!(
                campaign_id = %campaign.id,
                channel_id = %channel.id,
                old_spend = channel.spend,
                new_spend = spend,
                "Reallocating channel spend"
            );
            reprice(channel, spend);
            outcome.applied.push(channel.id.clone());
        }
    }

    outcome.ignored = allocations
        .channel_ids()
        .filter(|id| campaign.channel(id).is_none())
        .map(str::to_string)
        .collect();

    outcome
}

/// Locate `(customer_id, campaign_id)` in the tree and merge there. Every
/// other customer and campaign is left untouched.
pub fn apply_allocation(
    customers: &mut [Customer],
    customer_id: &str,
    campaign_id: &str,
    allocations: &AllocationMap,
) -> MergeOutcome {
    let campaign = customers
        .iter_mut()
        .find(|c| c.id == customer_id)
        .and_then(|c| c.campaign_mut(campaign_id));

    match campaign {
        Some(campaign) => merge_into_campaign(campaign, allocations),
        None => {
            warn!(
                customer_id = customer_id,
                campaign_id = campaign_id,
                "Allocation target not found, nothing applied"
            );
            MergeOutcome {
                applied: Vec::new(),
                ignored: allocations.channel_ids().map(str::to_string).collect(),
            }
        }
    }
}
