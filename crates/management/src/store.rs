//! Owned state container for the customer tree, settings and goals.
//!
//! Every mutation is a synchronous rewrite through `&mut self`. After each
//! commit the registered observers are told which collection changed;
//! persistence is one such observer and is never interleaved with the
//! mutation itself.

use crate::allocation::{apply_allocation, AllocationMap, MergeOutcome};
use crate::models::{NewCampaign, NewChannel, NewCustomer, NewGoal, CHANNEL_COLORS, CUSTOMER_COLORS};
use adalloc_core::types::new_id;
use adalloc_core::{
    AdallocError, AdallocResult, AppSettings, Campaign, ChannelData, Customer, Goal, GoalStatus,
};
use adalloc_reporting::{
    derive_metrics, global_summary, refresh_overdue, reprice, sync_goals, ChannelInput,
    GlobalSummary, RevenueSource,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The independently persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Customers,
    Settings,
    Goals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub customers: Vec<Customer>,
    pub settings: AppSettings,
    pub goals: Vec<Goal>,
}

/// Notified after every committed mutation.
pub trait StoreObserver: Send + Sync {
    fn on_commit(&self, collection: Collection, state: &StoreState);
}

pub struct BudgetStore {
    state: StoreState,
    observers: Vec<Box<dyn StoreObserver>>,
}

fn check_amount(field: &str, value: f64) -> AdallocResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AdallocError::Validation(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

fn check_name(field: &str, value: &str) -> AdallocResult<()> {
    if value.trim().is_empty() {
        Err(AdallocError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

impl BudgetStore {
    pub fn new(mut state: StoreState) -> Self {
        let summary = global_summary(&state.customers);
        sync_goals(&mut state.goals, &summary);
        info!(
            customers = state.customers.len(),
            goals = state.goals.len(),
            "Budget store initialized"
        );
        Self {
            state,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    // ─── Reads ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn customers(&self) -> &[Customer] {
        &self.state.customers
    }

    pub fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    pub fn goals(&self) -> &[Goal] {
        &self.state.goals
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.state.customers.iter().find(|c| c.id == customer_id)
    }

    pub fn campaign(&self, customer_id: &str, campaign_id: &str) -> Option<&Campaign> {
        self.customer(customer_id)?.campaign(campaign_id)
    }

    /// Customers whose name or industry contains `query`, case-insensitively.
    pub fn search_customers(&self, query: &str) -> Vec<&Customer> {
        let needle = query.trim().to_lowercase();
        self.state
            .customers
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.industry
                        .as_deref()
                        .is_some_and(|i| i.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn global_summary(&self) -> GlobalSummary {
        global_summary(&self.state.customers)
    }

    // ─── Customers / campaigns / channels ──────────────────────────────────

    pub fn add_customer(&mut self, req: NewCustomer) -> AdallocResult<Customer> {
        check_name("customer name", &req.name)?;
        check_amount("total budget", req.total_budget)?;

        let color = req.color.unwrap_or_else(|| {
            CUSTOMER_COLORS[self.state.customers.len() % CUSTOMER_COLORS.len()].to_string()
        });
        let customer = Customer {
            id: new_id("cust"),
            name: req.name,
            industry: req.industry,
            contact_person: req.contact_person,
            email: req.email,
            status: req.status,
            total_budget: req.total_budget,
            campaigns: Vec::new(),
            created_at: Utc::now(),
            color,
        };
        info!(customer_id = %customer.id, name = %customer.name, "Customer created");
        self.state.customers.push(customer.clone());
        self.commit(Collection::Customers);
        Ok(customer)
    }

    pub fn add_campaign(&mut self, customer_id: &str, req: NewCampaign) -> AdallocResult<Campaign> {
        check_name("campaign name", &req.name)?;
        let budget = req.budget.unwrap_or(self.state.settings.default_campaign_budget);
        check_amount("campaign budget", budget)?;

        let customer = self.customer_mut(customer_id)?;
        let campaign = Campaign {
            id: new_id("camp"),
            name: req.name,
            customer_id: customer.id.clone(),
            description: req.description,
            status: req.status,
            start_date: req.start_date.unwrap_or_else(|| Utc::now().date_naive()),
            end_date: req.end_date,
            budget,
            channels: Vec::new(),
            created_at: Utc::now(),
        };
        customer.campaigns.push(campaign.clone());
        info!(customer_id = customer_id, campaign_id = %campaign.id, budget, "Campaign created");
        self.commit(Collection::Customers);
        Ok(campaign)
    }

    pub fn add_channel(
        &mut self,
        customer_id: &str,
        campaign_id: &str,
        req: NewChannel,
    ) -> AdallocResult<ChannelData> {
        check_name("channel name", &req.name)?;
        check_amount("spend", req.spend)?;
        match req.source {
            RevenueSource::Roas(roas) => check_amount("roas", roas)?,
            RevenueSource::Revenue(revenue) => check_amount("revenue", revenue)?,
        }
        check_amount("allocation", req.allocation)?;

        let derived = derive_metrics(&ChannelInput {
            spend: req.spend,
            source: req.source,
            clicks: req.clicks,
            impressions: req.impressions,
        });

        let campaign = self.campaign_mut(customer_id, campaign_id)?;
        let color = req.color.unwrap_or_else(|| {
            CHANNEL_COLORS[campaign.channels.len() % CHANNEL_COLORS.len()].to_string()
        });
        let channel = ChannelData {
            id: new_id("ch"),
            name: req.name,
            spend: req.spend,
            revenue: derived.revenue,
            impressions: req.impressions,
            clicks: req.clicks,
            roas: derived.roas,
            cpc: derived.cpc,
            ctr: derived.ctr,
            allocation: req.allocation,
            color,
        };
        campaign.channels.push(channel.clone());
        info!(campaign_id = campaign_id, channel_id = %channel.id, roas = channel.roas, "Channel added");
        self.commit(Collection::Customers);
        Ok(channel)
    }

    /// Set one channel's spend; revenue follows at the channel's current ROAS.
    pub fn set_channel_spend(
        &mut self,
        customer_id: &str,
        campaign_id: &str,
        channel_id: &str,
        spend: f64,
    ) -> AdallocResult<ChannelData> {
        check_amount("spend", spend)?;
        let channel = self.channel_mut(customer_id, campaign_id, channel_id)?;
        reprice(channel, spend);
        let updated = channel.clone();
        self.commit(Collection::Customers);
        Ok(updated)
    }

    /// Step a channel's spend by `delta`, never going below zero.
    pub fn nudge_channel_spend(
        &mut self,
        customer_id: &str,
        campaign_id: &str,
        channel_id: &str,
        delta: f64,
    ) -> AdallocResult<ChannelData> {
        let current = self.channel_mut(customer_id, campaign_id, channel_id)?.spend;
        self.set_channel_spend(customer_id, campaign_id, channel_id, (current + delta).max(0.0))
    }

    /// Apply a reallocation to one campaign in a single commit. A map with
    /// any negative or non-finite spend is rejected whole.
    pub fn apply_optimization(
        &mut self,
        customer_id: &str,
        campaign_id: &str,
        allocations: &AllocationMap,
    ) -> AdallocResult<MergeOutcome> {
        for (channel_id, spend) in allocations.iter() {
            check_amount(&format!("suggested spend for {channel_id}"), spend)?;
        }

        let outcome = apply_allocation(&mut self.state.customers, customer_id, campaign_id, allocations);
        info!(
            customer_id = customer_id,
            campaign_id = campaign_id,
            applied = outcome.applied.len(),
            ignored = outcome.ignored.len(),
            "Optimization applied"
        );
        if outcome.changed() {
            self.commit(Collection::Customers);
        }
        Ok(outcome)
    }

    // ─── Goals / settings ──────────────────────────────────────────────────

    pub fn add_goal(&mut self, req: NewGoal) -> AdallocResult<Goal> {
        check_name("goal name", &req.name)?;
        if !(req.target_value.is_finite() && req.target_value > 0.0) {
            return Err(AdallocError::Validation(format!(
                "goal target must be positive, got {}",
                req.target_value
            )));
        }

        let mut goal = Goal {
            id: new_id("goal"),
            name: req.name,
            target_value: req.target_value,
            current_value: 0.0,
            deadline: req.deadline,
            status: GoalStatus::Active,
            goal_type: req.goal_type,
            created_at: Utc::now(),
        };
        sync_goals(std::slice::from_mut(&mut goal), &self.global_summary());
        info!(goal_id = %goal.id, goal_type = goal.goal_type.as_str(), target = goal.target_value, "Goal created");
        self.state.goals.push(goal.clone());
        self.commit(Collection::Goals);
        Ok(goal)
    }

    /// Flag goals past their deadline as overdue.
    pub fn refresh_overdue(&mut self, today: NaiveDate) {
        if refresh_overdue(&mut self.state.goals, today) {
            self.commit(Collection::Goals);
        }
    }

    pub fn update_settings(&mut self, settings: AppSettings) -> AdallocResult<()> {
        check_amount("default campaign budget", settings.default_campaign_budget)?;
        check_amount("default channel budget", settings.default_channel_budget)?;
        self.state.settings = settings;
        self.commit(Collection::Settings);
        Ok(())
    }

    // ─── Internal helpers ──────────────────────────────────────────────────

    fn customer_mut(&mut self, customer_id: &str) -> AdallocResult<&mut Customer> {
        self.state
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| AdallocError::NotFound(format!("customer {customer_id}")))
    }

    fn campaign_mut(&mut self, customer_id: &str, campaign_id: &str) -> AdallocResult<&mut Campaign> {
        self.customer_mut(customer_id)?
            .campaign_mut(campaign_id)
            .ok_or_else(|| AdallocError::NotFound(format!("campaign {campaign_id}")))
    }

    fn channel_mut(
        &mut self,
        customer_id: &str,
        campaign_id: &str,
        channel_id: &str,
    ) -> AdallocResult<&mut ChannelData> {
        self.campaign_mut(customer_id, campaign_id)?
            .channel_mut(channel_id)
            .ok_or_else(|| AdallocError::NotFound(format!("channel {channel_id}")))
    }

    /// Notify observers; a customer-tree change also re-syncs goals.
    fn commit(&mut self, collection: Collection) {
        metrics::counter!("store.commits").increment(1);

        let goals_changed = collection == Collection::Customers && {
            let summary = global_summary(&self.state.customers);
            sync_goals(&mut self.state.goals, &summary)
        };

        for observer in &self.observers {
            observer.on_commit(collection, &self.state);
            if goals_changed {
                observer.on_commit(Collection::Goals, &self.state);
            }
        }
    }
}
