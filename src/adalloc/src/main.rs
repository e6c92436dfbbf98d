//! AdAlloc, the marketing budget allocation dashboard.
//!
//! Loads the persisted customer tree, runs one command against it and
//! writes back whatever changed.

use adalloc_core::config::AppConfig;
use adalloc_core::{format_currency, Currency, GoalType};
use adalloc_management::{
    export_customers, export_file_name, load_state, AllocationMap, BudgetStore, FileStore,
    KeyValueStore, MemoryStore, NewCampaign, NewChannel, NewCustomer, NewGoal,
    PersistenceObserver,
};
use adalloc_optimizer::BudgetOptimizer;
use adalloc_reporting::{
    campaign_summary, customer_summary, goal_progress, list_channels, ChannelSort, RevenueSource,
};
use anyhow::{anyhow, Context};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adalloc")]
#[command(about = "Marketing budget allocation across customers, campaigns and channels")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, env = "ADALLOC_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory (overrides config)
    #[arg(long, env = "ADALLOC__STORAGE__DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, default_value_t = false)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Global, customer and campaign totals
    Summary,

    /// Every channel across all customers
    Channels {
        /// Filter on channel, customer or campaign name
        #[arg(short, long, default_value = "")]
        query: String,

        #[arg(long, value_enum, default_value_t = SortArg::Spend)]
        sort: SortArg,
    },

    /// Goals with progress
    Goals,

    /// Add a customer
    AddCustomer {
        name: String,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        contact: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Total budget across all of the customer's campaigns
        #[arg(long, default_value_t = 50_000.0)]
        budget: f64,
    },

    /// Add a campaign to a customer
    AddCampaign {
        customer: String,
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Campaign budget (default from settings)
        #[arg(long)]
        budget: Option<f64>,

        /// Start date as YYYY-MM-DD (default today)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date as YYYY-MM-DD
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Add a channel to a campaign, entering either its ROAS or its revenue
    AddChannel {
        customer: String,
        campaign: String,
        name: String,

        /// Spend (default from settings)
        #[arg(long)]
        spend: Option<f64>,

        #[arg(long, conflicts_with = "revenue", required_unless_present = "revenue")]
        roas: Option<f64>,

        #[arg(long)]
        revenue: Option<f64>,

        #[arg(long, default_value_t = 0)]
        impressions: u64,

        #[arg(long, default_value_t = 0)]
        clicks: u64,

        /// Planned share of the campaign budget, in percent
        #[arg(long, default_value_t = 0.0)]
        allocation: f64,
    },

    /// Add a goal tracked against the global totals
    AddGoal {
        name: String,

        #[arg(long = "type", value_enum)]
        goal_type: GoalTypeArg,

        #[arg(long)]
        target: f64,

        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: NaiveDate,
    },

    /// Set one channel's spend; revenue follows at its current ROAS
    SetSpend {
        customer: String,
        campaign: String,
        channel: String,
        spend: f64,
    },

    /// Step one channel's spend up or down (never below zero)
    Nudge {
        customer: String,
        campaign: String,
        channel: String,
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },

    /// Ask the AI strategist for a reallocation of a campaign's budget
    Optimize {
        customer: String,
        campaign: String,

        /// Apply the suggested spends to the campaign
        #[arg(long, default_value_t = false)]
        apply: bool,
    },

    /// Change the display currency
    Currency {
        #[arg(value_enum)]
        currency: CurrencyArg,
    },

    /// Write the full customer tree as JSON
    Export {
        /// Output path (default: adalloc-data-<date>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Spend,
    Revenue,
    Roas,
}

impl From<SortArg> for ChannelSort {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Spend => ChannelSort::Spend,
            SortArg::Revenue => ChannelSort::Revenue,
            SortArg::Roas => ChannelSort::Roas,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GoalTypeArg {
    Revenue,
    Roas,
    Spend,
    Customers,
}

impl From<GoalTypeArg> for GoalType {
    fn from(g: GoalTypeArg) -> Self {
        match g {
            GoalTypeArg::Revenue => GoalType::Revenue,
            GoalTypeArg::Roas => GoalType::Roas,
            GoalTypeArg::Spend => GoalType::Spend,
            GoalTypeArg::Customers => GoalType::Customers,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CurrencyArg {
    Usd,
    Eur,
    Gbp,
    Try,
}

impl From<CurrencyArg> for Currency {
    fn from(c: CurrencyArg) -> Self {
        match c {
            CurrencyArg::Usd => Currency::Usd,
            CurrencyArg::Eur => Currency::Eur,
            CurrencyArg::Gbp => Currency::Gbp,
            CurrencyArg::Try => Currency::Try,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adalloc=info,adalloc_management=info,adalloc_optimizer=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    let kv: Arc<dyn KeyValueStore> = if cli.ephemeral {
        info!("Running with in-memory storage");
        Arc::new(MemoryStore::new())
    } else {
        info!(data_dir = %config.storage.data_dir.display(), "Using file storage");
        Arc::new(FileStore::new(&config.storage.data_dir))
    };

    let mut store = BudgetStore::new(load_state(kv.as_ref()));
    store.subscribe(Box::new(PersistenceObserver::new(kv.clone())));
    store.refresh_overdue(Utc::now().date_naive());

    match cli.command {
        Commands::Summary => cmd_summary(&store),
        Commands::Channels { query, sort } => cmd_channels(&store, &query, sort.into()),
        Commands::Goals => cmd_goals(&store),
        Commands::AddCustomer {
            name,
            industry,
            contact,
            email,
            budget,
        } => {
            let customer = store.add_customer(NewCustomer {
                industry,
                contact_person: contact,
                email,
                total_budget: budget,
                ..NewCustomer::named(name)
            })?;
            println!("Customer created: {} ({})", customer.id, customer.name);
        }
        Commands::AddCampaign {
            customer,
            name,
            description,
            budget,
            start,
            end,
        } => {
            let campaign = store.add_campaign(
                &customer,
                NewCampaign {
                    description,
                    budget,
                    start_date: start,
                    end_date: end,
                    ..NewCampaign::named(name)
                },
            )?;
            println!(
                "Campaign created: {} ({}, budget {})",
                campaign.id,
                campaign.name,
                money(&store, campaign.budget)
            );
        }
        Commands::AddChannel {
            customer,
            campaign,
            name,
            spend,
            roas,
            revenue,
            impressions,
            clicks,
            allocation,
        } => {
            let source = revenue_source(roas, revenue)?;
            let spend = spend.unwrap_or(store.settings().default_channel_budget);
            let ch = store.add_channel(
                &customer,
                &campaign,
                NewChannel {
                    name,
                    spend,
                    source,
                    impressions,
                    clicks,
                    allocation,
                    color: None,
                },
            )?;
            println!(
                "Channel created: {} ({})  ROAS {:.2}x  CPC {:.2}  CTR {:.2}%",
                ch.id, ch.name, ch.roas, ch.cpc, ch.ctr
            );
            print_channel_update(&store, &ch.name, ch.spend, ch.revenue);
        }
        Commands::AddGoal {
            name,
            goal_type,
            target,
            deadline,
        } => cmd_add_goal(&mut store, name, goal_type.into(), target, deadline)?,
        Commands::SetSpend {
            customer,
            campaign,
            channel,
            spend,
        } => {
            let ch = store.set_channel_spend(&customer, &campaign, &channel, spend)?;
            print_channel_update(&store, &ch.name, ch.spend, ch.revenue);
        }
        Commands::Nudge {
            customer,
            campaign,
            channel,
            delta,
        } => {
            let ch = store.nudge_channel_spend(&customer, &campaign, &channel, delta)?;
            print_channel_update(&store, &ch.name, ch.spend, ch.revenue);
        }
        Commands::Optimize {
            customer,
            campaign,
            apply,
        } => {
            let optimizer = BudgetOptimizer::from_config(&config.optimizer);
            cmd_optimize(&mut store, &optimizer, &customer, &campaign, apply).await?;
        }
        Commands::Currency { currency } => {
            let mut settings = store.settings().clone();
            settings.currency = currency.into();
            store.update_settings(settings)?;
            println!(
                "Currency set to {} ({})",
                store.settings().currency.name(),
                store.settings().currency.symbol()
            );
        }
        Commands::Export { out } => cmd_export(&store, out)?,
    }

    Ok(())
}

/// The channel's revenue figure comes from exactly one of ROAS or revenue.
fn revenue_source(roas: Option<f64>, revenue: Option<f64>) -> anyhow::Result<RevenueSource> {
    match (roas, revenue) {
        (Some(roas), None) => Ok(RevenueSource::Roas(roas)),
        (None, Some(revenue)) => Ok(RevenueSource::Revenue(revenue)),
        _ => Err(anyhow!("give exactly one of --roas or --revenue")),
    }
}

fn money(store: &BudgetStore, amount: f64) -> String {
    format_currency(amount, store.settings().currency)
}

fn cmd_summary(store: &BudgetStore) {
    let global = store.global_summary();
    println!("Portfolio");
    println!("  Customers:     {}", global.total_customers);
    println!("  Campaigns:     {}", global.total_campaigns);
    println!("  Spend:         {}", money(store, global.total_spend));
    println!("  Revenue:       {}", money(store, global.total_revenue));
    println!("  Blended ROAS:  {:.2}x", global.blended_roas);

    for customer in store.customers() {
        let cs = customer_summary(customer);
        println!();
        println!(
            "{} [{}] {}  ({} / {} campaigns active)",
            customer.name,
            customer.id,
            customer.status.as_str(),
            cs.active_campaigns,
            cs.campaign_count
        );
        println!(
            "  Spend {}  Revenue {}  ROAS {:.2}x",
            money(store, cs.total_spend),
            money(store, cs.total_revenue),
            cs.blended_roas
        );
        for campaign in &customer.campaigns {
            let s = campaign_summary(campaign);
            println!(
                "  - {} [{}] {}  budget {}  spend {} ({:.1}%)  ROAS {:.2}x",
                campaign.name,
                campaign.id,
                campaign.status.as_str(),
                money(store, campaign.budget),
                money(store, s.total_spend),
                s.budget_utilization,
                s.blended_roas
            );
        }
    }
}

fn cmd_channels(store: &BudgetStore, query: &str, sort: ChannelSort) {
    let rows = list_channels(store.customers(), query, sort);
    if rows.is_empty() {
        println!("No channels match '{query}'");
        return;
    }
    for row in rows {
        println!(
            "{:<20} {:<18} {:<24} spend {:>12}  revenue {:>12}  ROAS {:>5.2}x  CTR {:>5.2}%",
            row.channel_name,
            row.customer_name,
            row.campaign_name,
            money(store, row.spend),
            money(store, row.revenue),
            row.roas,
            row.ctr
        );
    }
}

fn cmd_goals(store: &BudgetStore) {
    if store.goals().is_empty() {
        println!("No goals defined");
        return;
    }
    for goal in store.goals() {
        println!(
            "{:<24} {:<9} {:>6.1}%  {} / {}  due {}  [{:?}]",
            goal.name,
            goal.goal_type.as_str(),
            goal_progress(goal),
            goal.current_value,
            goal.target_value,
            goal.deadline,
            goal.status
        );
    }
}

fn cmd_add_goal(
    store: &mut BudgetStore,
    name: String,
    goal_type: GoalType,
    target_value: f64,
    deadline: NaiveDate,
) -> anyhow::Result<()> {
    let goal = store.add_goal(NewGoal {
        name,
        target_value,
        deadline,
        goal_type,
    })?;
    println!(
        "Goal created: {} ({:.1}% of target reached)",
        goal.id,
        goal_progress(&goal)
    );
    Ok(())
}

fn print_channel_update(store: &BudgetStore, name: &str, spend: f64, revenue: f64) {
    println!(
        "{name}: spend {}  revenue {}",
        money(store, spend),
        money(store, revenue)
    );
}

async fn cmd_optimize(
    store: &mut BudgetStore,
    optimizer: &BudgetOptimizer,
    customer_id: &str,
    campaign_id: &str,
    apply: bool,
) -> anyhow::Result<()> {
    let campaign = store
        .campaign(customer_id, campaign_id)
        .ok_or_else(|| anyhow!("campaign {campaign_id} not found for customer {customer_id}"))?;
    let channels = campaign.channels.clone();
    let budget = campaign.budget;

    let response = optimizer.optimize(&channels, budget).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if apply && !response.recommendations.is_empty() {
        let outcome =
            store.apply_optimization(customer_id, campaign_id, &AllocationMap::from(&response))?;
        println!(
            "Applied {} channel(s), ignored {}",
            outcome.applied.len(),
            outcome.ignored.len()
        );
    }
    Ok(())
}

fn cmd_export(store: &BudgetStore, out: Option<PathBuf>) -> anyhow::Result<()> {
    let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now().date_naive())));
    let json = export_customers(store.customers())?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Exported {} customer(s) to {}", store.customers().len(), path.display());
    Ok(())
}
