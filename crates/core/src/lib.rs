pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use config::AppConfig;
pub use error::{AdallocError, AdallocResult};
pub use settings::{format_currency, AppSettings, Currency};
pub use types::{
    Campaign, CampaignStatus, ChannelData, Customer, CustomerStatus, Goal, GoalStatus, GoalType,
    OptimizationResult, RecommendationResponse,
};
