//! AI budget strategist. Builds an optimization request from a campaign's
//! channels, asks the recommendation service, and validates the answer.
//!
//! Every failure path resolves to an empty recommendation set with an
//! explanatory strategy text; callers never see an error.

pub mod error;
pub mod optimizer;
pub mod request;
pub mod service;
pub mod tracker;

pub use error::OptimizerError;
pub use optimizer::{BudgetOptimizer, FAILURE_MESSAGE, NOT_CONFIGURED_MESSAGE};
pub use request::{response_schema, validate_reply, ChannelSnapshot, OptimizationRequest};
pub use service::{select_service, DisabledClient, GeminiClient, RecommendationService};
pub use tracker::{OptimizationTracker, Ticket};
